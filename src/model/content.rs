//! Catalog items returned by searches and the combined "all" payload

use super::pagination::ResultPage;
use super::types::Category;

/// Anything that can be keyed for status lookups and selection
pub trait CatalogItem: Clone + Send + Sync + 'static {
    fn key(&self) -> &str;
    fn name(&self) -> &str;
}

/// A track from search results
#[derive(Clone, Debug, PartialEq)]
pub struct SearchTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub artists: Vec<String>,
    pub album: String,
    pub duration_ms: u32,
    pub uri: String,
}

/// An album from search results
#[derive(Clone, Debug, PartialEq)]
pub struct SearchAlbum {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub year: String,
}

/// An artist from search results
#[derive(Clone, Debug, PartialEq)]
pub struct SearchArtist {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
}

/// A playlist from search results
#[derive(Clone, Debug, PartialEq)]
pub struct SearchPlaylist {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub total_tracks: u32,
}

macro_rules! impl_catalog_item {
    ($($ty:ty),*) => {
        $(impl CatalogItem for $ty {
            fn key(&self) -> &str {
                &self.id
            }

            fn name(&self) -> &str {
                &self.name
            }
        })*
    };
}

impl_catalog_item!(SearchTrack, SearchAlbum, SearchArtist, SearchPlaylist);

/// The single best match picked across categories, tagged by item type
#[derive(Clone, Debug, PartialEq)]
pub enum MostPopular {
    Album(SearchAlbum),
    Track(SearchTrack),
    Artist(SearchArtist),
    Playlist(SearchPlaylist),
}

impl MostPopular {
    pub fn category(&self) -> Category {
        match self {
            Self::Album(_) => Category::Albums,
            Self::Track(_) => Category::Tracks,
            Self::Artist(_) => Category::Artists,
            Self::Playlist(_) => Category::Playlists,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Album(a) => &a.name,
            Self::Track(t) => &t.name,
            Self::Artist(a) => &a.name,
            Self::Playlist(p) => &p.name,
        }
    }

    /// Score the top item of each category against the query and pick the best.
    ///
    /// Exact name matches beat prefix matches, which beat substring matches.
    /// Artists win ties, then albums, playlists and finally tracks. Returns
    /// `None` when no top item matches the query at all.
    pub fn pick(
        query: &str,
        albums: &[SearchAlbum],
        tracks: &[SearchTrack],
        artists: &[SearchArtist],
        playlists: &[SearchPlaylist],
    ) -> Option<Self> {
        let query_lower = query.to_lowercase();
        if query_lower.is_empty() {
            return None;
        }

        let score = |name: &str, exact: u32, prefix: u32, contains: u32| {
            let name_lower = name.to_lowercase();
            if name_lower == query_lower {
                exact
            } else if name_lower.starts_with(&query_lower) {
                prefix
            } else if name_lower.contains(&query_lower) {
                contains
            } else {
                0
            }
        };

        let artist_score = artists.first().map(|a| score(&a.name, 100, 80, 60)).unwrap_or(0);
        // Tracks also match on their primary artist
        let track_score = tracks
            .first()
            .map(|t| score(&t.name, 95, 75, 55).max(score(&t.artist, 95, 75, 55)))
            .unwrap_or(0);
        let album_score = albums.first().map(|a| score(&a.name, 85, 65, 45)).unwrap_or(0);
        let playlist_score = playlists.first().map(|p| score(&p.name, 80, 60, 40)).unwrap_or(0);

        let max_score = artist_score.max(album_score).max(playlist_score).max(track_score);

        if max_score == 0 {
            None
        } else if artist_score == max_score {
            artists.first().cloned().map(Self::Artist)
        } else if album_score == max_score {
            albums.first().cloned().map(Self::Album)
        } else if playlist_score == max_score {
            playlists.first().cloned().map(Self::Playlist)
        } else {
            tracks.first().cloned().map(Self::Track)
        }
    }
}

/// One composite response for the "all" tab
#[derive(Clone, Debug, Default)]
pub struct CombinedResults {
    pub albums: ResultPage<SearchAlbum>,
    pub tracks: ResultPage<SearchTrack>,
    pub artists: ResultPage<SearchArtist>,
    pub playlists: ResultPage<SearchPlaylist>,
    pub most_popular: Option<MostPopular>,
}

impl CombinedResults {
    pub fn is_empty(&self) -> bool {
        self.albums.items.is_empty()
            && self.tracks.items.is_empty()
            && self.artists.items.is_empty()
            && self.playlists.items.is_empty()
            && self.most_popular.is_none()
    }
}
