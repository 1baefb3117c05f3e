//! `CatalogApi` backed by the Spotify Web API

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rspotify::{
    model::{
        FullArtist, FullTrack, Market, SearchResult, SearchType, SimplifiedAlbum,
        SimplifiedPlaylist,
    },
    prelude::*,
    ClientCredsSpotify, Config, Credentials,
};

use super::catalog::CatalogApi;
use super::content::{
    CombinedResults, MostPopular, SearchAlbum, SearchArtist, SearchPlaylist, SearchTrack,
};
use super::pagination::ResultPage;
use super::types::FacetFilter;

/// Spotify catalog client using the client-credentials flow (no user login)
#[derive(Clone)]
pub struct SpotifyCatalog {
    client: Arc<ClientCredsSpotify>,
    market: Option<Market>,
    combined_limit: u32,
}

impl SpotifyCatalog {
    /// Authenticate with `RSPOTIFY_CLIENT_ID` / `RSPOTIFY_CLIENT_SECRET`
    pub async fn from_env(combined_limit: u32) -> Result<Self> {
        let credentials = Credentials::from_env()
            .ok_or_else(|| anyhow!("RSPOTIFY_CLIENT_ID and RSPOTIFY_CLIENT_SECRET must be set"))?;

        let client = ClientCredsSpotify::with_config(
            credentials,
            Config {
                token_refreshing: true,
                ..Default::default()
            },
        );
        client.request_token().await?;
        tracing::debug!("Spotify client credentials token acquired");

        Ok(Self {
            client: Arc::new(client),
            market: None,
            combined_limit,
        })
    }

    async fn raw_search(
        &self,
        query: &str,
        search_type: SearchType,
        limit: u32,
        offset: u32,
        filter: Option<FacetFilter>,
    ) -> Result<SearchResult> {
        let q = filtered_query(query, filter);
        tracing::debug!(q = %q, search_type = ?search_type, limit, offset, "API: search");
        let result = self
            .client
            .search(&q, search_type, self.market, None, Some(limit), Some(offset))
            .await?;
        Ok(result)
    }
}

/// Apply a facet as a Spotify field filter.
///
/// Spotify has no performer or composer fields, so those match on artist.
pub fn filtered_query(query: &str, filter: Option<FacetFilter>) -> String {
    let Some(filter) = filter else {
        return query.to_string();
    };

    let field = match filter {
        FacetFilter::Artist | FacetFilter::Performer | FacetFilter::Composer => "artist",
        FacetFilter::Label => "label",
        FacetFilter::ReleaseName => "album",
    };

    if query.contains(char::is_whitespace) {
        format!("{field}:\"{query}\"")
    } else {
        format!("{field}:{query}")
    }
}

fn first_artist_name<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names.into_iter().next().cloned().unwrap_or_default()
}

fn to_track(track: FullTrack) -> SearchTrack {
    let track_id = track.id.as_ref().map(|id| id.id().to_string()).unwrap_or_default();
    let all_artists: Vec<String> = track.artists.iter().map(|a| a.name.clone()).collect();
    SearchTrack {
        uri: format!("spotify:track:{}", track_id),
        id: track_id,
        name: track.name,
        artist: first_artist_name(&all_artists),
        artists: all_artists,
        album: track.album.name,
        duration_ms: track.duration.num_milliseconds() as u32,
    }
}

fn to_album(album: SimplifiedAlbum) -> SearchAlbum {
    SearchAlbum {
        id: album.id.as_ref().map(|id| id.id().to_string()).unwrap_or_default(),
        name: album.name,
        artist: album.artists.first().map(|a| a.name.clone()).unwrap_or_default(),
        year: album.release_date.unwrap_or_default().chars().take(4).collect(),
    }
}

fn to_artist(artist: FullArtist) -> SearchArtist {
    SearchArtist {
        id: artist.id.id().to_string(),
        name: artist.name,
        genres: artist.genres,
    }
}

fn to_playlist(playlist: SimplifiedPlaylist) -> SearchPlaylist {
    SearchPlaylist {
        id: playlist.id.id().to_string(),
        name: playlist.name,
        owner: playlist
            .owner
            .display_name
            .unwrap_or_else(|| playlist.owner.id.id().to_string()),
        total_tracks: playlist.tracks.total,
    }
}

fn albums_page(result: SearchResult) -> Result<ResultPage<SearchAlbum>> {
    match result {
        SearchResult::Albums(page) => Ok(ResultPage::new(
            page.items.into_iter().map(to_album).collect(),
            page.total as usize,
            page.offset as usize,
        )),
        _ => Err(anyhow!("expected album results")),
    }
}

fn tracks_page(result: SearchResult) -> Result<ResultPage<SearchTrack>> {
    match result {
        SearchResult::Tracks(page) => Ok(ResultPage::new(
            page.items.into_iter().map(to_track).collect(),
            page.total as usize,
            page.offset as usize,
        )),
        _ => Err(anyhow!("expected track results")),
    }
}

fn artists_page(result: SearchResult) -> Result<ResultPage<SearchArtist>> {
    match result {
        SearchResult::Artists(page) => Ok(ResultPage::new(
            page.items.into_iter().map(to_artist).collect(),
            page.total as usize,
            page.offset as usize,
        )),
        _ => Err(anyhow!("expected artist results")),
    }
}

fn playlists_page(result: SearchResult) -> Result<ResultPage<SearchPlaylist>> {
    match result {
        SearchResult::Playlists(page) => Ok(ResultPage::new(
            page.items.into_iter().map(to_playlist).collect(),
            page.total as usize,
            page.offset as usize,
        )),
        _ => Err(anyhow!("expected playlist results")),
    }
}

/// Keep a partially failed combined search usable; fail only if every part failed
fn page_or_empty<T>(part: &str, result: Result<ResultPage<T>>, failures: &mut Vec<anyhow::Error>) -> ResultPage<T> {
    match result {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(part, error = %e, "Combined search part failed");
            failures.push(e);
            ResultPage::default()
        }
    }
}

#[async_trait]
impl CatalogApi for SpotifyCatalog {
    async fn search_albums(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        filter: Option<FacetFilter>,
    ) -> Result<ResultPage<SearchAlbum>> {
        albums_page(self.raw_search(query, SearchType::Album, limit, offset, filter).await?)
    }

    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        filter: Option<FacetFilter>,
    ) -> Result<ResultPage<SearchTrack>> {
        tracks_page(self.raw_search(query, SearchType::Track, limit, offset, filter).await?)
    }

    async fn search_artists(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        filter: Option<FacetFilter>,
    ) -> Result<ResultPage<SearchArtist>> {
        artists_page(self.raw_search(query, SearchType::Artist, limit, offset, filter).await?)
    }

    async fn search_playlists(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        filter: Option<FacetFilter>,
    ) -> Result<ResultPage<SearchPlaylist>> {
        playlists_page(self.raw_search(query, SearchType::Playlist, limit, offset, filter).await?)
    }

    async fn search_all(&self, query: &str) -> Result<CombinedResults> {
        let limit = self.combined_limit;

        // Spotify has no composite endpoint; fan out and join
        let (album_result, track_result, artist_result, playlist_result) = futures::join!(
            self.search_albums(query, limit, 0, None),
            self.search_tracks(query, limit, 0, None),
            self.search_artists(query, limit, 0, None),
            self.search_playlists(query, limit, 0, None)
        );

        let mut failures = Vec::new();
        let albums = page_or_empty("albums", album_result, &mut failures);
        let tracks = page_or_empty("tracks", track_result, &mut failures);
        let artists = page_or_empty("artists", artist_result, &mut failures);
        let playlists = page_or_empty("playlists", playlist_result, &mut failures);

        if failures.len() == 4 {
            return Err(failures.remove(0));
        }

        let most_popular = MostPopular::pick(
            query,
            &albums.items,
            &tracks.items,
            &artists.items,
            &playlists.items,
        );

        tracing::info!(
            query,
            tracks = tracks.items.len(),
            albums = albums.items.len(),
            artists = artists.items.len(),
            playlists = playlists.items.len(),
            most_popular = ?most_popular.as_ref().map(|p| p.category()),
            "Combined search completed"
        );

        Ok(CombinedResults {
            albums,
            tracks,
            artists,
            playlists,
            most_popular,
        })
    }
}
