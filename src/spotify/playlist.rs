use reqwest::Client;

use crate::{
    config,
    types::{
        AddTracksRequest, AddTracksResponse, CreatePlaylistRequest, CreatePlaylistResponse,
        PlaylistItem, PlaylistTracksResponse,
    },
};

/// Page size for track fetches and chunk size for track appends, the
/// maximum the API allows on both endpoints.
pub const PAGE_LIMIT: usize = 100;

/// Fetches the complete track listing of a playlist.
///
/// Requests pages of up to [`PAGE_LIMIT`] items at increasing offsets until
/// a page comes back empty. Termination is driven by that empty-page
/// observation rather than the declared `total`, which can be stale. Items
/// are concatenated in playlist order; an empty first page yields an empty
/// vec, which the caller treats as a graceful early stop.
pub async fn get_all_tracks(
    token: &str,
    playlist_id: &str,
) -> Result<Vec<PlaylistItem>, reqwest::Error> {
    let mut items: Vec<PlaylistItem> = Vec::new();
    let mut offset: usize = 0;

    loop {
        let api_url = format!(
            "{uri}/playlists/{id}/tracks?offset={offset}&limit={limit}",
            uri = &config::spotify_apiurl(),
            id = playlist_id,
            offset = offset,
            limit = PAGE_LIMIT
        );

        let client = Client::new();
        let response = client
            .get(&api_url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;

        let page = response.json::<PlaylistTracksResponse>().await?;
        if page.items.is_empty() {
            break;
        }

        items.extend(page.items);
        offset += PAGE_LIMIT;
    }

    Ok(items)
}

/// Creates a new private playlist owned by `user_id`.
///
/// The playlist must exist before any track is appended; the caller only
/// appends after this returned successfully.
pub async fn create(
    token: &str,
    user_id: &str,
    name: String,
) -> Result<CreatePlaylistResponse, reqwest::Error> {
    let api_url = format!(
        "{uri}/users/{user_id}/playlists",
        uri = &config::spotify_apiurl(),
        user_id = user_id
    );

    let body = CreatePlaylistRequest {
        name,
        description: format!("Created by {}", env!("CARGO_PKG_NAME")),
        public: false,
        collaborative: false,
    };

    let client = Client::new();
    let response = client
        .post(&api_url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?
        .error_for_status()?;

    response.json::<CreatePlaylistResponse>().await
}

/// Appends one chunk of track URIs to a playlist.
///
/// Callers split the full URI list into chunks of at most [`PAGE_LIMIT`]
/// and issue the calls in order; chunk order determines playlist order.
pub async fn add_tracks(
    token: &str,
    playlist_id: &str,
    uris: Vec<String>,
) -> Result<AddTracksResponse, reqwest::Error> {
    let api_url = format!(
        "{uri}/playlists/{id}/tracks",
        uri = &config::spotify_apiurl(),
        id = playlist_id
    );

    let client = Client::new();
    let response = client
        .post(&api_url)
        .bearer_auth(token)
        .json(&AddTracksRequest { uris })
        .send()
        .await?
        .error_for_status()?;

    response.json::<AddTracksResponse>().await
}
