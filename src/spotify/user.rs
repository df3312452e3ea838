use reqwest::Client;

use crate::{config, types::UserProfile};

/// Retrieves the profile of the user the access token belongs to.
///
/// The returned id is the owner under which the new playlist is created.
pub async fn current_user(token: &str) -> Result<UserProfile, reqwest::Error> {
    let api_url = format!("{uri}/me", uri = &config::spotify_apiurl());

    let client = Client::new();
    let response = client
        .get(&api_url)
        .bearer_auth(token)
        .send()
        .await?
        .error_for_status()?;

    response.json::<UserProfile>().await
}
