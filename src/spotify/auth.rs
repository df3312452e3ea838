use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    config,
    server::start_api_server,
    types::{AuthAttempt, AuthPhase, Token},
    utils, warning,
};

/// Scopes for the playlist-extraction flow: read the source playlist,
/// create and fill the private target playlist.
pub const SCOPES: &str = "playlist-read-private playlist-modify-private playlist-modify-public";

/// Upper bound on the consent wait. The flow is user-paced, but an
/// unattended run should fail with a clear message instead of hanging
/// forever on the callback.
const CONSENT_WAIT: Duration = Duration::from_secs(300);

/// Runs the complete OAuth 2.0 PKCE authentication flow with Spotify.
///
/// This function orchestrates the entire authentication process:
/// 1. Generating the PKCE code verifier and challenge
/// 2. Starting the local callback server
/// 3. Opening the authorization URL in the user's browser
/// 4. Waiting for the OAuth callback to resolve the attempt
///
/// The verifier is generated exactly once per attempt and stored in
/// `shared_state` before the browser opens, so the callback handler always
/// finds the same value that produced the challenge. PKCE binds the
/// authorization code to that verifier; presenting a different one makes
/// the provider reject the exchange.
///
/// # Arguments
///
/// * `shared_state` - Thread-safe slot shared with the callback handler,
///   carrying the verifier in and the resolved token (or failure) out
///
/// # Returns
///
/// The access token on success, or an error string when the user denied
/// access, the exchange failed, or the consent wait expired.
///
/// # Error Handling
///
/// - Browser launch failures produce a warning with the URL for manual use
/// - Callback and exchange failures surface as `Err` with the reason
/// - The wait expires after [`CONSENT_WAIT`] with an explicit timeout error
pub async fn auth(shared_state: Arc<Mutex<Option<AuthAttempt>>>) -> Result<Token, String> {
    // generate PKCE verifier and challenge
    let code_verifier = utils::generate_code_verifier(utils::CODE_VERIFIER_LENGTH);
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    // Store verifier in shared state before the callback can fire
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(AuthAttempt::new(code_verifier));
    }

    // start API server
    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        start_api_server(server_state).await;
    });

    // Construct the authorization URL
    let auth_url = format!(
        "{spotify_auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        spotify_auth_url = &config::spotify_apiauth_url(),
        client_id = &config::spotify_client_id(),
        redirect_uri = &config::spotify_redirect_uri(),
        code_challenge = code_challenge,
        scope = SCOPES.replace(' ', "%20")
    );

    // Open the authorization URL in the default browser
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    wait_for_token(shared_state).await
}

/// Waits for the OAuth callback to resolve the authorization attempt.
///
/// Polls the shared state once per second until the callback handler has
/// recorded a token or a failure, or until [`CONSENT_WAIT`] elapses. The
/// poll runs concurrently with the axum callback handler; the state is
/// accessed under the async mutex on both sides.
async fn wait_for_token(shared_state: Arc<Mutex<Option<AuthAttempt>>>) -> Result<Token, String> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < CONSENT_WAIT {
        let lock = shared_state.lock().await;
        if let Some(attempt) = lock.as_ref() {
            match &attempt.phase {
                AuthPhase::Received(token) => return Ok(token.clone()),
                AuthPhase::Failed(reason) => return Err(reason.clone()),
                AuthPhase::AwaitingCode => {}
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Err(format!(
        "authorization not completed within {} seconds",
        CONSENT_WAIT.as_secs()
    ))
}

/// Exchanges an authorization code for an access token using PKCE.
///
/// Completes the OAuth 2.0 PKCE flow by posting the form-encoded exchange
/// request to the token endpoint. The `code_verifier` must be the exact
/// value whose challenge opened the flow; the provider rejects the exchange
/// otherwise.
///
/// # Errors
///
/// A non-success status or a response body without an `access_token` field
/// is a terminal error for the run; there is no retry. The optional
/// `refresh_token` is parsed but unused in this design.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token, String> {
    let client_id = &config::spotify_client_id();
    let redirect_uri = &config::spotify_redirect_uri();

    let client = Client::new();
    let res = client
        .post(&config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri),
        ])
        .send()
        .await
        .map_err(|e| e.to_string())?
        .error_for_status()
        .map_err(|e| e.to_string())?;

    let json: Value = res.json().await.map_err(|e| e.to_string())?;

    let Some(access_token) = json["access_token"].as_str() else {
        return Err("token response is missing access_token".to_string());
    };

    Ok(Token {
        access_token: access_token.to_string(),
        refresh_token: json["refresh_token"].as_str().map(str::to_string),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
