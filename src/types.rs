use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Progress of a single authorization attempt.
///
/// `AwaitingCode` from the moment the authorization URL is opened until the
/// callback fires; `Received` once the code was exchanged for a token;
/// `Failed` when the provider returned no code or the exchange was rejected.
#[derive(Debug, Clone)]
pub enum AuthPhase {
    AwaitingCode,
    Received(Token),
    Failed(String),
}

/// Shared state between the auth flow and the callback handler.
///
/// The code verifier is generated once per attempt and must be the exact
/// value presented to the token endpoint later; a mismatch is only
/// detectable by the provider rejecting the exchange.
#[derive(Debug, Clone)]
pub struct AuthAttempt {
    pub code_verifier: String,
    pub phase: AuthPhase,
}

impl AuthAttempt {
    pub fn new(code_verifier: String) -> Self {
        AuthAttempt {
            code_verifier,
            phase: AuthPhase::AwaitingCode,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<PlaylistItem>,
    pub total: Option<u64>,
}

/// One entry of a playlist page. `track` is null for entries the provider
/// can no longer resolve (removed or region-blocked tracks).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<PlaylistTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrack {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub artists: Option<Vec<TrackArtist>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksResponse {
    pub snapshot_id: String,
}

#[derive(Tabled)]
pub struct MatchTableRow {
    pub name: String,
    pub artists: String,
}
