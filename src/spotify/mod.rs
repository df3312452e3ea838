//! # Spotify Integration Module
//!
//! Interface to the Spotify Web API covering everything the extract pipeline
//! needs: authentication, user lookup, playlist reads and playlist writes.
//! It is the only layer that performs HTTP against Spotify; higher layers
//! deal in the typed payloads from [`crate::types`].
//!
//! ## Core Modules
//!
//! - [`auth`] - OAuth 2.0 PKCE flow: verifier/challenge setup, browser
//!   launch, local callback server, code-for-token exchange and a bounded
//!   wait for user consent.
//! - [`user`] - Current-user profile lookup, used to resolve the owner id
//!   for playlist creation.
//! - [`playlist`] - Paginated track fetch, playlist creation and batched
//!   track appends.
//!
//! ## Authentication Strategy
//!
//! The PKCE flow avoids storing a client secret entirely:
//!
//! 1. Generate a cryptographically random code verifier
//! 2. Derive the SHA256 code challenge and send the user to Spotify with it
//! 3. Receive the authorization code on the local callback server
//! 4. Exchange code + verifier for an access token
//!
//! The access token lives for the duration of the process; there is no
//! persistence and no refresh. One authorization attempt per run.
//!
//! ## Error Handling
//!
//! Provider failures are terminal for the run. Functions return
//! `reqwest::Error` for plain HTTP operations and `String` where the
//! failure can also be a malformed token response; the CLI layer decides
//! what to report. There is no automatic retry and no partial-state
//! cleanup: a playlist created before a failed append stays in place.
//!
//! ## API Coverage
//!
//! - `POST {token_url}` - authorization-code exchange
//! - `GET /me` - current user id
//! - `GET /playlists/{id}/tracks` - paginated track fetch (limit 100)
//! - `POST /users/{user_id}/playlists` - create private playlist
//! - `POST /playlists/{playlist_id}/tracks` - batch append (≤100 URIs)

pub mod auth;
pub mod playlist;
pub mod user;
