//! # API Module
//!
//! HTTP endpoints for the local callback server that backs the OAuth 2.0
//! PKCE flow. The server exists for exactly one purpose per run: receiving
//! the authorization code Spotify redirects back to us.
//!
//! ## Endpoints
//!
//! - [`callback`] - Handles the OAuth redirect from Spotify's authorization
//!   server. Completes the PKCE flow by exchanging the authorization code for
//!   an access token and records the outcome in the shared auth state.
//! - [`health`] - Returns application status and version for quick checks
//!   that the listener is up.
//!
//! ## Behavior
//!
//! The callback processes at most one real exchange per run. A request
//! without a `code` query parameter marks the attempt as failed and ends the
//! run; a second request after a resolved attempt is answered without
//! another exchange.
//!
//! Built on the [Axum](https://docs.rs/axum) web framework; see
//! [`crate::server`] for the router setup.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
