//! # CLI Module
//!
//! User-facing command implementations. There is exactly one real command:
//! [`extract`], which runs the whole flow from OAuth consent to the freshly
//! created playlist.
//!
//! ## Pipeline
//!
//! ```text
//! authorization (PKCE, browser consent)
//!     ↓
//! token exchange
//!     ↓
//! paginated playlist fetch
//!     ↓
//! artist filter (substring, diacritic-insensitive)
//!     ↓
//! playlist creation + batched appends
//! ```
//!
//! The stages run strictly sequentially; no stage starts before its
//! predecessor completed. Two early stops are graceful, not errors: an
//! empty source playlist and a filter that matches nothing. Both end the
//! run before any playlist is created, with distinct messages. Every other
//! provider failure bubbles to the single top-level handler in [`extract`],
//! which reports it and stops; an already-created playlist is left in
//! place.
//!
//! [`run`] is the pipeline behind the command, taking an already-obtained
//! access token so it can be driven against a mock API in tests.

mod extract;

pub use extract::ExtractOutcome;
pub use extract::extract;
pub use extract::run;
