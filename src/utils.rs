use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
use unicode_normalization::UnicodeNormalization;

use crate::types::{PlaylistItem, PlaylistTrack};

/// Spotify accepts verifiers between 43 and 128 characters; we always use
/// the maximum.
pub const CODE_VERIFIER_LENGTH: usize = 128;

pub fn generate_code_verifier(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

// Combining Diacritical Marks block
fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F)
}

/// Lowercases and strips diacritics via canonical decomposition, so that
/// "Beyoncé" and "beyonce" compare equal.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// A track matches when the normalized target occurs as a substring of at
/// least one normalized contributor name. Substring rather than exact
/// matching lets a shortened target ("Bey") find the full catalog name, at
/// the cost of false positives on overlapping names ("Nas" also matches
/// "Nasir"). Tracks without an artist list never match.
pub fn track_matches_artist(track: &PlaylistTrack, normalized_target: &str) -> bool {
    match &track.artists {
        Some(artists) => artists
            .iter()
            .any(|a| normalize_name(&a.name).contains(normalized_target)),
        None => false,
    }
}

/// Filters a playlist's items down to the tracks matching `artist_name`,
/// preserving playlist order and duplicates. Entries with a null track
/// object or a missing artist list are dropped up front.
pub fn filter_artist_tracks<'a>(items: &'a [PlaylistItem], artist_name: &str) -> Vec<&'a PlaylistTrack> {
    let target = normalize_name(artist_name);
    items
        .iter()
        .filter_map(|item| item.track.as_ref())
        .filter(|track| track_matches_artist(track, &target))
        .collect()
}

pub fn filter_artist_uris(items: &[PlaylistItem], artist_name: &str) -> Vec<String> {
    filter_artist_tracks(items, artist_name)
        .into_iter()
        .map(|track| track.uri.clone())
        .collect()
}
