use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;
use tokio::sync::Mutex;

use crate::{
    Res, error, info, spotify, success,
    types::{AuthAttempt, MatchTableRow},
    utils,
};

/// How a pipeline run ended. The two early stops are graceful outcomes,
/// not errors; each gets its own message at the CLI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    EmptyPlaylist,
    NoMatches,
    Created {
        playlist_id: String,
        name: String,
        matched: usize,
        batches: usize,
    },
}

/// The `extract` command: authenticate, then run the pipeline and report.
pub async fn extract(playlist_id: String, artist_name: String) {
    let auth_state: Arc<Mutex<Option<AuthAttempt>>> = Arc::new(Mutex::new(None));

    let token = match spotify::auth::auth(Arc::clone(&auth_state)).await {
        Ok(token) => token,
        Err(e) => error!("Authentication failed: {}", e),
    };
    success!("Authentication successful!");

    match run(&token.access_token, &playlist_id, &artist_name).await {
        Ok(ExtractOutcome::EmptyPlaylist) => {
            info!("The playlist is empty. Nothing to do.")
        }
        Ok(ExtractOutcome::NoMatches) => {
            info!("No tracks by {} were found in the playlist.", artist_name)
        }
        Ok(ExtractOutcome::Created {
            name,
            matched,
            batches,
            ..
        }) => {
            success!(
                "Playlist created: {} ({} tracks, {} batch(es))",
                name,
                matched,
                batches
            )
        }
        Err(e) => error!("Extraction failed: {}", e),
    }
}

/// Runs the fetch, filter and write stages against an existing token.
///
/// The new playlist is created only after the filter produced at least one
/// URI, and always before the first append. A failed append stops the run;
/// chunks appended earlier stay in the playlist (no rollback).
pub async fn run(token: &str, playlist_id: &str, artist_name: &str) -> Res<ExtractOutcome> {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching playlist tracks...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let items = match spotify::playlist::get_all_tracks(token, playlist_id).await {
        Ok(items) => {
            pb.finish_and_clear();
            items
        }
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    if items.is_empty() {
        return Ok(ExtractOutcome::EmptyPlaylist);
    }

    let matches = utils::filter_artist_tracks(&items, artist_name);
    if matches.is_empty() {
        return Ok(ExtractOutcome::NoMatches);
    }

    info!("Found {} tracks by {}", matches.len(), artist_name);

    let rows: Vec<MatchTableRow> = matches
        .iter()
        .map(|track| MatchTableRow {
            name: track.name.clone(),
            artists: track
                .artists
                .as_ref()
                .map(|artists| {
                    artists
                        .iter()
                        .map(|a| a.name.clone())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default(),
        })
        .collect();
    println!("{}", Table::new(rows));

    let uris: Vec<String> = matches.iter().map(|track| track.uri.clone()).collect();

    let user = spotify::user::current_user(token).await?;

    let playlist_name = format!("{} Songs", artist_name);
    let created = spotify::playlist::create(token, &user.id, playlist_name).await?;

    let mut batches = 0;
    for chunk in uris.chunks(spotify::playlist::PAGE_LIMIT) {
        spotify::playlist::add_tracks(token, &created.id, chunk.to_vec()).await?;
        batches += 1;
    }

    Ok(ExtractOutcome::Created {
        playlist_id: created.id,
        name: created.name,
        matched: uris.len(),
        batches,
    })
}
