use std::sync::Mutex;

use mockito::{Matcher, Server};
use serde_json::{Value, json};

use spartcli::cli::{ExtractOutcome, run};
use spartcli::spotify;

// The Spotify base URL is taken from the environment, so tests pointing it
// at their own mock server must not run interleaved.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn set_api_base(url: &str) {
    unsafe { std::env::set_var("SPOTIFY_API_URL", url) };
}

fn track_json(uri: &str, artist: &str) -> Value {
    json!({
        "track": {
            "uri": uri,
            "name": format!("Track {}", uri),
            "artists": [{ "name": artist }]
        }
    })
}

fn page_body(items: &[Value], total: usize) -> String {
    json!({ "items": items, "total": total }).to_string()
}

fn mock_tracks_page(
    server: &mut Server,
    playlist_id: &str,
    offset: usize,
    body: String,
) -> mockito::Mock {
    server
        .mock("GET", format!("/playlists/{}/tracks", playlist_id).as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("offset".into(), offset.to_string()),
            Matcher::UrlEncoded("limit".into(), "100".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(1)
        .create()
}

#[test]
fn pagination_terminates_on_empty_page_and_preserves_order() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    // Create mock server outside of any tokio runtime
    let mut server = Server::new();
    set_api_base(&server.url());

    let pages: Vec<Vec<Value>> = vec![
        (0..100).map(|i| track_json(&format!("spotify:track:{i}"), "Someone")).collect(),
        (100..200).map(|i| track_json(&format!("spotify:track:{i}"), "Someone")).collect(),
        (200..250).map(|i| track_json(&format!("spotify:track:{i}"), "Someone")).collect(),
    ];

    // Declared total is deliberately wrong; termination must come from the
    // empty page, not the count.
    let m0 = mock_tracks_page(&mut server, "pl1", 0, page_body(&pages[0], 9999));
    let m1 = mock_tracks_page(&mut server, "pl1", 100, page_body(&pages[1], 9999));
    let m2 = mock_tracks_page(&mut server, "pl1", 200, page_body(&pages[2], 9999));
    let m3 = mock_tracks_page(&mut server, "pl1", 300, page_body(&[], 9999));

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let items = spotify::playlist::get_all_tracks("test-token", "pl1")
            .await
            .unwrap();

        assert_eq!(items.len(), 250);
        assert_eq!(
            items[0].track.as_ref().unwrap().uri,
            "spotify:track:0".to_string()
        );
        assert_eq!(
            items[249].track.as_ref().unwrap().uri,
            "spotify:track:249".to_string()
        );
    });

    // ceil(250/100) pages plus the terminating empty page
    m0.assert();
    m1.assert();
    m2.assert();
    m3.assert();
}

#[test]
fn pagination_exact_multiple_needs_one_extra_request() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let mut server = Server::new();
    set_api_base(&server.url());

    let full: Vec<Value> = (0..100)
        .map(|i| track_json(&format!("spotify:track:{i}"), "Someone"))
        .collect();

    let m0 = mock_tracks_page(&mut server, "pl2", 0, page_body(&full, 100));
    let m1 = mock_tracks_page(&mut server, "pl2", 100, page_body(&[], 100));

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let items = spotify::playlist::get_all_tracks("test-token", "pl2")
            .await
            .unwrap();
        assert_eq!(items.len(), 100);
    });

    m0.assert();
    m1.assert();
}

#[test]
fn end_to_end_creates_private_playlist_with_matches() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let mut server = Server::new();
    set_api_base(&server.url());

    // 250 entries: 7 by the target artist (one with an accented name),
    // one null track, one track without an artist list, rest background.
    let match_indices = [3usize, 57, 120, 150, 199, 201, 230];
    let mut items: Vec<Value> = Vec::new();
    for i in 0..250usize {
        let uri = format!("spotify:track:{i}");
        if i == 10 {
            items.push(json!({ "track": null }));
        } else if i == 11 {
            items.push(json!({ "track": { "uri": uri, "name": "no artists" } }));
        } else if i == 120 {
            items.push(track_json(&uri, "Artíst X"));
        } else if match_indices.contains(&i) {
            items.push(track_json(&uri, "Artist X"));
        } else {
            items.push(track_json(&uri, &format!("Background Act {i}")));
        }
    }

    let expected_uris: Vec<String> = match_indices
        .iter()
        .map(|i| format!("spotify:track:{i}"))
        .collect();

    let m_p0 = mock_tracks_page(&mut server, "source", 0, page_body(&items[0..100], 250));
    let m_p1 = mock_tracks_page(&mut server, "source", 100, page_body(&items[100..200], 250));
    let m_p2 = mock_tracks_page(&mut server, "source", 200, page_body(&items[200..250], 250));
    let m_p3 = mock_tracks_page(&mut server, "source", 300, page_body(&[], 250));

    let m_me = server
        .mock("GET", "/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "id": "user123" }).to_string())
        .expect(1)
        .create();

    let m_create = server
        .mock("POST", "/users/user123/playlists")
        .match_body(Matcher::PartialJson(json!({
            "name": "Artist X Songs",
            "public": false
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({ "id": "newpl", "name": "Artist X Songs" }).to_string())
        .expect(1)
        .create();

    let m_add = server
        .mock("POST", "/playlists/newpl/tracks")
        .match_body(Matcher::Json(json!({ "uris": expected_uris })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({ "snapshot_id": "s1" }).to_string())
        .expect(1)
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let outcome = run("test-token", "source", "Artist X").await.unwrap();

        assert_eq!(
            outcome,
            ExtractOutcome::Created {
                playlist_id: "newpl".to_string(),
                name: "Artist X Songs".to_string(),
                matched: 7,
                batches: 1,
            }
        );
    });

    m_p0.assert();
    m_p1.assert();
    m_p2.assert();
    m_p3.assert();
    m_me.assert();
    m_create.assert();
    m_add.assert();
}

#[test]
fn empty_playlist_ends_early_without_creating_anything() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let mut server = Server::new();
    set_api_base(&server.url());

    let m_p0 = mock_tracks_page(&mut server, "empty", 0, page_body(&[], 0));

    let m_me = server.mock("GET", "/me").expect(0).create();
    let m_create = server
        .mock("POST", "/users/user123/playlists")
        .expect(0)
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let outcome = run("test-token", "empty", "Artist X").await.unwrap();
        assert_eq!(outcome, ExtractOutcome::EmptyPlaylist);
    });

    m_p0.assert();
    m_me.assert();
    m_create.assert();
}

#[test]
fn no_match_ends_early_without_creating_anything() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let mut server = Server::new();
    set_api_base(&server.url());

    let items: Vec<Value> = (0..5)
        .map(|i| track_json(&format!("spotify:track:{i}"), "Someone Else"))
        .collect();

    let m_p0 = mock_tracks_page(&mut server, "pl3", 0, page_body(&items, 5));
    let m_p1 = mock_tracks_page(&mut server, "pl3", 100, page_body(&[], 5));

    let m_me = server.mock("GET", "/me").expect(0).create();
    let m_create = server
        .mock("POST", "/users/user123/playlists")
        .expect(0)
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let outcome = run("test-token", "pl3", "Artist X").await.unwrap();
        assert_eq!(outcome, ExtractOutcome::NoMatches);
    });

    m_p0.assert();
    m_p1.assert();
    m_me.assert();
    m_create.assert();
}

#[test]
fn appends_run_in_chunks_of_at_most_100() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let mut server = Server::new();
    set_api_base(&server.url());

    // 150 matching tracks across two pages -> one full chunk plus one rest
    let items: Vec<Value> = (0..150)
        .map(|i| track_json(&format!("spotify:track:{i}"), "Artist X"))
        .collect();
    let uris: Vec<String> = (0..150).map(|i| format!("spotify:track:{i}")).collect();

    let m_p0 = mock_tracks_page(&mut server, "pl4", 0, page_body(&items[0..100], 150));
    let m_p1 = mock_tracks_page(&mut server, "pl4", 100, page_body(&items[100..150], 150));
    let m_p2 = mock_tracks_page(&mut server, "pl4", 200, page_body(&[], 150));

    let m_me = server
        .mock("GET", "/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "id": "user123" }).to_string())
        .expect(1)
        .create();

    let m_create = server
        .mock("POST", "/users/user123/playlists")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({ "id": "bigpl", "name": "Artist X Songs" }).to_string())
        .expect(1)
        .create();

    let m_add_first = server
        .mock("POST", "/playlists/bigpl/tracks")
        .match_body(Matcher::Json(json!({ "uris": &uris[0..100] })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({ "snapshot_id": "s1" }).to_string())
        .expect(1)
        .create();

    let m_add_rest = server
        .mock("POST", "/playlists/bigpl/tracks")
        .match_body(Matcher::Json(json!({ "uris": &uris[100..150] })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({ "snapshot_id": "s2" }).to_string())
        .expect(1)
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let outcome = run("test-token", "pl4", "Artist X").await.unwrap();

        match outcome {
            ExtractOutcome::Created {
                matched, batches, ..
            } => {
                assert_eq!(matched, 150);
                assert_eq!(batches, 2);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    });

    m_p0.assert();
    m_p1.assert();
    m_p2.assert();
    m_me.assert();
    m_create.assert();
    m_add_first.assert();
    m_add_rest.assert();
}

#[test]
fn fetch_failure_propagates_as_error() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let mut server = Server::new();
    set_api_base(&server.url());

    let m_p0 = server
        .mock("GET", "/playlists/boom/tracks")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("offset".into(), "0".into()),
            Matcher::UrlEncoded("limit".into(), "100".into()),
        ]))
        .with_status(500)
        .expect(1)
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let result = run("test-token", "boom", "Artist X").await;
        assert!(result.is_err());
    });

    m_p0.assert();
}
