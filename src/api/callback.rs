use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{
    spotify,
    types::{AuthAttempt, AuthPhase},
    warning,
};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<AuthAttempt>>>>,
) -> Html<&'static str> {
    let mut state = shared_state.lock().await;
    let Some(ref mut attempt) = state.as_mut() else {
        return Html("<h4>No authorization attempt in progress.</h4>");
    };

    // Only one real exchange per run; a repeated hit after resolution is
    // answered from the recorded phase.
    match attempt.phase {
        AuthPhase::Received(_) => {
            return Html("<h2>Authentication successful.</h2><p>Close the browser window.</p>");
        }
        AuthPhase::Failed(_) => return Html("<h4>Login failed.</h4>"),
        AuthPhase::AwaitingCode => {}
    }

    let Some(code) = params.get("code") else {
        attempt.phase = AuthPhase::Failed("no code returned to callback".to_string());
        return Html("<h4>No code returned.</h4>");
    };

    let verifier = attempt.code_verifier.clone();

    match spotify::auth::exchange_code_pkce(code, &verifier).await {
        Ok(token) => {
            attempt.phase = AuthPhase::Received(token);
            Html("<h2>Authentication successful.</h2><p>Close the browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            attempt.phase = AuthPhase::Failed(e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
