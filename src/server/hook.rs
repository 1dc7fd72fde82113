//! GitHub push webhook: pull the overlay and drop its cached index.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::response::Html;
use exn::{OptionExt, ResultExt};
use serde::Deserialize;

use super::AppState;
use crate::error::{ErrorKind, Result};

#[derive(Debug, Deserialize)]
struct Payload {
    repository: Repository,
}

/// The parts of a push event the hook acts on. The repository name is the
/// overlay name.
#[derive(Debug, Deserialize)]
struct Repository {
    name: String,
    url: String,
}
impl Repository {
    fn from_form(form: std::result::Result<Form<HashMap<String, String>>, FormRejection>) -> Result<Self> {
        let Form(form) = form.or_raise(|| ErrorKind::MalformedWebhook)?;
        let payload = form.get("payload").ok_or_raise(|| ErrorKind::MalformedWebhook)?;
        let payload: Payload = serde_json::from_str(payload).or_raise(|| ErrorKind::MalformedWebhook)?;
        Ok(payload.repository)
    }
}

/// Malformed requests are logged and answered with an empty body.
pub async fn github(
    State(state): State<AppState>,
    form: std::result::Result<Form<HashMap<String, String>>, FormRejection>,
) -> Html<String> {
    let repository = match Repository::from_form(form) {
        Ok(repository) => repository,
        Err(err) => {
            tracing::error!(error = ?err, "Ignoring webhook");
            return Html(String::new());
        },
    };
    tracing::info!(name = %repository.name, url = %repository.url, "Webhook received");
    update(&state, &repository.name).await;
    Html(format!("<pre>name={}<br>url={}", escape(&repository.name), escape(&repository.url)))
}

/// Runs the git update, then invalidates whether or not it worked.
async fn update(state: &AppState, overlay: &str) {
    match state.git.as_ref().map(Arc::clone) {
        Some(git) => {
            let overlays = state.overlays().clone();
            let name = overlay.to_string();
            match tokio::task::spawn_blocking(move || overlays.update(&git, &name)).await {
                Ok(Ok(())) => tracing::info!(%overlay, "Overlay updated"),
                Ok(Err(err)) => tracing::error!(%overlay, error = ?err, "Overlay update failed"),
                Err(err) => tracing::error!(%overlay, error = %err, "Overlay update task failed"),
            }
        },
        None => tracing::warn!(%overlay, "No git executable; skipping update"),
    }
    if state.engine.cache().invalidate(overlay).await {
        tracing::info!(%overlay, "Index invalidated");
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}
