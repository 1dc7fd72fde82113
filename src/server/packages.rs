//! Source archive downloads, built on demand.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use exn::ResultExt;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use super::AppState;
use crate::error::{ErrorKind, Result};

/// Body sent, with a `200`, whenever an archive can't be produced. AUR
/// helpers only look at the payload.
pub const ERROR_BODY: &str = "error";

/// Builds the requested package and streams the resulting archive.
///
/// The trailing file name is whatever the client asked for; the archive
/// served is the one the build tool reports.
pub async fn archive(
    State(state): State<AppState>,
    Path((overlay, package, filename)): Path<(String, String, String)>,
) -> Response {
    tracing::info!(%overlay, %package, %filename, "Archive requested");
    match open(&state, overlay.clone(), package.clone()).await {
        Ok(file) => {
            ([(header::CONTENT_TYPE, "application/octet-stream")], Body::from_stream(ReaderStream::new(file)))
                .into_response()
        },
        Err(err) => {
            tracing::error!(%overlay, %package, error = ?err, "Could not serve archive");
            ERROR_BODY.into_response()
        },
    }
}

async fn open(state: &AppState, overlay: String, package: String) -> Result<File> {
    let overlays = state.overlays().clone();
    let makepkg = Arc::clone(&state.makepkg);
    let path = tokio::task::spawn_blocking(move || -> Result<PathBuf> {
        let dir = overlays.package_dir(&overlay, &package).or_raise(|| ErrorKind::Storage)?;
        let output = makepkg.build(&dir).or_raise(|| ErrorKind::Build)?;
        overlays.resolve_output(&output).or_raise(|| ErrorKind::Storage)
    })
    .await
    .or_raise(|| ErrorKind::Task)??;
    tracing::debug!(path = %path.display(), "Streaming archive");
    File::open(&path).await.or_raise(|| ErrorKind::Storage)
}
