//! Static files from the configured directory.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use super::AppState;

pub async fn serve(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    let Ok(relative) = rpkg_storage::validate_path(&path) else {
        tracing::warn!(%path, "Rejected static path");
        return StatusCode::NOT_FOUND.into_response();
    };
    let path = state.static_dir.join(&relative);
    match open(&path).await {
        Ok(file) => {
            ([(header::CONTENT_TYPE, content_type(&relative))], Body::from_stream(ReaderStream::new(file)))
                .into_response()
        },
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "Static file unavailable");
            StatusCode::NOT_FOUND.into_response()
        },
    }
}

/// Opens a regular file; directories count as missing.
async fn open(path: &std::path::Path) -> std::io::Result<File> {
    let file = File::open(path).await?;
    match file.metadata().await?.is_file() {
        true => Ok(file),
        false => Err(std::io::ErrorKind::NotFound.into()),
    }
}

fn content_type(path: &std::path::Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::tests::Fixture;
    use rstest::rstest;
    use std::fs;

    async fn get(fixture: &Fixture, path: &str) -> Response {
        serve(State(fixture.state.clone()), Path(path.to_string())).await
    }

    #[tokio::test]
    async fn test_serves_file() {
        let fixture = Fixture::new();
        fs::create_dir_all(fixture.root().join("static/css")).unwrap();
        fs::write(fixture.root().join("static/css/site.css"), "body {}").unwrap();
        let response = get(&fixture, "css/site.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css; charset=utf-8");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"body {}");
    }

    #[rstest]
    #[case("missing.css")]
    #[case("../overlays/main/cups-xerox/PKGBUILD")]
    #[case("css/../../overlays/main/cups-xerox/PKGBUILD")]
    #[case("")]
    #[case("css")]
    #[tokio::test]
    async fn test_not_found(#[case] path: &str) {
        let fixture = Fixture::new();
        fs::create_dir_all(fixture.root().join("static/css")).unwrap();
        assert_eq!(get(&fixture, path).await.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(std::path::Path::new("a/index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type(std::path::Path::new("archive.tar.gz")), "application/octet-stream");
    }
}
