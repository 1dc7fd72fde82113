//! HTTP surface: routes, shared state and the serve loop.

pub mod assets;
pub mod hook;
pub mod packages;
pub mod rpc;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use exn::ResultExt;
use rpkg_build::Makepkg;
use rpkg_config::Config;
use rpkg_index::{IndexCache, QueryEngine};
use rpkg_storage::{Git, Overlays};
use tokio::net::TcpListener;

use crate::error::{ErrorKind, Result};

/// Everything a request handler needs, cheap to clone per request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: QueryEngine,
    pub makepkg: Arc<Makepkg>,
    /// Absent when no `git` executable could be found; webhooks then only
    /// invalidate.
    pub git: Option<Arc<Git>>,
    pub static_dir: Arc<PathBuf>,
}
impl AppState {
    pub fn new(cache: Arc<IndexCache>, makepkg: Makepkg, git: Option<Git>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine: QueryEngine::new(cache),
            makepkg: Arc::new(makepkg),
            git: git.map(Arc::new),
            static_dir: Arc::new(static_dir.into()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let overlays = Overlays::new(&config.overlays);
        tracing::info!(overlays = %overlays.root().display(), "Serving overlays");
        let cache = Arc::new(IndexCache::with_lines_to_parse(overlays, config.lines_to_parse));
        let makepkg = Makepkg::discover(&config.makepkg).unwrap_or_else(|err| {
            tracing::warn!(
                makepkg = %config.makepkg.display(),
                error = ?err,
                "Build tool not found; archive requests will fail"
            );
            Makepkg::new(&config.makepkg)
        });
        let git = Git::discover()
            .inspect_err(|err| tracing::warn!(error = ?err, "Webhooks will not update overlays"))
            .ok();
        Self::new(cache, makepkg, git, &config.static_dir)
    }

    pub fn overlays(&self) -> &Overlays {
        self.engine.cache().overlays()
    }
}

/// All routes, mounted under `prefix` (or at the root when it is empty).
pub fn router(state: AppState, prefix: &str) -> Router {
    let routes = Router::new()
        .route("/github-hook", post(hook::github))
        .route("/static/*path", get(assets::serve))
        .route("/:overlay/rpc.php", get(rpc::rpc))
        .route("/:overlay/packages/:package/:filename", get(packages::archive))
        .with_state(state);
    match prefix {
        "" => routes,
        prefix => Router::new().nest(prefix, routes),
    }
}

/// Serves until Ctrl-C is received.
pub async fn run(config: Config) -> Result<()> {
    let app = router(AppState::from_config(&config), &config.prefix);
    let listener = TcpListener::bind(&config.listen)
        .await
        .or_raise(|| ErrorKind::Bind(config.listen.clone()))?;
    tracing::info!(listen = %config.listen, prefix = %config.prefix, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .or_raise(|| ErrorKind::Serve)?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down"),
        Err(err) => tracing::error!(error = %err, "Could not listen for Ctrl-C; shutting down"),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use url::form_urlencoded;

    /// An overlays root with overlay `main` holding `cups-xerox`, plus an
    /// empty static directory, wired into an [`AppState`].
    pub(crate) struct Fixture {
        pub tmp: TempDir,
        pub state: AppState,
    }
    impl Fixture {
        pub fn new() -> Self {
            Self::with_makepkg(Makepkg::new("/nonexistent/makepkg"))
        }

        pub fn with_makepkg(makepkg: Makepkg) -> Self {
            let tmp = TempDir::new().unwrap();
            let recipe = "pkgver=1.0\npkgrel=2\npkgdesc='Xerox drivers'\n";
            write_recipe(&tmp.path().join("overlays"), "main", "cups-xerox", recipe);
            fs::create_dir_all(tmp.path().join("static")).unwrap();
            let cache = Arc::new(IndexCache::new(Overlays::new(tmp.path().join("overlays"))));
            let state = AppState::new(cache, makepkg, None, tmp.path().join("static"));
            Self { tmp, state }
        }

        pub fn root(&self) -> &Path {
            self.tmp.path()
        }
    }

    pub(crate) fn write_recipe(root: &Path, overlay: &str, package: &str, recipe: &str) {
        let dir = root.join(overlay).join(package);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(rpkg_storage::RECIPE_FILENAME), recipe).unwrap();
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_routes_under_prefix() {
        let fixture = Fixture::new();
        fs::write(fixture.root().join("static/site.css"), "body {}").unwrap();
        let app = router(fixture.state.clone(), "/aur");

        let (status, body) = send(app.clone(), get("/aur/main/rpc.php?type=info&arg=cups-xerox")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#""resultcount":1"#), "{body}");
        assert!(body.contains(r#""Name":"cups-xerox""#), "{body}");

        let (status, body) = send(app.clone(), get("/aur/main/packages/cups-xerox/cups-xerox.tar.gz")).await;
        assert_eq!((status, body.as_str()), (StatusCode::OK, packages::ERROR_BODY));

        let (status, body) = send(app.clone(), get("/aur/static/site.css")).await;
        assert_eq!((status, body.as_str()), (StatusCode::OK, "body {}"));
        let (status, _) = send(app.clone(), get("/aur/static/missing.css")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let payload = serde_json::json!({ "repository": { "name": "main", "url": "https://example.org/main" } });
        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair("payload", &payload.to_string())
            .finish();
        let hook = Request::builder()
            .method(Method::POST)
            .uri("/aur/github-hook")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        let (status, body) = send(app.clone(), hook).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<pre>name=main<br>url=https://example.org/main");

        let (status, _) = send(app, get("/main/rpc.php?type=info&arg=cups-xerox")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_routes_without_prefix() {
        let fixture = Fixture::new();
        let app = router(fixture.state.clone(), "");

        let (status, body) = send(app.clone(), get("/main/rpc.php?type=search&arg=xerox")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#""resultcount":1"#), "{body}");

        let (status, _) = send(app, get("/aur/main/rpc.php?type=search&arg=xerox")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
