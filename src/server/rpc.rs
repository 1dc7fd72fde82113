//! `rpc.php`: the AUR query endpoint.

use axum::Json;
use axum::extract::{Path, RawQuery, State};
use rpkg_index::{Query, Response};
use url::form_urlencoded;

use super::AppState;

/// Parses the raw query string itself, so that repeated `arg[]` keys all
/// survive in request order.
pub async fn rpc(
    State(state): State<AppState>,
    Path(overlay): Path<String>,
    RawQuery(query): RawQuery,
) -> Json<Response> {
    let query = Query::from_pairs(form_urlencoded::parse(query.unwrap_or_default().as_bytes()));
    tracing::debug!(%overlay, ?query, "RPC query");
    Json(state.engine.handle(&overlay, &query).await)
}
