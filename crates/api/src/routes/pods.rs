use axum::routing::post;
use axum::Router;

use crate::handlers::pods;
use crate::state::AppState;

/// Pod routes mounted at `/pods`.
///
/// ```text
/// POST   /distribution      -> distribution
/// POST   /seating           -> seating
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/distribution", post(pods::distribution))
        .route("/seating", post(pods::seating))
}
