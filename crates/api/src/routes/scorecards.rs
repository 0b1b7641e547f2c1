use axum::routing::post;
use axum::Router;

use crate::handlers::scorecards;
use crate::state::AppState;

/// Scorecard routes mounted at `/scorecards`.
///
/// ```text
/// POST   /reconcile         -> reconcile
/// POST   /initial-values    -> initial_values
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reconcile", post(scorecards::reconcile))
        .route("/initial-values", post(scorecards::initial_values))
}
