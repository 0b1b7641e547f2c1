pub mod health;
pub mod pods;
pub mod scorecards;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /pods/distribution                               pod counts for a check-in total
/// /pods/seating                                    seat participants into pods
///
/// /scorecards/reconcile                            earned-achievement changes
/// /scorecards/initial-values                       form state from persisted records
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/pods", pods::router())
        .nest("/scorecards", scorecards::router())
}
