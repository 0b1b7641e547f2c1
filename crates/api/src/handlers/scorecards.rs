//! Handlers for scorecard reconciliation.
//!
//! The front-end fetches a pod's earned achievements from the league API,
//! posts them here alongside the edited scorecard, and forwards the
//! returned changes to the league API's upsert endpoint.

use axum::response::IntoResponse;
use axum::Json;
use league_core::achievements::PodAchievementsSnapshot;
use league_core::colors::Color;
use league_core::scorecard::{self, ScorecardSubmission};
use league_core::types::DbId;
use league_core::validation;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::response::DataResponse;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct ReconcileRequest {
    pub round_id: DbId,
    pub pod_id: DbId,
    #[validate(length(min = 1, max = 5))]
    pub participant_ids: Vec<DbId>,
    /// The league's color table.
    #[serde(default)]
    pub colors: Vec<Color>,
    /// Persisted state for the pod; omitted for a first submission.
    #[serde(default)]
    pub snapshot: PodAchievementsSnapshot,
    pub submission: ScorecardSubmission,
}

#[derive(Debug, Deserialize)]
pub struct InitialValuesRequest {
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub snapshot: PodAchievementsSnapshot,
}

// ---------------------------------------------------------------------------
// POST /scorecards/reconcile
// ---------------------------------------------------------------------------

/// Compute the earned-achievement changes for a submitted scorecard.
pub async fn reconcile(Json(body): Json<ReconcileRequest>) -> AppResult<impl IntoResponse> {
    body.validate()?;
    validation::validate_snapshot(&body.snapshot)?;
    validation::validate_submission(&body.submission, &body.participant_ids)?;

    let result = scorecard::reconcile(
        &body.submission,
        &body.snapshot,
        body.round_id,
        &body.colors,
        &body.participant_ids,
        body.pod_id,
    );

    tracing::info!(
        round_id = body.round_id,
        pod_id = body.pod_id,
        created = result.to_create.len(),
        updated = result.to_update.len(),
        "Reconciled scorecard"
    );

    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// POST /scorecards/initial-values
// ---------------------------------------------------------------------------

/// Rebuild the scorecard form state from a pod's persisted records.
///
/// `data` is `null` when the pod has no recorded outcome yet.
pub async fn initial_values(
    Json(body): Json<InitialValuesRequest>,
) -> AppResult<impl IntoResponse> {
    validation::validate_snapshot(&body.snapshot)?;

    let submission = scorecard::initial_submission(&body.snapshot, &body.colors);

    Ok(Json(DataResponse { data: submission }))
}
