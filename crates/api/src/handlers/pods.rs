//! Handlers for round pod partitioning.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use league_core::error::CoreError;
use league_core::pods::{self, PodDistribution};
use league_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DistributionRequest {
    pub participant_count: u32,
}

#[derive(Debug, Serialize)]
pub struct DistributionResponse {
    #[serde(flatten)]
    pub distribution: PodDistribution,
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct SeatingRequest {
    pub participant_ids: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct SeatingResponse {
    pub pods: Vec<Vec<DbId>>,
    pub summary: String,
}

/// Reject check-in totals above the configured round size.
fn check_round_size(state: &AppState, count: usize) -> Result<u32, CoreError> {
    let max = state.config.max_round_participants;
    match u32::try_from(count) {
        Ok(count) if count <= max => Ok(count),
        _ => Err(CoreError::Validation(format!(
            "A round accepts at most {max} participants, got {count}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// POST /pods/distribution
// ---------------------------------------------------------------------------

/// Report how many pods of each size a participant count splits into.
///
/// Too few participants is a normal response with `status: "insufficient"`.
pub async fn distribution(
    State(state): State<AppState>,
    Json(body): Json<DistributionRequest>,
) -> AppResult<impl IntoResponse> {
    let count = check_round_size(&state, body.participant_count as usize)?;

    let distribution = pods::distribute_pods(count);
    tracing::info!(participant_count = count, %distribution, "Computed pod distribution");

    Ok(Json(DataResponse {
        data: DistributionResponse {
            summary: distribution.to_string(),
            distribution,
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /pods/seating
// ---------------------------------------------------------------------------

/// Seat an ordered list of checked-in participants into pods.
pub async fn seating(
    State(state): State<AppState>,
    Json(body): Json<SeatingRequest>,
) -> AppResult<impl IntoResponse> {
    let count = check_round_size(&state, body.participant_ids.len())?;

    let seated = pods::seat_participants(&body.participant_ids)?;
    tracing::info!(participant_count = count, pods = seated.len(), "Seated round");

    Ok(Json(DataResponse {
        data: SeatingResponse {
            pods: seated,
            summary: pods::distribute_pods(count).to_string(),
        },
    }))
}
