//! Guards run before reconciliation.
//!
//! The reconciler trusts its input. These checks reject scorecards that name
//! players outside the pod and snapshots that break the draw/winner
//! exclusivity.

use std::collections::HashSet;

use crate::achievements::{AchievementKind, PodAchievementsSnapshot};
use crate::error::CoreError;
use crate::scorecard::{ScorecardOutcome, ScorecardSubmission};
use crate::types::DbId;

/// Validate a submitted scorecard against the pod's participants.
pub fn validate_submission(
    submission: &ScorecardSubmission,
    participant_ids: &[DbId],
) -> Result<(), CoreError> {
    let pod: HashSet<DbId> = participant_ids.iter().copied().collect();

    for (slug, participants) in &submission.general {
        if let Some(outsider) = participants.iter().find(|p| !pod.contains(*p)) {
            return Err(CoreError::Validation(format!(
                "Participant {outsider} credited with {slug} is not in the pod"
            )));
        }
    }

    if let ScorecardOutcome::Winner(winner) = &submission.outcome {
        if !pod.contains(&winner.participant_id) {
            return Err(CoreError::Validation(format!(
                "Winner {} is not in the pod",
                winner.participant_id
            )));
        }

        let mut temp_ids = HashSet::new();
        if let Some(dup) = winner
            .picked
            .iter()
            .find(|p| !temp_ids.insert(p.temp_id.as_str()))
        {
            return Err(CoreError::Validation(format!(
                "Achievement entry {} appears more than once",
                dup.temp_id
            )));
        }
    }

    Ok(())
}

/// Reject a snapshot that records both a draw and a winner, or more than one
/// color-identity win.
pub fn validate_snapshot(snapshot: &PodAchievementsSnapshot) -> Result<(), CoreError> {
    if snapshot.is_draw() {
        if let Some(winner) = snapshot.winning_participant() {
            return Err(CoreError::Conflict(format!(
                "Pod records a draw and winner {winner}"
            )));
        }
    }

    let color_wins = snapshot
        .records
        .iter()
        .filter(|r| matches!(r.kind(), AchievementKind::ColorWin(_)))
        .count();
    if color_wins > 1 {
        return Err(CoreError::Conflict(format!(
            "Pod records {color_wins} color-identity wins"
        )));
    }

    Ok(())
}
