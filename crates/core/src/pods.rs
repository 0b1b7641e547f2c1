//! Pod partitioning for a round.
//!
//! Splits the checked-in participants of a round into pods of 3, 4 or 5
//! players, favouring larger pods, and seats an ordered participant list
//! into those pods.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Pod sizes
// ---------------------------------------------------------------------------

/// Smallest pod that can play a game.
pub const MIN_POD_SIZE: u32 = 3;
/// Preferred four-player pod.
pub const STANDARD_POD_SIZE: u32 = 4;
/// Largest pod the league allows.
pub const MAX_POD_SIZE: u32 = 5;

// ---------------------------------------------------------------------------
// Distribution types
// ---------------------------------------------------------------------------

/// Number of pods of each size formed for a round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PodCounts {
    pub five: u32,
    pub four: u32,
    pub three: u32,
}

impl PodCounts {
    /// Total number of pods.
    pub fn total_pods(&self) -> u32 {
        self.five + self.four + self.three
    }

    /// Total number of seated participants.
    pub fn participants(&self) -> u32 {
        MAX_POD_SIZE * self.five + STANDARD_POD_SIZE * self.four + MIN_POD_SIZE * self.three
    }

    /// Pod sizes in formation order: fives, then fours, then threes.
    pub fn sizes(&self) -> Vec<u32> {
        std::iter::repeat(MAX_POD_SIZE)
            .take(self.five as usize)
            .chain(std::iter::repeat(STANDARD_POD_SIZE).take(self.four as usize))
            .chain(std::iter::repeat(MIN_POD_SIZE).take(self.three as usize))
            .collect()
    }
}

/// Outcome of partitioning a participant count.
///
/// `Insufficient` is an expected result the UI displays, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PodDistribution {
    Insufficient { participants: u32 },
    Pods(PodCounts),
}

impl PodDistribution {
    /// The pod counts, if any pod could be formed.
    pub fn counts(&self) -> Option<PodCounts> {
        match self {
            Self::Insufficient { .. } => None,
            Self::Pods(counts) => Some(*counts),
        }
    }
}

impl fmt::Display for PodDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insufficient { participants } => {
                write!(f, "Not enough participants ({participants}) to form a pod")
            }
            Self::Pods(counts) => {
                let parts: Vec<String> = [
                    (counts.five, MAX_POD_SIZE),
                    (counts.four, STANDARD_POD_SIZE),
                    (counts.three, MIN_POD_SIZE),
                ]
                .into_iter()
                .filter(|(count, _)| *count > 0)
                .map(|(count, size)| {
                    let noun = if count == 1 { "pod" } else { "pods" };
                    format!("{count} {noun} of {size}")
                })
                .collect();
                f.write_str(&parts.join(", "))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

/// Pick the next pod size for `remaining` unseated participants.
fn next_pod_size(remaining: u32) -> u32 {
    if remaining == 5 || (remaining > 5 && (remaining - 5) % 4 == 0) {
        MAX_POD_SIZE
    } else if remaining % 4 == 0 || remaining == 7 || remaining >= 10 {
        STANDARD_POD_SIZE
    } else {
        MIN_POD_SIZE
    }
}

/// Partition `count` participants into pods of 5, 4 and 3.
///
/// Greedy: each step picks a size for the remaining count until nobody is
/// left. Every step removes at least three participants, so the loop ends
/// for any `count >= 3`.
pub fn distribute_pods(count: u32) -> PodDistribution {
    if count < MIN_POD_SIZE {
        return PodDistribution::Insufficient {
            participants: count,
        };
    }

    let mut counts = PodCounts::default();
    let mut remaining = count;
    while remaining > 0 {
        let size = next_pod_size(remaining);
        match size {
            MAX_POD_SIZE => counts.five += 1,
            STANDARD_POD_SIZE => counts.four += 1,
            _ => counts.three += 1,
        }
        remaining = remaining.saturating_sub(size);
    }

    PodDistribution::Pods(counts)
}

/// Seat an ordered participant list into consecutive pods.
///
/// Pods follow [`PodCounts::sizes`]; shuffling, if wanted, is the caller's
/// job.
pub fn seat_participants(participant_ids: &[DbId]) -> Result<Vec<Vec<DbId>>, CoreError> {
    let mut seen = HashSet::with_capacity(participant_ids.len());
    if let Some(dup) = participant_ids.iter().find(|id| !seen.insert(**id)) {
        return Err(CoreError::Validation(format!(
            "Participant {dup} is checked in more than once"
        )));
    }

    let count = u32::try_from(participant_ids.len())
        .map_err(|_| CoreError::Validation("Too many participants".to_string()))?;

    let counts = distribute_pods(count).counts().ok_or_else(|| {
        CoreError::Validation(format!(
            "At least {MIN_POD_SIZE} participants are required, got {count}"
        ))
    })?;

    let mut pods = Vec::with_capacity(counts.total_pods() as usize);
    let mut rest = participant_ids;
    for size in counts.sizes() {
        let (pod, tail) = rest.split_at(size as usize);
        pods.push(pod.to_vec());
        rest = tail;
    }
    Ok(pods)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn counts(n: u32) -> (u32, u32, u32) {
        let c = distribute_pods(n).counts().unwrap();
        (c.five, c.four, c.three)
    }

    // -- distribute_pods --

    #[test]
    fn two_or_fewer_is_insufficient() {
        for n in 0..=2 {
            assert_matches!(
                distribute_pods(n),
                PodDistribution::Insufficient { participants } if participants == n
            );
        }
    }

    #[test]
    fn every_participant_is_seated() {
        for n in 3..=250 {
            let c = distribute_pods(n).counts().unwrap();
            assert_eq!(c.participants(), n, "count {n}");
        }
    }

    #[test]
    fn five_is_one_five_pod() {
        assert_eq!(counts(5), (1, 0, 0));
    }

    #[test]
    fn six_is_two_three_pods() {
        assert_eq!(counts(6), (0, 0, 2));
    }

    #[test]
    fn seven_is_four_and_three() {
        assert_eq!(counts(7), (0, 1, 1));
    }

    #[test]
    fn nine_is_five_and_four() {
        assert_eq!(counts(9), (1, 1, 0));
    }

    #[test]
    fn small_counts() {
        assert_eq!(counts(3), (0, 0, 1));
        assert_eq!(counts(4), (0, 1, 0));
        assert_eq!(counts(8), (0, 2, 0));
        assert_eq!(counts(10), (0, 1, 2));
        assert_eq!(counts(13), (1, 2, 0));
    }

    #[test]
    fn same_count_same_result() {
        assert_eq!(distribute_pods(23), distribute_pods(23));
    }

    // -- display --

    #[test]
    fn summary_lists_non_empty_sizes() {
        assert_eq!(distribute_pods(9).to_string(), "1 pod of 5, 1 pod of 4");
        assert_eq!(distribute_pods(6).to_string(), "2 pods of 3");
    }

    #[test]
    fn summary_for_insufficient() {
        assert_eq!(
            distribute_pods(2).to_string(),
            "Not enough participants (2) to form a pod"
        );
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_value(distribute_pods(7)).unwrap();
        assert_eq!(json["status"], "pods");
        assert_eq!(json["four"], 1);
        assert_eq!(json["three"], 1);

        let json = serde_json::to_value(distribute_pods(1)).unwrap();
        assert_eq!(json["status"], "insufficient");
        assert_eq!(json["participants"], 1);
    }

    // -- seat_participants --

    #[test]
    fn seats_in_formation_order() {
        let ids: Vec<DbId> = (1..=9).collect();
        let pods = seat_participants(&ids).unwrap();
        assert_eq!(pods, vec![vec![1, 2, 3, 4, 5], vec![6, 7, 8, 9]]);
    }

    #[test]
    fn seating_rejects_too_few() {
        assert_matches!(seat_participants(&[1, 2]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn seating_rejects_duplicates() {
        assert_matches!(
            seat_participants(&[1, 2, 3, 2]),
            Err(CoreError::Validation(msg)) if msg.contains("Participant 2")
        );
    }
}
