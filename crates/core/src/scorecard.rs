//! Scorecard reconciliation.
//!
//! A scorecard is submitted once per pod and round, and may be edited later.
//! [`reconcile`] compares the submitted scorecard with the earned records
//! already persisted for the pod and produces the minimal set of creates,
//! slug reassignments and soft-deletes, plus the winner row to upsert.
//! [`initial_submission`] goes the other way and rebuilds the form state
//! from persisted records.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::achievements::{
    AchievementKind, EarnedAchievementRecord, GeneralSlug, PodAchievementsSnapshot, WinnerFlag,
    DRAW_COMMANDER_NAME, END_DRAW_SLUG, PRECON_SLUG,
};
use crate::colors::{find_color, win_slug, Color, ColorSelection};
use crate::types::DbId;

/// Colors a precon win is always credited with.
pub const PRECON_WIN_COLORS: u8 = 3;

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// A deckbuilding achievement picked on the scorecard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedAchievement {
    /// Client-generated id, stable for the editing session.
    pub temp_id: String,
    pub achievement_id: DbId,
    /// Catalogue slug of the achievement, if it has one.
    #[serde(default)]
    pub slug: Option<String>,
    /// Id of the earned record when the entry is already persisted.
    #[serde(default)]
    pub earned_id: Option<DbId>,
}

impl PickedAchievement {
    pub fn is_precon(&self) -> bool {
        self.slug.as_deref() == Some(PRECON_SLUG)
    }
}

/// Everything the scorecard records about the winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerSubmission {
    pub participant_id: DbId,
    #[serde(default)]
    pub commander_name: Option<String>,
    #[serde(default)]
    pub colors: ColorSelection,
    #[serde(default)]
    pub flags: BTreeSet<WinnerFlag>,
    #[serde(default)]
    pub picked: Vec<PickedAchievement>,
}

/// How the pod's game ended. A game has a winner or is a draw, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScorecardOutcome {
    Draw,
    Winner(WinnerSubmission),
}

/// The submitted scorecard for one pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorecardSubmission {
    /// Participants credited with each general achievement. A slug missing
    /// from the map leaves its records untouched.
    #[serde(default)]
    pub general: BTreeMap<GeneralSlug, Vec<DbId>>,
    pub outcome: ScorecardOutcome,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// An earned record to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEarnedRecord {
    pub round_id: DbId,
    pub participant_id: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievement_id: Option<DbId>,
}

impl NewEarnedRecord {
    fn slugged(slug: impl Into<String>, participant_id: DbId, round_id: DbId) -> Self {
        Self {
            round_id,
            participant_id,
            slug: Some(slug.into()),
            achievement_id: None,
        }
    }

    fn picked(achievement_id: DbId, participant_id: DbId, round_id: DbId) -> Self {
        Self {
            round_id,
            participant_id,
            slug: None,
            achievement_id: Some(achievement_id),
        }
    }
}

/// Change applied to an existing earned record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordPatch {
    Reslug(String),
    SoftDelete,
}

/// A patch addressed to one earned record.
///
/// Serializes flat, as `{"id": 1, "slug": "..."}` or `{"id": 1, "deleted": true}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdate {
    pub id: DbId,
    pub patch: RecordPatch,
}

impl RecordUpdate {
    fn soft_delete(id: DbId) -> Self {
        Self {
            id,
            patch: RecordPatch::SoftDelete,
        }
    }
}

impl Serialize for RecordUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("id", &self.id)?;
        match &self.patch {
            RecordPatch::Reslug(slug) => map.serialize_entry("slug", slug)?,
            RecordPatch::SoftDelete => map.serialize_entry("deleted", &true)?,
        }
        map.end()
    }
}

/// The winner row to upsert for the pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinnerInfo {
    /// Existing winner row, if the pod already has one.
    pub id: Option<DbId>,
    pub participant_id: Option<DbId>,
    pub color_id: Option<DbId>,
    pub commander_name: String,
    pub pod_id: DbId,
}

/// Changes to send to the league API's upsert endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    pub to_create: Vec<NewEarnedRecord>,
    pub to_update: Vec<RecordUpdate>,
    pub winner_info: Option<WinnerInfo>,
}

impl ReconciliationResult {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.winner_info.is_none()
    }

    fn delete_all<'a>(&mut self, records: impl Iterator<Item = &'a EarnedAchievementRecord>) {
        self.to_update
            .extend(records.map(|r| RecordUpdate::soft_delete(r.id)));
    }
}

// ---------------------------------------------------------------------------
// Draw transitions
// ---------------------------------------------------------------------------

/// How the pod's draw state changes with this submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawTransition<'a> {
    /// Decided before, decided now.
    StillDecided(&'a WinnerSubmission),
    /// Drawn before, drawn now.
    StillDrawn,
    /// Decided (or empty) before, drawn now.
    EnterDraw,
    /// Drawn before, decided now.
    LeaveDraw(&'a WinnerSubmission),
}

impl<'a> DrawTransition<'a> {
    pub fn new(was_draw: bool, outcome: &'a ScorecardOutcome) -> Self {
        match (was_draw, outcome) {
            (false, ScorecardOutcome::Winner(winner)) => Self::StillDecided(winner),
            (true, ScorecardOutcome::Draw) => Self::StillDrawn,
            (false, ScorecardOutcome::Draw) => Self::EnterDraw,
            (true, ScorecardOutcome::Winner(winner)) => Self::LeaveDraw(winner),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StillDecided(_) => "still_decided",
            Self::StillDrawn => "still_drawn",
            Self::EnterDraw => "enter_draw",
            Self::LeaveDraw(_) => "leave_draw",
        }
    }
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Compute the changes that bring a pod's earned records in line with a
/// submitted scorecard.
///
/// Pure and deterministic; an empty snapshot means the pod has no prior
/// state. Callers validate the submission beforehand (see
/// [`crate::validation`]).
pub fn reconcile(
    submission: &ScorecardSubmission,
    snapshot: &PodAchievementsSnapshot,
    round_id: DbId,
    color_table: &[Color],
    participant_ids: &[DbId],
    pod_id: DbId,
) -> ReconciliationResult {
    let mut result = ReconciliationResult::default();

    diff_general(&submission.general, snapshot, round_id, &mut result);

    let transition = DrawTransition::new(snapshot.is_draw(), &submission.outcome);
    match transition {
        DrawTransition::StillDrawn => {}
        DrawTransition::EnterDraw => {
            enter_draw(snapshot, round_id, participant_ids, pod_id, &mut result);
        }
        DrawTransition::LeaveDraw(winner) => {
            result.delete_all(snapshot.records_of(&AchievementKind::Draw));
            apply_winner(winner, snapshot, round_id, color_table, pod_id, &mut result);
        }
        DrawTransition::StillDecided(winner) => {
            apply_winner(winner, snapshot, round_id, color_table, pod_id, &mut result);
        }
    }

    tracing::debug!(
        round_id,
        pod_id,
        transition = transition.as_str(),
        created = result.to_create.len(),
        updated = result.to_update.len(),
        "Reconciled scorecard"
    );

    result
}

/// Symmetric difference per general slug.
fn diff_general(
    general: &BTreeMap<GeneralSlug, Vec<DbId>>,
    snapshot: &PodAchievementsSnapshot,
    round_id: DbId,
    result: &mut ReconciliationResult,
) {
    for (slug, participants) in general {
        let kind = AchievementKind::General(*slug);
        let existing: Vec<&EarnedAchievementRecord> = snapshot.records_of(&kind).collect();
        let wanted: BTreeSet<DbId> = participants.iter().copied().collect();

        result.to_create.extend(
            wanted
                .iter()
                .filter(|p| !existing.iter().any(|r| r.participant_id == **p))
                .map(|p| NewEarnedRecord::slugged(slug.as_str(), *p, round_id)),
        );
        result.delete_all(
            existing
                .into_iter()
                .filter(|r| !wanted.contains(&r.participant_id)),
        );
    }
}

/// Clear the winner-bound records and credit everyone with the draw.
fn enter_draw(
    snapshot: &PodAchievementsSnapshot,
    round_id: DbId,
    participant_ids: &[DbId],
    pod_id: DbId,
    result: &mut ReconciliationResult,
) {
    result.delete_all(snapshot.records.iter().filter(|r| r.kind().is_winner_bound()));

    let mut seen = HashSet::new();
    result.to_create.extend(
        participant_ids
            .iter()
            .filter(|p| seen.insert(**p))
            .map(|p| NewEarnedRecord::slugged(END_DRAW_SLUG, *p, round_id)),
    );

    result.winner_info = Some(WinnerInfo {
        id: snapshot.winning_commander.as_ref().and_then(|w| w.id),
        participant_id: None,
        color_id: None,
        commander_name: DRAW_COMMANDER_NAME.to_string(),
        pod_id,
    });
}

/// Winner row, winner flags, color-identity slug and picked achievements.
fn apply_winner(
    winner: &WinnerSubmission,
    snapshot: &PodAchievementsSnapshot,
    round_id: DbId,
    color_table: &[Color],
    pod_id: DbId,
    result: &mut ReconciliationResult,
) {
    let existing = snapshot.winning_commander.clone().unwrap_or_default();
    let winner_id = winner.participant_id;
    if existing.participant_id.is_some_and(|p| p != winner_id) {
        tracing::debug!(
            pod_id,
            previous = existing.participant_id,
            winner_id,
            "Scorecard winner changed"
        );
    }

    let commander_name = winner
        .commander_name
        .clone()
        .filter(|name| !name.is_empty())
        .or(existing
            .commander_name
            .filter(|name| name != DRAW_COMMANDER_NAME))
        .unwrap_or_default();
    let color_id = find_color(color_table, &winner.colors)
        .map(|c| c.id)
        .or(existing.color_id);

    result.winner_info = Some(WinnerInfo {
        id: existing.id,
        participant_id: Some(winner_id),
        color_id,
        commander_name,
        pod_id,
    });

    // Winner flags.
    for flag in WinnerFlag::ALL {
        let kind = AchievementKind::WinnerFlag(flag);
        let mut records = snapshot.records_of(&kind).peekable();
        if winner.flags.contains(&flag) {
            if records.peek().is_none() {
                result
                    .to_create
                    .push(NewEarnedRecord::slugged(flag.as_str(), winner_id, round_id));
            }
        } else {
            result.delete_all(records);
        }
    }

    // Color-identity win slug.
    let existing_win = snapshot
        .records
        .iter()
        .find(|r| matches!(r.kind(), AchievementKind::ColorWin(_)));
    let target = if winner.picked.iter().any(PickedAchievement::is_precon) {
        win_slug(PRECON_WIN_COLORS)
    } else if winner.colors.is_empty() {
        existing_win
            .and_then(|r| r.slug.clone())
            .unwrap_or_else(|| win_slug(0))
    } else {
        win_slug(winner.colors.identity_size())
    };
    match existing_win {
        Some(record) if record.slug.as_deref() != Some(target.as_str()) => {
            result.to_update.push(RecordUpdate {
                id: record.id,
                patch: RecordPatch::Reslug(target),
            });
        }
        Some(_) => {}
        None => result
            .to_create
            .push(NewEarnedRecord::slugged(target, winner_id, round_id)),
    }

    // Freely-picked achievements.
    let kept: HashSet<DbId> = winner.picked.iter().filter_map(|p| p.earned_id).collect();
    result.to_create.extend(
        winner
            .picked
            .iter()
            .filter(|p| p.earned_id.is_none())
            .map(|p| NewEarnedRecord::picked(p.achievement_id, winner_id, round_id)),
    );
    result.delete_all(
        snapshot
            .records_of(&AchievementKind::FreelyPicked)
            .filter(|r| !kept.contains(&r.id)),
    );
}

// ---------------------------------------------------------------------------
// Initial values
// ---------------------------------------------------------------------------

/// Rebuild the scorecard form state from a pod's persisted records.
///
/// Returns `None` when the pod records neither a draw nor a winner. Picked
/// entries carry no catalogue slug; the caller fills it in from its
/// achievement catalogue when it needs the precon override.
pub fn initial_submission(
    snapshot: &PodAchievementsSnapshot,
    color_table: &[Color],
) -> Option<ScorecardSubmission> {
    let mut general: BTreeMap<GeneralSlug, Vec<DbId>> =
        GeneralSlug::ALL.into_iter().map(|s| (s, Vec::new())).collect();
    for record in &snapshot.records {
        if let AchievementKind::General(slug) = record.kind() {
            general.entry(slug).or_default().push(record.participant_id);
        }
    }

    let outcome = if snapshot.is_draw() {
        ScorecardOutcome::Draw
    } else {
        let existing = snapshot.winning_commander.as_ref()?;
        let participant_id = existing.participant_id?;

        let colors = existing
            .color_id
            .and_then(|id| color_table.iter().find(|c| c.id == id))
            .map(|c| ColorSelection::from_color_name(&c.name))
            .unwrap_or_default();

        let mut flags = BTreeSet::new();
        let mut picked = Vec::new();
        for record in &snapshot.records {
            match record.kind() {
                AchievementKind::WinnerFlag(flag) => {
                    flags.insert(flag);
                }
                AchievementKind::FreelyPicked => {
                    if let Some(achievement_id) = record.achievement_id {
                        picked.push(PickedAchievement {
                            temp_id: format!("earned-{}", record.id),
                            achievement_id,
                            slug: None,
                            earned_id: Some(record.id),
                        });
                    }
                }
                _ => {}
            }
        }

        ScorecardOutcome::Winner(WinnerSubmission {
            participant_id,
            commander_name: existing.commander_name.clone(),
            colors,
            flags,
            picked,
        })
    };

    Some(ScorecardSubmission { general, outcome })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
