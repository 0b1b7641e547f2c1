//! Achievement categories and the earned-record model.
//!
//! An earned record is a persisted credit of one achievement to one
//! participant for one round. Its optional slug decides which category it
//! belongs to; slug-less records are freely-picked deckbuilding achievements.

use serde::{Deserialize, Serialize};

use crate::colors::parse_win_slug;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Fixed slugs
// ---------------------------------------------------------------------------

/// Slug credited to every pod participant when the game ends in a draw.
pub const END_DRAW_SLUG: &str = "end-draw";

/// Catalogue slug of the precon achievement.
pub const PRECON_SLUG: &str = "precon";

/// Commander name recorded on the winner row of a drawn pod.
pub const DRAW_COMMANDER_NAME: &str = "END IN DRAW";

// ---------------------------------------------------------------------------
// General achievements
// ---------------------------------------------------------------------------

/// Achievements any participant in the pod can earn, independently of the
/// game's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneralSlug {
    BringSnack,
    LendDeck,
    KnockOut,
    SubmitToDiscord,
}

impl GeneralSlug {
    pub const ALL: [GeneralSlug; 4] = [
        Self::BringSnack,
        Self::LendDeck,
        Self::KnockOut,
        Self::SubmitToDiscord,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BringSnack => "bring-snack",
            Self::LendDeck => "lend-deck",
            Self::KnockOut => "knock-out",
            Self::SubmitToDiscord => "submit-to-discord",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == slug)
    }
}

impl std::fmt::Display for GeneralSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Winner flags
// ---------------------------------------------------------------------------

/// Boolean conditions describing how the winner won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WinnerFlag {
    CommanderDamage,
    WinTheGameEffect,
    ZeroOrLessLife,
    LoseTheGameEffect,
    LastInOrder,
}

impl WinnerFlag {
    pub const ALL: [WinnerFlag; 5] = [
        Self::CommanderDamage,
        Self::WinTheGameEffect,
        Self::ZeroOrLessLife,
        Self::LoseTheGameEffect,
        Self::LastInOrder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CommanderDamage => "commander-damage",
            Self::WinTheGameEffect => "win-the-game-effect",
            Self::ZeroOrLessLife => "zero-or-less-life",
            Self::LoseTheGameEffect => "lose-the-game-effect",
            Self::LastInOrder => "last-in-order",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == slug)
    }
}

impl std::fmt::Display for WinnerFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Category of an earned record, derived from its slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AchievementKind {
    General(GeneralSlug),
    WinnerFlag(WinnerFlag),
    /// `win-<N>-colors`.
    ColorWin(u8),
    Draw,
    /// No slug: a deckbuilding achievement picked from the catalogue.
    FreelyPicked,
    /// A slug this core does not manage; left untouched.
    Other(String),
}

impl AchievementKind {
    pub fn classify(slug: Option<&str>) -> Self {
        let Some(slug) = slug else {
            return Self::FreelyPicked;
        };
        if slug == END_DRAW_SLUG {
            Self::Draw
        } else if let Some(general) = GeneralSlug::from_slug(slug) {
            Self::General(general)
        } else if let Some(flag) = WinnerFlag::from_slug(slug) {
            Self::WinnerFlag(flag)
        } else if let Some(n) = parse_win_slug(slug) {
            Self::ColorWin(n)
        } else {
            Self::Other(slug.to_string())
        }
    }

    /// Records tied to a decided game; cleared when a pod enters a draw.
    pub fn is_winner_bound(&self) -> bool {
        matches!(
            self,
            Self::WinnerFlag(_) | Self::ColorWin(_) | Self::FreelyPicked
        )
    }
}

// ---------------------------------------------------------------------------
// Persisted shapes
// ---------------------------------------------------------------------------

/// An already-persisted credit for a participant in a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnedAchievementRecord {
    pub id: DbId,
    #[serde(default)]
    pub slug: Option<String>,
    pub participant_id: DbId,
    #[serde(default)]
    pub achievement_id: Option<DbId>,
}

impl EarnedAchievementRecord {
    pub fn kind(&self) -> AchievementKind {
        AchievementKind::classify(self.slug.as_deref())
    }
}

/// The winner row currently recorded for a pod.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WinningCommander {
    pub id: Option<DbId>,
    pub participant_id: Option<DbId>,
    pub commander_name: Option<String>,
    pub color_id: Option<DbId>,
}

/// Existing state for one pod and round, as fetched from the league API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodAchievementsSnapshot {
    pub records: Vec<EarnedAchievementRecord>,
    pub winning_commander: Option<WinningCommander>,
}

impl PodAchievementsSnapshot {
    /// Whether the pod's game is currently recorded as a draw.
    pub fn is_draw(&self) -> bool {
        self.records
            .iter()
            .any(|r| r.slug.as_deref() == Some(END_DRAW_SLUG))
    }

    /// Participant of the recorded winner row, if any.
    pub fn winning_participant(&self) -> Option<DbId> {
        self.winning_commander
            .as_ref()
            .and_then(|w| w.participant_id)
    }

    pub fn records_of<'a>(
        &'a self,
        kind: &'a AchievementKind,
    ) -> impl Iterator<Item = &'a EarnedAchievementRecord> + 'a {
        self.records.iter().filter(move |r| &r.kind() == kind)
    }
}
