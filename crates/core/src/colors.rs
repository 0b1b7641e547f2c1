//! Commander color identity.
//!
//! The scorecard form records the winner's colors as six checkboxes. This
//! module turns that selection into a color-table row and into the
//! `win-<N>-colors` achievement slug.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Name of the colorless pseudo-color.
pub const COLORLESS: &str = "Colorless";

/// A row of the league's color table (e.g. `"White Blue"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub id: DbId,
    pub name: String,
}

/// The winner's color checkboxes. Missing keys deserialize as unchecked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ColorSelection {
    pub white: bool,
    pub blue: bool,
    pub black: bool,
    pub red: bool,
    pub green: bool,
    pub colorless: bool,
}

impl ColorSelection {
    /// The five colors, in the order the form lists them.
    fn colors(&self) -> [(&'static str, bool); 5] {
        [
            ("White", self.white),
            ("Blue", self.blue),
            ("Black", self.black),
            ("Red", self.red),
            ("Green", self.green),
        ]
    }

    /// True when no checkbox is ticked.
    pub fn is_empty(&self) -> bool {
        !self.colorless && self.colors().iter().all(|(_, checked)| !checked)
    }

    /// Names of the ticked checkboxes, `Colorless` last.
    pub fn selected_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .colors()
            .into_iter()
            .filter(|(_, checked)| *checked)
            .map(|(name, _)| name)
            .collect();
        if self.colorless {
            names.push(COLORLESS);
        }
        names
    }

    /// Number of distinct colors. `Colorless` forces zero.
    pub fn identity_size(&self) -> u8 {
        if self.colorless {
            return 0;
        }
        self.colors().iter().filter(|(_, checked)| *checked).count() as u8
    }

    /// Recover the checkboxes from a color-table name such as `"White Blue"`.
    pub fn from_color_name(name: &str) -> Self {
        Self {
            white: name.contains("White"),
            blue: name.contains("Blue"),
            black: name.contains("Black"),
            red: name.contains("Red"),
            green: name.contains("Green"),
            colorless: name.contains(COLORLESS),
        }
    }
}

/// Slug of the color-identity win achievement for an `n`-color commander.
pub fn win_slug(n: u8) -> String {
    format!("win-{n}-colors")
}

/// Most colors a commander can have.
pub const MAX_IDENTITY_SIZE: u8 = 5;

/// Parse `win-<N>-colors`, returning `N` in `0..=5`.
pub fn parse_win_slug(slug: &str) -> Option<u8> {
    let digits = slug.strip_prefix("win-")?.strip_suffix("-colors")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|n| *n <= MAX_IDENTITY_SIZE)
}

/// Find the first color-table row whose name contains every selected name.
///
/// Matching is by substring inclusion, so a row naming more colors than
/// were selected still matches if it comes first in the table.
pub fn find_color<'a>(table: &'a [Color], selection: &ColorSelection) -> Option<&'a Color> {
    let selected = selection.selected_names();
    if selected.is_empty() {
        return None;
    }
    table
        .iter()
        .find(|color| selected.iter().all(|name| color.name.contains(name)))
}
