//! Commander League domain core.
//!
//! Pure, synchronous logic shared by the API service: pod partitioning,
//! color identity resolution, achievement classification, and scorecard
//! reconciliation against previously persisted earned achievements.

pub mod achievements;
pub mod colors;
pub mod error;
pub mod pods;
pub mod scorecard;
pub mod types;
pub mod validation;
