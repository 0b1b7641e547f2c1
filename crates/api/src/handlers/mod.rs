//! Request handlers.
//!
//! Each submodule deserializes a request body, runs the caller-side guards
//! and delegates to the pure functions in `league_core`.

pub mod pods;
pub mod scorecards;
