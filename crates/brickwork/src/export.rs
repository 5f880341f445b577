//! Snapshot export of a laid-out workspace.

pub mod svg;
