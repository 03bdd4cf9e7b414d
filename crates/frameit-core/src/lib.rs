// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Frameit — Core types, configuration, and error definitions shared across
// all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use config::{
    CandidateSelection, ContourMode, CornerOrdering, DetectionParams, HullReduction, Profile,
    ScannerConfig,
};
pub use error::FrameitError;
pub use types::*;
