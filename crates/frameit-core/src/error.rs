// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Frameit.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Frameit operations.
#[derive(Debug, Error)]
pub enum FrameitError {
    // -- Input errors --
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // -- Image errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FrameitError>;
