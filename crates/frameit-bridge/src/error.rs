// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Errors as the host application sees them: a stable code plus a message that
// can be shown to the user.

use frameit_core::FrameitError;
use frameit_core::human_errors::humanize_error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Codes the host can switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The source photo does not exist.
    FileNotFound,
    /// Anything else that stopped the request: bad arguments, a failed task.
    DetectionError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::DetectionError => "DETECTION_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct BridgeError {
    pub code: ErrorCode,
    pub message: String,
}

impl BridgeError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<FrameitError> for BridgeError {
    fn from(err: FrameitError) -> Self {
        let code = match err {
            FrameitError::FileNotFound(_) => ErrorCode::FileNotFound,
            _ => ErrorCode::DetectionError,
        };
        Self::new(code, humanize_error(&err).to_string())
    }
}
