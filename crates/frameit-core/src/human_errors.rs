// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the scanning screens.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how the host UI presents it.

use crate::error::FrameitError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something on the device hiccupped; trying again may work.
    Transient,
    /// User must do something (pick another photo, move the corners).
    ActionRequired,
    /// Cannot be fixed by retrying or user action.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether trying the same thing again can succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `FrameitError` into a `HumanError`.
pub fn humanize_error(err: &FrameitError) -> HumanError {
    match err {
        FrameitError::FileNotFound(_) => HumanError {
            message: "The photo couldn't be found.".into(),
            suggestion: "It may have been moved or deleted. Try taking the photo again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FrameitError::InvalidArgument(detail) => HumanError {
            message: "The scanner received an incomplete request.".into(),
            suggestion: format!("Please try again. If this keeps happening, please report it. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        FrameitError::ImageError(_) => HumanError {
            message: "There's a problem with this photo.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try taking the photo again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        FrameitError::DegenerateGeometry(_) => HumanError {
            message: "The selected corners don't outline a page.".into(),
            suggestion: "Drag the four corner handles apart so they sit on the corners of the document.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FrameitError::InvalidConfig(_) => HumanError {
            message: "The scanner settings are invalid.".into(),
            suggestion: "Reset the scanner settings to their defaults and try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FrameitError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to read that file.".into(),
                    suggestion: "Check the app's storage permission, then try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        FrameitError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        FrameitError::Bridge(_) => HumanError {
            message: "A device-specific feature didn't work.".into(),
            suggestion: "Try restarting the app.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
