// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshframe Inc.

//! Accumulated diagnostics for best-effort mesh operations
//!
//! Mutators and importers in this crate never abort on malformed input;
//! they skip the offending element and record what happened. The record
//! is returned to the caller as a [`Diagnostics`] list so the core stays
//! testable without intercepting log output. Every entry is also mirrored
//! to the `log` facade for applications that install a logger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a recorded diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Skipped input the caller may not care about (e.g. a malformed OBJ line).
    Info,
    /// Partially dropped data (e.g. an out-of-range vertex index in a face).
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One recorded event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Ordered list of diagnostics accumulated during one operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an informational entry and mirror it to the log facade.
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{message}");
        self.entries.push(Diagnostic {
            severity: Severity::Info,
            message,
        });
    }

    /// Record a warning entry and mirror it to the log facade.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            message,
        });
    }

    /// Append all entries of `other`, preserving order.
    pub fn merge(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Count of entries at [`Severity::Warning`].
    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }
}
