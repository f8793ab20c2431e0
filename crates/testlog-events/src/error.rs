// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for testlog-events

use thiserror::Error;

/// Errors that can occur while turning test output into events
#[derive(Debug, Error)]
pub enum EventsError {
    /// Error reading from the underlying stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A structured log line is not a valid test2json event
    #[error("JSON parse error on line {line}: {source}")]
    JsonParse {
        /// 1-based line number of the offending line
        line: usize,
        /// Underlying decoder error
        #[source]
        source: serde_json::Error,
    },

    /// A flush was requested below the bottom of the open report stack
    #[error("report nesting anomaly: cannot flush to depth {depth} with {open} open reports")]
    NestingAnomaly {
        /// Depth the converter was asked to flush to
        depth: usize,
        /// Number of reports currently open
        open: usize,
    },

    /// An input format name was not recognised
    #[error("unknown input format: {0} (expected json, text or convlog)")]
    UnknownFormat(String),
}
