// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test event types
//!
//! [`Event`] mirrors the record emitted by `go test -json` (test2json), so the
//! same type is produced by the transcript converter and decoded from
//! structured logs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to a test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Test started running
    Run,
    /// Test paused (parallel test waiting for its turn)
    Pause,
    /// Test resumed after a pause
    Cont,
    /// Test or package passed
    Pass,
    /// Test or package failed
    Fail,
    /// Test or package was skipped
    Skip,
    /// Benchmark printed its result
    Bench,
    /// A line of output
    Output,
}

impl Action {
    /// Lowercase name as it appears in test2json
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Pause => "pause",
            Self::Cont => "cont",
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skip => "skip",
            Self::Bench => "bench",
            Self::Output => "output",
        }
    }

    /// Whether this action is a final verdict (pass, fail or skip)
    #[must_use]
    pub fn is_verdict(self) -> bool {
        matches!(self, Self::Pass | Self::Fail | Self::Skip)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normalized test event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Lifecycle action or `output`
    #[serde(rename = "Action", alias = "action")]
    pub action: Action,
    /// Package the event belongs to
    #[serde(
        rename = "Package",
        alias = "package",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub package: String,
    /// Test (or subtest) name, empty for package-level events
    #[serde(
        rename = "Test",
        alias = "test",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub test: String,
    /// Elapsed time in seconds
    #[serde(
        rename = "Elapsed",
        alias = "elapsed",
        default,
        skip_serializing_if = "is_zero"
    )]
    pub elapsed: f64,
    /// Raw output line, including its trailing newline
    #[serde(
        rename = "Output",
        alias = "output",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub output: String,
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

impl Event {
    /// Create an event with only the action set
    #[must_use]
    pub fn new(action: Action) -> Self {
        Self {
            action,
            package: String::new(),
            test: String::new(),
            elapsed: 0.0,
            output: String::new(),
        }
    }

    /// Create an `output` event for `line`, attributed to `test`
    #[must_use]
    pub fn output(line: impl Into<String>, test: impl Into<String>) -> Self {
        Self {
            test: test.into(),
            output: line.into(),
            ..Self::new(Action::Output)
        }
    }

    /// Create a package summary event
    #[must_use]
    pub fn summary(action: Action, package: impl Into<String>, elapsed: f64) -> Self {
        Self {
            package: package.into(),
            elapsed,
            ..Self::new(action)
        }
    }

    /// Key used to group this event with the others of the same test
    #[must_use]
    pub fn key(&self) -> TestKey {
        TestKey::new(&self.package, &self.test)
    }
}

/// Composite `(package, test)` key identifying one test
///
/// Package-level events have an empty test name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestKey {
    /// Package name
    pub package: String,
    /// Test name
    pub test: String,
}

impl TestKey {
    /// Build a key from its parts
    #[must_use]
    pub fn new(package: impl Into<String>, test: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            test: test.into(),
        }
    }
}

impl fmt::Display for TestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.package, self.test)
    }
}
