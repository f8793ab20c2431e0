// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test case extraction
//!
//! Test management systems identify a case by a numeric ID. Go tests carry
//! that ID in one of two ways:
//!
//! - a `C<id> <description>` line printed by the test itself, picked up from
//!   the test's own output ([`CaseExtractor::Transcript`])
//! - a structured `testrail ID=C<id> TestPackage=... TestName=...` log record
//!   ([`CaseExtractor::Annotated`])
//!
//! Both strategies consume the keyed event stream and return one
//! [`TestCase`] per test, in the order the tests first appear.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use testlog_events::{Action, Event, EventsError, KeyedEvent, TestKey};
use testlog_fields::parse_reverse;

/// Substring an annotated record must contain to be parsed at all
const ANNOTATION_MARKER: &str = "testrail ";

/// Message of an annotated record
const ANNOTATION_MESSAGE: &str = "testrail";

// ============================================================================
// Types
// ============================================================================

/// Result of a test case as understood by the test management system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseStatus {
    /// Test passed
    #[serde(rename = "PASS")]
    Pass,
    /// Test failed
    #[serde(rename = "FAIL")]
    Fail,
    /// Test was skipped
    #[serde(rename = "SKIP")]
    Skip,
    /// No verdict was seen
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl CaseStatus {
    /// Upper-case name used in reports and annotations
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
            Self::NotAvailable => "N/A",
        }
    }

    /// Status for a verdict action, `None` for any other action
    #[must_use]
    pub fn from_action(action: Action) -> Option<Self> {
        match action {
            Action::Pass => Some(Self::Pass),
            Action::Fail => Some(Self::Fail),
            Action::Skip => Some(Self::Skip),
            _ => None,
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status string that is not PASS, FAIL, SKIP or N/A
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown case status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for CaseStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PASS" => Ok(Self::Pass),
            "FAIL" => Ok(Self::Fail),
            "SKIP" => Ok(Self::Skip),
            "N/A" => Ok(Self::NotAvailable),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// One test mapped to a test management case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Case ID, 0 when the test never named one
    pub id: u32,
    /// Case result
    pub status: CaseStatus,
    /// Case title as printed by the test
    pub description: String,
    /// Go test name
    pub test_name: String,
    /// Issue key (such as `OPS-8`) linked from a skipped test
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
}

impl TestCase {
    /// Whether the test named a case ID
    #[must_use]
    pub fn is_identified(&self) -> bool {
        self.id != 0
    }

    /// Whether the test was skipped without pointing at an issue
    #[must_use]
    pub fn is_skipped_without_issue(&self) -> bool {
        self.status == CaseStatus::Skip && self.issue.is_none()
    }
}

// ============================================================================
// Patterns
// ============================================================================

/// Case marker with description: `C3605 Pass test`
fn case_marker(text: &str) -> Option<(u32, String)> {
    static CASE_RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = CASE_RE.get_or_init(|| Regex::new(r"C(\d{1,8})\s(.*)").ok());

    let caps = re.as_ref()?.captures(text)?;
    let id = caps.get(1)?.as_str().parse().ok()?;
    let description = caps.get(2).map_or("", |m| m.as_str()).to_string();
    Some((id, description))
}

/// Bare case ID as written in annotations: `C5005`
fn case_id(text: &str) -> Option<u32> {
    static ID_RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = ID_RE.get_or_init(|| Regex::new(r"C(\d{1,8})").ok());

    re.as_ref()?
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Issue key from a tracker link: `https://host/browse/OPS-8` gives `OPS-8`
fn issue_key(text: &str) -> Option<String> {
    static ISSUE_RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = ISSUE_RE
        .get_or_init(|| Regex::new(r"https?://[^\s/]+/browse/([A-Z][A-Z0-9]*-\d+)").ok());

    re.as_ref()?
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

// ============================================================================
// Extraction
// ============================================================================

/// How case IDs are found in the event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseExtractor {
    /// `C<id> <description>` lines in each test's output
    #[default]
    Transcript,
    /// `testrail key=value` log records, wherever they appear
    Annotated,
}

impl CaseExtractor {
    /// Status given to a case that never reported one
    #[must_use]
    pub fn fallback_status(self) -> CaseStatus {
        match self {
            Self::Transcript => CaseStatus::NotAvailable,
            Self::Annotated => CaseStatus::Fail,
        }
    }

    /// Drain `stream` and return one case per test
    ///
    /// # Errors
    ///
    /// Returns the first error produced by the stream.
    pub fn extract<I>(self, stream: I) -> Result<Vec<TestCase>, EventsError>
    where
        I: IntoIterator<Item = Result<KeyedEvent, EventsError>>,
    {
        let mut drafts = Drafts::default();
        for item in stream {
            let (key, event) = item?;
            match self {
                Self::Transcript => drafts.observe_output(key, &event),
                Self::Annotated => drafts.observe_annotation(&event),
            }
        }
        Ok(drafts.finish(self.fallback_status()))
    }
}

/// A case under construction
#[derive(Debug, Default)]
struct Draft {
    id: u32,
    description: String,
    test_name: String,
    status: Option<CaseStatus>,
    issue: Option<String>,
}

impl Draft {
    fn scan_output(&mut self, output: &str) {
        if self.id == 0 {
            if let Some((id, description)) = case_marker(output) {
                self.id = id;
                self.description = description;
            }
        }
        if let Some(issue) = issue_key(output) {
            self.issue = Some(issue);
        }
    }

    fn finish(self, fallback: CaseStatus) -> TestCase {
        TestCase {
            id: self.id,
            status: self.status.unwrap_or(fallback),
            description: self.description,
            test_name: self.test_name,
            issue: self.issue,
        }
    }
}

/// Drafts keyed by test, in first-seen order
#[derive(Debug, Default)]
struct Drafts {
    drafts: Vec<Draft>,
    index: HashMap<TestKey, usize>,
}

impl Drafts {
    fn entry(&mut self, key: TestKey) -> &mut Draft {
        let next = self.drafts.len();
        let slot = *self.index.entry(key).or_insert(next);
        if slot == next {
            self.drafts.push(Draft::default());
        }
        &mut self.drafts[slot]
    }

    fn observe_output(&mut self, key: TestKey, event: &Event) {
        if key.test.is_empty() {
            return;
        }
        let test_name = key.test.clone();
        let draft = self.entry(key);
        draft.test_name = test_name;

        if event.action == Action::Output {
            draft.scan_output(&event.output);
        } else if let Some(status) = CaseStatus::from_action(event.action) {
            draft.status = Some(status);
        }
    }

    fn observe_annotation(&mut self, event: &Event) {
        if event.action != Action::Output || !event.output.contains(ANNOTATION_MARKER) {
            return;
        }

        let record = parse_reverse(&event.output);
        if record.message != ANNOTATION_MESSAGE {
            debug!(message = %record.message, "not an annotation record");
            return;
        }
        let (Some(package), Some(test)) = (record.field("TestPackage"), record.field("TestName"))
        else {
            debug!("annotation record without TestPackage or TestName");
            return;
        };

        let draft = self.entry(TestKey::new(package, test));
        draft.test_name = test.to_string();

        let Some(id) = record.field("ID").and_then(case_id) else {
            return;
        };
        draft.id = id;

        if let Some(issue) = record.field("SkippedLink").and_then(issue_key) {
            draft.issue = Some(issue);
        }
        draft.status = match record.field("Status").map(str::parse::<CaseStatus>) {
            Some(Ok(status)) => Some(status),
            Some(Err(e)) => {
                debug!(test, error = %e, "ignoring annotation status");
                None
            }
            None => None,
        };
    }

    fn finish(self, fallback: CaseStatus) -> Vec<TestCase> {
        self.drafts
            .into_iter()
            .map(|draft| draft.finish(fallback))
            .collect()
    }
}

// ============================================================================
// Report
// ============================================================================

/// Extracted cases split by what a test management upload can do with them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Cases with an ID
    pub identified: Vec<TestCase>,
    /// Tests that never named a case ID
    pub unidentified: Vec<TestCase>,
    /// Skipped tests without an issue link (also listed above)
    pub skipped_without_issue: Vec<TestCase>,
}

impl CaseReport {
    /// Split `cases`, keeping their order within each list
    #[must_use]
    pub fn new(cases: Vec<TestCase>) -> Self {
        let mut report = Self::default();
        for case in cases {
            if case.is_skipped_without_issue() {
                report.skipped_without_issue.push(case.clone());
            }
            if case.is_identified() {
                report.identified.push(case);
            } else {
                report.unidentified.push(case);
            }
        }
        report
    }

    /// IDs claimed by more than one test, in first-seen order
    #[must_use]
    pub fn duplicate_ids(&self) -> Vec<u32> {
        let mut seen = HashMap::new();
        let mut duplicates = Vec::new();
        for case in &self.identified {
            let count = seen.entry(case.id).or_insert(0usize);
            *count += 1;
            if *count == 2 {
                duplicates.push(case.id);
            }
        }
        duplicates
    }

    /// Log every case that needs attention
    pub fn log_warnings(&self) {
        for case in &self.unidentified {
            warn!(test = %case.test_name, "test without case ID");
        }
        for case in &self.skipped_without_issue {
            warn!(test = %case.test_name, id = case.id, "skipped test without issue");
        }
        for id in self.duplicate_ids() {
            warn!(id, "duplicate test case");
        }
    }
}
