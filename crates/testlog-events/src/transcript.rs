// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Verbose transcript conversion
//!
//! Turns the human-oriented output of `go test -v` into the same event stream
//! that `go test -json` would have produced. The transcript carries no
//! explicit test tag on output lines, so subtests are tracked through the
//! 4-space indentation of their `--- PASS:` style reports.
//!
//! # Example
//!
//! ```
//! use testlog_events::event::Action;
//! use testlog_events::transcript::parse_transcript;
//!
//! let transcript = "=== RUN   TestOne\n--- PASS: TestOne (0.01s)\nPASS\nok  \texample.com/pkg\t0.015s\n";
//! let events = parse_transcript(transcript).unwrap();
//!
//! let last = events.last().unwrap();
//! assert_eq!(last.action, Action::Pass);
//! assert_eq!(last.package, "example.com/pkg");
//! ```

use std::collections::VecDeque;
use std::io::{BufRead, Cursor};

use tracing::debug;

use crate::convlog::strip_log_prefix;
use crate::error::EventsError;
use crate::event::{Action, Event};
use crate::reader::KeyedEvent;
use crate::source::{LineSource, line_content};

// PASS, FAIL and "ok  " all have 4 characters
const COMMON_PREFIX_LEN: usize = 4;

/// Printed by a test binary on success
const BIG_PASS: &str = "PASS";

/// Printed by a test binary after a normal test failure
const BIG_FAIL: &str = "FAIL";

const OK_PREFIX: &str = "ok  \t";

/// Printed by `go test` when the test binary exits with an error
const FAIL_PREFIX: &str = "FAIL\t";

const UPDATE_MARKERS: [(&str, Action); 3] = [
    ("=== RUN   ", Action::Run),
    ("=== PAUSE ", Action::Pause),
    ("=== CONT  ", Action::Cont),
];

const REPORT_MARKERS: [(&str, Action); 4] = [
    ("--- PASS: ", Action::Pass),
    ("--- FAIL: ", Action::Fail),
    ("--- SKIP: ", Action::Skip),
    ("--- BENCH: ", Action::Bench),
];

const INDENT: &str = "    ";

const NO_TEST_FILES_PREFIX: &str = "?   \t";
const NO_TEST_FILES_SUFFIX: &str = "\t[no test files]";

const CACHED_MARKER: &str = "(cached)";

/// Harness-inlined pointer such as `    TestExample: some output`
const TEST_NAME_PREFIX: &str = "    Test";

/// Options for transcript conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptOptions {
    /// Remove a `<timestamp> <level> ` logger prefix from plain output lines
    pub strip_log_prefix: bool,
}

impl TranscriptOptions {
    /// Options with logger prefix stripping enabled
    #[must_use]
    pub fn strip_log_prefix() -> Self {
        Self {
            strip_log_prefix: true,
        }
    }
}

/// A verdict whose event is held back until its indentation level closes
#[derive(Debug, Clone, PartialEq)]
struct PendingReport {
    test: String,
    action: Action,
    elapsed: f64,
}

/// Line-by-line converter for one transcript segment (one package)
#[derive(Debug, Default)]
pub struct TranscriptConverter {
    options: TranscriptOptions,
    package: String,
    elapsed: f64,
    current_test: String,
    reports: Vec<PendingReport>,
    result: Option<Action>,
    finished: bool,
}

impl TranscriptConverter {
    /// Create a converter with the given options
    #[must_use]
    pub fn new(options: TranscriptOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Package named by the segment's summary line, if seen yet
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Overall verdict of the segment, once a summary line has been seen
    #[must_use]
    pub fn result(&self) -> Option<Action> {
        self.result
    }

    /// Whether the segment's terminal line has been consumed
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of reports waiting for their indentation level to close
    #[must_use]
    pub fn depth(&self) -> usize {
        self.reports.len()
    }

    /// Synthetic package-level verdict event for the segment
    #[must_use]
    pub fn summary_event(&self) -> Option<Event> {
        self.result
            .map(|result| Event::summary(result, self.package.clone(), self.elapsed))
    }

    /// Emit pending reports deeper than `depth`, innermost first
    ///
    /// # Errors
    ///
    /// Returns `EventsError::NestingAnomaly` if `depth` is below the bottom
    /// of the stack.
    pub fn flush_reports(&mut self, depth: usize) -> Result<Vec<Event>, EventsError> {
        if depth > self.reports.len() {
            return Err(EventsError::NestingAnomaly {
                depth,
                open: self.reports.len(),
            });
        }

        let events = self
            .reports
            .drain(depth..)
            .rev()
            .map(|report| Event {
                action: report.action,
                package: self.package.clone(),
                test: if report.test.is_empty() {
                    self.current_test.clone()
                } else {
                    report.test
                },
                elapsed: report.elapsed,
                output: String::new(),
            })
            .collect();
        self.current_test.clear();
        Ok(events)
    }

    /// Classify one raw line (with its newline) and return the events it produces
    ///
    /// # Errors
    ///
    /// Returns `EventsError::NestingAnomaly` if the report stack is corrupted.
    pub fn handle_line(&mut self, line: &str) -> Result<Vec<Event>, EventsError> {
        let content = line_content(line);

        if content == BIG_PASS {
            return Ok(vec![Event::output(line, "")]);
        }
        if content == BIG_FAIL {
            // Leading noise before any package is known
            if self.package.is_empty() {
                return Ok(Vec::new());
            }
            return Ok(vec![Event::output(line, "")]);
        }

        if line.starts_with(FAIL_PREFIX) || line.starts_with(OK_PREFIX) {
            return self.handle_summary(line);
        }

        let mut events = Vec::new();

        // An entirely skipped test binary prints only this line. It is still
        // reported as plain output below, but the segment ends as skipped.
        if line.starts_with(NO_TEST_FILES_PREFIX)
            && content.ends_with(NO_TEST_FILES_SUFFIX)
            && self.reports.is_empty()
        {
            events = self.flush_reports(0)?;
            let info = &content[NO_TEST_FILES_PREFIX.len()..];
            self.package = info.split('\t').next().unwrap_or_default().to_string();
            self.result = Some(Action::Skip);
            self.finished = true;
        }

        if let Some((marker, action)) = UPDATE_MARKERS
            .iter()
            .find(|(marker, _)| line.starts_with(marker))
        {
            let name = line[marker.len()..].trim();
            return self.handle_update(events, *action, name, line);
        }

        let (depth, unindented) = strip_indent(line);
        if let Some((marker, action)) = REPORT_MARKERS
            .iter()
            .find(|(marker, _)| unindented.starts_with(marker))
        {
            let rest = &unindented[marker.len()..];
            return self.handle_report(events, *action, rest, depth, line);
        }

        self.handle_output(events, depth, line)
    }

    fn handle_summary(&mut self, line: &str) -> Result<Vec<Event>, EventsError> {
        self.result = Some(if &line[..COMMON_PREFIX_LEN] == BIG_FAIL {
            Action::Fail
        } else {
            Action::Pass
        });

        // Both summary prefixes are 5 bytes long
        let info = &line_content(line)[OK_PREFIX.len()..];
        let (package, timing) = match info.split_once('\t') {
            Some((package, timing)) => (package, Some(timing)),
            None => (info, None),
        };
        self.package = package.to_string();
        self.finished = true;

        if !info.contains(CACHED_MARKER) {
            if let Some(timing) = timing {
                self.elapsed = parse_seconds(timing);
            }
        }

        let mut events = self.flush_reports(0)?;
        events.push(Event::output(line, ""));
        Ok(events)
    }

    fn handle_update(
        &mut self,
        mut events: Vec<Event>,
        action: Action,
        name: &str,
        line: &str,
    ) -> Result<Vec<Event>, EventsError> {
        // A new update implicitly closes every pending report
        events.extend(self.flush_reports(0)?);
        self.current_test = name.to_string();

        let lifecycle = Event {
            test: name.to_string(),
            ..Event::new(action)
        };
        let echo = Event::output(line, name);

        // A pause is announced before it takes effect, so the test does not
        // appear to produce output right after being paused
        if action == Action::Pause {
            events.push(echo);
            events.push(lifecycle);
        } else {
            events.push(lifecycle);
            events.push(echo);
        }
        Ok(events)
    }

    fn handle_report(
        &mut self,
        mut events: Vec<Event>,
        action: Action,
        rest: &str,
        depth: usize,
        line: &str,
    ) -> Result<Vec<Event>, EventsError> {
        let (name, elapsed) = split_elapsed(rest.trim());

        if depth > self.reports.len() {
            debug!(
                depth,
                open = self.reports.len(),
                test = name,
                "report nested deeper than open reports, keeping it as output"
            );
            events.push(Event::output(line, name));
            return Ok(events);
        }

        events.extend(self.flush_reports(depth)?);
        self.current_test = name.to_string();
        self.reports.push(PendingReport {
            test: name.to_string(),
            action,
            elapsed,
        });
        events.push(Event::output(line, name));
        Ok(events)
    }

    fn handle_output(
        &mut self,
        mut events: Vec<Event>,
        depth: usize,
        line: &str,
    ) -> Result<Vec<Event>, EventsError> {
        // Indentation indexes the stack of open subtests. Extra indentation
        // cannot be attributed, so the most recent test keeps the line.
        if depth > 0 && depth <= self.reports.len() {
            self.current_test = self.reports[depth - 1].test.clone();
        }

        let name = extract_test_name(line).unwrap_or(&self.current_test);

        let text = if self.options.strip_log_prefix {
            strip_log_prefix(line).unwrap_or(line)
        } else {
            line
        };

        events.push(Event::output(text, name));
        Ok(events)
    }
}

/// Count and remove leading 4-space indentation units
fn strip_indent(line: &str) -> (usize, &str) {
    let mut depth = 0;
    let mut rest = line;
    while let Some(stripped) = rest.strip_prefix(INDENT) {
        rest = stripped;
        depth += 1;
    }
    (depth, rest)
}

/// Split `Name (0.25s)` into the name and its duration in seconds
fn split_elapsed(name: &str) -> (&str, f64) {
    let Some(idx) = name.find(" (") else {
        return (name, 0.0);
    };

    let elapsed = if name.ends_with("s)") {
        name.get(idx + 2..name.len() - 2)
            .and_then(|secs| secs.parse().ok())
            .unwrap_or(0.0)
    } else {
        0.0
    };
    (&name[..idx], elapsed)
}

/// Parse the `0.015s` duration of a package summary line
fn parse_seconds(timing: &str) -> f64 {
    timing
        .find('s')
        .and_then(|idx| timing[..idx].trim().parse().ok())
        .unwrap_or(0.0)
}

/// Test name from a harness-inlined `    TestName: ...` output line
///
/// This is a heuristic: it can capture something that is not a test name,
/// but it is more accurate than assuming the previous test.
#[must_use]
pub fn extract_test_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(TEST_NAME_PREFIX)?;
    if !rest.contains(':') {
        return None;
    }
    let colon = line.find(':')?;
    Some(&line[INDENT.len()..colon])
}

/// Lazy reader producing events from a verbose transcript
///
/// Events of a segment are released once the segment's summary line has been
/// seen, so that they can carry the package name it announces.
pub struct TranscriptReader<R> {
    source: LineSource<R>,
    options: TranscriptOptions,
    converter: TranscriptConverter,
    segment: Vec<Event>,
    ready: VecDeque<Event>,
    done: bool,
}

impl<R: BufRead> TranscriptReader<R> {
    /// Create a reader with default options
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, TranscriptOptions::default())
    }

    /// Create a reader with the given options
    pub fn with_options(reader: R, options: TranscriptOptions) -> Self {
        Self {
            source: LineSource::new(reader),
            converter: TranscriptConverter::new(options.clone()),
            options,
            segment: Vec::new(),
            ready: VecDeque::new(),
            done: false,
        }
    }

    fn feed(&mut self, line: &str) -> Result<(), EventsError> {
        let events = self.converter.handle_line(line)?;
        self.segment.extend(events);
        if self.converter.is_finished() {
            self.close_segment()?;
        }
        Ok(())
    }

    fn close_segment(&mut self) -> Result<(), EventsError> {
        let package = self.converter.package().to_string();
        for event in &mut self.segment {
            if event.package.is_empty() {
                event.package.clone_from(&package);
            }
        }

        let flushed = self.converter.flush_reports(0)?;
        self.segment.extend(flushed);
        self.segment.extend(self.converter.summary_event());
        self.ready.extend(self.segment.drain(..));

        debug!(
            package = %package,
            line = self.source.line_number(),
            "transcript segment finished"
        );
        self.converter = TranscriptConverter::new(self.options.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EventsError> {
        let flushed = self.converter.flush_reports(0)?;
        self.segment.extend(flushed);
        self.segment.extend(self.converter.summary_event());
        self.ready.extend(self.segment.drain(..));
        Ok(())
    }
}

impl<R: BufRead> Iterator for TranscriptReader<R> {
    type Item = Result<KeyedEvent, EventsError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.ready.pop_front() {
                return Some(Ok((event.key(), event)));
            }
            if self.done {
                return None;
            }

            let step = match self.source.next_line() {
                Ok(Some(line)) => self.feed(&line),
                Ok(None) => {
                    self.done = true;
                    self.finish()
                }
                Err(e) => Err(e),
            };
            if let Err(e) = step {
                self.done = true;
                self.ready.clear();
                return Some(Err(e));
            }
        }
    }
}

/// Convert a complete verbose transcript into events
///
/// # Errors
///
/// Returns `EventsError::NestingAnomaly` if the report stack is corrupted.
pub fn parse_transcript(input: &str) -> Result<Vec<Event>, EventsError> {
    parse_transcript_with(input, TranscriptOptions::default())
}

/// Convert a complete verbose transcript into events using `options`
///
/// # Errors
///
/// Returns `EventsError::NestingAnomaly` if the report stack is corrupted.
pub fn parse_transcript_with(
    input: &str,
    options: TranscriptOptions,
) -> Result<Vec<Event>, EventsError> {
    TranscriptReader::with_options(Cursor::new(input), options)
        .map(|item| item.map(|(_, event)| event))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    const PKG: &str = "example.com/pkg";

    fn event(action: Action, test: &str, elapsed: f64) -> Event {
        Event {
            package: PKG.to_string(),
            test: test.to_string(),
            elapsed,
            ..Event::new(action)
        }
    }

    fn output(line: &str, test: &str) -> Event {
        Event {
            package: PKG.to_string(),
            ..Event::output(line, test)
        }
    }

    #[test]
    fn test_nested_report_closes_only_child() {
        let transcript = "=== RUN   TestParent\n\
                          === RUN   TestParent/Sub\n\
                          --- FAIL: TestParent (0.02s)\n    \
                          --- FAIL: TestParent/Sub (0.01s)\n        \
                          parent_test.go:12: boom\n\
                          FAIL\n\
                          FAIL\texample.com/pkg\t0.030s\n";

        let events = parse_transcript(transcript).expect("Should parse");
        assert_eq!(
            events,
            vec![
                event(Action::Run, "TestParent", 0.0),
                output("=== RUN   TestParent\n", "TestParent"),
                event(Action::Run, "TestParent/Sub", 0.0),
                output("=== RUN   TestParent/Sub\n", "TestParent/Sub"),
                output("--- FAIL: TestParent (0.02s)\n", "TestParent"),
                output("    --- FAIL: TestParent/Sub (0.01s)\n", "TestParent/Sub"),
                output("        parent_test.go:12: boom\n", "TestParent/Sub"),
                event(Action::Fail, "TestParent/Sub", 0.01),
                event(Action::Fail, "TestParent", 0.02),
                output("FAIL\texample.com/pkg\t0.030s\n", ""),
                event(Action::Fail, "", 0.03),
            ]
        );
    }

    #[test]
    fn test_sibling_report_flushes_previous_sibling() {
        let mut converter = TranscriptConverter::default();
        converter
            .handle_line("--- PASS: TestA (0.00s)\n")
            .expect("report");
        converter
            .handle_line("    --- PASS: TestA/one (0.10s)\n")
            .expect("report");
        assert_eq!(converter.depth(), 2);

        let events = converter
            .handle_line("    --- PASS: TestA/two (0.20s)\n")
            .expect("report");
        assert_eq!(
            events,
            vec![
                Event {
                    test: "TestA/one".to_string(),
                    elapsed: 0.1,
                    ..Event::new(Action::Pass)
                },
                Event::output("    --- PASS: TestA/two (0.20s)\n", "TestA/two"),
            ]
        );
        assert_eq!(converter.depth(), 2);
    }

    #[test]
    fn test_report_deeper_than_stack_is_plain_output() {
        let mut converter = TranscriptConverter::default();
        let events = converter
            .handle_line("        --- PASS: TestGhost (0.00s)\n")
            .expect("Should not fail");

        assert_eq!(
            events,
            vec![Event::output(
                "        --- PASS: TestGhost (0.00s)\n",
                "TestGhost"
            )]
        );
        assert_eq!(converter.depth(), 0);
    }

    #[test]
    fn test_cached_summary_has_no_elapsed() {
        let events = parse_transcript("ok  \texample.com/pkg\t(cached)\n").expect("Should parse");
        assert_eq!(
            events,
            vec![
                output("ok  \texample.com/pkg\t(cached)\n", ""),
                event(Action::Pass, "", 0.0),
            ]
        );
    }

    #[test]
    fn test_summary_elapsed_with_coverage_suffix() {
        let mut converter = TranscriptConverter::default();
        converter
            .handle_line("ok  \texample.com/pkg\t1.250s\tcoverage: 80.0% of statements\n")
            .expect("summary");
        let summary = converter.summary_event().expect("Should have a result");
        assert_eq!(summary.elapsed, 1.25);
        assert_eq!(summary.package, PKG);
    }

    #[test]
    fn test_summary_without_tab_keeps_whole_package() {
        let mut converter = TranscriptConverter::default();
        converter
            .handle_line("FAIL\texample.com/pkg [build failed]\n")
            .expect("summary");
        assert_eq!(converter.package(), "example.com/pkg [build failed]");
        assert_eq!(converter.result(), Some(Action::Fail));
        assert!(converter.is_finished());
    }

    #[test]
    fn test_pause_echo_precedes_event() {
        let mut converter = TranscriptConverter::default();
        let events = converter
            .handle_line("=== PAUSE TestA\n")
            .expect("update");
        assert_eq!(
            events,
            vec![
                Event::output("=== PAUSE TestA\n", "TestA"),
                Event {
                    test: "TestA".to_string(),
                    ..Event::new(Action::Pause)
                },
            ]
        );

        let events = converter.handle_line("=== CONT  TestA\n").expect("update");
        assert_eq!(events[0].action, Action::Cont);
        assert_eq!(events[1], Event::output("=== CONT  TestA\n", "TestA"));
    }

    #[test]
    fn test_update_flushes_pending_reports() {
        let mut converter = TranscriptConverter::default();
        converter
            .handle_line("--- PASS: TestA (0.00s)\n")
            .expect("report");
        let events = converter
            .handle_line("=== RUN   TestB\n")
            .expect("update");

        assert_eq!(events[0].action, Action::Pass);
        assert_eq!(events[0].test, "TestA");
        assert_eq!(events[1].action, Action::Run);
        assert_eq!(converter.depth(), 0);
    }

    #[test]
    fn test_no_test_files_segment_is_skipped() {
        let events =
            parse_transcript("?   \texample.com/pkg\t[no test files]\n").expect("Should parse");
        assert_eq!(
            events,
            vec![
                output("?   \texample.com/pkg\t[no test files]\n", ""),
                event(Action::Skip, "", 0.0),
            ]
        );
    }

    #[test]
    fn test_bare_fail_before_package_is_dropped() {
        let mut converter = TranscriptConverter::default();
        assert!(converter.handle_line("FAIL\n").expect("line").is_empty());
        assert_eq!(
            converter.handle_line("PASS\n").expect("line"),
            vec![Event::output("PASS\n", "")]
        );
    }

    #[test]
    fn test_inline_test_name_overrides_attribution() {
        let mut converter = TranscriptConverter::default();
        converter.handle_line("=== RUN   TestA\n").expect("update");
        let events = converter
            .handle_line("    TestB: reported elsewhere\n")
            .expect("output");
        assert_eq!(
            events,
            vec![Event::output("    TestB: reported elsewhere\n", "TestB")]
        );
    }

    #[test]
    fn test_unindented_output_keeps_current_test() {
        let mut converter = TranscriptConverter::default();
        converter.handle_line("=== RUN   TestA\n").expect("update");
        let events = converter.handle_line("hello\n").expect("output");
        assert_eq!(events, vec![Event::output("hello\n", "TestA")]);
    }

    #[test]
    fn test_flush_below_stack_is_rejected() {
        let mut converter = TranscriptConverter::default();
        let result = converter.flush_reports(1);
        assert!(matches!(
            result,
            Err(EventsError::NestingAnomaly { depth: 1, open: 0 })
        ));
    }

    #[test]
    fn test_log_prefix_is_stripped_from_output() {
        let mut converter = TranscriptConverter::new(TranscriptOptions::strip_log_prefix());
        converter.handle_line("=== RUN   TestA\n").expect("update");
        let events = converter
            .handle_line("2020-03-10T12:00:00.123+03:00 INF started node\n")
            .expect("output");
        assert_eq!(events, vec![Event::output("started node\n", "TestA")]);
    }

    #[test]
    fn test_segments_get_their_own_package() {
        let transcript = "=== RUN   TestA\n\
                          --- PASS: TestA (0.00s)\n\
                          PASS\n\
                          ok  \texample.com/a\t0.010s\n\
                          === RUN   TestB\n\
                          --- PASS: TestB (0.00s)\n\
                          PASS\n\
                          ok  \texample.com/b\t0.020s\n";

        let events = parse_transcript(transcript).expect("Should parse");
        let summaries: Vec<(&str, f64)> = events
            .iter()
            .filter(|e| e.test.is_empty() && e.action == Action::Pass)
            .map(|e| (e.package.as_str(), e.elapsed))
            .collect();
        assert_eq!(summaries, vec![("example.com/a", 0.01), ("example.com/b", 0.02)]);

        let run_b = events
            .iter()
            .find(|e| e.action == Action::Run && e.test == "TestB")
            .expect("Should have run event");
        assert_eq!(run_b.package, "example.com/b");
    }

    #[test]
    fn test_unfinished_segment_is_flushed_at_end() {
        let events = parse_transcript("=== RUN   TestA\n--- PASS: TestA (0.50s)\n")
            .expect("Should parse");
        assert_eq!(events.len(), 4);
        assert_eq!(events[3].action, Action::Pass);
        assert_eq!(events[3].test, "TestA");
        assert_eq!(events[3].elapsed, 0.5);
        assert!(events[3].package.is_empty());
    }

    #[test]
    fn test_split_elapsed() {
        assert_eq!(split_elapsed("TestA (0.25s)"), ("TestA", 0.25));
        assert_eq!(split_elapsed("TestA"), ("TestA", 0.0));
        assert_eq!(split_elapsed("TestA (weird)"), ("TestA", 0.0));
        assert_eq!(split_elapsed("TestA (xs)"), ("TestA", 0.0));
    }

    #[test]
    fn test_extract_test_name() {
        assert_eq!(extract_test_name("    TestX: out\n"), Some("TestX"));
        assert_eq!(extract_test_name("    TestX out\n"), None);
        assert_eq!(extract_test_name("TestX: out\n"), None);
    }
}
