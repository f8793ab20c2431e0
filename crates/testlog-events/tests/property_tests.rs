// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Property-based tests for testlog-events
//!
//! Transcripts are generated from a vocabulary of realistic `go test -v`
//! lines mixed with arbitrary text.

use std::io::{BufReader, Cursor};

use proptest::prelude::*;
use testlog_events::prelude::*;
use testlog_events::{TranscriptConverter, TranscriptReader, collect_events};

// ============================================================================
// Strategies
// ============================================================================

fn test_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "Test[A-Z][a-z]{0,6}",
        "Test[A-Z][a-z]{0,4}/[a-z_]{1,6}",
    ]
}

/// A single transcript line, including its newline
fn transcript_line() -> impl Strategy<Value = String> {
    prop_oneof![
        test_name().prop_map(|n| format!("=== RUN   {n}\n")),
        test_name().prop_map(|n| format!("=== PAUSE {n}\n")),
        test_name().prop_map(|n| format!("=== CONT  {n}\n")),
        (
            0usize..4,
            prop_oneof![Just("PASS"), Just("FAIL"), Just("SKIP"), Just("BENCH")],
            test_name(),
            0u32..5000
        )
            .prop_map(|(depth, verdict, n, ms)| format!(
                "{}--- {verdict}: {n} ({}.{:03}s)\n",
                "    ".repeat(depth),
                ms / 1000,
                ms % 1000
            )),
        (0usize..4, "[a-z_]{1,8}\\.go:[0-9]{1,3}: [ -~]{0,30}")
            .prop_map(|(depth, text)| format!("{}{text}\n", "    ".repeat(depth))),
        Just("PASS\n".to_string()),
        Just("FAIL\n".to_string()),
        "[a-z]{1,8}(/[a-z]{1,8}){0,2}".prop_map(|p| format!("ok  \t{p}\t0.015s\n")),
        "[a-z]{1,8}(/[a-z]{1,8}){0,2}".prop_map(|p| format!("FAIL\t{p}\t1.200s\n")),
        "[a-z]{1,8}".prop_map(|p| format!("ok  \t{p}\t(cached)\n")),
        "[a-z]{1,8}".prop_map(|p| format!("?   \t{p}\t[no test files]\n")),
        "[ -~]{0,40}".prop_map(|text| format!("{text}\n")),
    ]
}

fn transcript() -> impl Strategy<Value = String> {
    prop::collection::vec(transcript_line(), 0..40).prop_map(|lines| lines.concat())
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: Conversion never reports a nesting anomaly for real line sequences
    #[test]
    fn prop_conversion_never_fails(input in transcript()) {
        prop_assert!(parse_transcript(&input).is_ok());
    }

    /// Property: Lazy reading yields the same events as batch parsing
    #[test]
    fn prop_lazy_equals_batch(input in transcript(), capacity in 1usize..16) {
        let batch = parse_transcript(&input).expect("batch");
        let reader = BufReader::with_capacity(capacity, Cursor::new(input.as_bytes()));
        let lazy = collect_events(TranscriptReader::new(reader)).expect("lazy");
        prop_assert_eq!(lazy, batch);
    }

    /// Property: Every input line is echoed by exactly one output event
    ///
    /// Bare FAIL lines before any package summary are the only exception.
    #[test]
    fn prop_lines_are_echoed_once(input in transcript()) {
        let events = parse_transcript(&input).expect("parse");
        let outputs = events.iter().filter(|e| e.action == Action::Output).count();
        let lines = input.lines().count();
        prop_assert!(outputs <= lines);

        let bare_fail = input.lines().filter(|l| *l == "FAIL").count();
        prop_assert!(outputs + bare_fail >= lines);
    }

    /// Property: Once a segment summary is seen the report stack is empty
    #[test]
    fn prop_summary_empties_report_stack(input in transcript(), package in "[a-z]{1,8}") {
        let mut converter = TranscriptConverter::default();
        for line in input.split_inclusive('\n') {
            converter.handle_line(line).expect("line");
            if converter.is_finished() {
                converter = TranscriptConverter::default();
            }
        }
        converter
            .handle_line(&format!("ok  \t{package}\t0.100s\n"))
            .expect("summary");
        prop_assert_eq!(converter.depth(), 0);
        prop_assert_eq!(converter.package(), package.as_str());
    }
}
