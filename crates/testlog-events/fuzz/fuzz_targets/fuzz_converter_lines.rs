// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the line converter
//!
//! Structured input lets the fuzzer build transcripts from marker lines
//! rather than discovering them byte by byte.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use testlog_events::{TranscriptConverter, TranscriptOptions};

#[derive(Debug, Arbitrary)]
enum Line {
    Update { marker: u8, name: String },
    Report { depth: u8, marker: u8, name: String, elapsed: u16 },
    Summary { ok: bool, package: String },
    NoTestFiles { package: String },
    Output { depth: u8, text: String },
}

impl Line {
    fn render(&self) -> String {
        match self {
            Self::Update { marker, name } => {
                let marker = ["=== RUN   ", "=== PAUSE ", "=== CONT  "][*marker as usize % 3];
                format!("{marker}{name}\n")
            }
            Self::Report { depth, marker, name, elapsed } => {
                let marker = ["PASS", "FAIL", "SKIP", "BENCH"][*marker as usize % 4];
                let indent = "    ".repeat(*depth as usize % 6);
                format!("{indent}--- {marker}: {name} ({}.{:02}s)\n", elapsed / 100, elapsed % 100)
            }
            Self::Summary { ok, package } => {
                let prefix = if *ok { "ok  " } else { "FAIL" };
                format!("{prefix}\t{package}\t0.010s\n")
            }
            Self::NoTestFiles { package } => format!("?   \t{package}\t[no test files]\n"),
            Self::Output { depth, text } => {
                format!("{}{text}\n", "    ".repeat(*depth as usize % 6))
            }
        }
    }
}

fuzz_target!(|lines: Vec<Line>| {
    let mut converter = TranscriptConverter::new(TranscriptOptions::strip_log_prefix());
    for line in &lines {
        converter
            .handle_line(&line.render())
            .expect("converter should accept any line");
        if converter.is_finished() {
            converter = TranscriptConverter::new(TranscriptOptions::strip_log_prefix());
        }
    }
    let _ = converter.flush_reports(0).expect("flushing to zero always succeeds");
});
