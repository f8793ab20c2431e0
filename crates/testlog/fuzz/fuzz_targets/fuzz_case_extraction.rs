#![no_main]

//! Fuzz target for case extraction
//!
//! Arbitrary input is read in every format and fed to both extractors. No
//! input may cause a panic, and every report must partition its cases.

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;

use testlog::cases::{CaseExtractor, CaseReport};
use testlog_events::{Format, TranscriptOptions, open_reader};

fuzz_target!(|data: &[u8]| {
    for format in [Format::Json, Format::Text, Format::ConvLog] {
        for extractor in [CaseExtractor::Transcript, CaseExtractor::Annotated] {
            let stream = open_reader(format, Cursor::new(data), TranscriptOptions::default());
            if let Ok(cases) = extractor.extract(stream) {
                let total = cases.len();
                let report = CaseReport::new(cases);
                assert_eq!(report.identified.len() + report.unidentified.len(), total);
            }
        }
    }
});
