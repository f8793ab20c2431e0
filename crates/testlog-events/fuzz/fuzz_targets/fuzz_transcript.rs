// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the transcript reader
//!
//! Arbitrary bytes (including invalid UTF-8) are fed through the lazy reader.

#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;

use testlog_events::TranscriptReader;

fuzz_target!(|data: &[u8]| {
    // Reader should never panic and never report a nesting anomaly
    for item in TranscriptReader::new(Cursor::new(data)) {
        assert!(item.is_ok());
    }
});
