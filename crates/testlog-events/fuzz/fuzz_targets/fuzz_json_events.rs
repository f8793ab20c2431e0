// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for structured test2json logs

#![no_main]

use libfuzzer_sys::fuzz_target;

use testlog_events::parse_json_events;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = parse_json_events(input);
    }
});
