// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the forward and reverse field parsers

#![no_main]

use libfuzzer_sys::fuzz_target;

use testlog_fields::{parse_forward, parse_reverse};

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        // Neither direction should panic or loop forever
        let _ = parse_forward(line);
        let parsed = parse_reverse(line);

        // Reverse parsing only ever shrinks the line
        assert!(parsed.message.len() <= line.len());
    }
});
