// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for quoted value decoding

#![no_main]

use libfuzzer_sys::fuzz_target;

use testlog_fields::decode_quoted;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok((_, consumed)) = decode_quoted(input) {
            assert!(consumed <= input.len());
            assert!(input.is_char_boundary(consumed));
        }
    }
});
