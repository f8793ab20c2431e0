// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Property-based tests for testlog-fields
//!
//! Lines are rendered the way a structured logger writes them: a message,
//! then `key=value` pairs with JSON-quoted values where needed.

use proptest::prelude::*;
use testlog_fields::decode_quoted;
use testlog_fields::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Messages without `=` or quotes
fn message() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9:;,.()/ -]{0,40}"
}

fn key() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_.]{0,12}"
}

/// A value already rendered for the line
fn rendered_value() -> impl Strategy<Value = String> {
    prop_oneof![
        // Bare values cannot contain whitespace, '=' or quotes
        "[a-zA-Z0-9:/._,-]{0,20}",
        // Anything else is quoted
        ".{0,20}".prop_map(|v| serde_json::to_string(&v).expect("serialize")),
    ]
}

fn annotated_line() -> impl Strategy<Value = String> {
    (
        message(),
        prop::collection::vec((key(), rendered_value()), 0..6),
    )
        .prop_map(|(message, pairs)| {
            let mut line = message;
            for (key, value) in pairs {
                line.push(' ');
                line.push_str(&key);
                line.push('=');
                line.push_str(&value);
            }
            line
        })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Property: Both directions agree on well-formed lines
    #[test]
    fn prop_forward_matches_reverse(line in annotated_line()) {
        let forward = parse_forward(&line).expect("well-formed line");
        prop_assert_eq!(forward, parse_reverse(&line));
    }

    /// Property: A message without fields comes back unchanged
    #[test]
    fn prop_field_free_message_is_identity(message in "[a-zA-Z0-9:;,.()/-]{1,10}( [a-zA-Z0-9:;,.()/-]{1,10}){0,4}") {
        let forward = parse_forward(&message).expect("plain message");
        prop_assert_eq!(&forward.message, &message);
        prop_assert!(forward.fields.is_empty());

        let reverse = parse_reverse(&message);
        prop_assert_eq!(&reverse.message, &message);
        prop_assert!(reverse.fields.is_empty());
    }

    /// Property: Quoted values decode to what was encoded
    #[test]
    fn prop_quoted_value_survives(value in ".{0,30}") {
        let line = format!("msg k={}", serde_json::to_string(&value).expect("serialize"));
        let forward = parse_forward(&line).expect("parse");
        prop_assert_eq!(forward.field("k"), Some(value.as_str()));
        let reverse = parse_reverse(&line);
        prop_assert_eq!(reverse.field("k"), Some(value.as_str()));
    }

    /// Property: \u00XX decodes to the single byte 0xXX
    #[test]
    fn prop_low_unicode_escape_is_one_byte(byte in any::<u8>()) {
        let input = format!("\"\\u{byte:04x}\"");
        let (decoded, consumed) = decode_quoted(&input).expect("decode");
        prop_assert_eq!(decoded, vec![byte]);
        prop_assert_eq!(consumed, input.len());
    }

    /// Property: The reverse parser never panics on arbitrary text
    #[test]
    fn prop_reverse_never_panics(line in ".{0,80}") {
        let _ = parse_reverse(&line);
    }

    /// Property: The forward parser terminates on arbitrary text
    #[test]
    fn prop_forward_terminates(line in "[a-z =\"\\\\]{0,40}") {
        let _ = parse_forward(&line);
    }
}
