// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Right-to-left annotation parsing
//!
//! Trailing `key=value` pairs are well formed, while an `=` inside the
//! message (`RequestID = 2`) is not followed by a clean `value key=` chain.
//! Reading from the right therefore finds the message boundary without any
//! retrying: the first thing that does not parse as a pair starts the message.

use std::collections::BTreeMap;

use tracing::trace;

use crate::ParsedLine;
use crate::error::FieldError;
use crate::quoted::decode_quoted_string;

/// Parse `line` right to left
///
/// Never fails: anything left of the last well-formed pair is the message.
///
/// # Example
///
/// ```
/// use testlog_fields::parse_reverse;
///
/// let parsed = parse_reverse("sent RequestID = 2 caller=net.go:136 traceid=");
/// assert_eq!(parsed.message, "sent RequestID = 2");
/// assert_eq!(parsed.field("caller"), Some("net.go:136"));
/// assert_eq!(parsed.field("traceid"), Some(""));
/// ```
#[must_use]
pub fn parse_reverse(line: &str) -> ParsedLine {
    let reversed: Vec<char> = line.chars().rev().collect();
    let mut fields = BTreeMap::new();
    let mut pos = 0;

    loop {
        while reversed.get(pos).is_some_and(|c| c.is_whitespace()) {
            pos += 1;
        }
        if pos == reversed.len() {
            return ParsedLine {
                message: String::new(),
                fields,
            };
        }

        match parse_pair(&reversed, pos) {
            Ok((key, value, next)) => {
                // Scanning backwards, so the first value seen is the rightmost
                fields.entry(key).or_insert(value);
                pos = next;
            }
            Err(e) => {
                trace!(error = %e, position = pos, "field extraction stopped");
                return ParsedLine {
                    message: unreverse(&reversed[pos..]).trim().to_string(),
                    fields,
                };
            }
        }
    }
}

/// Read `value` then `key=` leftwards from `start`
///
/// Returns the key, the value and the position after the key.
fn parse_pair(reversed: &[char], start: usize) -> Result<(String, String, usize), FieldError> {
    let (value, equals) = if reversed[start] == '"' {
        quoted_value(reversed, start)?
    } else {
        bare_value(reversed, start)?
    };

    let key_start = equals + 1;
    let key_end = reversed[key_start..]
        .iter()
        .position(|c| c.is_whitespace())
        .map_or(reversed.len(), |offset| key_start + offset);
    if key_end == key_start {
        return Err(FieldError::MalformedReversedValue);
    }

    Ok((unreverse(&reversed[key_start..key_end]), value, key_end))
}

/// A bare value runs to the `=` on its left; whitespace first means no pair
fn bare_value(reversed: &[char], start: usize) -> Result<(String, usize), FieldError> {
    for (i, c) in reversed.iter().enumerate().skip(start) {
        if *c == '=' {
            return Ok((unreverse(&reversed[start..i]), i));
        }
        if c.is_whitespace() {
            return Err(FieldError::MalformedReversedValue);
        }
    }
    Err(FieldError::MalformedReversedValue)
}

/// A quoted value opens at the first quote that has `=` on its left
///
/// Quotes inside the value are escaped, so they are followed by a backslash
/// in reversed order and never match.
fn quoted_value(reversed: &[char], start: usize) -> Result<(String, usize), FieldError> {
    let open = (start + 1..reversed.len().saturating_sub(1))
        .find(|&i| reversed[i] == '"' && reversed[i + 1] == '=')
        .ok_or(FieldError::MalformedReversedValue)?;

    let quoted = unreverse(&reversed[start..=open]);
    let (value, consumed) =
        decode_quoted_string(&quoted).map_err(|_| FieldError::MalformedReversedValue)?;
    if consumed != quoted.len() {
        return Err(FieldError::MalformedReversedValue);
    }
    Ok((value, open + 1))
}

fn unreverse(chars: &[char]) -> String {
    chars.iter().rev().collect()
}
