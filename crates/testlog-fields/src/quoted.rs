// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! JSON-style quoted values
//!
//! Values containing whitespace are written by the logger as double-quoted
//! strings with backslash escapes. `\uXXXX` is not treated as a code point:
//! the number is written back as raw big-endian bytes, one byte when it fits.

use crate::error::FieldError;

/// Decode a quoted value at the start of `input`
///
/// `input` must start with the opening quote. Returns the decoded bytes and
/// the number of bytes consumed, including both quotes.
///
/// # Errors
///
/// Returns a `FieldError` describing the first malformed construct.
///
/// # Example
///
/// ```
/// use testlog_fields::decode_quoted;
///
/// let (value, consumed) = decode_quoted(r#""a \"b\"\n" rest"#).unwrap();
/// assert_eq!(value, b"a \"b\"\n");
/// assert_eq!(consumed, 11);
/// ```
pub fn decode_quoted(input: &str) -> Result<(Vec<u8>, usize), FieldError> {
    let bytes = input.as_bytes();
    if bytes.first() != Some(&b'"') {
        return Err(FieldError::MissingOpeningQuote);
    }

    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return Ok((out, i + 1)),
            b'\\' => {
                let escape = *bytes
                    .get(i + 1)
                    .ok_or(FieldError::UnterminatedQuotedValue)?;
                match escape {
                    b'"' => out.push(b'"'),
                    b'\\' => out.push(b'\\'),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0c),
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'u' => {
                        let digits = bytes
                            .get(i + 2..i + 6)
                            .ok_or(FieldError::TruncatedUnicodeEscape)?;
                        push_code(&mut out, parse_hex(digits)?);
                        i += 6;
                        continue;
                    }
                    _ => {
                        // The backslash is ASCII, so i + 1 is a char boundary
                        let found = input[i + 1..].chars().next().unwrap_or_default();
                        return Err(FieldError::InvalidEscapeCharacter(found));
                    }
                }
                i += 2;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }

    Err(FieldError::UnterminatedQuotedValue)
}

/// Decode a quoted value and require the result to be UTF-8
///
/// # Errors
///
/// Returns the errors of [`decode_quoted`] and `FieldError::NonUtf8Value`.
pub fn decode_quoted_string(input: &str) -> Result<(String, usize), FieldError> {
    let (bytes, consumed) = decode_quoted(input)?;
    let value = String::from_utf8(bytes).map_err(|_| FieldError::NonUtf8Value)?;
    Ok((value, consumed))
}

fn parse_hex(digits: &[u8]) -> Result<u16, FieldError> {
    let invalid = || FieldError::InvalidUnicodeEscape {
        digits: String::from_utf8_lossy(digits).into_owned(),
    };
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return Err(invalid());
    }
    let text = std::str::from_utf8(digits).map_err(|_| invalid())?;
    u16::from_str_radix(text, 16).map_err(|_| invalid())
}

/// Append `code` as its minimal big-endian byte sequence
fn push_code(out: &mut Vec<u8>, code: u16) {
    let [high, low] = code.to_be_bytes();
    if high != 0 {
        out.push(high);
    }
    out.push(low);
}
