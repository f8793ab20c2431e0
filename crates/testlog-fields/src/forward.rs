// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Left-to-right annotation parsing
//!
//! A line is read as `message key=value key="quoted value" ...`. The message
//! ends before the word holding the first `=`. If that guess turns out wrong
//! (a later "key" contains whitespace), the line is parsed again with every
//! `=` consumed so far, plus the one after the bad key, treated as part of
//! the message.

use std::collections::BTreeMap;

use tracing::trace;

use crate::ParsedLine;
use crate::error::FieldError;
use crate::quoted::decode_quoted_string;

/// Parse `line` left to right
///
/// # Errors
///
/// Returns `FieldError::KeyMissingEquals` if the line ends inside a key, or
/// a quoted-value error if a quoted value is malformed.
///
/// # Example
///
/// ```
/// use testlog_fields::parse_forward;
///
/// let parsed = parse_forward("one caller=path/file.go:57 Component=sm").unwrap();
/// assert_eq!(parsed.message, "one");
/// assert_eq!(parsed.field("caller"), Some("path/file.go:57"));
/// assert_eq!(parsed.field("Component"), Some("sm"));
/// ```
pub fn parse_forward(line: &str) -> Result<ParsedLine, FieldError> {
    let mut scan = MessageScan::new(line);
    let mut skip = 0;

    loop {
        match attempt(&mut scan, skip)? {
            Attempt::Parsed(parsed) => return Ok(parsed),
            Attempt::Widen(widened) => {
                trace!(skip = widened, "key contains whitespace, widening message");
                skip = widened;
            }
        }
    }
}

/// Outcome of one parse of a line
#[derive(Debug, PartialEq, Eq)]
enum Attempt {
    Parsed(ParsedLine),
    /// Parse again, ignoring this many `=` when looking for the message end
    Widen(usize),
}

/// One parse of the scanned line, ignoring the first `skip` equals signs
/// when looking for the end of the message
fn attempt(scan: &mut MessageScan<'_>, skip: usize) -> Result<Attempt, FieldError> {
    let (message, mut rest) = scan.split(skip);
    let mut fields = BTreeMap::new();
    let mut pairs = 0;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(Attempt::Parsed(ParsedLine {
                message: message.to_string(),
                fields,
            }));
        }

        let (key, after_key) = match parse_key(rest) {
            Ok(parts) => parts,
            // The first key always parses, so the skip grows on each retry
            // and eventually the whole line is the message.
            Err(FieldError::KeyContainsSpace) => return Ok(Attempt::Widen(skip + pairs + 1)),
            Err(e) => return Err(e),
        };

        let (value, after_value) = parse_value(after_key)?;
        fields.insert(key.to_string(), value);
        pairs += 1;
        rest = after_value;
    }
}

/// Incremental search for the end of the message
///
/// Retries only ever ignore more `=` signs, so each split resumes where the
/// previous one stopped instead of rescanning the line.
struct MessageScan<'a> {
    line: &'a str,
    /// Byte offset of the next character to examine
    pos: usize,
    /// Byte offset of the word holding `pos`
    word_start: usize,
    /// Equals signs passed over so far
    seen: usize,
}

impl<'a> MessageScan<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            pos: 0,
            word_start: 0,
            seen: 0,
        }
    }

    /// Split off the message, returning it trimmed together with the rest
    fn split(&mut self, skip: usize) -> (&'a str, &'a str) {
        let line = self.line;
        let start = self.pos;

        for (offset, c) in line[start..].char_indices() {
            let i = start + offset;
            if c == '=' {
                if self.seen < skip {
                    self.seen += 1;
                    continue;
                }
                self.pos = i;
                return (line[..self.word_start].trim(), &line[self.word_start..]);
            }
            if c.is_whitespace() {
                self.word_start = i + c.len_utf8();
            }
        }

        self.pos = line.len();
        (line.trim(), "")
    }
}

/// Read a key up to its `=`, returning the key and the text after `=`
fn parse_key(input: &str) -> Result<(&str, &str), FieldError> {
    for (i, c) in input.char_indices() {
        if c.is_whitespace() {
            return Err(FieldError::KeyContainsSpace);
        }
        if c == '=' {
            return Ok((&input[..i], &input[i + 1..]));
        }
    }
    Err(FieldError::KeyMissingEquals)
}

/// Read a quoted or bare value, returning it and the text after it
fn parse_value(input: &str) -> Result<(String, &str), FieldError> {
    if input.starts_with('"') {
        let (value, consumed) = decode_quoted_string(input)?;
        return Ok((value, &input[consumed..]));
    }

    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    Ok((input[..end].to_string(), &input[end..]))
}
