// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Timestamped logger output
//!
//! Services under test often log through a console writer that prefixes each
//! line with an RFC 3339 timestamp and a three letter level, for example
//! `2020-03-10T12:00:00.123+03:00 INF node started`. This module recognises
//! that prefix and turns such logs into plain `output` events.

use std::io::BufRead;

use chrono::DateTime;
use tracing::trace;

use crate::error::EventsError;
use crate::event::Event;
use crate::reader::KeyedEvent;
use crate::source::LineSource;

/// Width of the level column (`INF`, `WRN`, `ERR`, ...)
const LEVEL_WIDTH: usize = 3;

/// Return the part of `line` after a `<timestamp> <level> ` prefix
///
/// The timestamp must carry fractional seconds and a `Z` or `±hh:mm` offset.
/// Returns `None` if the line does not start with such a prefix.
///
/// # Example
///
/// ```
/// use testlog_events::convlog::strip_log_prefix;
///
/// assert_eq!(
///     strip_log_prefix("2020-03-10T12:00:00.123Z INF hello\n"),
///     Some("hello\n")
/// );
/// assert_eq!(strip_log_prefix("hello\n"), None);
/// ```
#[must_use]
pub fn strip_log_prefix(line: &str) -> Option<&str> {
    let stamp_end = line.find(char::is_whitespace)?;
    let stamp = &line[..stamp_end];
    if !has_fractional_seconds(stamp) {
        return None;
    }
    DateTime::parse_from_rfc3339(stamp).ok()?;

    let mut chars = line[stamp_end..].char_indices();
    // Separator between timestamp and level
    chars.next()?;
    for _ in 0..LEVEL_WIDTH {
        let (_, c) = chars.next()?;
        if c == '\n' {
            return None;
        }
    }
    let (idx, c) = chars.next()?;
    if !c.is_whitespace() {
        return None;
    }
    Some(&line[stamp_end + idx + c.len_utf8()..])
}

fn has_fractional_seconds(stamp: &str) -> bool {
    // yyyy-mm-ddThh:mm:ss is 19 bytes
    stamp
        .get(19..)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
}

/// Lazy reader turning prefixed log lines into `output` events
///
/// Lines without the prefix are dropped.
pub struct ConvLogReader<R> {
    source: LineSource<R>,
    done: bool,
}

impl<R: BufRead> ConvLogReader<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            source: LineSource::new(reader),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for ConvLogReader<R> {
    type Item = Result<KeyedEvent, EventsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let line = match self.source.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            match strip_log_prefix(&line) {
                Some(text) => {
                    let event = Event::output(text, "");
                    return Some(Ok((event.key(), event)));
                }
                None => trace!(line = self.source.line_number(), "dropping unprefixed line"),
            }
        }
    }
}
