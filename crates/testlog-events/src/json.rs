// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Structured test2json logs
//!
//! Each non-blank line is one JSON event. Events pass through unchanged,
//! except that output lines carrying a harness-inlined `    TestName:` pointer
//! are re-attributed to that test.

use std::io::{BufRead, Cursor};

use tracing::trace;

use crate::error::EventsError;
use crate::event::{Action, Event};
use crate::reader::KeyedEvent;
use crate::source::LineSource;
use crate::transcript::extract_test_name;

/// Lazy reader decoding one test2json event per line
pub struct JsonEventReader<R> {
    source: LineSource<R>,
    done: bool,
}

impl<R: BufRead> JsonEventReader<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            source: LineSource::new(reader),
            done: false,
        }
    }

    fn decode(&self, line: &str) -> Result<Event, EventsError> {
        let mut event: Event =
            serde_json::from_str(line).map_err(|source| EventsError::JsonParse {
                line: self.source.line_number(),
                source,
            })?;

        if event.action == Action::Output {
            if let Some(name) = extract_test_name(&event.output) {
                event.test = name.to_string();
            }
        }
        Ok(event)
    }
}

impl<R: BufRead> Iterator for JsonEventReader<R> {
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

            if line.trim().is_empty() {
                trace!(line = self.source.line_number(), "skipping blank line");
                continue;
            }

            return match self.decode(&line) {
                Ok(event) => Some(Ok((event.key(), event))),
                Err(e) => {
                    self.done = true;
                    Some(Err(e))
                }
            };
        }
    }
}

/// Decode a complete test2json log
///
/// # Errors
///
/// Returns `EventsError::JsonParse` for the first line that is not a valid event.
pub fn parse_json_events(input: &str) -> Result<Vec<Event>, EventsError> {
    JsonEventReader::new(Cursor::new(input))
        .map(|item| item.map(|(_, event)| event))
        .collect()
}
