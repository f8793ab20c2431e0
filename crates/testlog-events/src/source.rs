// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Buffered line reading

use std::borrow::Cow;
use std::io::BufRead;

use tracing::debug;

use crate::error::EventsError;

/// Reads lines from a byte stream, keeping line terminators
pub struct LineSource<R> {
    reader: R,
    buf: Vec<u8>,
    line_number: usize,
}

impl<R: BufRead> LineSource<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_number: 0,
        }
    }

    /// Read the next line, including its trailing `\n` if present
    ///
    /// A final line without a newline is still returned. Invalid UTF-8 is
    /// replaced with U+FFFD and logged with the line number.
    ///
    /// # Errors
    ///
    /// Returns `EventsError::Io` if the underlying reader fails.
    pub fn next_line(&mut self) -> Result<Option<String>, EventsError> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let line = String::from_utf8_lossy(&self.buf);
        if let Cow::Owned(_) = line {
            debug!(line = self.line_number, "replaced invalid UTF-8 in input line");
        }
        Ok(Some(line.into_owned()))
    }

    /// 1-based number of the line most recently returned
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

/// Strip a trailing `\n` (and `\r\n`) from a raw line
#[must_use]
pub fn line_content(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
