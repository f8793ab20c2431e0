// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! testlog-events: Go test output as a uniform event stream
//!
//! This library crate turns the three kinds of test output the testlog tool
//! accepts into test2json-style [`Event`]s, keyed by `(package, test)`:
//!
//! - structured `go test -json` logs ([`json`])
//! - verbose `go test -v` transcripts ([`transcript`])
//! - timestamped logger output ([`convlog`])
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use testlog_events::{EventGroups, Format, TranscriptOptions, open_reader};
//!
//! let transcript = "=== RUN   TestOne\n--- PASS: TestOne (0.01s)\nPASS\nok  \texample.com/pkg\t0.015s\n";
//! let stream = open_reader(Format::Text, Cursor::new(transcript), TranscriptOptions::default());
//!
//! let groups = EventGroups::from_stream(stream).unwrap();
//! assert_eq!(groups.len(), 2);
//! ```

pub mod convlog;
pub mod error;
pub mod event;
pub mod json;
pub mod reader;
pub mod source;
pub mod transcript;

pub use error::EventsError;
pub use event::{Action, Event, TestKey};
pub use json::{JsonEventReader, parse_json_events};
pub use reader::{EventGroups, EventStream, Format, KeyedEvent, collect_events, open_reader};
pub use transcript::{
    TranscriptConverter, TranscriptOptions, TranscriptReader, parse_transcript,
    parse_transcript_with,
};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::EventsError;
    pub use crate::event::{Action, Event, TestKey};
    pub use crate::reader::{EventGroups, Format, KeyedEvent, open_reader};
    pub use crate::transcript::{TranscriptOptions, parse_transcript};
}
