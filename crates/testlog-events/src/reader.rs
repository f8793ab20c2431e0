// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Input formats and keyed event streams
//!
//! Every reader in this crate yields `(TestKey, Event)` pairs lazily. This
//! module selects a reader for an input [`Format`] and groups a stream by key.

use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::convlog::ConvLogReader;
use crate::error::EventsError;
use crate::event::{Event, TestKey};
use crate::json::JsonEventReader;
use crate::transcript::{TranscriptOptions, TranscriptReader};

/// An event together with the key of the test it belongs to
pub type KeyedEvent = (TestKey, Event);

/// Boxed lazy stream of keyed events
pub type EventStream<'a> = Box<dyn Iterator<Item = Result<KeyedEvent, EventsError>> + 'a>;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// One test2json event per line (`go test -json`)
    #[default]
    Json,
    /// Verbose transcript (`go test -v`)
    Text,
    /// Timestamped logger output
    ConvLog,
}

impl Format {
    /// Name used on the command line
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::ConvLog => "convlog",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = EventsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            "convlog" => Ok(Self::ConvLog),
            other => Err(EventsError::UnknownFormat(other.to_string())),
        }
    }
}

/// Open a lazy event stream over `input` in the given format
///
/// `options` only affect [`Format::Text`].
pub fn open_reader<'a, R: BufRead + 'a>(
    format: Format,
    input: R,
    options: TranscriptOptions,
) -> EventStream<'a> {
    match format {
        Format::Json => Box::new(JsonEventReader::new(input)),
        Format::Text => Box::new(TranscriptReader::with_options(input, options)),
        Format::ConvLog => Box::new(ConvLogReader::new(input)),
    }
}

/// Drain a stream into a vector, stopping at the first error
///
/// # Errors
///
/// Returns the first error the stream yields.
pub fn collect_events<I>(stream: I) -> Result<Vec<Event>, EventsError>
where
    I: IntoIterator<Item = Result<KeyedEvent, EventsError>>,
{
    stream
        .into_iter()
        .map(|item| item.map(|(_, event)| event))
        .collect()
}

/// Events grouped by test, in order of first appearance
#[derive(Debug, Clone, Default)]
pub struct EventGroups {
    groups: Vec<(TestKey, Vec<Event>)>,
    index: HashMap<TestKey, usize>,
}

impl EventGroups {
    /// Create an empty grouping
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Group a whole stream
    ///
    /// # Errors
    ///
    /// Returns the first error the stream yields.
    pub fn from_stream<I>(stream: I) -> Result<Self, EventsError>
    where
        I: IntoIterator<Item = Result<KeyedEvent, EventsError>>,
    {
        let mut groups = Self::new();
        for item in stream {
            let (key, event) = item?;
            groups.push(key, event);
        }
        Ok(groups)
    }

    /// Append an event to its test's group
    pub fn push(&mut self, key: TestKey, event: Event) {
        match self.index.get(&key) {
            Some(&idx) => self.groups[idx].1.push(event),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![event]));
            }
        }
    }

    /// Number of distinct tests
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no events were grouped
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Events recorded for `key`
    #[must_use]
    pub fn get(&self, key: &TestKey) -> Option<&[Event]> {
        self.index.get(key).map(|&idx| self.groups[idx].1.as_slice())
    }

    /// Keys in order of first appearance
    pub fn keys(&self) -> impl Iterator<Item = &TestKey> {
        self.groups.iter().map(|(key, _)| key)
    }

    /// Groups in order of first appearance
    pub fn iter(&self) -> impl Iterator<Item = (&TestKey, &[Event])> {
        self.groups
            .iter()
            .map(|(key, events)| (key, events.as_slice()))
    }
}

impl IntoIterator for EventGroups {
    type Item = Result<KeyedEvent, EventsError>;
    type IntoIter = GroupedEvents;

    fn into_iter(self) -> Self::IntoIter {
        GroupedEvents {
            groups: self.groups.into_iter(),
            current: None,
        }
    }
}

/// Stream over grouped events, one whole group after another
pub struct GroupedEvents {
    groups: std::vec::IntoIter<(TestKey, Vec<Event>)>,
    current: Option<(TestKey, std::vec::IntoIter<Event>)>,
}

impl Iterator for GroupedEvents {
    type Item = Result<KeyedEvent, EventsError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key, events)) = &mut self.current {
                if let Some(event) = events.next() {
                    return Some(Ok((key.clone(), event)));
                }
            }
            let (key, events) = self.groups.next()?;
            self.current = Some((key, events.into_iter()));
        }
    }
}
