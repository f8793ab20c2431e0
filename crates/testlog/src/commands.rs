// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Subcommand execution
//!
//! Each subcommand reads its input lazily and writes machine-readable
//! output: NDJSON for `events` and `fields`, a pretty-printed report for
//! `cases`. Progress and warnings go to the tracing subscriber.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use testlog_events::source::{LineSource, line_content};
use testlog_events::{EventsError, Format, TranscriptOptions, open_reader};
use testlog_fields::{FieldError, parse_forward, parse_reverse};

use crate::cases::{CaseExtractor, CaseReport};
use crate::config::{Command, Config, ConfigError};

// ============================================================================
// Error Types
// ============================================================================

/// Command-line errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The input could not be opened
    #[error("Failed to open input {path}: {source}")]
    OpenInput {
        /// Path given on the command line
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The event stream failed
    #[error("Failed to read events: {0}")]
    Events(#[from] EventsError),

    /// A log line could not be split into fields
    #[error("Failed to parse fields on line {line}: {source}. Omit --forward to keep malformed text in the message.")]
    Field {
        /// 1-based input line number
        line: usize,
        /// Parser error
        #[source]
        source: FieldError,
    },

    /// Writing output failed
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Input
// ============================================================================

/// Open `path` for buffered reading, or stdin when no path is given
///
/// # Errors
///
/// Returns `CliError::OpenInput` if the file cannot be opened.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>, CliError> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|source| CliError::OpenInput {
                path: path.to_path_buf(),
                source,
            })?;
            debug!(path = %path.display(), "reading input file");
            Ok(Box::new(BufReader::new(file)))
        }
        None => {
            debug!("reading stdin");
            Ok(Box::new(io::stdin().lock()))
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Run the subcommand selected by `config`, writing its output to `out`
///
/// # Errors
///
/// Returns the first configuration, input, parse or output error.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<(), CliError> {
    config.validate()?;
    let input = open_input(config.input_path())?;

    match config.subcommand() {
        Command::Events(args) => {
            run_events(args.format, args.transcript_options(), input, out)?;
        }
        Command::Cases {
            input: args,
            annotated,
        } => {
            let extractor = if annotated {
                CaseExtractor::Annotated
            } else {
                CaseExtractor::Transcript
            };
            run_cases(
                args.format,
                args.transcript_options(),
                extractor,
                input,
                out,
            )?;
        }
        Command::Fields { forward, .. } => {
            run_fields(forward, input, out)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Write every event in `input` as one test2json line
///
/// Returns the number of events written.
///
/// # Errors
///
/// Returns the first stream or output error.
pub fn run_events<R: BufRead, W: Write>(
    format: Format,
    options: TranscriptOptions,
    input: R,
    out: &mut W,
) -> Result<usize, CliError> {
    let mut written = 0;
    for item in open_reader(format, input, options) {
        let (_, event) = item?;
        serde_json::to_writer(&mut *out, &event)?;
        out.write_all(b"\n")?;
        written += 1;
    }

    info!(%format, events = written, "events written");
    Ok(written)
}

/// Extract test cases from `input` and write the report as pretty JSON
///
/// # Errors
///
/// Returns the first stream or output error.
pub fn run_cases<R: BufRead, W: Write>(
    format: Format,
    options: TranscriptOptions,
    extractor: CaseExtractor,
    input: R,
    out: &mut W,
) -> Result<CaseReport, CliError> {
    let cases = extractor.extract(open_reader(format, input, options))?;
    let report = CaseReport::new(cases);
    report.log_warnings();

    serde_json::to_writer_pretty(&mut *out, &report)?;
    out.write_all(b"\n")?;

    info!(
        identified = report.identified.len(),
        unidentified = report.unidentified.len(),
        skipped_without_issue = report.skipped_without_issue.len(),
        "case report written"
    );
    Ok(report)
}

/// Split each line of `input` into message and fields, one JSON object per line
///
/// Returns the number of lines written.
///
/// # Errors
///
/// Returns `CliError::Field` for a malformed line when `forward` is set, or
/// the first input or output error.
pub fn run_fields<R: BufRead, W: Write>(
    forward: bool,
    input: R,
    out: &mut W,
) -> Result<usize, CliError> {
    let mut source = LineSource::new(input);
    let mut written = 0;

    while let Some(raw) = source.next_line()? {
        let line = line_content(&raw);
        let parsed = if forward {
            parse_forward(line).map_err(|source_err| CliError::Field {
                line: source.line_number(),
                source: source_err,
            })?
        } else {
            parse_reverse(line)
        };
        serde_json::to_writer(&mut *out, &parsed)?;
        out.write_all(b"\n")?;
        written += 1;
    }

    info!(lines = written, forward, "fields written");
    Ok(written)
}
