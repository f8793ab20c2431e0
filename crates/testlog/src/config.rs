// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the testlog command line
//!
//! This module provides the clap definitions for the binary: the input
//! format and location shared by the event-reading subcommands, the
//! annotated-log options, and the logging flags.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use testlog_events::{Format, TranscriptOptions};

/// testlog - Go test output as test2json events and test case reports
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "testlog")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run (defaults to `events` reading JSON from stdin)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so stdout stays machine readable.
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Stream normalized events as NDJSON
    ///
    /// Example:
    ///   go test -v ./... | testlog events --format text
    Events(InputArgs),

    /// Extract test management cases and print a report as JSON
    ///
    /// Example:
    ///   go test -json ./... | testlog cases
    Cases {
        /// Where and how to read events
        #[command(flatten)]
        input: InputArgs,

        /// Read cases from `testrail key=value` log annotations instead of
        /// `C<id> <description>` lines in test output
        #[arg(long, default_value = "false")]
        annotated: bool,
    },

    /// Split annotated log lines into message and fields (NDJSON)
    Fields {
        /// Read from this file instead of stdin
        #[arg(short, long, env = "TESTLOG_INPUT")]
        input: Option<PathBuf>,

        /// Parse left to right, failing on malformed lines
        ///
        /// The default right-to-left parse never fails and keeps any text it
        /// cannot split in the message.
        #[arg(long, default_value = "false")]
        forward: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Self::Events(InputArgs::default())
    }
}

/// Input options shared by the event-reading subcommands
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct InputArgs {
    /// Input format: json (go test -json), text (go test -v) or convlog
    #[arg(short, long, env = "TESTLOG_FORMAT", default_value_t = Format::Json)]
    pub format: Format,

    /// Read from this file instead of stdin
    #[arg(short, long, env = "TESTLOG_INPUT")]
    pub input: Option<PathBuf>,

    /// Strip timestamped logger prefixes from transcript lines
    ///
    /// Lines without a prefix are still converted. Only used with
    /// `--format text`.
    #[arg(long, default_value = "false")]
    pub strip_log_prefix: bool,
}

impl InputArgs {
    /// Transcript options implied by the flags
    #[must_use]
    pub fn transcript_options(&self) -> TranscriptOptions {
        if self.strip_log_prefix {
            TranscriptOptions::strip_log_prefix()
        } else {
            TranscriptOptions::default()
        }
    }
}

impl Config {
    /// The subcommand to run, `events` if none was given
    #[must_use]
    pub fn subcommand(&self) -> Command {
        self.command.clone().unwrap_or_default()
    }

    /// Input file named on the command line, if any
    #[must_use]
    pub fn input_path(&self) -> Option<&Path> {
        match &self.command {
            Some(Command::Events(args) | Command::Cases { input: args, .. }) => {
                args.input.as_deref()
            }
            Some(Command::Fields { input, .. }) => input.as_deref(),
            None => None,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an input file is named but does not exist or is
    /// not a regular file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(input) = self.input_path() {
            if !input.exists() {
                return Err(ConfigError::InputNotFound(input.to_path_buf()));
            }
            if !input.is_file() {
                return Err(ConfigError::InputNotFile(input.to_path_buf()));
            }
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Input path not found
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Input path is not a regular file
    #[error("Input path is not a file: {0}")]
    InputNotFile(PathBuf),
}
