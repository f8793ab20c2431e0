// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! testlog library
//!
//! This module exports the command-line pieces of testlog (configuration,
//! test case extraction and subcommand execution) for use in integration
//! tests and as a library.

pub mod cases;
pub mod commands;
pub mod config;

pub use cases::{CaseExtractor, CaseReport, CaseStatus, TestCase};
pub use commands::{CliError, run};
pub use config::{Command, Config, ConfigError, InputArgs};
