// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! testlog: Go test output as test2json events and test case reports
//!
//! This binary reads `go test` output (structured, verbose or timestamped
//! logger output) from a file or stdin and writes normalized results to
//! stdout. Logs go to stderr.

use std::io;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use testlog::{Config, run};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(config.log_level().into()))
        .with_writer(io::stderr)
        .init();

    debug!(?config, "starting testlog");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&config, &mut out).context("testlog failed")?;

    Ok(())
}
