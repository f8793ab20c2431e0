#![no_main]

//! Fuzz target for command-line parsing
//!
//! Arbitrary argument vectors must either parse or produce a clap error,
//! and parsed configurations must validate without panicking.

use clap::Parser;
use libfuzzer_sys::fuzz_target;

use testlog::config::Config;

fuzz_target!(|args: Vec<String>| {
    let argv = std::iter::once("testlog".to_string()).chain(args);
    if let Ok(config) = Config::try_parse_from(argv) {
        let _ = config.log_level();
        let _ = config.subcommand();
        let _ = config.validate();
    }
});
