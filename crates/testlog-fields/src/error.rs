// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for testlog-fields

use thiserror::Error;

/// Errors that can occur while splitting a log line into message and fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A quoted value was expected but the input does not start with `"`
    #[error("quoted value must start with '\"'")]
    MissingOpeningQuote,

    /// No closing quote, or the value ends in the middle of an escape
    #[error("unterminated quoted value")]
    UnterminatedQuotedValue,

    /// Fewer than four bytes follow `\u`
    #[error("truncated \\u escape")]
    TruncatedUnicodeEscape,

    /// The four bytes after `\u` are not hexadecimal digits
    #[error("invalid \\u escape: {digits}")]
    InvalidUnicodeEscape {
        /// The offending digits
        digits: String,
    },

    /// Backslash followed by a character that is not a known escape
    #[error("invalid escape character: {0:?}")]
    InvalidEscapeCharacter(char),

    /// A decoded value is not valid UTF-8
    #[error("field value is not valid UTF-8")]
    NonUtf8Value,

    /// Whitespace inside a key, so the message boundary was guessed wrong
    #[error("malformed key: got space")]
    KeyContainsSpace,

    /// Input ended before the `=` closing a key
    #[error("malformed key: missing '='")]
    KeyMissingEquals,

    /// A value read right to left is not followed by `key=`
    #[error("malformed value while scanning from the right")]
    MalformedReversedValue,
}
