// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! testlog-fields: key=value annotations in log lines
//!
//! Structured loggers render a record as a free-text message followed by
//! `key=value` pairs, quoting values that need it. This library crate splits
//! such a line back into its message and fields, either left to right
//! ([`parse_forward`]) or right to left ([`parse_reverse`]), the latter being
//! robust to messages that themselves contain `=`.

#![warn(missing_docs)]

//! # Example
//!
//! ```
//! use testlog_fields::{parse_forward, parse_reverse};
//!
//! let line = "testrail ID=C5005 TestName=TestLogin Status=PASS";
//! let forward = parse_forward(line).expect("well formed");
//! assert_eq!(forward.message, "testrail");
//! assert_eq!(forward, parse_reverse(line));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod error;
pub mod forward;
pub mod quoted;
pub mod reverse;

pub use error::FieldError;
pub use forward::parse_forward;
pub use quoted::{decode_quoted, decode_quoted_string};
pub use reverse::parse_reverse;

/// A log line split into its message and fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLine {
    /// Free-text message, trimmed
    pub message: String,
    /// Decoded field values by key
    pub fields: BTreeMap<String, String>,
}

impl ParsedLine {
    /// Value of the field `key`, if present
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Whether any field was found
    #[must_use]
    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ParsedLine;
    pub use crate::error::FieldError;
    pub use crate::forward::parse_forward;
    pub use crate::reverse::parse_reverse;
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_field_lookup() {
        let parsed = parse_reverse("msg a=1");
        assert_eq!(parsed.field("a"), Some("1"));
        assert_eq!(parsed.field("b"), None);
        assert!(parsed.has_fields());
        assert!(!ParsedLine::default().has_fields());
    }

    #[test]
    fn test_parsed_line_serializes_fields_in_key_order() {
        let parsed = parse_reverse("msg z=1 a=2");
        let json = serde_json::to_string(&parsed).expect("Should serialize");
        assert_eq!(json, r#"{"message":"msg","fields":{"a":"2","z":"1"}}"#);
    }
}
