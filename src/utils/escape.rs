//! Escaping for identifiers and string literals.
//!
//! Cypher identifiers (labels, relationship types, property keys, variable and
//! parameter names) only need quoting when they are not plain identifiers.
//! Quoting uses backticks, with embedded backticks doubled.
//!
//! # Examples
//! ```
//! use cypher_builder::utils::escape::{escape_identifier, escape_string};
//!
//! assert_eq!(escape_identifier("Person"), "Person");
//! assert_eq!(escape_identifier("Movie Star"), "`Movie Star`");
//! assert_eq!(escape_identifier("we`ird"), "`we``ird`");
//! assert_eq!(escape_string("O'Brien"), "'O\\'Brien'");
//! ```

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PLAIN_IDENTIFIER: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid");
}

/// True when `name` can be written without backticks
pub fn is_plain_identifier(name: &str) -> bool {
    PLAIN_IDENTIFIER.is_match(name)
}

/// Quote `name` with backticks unless it is a plain identifier
pub fn escape_identifier(name: &str) -> Cow<'_, str> {
    if is_plain_identifier(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("`{}`", name.replace('`', "``")))
    }
}

/// Render `s` as a single-quoted Cypher string literal
pub fn escape_string(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\") // Must be first!
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t");
    format!("'{}'", escaped)
}
