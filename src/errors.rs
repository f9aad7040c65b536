use serde_json::Value;
use thiserror::Error;

use crate::environment::NameClass;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CypherBuildError {
    #[error("Name collision: '{name}' is already bound to a different {class} in this build")]
    NameCollision { name: String, class: NameClass },

    #[error(
        "Ambiguous parameter binding: '{name}' was recorded with {first} and again with {second}"
    )]
    AmbiguousParameterBinding {
        name: String,
        first: Value,
        second: Value,
    },

    #[error("Incomplete pattern: the pattern ends on a relationship with no target node (call to(...) before rendering)")]
    IncompletePattern,

    #[error("Invalid variable-length range: minimum hops ({min}) cannot be greater than maximum hops ({max})")]
    InvalidQuantifier { min: u32, max: u32 },

    #[error("Malformed AST: {0}")]
    MalformedAst(String),

    #[error("Invalid build configuration: {0}")]
    InvalidConfig(String),
}

impl CypherBuildError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        CypherBuildError::MalformedAst(message.into())
    }
}
