use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::str::FromStr;
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::utils::escape::is_plain_identifier;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Separator between the labels of a multi-label node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelOperator {
    /// `(n:Person:Actor)`
    #[default]
    #[serde(rename = ":")]
    Colon,
    /// `(n:Person&Actor)`
    #[serde(rename = "&")]
    Ampersand,
}

impl LabelOperator {
    pub fn separator(self) -> &'static str {
        match self {
            LabelOperator::Colon => ":",
            LabelOperator::Ampersand => "&",
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown label operator '{0}' (expected ':' or '&')")]
pub struct ParseLabelOperatorError(String);

impl FromStr for LabelOperator {
    type Err = ParseLabelOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ":" | "colon" => Ok(LabelOperator::Colon),
            "&" | "ampersand" => Ok(LabelOperator::Ampersand),
            other => Err(ParseLabelOperatorError(other.to_string())),
        }
    }
}

/// Options of a single build
#[derive(Clone, Debug, Default, PartialEq, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Prepended to every generated name (never to explicit ones)
    #[validate(custom(function = "validate_prefix"))]
    pub prefix: String,

    /// Separator for multi-label nodes
    pub label_operator: LabelOperator,

    /// Parameters forced into the output even when nothing references them
    pub extra_params: Vec<(String, Value)>,
}

fn validate_prefix(prefix: &str) -> Result<(), ValidationError> {
    if prefix.is_empty() || is_plain_identifier(prefix) {
        Ok(())
    } else {
        let mut err = ValidationError::new("prefix");
        err.message = Some("Prefix must be empty or a plain identifier ([A-Za-z_][A-Za-z0-9_]*)".into());
        Err(err)
    }
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_label_operator(mut self, label_operator: LabelOperator) -> Self {
        self.label_operator = label_operator;
        self
    }

    pub fn with_extra_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_params.push((name.into(), value.into()));
        self
    }

    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            prefix: env::var("CYPHER_BUILDER_PREFIX").unwrap_or_default(),
            label_operator: parse_env_var("CYPHER_BUILDER_LABEL_OPERATOR", ":")?,
            extra_params: Vec::new(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
