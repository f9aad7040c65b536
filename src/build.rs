//! Build entry point: query tree in, Cypher text and parameters out.

use serde::Serialize;
use validator::Validate;

use crate::ast::ToCypher;
use crate::config::BuildConfig;
use crate::environment::{Environment, Params};
use crate::errors::CypherBuildError;

/// Output of a build
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CypherResult {
    pub cypher: String,
    pub params: Params,
}

/// Compile `root` with a fresh environment configured by `config`.
///
/// Either the whole tree renders and every parameter binds, or an error is
/// returned and nothing else: the environment never outlives the call.
///
/// # Example
/// ```
/// use cypher_builder::{build, BuildConfig};
/// use cypher_builder::pattern::{NodePattern, Pattern};
/// use serde_json::json;
///
/// let pattern = Pattern::new(NodePattern::anonymous().with_label("Movie"));
/// let config = BuildConfig::new()
///     .with_prefix("q_")
///     .with_extra_param("tenant", json!("acme"));
///
/// let result = build(&pattern, &config).unwrap();
/// assert_eq!(result.cypher, "(q_this0:Movie)");
/// assert_eq!(result.params["tenant"], json!("acme"));
/// ```
pub fn build<T: ToCypher + ?Sized>(
    root: &T,
    config: &BuildConfig,
) -> Result<CypherResult, CypherBuildError> {
    config
        .validate()
        .map_err(|e| CypherBuildError::InvalidConfig(e.to_string()))?;

    let mut env = Environment::new(config);
    let cypher = root.to_cypher(&mut env)?;
    let params = env.finalize(&config.extra_params)?;

    log::debug!(
        "build: rendered {} bytes of Cypher with {} parameter(s)",
        cypher.len(),
        params.len()
    );
    Ok(CypherResult { cypher, params })
}
