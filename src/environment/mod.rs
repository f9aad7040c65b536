//! Per-build naming and parameter scope.
//!
//! An `Environment` is created by `build` and threaded by `&mut` through every
//! `to_cypher` call. It is the only mutable state of a build: it memoizes the
//! name of each variable and parameter identity and collects parameter values.
//! Nothing outlives the build that created it.

mod naming;

pub use naming::NameClass;

use std::collections::HashMap;

use serde_json::Value;

use crate::ast::{Parameter, Variable};
use crate::config::{BuildConfig, LabelOperator};
use crate::errors::CypherBuildError;
use naming::NameAllocator;

/// Parameter map returned by a build (insertion ordered).
pub type Params = serde_json::Map<String, Value>;

#[derive(Debug, Default)]
pub struct Environment {
    names: NameAllocator,
    variables: HashMap<Variable, String>,
    parameters: HashMap<Parameter, String>,
    params: Params,
    label_operator: LabelOperator,
}

impl Environment {
    pub(crate) fn new(config: &BuildConfig) -> Self {
        Self {
            names: NameAllocator::new(config.prefix.clone()),
            label_operator: config.label_operator,
            ..Default::default()
        }
    }

    /// Name of `variable` in this build, allocating one on first sight.
    pub fn name_of(&mut self, variable: &Variable) -> Result<String, CypherBuildError> {
        if let Some(name) = self.variables.get(variable) {
            return Ok(name.clone());
        }

        let name = match variable.explicit_name() {
            Some(explicit) => self.names.allocate_explicit(NameClass::Variable, explicit)?,
            None => self
                .names
                .allocate_generated(NameClass::Variable, variable.kind().tag()),
        };
        log::debug!(
            "Environment: {:?} variable bound to '{}'",
            variable.kind(),
            name
        );
        self.variables.insert(variable.clone(), name.clone());
        Ok(name)
    }

    /// Placeholder name of `parameter`, binding `value` to it on first sight.
    ///
    /// Recording the same parameter again with a different value is an error.
    pub fn record_parameter(
        &mut self,
        parameter: &Parameter,
        value: &Value,
    ) -> Result<String, CypherBuildError> {
        if let Some(name) = self.parameters.get(parameter) {
            if let Some(bound) = self.params.get(name) {
                if bound != value {
                    return Err(CypherBuildError::AmbiguousParameterBinding {
                        name: name.clone(),
                        first: bound.clone(),
                        second: value.clone(),
                    });
                }
            }
            return Ok(name.clone());
        }

        let name = match parameter.explicit_name() {
            Some(explicit) => self
                .names
                .allocate_explicit(NameClass::Parameter, explicit)?,
            None => self.names.allocate_generated(NameClass::Parameter, "param"),
        };
        log::debug!("Environment: parameter '{}' = {}", name, value);
        self.parameters.insert(parameter.clone(), name.clone());
        self.params.insert(name.clone(), value.clone());
        Ok(name)
    }

    /// Label separator used for nodes with more than one label.
    pub fn label_operator(&self) -> LabelOperator {
        self.label_operator
    }

    /// Prefix applied to generated names in this build.
    pub fn prefix(&self) -> &str {
        self.names.prefix()
    }

    /// Close the build: merge `extra` parameters into the collected ones.
    ///
    /// Extra parameters are included even when nothing references them. Their
    /// names must not collide with a recorded parameter or with each other.
    pub(crate) fn finalize(
        mut self,
        extra: &[(String, Value)],
    ) -> Result<Params, CypherBuildError> {
        for (name, value) in extra {
            self.names.allocate_explicit(NameClass::Parameter, name)?;
            self.params.insert(name.clone(), value.clone());
        }
        Ok(self.params)
    }
}
