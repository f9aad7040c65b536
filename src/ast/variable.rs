//! Identity objects: variables and parameters.
//!
//! Both are cheap handles around a shared allocation. Cloning a handle keeps
//! the identity; constructing a new one creates a new identity, even when the
//! explicit names match. Equality and hashing go by identity, never by name.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ToCypher;
use crate::environment::Environment;
use crate::errors::CypherBuildError;
use crate::utils::escape::escape_identifier;

/// What a variable stands for. Selects the tag of its generated name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Node,
    Relationship,
    Value,
    Path,
}

impl VariableKind {
    pub fn tag(self) -> &'static str {
        match self {
            VariableKind::Node | VariableKind::Relationship => "this",
            VariableKind::Value => "var",
            VariableKind::Path => "p",
        }
    }
}

#[derive(Debug)]
struct VariableData {
    name: Option<String>,
    kind: VariableKind,
}

/// A named slot in the query: node alias, relationship alias, path or value.
#[derive(Debug, Clone)]
pub struct Variable(Arc<VariableData>);

impl Variable {
    fn with(kind: VariableKind, name: Option<String>) -> Self {
        Variable(Arc::new(VariableData { name, kind }))
    }

    /// Anonymous value variable (`var{n}`)
    pub fn new() -> Self {
        Self::with(VariableKind::Value, None)
    }

    /// Anonymous node variable (`this{n}`)
    pub fn node() -> Self {
        Self::with(VariableKind::Node, None)
    }

    /// Anonymous relationship variable (`this{n}`)
    pub fn relationship() -> Self {
        Self::with(VariableKind::Relationship, None)
    }

    /// Anonymous path variable (`p{n}`)
    pub fn path() -> Self {
        Self::with(VariableKind::Path, None)
    }

    /// Explicitly named value variable. The name is rendered verbatim.
    pub fn named(name: impl Into<String>) -> Self {
        Self::with(VariableKind::Value, Some(name.into()))
    }

    pub fn named_node(name: impl Into<String>) -> Self {
        Self::with(VariableKind::Node, Some(name.into()))
    }

    pub fn named_relationship(name: impl Into<String>) -> Self {
        Self::with(VariableKind::Relationship, Some(name.into()))
    }

    pub fn named_path(name: impl Into<String>) -> Self {
        Self::with(VariableKind::Path, Some(name.into()))
    }

    pub fn kind(&self) -> VariableKind {
        self.0.kind
    }

    /// Caller-supplied name, if any
    pub fn explicit_name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }
}

impl Default for Variable {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl ToCypher for Variable {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let name = env.name_of(self)?;
        Ok(escape_identifier(&name).into_owned())
    }
}

#[derive(Debug)]
struct ParameterData {
    name: Option<String>,
    value: Value,
}

/// A `$placeholder` bound to a value in the output parameter map.
#[derive(Debug, Clone)]
pub struct Parameter(Arc<ParameterData>);

impl Parameter {
    /// Anonymous parameter (`$param{n}`)
    pub fn new(value: impl Into<Value>) -> Self {
        Parameter(Arc::new(ParameterData {
            name: None,
            value: value.into(),
        }))
    }

    /// Explicitly named parameter. The name is rendered verbatim.
    pub fn named(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Parameter(Arc::new(ParameterData {
            name: Some(name.into()),
            value: value.into(),
        }))
    }

    pub fn value(&self) -> &Value {
        &self.0.value
    }

    pub fn explicit_name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Parameter {}

impl Hash for Parameter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl ToCypher for Parameter {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let name = env.record_parameter(self, self.value())?;
        Ok(format!("${}", escape_identifier(&name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_not_name_equality() {
        let a = Variable::named("n");
        let b = Variable::named("n");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(Variable::node().kind().tag(), "this");
        assert_eq!(Variable::relationship().kind().tag(), "this");
        assert_eq!(Variable::new().kind().tag(), "var");
        assert_eq!(Variable::path().kind().tag(), "p");
    }

    #[test]
    fn test_parameter_carries_value() {
        let p = Parameter::named("title", json!("The Matrix"));
        assert_eq!(p.explicit_name(), Some("title"));
        assert_eq!(p.value(), &json!("The Matrix"));
        assert_ne!(p, Parameter::named("title", json!("The Matrix")));
    }

    #[test]
    fn test_render_through_environment() {
        let mut env = Environment::default();
        let movie = Variable::node();
        let released = Parameter::new(1999);
        assert_eq!(movie.to_cypher(&mut env).unwrap(), "this0");
        assert_eq!(movie.to_cypher(&mut env).unwrap(), "this0");
        assert_eq!(released.to_cypher(&mut env).unwrap(), "$param0");
    }

    #[test]
    fn test_explicit_names_are_escaped_when_needed() {
        let mut env = Environment::default();
        assert_eq!(
            Variable::named("my movie").to_cypher(&mut env).unwrap(),
            "`my movie`"
        );
        assert_eq!(
            Parameter::named("max-year", 2000)
                .to_cypher(&mut env)
                .unwrap(),
            "$`max-year`"
        );
    }
}
