//! YAML query documents for the command-line compiler.
//!
//! A document describes one MATCH pattern and what to return from it:
//!
//! ```yaml
//! optional: false
//! named_variables: false
//! pattern:
//!   - node: { var: a, labels: [Person], properties: { name: Keanu Reeves } }
//!   - relationship: { type: ACTED_IN, direction: right, length: { min: 1, max: 3 } }
//!   - node: { var: m, labels: [Movie] }
//! where:
//!   - { var: m, property: released, equals: 1999 }
//! return:
//!   - { var: a }
//!   - { var: m, property: title, alias: title }
//! ```
//!
//! `var` keys are local to the document: the same key used twice refers to
//! the same variable (this is how cycles are written). With
//! `named_variables: true` the keys become the variable names; otherwise the
//! build generates them. Property and `equals` values become parameters.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::ast::{Column, Expression, MatchClause, Query, ReturnClause, Variable, VariableKind};
use crate::errors::CypherBuildError;
use crate::pattern::{Direction, NodePattern, Pattern, RelationshipPattern, VariableLength};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Could not read query document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse query document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Query document pattern is empty")]
    EmptyPattern,

    #[error("Pattern element {index} must be a {expected}")]
    UnexpectedElement { index: usize, expected: &'static str },

    #[error("Unknown variable '{0}' (every referenced var must appear in the pattern)")]
    UnknownVariable(String),

    #[error("Invalid length '{0}' (use a number, \"*\" or {{min, max}})")]
    InvalidLength(String),

    #[error(transparent)]
    Build(#[from] CypherBuildError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryDocument {
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub named_variables: bool,
    pub pattern: Vec<ElementDoc>,
    #[serde(default, rename = "where")]
    pub filters: Vec<FilterDoc>,
    #[serde(default, rename = "return")]
    pub returns: Vec<ReturnItemDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementDoc {
    Node(NodeDoc),
    Relationship(RelationshipDoc),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeDoc {
    pub var: Option<String>,
    pub labels: Vec<String>,
    pub properties: serde_json::Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelationshipDoc {
    pub var: Option<String>,
    #[serde(rename = "type")]
    pub rel_type: Option<String>,
    pub direction: Direction,
    pub length: Option<LengthDoc>,
    pub properties: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LengthDoc {
    Exact(u32),
    Bounds {
        min: Option<u32>,
        max: Option<u32>,
    },
    Any(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterDoc {
    pub var: String,
    pub property: String,
    pub equals: Value,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReturnItemDoc {
    pub var: String,
    pub property: Option<String>,
    pub alias: Option<String>,
}

impl TryFrom<&LengthDoc> for VariableLength {
    type Error = DocumentError;

    fn try_from(value: &LengthDoc) -> Result<Self, Self::Error> {
        match value {
            LengthDoc::Exact(hops) => Ok(VariableLength::fixed(*hops)),
            LengthDoc::Bounds { min, max } => Ok(VariableLength::Range {
                min: *min,
                max: *max,
            }),
            LengthDoc::Any(s) if s.trim() == "*" => Ok(VariableLength::Any),
            LengthDoc::Any(s) => Err(DocumentError::InvalidLength(s.clone())),
        }
    }
}

impl QueryDocument {
    pub fn from_yaml_str(content: &str) -> Result<Self, DocumentError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Translate the document into `MATCH ... [WHERE ...] RETURN ...`
    pub fn to_query(&self) -> Result<Query, DocumentError> {
        let mut scope = DocumentScope {
            named: self.named_variables,
            variables: HashMap::new(),
        };

        let pattern = self.pattern(&mut scope)?;
        let mut clause = MatchClause::new(pattern);
        if self.optional {
            clause = clause.optional();
        }
        for filter in &self.filters {
            let variable = scope.lookup(&filter.var)?;
            clause = clause.with_where(Expression::eq(
                variable.property(filter.property.as_str()),
                filter.equals.clone(),
            ));
        }

        let mut columns = Vec::with_capacity(self.returns.len());
        for item in &self.returns {
            let variable = scope.lookup(&item.var)?;
            let expression = match &item.property {
                Some(property) => variable.property(property.as_str()),
                None => Expression::Variable(variable),
            };
            columns.push(match &item.alias {
                Some(alias) => Column::aliased(expression, alias.as_str()),
                None => Column::Plain(expression),
            });
        }

        Ok(Query::new()
            .then(clause)
            .then(ReturnClause::new(columns)))
    }

    fn pattern(&self, scope: &mut DocumentScope) -> Result<Pattern, DocumentError> {
        let mut elements = self.pattern.iter().enumerate();
        let mut pattern = match elements.next() {
            Some((_, ElementDoc::Node(node))) => Pattern::new(scope.node(node)),
            Some((index, ElementDoc::Relationship(_))) => {
                return Err(DocumentError::UnexpectedElement {
                    index,
                    expected: "node",
                })
            }
            None => return Err(DocumentError::EmptyPattern),
        };

        while let Some((index, element)) = elements.next() {
            let ElementDoc::Relationship(rel) = element else {
                return Err(DocumentError::UnexpectedElement {
                    index,
                    expected: "relationship",
                });
            };
            let partial = pattern.related(scope.relationship(rel)?);
            pattern = match elements.next() {
                Some((_, ElementDoc::Node(node))) => partial.to(scope.node(node)),
                Some((index, ElementDoc::Relationship(_))) => {
                    return Err(DocumentError::UnexpectedElement {
                        index,
                        expected: "node",
                    })
                }
                None => return Err(CypherBuildError::IncompletePattern.into()),
            };
        }
        Ok(pattern)
    }
}

/// Document-local variable keys → variables
struct DocumentScope {
    named: bool,
    variables: HashMap<String, Variable>,
}

impl DocumentScope {
    fn variable(&mut self, key: Option<&str>, kind: VariableKind) -> Variable {
        let Some(key) = key else {
            return match kind {
                VariableKind::Relationship => Variable::relationship(),
                _ => Variable::node(),
            };
        };
        let named = self.named;
        self.variables
            .entry(key.to_string())
            .or_insert_with(|| match (named, kind) {
                (true, VariableKind::Relationship) => Variable::named_relationship(key),
                (true, _) => Variable::named_node(key),
                (false, VariableKind::Relationship) => Variable::relationship(),
                (false, _) => Variable::node(),
            })
            .clone()
    }

    fn lookup(&self, key: &str) -> Result<Variable, DocumentError> {
        self.variables
            .get(key)
            .cloned()
            .ok_or_else(|| DocumentError::UnknownVariable(key.to_string()))
    }

    fn node(&mut self, doc: &NodeDoc) -> NodePattern {
        NodePattern::new(self.variable(doc.var.as_deref(), VariableKind::Node))
            .with_labels(doc.labels.iter().cloned())
            .with_properties(doc.properties.clone())
    }

    fn relationship(&mut self, doc: &RelationshipDoc) -> Result<RelationshipPattern, DocumentError> {
        let mut rel = RelationshipPattern::new(
            self.variable(doc.var.as_deref(), VariableKind::Relationship),
        )
        .with_direction(doc.direction)
        .with_properties(doc.properties.clone());
        if let Some(rel_type) = &doc.rel_type {
            rel = rel.with_type(rel_type.as_str());
        }
        if let Some(length) = &doc.length {
            rel = rel.with_length(VariableLength::try_from(length)?)?;
        }
        Ok(rel)
    }
}
