//! Graph patterns: `(a:Person)-[r:ACTED_IN]->(m:Movie)`.
//!
//! A pattern is built with a consuming chain:
//!
//! ```
//! use cypher_builder::pattern::{Direction, NodePattern, Pattern, RelationshipPattern};
//! use cypher_builder::ToCypher;
//!
//! let pattern = Pattern::new(NodePattern::anonymous().with_label("Person"))
//!     .related(RelationshipPattern::anonymous().with_type("ACTED_IN"))
//!     .with_direction(Direction::Left)
//!     .to(NodePattern::anonymous().with_label("Movie"));
//!
//! let result = pattern.build().unwrap();
//! assert_eq!(result.cypher, "(this0:Person)<-[this1:ACTED_IN]-(this2:Movie)");
//! ```
//!
//! `related` returns a [`PartialPattern`], which only `to` turns back into a
//! [`Pattern`]. A partial pattern can still be handed to `build`, but refuses
//! to render.

mod element;

pub use element::{Direction, NodePattern, RelationshipPattern, VariableLength};

use std::collections::HashSet;

use crate::ast::{render_map, Expression, ToCypher, Variable};
use crate::environment::Environment;
use crate::errors::CypherBuildError;
use crate::utils::escape::escape_identifier;

/// A complete chain of nodes and relationships, starting and ending on a node.
#[derive(Debug, PartialEq, Clone)]
pub struct Pattern {
    start: NodePattern,
    hops: Vec<(RelationshipPattern, NodePattern)>,
}

/// A pattern whose last relationship has no target node yet.
#[derive(Debug, PartialEq, Clone)]
pub struct PartialPattern {
    pattern: Pattern,
    relationship: RelationshipPattern,
}

impl Pattern {
    pub fn new(start: impl Into<NodePattern>) -> Self {
        Self {
            start: start.into(),
            hops: Vec::new(),
        }
    }

    /// Continue the chain with a relationship; finish it with `to`.
    pub fn related(self, relationship: impl Into<RelationshipPattern>) -> PartialPattern {
        PartialPattern {
            pattern: self,
            relationship: relationship.into(),
        }
    }

    fn last_node_mut(&mut self) -> &mut NodePattern {
        match self.hops.last_mut() {
            Some((_, node)) => node,
            None => &mut self.start,
        }
    }

    /// Property matchers on the last node of the chain
    pub fn with_properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Expression>,
    {
        self.last_node_mut()
            .properties
            .extend(properties.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Hide the variable of the last node
    pub fn without_variable(mut self) -> Self {
        self.last_node_mut().render_variable = false;
        self
    }

    /// Hide the labels of the last node
    pub fn without_labels(mut self) -> Self {
        self.last_node_mut().render_labels = false;
        self
    }

    /// Number of relationships in the chain
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Every variable of the chain, in render order (repeats included)
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        std::iter::once(&self.start.variable).chain(
            self.hops
                .iter()
                .flat_map(|(rel, node)| [&rel.variable, &node.variable]),
        )
    }
}

impl PartialPattern {
    /// Close the dangling relationship on `node`
    pub fn to(self, node: impl Into<NodePattern>) -> Pattern {
        let PartialPattern {
            mut pattern,
            relationship,
        } = self;
        pattern.hops.push((relationship, node.into()));
        pattern
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.relationship = self.relationship.with_direction(direction);
        self
    }

    pub fn with_type(mut self, rel_type: impl Into<String>) -> Self {
        self.relationship = self.relationship.with_type(rel_type);
        self
    }

    /// Quantifier of the dangling relationship. Fails immediately on `min > max`.
    pub fn with_length(
        mut self,
        length: impl Into<VariableLength>,
    ) -> Result<Self, CypherBuildError> {
        self.relationship = self.relationship.with_length(length)?;
        Ok(self)
    }

    pub fn with_properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Expression>,
    {
        self.relationship = self.relationship.with_properties(properties);
        self
    }

    pub fn without_variable(mut self) -> Self {
        self.relationship = self.relationship.without_variable();
        self
    }

    pub fn without_type(mut self) -> Self {
        self.relationship = self.relationship.without_type();
        self
    }
}

/// Renders one pattern, remembering which variables were already annotated.
struct PatternRenderer<'e> {
    env: &'e mut Environment,
    declared: HashSet<Variable>,
}

impl PatternRenderer<'_> {
    /// Name to print for an element, and whether its annotations are printed.
    ///
    /// Only the first named occurrence of a variable carries labels, type and
    /// properties. An element with a hidden variable cannot be referred back
    /// to, so it always keeps its annotations.
    fn head(
        &mut self,
        variable: &Variable,
        render_variable: bool,
    ) -> Result<(Option<String>, bool), CypherBuildError> {
        if !render_variable {
            return Ok((None, true));
        }
        let name = escape_identifier(&self.env.name_of(variable)?).into_owned();
        let first = self.declared.insert(variable.clone());
        Ok((Some(name), first))
    }

    /// A repeated occurrence renders bare; say so when that drops something.
    fn warn_dropped(name: Option<&str>, annotate: bool, what: &str, dropped: bool) {
        if let (Some(name), false, true) = (name, annotate, dropped) {
            log::warn!(
                "PatternRenderer: {} on repeated occurrence of '{}' ignored; annotate the first occurrence instead",
                what,
                name
            );
        }
    }

    fn properties(
        &mut self,
        properties: &[(String, Expression)],
        annotate: bool,
    ) -> Result<Option<String>, CypherBuildError> {
        if !annotate || properties.is_empty() {
            return Ok(None);
        }
        render_map(properties, self.env).map(Some)
    }

    fn node(&mut self, node: &NodePattern) -> Result<String, CypherBuildError> {
        let (name, annotate) = self.head(&node.variable, node.render_variable)?;
        Self::warn_dropped(
            name.as_deref(),
            annotate,
            "labels/properties",
            (node.render_labels && !node.labels.is_empty()) || !node.properties.is_empty(),
        );
        let mut text = name.unwrap_or_default();

        if annotate && node.render_labels && !node.labels.is_empty() {
            let labels: Vec<_> = node
                .labels
                .iter()
                .map(|label| escape_identifier(label))
                .collect();
            text.push(':');
            text.push_str(&labels.join(self.env.label_operator().separator()));
        }
        if let Some(map) = self.properties(&node.properties, annotate)? {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&map);
        }

        log::trace!("PatternRenderer: node ({})", text);
        Ok(format!("({})", text))
    }

    fn relationship(&mut self, rel: &RelationshipPattern) -> Result<String, CypherBuildError> {
        let (name, annotate) = self.head(&rel.variable, rel.render_variable)?;
        Self::warn_dropped(
            name.as_deref(),
            annotate,
            "type/properties",
            (rel.render_type && rel.rel_type.is_some()) || !rel.properties.is_empty(),
        );
        let mut text = name.unwrap_or_default();

        if annotate && rel.render_type {
            if let Some(rel_type) = &rel.rel_type {
                text.push(':');
                text.push_str(&escape_identifier(rel_type));
            }
        }
        if let Some(length) = &rel.length {
            text.push_str(&length.render());
        }
        if let Some(map) = self.properties(&rel.properties, annotate)? {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&map);
        }

        log::trace!("PatternRenderer: relationship [{}]", text);
        Ok(match rel.direction {
            Direction::Left => format!("<-[{}]-", text),
            Direction::Right => format!("-[{}]->", text),
            Direction::Undirected => format!("-[{}]-", text),
        })
    }
}

impl ToCypher for Pattern {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let mut renderer = PatternRenderer {
            env,
            declared: HashSet::new(),
        };
        let mut text = renderer.node(&self.start)?;
        for (rel, node) in &self.hops {
            text.push_str(&renderer.relationship(rel)?);
            text.push_str(&renderer.node(node)?);
        }
        Ok(text)
    }
}

impl ToCypher for PartialPattern {
    fn to_cypher(&self, _env: &mut Environment) -> Result<String, CypherBuildError> {
        Err(CypherBuildError::IncompletePattern)
    }
}
