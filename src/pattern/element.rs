use std::ops::{RangeFrom, RangeFull, RangeInclusive, RangeToInclusive};

use serde::{Deserialize, Serialize};

use crate::ast::{Expression, Variable};
use crate::errors::CypherBuildError;

/// Upper bound above which a quantifier is legal but likely expensive
const LARGE_HOP_COUNT: u32 = 100;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left, // `<-[]-`
    #[default]
    Right, // `-[]->`
    Undirected, // `-[]-`
}

/// Variable-length quantifier of a relationship: `*2`, `*1..3`, `*2..`, `*..5`, `*`
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum VariableLength {
    Exact(u32),
    Range { min: Option<u32>, max: Option<u32> },
    Any,
}

impl VariableLength {
    /// `*2`
    pub fn fixed(hops: u32) -> Self {
        VariableLength::Exact(hops)
    }

    /// `*1..3`
    pub fn range(min: u32, max: u32) -> Self {
        VariableLength::Range {
            min: Some(min),
            max: Some(max),
        }
    }

    /// `*2..`
    pub fn min_only(min: u32) -> Self {
        VariableLength::Range {
            min: Some(min),
            max: None,
        }
    }

    /// `*..5`
    pub fn max_only(max: u32) -> Self {
        VariableLength::Range {
            min: None,
            max: Some(max),
        }
    }

    /// `*`
    pub fn unbounded() -> Self {
        VariableLength::Any
    }

    /// Reject ranges whose minimum exceeds their maximum
    pub fn validate(&self) -> Result<(), CypherBuildError> {
        if let VariableLength::Range {
            min: Some(min),
            max: Some(max),
        } = *self
        {
            if min > max {
                return Err(CypherBuildError::InvalidQuantifier { min, max });
            }
        }

        let upper = match *self {
            VariableLength::Exact(hops) => Some(hops),
            VariableLength::Range { max, .. } => max,
            VariableLength::Any => None,
        };
        if let Some(upper) = upper.filter(|&hops| hops > LARGE_HOP_COUNT) {
            log::warn!(
                "Variable-length relationship with up to {} hops may be expensive to execute",
                upper
            );
        }
        Ok(())
    }

    pub(crate) fn render(&self) -> String {
        match *self {
            VariableLength::Exact(hops) => format!("*{}", hops),
            VariableLength::Range { min, max } => {
                let bound = |b: Option<u32>| b.map(|v| v.to_string()).unwrap_or_default();
                match (min, max) {
                    (None, None) => "*".to_string(),
                    _ => format!("*{}..{}", bound(min), bound(max)),
                }
            }
            VariableLength::Any => "*".to_string(),
        }
    }
}

impl From<u32> for VariableLength {
    fn from(hops: u32) -> Self {
        VariableLength::Exact(hops)
    }
}

impl From<RangeInclusive<u32>> for VariableLength {
    fn from(range: RangeInclusive<u32>) -> Self {
        VariableLength::range(*range.start(), *range.end())
    }
}

impl From<RangeFrom<u32>> for VariableLength {
    fn from(range: RangeFrom<u32>) -> Self {
        VariableLength::min_only(range.start)
    }
}

impl From<RangeToInclusive<u32>> for VariableLength {
    fn from(range: RangeToInclusive<u32>) -> Self {
        VariableLength::max_only(range.end)
    }
}

impl From<RangeFull> for VariableLength {
    fn from(_: RangeFull) -> Self {
        VariableLength::Any
    }
}

fn collect_properties<I, K, V>(properties: I) -> impl Iterator<Item = (String, Expression)>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Expression>,
{
    properties.into_iter().map(|(k, v)| (k.into(), v.into()))
}

/// `(name:Label {key: value})` element of a pattern
#[derive(Debug, PartialEq, Clone)]
pub struct NodePattern {
    pub(crate) variable: Variable,
    pub(crate) labels: Vec<String>,
    pub(crate) properties: Vec<(String, Expression)>,
    pub(crate) render_variable: bool,
    pub(crate) render_labels: bool,
}

impl NodePattern {
    pub fn new(variable: Variable) -> Self {
        Self {
            variable,
            labels: Vec::new(),
            properties: Vec::new(),
            render_variable: true,
            render_labels: true,
        }
    }

    /// Node with a fresh anonymous variable
    pub fn anonymous() -> Self {
        Self::new(Variable::node())
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn with_labels<I, L>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Property matchers. Plain JSON values become anonymous parameters.
    pub fn with_properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Expression>,
    {
        self.properties.extend(collect_properties(properties));
        self
    }

    pub fn without_variable(mut self) -> Self {
        self.render_variable = false;
        self
    }

    pub fn without_labels(mut self) -> Self {
        self.render_labels = false;
        self
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl From<Variable> for NodePattern {
    fn from(variable: Variable) -> Self {
        NodePattern::new(variable)
    }
}

impl From<&Variable> for NodePattern {
    fn from(variable: &Variable) -> Self {
        NodePattern::new(variable.clone())
    }
}

/// `-[name:TYPE*1..3 {key: value}]->` element of a pattern
#[derive(Debug, PartialEq, Clone)]
pub struct RelationshipPattern {
    pub(crate) variable: Variable,
    pub(crate) rel_type: Option<String>,
    pub(crate) direction: Direction,
    pub(crate) length: Option<VariableLength>,
    pub(crate) properties: Vec<(String, Expression)>,
    pub(crate) render_variable: bool,
    pub(crate) render_type: bool,
}

impl RelationshipPattern {
    pub fn new(variable: Variable) -> Self {
        Self {
            variable,
            rel_type: None,
            direction: Direction::default(),
            length: None,
            properties: Vec::new(),
            render_variable: true,
            render_type: true,
        }
    }

    /// Relationship with a fresh anonymous variable
    pub fn anonymous() -> Self {
        Self::new(Variable::relationship())
    }

    pub fn with_type(mut self, rel_type: impl Into<String>) -> Self {
        self.rel_type = Some(rel_type.into());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the quantifier. Fails immediately on `min > max`.
    pub fn with_length(
        mut self,
        length: impl Into<VariableLength>,
    ) -> Result<Self, CypherBuildError> {
        let length = length.into();
        length.validate()?;
        self.length = Some(length);
        Ok(self)
    }

    pub fn with_properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Expression>,
    {
        self.properties.extend(collect_properties(properties));
        self
    }

    pub fn without_variable(mut self) -> Self {
        self.render_variable = false;
        self
    }

    pub fn without_type(mut self) -> Self {
        self.render_type = false;
        self
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn length(&self) -> Option<VariableLength> {
        self.length
    }
}

impl From<Variable> for RelationshipPattern {
    fn from(variable: Variable) -> Self {
        RelationshipPattern::new(variable)
    }
}

impl From<&Variable> for RelationshipPattern {
    fn from(variable: &Variable) -> Self {
        RelationshipPattern::new(variable.clone())
    }
}
