//! Buildable constructs and the rendering protocol they share.

mod clause;
mod expression;
mod variable;

pub use clause::{
    Alias, Clause, Column, CreateClause, DeleteClause, MatchClause, MergeClause, OrderByItem,
    Query, ReturnClause, SetClause, SortOrder, UnwindClause, WithClause,
};
pub use expression::{
    Expression, FunctionCall, Literal, Operator, OperatorApplication, PropertyAccess,
};
pub use variable::{Parameter, Variable, VariableKind};

pub(crate) use expression::render_map;

use crate::build::{build, CypherResult};
use crate::config::BuildConfig;
use crate::environment::Environment;
use crate::errors::CypherBuildError;

/// Render a node of the query tree to Cypher text.
///
/// Implementations ask the environment for names (`name_of`,
/// `record_parameter`) and delegate to their children in the order a reader
/// meets them, left to right and outer to inner. They never mutate the tree.
pub trait ToCypher {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError>;

    /// Build with the default configuration
    fn build(&self) -> Result<CypherResult, CypherBuildError> {
        build(self, &BuildConfig::default())
    }

    fn build_with(&self, config: &BuildConfig) -> Result<CypherResult, CypherBuildError> {
        build(self, config)
    }
}

impl<T: ToCypher + ?Sized> ToCypher for Box<T> {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        self.as_ref().to_cypher(env)
    }
}
