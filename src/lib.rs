//! cypher-builder - programmatic Cypher query construction
//!
//! This crate compiles a tree of Cypher constructs into query text plus a
//! parameter map:
//! - Variables and parameters are identity objects; the build environment
//!   gives each one a collision-free name (`this0`, `var1`, `param0`, ...)
//! - Every construct implements [`ToCypher`] and renders itself through the
//!   environment
//! - Patterns render nodes and relationships with direction, variable-length
//!   quantifiers and property matchers
//! - [`build`] creates one environment per call and returns the text and the
//!   collected parameters
//!
//! ```
//! use cypher_builder::ast::{Expression, MatchClause, Query, ReturnClause, Variable};
//! use cypher_builder::pattern::{NodePattern, Pattern, RelationshipPattern};
//! use cypher_builder::ToCypher;
//! use serde_json::json;
//!
//! let person = Variable::node();
//! let movie = Variable::node();
//! let pattern = Pattern::new(NodePattern::new(person.clone()).with_label("Person"))
//!     .related(RelationshipPattern::anonymous().with_type("ACTED_IN"))
//!     .to(NodePattern::new(movie.clone()).with_label("Movie"));
//!
//! let query = Query::new()
//!     .then(MatchClause::new(pattern).with_where(Expression::eq(person.property("name"), json!("Tom Hanks"))))
//!     .then(ReturnClause::new([movie.property("title")]));
//!
//! let result = query.build().unwrap();
//! assert_eq!(
//!     result.cypher,
//!     "MATCH (this0:Person)-[this1:ACTED_IN]->(this2:Movie)\nWHERE this0.name = $param0\nRETURN this2.title"
//! );
//! assert_eq!(result.params["param0"], json!("Tom Hanks"));
//! ```

pub mod utils;

pub mod ast;
pub mod build;
pub mod config;
pub mod document;
pub mod environment;
pub mod errors;
pub mod pattern;

pub use ast::ToCypher;
pub use build::{build, CypherResult};
pub use config::{BuildConfig, LabelOperator};
pub use environment::{Environment, NameClass, Params};
pub use errors::CypherBuildError;
