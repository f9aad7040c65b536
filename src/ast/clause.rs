use super::{Expression, PropertyAccess, ToCypher, Variable};
use crate::environment::Environment;
use crate::errors::CypherBuildError;
use crate::pattern::Pattern;

/// Name given to a projected column.
///
/// An alias is always a variable: `AS title` is the explicitly named variable
/// `title`, so it goes through the same collision checks as any other name.
/// Clones of an alias refer to the same variable.
#[derive(Debug, PartialEq, Clone)]
pub struct Alias(Variable);

impl Alias {
    pub fn variable(&self) -> &Variable {
        &self.0
    }
}

impl From<&str> for Alias {
    fn from(value: &str) -> Self {
        Alias(Variable::named(value))
    }
}

impl From<String> for Alias {
    fn from(value: String) -> Self {
        Alias(Variable::named(value))
    }
}

impl From<Variable> for Alias {
    fn from(value: Variable) -> Self {
        Alias(value)
    }
}

impl From<&Variable> for Alias {
    fn from(value: &Variable) -> Self {
        Alias(value.clone())
    }
}

impl ToCypher for Alias {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        self.0.to_cypher(env)
    }
}

/// Projection item of RETURN and WITH
#[derive(Debug, PartialEq, Clone)]
pub enum Column {
    Plain(Expression),
    Aliased(Expression, Alias),
}

impl Column {
    pub fn aliased(expression: impl Into<Expression>, alias: impl Into<Alias>) -> Self {
        Column::Aliased(expression.into(), alias.into())
    }
}

macro_rules! impl_plain_column {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Column {
                fn from(value: $ty) -> Self {
                    Column::Plain(value.into())
                }
            }
        )*
    };
}

impl_plain_column!(Expression, Variable, &Variable, PropertyAccess);

impl ToCypher for Column {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        match self {
            Column::Plain(expression) => expression.to_cypher(env),
            Column::Aliased(expression, alias) => {
                let expression = expression.to_cypher(env)?;
                Ok(format!("{} AS {}", expression, alias.to_cypher(env)?))
            }
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl From<SortOrder> for String {
    fn from(value: SortOrder) -> String {
        match value {
            SortOrder::Asc => "ASC".to_string(),
            SortOrder::Desc => "DESC".to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct OrderByItem {
    pub expression: Expression,
    pub order: SortOrder,
}

fn render_columns(columns: &[Column], env: &mut Environment) -> Result<String, CypherBuildError> {
    if columns.is_empty() {
        return Ok("*".to_string());
    }
    let rendered: Result<Vec<String>, CypherBuildError> =
        columns.iter().map(|column| column.to_cypher(env)).collect();
    Ok(rendered?.join(", "))
}

fn render_patterns(
    keyword: &str,
    patterns: &[Pattern],
    env: &mut Environment,
) -> Result<String, CypherBuildError> {
    if patterns.is_empty() {
        return Err(CypherBuildError::malformed(format!(
            "{} clause must contain at least one pattern",
            keyword
        )));
    }
    let rendered: Result<Vec<String>, CypherBuildError> =
        patterns.iter().map(|pattern| pattern.to_cypher(env)).collect();
    Ok(format!("{} {}", keyword, rendered?.join(", ")))
}

fn render_where(
    text: &mut String,
    condition: Option<&Expression>,
    env: &mut Environment,
) -> Result<(), CypherBuildError> {
    if let Some(condition) = condition {
        text.push_str("\nWHERE ");
        text.push_str(&condition.to_cypher(env)?);
    }
    Ok(())
}

/// `MATCH` / `OPTIONAL MATCH` with an optional `WHERE`
#[derive(Debug, PartialEq, Clone)]
pub struct MatchClause {
    pub optional: bool,
    pub patterns: Vec<Pattern>,
    pub where_clause: Option<Expression>,
}

impl MatchClause {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            optional: false,
            patterns: vec![pattern],
            where_clause: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Add a condition; repeated calls are combined with AND
    pub fn with_where(mut self, condition: impl Into<Expression>) -> Self {
        let condition = condition.into();
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => Expression::and([existing, condition]),
            None => condition,
        });
        self
    }
}

impl ToCypher for MatchClause {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let keyword = if self.optional { "OPTIONAL MATCH" } else { "MATCH" };
        let mut text = render_patterns(keyword, &self.patterns, env)?;
        render_where(&mut text, self.where_clause.as_ref(), env)?;
        Ok(text)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct CreateClause {
    pub patterns: Vec<Pattern>,
}

impl CreateClause {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            patterns: vec![pattern],
        }
    }
}

impl ToCypher for CreateClause {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        render_patterns("CREATE", &self.patterns, env)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct MergeClause {
    pub pattern: Pattern,
}

impl ToCypher for MergeClause {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        Ok(format!("MERGE {}", self.pattern.to_cypher(env)?))
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct WithClause {
    pub distinct: bool,
    pub columns: Vec<Column>,
    pub where_clause: Option<Expression>,
}

impl WithClause {
    pub fn new<I, C>(columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Column>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn with_where(mut self, condition: impl Into<Expression>) -> Self {
        self.where_clause = Some(condition.into());
        self
    }
}

impl ToCypher for WithClause {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let distinct = if self.distinct { "DISTINCT " } else { "" };
        let mut text = format!("WITH {}{}", distinct, render_columns(&self.columns, env)?);
        render_where(&mut text, self.where_clause.as_ref(), env)?;
        Ok(text)
    }
}

/// `UNWIND list AS alias`
#[derive(Debug, PartialEq, Clone)]
pub struct UnwindClause {
    pub expression: Expression,
    pub alias: Variable,
}

impl ToCypher for UnwindClause {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let expression = self.expression.to_cypher(env)?;
        Ok(format!("UNWIND {} AS {}", expression, self.alias.to_cypher(env)?))
    }
}

/// `SET a.x = value, ...`
#[derive(Debug, PartialEq, Clone, Default)]
pub struct SetClause {
    pub items: Vec<(PropertyAccess, Expression)>,
}

impl SetClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, target: PropertyAccess, value: impl Into<Expression>) -> Self {
        self.items.push((target, value.into()));
        self
    }
}

impl ToCypher for SetClause {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        if self.items.is_empty() {
            return Err(CypherBuildError::malformed("SET clause has no items"));
        }
        let mut items = Vec::with_capacity(self.items.len());
        for (target, value) in &self.items {
            let target = Expression::PropertyAccessExp(target.clone()).to_cypher(env)?;
            items.push(format!("{} = {}", target, value.to_cypher(env)?));
        }
        Ok(format!("SET {}", items.join(", ")))
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct DeleteClause {
    pub detach: bool,
    pub items: Vec<Expression>,
}

impl ToCypher for DeleteClause {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        if self.items.is_empty() {
            return Err(CypherBuildError::malformed("DELETE clause has no items"));
        }
        let items: Result<Vec<String>, CypherBuildError> =
            self.items.iter().map(|item| item.to_cypher(env)).collect();
        let keyword = if self.detach { "DETACH DELETE" } else { "DELETE" };
        Ok(format!("{} {}", keyword, items?.join(", ")))
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct ReturnClause {
    pub distinct: bool,
    pub columns: Vec<Column>,
    pub order_by: Vec<OrderByItem>,
    pub skip: Option<Expression>,
    pub limit: Option<Expression>,
}

impl ReturnClause {
    pub fn new<I, C>(columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Column>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn order_by(mut self, expression: impl Into<Expression>, order: SortOrder) -> Self {
        self.order_by.push(OrderByItem {
            expression: expression.into(),
            order,
        });
        self
    }

    pub fn skip(mut self, skip: impl Into<Expression>) -> Self {
        self.skip = Some(skip.into());
        self
    }

    pub fn limit(mut self, limit: impl Into<Expression>) -> Self {
        self.limit = Some(limit.into());
        self
    }
}

impl ToCypher for ReturnClause {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let distinct = if self.distinct { "DISTINCT " } else { "" };
        let mut text = format!("RETURN {}{}", distinct, render_columns(&self.columns, env)?);

        if !self.order_by.is_empty() {
            let mut items = Vec::with_capacity(self.order_by.len());
            for item in &self.order_by {
                let order: String = item.order.into();
                items.push(format!("{} {}", item.expression.to_cypher(env)?, order));
            }
            text.push_str("\nORDER BY ");
            text.push_str(&items.join(", "));
        }
        if let Some(skip) = &self.skip {
            text.push_str("\nSKIP ");
            text.push_str(&skip.to_cypher(env)?);
        }
        if let Some(limit) = &self.limit {
            text.push_str("\nLIMIT ");
            text.push_str(&limit.to_cypher(env)?);
        }
        Ok(text)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Clause {
    Match(MatchClause),
    Create(CreateClause),
    Merge(MergeClause),
    With(WithClause),
    Unwind(UnwindClause),
    Set(SetClause),
    Delete(DeleteClause),
    Return(ReturnClause),
}

impl ToCypher for Clause {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        match self {
            Clause::Match(c) => c.to_cypher(env),
            Clause::Create(c) => c.to_cypher(env),
            Clause::Merge(c) => c.to_cypher(env),
            Clause::With(c) => c.to_cypher(env),
            Clause::Unwind(c) => c.to_cypher(env),
            Clause::Set(c) => c.to_cypher(env),
            Clause::Delete(c) => c.to_cypher(env),
            Clause::Return(c) => c.to_cypher(env),
        }
    }
}

macro_rules! impl_from_clause {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Clause {
                fn from(value: $ty) -> Self {
                    Clause::$variant(value)
                }
            }
        )*
    };
}

impl_from_clause!(
    Match(MatchClause),
    Create(CreateClause),
    Merge(MergeClause),
    With(WithClause),
    Unwind(UnwindClause),
    Set(SetClause),
    Delete(DeleteClause),
    Return(ReturnClause),
);

/// Clauses rendered in order, one per line
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Query {
    pub clauses: Vec<Clause>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, clause: impl Into<Clause>) -> Self {
        self.clauses.push(clause.into());
        self
    }
}

impl ToCypher for Query {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        if self.clauses.is_empty() {
            return Err(CypherBuildError::malformed("query has no clauses"));
        }
        let rendered: Result<Vec<String>, CypherBuildError> =
            self.clauses.iter().map(|clause| clause.to_cypher(env)).collect();
        Ok(rendered?.join("\n"))
    }
}
