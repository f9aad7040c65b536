use serde_json::Value;

use super::{Parameter, ToCypher, Variable};
use crate::environment::Environment;
use crate::errors::CypherBuildError;
use crate::utils::escape::{escape_identifier, escape_string};

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl ToCypher for Literal {
    fn to_cypher(&self, _env: &mut Environment) -> Result<String, CypherBuildError> {
        Ok(match self {
            Literal::Null => "NULL".to_string(),
            Literal::Boolean(b) => b.to_string(),
            Literal::Integer(i) => i.to_string(),
            Literal::Float(f) if !f.is_finite() => {
                return Err(CypherBuildError::malformed(format!(
                    "non-finite float literal {} (pass it as a parameter instead)",
                    f
                )));
            }
            // Debug formatting keeps the decimal point: 1.0 instead of 1
            Literal::Float(f) => format!("{:?}", f),
            Literal::String(s) => escape_string(s),
        })
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Operator {
    // binary
    Addition,         // +
    Subtraction,      // -
    Multiplication,   // *
    Division,         // /
    ModuloDivision,   // %
    Exponentiation,   // ^
    Equal,            // =
    NotEqual,         // <>
    LessThan,         // <
    GreaterThan,      // >
    LessThanEqual,    // <=
    GreaterThanEqual, // >=
    RegexMatch,       // =~
    In,               // IN [...]
    StartsWith,
    EndsWith,
    Contains,
    // variadic
    And,
    Or,
    Xor,
    // unary
    Not,
    // post fix
    IsNull,
    IsNotNull,
}

impl From<Operator> for String {
    fn from(value: Operator) -> Self {
        value.keyword().to_string()
    }
}

impl Operator {
    fn keyword(self) -> &'static str {
        match self {
            Operator::Addition => "+",
            Operator::Subtraction => "-",
            Operator::Multiplication => "*",
            Operator::Division => "/",
            Operator::ModuloDivision => "%",
            Operator::Exponentiation => "^",
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::LessThanEqual => "<=",
            Operator::GreaterThanEqual => ">=",
            Operator::RegexMatch => "=~",
            Operator::In => "IN",
            Operator::StartsWith => "STARTS WITH",
            Operator::EndsWith => "ENDS WITH",
            Operator::Contains => "CONTAINS",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Xor => "XOR",
            Operator::Not => "NOT",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }

    fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Operator::Addition
                | Operator::Subtraction
                | Operator::Multiplication
                | Operator::Division
                | Operator::ModuloDivision
                | Operator::Exponentiation
        )
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct OperatorApplication {
    pub operator: Operator,
    pub operands: Vec<Expression>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct PropertyAccess {
    pub base: Box<Expression>,
    pub key: String,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expression>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Literal(Literal),

    /// Reference to a node, relationship, path or value variable
    Variable(Variable),

    /// `$name` placeholder; its value ends up in the parameter map
    Parameter(Parameter),

    /// `base.key`
    PropertyAccessExp(PropertyAccess),

    OperatorApplicationExp(OperatorApplication),

    /// `name(arg, ...)`
    FunctionCallExp(FunctionCall),

    List(Vec<Expression>),

    /// `{key: value, ...}`
    Map(Vec<(String, Expression)>),

    /// `id(x)`: internal identity of a node or relationship
    IdentityOf(Variable),

    /// `labels(x)`: label list of a node
    LabelsOf(Variable),

    /// Verbatim Cypher, rendered as given
    Raw(String),
}

impl Expression {
    fn binary(operator: Operator, left: impl Into<Expression>, right: impl Into<Expression>) -> Self {
        Expression::OperatorApplicationExp(OperatorApplication {
            operator,
            operands: vec![left.into(), right.into()],
        })
    }

    fn variadic<I, E>(operator: Operator, operands: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        Expression::OperatorApplicationExp(OperatorApplication {
            operator,
            operands: operands.into_iter().map(Into::into).collect(),
        })
    }

    fn unary(operator: Operator, operand: impl Into<Expression>) -> Self {
        Expression::OperatorApplicationExp(OperatorApplication {
            operator,
            operands: vec![operand.into()],
        })
    }

    pub fn eq(left: impl Into<Expression>, right: impl Into<Expression>) -> Self {
        Self::binary(Operator::Equal, left, right)
    }

    pub fn ne(left: impl Into<Expression>, right: impl Into<Expression>) -> Self {
        Self::binary(Operator::NotEqual, left, right)
    }

    pub fn lt(left: impl Into<Expression>, right: impl Into<Expression>) -> Self {
        Self::binary(Operator::LessThan, left, right)
    }

    pub fn gt(left: impl Into<Expression>, right: impl Into<Expression>) -> Self {
        Self::binary(Operator::GreaterThan, left, right)
    }

    pub fn lte(left: impl Into<Expression>, right: impl Into<Expression>) -> Self {
        Self::binary(Operator::LessThanEqual, left, right)
    }

    pub fn gte(left: impl Into<Expression>, right: impl Into<Expression>) -> Self {
        Self::binary(Operator::GreaterThanEqual, left, right)
    }

    pub fn matches(left: impl Into<Expression>, pattern: impl Into<Expression>) -> Self {
        Self::binary(Operator::RegexMatch, left, pattern)
    }

    pub fn in_list(item: impl Into<Expression>, list: impl Into<Expression>) -> Self {
        Self::binary(Operator::In, item, list)
    }

    pub fn starts_with(left: impl Into<Expression>, right: impl Into<Expression>) -> Self {
        Self::binary(Operator::StartsWith, left, right)
    }

    pub fn ends_with(left: impl Into<Expression>, right: impl Into<Expression>) -> Self {
        Self::binary(Operator::EndsWith, left, right)
    }

    pub fn contains(left: impl Into<Expression>, right: impl Into<Expression>) -> Self {
        Self::binary(Operator::Contains, left, right)
    }

    pub fn plus(left: impl Into<Expression>, right: impl Into<Expression>) -> Self {
        Self::binary(Operator::Addition, left, right)
    }

    pub fn minus(left: impl Into<Expression>, right: impl Into<Expression>) -> Self {
        Self::binary(Operator::Subtraction, left, right)
    }

    pub fn and<I, E>(operands: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        Self::variadic(Operator::And, operands)
    }

    pub fn or<I, E>(operands: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        Self::variadic(Operator::Or, operands)
    }

    pub fn xor<I, E>(operands: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        Self::variadic(Operator::Xor, operands)
    }

    pub fn not(operand: impl Into<Expression>) -> Self {
        Self::unary(Operator::Not, operand)
    }

    pub fn is_null(operand: impl Into<Expression>) -> Self {
        Self::unary(Operator::IsNull, operand)
    }

    pub fn is_not_null(operand: impl Into<Expression>) -> Self {
        Self::unary(Operator::IsNotNull, operand)
    }

    pub fn property(base: impl Into<Expression>, key: impl Into<String>) -> Self {
        Expression::PropertyAccessExp(PropertyAccess {
            base: Box::new(base.into()),
            key: key.into(),
        })
    }

    pub fn function<I, E>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        Expression::FunctionCallExp(FunctionCall {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        })
    }

    pub fn list<I, E>(items: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        Expression::List(items.into_iter().map(Into::into).collect())
    }

    pub fn map<I, K, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<Expression>,
    {
        Expression::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn raw(cypher: impl Into<String>) -> Self {
        Expression::Raw(cypher.into())
    }
}

impl Variable {
    /// `x.key`
    pub fn property(&self, key: impl Into<String>) -> Expression {
        Expression::property(self.clone(), key)
    }

    /// `id(x)`
    pub fn id(&self) -> Expression {
        Expression::IdentityOf(self.clone())
    }

    /// `labels(x)`
    pub fn labels(&self) -> Expression {
        Expression::LabelsOf(self.clone())
    }
}

impl From<Literal> for Expression {
    fn from(value: Literal) -> Self {
        Expression::Literal(value)
    }
}

impl From<Variable> for Expression {
    fn from(value: Variable) -> Self {
        Expression::Variable(value)
    }
}

impl From<&Variable> for Expression {
    fn from(value: &Variable) -> Self {
        Expression::Variable(value.clone())
    }
}

impl From<Parameter> for Expression {
    fn from(value: Parameter) -> Self {
        Expression::Parameter(value)
    }
}

impl From<&Parameter> for Expression {
    fn from(value: &Parameter) -> Self {
        Expression::Parameter(value.clone())
    }
}

impl From<PropertyAccess> for Expression {
    fn from(value: PropertyAccess) -> Self {
        Expression::PropertyAccessExp(value)
    }
}

/// Plain values are never inlined: each becomes a fresh anonymous parameter.
impl From<Value> for Expression {
    fn from(value: Value) -> Self {
        Expression::Parameter(Parameter::new(value))
    }
}

fn render_all(items: &[Expression], env: &mut Environment) -> Result<Vec<String>, CypherBuildError> {
    items.iter().map(|item| item.to_cypher(env)).collect()
}

/// Render `{key: value, ...}` with escaped keys, values left to right.
pub(crate) fn render_map(
    entries: &[(String, Expression)],
    env: &mut Environment,
) -> Result<String, CypherBuildError> {
    let rendered: Result<Vec<String>, CypherBuildError> = entries
        .iter()
        .map(|(key, value)| Ok(format!("{}: {}", escape_identifier(key), value.to_cypher(env)?)))
        .collect();
    Ok(format!("{{{}}}", rendered?.join(", ")))
}

impl OperatorApplication {
    /// Whether the rendered text already carries its own parentheses.
    fn is_delimited(&self) -> bool {
        match self.operator {
            Operator::And | Operator::Or | Operator::Xor => self.operands.len() > 1,
            op => op.is_arithmetic(),
        }
    }
}

/// Operand of a binary or postfix operator. Nested comparisons, predicates
/// and NOT are parenthesized so the text parses back into the same tree.
fn render_operand(operand: &Expression, env: &mut Environment) -> Result<String, CypherBuildError> {
    let text = operand.to_cypher(env)?;
    match operand {
        Expression::OperatorApplicationExp(op) if !op.is_delimited() => Ok(format!("({})", text)),
        _ => Ok(text),
    }
}

impl ToCypher for OperatorApplication {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        let keyword = self.operator.keyword();
        match self.operator {
            Operator::Not | Operator::IsNull | Operator::IsNotNull => {
                let [operand] = self.operands.as_slice() else {
                    return Err(CypherBuildError::malformed(format!(
                        "{} takes exactly one operand, got {}",
                        keyword,
                        self.operands.len()
                    )));
                };
                Ok(match self.operator {
                    Operator::Not => format!("NOT ({})", operand.to_cypher(env)?),
                    _ => format!("{} {}", render_operand(operand, env)?, keyword),
                })
            }
            Operator::And | Operator::Or | Operator::Xor => {
                let operands = render_all(&self.operands, env)?;
                match operands.len() {
                    0 => Err(CypherBuildError::malformed(format!(
                        "{} needs at least one operand",
                        keyword
                    ))),
                    1 => Ok(operands.into_iter().collect()),
                    _ => Ok(format!("({})", operands.join(&format!(" {} ", keyword)))),
                }
            }
            _ => {
                let [left, right] = self.operands.as_slice() else {
                    return Err(CypherBuildError::malformed(format!(
                        "{} takes exactly two operands, got {}",
                        keyword,
                        self.operands.len()
                    )));
                };
                let left = render_operand(left, env)?;
                let right = render_operand(right, env)?;
                if self.operator.is_arithmetic() {
                    Ok(format!("({} {} {})", left, keyword, right))
                } else {
                    Ok(format!("{} {} {}", left, keyword, right))
                }
            }
        }
    }
}

impl ToCypher for Expression {
    fn to_cypher(&self, env: &mut Environment) -> Result<String, CypherBuildError> {
        match self {
            Expression::Literal(literal) => literal.to_cypher(env),
            Expression::Variable(variable) => variable.to_cypher(env),
            Expression::Parameter(parameter) => parameter.to_cypher(env),
            Expression::PropertyAccessExp(access) => Ok(format!(
                "{}.{}",
                access.base.to_cypher(env)?,
                escape_identifier(&access.key)
            )),
            Expression::OperatorApplicationExp(op) => op.to_cypher(env),
            Expression::FunctionCallExp(call) => {
                let args = render_all(&call.args, env)?;
                Ok(format!("{}({})", call.name, args.join(", ")))
            }
            Expression::List(items) => Ok(format!("[{}]", render_all(items, env)?.join(", "))),
            Expression::Map(entries) => render_map(entries, env),
            Expression::IdentityOf(variable) => Ok(format!("id({})", variable.to_cypher(env)?)),
            Expression::LabelsOf(variable) => {
                Ok(format!("labels({})", variable.to_cypher(env)?))
            }
            Expression::Raw(raw) => Ok(raw.clone()),
        }
    }
}
