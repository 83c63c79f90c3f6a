use std::sync::Arc;

use serde::Serialize;

use crate::ast::{BinaryOp, DeclaredType, PrimitiveType, Value};
use crate::error::{QueryError, QueryResult};

/// A queryable stored attribute of a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Column {
    /// Owning model name
    pub model: String,
    /// Attribute key, identical to the member name
    pub key: String,
    #[serde(rename = "type")]
    pub ty: PrimitiveType,
    /// Declared as an optional field
    pub nullable: bool,
}

impl Column {
    pub fn new(model: impl Into<String>, key: impl Into<String>, ty: PrimitiveType) -> Self {
        Self {
            model: model.into(),
            key: key.into(),
            ty,
            nullable: false,
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Qualified name (model.key).
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.model, self.key)
    }
}

/// A computed attribute. Carries its type but exposes no operators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Derived {
    pub model: String,
    pub key: String,
    #[serde(rename = "type")]
    pub ty: DeclaredType,
}

impl Derived {
    pub fn new(model: impl Into<String>, key: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            model: model.into(),
            key: key.into(),
            ty,
        }
    }

    /// The error raised when this placeholder is used as a column.
    pub fn error(&self) -> QueryError {
        QueryError::DerivedAttribute {
            model: self.model.clone(),
            key: self.key.clone(),
            declared: self.ty.to_string(),
        }
    }
}

/// A fixed primitive value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    pub value: Value,
    #[serde(rename = "type")]
    pub ty: PrimitiveType,
}

impl Literal {
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        let ty = value.primitive_type();
        Self { value, ty }
    }
}

/// An immutable scalar expression tree.
///
/// Nodes are shared through `Arc`, so cloning an expression or reusing a
/// column across several statements never copies the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "$type", rename_all = "camelCase")]
pub enum Expression {
    Column(Arc<Column>),
    Literal(Literal),
    Derived(Arc<Derived>),
    /// Result of applying an operator (left op right)
    Binary {
        left: Arc<Expression>,
        op: BinaryOp,
        right: Arc<Expression>,
        #[serde(rename = "type")]
        ty: PrimitiveType,
    },
}

impl Expression {
    /// Wrap a raw value as a literal node.
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(Literal::new(value))
    }

    /// Primitive type of this expression, `None` for derived placeholders.
    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        match self {
            Expression::Column(c) => Some(c.ty),
            Expression::Literal(l) => Some(l.ty),
            Expression::Derived(_) => None,
            Expression::Binary { ty, .. } => Some(*ty),
        }
    }

    /// Category name used in diagnostics.
    pub fn category(&self) -> String {
        match self.primitive_type() {
            Some(t) => t.to_string(),
            None => "derived".to_string(),
        }
    }

    pub fn is_boolean(&self) -> bool {
        self.primitive_type() == Some(PrimitiveType::Boolean)
    }

    /// Name this expression for use in a target list.
    pub fn alias(self, label: impl Into<String>) -> LabeledExpression {
        LabeledExpression {
            label: label.into(),
            expression: self,
        }
    }

    /// Apply `op` with `rhs`, checking that both operands belong to a
    /// category the operator is defined for.
    pub fn combine(&self, op: BinaryOp, rhs: impl Into<Expression>) -> QueryResult<Expression> {
        let lhs = self
            .primitive_type()
            .ok_or_else(|| QueryError::mismatch(op.method_name(), op.expected(), self.category()))?;
        let ty = op
            .result_type(lhs)
            .ok_or_else(|| QueryError::mismatch(op.method_name(), op.expected(), lhs.as_str()))?;

        let rhs = rhs.into();
        if rhs.primitive_type() != Some(lhs) {
            return Err(QueryError::mismatch(
                op.method_name(),
                lhs.as_str(),
                rhs.category(),
            ));
        }
        Ok(Expression::binary(self.clone(), op, rhs, ty))
    }

    /// Build a binary node without checking operand categories.
    pub(crate) fn binary(left: Expression, op: BinaryOp, right: Expression, ty: PrimitiveType) -> Self {
        Expression::Binary {
            left: Arc::new(left),
            op,
            right: Arc::new(right),
            ty,
        }
    }

    /// `+` on numbers, concatenation on strings.
    pub fn plus(&self, rhs: impl Into<Expression>) -> QueryResult<Expression> {
        match self.primitive_type() {
            Some(PrimitiveType::String) => self.combine(BinaryOp::Concat, rhs),
            _ => self.combine(BinaryOp::Add, rhs),
        }
    }

    pub fn minus(&self, rhs: impl Into<Expression>) -> QueryResult<Expression> {
        self.combine(BinaryOp::Sub, rhs)
    }

    pub fn times(&self, rhs: impl Into<Expression>) -> QueryResult<Expression> {
        self.combine(BinaryOp::Mul, rhs)
    }

    pub fn divided_by(&self, rhs: impl Into<Expression>) -> QueryResult<Expression> {
        self.combine(BinaryOp::Div, rhs)
    }

    pub fn contains(&self, rhs: impl Into<Expression>) -> QueryResult<Expression> {
        self.combine(BinaryOp::Contains, rhs)
    }

    pub fn equals(&self, rhs: impl Into<Expression>) -> QueryResult<Expression> {
        self.combine(BinaryOp::Eq, rhs)
    }

    pub fn gt(&self, rhs: impl Into<Expression>) -> QueryResult<Expression> {
        self.combine(BinaryOp::Gt, rhs)
    }

    pub fn gte(&self, rhs: impl Into<Expression>) -> QueryResult<Expression> {
        self.combine(BinaryOp::Gte, rhs)
    }

    pub fn ls(&self, rhs: impl Into<Expression>) -> QueryResult<Expression> {
        self.combine(BinaryOp::Lt, rhs)
    }

    pub fn lse(&self, rhs: impl Into<Expression>) -> QueryResult<Expression> {
        self.combine(BinaryOp::Lte, rhs)
    }

    pub fn and(&self, rhs: impl Into<Expression>) -> QueryResult<Expression> {
        self.combine(BinaryOp::And, rhs)
    }

    pub fn or(&self, rhs: impl Into<Expression>) -> QueryResult<Expression> {
        self.combine(BinaryOp::Or, rhs)
    }

    /// All columns referenced by this tree, left to right.
    pub fn columns(&self) -> Vec<&Column> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a Column>) {
        match self {
            Expression::Column(c) => out.push(c),
            Expression::Binary { left, right, .. } => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            Expression::Literal(_) | Expression::Derived(_) => {}
        }
    }

    /// First derived placeholder found in this tree, if any.
    pub fn find_derived(&self) -> Option<&Derived> {
        match self {
            Expression::Derived(d) => Some(&**d),
            Expression::Binary { left, right, .. } => {
                left.find_derived().or_else(|| right.find_derived())
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Column(c) => write!(f, "{}", c.key),
            Expression::Literal(l) => write!(f, "{}", l.value),
            Expression::Derived(d) => write!(f, "<derived {}>", d.key),
            Expression::Binary { left, op, right, .. } => write!(f, "({} {} {})", left, op, right),
        }
    }
}

impl From<Arc<Column>> for Expression {
    fn from(c: Arc<Column>) -> Self {
        Expression::Column(c)
    }
}

impl From<Column> for Expression {
    fn from(c: Column) -> Self {
        Expression::Column(Arc::new(c))
    }
}

impl From<Arc<Derived>> for Expression {
    fn from(d: Arc<Derived>) -> Self {
        Expression::Derived(d)
    }
}

impl From<Literal> for Expression {
    fn from(l: Literal) -> Self {
        Expression::Literal(l)
    }
}

impl From<&Expression> for Expression {
    fn from(e: &Expression) -> Self {
        e.clone()
    }
}

macro_rules! literal_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Expression {
                fn from(v: $t) -> Self {
                    Expression::literal(v)
                }
            }
        )*
    };
}

literal_from!(Value, bool, i32, u32, f32, f64, &str, String);

/// An expression tagged with a display label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "$type", rename = "labeledExpression")]
pub struct LabeledExpression {
    pub label: String,
    pub expression: Expression,
}

impl std::fmt::Display for LabeledExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} AS {}", self.expression, self.label)
    }
}

/// One entry of a statement's target list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TargetItem {
    Expression(Expression),
    Labeled(LabeledExpression),
}

impl TargetItem {
    pub fn expression(&self) -> &Expression {
        match self {
            TargetItem::Expression(e) => e,
            TargetItem::Labeled(l) => &l.expression,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            TargetItem::Expression(_) => None,
            TargetItem::Labeled(l) => Some(&l.label),
        }
    }
}

impl std::fmt::Display for TargetItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetItem::Expression(e) => write!(f, "{}", e),
            TargetItem::Labeled(l) => write!(f, "{}", l),
        }
    }
}

impl From<Expression> for TargetItem {
    fn from(e: Expression) -> Self {
        TargetItem::Expression(e)
    }
}

impl From<LabeledExpression> for TargetItem {
    fn from(l: LabeledExpression) -> Self {
        TargetItem::Labeled(l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age() -> Expression {
        Column::new("User", "age", PrimitiveType::Number).into()
    }

    fn first_name() -> Expression {
        Column::new("User", "firstName", PrimitiveType::String).into()
    }

    #[test]
    fn test_dynamic_plus_dispatches_by_category() {
        let sum = age().plus(1).unwrap();
        assert!(matches!(sum, Expression::Binary { op: BinaryOp::Add, ty: PrimitiveType::Number, .. }));

        let concat = first_name().plus("!").unwrap();
        assert!(matches!(concat, Expression::Binary { op: BinaryOp::Concat, ty: PrimitiveType::String, .. }));
    }

    #[test]
    fn test_and_on_number_is_rejected() {
        let err = age().and(true).unwrap_err();
        assert!(matches!(err, QueryError::CategoryMismatch { op: "and", .. }));
    }

    #[test]
    fn test_operand_category_must_match() {
        let err = age().gt("ten").unwrap_err();
        assert_eq!(err.to_string(), "Operator 'gt' expects number operands, found string");
    }

    #[test]
    fn test_derived_has_no_operators() {
        let major: Expression = Arc::new(Derived::new("User", "isMajor", PrimitiveType::Boolean.into())).into();
        let err = major.or(true).unwrap_err();
        assert_eq!(err.to_string(), "Operator 'or' expects boolean operands, found derived");
        assert!(age().plus(major.clone()).is_err());
    }

    #[test]
    fn test_boolean_composition() {
        let cond = first_name().contains("a").unwrap().or(age().ls(10).unwrap()).unwrap();
        assert!(cond.is_boolean());
        assert_eq!(cond.to_string(), "((firstName CONTAINS 'a') OR (age < 10))");
        let keys: Vec<&str> = cond.columns().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["firstName", "age"]);
    }

    #[test]
    fn test_alias_wraps_expression() {
        let labeled = Expression::literal(1).plus(age()).unwrap().alias("value");
        assert_eq!(labeled.label, "value");
        assert_eq!(labeled.expression.primitive_type(), Some(PrimitiveType::Number));
        assert_eq!(labeled.to_string(), "(1 + age) AS value");
    }

    #[test]
    fn test_serialize_tags_nodes() {
        let json = serde_json::to_value(age().gt(1).unwrap()).unwrap();
        assert_eq!(json["$type"], "binary");
        assert_eq!(json["op"], "gt");
        assert_eq!(json["left"]["$type"], "column");
        assert_eq!(json["left"]["key"], "age");
        assert_eq!(json["right"]["$type"], "literal");
        assert_eq!(json["right"]["value"], 1.0);
    }
}
