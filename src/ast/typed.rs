//! Statically-typed expression layer.
//!
//! `Expr<K>` wraps an [`Expression`] whose primitive category is fixed by the
//! marker type `K` ([`Number`], [`Text`] or [`Bool`]). Operators only exist on
//! the categories they are defined for, and operands must be of the same
//! category, so a misplaced operator is a compile error rather than a
//! runtime one.
//!
//! ```
//! use qexpr::ast::literal;
//!
//! let value = literal(1).plus(2).alias("value");
//! assert_eq!(value.to_string(), "(1 + 2) AS value");
//! ```
//!
//! ```compile_fail
//! use qexpr::ast::literal;
//!
//! // `and` is only defined for boolean expressions
//! let _ = literal(1).and(true);
//! ```
//!
//! ```compile_fail
//! use qexpr::ast::literal;
//!
//! // operands must share a category
//! let _ = literal(1).gt("one");
//! ```

use std::marker::PhantomData;

use crate::ast::{BinaryOp, Expression, LabeledExpression, PrimitiveType, TargetItem, Value};
use crate::error::{QueryError, QueryResult};

mod sealed {
    pub trait Sealed {}
}

/// Marker for a primitive expression category.
pub trait Primitive: sealed::Sealed + 'static {
    const TYPE: PrimitiveType;
}

/// Categories that support `equals` and ordering comparisons.
pub trait Ordered: Primitive {}

/// Numeric category.
pub enum Number {}
/// String category.
pub enum Text {}
/// Boolean category.
pub enum Bool {}

impl sealed::Sealed for Number {}
impl sealed::Sealed for Text {}
impl sealed::Sealed for Bool {}

impl Primitive for Number {
    const TYPE: PrimitiveType = PrimitiveType::Number;
}

impl Primitive for Text {
    const TYPE: PrimitiveType = PrimitiveType::String;
}

impl Primitive for Bool {
    const TYPE: PrimitiveType = PrimitiveType::Boolean;
}

impl Ordered for Number {}
impl Ordered for Text {}

/// An expression of statically known category `K`.
pub struct Expr<K> {
    inner: Expression,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for Expr<K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K> std::fmt::Debug for Expr<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Expr").field(&self.inner).finish()
    }
}

impl<K> PartialEq for Expr<K> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<K> std::fmt::Display for Expr<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl<K: Primitive> Expr<K> {
    /// Caller guarantees `inner` has type `K::TYPE`.
    pub(crate) fn new_unchecked(inner: Expression) -> Self {
        Self {
            inner,
            _kind: PhantomData,
        }
    }

    /// Check a dynamic expression against category `K`.
    pub fn try_from_expression(inner: Expression) -> QueryResult<Self> {
        if inner.primitive_type() != Some(K::TYPE) {
            return Err(QueryError::mismatch("typed", K::TYPE.as_str(), inner.category()));
        }
        Ok(Self::new_unchecked(inner))
    }

    pub fn expression(&self) -> &Expression {
        &self.inner
    }

    pub fn into_expression(self) -> Expression {
        self.inner
    }

    pub fn primitive_type(&self) -> PrimitiveType {
        K::TYPE
    }

    /// Name this expression for use in a target list.
    pub fn alias(&self, label: impl Into<String>) -> LabeledExpression {
        self.inner.clone().alias(label)
    }

    fn apply<R: Primitive>(&self, op: BinaryOp, rhs: impl IntoOperand<K>) -> Expr<R> {
        Expr::new_unchecked(Expression::binary(
            self.inner.clone(),
            op,
            rhs.into_operand(),
            R::TYPE,
        ))
    }
}

impl Expr<Number> {
    pub fn plus(&self, rhs: impl IntoOperand<Number>) -> Expr<Number> {
        self.apply(BinaryOp::Add, rhs)
    }

    pub fn minus(&self, rhs: impl IntoOperand<Number>) -> Expr<Number> {
        self.apply(BinaryOp::Sub, rhs)
    }

    pub fn times(&self, rhs: impl IntoOperand<Number>) -> Expr<Number> {
        self.apply(BinaryOp::Mul, rhs)
    }

    pub fn divided_by(&self, rhs: impl IntoOperand<Number>) -> Expr<Number> {
        self.apply(BinaryOp::Div, rhs)
    }
}

impl Expr<Text> {
    /// String concatenation.
    pub fn plus(&self, rhs: impl IntoOperand<Text>) -> Expr<Text> {
        self.apply(BinaryOp::Concat, rhs)
    }

    pub fn contains(&self, rhs: impl IntoOperand<Text>) -> Expr<Bool> {
        self.apply(BinaryOp::Contains, rhs)
    }
}

impl<K: Ordered> Expr<K> {
    pub fn equals(&self, rhs: impl IntoOperand<K>) -> Expr<Bool> {
        self.apply(BinaryOp::Eq, rhs)
    }

    pub fn gt(&self, rhs: impl IntoOperand<K>) -> Expr<Bool> {
        self.apply(BinaryOp::Gt, rhs)
    }

    pub fn gte(&self, rhs: impl IntoOperand<K>) -> Expr<Bool> {
        self.apply(BinaryOp::Gte, rhs)
    }

    pub fn ls(&self, rhs: impl IntoOperand<K>) -> Expr<Bool> {
        self.apply(BinaryOp::Lt, rhs)
    }

    pub fn lse(&self, rhs: impl IntoOperand<K>) -> Expr<Bool> {
        self.apply(BinaryOp::Lte, rhs)
    }
}

impl Expr<Bool> {
    pub fn and(&self, rhs: impl IntoOperand<Bool>) -> Expr<Bool> {
        self.apply(BinaryOp::And, rhs)
    }

    pub fn or(&self, rhs: impl IntoOperand<Bool>) -> Expr<Bool> {
        self.apply(BinaryOp::Or, rhs)
    }
}

/// Right-hand operand of category `K`: a typed expression or a raw value,
/// which is coerced into a literal.
pub trait IntoOperand<K> {
    fn into_operand(self) -> Expression;
}

impl<K> IntoOperand<K> for Expr<K> {
    fn into_operand(self) -> Expression {
        self.inner
    }
}

impl<K> IntoOperand<K> for &Expr<K> {
    fn into_operand(self) -> Expression {
        self.inner.clone()
    }
}

/// Raw values that can become a literal of a known category.
///
/// Only one integer and one float type implement this, so an unsuffixed
/// `literal(1)` or `literal(1.5)` resolves its category without annotations.
pub trait IntoLiteral: Into<Value> {
    type Kind: Primitive;
}

macro_rules! raw_operand {
    ($kind:ty => $($t:ty),*) => {
        $(
            impl IntoOperand<$kind> for $t {
                fn into_operand(self) -> Expression {
                    Expression::literal(self)
                }
            }
        )*
    };
}

macro_rules! literal_kind {
    ($kind:ty => $($t:ty),*) => {
        $(
            impl IntoLiteral for $t {
                type Kind = $kind;
            }
        )*
    };
}

raw_operand!(Number => i32, u32, f32, f64);
raw_operand!(Text => &str, String);
raw_operand!(Bool => bool);

literal_kind!(Number => i32, f64);
literal_kind!(Text => &str, String);
literal_kind!(Bool => bool);

/// Create a typed literal from a raw value.
pub fn literal<V: IntoLiteral>(value: V) -> Expr<V::Kind> {
    Expr::new_unchecked(Expression::literal(value))
}

impl<K> From<Expr<K>> for Expression {
    fn from(e: Expr<K>) -> Self {
        e.inner
    }
}

impl<K> From<&Expr<K>> for Expression {
    fn from(e: &Expr<K>) -> Self {
        e.inner.clone()
    }
}

impl<K> From<Expr<K>> for TargetItem {
    fn from(e: Expr<K>) -> Self {
        TargetItem::Expression(e.inner)
    }
}

impl<K> From<&Expr<K>> for TargetItem {
    fn from(e: &Expr<K>) -> Self {
        TargetItem::Expression(e.inner.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Column;

    fn age() -> Expr<Number> {
        Expr::try_from_expression(Column::new("User", "age", PrimitiveType::Number).into()).unwrap()
    }

    fn first_name() -> Expr<Text> {
        Expr::try_from_expression(Column::new("User", "firstName", PrimitiveType::String).into())
            .unwrap()
    }

    #[test]
    fn test_literal_plus_column_alias() {
        let labeled = literal(1).plus(&age()).alias("value");
        assert_eq!(labeled.label, "value");
        assert_eq!(labeled.expression.primitive_type(), Some(PrimitiveType::Number));
        assert!(matches!(labeled.expression, Expression::Binary { op: BinaryOp::Add, .. }));
    }

    #[test]
    fn test_contains_or_comparison_is_boolean() {
        let cond: Expr<Bool> = first_name().contains("a").or(age().ls(10));
        assert_eq!(cond.primitive_type(), PrimitiveType::Boolean);
        assert!(cond.expression().is_boolean());
    }

    #[test]
    fn test_text_plus_is_concat() {
        let full = first_name().plus(" ").plus("x");
        assert_eq!(full.to_string(), "((firstName || ' ') || 'x')");
    }

    #[test]
    fn test_raw_values_coerce_to_literals() {
        let cmp = age().gte(18.5);
        match cmp.expression() {
            Expression::Binary { right, .. } => {
                assert!(matches!(right.as_ref(), Expression::Literal(l) if l.ty == PrimitiveType::Number));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_try_from_expression_checks_category() {
        let err = Expr::<Bool>::try_from_expression(Expression::literal(3)).unwrap_err();
        assert_eq!(err.to_string(), "Operator 'typed' expects boolean operands, found number");
    }

    #[test]
    fn test_column_reused_by_reference() {
        let a = age();
        let x = a.plus(1);
        let y = a.times(2);
        let (Expression::Binary { left: lx, .. }, Expression::Binary { left: ly, .. }) =
            (x.expression(), y.expression())
        else {
            panic!("expected binary nodes");
        };
        match (lx.as_ref(), ly.as_ref()) {
            (Expression::Column(c1), Expression::Column(c2)) => assert!(std::sync::Arc::ptr_eq(c1, c2)),
            _ => panic!("expected columns"),
        }
    }
}
