pub mod expr;
pub mod operators;
pub mod typed;
pub mod types;
pub mod values;

pub use self::expr::{Column, Derived, Expression, LabeledExpression, Literal, TargetItem};
pub use self::operators::BinaryOp;
pub use self::typed::{literal, Bool, Expr, IntoLiteral, IntoOperand, Number, Ordered, Primitive, Text};
pub use self::types::{DeclaredType, PrimitiveType};
pub use self::values::Value;
