use serde::Serialize;

use crate::ast::PrimitiveType;

/// Binary operators of the expression algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryOp {
    /// Numeric addition (+)
    Add,
    /// Numeric subtraction (-)
    Sub,
    /// Numeric multiplication (*)
    Mul,
    /// Numeric division (/)
    Div,
    /// String concatenation (||)
    Concat,
    /// Substring test
    Contains,
    /// Equality (=)
    Eq,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// Logical AND
    And,
    /// Logical OR
    Or,
}

impl BinaryOp {
    /// The builder method name that produces this operator.
    pub fn method_name(&self) -> &'static str {
        match self {
            BinaryOp::Add | BinaryOp::Concat => "plus",
            BinaryOp::Sub => "minus",
            BinaryOp::Mul => "times",
            BinaryOp::Div => "divided_by",
            BinaryOp::Contains => "contains",
            BinaryOp::Eq => "equals",
            BinaryOp::Gt => "gt",
            BinaryOp::Gte => "gte",
            BinaryOp::Lt => "ls",
            BinaryOp::Lte => "lse",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }

    /// Operand categories this operator is defined for.
    pub fn operand_types(&self) -> &'static [PrimitiveType] {
        use PrimitiveType::*;
        match self {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => &[Number],
            BinaryOp::Concat | BinaryOp::Contains => &[String],
            BinaryOp::Eq | BinaryOp::Gt | BinaryOp::Gte | BinaryOp::Lt | BinaryOp::Lte => {
                &[Number, String]
            }
            BinaryOp::And | BinaryOp::Or => &[Boolean],
        }
    }

    /// Result type when applied to operands of `operand` type, or `None`
    /// if the operator is not defined for that category.
    pub fn result_type(&self, operand: PrimitiveType) -> Option<PrimitiveType> {
        if !self.operand_types().contains(&operand) {
            return None;
        }
        Some(match self {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => PrimitiveType::Number,
            BinaryOp::Concat => PrimitiveType::String,
            _ => PrimitiveType::Boolean,
        })
    }

    /// Human-readable list of accepted operand categories.
    pub fn expected(&self) -> String {
        self.operand_types()
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
            BinaryOp::Concat => write!(f, "||"),
            BinaryOp::Contains => write!(f, "CONTAINS"),
            BinaryOp::Eq => write!(f, "="),
            BinaryOp::Gt => write!(f, ">"),
            BinaryOp::Gte => write!(f, ">="),
            BinaryOp::Lt => write!(f, "<"),
            BinaryOp::Lte => write!(f, "<="),
            BinaryOp::And => write!(f, "AND"),
            BinaryOp::Or => write!(f, "OR"),
        }
    }
}
