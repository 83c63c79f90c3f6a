use serde::Serialize;

use crate::ast::PrimitiveType;

/// A raw primitive value carried by a literal.
///
/// Numbers are stored as `f64`, so only integer types that convert
/// losslessly (`i32`, `u32`) are accepted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
}

impl Value {
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            Value::Number(_) => PrimitiveType::Number,
            Value::String(_) => PrimitiveType::String,
            Value::Boolean(_) => PrimitiveType::Boolean,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from(12).to_string(), "12");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from("it's").to_string(), "'it''s'");
        assert_eq!(Value::from(true).to_string(), "true");
    }

    #[test]
    fn test_value_type() {
        assert_eq!(Value::from(3u32).primitive_type(), PrimitiveType::Number);
        assert_eq!(Value::from(String::from("a")).primitive_type(), PrimitiveType::String);
        assert_eq!(Value::from(false).primitive_type(), PrimitiveType::Boolean);
    }
}
