use serde::{Deserialize, Serialize};

/// The three primitive categories an expression can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Number,
    String,
    Boolean,
}

impl PrimitiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Number => "number",
            PrimitiveType::String => "string",
            PrimitiveType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The declared type of a model member, as written in its shape.
///
/// Schema files spell this as a plain string: `number`, `string`, `boolean`,
/// `function`, or any other type name (treated as a nested record).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeclaredType {
    Primitive(PrimitiveType),
    /// A callable type
    Function,
    /// Anything else (nested record, list, map...)
    Named(String),
}

impl DeclaredType {
    pub fn named(name: impl Into<String>) -> Self {
        DeclaredType::from(name.into())
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            DeclaredType::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, DeclaredType::Function)
    }
}

impl From<PrimitiveType> for DeclaredType {
    fn from(p: PrimitiveType) -> Self {
        DeclaredType::Primitive(p)
    }
}

impl From<String> for DeclaredType {
    fn from(s: String) -> Self {
        match s.trim() {
            "number" => DeclaredType::Primitive(PrimitiveType::Number),
            "string" => DeclaredType::Primitive(PrimitiveType::String),
            "boolean" => DeclaredType::Primitive(PrimitiveType::Boolean),
            "function" => DeclaredType::Function,
            other => DeclaredType::Named(other.to_string()),
        }
    }
}

impl From<&str> for DeclaredType {
    fn from(s: &str) -> Self {
        DeclaredType::from(s.to_string())
    }
}

impl From<DeclaredType> for String {
    fn from(t: DeclaredType) -> String {
        t.to_string()
    }
}

impl std::fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclaredType::Primitive(p) => write!(f, "{}", p),
            DeclaredType::Function => write!(f, "function"),
            DeclaredType::Named(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_type_from_str() {
        assert_eq!(DeclaredType::from("number"), DeclaredType::Primitive(PrimitiveType::Number));
        assert_eq!(DeclaredType::from("function"), DeclaredType::Function);
        assert_eq!(DeclaredType::from("Address"), DeclaredType::Named("Address".into()));
        assert_eq!(DeclaredType::named("boolean").as_primitive(), Some(PrimitiveType::Boolean));
    }
}
