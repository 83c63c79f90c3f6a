//! Error types for qexpr.

use thiserror::Error;

/// The main error type for model definition and expression building.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A stored field has a non-primitive type and cannot be a column.
    #[error("Attribute '{model}.{key}' has non-primitive type '{declared}' and cannot be used as a column")]
    NonPrimitiveAttribute {
        model: String,
        key: String,
        declared: String,
    },

    /// A method was addressed as a data attribute.
    #[error("Attribute '{model}.{key}' is a method, not a data attribute")]
    FunctionAttribute { model: String, key: String },

    /// A computed attribute was used where a column is required.
    #[error("Attribute '{model}.{key}' is derived ({declared}) and cannot be composed into a query")]
    DerivedAttribute {
        model: String,
        key: String,
        declared: String,
    },

    /// An operator was applied to an expression of the wrong category.
    #[error("Operator '{op}' expects {expected} operands, found {found}")]
    CategoryMismatch {
        op: &'static str,
        expected: String,
        found: String,
    },

    /// `having()` called while the group-by list is empty.
    #[error("having() requires a non-empty group-by list")]
    HavingWithoutGroupBy,

    #[error("Unknown attribute '{key}' on model '{model}'{}", did_you_mean(.suggestion))]
    UnknownAttribute {
        model: String,
        key: String,
        suggestion: Option<String>,
    },

    /// An accessor asked for the wrong type or category.
    #[error("Attribute '{model}.{key}' is {found}, not {expected}")]
    ColumnType {
        model: String,
        key: String,
        expected: String,
        found: String,
    },

    #[error("Column '{owner}.{key}' cannot be used in a statement on model '{model}'")]
    ForeignColumn {
        model: String,
        owner: String,
        key: String,
    },

    #[error("Member '{key}' is declared more than once on model '{model}'")]
    DuplicateMember { model: String, key: String },

    /// Malformed schema file.
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{}'?", s),
        None => String::new(),
    }
}

impl QueryError {
    /// Create a category mismatch error.
    pub fn mismatch(op: &'static str, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::CategoryMismatch {
            op,
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Result type alias for qexpr operations.
pub type QueryResult<T> = Result<T, QueryError>;
