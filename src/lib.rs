//! # qexpr: statically-checked query expressions
//!
//! Describe a model's shape, let the reflector classify its members into
//! columns, derived values and methods, then build immutable query
//! statements from typed expressions over those columns.
//!
//! ## Quick Example
//!
//! ```rust
//! use qexpr::prelude::*;
//!
//! let user = define(
//!     &ModelShape::new("User")
//!         .field("id", PrimitiveType::Number)
//!         .field("firstName", PrimitiveType::String)
//!         .field("age", PrimitiveType::Number)
//!         .getter("isMajor", PrimitiveType::Boolean),
//! )?;
//!
//! let id = user.number("id")?;
//! let first_name = user.text("firstName")?;
//! let age = user.number("age")?;
//!
//! let stmt = user
//!     .objects()
//!     .load([first_name.alias("foo"), literal(1).plus(&age).alias("value")])?
//!     .filter([id.gt(1)])?
//!     .group_by([&id])?
//!     .having([first_name.contains("a")])?;
//!
//! assert_eq!(stmt.target_list().len(), 2);
//! assert!(user.column("isMajor").is_err());
//! # Ok::<(), qexpr::QueryError>(())
//! ```
//!
//! ## Operators
//!
//! | category | arithmetic                      | comparison                  | logical   |
//! |----------|---------------------------------|-----------------------------|-----------|
//! | number   | `plus` `minus` `times` `divided_by` | `equals` `gt` `gte` `ls` `lse` |           |
//! | string   | `plus` (concat), `contains`     | `equals` `gt` `gte` `ls` `lse` |           |
//! | boolean  |                                 |                             | `and` `or` |

pub mod ast;
pub mod entity;
pub mod error;
pub mod reflect;
pub mod schema;
pub mod statement;
pub mod validator;

pub use entity::{define, define_model, Entity};
pub use error::{QueryError, QueryResult};
pub use statement::Statement;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::entity::{define, define_model, Entity};
    pub use crate::error::*;
    pub use crate::reflect::{reflect, Attribute, Reflection};
    pub use crate::schema::{Member, MemberKind, Model, ModelShape, SchemaFile};
    pub use crate::statement::Statement;
}
