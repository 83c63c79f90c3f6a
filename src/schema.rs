//! Model shapes: the declared members a model exposes to the reflector.
//!
//! Shapes can be built in code, provided by a [`Model`] implementation, or
//! loaded from TOML/JSON schema files.
//!
//! # Example
//! ```
//! use qexpr::schema::SchemaFile;
//!
//! let toml = r#"
//!     [[model]]
//!     name = "User"
//!
//!     [[model.member]]
//!     name = "id"
//!     kind = "field"
//!     type = "number"
//!
//!     [[model.member]]
//!     name = "isMajor"
//!     kind = "accessor"
//!     type = "boolean"
//! "#;
//!
//! let schema = SchemaFile::from_toml(toml).unwrap();
//! assert_eq!(schema.models[0].members.len(), 2);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ast::DeclaredType;
use crate::error::{QueryError, QueryResult};

/// The declared shape of one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelShape {
    pub name: String,
    #[serde(default, rename = "member")]
    pub members: Vec<Member>,
}

/// A named member of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMember", into = "RawMember")]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
}

/// How a member is declared.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    /// Stored field
    Field {
        ty: DeclaredType,
        readonly: bool,
        optional: bool,
    },
    /// Computed property, optionally with a setter
    Accessor { ty: DeclaredType, setter: bool },
    /// Callable member
    Method,
}

impl ModelShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Add a member.
    pub fn member(mut self, name: impl Into<String>, kind: MemberKind) -> Self {
        self.members.push(Member {
            name: name.into(),
            kind,
        });
        self
    }

    /// Builder: add a settable stored field.
    pub fn field(self, name: impl Into<String>, ty: impl Into<DeclaredType>) -> Self {
        self.member(
            name,
            MemberKind::Field {
                ty: ty.into(),
                readonly: false,
                optional: false,
            },
        )
    }

    /// Builder: add an optional stored field.
    pub fn optional_field(self, name: impl Into<String>, ty: impl Into<DeclaredType>) -> Self {
        self.member(
            name,
            MemberKind::Field {
                ty: ty.into(),
                readonly: false,
                optional: true,
            },
        )
    }

    /// Builder: add a readonly stored field.
    pub fn readonly_field(self, name: impl Into<String>, ty: impl Into<DeclaredType>) -> Self {
        self.member(
            name,
            MemberKind::Field {
                ty: ty.into(),
                readonly: true,
                optional: false,
            },
        )
    }

    /// Builder: add a getter-only computed property.
    pub fn getter(self, name: impl Into<String>, ty: impl Into<DeclaredType>) -> Self {
        self.member(
            name,
            MemberKind::Accessor {
                ty: ty.into(),
                setter: false,
            },
        )
    }

    /// Builder: add a property with both getter and setter.
    pub fn property(self, name: impl Into<String>, ty: impl Into<DeclaredType>) -> Self {
        self.member(
            name,
            MemberKind::Accessor {
                ty: ty.into(),
                setter: true,
            },
        )
    }

    /// Builder: add a method.
    pub fn method(self, name: impl Into<String>) -> Self {
        self.member(name, MemberKind::Method)
    }
}

/// Types that can describe their own shape.
pub trait Model {
    fn shape() -> ModelShape;
}

/// A file holding one or more model shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaFile {
    #[serde(default, rename = "model")]
    pub models: Vec<ModelShape>,
}

impl SchemaFile {
    pub fn from_toml(input: &str) -> QueryResult<Self> {
        toml::from_str(input).map_err(|e| QueryError::Schema(e.to_string()))
    }

    pub fn from_json(input: &str) -> QueryResult<Self> {
        serde_json::from_str(input).map_err(|e| QueryError::Schema(e.to_string()))
    }

    /// Load from a file path (`.json` is JSON, anything else TOML).
    pub fn load(path: &Path) -> QueryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    pub fn get(&self, name: &str) -> Option<&ModelShape> {
        self.models.iter().find(|m| m.name == name)
    }
}

/// Flat on-disk form of a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawMember {
    name: String,
    kind: RawKind,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    ty: Option<DeclaredType>,
    #[serde(default, skip_serializing_if = "is_false")]
    readonly: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    optional: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    setter: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawKind {
    Field,
    Accessor,
    Method,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl TryFrom<RawMember> for Member {
    type Error = String;

    fn try_from(raw: RawMember) -> Result<Self, Self::Error> {
        let missing_type = || format!("member '{}' needs a type", raw.name);
        let kind = match raw.kind {
            RawKind::Field => MemberKind::Field {
                ty: raw.ty.clone().ok_or_else(missing_type)?,
                readonly: raw.readonly,
                optional: raw.optional,
            },
            RawKind::Accessor => MemberKind::Accessor {
                ty: raw.ty.clone().ok_or_else(missing_type)?,
                setter: raw.setter,
            },
            RawKind::Method => MemberKind::Method,
        };
        Ok(Member {
            name: raw.name,
            kind,
        })
    }
}

impl From<Member> for RawMember {
    fn from(m: Member) -> Self {
        let mut raw = RawMember {
            name: m.name,
            kind: RawKind::Method,
            ty: None,
            readonly: false,
            optional: false,
            setter: false,
        };
        match m.kind {
            MemberKind::Field {
                ty,
                readonly,
                optional,
            } => {
                raw.kind = RawKind::Field;
                raw.ty = Some(ty);
                raw.readonly = readonly;
                raw.optional = optional;
            }
            MemberKind::Accessor { ty, setter } => {
                raw.kind = RawKind::Accessor;
                raw.ty = Some(ty);
                raw.setter = setter;
            }
            MemberKind::Method => {}
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::PrimitiveType;

    #[test]
    fn test_builder() {
        let shape = ModelShape::new("User")
            .field("id", PrimitiveType::Number)
            .getter("isMajor", PrimitiveType::Boolean)
            .method("doSomething");
        assert_eq!(shape.members.len(), 3);
        assert_eq!(shape.members[2].kind, MemberKind::Method);
    }

    #[test]
    fn test_json_schema() {
        let json = r#"{
            "model": [{
                "name": "Post",
                "member": [
                    { "name": "title", "kind": "field", "type": "string" },
                    { "name": "meta", "kind": "field", "type": "PostMeta", "optional": true },
                    { "name": "publish", "kind": "method" }
                ]
            }]
        }"#;
        let schema = SchemaFile::from_json(json).unwrap();
        let post = schema.get("Post").unwrap();
        assert_eq!(
            post.members[1].kind,
            MemberKind::Field {
                ty: DeclaredType::Named("PostMeta".into()),
                readonly: false,
                optional: true,
            }
        );
    }

    #[test]
    fn test_field_without_type_is_rejected() {
        let toml = r#"
            [[model]]
            name = "User"
            [[model.member]]
            name = "id"
            kind = "field"
        "#;
        let err = SchemaFile::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("member 'id' needs a type"));
    }
}
