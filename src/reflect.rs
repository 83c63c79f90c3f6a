//! Attribute reflection: classify every member of a model shape.
//!
//! Classification is a one-time pass per model. Each member lands in exactly
//! one [`Attribute`] category:
//!
//! | member                                   | attribute      |
//! |------------------------------------------|----------------|
//! | method, or any `function`-typed member   | `Function`     |
//! | getter-only accessor, readonly field     | `Derived`      |
//! | settable member of primitive type        | `Column`       |
//! | settable member of any other type        | `NonPrimitive` |

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use crate::ast::{Column, DeclaredType, Derived};
use crate::error::{QueryError, QueryResult};
use crate::schema::{Member, MemberKind, ModelShape};

/// Classification of one model member.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum Attribute {
    Column(Arc<Column>),
    NonPrimitive(NonPrimitiveAttribute),
    Derived(Arc<Derived>),
    Function(FunctionAttribute),
}

/// Placeholder for a stored field whose type is not primitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NonPrimitiveAttribute {
    pub model: String,
    pub key: String,
    #[serde(rename = "type")]
    pub declared: DeclaredType,
}

impl NonPrimitiveAttribute {
    pub fn error(&self) -> QueryError {
        QueryError::NonPrimitiveAttribute {
            model: self.model.clone(),
            key: self.key.clone(),
            declared: self.declared.to_string(),
        }
    }
}

/// Placeholder for a method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionAttribute {
    pub model: String,
    pub key: String,
}

impl FunctionAttribute {
    pub fn error(&self) -> QueryError {
        QueryError::FunctionAttribute {
            model: self.model.clone(),
            key: self.key.clone(),
        }
    }
}

impl Attribute {
    pub fn key(&self) -> &str {
        match self {
            Attribute::Column(c) => &c.key,
            Attribute::NonPrimitive(n) => &n.key,
            Attribute::Derived(d) => &d.key,
            Attribute::Function(f) => &f.key,
        }
    }

    /// Short category name.
    pub fn category(&self) -> &'static str {
        match self {
            Attribute::Column(_) => "column",
            Attribute::NonPrimitive(_) => "non-primitive",
            Attribute::Derived(_) => "derived",
            Attribute::Function(_) => "function",
        }
    }

    /// The column, or the error this placeholder stands for.
    pub fn as_column(&self) -> QueryResult<&Arc<Column>> {
        match self {
            Attribute::Column(c) => Ok(c),
            Attribute::NonPrimitive(n) => Err(n.error()),
            Attribute::Derived(d) => Err(d.error()),
            Attribute::Function(f) => Err(f.error()),
        }
    }
}

/// Name → classification table for one model, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reflection {
    model: String,
    attributes: Vec<Attribute>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Reflection {
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn get(&self, key: &str) -> Option<&Attribute> {
        self.index.get(key).map(|&i| &self.attributes[i])
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.key())
    }

    pub fn columns(&self) -> impl Iterator<Item = &Arc<Column>> {
        self.attributes.iter().filter_map(|a| match a {
            Attribute::Column(c) => Some(c),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Classify a single member of `model`.
pub fn classify(model: &str, member: &Member) -> Attribute {
    let key = member.name.clone();
    let (ty, settable, optional) = match &member.kind {
        MemberKind::Method => {
            return Attribute::Function(FunctionAttribute {
                model: model.to_string(),
                key,
            });
        }
        MemberKind::Field {
            ty,
            readonly,
            optional,
        } => (ty, !readonly, *optional),
        MemberKind::Accessor { ty, setter } => (ty, *setter, false),
    };

    if ty.is_function() {
        return Attribute::Function(FunctionAttribute {
            model: model.to_string(),
            key,
        });
    }
    if !settable {
        return Attribute::Derived(Arc::new(Derived::new(model, key, ty.clone())));
    }
    match ty.as_primitive() {
        Some(p) => Attribute::Column(Arc::new(Column::new(model, key, p).nullable(optional))),
        None => Attribute::NonPrimitive(NonPrimitiveAttribute {
            model: model.to_string(),
            key,
            declared: ty.clone(),
        }),
    }
}

/// Classify every member of `shape` exactly once.
pub fn reflect(shape: &ModelShape) -> QueryResult<Reflection> {
    let mut attributes = Vec::with_capacity(shape.members.len());
    let mut index = HashMap::with_capacity(shape.members.len());

    for member in &shape.members {
        match index.entry(member.name.clone()) {
            Entry::Occupied(_) => {
                return Err(QueryError::DuplicateMember {
                    model: shape.name.clone(),
                    key: member.name.clone(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(attributes.len());
            }
        }
        let attribute = classify(&shape.name, member);
        trace!(model = %shape.name, key = %member.name, category = attribute.category(), "classified member");
        attributes.push(attribute);
    }

    let reflection = Reflection {
        model: shape.name.clone(),
        attributes,
        index,
    };
    debug!(
        model = %reflection.model,
        members = reflection.len(),
        columns = reflection.columns().count(),
        "reflected model"
    );
    Ok(reflection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::PrimitiveType;

    fn user_shape() -> ModelShape {
        ModelShape::new("User")
            .field("id", PrimitiveType::Number)
            .field("firstName", PrimitiveType::String)
            .field("lastName", PrimitiveType::String)
            .field("age", PrimitiveType::Number)
            .field("foo", "Foo")
            .getter("isMajor", PrimitiveType::Boolean)
            .getter("infos", "Infos")
            .method("doSomething")
    }

    #[test]
    fn test_classification() {
        let r = reflect(&user_shape()).unwrap();
        let cats: Vec<(&str, &str)> = r.attributes().iter().map(|a| (a.key(), a.category())).collect();
        assert_eq!(
            cats,
            vec![
                ("id", "column"),
                ("firstName", "column"),
                ("lastName", "column"),
                ("age", "column"),
                ("foo", "non-primitive"),
                ("isMajor", "derived"),
                ("infos", "derived"),
                ("doSomething", "function"),
            ]
        );
    }

    #[test]
    fn test_column_carries_model_key_and_type() {
        let r = reflect(&user_shape()).unwrap();
        let Some(Attribute::Column(age)) = r.get("age") else {
            panic!("age should be a column");
        };
        assert_eq!(age.model, "User");
        assert_eq!(age.key, "age");
        assert_eq!(age.ty, PrimitiveType::Number);
        assert!(!age.nullable);
    }

    #[test]
    fn test_settable_and_readonly_members() {
        let shape = ModelShape::new("Account")
            .readonly_field("createdAt", PrimitiveType::Number)
            .property("nickname", PrimitiveType::String)
            .optional_field("email", PrimitiveType::String)
            .field("onChange", "function");
        let r = reflect(&shape).unwrap();

        assert!(matches!(r.get("createdAt"), Some(Attribute::Derived(_))));
        assert!(matches!(r.get("nickname"), Some(Attribute::Column(_))));
        assert!(matches!(r.get("email"), Some(Attribute::Column(c)) if c.nullable));
        assert!(matches!(r.get("onChange"), Some(Attribute::Function(_))));
    }

    #[test]
    fn test_placeholders_signal_errors() {
        let r = reflect(&user_shape()).unwrap();
        let err = r.get("foo").unwrap().as_column().unwrap_err();
        assert!(matches!(err, QueryError::NonPrimitiveAttribute { .. }));
        let err = r.get("doSomething").unwrap().as_column().unwrap_err();
        assert!(matches!(err, QueryError::FunctionAttribute { .. }));
        let err = r.get("isMajor").unwrap().as_column().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Attribute 'User.isMajor' is derived (boolean) and cannot be composed into a query"
        );
    }

    #[test]
    fn test_duplicate_member() {
        let shape = ModelShape::new("User")
            .field("id", PrimitiveType::Number)
            .getter("id", PrimitiveType::Number);
        assert!(matches!(reflect(&shape), Err(QueryError::DuplicateMember { .. })));
    }
}
