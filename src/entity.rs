//! Entity wrapper: a model's reflected attributes plus its root statement.

use std::sync::Arc;

use tracing::debug;

use crate::ast::{Bool, Column, Derived, Expr, Expression, Number, Primitive, Text};
use crate::error::{QueryError, QueryResult};
use crate::reflect::{reflect, Attribute, Reflection};
use crate::schema::{Model, ModelShape};
use crate::statement::Statement;
use crate::validator::did_you_mean;

/// A defined model: typed column accessors and a root [`Statement`].
///
/// ```
/// use qexpr::prelude::*;
///
/// let user = define(
///     &ModelShape::new("User")
///         .field("id", PrimitiveType::Number)
///         .getter("isMajor", PrimitiveType::Boolean),
/// )
/// .unwrap();
///
/// let id = user.number("id").unwrap();
/// let stmt = user.objects().filter([id.gt(1)]).unwrap();
/// assert_eq!(stmt.filter_list().len(), 1);
/// assert!(user.column("isMajor").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Entity {
    reflection: Arc<Reflection>,
    objects: Statement,
}

/// Reflect `shape` and wrap the result. No model instance is created.
pub fn define(shape: &ModelShape) -> QueryResult<Entity> {
    let reflection = reflect(shape)?;
    let objects = Statement::root(reflection.model());
    debug!(model = %shape.name, "defined entity");
    Ok(Entity {
        reflection: Arc::new(reflection),
        objects,
    })
}

/// Define a type that implements [`Model`].
pub fn define_model<M: Model>() -> QueryResult<Entity> {
    define(&M::shape())
}

impl Entity {
    pub fn name(&self) -> &str {
        self.reflection.model()
    }

    /// The root statement: empty target, filter, group-by and having lists.
    pub fn objects(&self) -> &Statement {
        &self.objects
    }

    pub fn reflection(&self) -> &Reflection {
        &self.reflection
    }

    pub fn attributes(&self) -> &[Attribute] {
        self.reflection.attributes()
    }

    pub fn columns(&self) -> impl Iterator<Item = &Arc<Column>> {
        self.reflection.columns()
    }

    /// Raw classification of `key`.
    pub fn attribute(&self, key: &str) -> QueryResult<&Attribute> {
        self.reflection.get(key).ok_or_else(|| QueryError::UnknownAttribute {
            model: self.name().to_string(),
            key: key.to_string(),
            suggestion: did_you_mean(key, self.reflection.keys()),
        })
    }

    /// Column expression for `key`, or the error its classification stands for.
    pub fn column(&self, key: &str) -> QueryResult<Expression> {
        let column = self.attribute(key)?.as_column()?;
        Ok(Expression::Column(Arc::clone(column)))
    }

    /// Typed column expression for `key`.
    pub fn typed<K: Primitive>(&self, key: &str) -> QueryResult<Expr<K>> {
        let column = self.attribute(key)?.as_column()?;
        if column.ty != K::TYPE {
            return Err(QueryError::ColumnType {
                model: self.name().to_string(),
                key: key.to_string(),
                expected: K::TYPE.to_string(),
                found: column.ty.to_string(),
            });
        }
        Expr::try_from_expression(Expression::Column(Arc::clone(column)))
    }

    pub fn number(&self, key: &str) -> QueryResult<Expr<Number>> {
        self.typed(key)
    }

    pub fn text(&self, key: &str) -> QueryResult<Expr<Text>> {
        self.typed(key)
    }

    pub fn boolean(&self, key: &str) -> QueryResult<Expr<Bool>> {
        self.typed(key)
    }

    /// The derived placeholder for a computed attribute.
    pub fn derived(&self, key: &str) -> QueryResult<Arc<Derived>> {
        match self.attribute(key)? {
            Attribute::Derived(d) => Ok(Arc::clone(d)),
            other => Err(QueryError::ColumnType {
                model: self.name().to_string(),
                key: key.to_string(),
                expected: "derived".to_string(),
                found: other.category().to_string(),
            }),
        }
    }
}
