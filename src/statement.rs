//! Immutable statement builder.
//!
//! Every builder call returns a new [`Statement`]; the receiver is never
//! modified. Lists that a call does not touch are shared with the new
//! statement rather than copied.

use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use crate::ast::{Expression, TargetItem};
use crate::error::{QueryError, QueryResult};

/// A query specification over one model.
///
/// The four lists are exactly what an external query compiler consumes:
/// targets (empty means all columns), AND-ed filters, group-by expressions
/// and AND-ed having conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    model: Arc<str>,
    target_list: Arc<[TargetItem]>,
    filter_list: Arc<[Expression]>,
    group_by_list: Arc<[Expression]>,
    having_list: Arc<[Expression]>,
}

impl Statement {
    /// Empty statement on `model`.
    pub(crate) fn root(model: &str) -> Self {
        Self {
            model: Arc::from(model),
            target_list: Vec::new().into(),
            filter_list: Vec::new().into(),
            group_by_list: Vec::new().into(),
            having_list: Vec::new().into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn target_list(&self) -> &[TargetItem] {
        &self.target_list
    }

    pub fn filter_list(&self) -> &[Expression] {
        &self.filter_list
    }

    pub fn group_by_list(&self) -> &[Expression] {
        &self.group_by_list
    }

    pub fn having_list(&self) -> &[Expression] {
        &self.having_list
    }

    /// True when no explicit targets were loaded.
    pub fn selects_all(&self) -> bool {
        self.target_list.is_empty()
    }

    /// Replace the target list.
    pub fn load<I, T>(&self, items: I) -> QueryResult<Statement>
    where
        I: IntoIterator<Item = T>,
        T: Into<TargetItem>,
    {
        let items: Vec<TargetItem> = items.into_iter().map(Into::into).collect();
        for item in &items {
            self.check_scalar(item.expression())?;
        }
        trace!(model = %self.model, targets = items.len(), "load");
        Ok(Statement {
            target_list: items.into(),
            ..self.clone()
        })
    }

    /// Append boolean conditions to the filter list.
    pub fn filter<I, E>(&self, exprs: I) -> QueryResult<Statement>
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        let extra = self.predicates("filter", exprs)?;
        trace!(model = %self.model, added = extra.len(), total = self.filter_list.len() + extra.len(), "filter");
        Ok(Statement {
            filter_list: append(&self.filter_list, extra),
            ..self.clone()
        })
    }

    /// Replace the group-by list.
    pub fn group_by<I, E>(&self, exprs: I) -> QueryResult<Statement>
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        let exprs: Vec<Expression> = exprs.into_iter().map(Into::into).collect();
        for expr in &exprs {
            self.check_scalar(expr)?;
        }
        if exprs.is_empty() && !self.having_list.is_empty() {
            return Err(QueryError::HavingWithoutGroupBy);
        }
        trace!(model = %self.model, keys = exprs.len(), "group_by");
        Ok(Statement {
            group_by_list: exprs.into(),
            ..self.clone()
        })
    }

    /// Append boolean conditions to the having list. Requires a prior
    /// non-empty `group_by`.
    pub fn having<I, E>(&self, exprs: I) -> QueryResult<Statement>
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        if self.group_by_list.is_empty() {
            return Err(QueryError::HavingWithoutGroupBy);
        }
        let extra = self.predicates("having", exprs)?;
        trace!(model = %self.model, added = extra.len(), "having");
        Ok(Statement {
            having_list: append(&self.having_list, extra),
            ..self.clone()
        })
    }

    fn predicates<I, E>(&self, op: &'static str, exprs: I) -> QueryResult<Vec<Expression>>
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        exprs
            .into_iter()
            .map(|e| {
                let e = e.into();
                self.check_scalar(&e)?;
                if !e.is_boolean() {
                    return Err(QueryError::mismatch(op, "boolean", e.category()));
                }
                Ok(e)
            })
            .collect()
    }

    /// Entries must be free of derived placeholders and only reference
    /// this statement's model.
    fn check_scalar(&self, expr: &Expression) -> QueryResult<()> {
        if let Some(derived) = expr.find_derived() {
            return Err(derived.error());
        }
        if let Some(foreign) = expr.columns().into_iter().find(|c| c.model != self.model()) {
            return Err(QueryError::ForeignColumn {
                model: self.model.to_string(),
                owner: foreign.model.clone(),
                key: foreign.key.clone(),
            });
        }
        Ok(())
    }
}

fn append<T: Clone>(list: &Arc<[T]>, extra: Vec<T>) -> Arc<[T]> {
    if extra.is_empty() {
        return Arc::clone(list);
    }
    list.iter().cloned().chain(extra).collect()
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.model)?;
        if self.selects_all() {
            write!(f, "\n  load: *")?;
        } else {
            write!(f, "\n  load: {}", join(&self.target_list))?;
        }
        if !self.filter_list.is_empty() {
            let conds: Vec<String> = self.filter_list.iter().map(|e| e.to_string()).collect();
            write!(f, "\n  filter: {}", conds.join(" AND "))?;
        }
        if !self.group_by_list.is_empty() {
            write!(f, "\n  group by: {}", join(&self.group_by_list))?;
        }
        if !self.having_list.is_empty() {
            let conds: Vec<String> = self.having_list.iter().map(|e| e.to_string()).collect();
            write!(f, "\n  having: {}", conds.join(" AND "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{literal, Column, Derived, DeclaredType, PrimitiveType};

    fn col(key: &str, ty: PrimitiveType) -> Expression {
        Column::new("User", key, ty).into()
    }

    #[test]
    fn test_builder_calls_leave_receiver_unchanged() {
        let root = Statement::root("User");
        let next = root.filter([col("id", PrimitiveType::Number).gt(1).unwrap()]).unwrap();
        assert!(root.filter_list().is_empty());
        assert_eq!(next.filter_list().len(), 1);

        let grouped = root.group_by([col("id", PrimitiveType::Number)]).unwrap();
        let with_having = grouped
            .having([col("firstName", PrimitiveType::String).contains("a").unwrap()])
            .unwrap();
        assert!(grouped.having_list().is_empty());
        assert_eq!(with_having.having_list().len(), 1);
        assert_eq!(grouped.group_by_list(), with_having.group_by_list());
    }

    #[test]
    fn test_unchanged_lists_are_shared() {
        let root = Statement::root("User");
        let a = root.load([col("id", PrimitiveType::Number)]).unwrap();
        let b = a.filter([literal(true)]).unwrap();
        assert!(Arc::ptr_eq(&a.target_list, &b.target_list));
        let c = b.filter(Vec::<Expression>::new()).unwrap();
        assert!(Arc::ptr_eq(&b.filter_list, &c.filter_list));
    }

    #[test]
    fn test_filter_rejects_non_boolean() {
        let root = Statement::root("User");
        let err = root.filter([col("age", PrimitiveType::Number)]).unwrap_err();
        assert_eq!(err.to_string(), "Operator 'filter' expects boolean operands, found number");
    }

    #[test]
    fn test_derived_never_enters_a_list() {
        let root = Statement::root("User");
        let major: Expression =
            Arc::new(Derived::new("User", "isMajor", DeclaredType::Primitive(PrimitiveType::Boolean))).into();
        assert!(matches!(root.load([major.clone()]), Err(QueryError::DerivedAttribute { .. })));
        assert!(matches!(root.filter([major.clone()]), Err(QueryError::DerivedAttribute { .. })));
        assert!(matches!(root.group_by([major]), Err(QueryError::DerivedAttribute { .. })));
    }

    #[test]
    fn test_foreign_column_rejected() {
        let root = Statement::root("User");
        let post_id: Expression = Column::new("Post", "id", PrimitiveType::Number).into();
        let err = root.group_by([post_id]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Column 'Post.id' cannot be used in a statement on model 'User'"
        );
    }

    #[test]
    fn test_having_requires_group_by() {
        let root = Statement::root("User");
        let cond = col("firstName", PrimitiveType::String).contains("a").unwrap();
        assert!(matches!(root.having([cond.clone()]), Err(QueryError::HavingWithoutGroupBy)));

        let grouped = root.group_by([col("id", PrimitiveType::Number)]).unwrap();
        let with_having = grouped.having([cond]).unwrap();
        assert_eq!(with_having.having_list().len(), 1);

        // clearing the group-by would orphan the having list
        assert!(matches!(
            with_having.group_by(Vec::<Expression>::new()),
            Err(QueryError::HavingWithoutGroupBy)
        ));
        assert!(grouped.group_by(Vec::<Expression>::new()).is_ok());
    }

    #[test]
    fn test_display() {
        let id = col("id", PrimitiveType::Number);
        let stmt = Statement::root("User")
            .filter([id.gt(1).unwrap()])
            .unwrap()
            .group_by([id])
            .unwrap();
        assert_eq!(stmt.to_string(), "User\n  load: *\n  filter: (id > 1)\n  group by: id");
    }
}
