use std::collections::{btree_map, BTreeMap, HashSet};

use thiserror::Error;

use crate::ast::{ColumnName, RelationName};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("relation `{0}` has no columns")]
    EmptyRelation(RelationName),
    #[error("relation `{relation}` repeats column `{column}`")]
    DuplicateColumn {
        relation: RelationName,
        column: ColumnName,
    },
    #[error("relation `{0}` is already defined")]
    Redefined(RelationName),
}

/// Relation names mapped to their ordered column names.
///
/// Column names are scoped per relation, so two relations may share them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    relations: BTreeMap<RelationName, Vec<ColumnName>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(
        &mut self,
        relation: impl Into<RelationName>,
        columns: Vec<ColumnName>,
    ) -> Result<(), SchemaError> {
        let relation = relation.into();
        if columns.is_empty() {
            return Err(SchemaError::EmptyRelation(relation));
        }
        let mut seen = HashSet::new();
        if let Some(column) = columns.iter().find(|column| !seen.insert(column.as_str())) {
            return Err(SchemaError::DuplicateColumn {
                column: column.clone(),
                relation,
            });
        }
        match self.relations.entry(relation) {
            btree_map::Entry::Vacant(vacant) => {
                vacant.insert(columns);
                Ok(())
            }
            btree_map::Entry::Occupied(occupied) => {
                Err(SchemaError::Redefined(occupied.key().clone()))
            }
        }
    }

    /// Builder form of [`Schema::define`].
    pub fn with<I, C>(mut self, relation: &str, columns: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnName>,
    {
        self.define(relation, columns.into_iter().map(Into::into).collect())?;
        Ok(self)
    }

    pub fn columns(&self, relation: &str) -> Option<&[ColumnName]> {
        self.relations.get(relation).map(Vec::as_slice)
    }

    pub fn arity(&self, relation: &str) -> Option<usize> {
        self.columns(relation).map(<[ColumnName]>::len)
    }

    /// Relations in name order.
    pub fn relations(&self) -> impl Iterator<Item = (&str, &[ColumnName])> {
        self.relations
            .iter()
            .map(|(name, columns)| (name.as_str(), columns.as_slice()))
    }

    pub(crate) fn len(&self) -> usize {
        self.relations.len()
    }
}
