//! Metadata resolution.
//!
//! Table and column names are a pure function of a model's static
//! annotations, so results are cached per identity and never invalidated.
//! One identity stands for one definition: [`MetadataResolver::claim`]
//! rejects a second, different model under a name already in use.
//! The caches live on an explicit [`MetadataResolver`] value shared through
//! an `Arc`; there is no process-wide state.

use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

use crate::error::{DdlError, DdlResult};
use crate::model::{Entity, ForeignKeyRef, Member, Model, ModelId, ModelRef};

/// Resolved table name. `schema` is empty when none was declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableName {
    pub name: String,
    pub schema: String,
}

impl TableName {
    /// The declared schema, or `default` when it is blank.
    pub fn schema_or<'a>(&'a self, default: &'a str) -> &'a str {
        if self.schema.trim().is_empty() {
            default
        } else {
            &self.schema
        }
    }
}

/// Table and column a foreign key points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencedColumn {
    pub table: TableName,
    pub column: String,
}

/// Concurrent caches for table names, column names and known models.
#[derive(Debug, Default)]
pub struct MetadataResolver {
    tables: DashMap<ModelId, TableName>,
    columns: DashMap<(ModelId, String), String>,
    models: DashMap<ModelId, Arc<Model>>,
}

impl MetadataResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table name and schema of a model: the table annotation when present,
    /// otherwise the model identifier and an empty schema.
    pub fn resolve_table(&self, model: &Model) -> TableName {
        if let Some(hit) = self.tables.get(model.id()) {
            return hit.value().clone();
        }

        trace!(model = %model.id(), "table name cache miss");
        let resolved = match model.table_attr() {
            Some(attr) => TableName {
                name: attr.name.clone(),
                schema: attr.schema.clone().unwrap_or_default(),
            },
            None => TableName {
                name: model.ident().to_string(),
                schema: String::new(),
            },
        };

        self.tables
            .entry(model.id().clone())
            .or_insert(resolved)
            .value()
            .clone()
    }

    /// Column name of a member: the column annotation's name unless blank,
    /// otherwise the member identifier.
    pub fn resolve_column(&self, model: &Model, member: &Member) -> String {
        let key = (model.id().clone(), member.ident().to_string());
        if let Some(hit) = self.columns.get(&key) {
            return hit.value().clone();
        }

        trace!(model = %model.id(), member = member.ident(), "column name cache miss");
        let resolved = member
            .column_attr()
            .and_then(|attr| attr.name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(member.ident())
            .to_string();

        self.columns.entry(key).or_insert(resolved).value().clone()
    }

    /// Make a model known under its identity. The first registration wins.
    pub fn register(&self, model: Model) -> Arc<Model> {
        self.models
            .entry(model.id().clone())
            .or_insert_with(|| Arc::new(model))
            .value()
            .clone()
    }

    /// Register `model`, or confirm it is the definition already held under
    /// its identity. A different definition under the same identity is an
    /// error, since the cached names would no longer match it.
    pub fn claim(&self, model: Arc<Model>) -> DdlResult<Arc<Model>> {
        let held = self
            .models
            .entry(model.id().clone())
            .or_insert_with(|| model.clone())
            .value()
            .clone();
        if Arc::ptr_eq(&held, &model) || *held == *model {
            Ok(held)
        } else {
            Err(DdlError::Schema(format!(
                "model '{}' is already defined differently",
                model.id()
            )))
        }
    }

    /// Model of a Rust type, described once and then served from the registry.
    pub fn entity<T: Entity>(&self) -> Arc<Model> {
        if let Some(hit) = self.models.get(&ModelId::of::<T>()) {
            return hit.value().clone();
        }
        self.register(T::model())
    }

    /// Look up the target of a reference, describing it on first use.
    pub fn model(&self, reference: &ModelRef) -> Option<Arc<Model>> {
        if let Some(hit) = self.models.get(reference.id()) {
            return Some(hit.value().clone());
        }
        reference.describe().map(|model| self.register(model))
    }

    /// Resolve the table and column a foreign key points at.
    ///
    /// Targets are not validated: an unknown model or member is used
    /// verbatim by identifier.
    pub fn resolve_reference(&self, foreign_key: &ForeignKeyRef) -> ReferencedColumn {
        match self.model(&foreign_key.model) {
            Some(target) => {
                let column = target
                    .find_member(&foreign_key.member)
                    .map(|member| self.resolve_column(&target, member))
                    .unwrap_or_else(|| foreign_key.member.clone());
                ReferencedColumn {
                    table: self.resolve_table(&target),
                    column,
                }
            }
            None => ReferencedColumn {
                table: TableName {
                    name: foreign_key.model.id().short_name().to_string(),
                    schema: String::new(),
                },
                column: foreign_key.member.clone(),
            },
        }
    }
}
