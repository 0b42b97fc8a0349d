//! Object descriptors: one queued request per schema object.

pub mod column;

use serde::Serialize;
use std::sync::Arc;

use crate::model::{Model, ModelId};
use crate::resolver::MetadataResolver;

pub use column::{ColumnDescriptor, extract_columns, sort_columns};

/// One queued DDL request.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectDescriptor {
    CreateTable {
        model: Arc<Model>,
        if_not_exists: bool,
    },
    DropTable {
        model: Arc<Model>,
        if_exists: bool,
    },
    TruncateTable {
        model: Arc<Model>,
    },
    CreateSchema(SchemaDescriptor),
    DropSchema(SchemaDescriptor),
    CreateSequence(SequenceDescriptor),
    DropSequence(SequenceName),
    CustomSql(String),
}

impl ObjectDescriptor {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateTable { .. } => "create_table",
            Self::DropTable { .. } => "drop_table",
            Self::TruncateTable { .. } => "truncate_table",
            Self::CreateSchema(_) => "create_schema",
            Self::DropSchema(_) => "drop_schema",
            Self::CreateSequence(_) => "create_sequence",
            Self::DropSequence(_) => "drop_sequence",
            Self::CustomSql(_) => "custom_sql",
        }
    }

    /// The table model a descriptor operates on, if any.
    pub fn model(&self) -> Option<&Arc<Model>> {
        match self {
            Self::CreateTable { model, .. }
            | Self::DropTable { model, .. }
            | Self::TruncateTable { model } => Some(model),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaDescriptor {
    pub name: String,
}

/// Sequence name with an optional schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceName {
    pub name: String,
    pub schema: Option<String>,
}

impl SequenceName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
        }
    }

    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// `schema.name`, using `default_schema` when no schema is set.
    pub fn qualified(&self, default_schema: &str) -> String {
        let schema = self
            .schema
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(default_schema);
        format!("{}.{}", schema, self.name)
    }
}

/// A sequence to create. Every clause is optional and rendered only when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceDescriptor {
    pub name: SequenceName,
    pub db_type: Option<String>,
    pub start: Option<i64>,
    pub increment_by: Option<i64>,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    pub cycle: Option<bool>,
}

impl SequenceDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: SequenceName::new(name),
            db_type: None,
            start: None,
            increment_by: None,
            min_value: None,
            max_value: None,
            cycle: None,
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.name = self.name.in_schema(schema);
        self
    }

    pub fn db_type(mut self, db_type: impl Into<String>) -> Self {
        self.db_type = Some(db_type.into());
        self
    }

    pub fn start(mut self, start: i64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn increment_by(mut self, increment_by: i64) -> Self {
        self.increment_by = Some(increment_by);
        self
    }

    pub fn min_value(mut self, min_value: i64) -> Self {
        self.min_value = Some(min_value);
        self
    }

    pub fn max_value(mut self, max_value: i64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    pub fn cycle(mut self, cycle: bool) -> Self {
        self.cycle = Some(cycle);
        self
    }
}

/// A table with its name and schema resolved against a dialect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDescriptor {
    pub model: ModelId,
    pub name: String,
    /// Never empty: falls back to the dialect's default schema.
    pub schema: String,
    /// Ordered columns; only filled for table creation.
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    /// Resolve name and schema only.
    pub fn resolve(model: &Model, resolver: &MetadataResolver, default_schema: &str) -> Self {
        let table = resolver.resolve_table(model);
        Self {
            model: model.id().clone(),
            schema: table.schema_or(default_schema).to_string(),
            name: table.name,
            columns: Vec::new(),
        }
    }

    /// Resolve name and schema, then extract and order the columns.
    pub fn with_columns(model: &Model, resolver: &MetadataResolver, default_schema: &str) -> Self {
        Self {
            columns: extract_columns(model, resolver),
            ..Self::resolve(model, resolver, default_schema)
        }
    }

    pub fn qualified(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Member;

    #[test]
    fn test_sequence_name_falls_back_to_default_schema() {
        assert_eq!(SequenceName::new("seq").qualified("dbo"), "dbo.seq");
        assert_eq!(
            SequenceName::new("seq").in_schema("sales").qualified("dbo"),
            "sales.seq"
        );
        assert_eq!(
            SequenceName::new("seq").in_schema(" ").qualified("public"),
            "public.seq"
        );
    }

    #[test]
    fn test_table_schema_is_never_empty() {
        let resolver = MetadataResolver::new();
        let model = Model::named("Item").member(Member::of::<i32>("id"));
        let table = TableDescriptor::resolve(&model, &resolver, "public");
        assert_eq!(table.qualified(), "public.Item");
        assert!(table.columns.is_empty());

        let full = TableDescriptor::with_columns(&model, &resolver, "public");
        assert_eq!(full.columns.len(), 1);
    }
}
