//! Fluent script builder.
//!
//! ```
//! use ddlkit::prelude::*;
//!
//! let sql = SqlBuilder::new()
//!     .use_postgres()
//!     .create_schema("sales")
//!     .create_sequence(SequenceDescriptor::new("order_no").schema("sales").start(1000))
//!     .build()
//!     .unwrap();
//!
//! assert!(sql.starts_with("CREATE SCHEMA IF NOT EXISTS sales;\n"));
//! ```

use std::sync::Arc;
use tracing::debug;

use crate::descriptor::{
    ObjectDescriptor, SchemaDescriptor, SequenceDescriptor, SequenceName, TableDescriptor,
};
use crate::error::DdlResult;
use crate::model::{Entity, Model};
use crate::resolver::MetadataResolver;
use crate::transpiler::{self, Dialect, SqlDialect};

/// Accumulates schema objects and renders them for one dialect.
///
/// Every operation consumes the builder and returns it, so a script is
/// built by a single owner. [`SqlBuilder::build`] renders without clearing.
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    dialect: Arc<dyn SqlDialect>,
    objects: Vec<ObjectDescriptor>,
    resolver: Arc<MetadataResolver>,
}

impl Default for SqlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlBuilder {
    /// Empty builder targeting MS-SQL with its own resolver.
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(MetadataResolver::new()))
    }

    /// Empty builder sharing an existing resolver (and its caches).
    pub fn with_resolver(resolver: Arc<MetadataResolver>) -> Self {
        Self {
            dialect: Dialect::default().generator(),
            objects: Vec::new(),
            resolver,
        }
    }

    pub fn resolver(&self) -> &Arc<MetadataResolver> {
        &self.resolver
    }

    pub fn dialect(&self) -> &dyn SqlDialect {
        self.dialect.as_ref()
    }

    /// Queued descriptors in enqueue order.
    pub fn objects(&self) -> &[ObjectDescriptor] {
        &self.objects
    }

    fn push(mut self, object: ObjectDescriptor) -> Self {
        self.objects.push(object);
        self
    }

    // ========== Schemas ==========

    pub fn create_schema(self, name: impl Into<String>) -> Self {
        self.push(ObjectDescriptor::CreateSchema(SchemaDescriptor {
            name: name.into(),
        }))
    }

    pub fn drop_schema(self, name: impl Into<String>) -> Self {
        self.push(ObjectDescriptor::DropSchema(SchemaDescriptor {
            name: name.into(),
        }))
    }

    // ========== Tables ==========

    pub fn create_table<T: Entity>(self, if_not_exists: bool) -> Self {
        let model = self.resolver.entity::<T>();
        self.create_table_model(model, if_not_exists)
    }

    pub fn drop_table<T: Entity>(self, if_exists: bool) -> Self {
        let model = self.resolver.entity::<T>();
        self.drop_table_model(model, if_exists)
    }

    pub fn truncate_table<T: Entity>(self) -> Self {
        let model = self.resolver.entity::<T>();
        self.truncate_table_model(model)
    }

    /// Create a table for a model declared at runtime.
    pub fn create_table_model(self, model: Arc<Model>, if_not_exists: bool) -> Self {
        self.push(ObjectDescriptor::CreateTable {
            model,
            if_not_exists,
        })
    }

    pub fn drop_table_model(self, model: Arc<Model>, if_exists: bool) -> Self {
        self.push(ObjectDescriptor::DropTable { model, if_exists })
    }

    pub fn truncate_table_model(self, model: Arc<Model>) -> Self {
        self.push(ObjectDescriptor::TruncateTable { model })
    }

    // ========== Sequences ==========

    pub fn create_sequence(self, sequence: SequenceDescriptor) -> Self {
        self.push(ObjectDescriptor::CreateSequence(sequence))
    }

    pub fn drop_sequence(self, name: impl Into<String>, schema: Option<&str>) -> Self {
        let mut sequence = SequenceName::new(name);
        if let Some(schema) = schema {
            sequence = sequence.in_schema(schema);
        }
        self.push(ObjectDescriptor::DropSequence(sequence))
    }

    /// Raw SQL, emitted unchanged.
    pub fn custom_sql(self, sql: impl Into<String>) -> Self {
        self.push(ObjectDescriptor::CustomSql(sql.into()))
    }

    // ========== Dialects ==========

    pub fn use_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect.generator();
        self
    }

    /// Install a dialect implemented outside this crate.
    pub fn use_custom_dialect(mut self, dialect: impl SqlDialect + 'static) -> Self {
        self.dialect = Arc::new(dialect);
        self
    }

    pub fn use_postgres(self) -> Self {
        self.use_dialect(Dialect::Postgres)
    }

    pub fn use_mssql(self) -> Self {
        self.use_dialect(Dialect::MsSql)
    }

    /// Empty the queue. The dialect is kept.
    pub fn clear(mut self) -> Self {
        self.objects.clear();
        self
    }

    /// Render the queue. The queue is left as is.
    pub fn build(&self) -> DdlResult<String> {
        debug!(
            objects = self.objects.len(),
            dialect = self.dialect.name(),
            "building script"
        );
        transpiler::render(self.dialect.as_ref(), &self.resolver, &self.objects)
    }

    /// Resolved tables (with ordered columns) of every queued create-table.
    pub fn describe_tables(&self) -> Vec<TableDescriptor> {
        let default_schema = self.dialect.default_schema();
        self.objects
            .iter()
            .filter_map(|object| match object {
                ObjectDescriptor::CreateTable { model, .. } => Some(TableDescriptor::with_columns(
                    model,
                    &self.resolver,
                    default_schema,
                )),
                _ => None,
            })
            .collect()
    }
}
