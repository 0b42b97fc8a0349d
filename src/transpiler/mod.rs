//! DDL renderer.
//!
//! Turns a queue of [`ObjectDescriptor`]s into SQL text for one dialect.
//! Dispatch is dialect independent; everything that differs between
//! databases goes through [`SqlDialect`].

pub mod ddl;
pub mod dialect;
pub mod sql;

#[cfg(test)]
mod tests;

pub use dialect::{Dialect, SqlDialect, SqlType};
pub use sql::mssql::MsSqlDialect;
pub use sql::postgres::PostgresDialect;

use tracing::debug;

use crate::descriptor::{ObjectDescriptor, TableDescriptor};
use crate::error::DdlResult;
use crate::resolver::MetadataResolver;

/// Render every descriptor in queue order.
///
/// Either the whole script is returned or the first error; partial text is
/// never produced.
pub fn render(
    dialect: &dyn SqlDialect,
    resolver: &MetadataResolver,
    objects: &[ObjectDescriptor],
) -> DdlResult<String> {
    let mut sql = String::new();
    for object in objects {
        debug!(kind = object.kind(), dialect = dialect.name(), "rendering descriptor");
        sql.push_str(&render_object(dialect, resolver, object)?);
        sql.push('\n');
    }
    Ok(sql)
}

/// Render a single descriptor, without the trailing newline.
///
/// Table models are claimed on the resolver first, so two different models
/// sharing an identity fail instead of mixing their cached names.
pub fn render_object(
    dialect: &dyn SqlDialect,
    resolver: &MetadataResolver,
    object: &ObjectDescriptor,
) -> DdlResult<String> {
    if let Some(model) = object.model() {
        resolver.claim(model.clone())?;
    }

    let default_schema = dialect.default_schema();
    let sql = match object {
        ObjectDescriptor::CreateTable {
            model,
            if_not_exists,
        } => {
            let table = TableDescriptor::with_columns(model, resolver, default_schema);
            ddl::build_create_table(dialect, resolver, &table, *if_not_exists)?
        }
        ObjectDescriptor::DropTable { model, if_exists } => {
            let table = TableDescriptor::resolve(model, resolver, default_schema);
            ddl::build_drop_table(&table, *if_exists)
        }
        ObjectDescriptor::TruncateTable { model } => {
            let table = TableDescriptor::resolve(model, resolver, default_schema);
            ddl::build_truncate_table(&table)
        }
        ObjectDescriptor::CreateSchema(schema) => ddl::build_create_schema(schema),
        ObjectDescriptor::DropSchema(schema) => ddl::build_drop_schema(schema),
        ObjectDescriptor::CreateSequence(sequence) => ddl::build_create_sequence(dialect, sequence),
        ObjectDescriptor::DropSequence(name) => ddl::build_drop_sequence(dialect, name),
        ObjectDescriptor::CustomSql(text) => text.clone(),
    };
    Ok(sql)
}
