//! Transpiler test modules.
//!
//! - `mssql`: SQL Server type mapping, naming and statement shapes
//! - `postgres`: PostgreSQL type mapping, naming and statement shapes
//! - `engine`: dialect-independent rendering (queue order, errors, hooks)

mod mssql;
mod postgres;

use crate::descriptor::ColumnDescriptor;
use crate::error::DdlResult;
use crate::model::{FieldType, Member, Model};
use crate::resolver::MetadataResolver;
use crate::transpiler::Dialect;
use crate::transpiler::ddl::build_column;

/// Column line of a single member rendered under `dialect`.
fn column_sql(dialect: Dialect, member: Member) -> DdlResult<String> {
    let model = Model::named("T").member(member);
    let resolver = MetadataResolver::new();
    let column = ColumnDescriptor::from_member(&model, &model.members()[0], &resolver);
    build_column(dialect.generator().as_ref(), &column)
}

/// Column line of an unannotated member of the given type.
fn type_sql(dialect: Dialect, field_type: FieldType) -> DdlResult<String> {
    column_sql(dialect, Member::new("c", field_type))
}
