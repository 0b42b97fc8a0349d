use crate::descriptor::TableDescriptor;
use crate::model::FieldType;
use crate::transpiler::dialect::{SqlDialect, SqlType};

/// Microsoft SQL Server.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsSqlDialect;

static TYPES: &[(FieldType, SqlType)] = &[
    (FieldType::I16, SqlType::fixed("smallint")),
    (FieldType::I32, SqlType::fixed("int")),
    (FieldType::I64, SqlType::fixed("bigint")),
    (FieldType::U8, SqlType::fixed("tinyint")),
    (FieldType::Bool, SqlType::fixed("bit")),
    (FieldType::F32, SqlType::fixed("real")),
    (FieldType::F64, SqlType::fixed("float")),
    (FieldType::Decimal, SqlType::fixed("smallmoney")),
    (FieldType::String, SqlType::variable("nvarchar")),
    (FieldType::Chars, SqlType::variable("nvarchar")),
    (FieldType::Bytes, SqlType::variable("varbinary")),
    (FieldType::Uuid, SqlType::fixed("uniqueidentifier")),
    (FieldType::DateTime, SqlType::fixed("datetime")),
    (FieldType::Time, SqlType::fixed("time")),
    (FieldType::Xml, SqlType::fixed("xml")),
];

impl SqlDialect for MsSqlDialect {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn default_schema(&self) -> &'static str {
        "dbo"
    }

    fn type_table(&self) -> &'static [(FieldType, SqlType)] {
        TYPES
    }

    fn max_length_spelling(&self) -> Option<&'static str> {
        Some("max")
    }

    fn auto_increment_modifier(&self) -> Option<&'static str> {
        Some("IDENTITY(1,1)")
    }

    fn primary_key_name(&self, table: &str) -> String {
        format!("PK_{}", table)
    }

    fn foreign_key_name(
        &self,
        table: &str,
        column: &str,
        ref_table: &str,
        ref_column: &str,
    ) -> String {
        format!("FK_{}{}_TO_{}{}", table, column, ref_table, ref_column)
    }

    fn unique_name(&self, table: &str, column: &str) -> String {
        format!("UC_{}{}", table, column)
    }

    fn index_name(&self, table: &str, column: &str) -> String {
        format!("INX_{}{}", table, column)
    }

    fn default_value_sql(&self, table: &TableDescriptor, column: &str, literal: &str) -> String {
        format!(
            "ALTER TABLE {} ADD DEFAULT {} FOR {};",
            table.qualified(),
            literal,
            column
        )
    }

    fn computed_column_sql(&self, column: &str, _sql_type: &str, expression: &str) -> String {
        format!("{} AS ({}) PERSISTED", column, expression)
    }

    // T-SQL has no CREATE TABLE IF NOT EXISTS; the block is guarded instead.
    fn inline_if_not_exists(&self) -> bool {
        false
    }

    fn before_create_table(&self, table: &TableDescriptor, if_not_exists: bool) -> Option<String> {
        if_not_exists.then(|| {
            format!(
                "IF OBJECT_ID(N'{}', N'U') IS NULL\nBEGIN",
                table.qualified()
            )
        })
    }

    fn after_create_table(&self, _table: &TableDescriptor, if_not_exists: bool) -> Option<String> {
        if_not_exists.then(|| "END;".to_string())
    }
}
