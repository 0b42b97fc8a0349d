use crate::model::FieldType;
use crate::transpiler::dialect::{SqlDialect, SqlType};

/// PostgreSQL.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

static TYPES: &[(FieldType, SqlType)] = &[
    (FieldType::I16, SqlType::fixed("smallint")),
    (FieldType::I32, SqlType::fixed("integer")),
    (FieldType::I64, SqlType::fixed("bigint")),
    (FieldType::U8, SqlType::fixed("smallint")),
    (FieldType::Bool, SqlType::fixed("boolean")),
    (FieldType::F32, SqlType::fixed("real")),
    (FieldType::F64, SqlType::fixed("double precision")),
    (FieldType::Decimal, SqlType::fixed("numeric")),
    (FieldType::String, SqlType::variable("varchar")),
    (FieldType::Chars, SqlType::variable("varchar")),
    (FieldType::Bytes, SqlType::fixed("bytea")),
    (FieldType::Uuid, SqlType::fixed("uuid")),
    (FieldType::DateTime, SqlType::fixed("timestamp")),
    (FieldType::Time, SqlType::fixed("time without time zone")),
];

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn default_schema(&self) -> &'static str {
        "public"
    }

    fn type_table(&self) -> &'static [(FieldType, SqlType)] {
        TYPES
    }

    // Autoincrement lives in the type itself.
    fn auto_increment_type(&self, key: &FieldType) -> Option<&'static str> {
        match key {
            FieldType::I32 => Some("SERIAL"),
            FieldType::I64 => Some("BIGSERIAL"),
            _ => None,
        }
    }

    fn primary_key_name(&self, table: &str) -> String {
        format!("{}_pkey", table)
    }

    fn foreign_key_name(
        &self,
        table: &str,
        column: &str,
        ref_table: &str,
        ref_column: &str,
    ) -> String {
        format!("{}{}_to_{}{}_fkey", table, column, ref_table, ref_column)
    }

    fn unique_name(&self, table: &str, column: &str) -> String {
        format!("{}{}_unique", table, column)
    }

    fn index_name(&self, table: &str, column: &str) -> String {
        format!("{}{}_inx", table, column)
    }
}
