use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::descriptor::TableDescriptor;
use crate::error::DdlError;
use crate::model::FieldType;
use crate::transpiler::sql::mssql::MsSqlDialect;
use crate::transpiler::sql::postgres::PostgresDialect;

/// Entry of a dialect's type-mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlType {
    pub name: &'static str,
    /// Takes a length suffix, e.g. `nvarchar(50)`.
    pub variable_length: bool,
}

impl SqlType {
    pub const fn fixed(name: &'static str) -> Self {
        Self {
            name,
            variable_length: false,
        }
    }

    pub const fn variable(name: &'static str) -> Self {
        Self {
            name,
            variable_length: true,
        }
    }

    /// Type name with its length suffix: the explicit length when given,
    /// otherwise the dialect's spelling for "maximum" (if it has one).
    pub fn sized(&self, max_length: Option<u32>, max_spelling: Option<&str>) -> String {
        if !self.variable_length {
            return self.name.to_string();
        }
        match (max_length, max_spelling) {
            (Some(len), _) => format!("{}({})", self.name, len),
            (None, Some(max)) => format!("{}({})", self.name, max),
            (None, None) => self.name.to_string(),
        }
    }
}

/// What a target database contributes to rendering.
///
/// The rendering algorithm itself is dialect independent (see
/// [`crate::transpiler::render`]); a dialect only supplies type mapping,
/// autoincrement syntax, constraint naming and a few statement shapes.
pub trait SqlDialect: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Schema used when a table or sequence declares none.
    fn default_schema(&self) -> &'static str;

    /// Type-mapping table keyed by [`FieldType::lookup_key`].
    fn type_table(&self) -> &'static [(FieldType, SqlType)];

    fn map_type(&self, key: &FieldType) -> Option<SqlType> {
        self.type_table()
            .iter()
            .find(|(ty, _)| ty == key)
            .map(|(_, sql_type)| *sql_type)
    }

    /// Length spelling for variable-length types without an explicit length.
    fn max_length_spelling(&self) -> Option<&'static str> {
        None
    }

    /// Type that replaces the mapping for autoincrement columns.
    fn auto_increment_type(&self, _key: &FieldType) -> Option<&'static str> {
        None
    }

    /// Column modifier appended after the type of autoincrement columns.
    fn auto_increment_modifier(&self) -> Option<&'static str> {
        None
    }

    fn primary_key_name(&self, table: &str) -> String;

    fn foreign_key_name(
        &self,
        table: &str,
        column: &str,
        ref_table: &str,
        ref_column: &str,
    ) -> String;

    fn unique_name(&self, table: &str, column: &str) -> String;

    fn index_name(&self, table: &str, column: &str) -> String;

    /// Statement assigning a default; `literal` is already quoted.
    fn default_value_sql(&self, table: &TableDescriptor, column: &str, literal: &str) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT {};",
            table.qualified(),
            column,
            literal
        )
    }

    /// Column definition of a computed column.
    fn computed_column_sql(&self, column: &str, sql_type: &str, expression: &str) -> String {
        format!(
            "{} {} GENERATED ALWAYS AS ({}) STORED",
            column, sql_type, expression
        )
    }

    /// Whether `CREATE TABLE IF NOT EXISTS` is valid syntax.
    fn inline_if_not_exists(&self) -> bool {
        true
    }

    /// Text placed before a table's block.
    fn before_create_table(&self, _table: &TableDescriptor, _if_not_exists: bool) -> Option<String> {
        None
    }

    /// Text placed after a table's block.
    fn after_create_table(&self, _table: &TableDescriptor, _if_not_exists: bool) -> Option<String> {
        None
    }
}

/// Built-in dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dialect {
    #[default]
    #[serde(rename = "mssql", alias = "sqlserver")]
    MsSql,
    #[serde(rename = "postgres", alias = "postgresql")]
    Postgres,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::MsSql, Dialect::Postgres];

    pub fn generator(&self) -> Arc<dyn SqlDialect> {
        match self {
            Dialect::MsSql => Arc::new(MsSqlDialect),
            Dialect::Postgres => Arc::new(PostgresDialect),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::MsSql => write!(f, "mssql"),
            Dialect::Postgres => write!(f, "postgres"),
        }
    }
}

impl FromStr for Dialect {
    type Err = DdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mssql" | "sqlserver" => Ok(Dialect::MsSql),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            other => Err(DdlError::Config(format!(
                "unknown dialect '{}', expected mssql or postgres",
                other
            ))),
        }
    }
}
