//! Statement builders, one per descriptor kind.

use crate::descriptor::{
    ColumnDescriptor, SchemaDescriptor, SequenceDescriptor, SequenceName, TableDescriptor,
};
use crate::error::{DdlError, DdlResult};
use crate::resolver::MetadataResolver;

use super::dialect::SqlDialect;

/// SQL type of a column.
///
/// An explicit type name wins, then the dialect's autoincrement type (for
/// non-nullable columns only), then the mapping table (with a length suffix for variable-length types).
pub fn resolve_column_type(
    dialect: &dyn SqlDialect,
    column: &ColumnDescriptor,
) -> DdlResult<String> {
    if let Some(type_name) = column
        .type_name
        .as_deref()
        .filter(|t| !t.trim().is_empty())
    {
        return Ok(type_name.to_string());
    }

    let key = column.field_type.lookup_key();
    if column.auto_increment && !column.field_type.is_nullable() {
        if let Some(serial) = dialect.auto_increment_type(key) {
            return Ok(serial.to_string());
        }
    }

    dialect
        .map_type(key)
        .map(|sql_type| sql_type.sized(column.max_length, dialect.max_length_spelling()))
        .ok_or_else(|| DdlError::unsupported(column.field_type.to_string(), &column.name))
}

/// One line of the column list, without the trailing separator.
pub fn build_column(dialect: &dyn SqlDialect, column: &ColumnDescriptor) -> DdlResult<String> {
    let sql_type = resolve_column_type(dialect, column)?;

    if let Some(expression) = column.computed_expression() {
        return Ok(format!(
            "    {}",
            dialect.computed_column_sql(&column.name, &sql_type, expression)
        ));
    }

    let mut line = format!("    {} {}", column.name, sql_type);
    if column.auto_increment {
        if let Some(modifier) = dialect.auto_increment_modifier() {
            line.push(' ');
            line.push_str(modifier);
        }
    }
    line.push_str(if column.required { " NOT NULL" } else { " NULL" });
    Ok(line)
}

/// Quote a literal for use in a DEFAULT clause.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// CREATE TABLE followed by its constraints and indexes.
pub fn build_create_table(
    dialect: &dyn SqlDialect,
    resolver: &MetadataResolver,
    table: &TableDescriptor,
    if_not_exists: bool,
) -> DdlResult<String> {
    let qualified = table.qualified();

    let columns = table
        .columns
        .iter()
        .map(|column| build_column(dialect, column))
        .collect::<DdlResult<Vec<_>>>()?;

    let mut statements = Vec::new();
    if let Some(before) = dialect.before_create_table(table, if_not_exists) {
        statements.push(before);
    }

    let guard = if if_not_exists && dialect.inline_if_not_exists() {
        "IF NOT EXISTS "
    } else {
        ""
    };
    statements.push(format!(
        "CREATE TABLE {}{} (\n{}\n);",
        guard,
        qualified,
        columns.join(",\n")
    ));

    let keys: Vec<&str> = table
        .columns
        .iter()
        .filter(|c| c.primary_key)
        .map(|c| c.name.as_str())
        .collect();
    if !keys.is_empty() {
        statements.push(format!(
            "ALTER TABLE {} ADD CONSTRAINT {} PRIMARY KEY ({});",
            qualified,
            dialect.primary_key_name(&table.name),
            keys.join(", ")
        ));
    }

    for column in &table.columns {
        let Some(foreign_key) = &column.foreign_key else {
            continue;
        };
        let target = resolver.resolve_reference(foreign_key);
        statements.push(format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}.{} ({});",
            qualified,
            dialect.foreign_key_name(&table.name, &column.name, &target.table.name, &target.column),
            column.name,
            target.table.schema_or(dialect.default_schema()),
            target.table.name,
            target.column
        ));
    }

    for column in table.columns.iter().filter(|c| c.unique) {
        statements.push(format!(
            "ALTER TABLE {} ADD CONSTRAINT {} UNIQUE ({});",
            qualified,
            dialect.unique_name(&table.name, &column.name),
            column.name
        ));
    }

    for column in &table.columns {
        if let Some(value) = column.default_literal() {
            statements.push(dialect.default_value_sql(table, &column.name, &quote_literal(value)));
        }
    }

    for column in table.columns.iter().filter(|c| c.index) {
        statements.push(format!(
            "CREATE {}INDEX {} ON {} ({});",
            if column.index_unique { "UNIQUE " } else { "" },
            dialect.index_name(&table.name, &column.name),
            qualified,
            column.name
        ));
    }

    if let Some(after) = dialect.after_create_table(table, if_not_exists) {
        statements.push(after);
    }

    Ok(statements.join("\n"))
}

pub fn build_drop_table(table: &TableDescriptor, if_exists: bool) -> String {
    format!(
        "DROP TABLE {}{};",
        if if_exists { "IF EXISTS " } else { "" },
        table.qualified()
    )
}

pub fn build_truncate_table(table: &TableDescriptor) -> String {
    format!("TRUNCATE TABLE {};", table.qualified())
}

pub fn build_create_schema(schema: &SchemaDescriptor) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {};", schema.name)
}

pub fn build_drop_schema(schema: &SchemaDescriptor) -> String {
    format!("DROP SCHEMA IF EXISTS {};", schema.name)
}

/// CREATE SEQUENCE with every clause in fixed order. Bounds always render,
/// as `NO MINVALUE`/`NO MAXVALUE` when unset; the cycle clause only when set.
pub fn build_create_sequence(dialect: &dyn SqlDialect, sequence: &SequenceDescriptor) -> String {
    let mut parts = vec![format!(
        "CREATE SEQUENCE {}",
        sequence.name.qualified(dialect.default_schema())
    )];

    if let Some(db_type) = sequence.db_type.as_deref().filter(|t| !t.trim().is_empty()) {
        parts.push(format!("AS {}", db_type));
    }
    if let Some(start) = sequence.start {
        parts.push(format!("START WITH {}", start));
    }
    if let Some(increment) = sequence.increment_by {
        parts.push(format!("INCREMENT BY {}", increment));
    }
    parts.push(match sequence.min_value {
        Some(min) => format!("MINVALUE {}", min),
        None => "NO MINVALUE".to_string(),
    });
    parts.push(match sequence.max_value {
        Some(max) => format!("MAXVALUE {}", max),
        None => "NO MAXVALUE".to_string(),
    });
    match sequence.cycle {
        Some(true) => parts.push("CYCLE".to_string()),
        Some(false) => parts.push("NO CYCLE".to_string()),
        None => {}
    }

    format!("{};", parts.join(" "))
}

pub fn build_drop_sequence(dialect: &dyn SqlDialect, name: &SequenceName) -> String {
    format!(
        "DROP SEQUENCE IF EXISTS {};",
        name.qualified(dialect.default_schema())
    )
}
