//! Declarative schema files.
//!
//! A TOML file declares models (the same values an [`Entity`] describes)
//! and, optionally, an ordered script of operations over them:
//!
//! ```toml
//! dialect = "postgres"
//!
//! [enums]
//! Status = "i16"
//!
//! [[model]]
//! name = "User"
//! table = "users"
//!
//!   [[model.field]]
//!   name = "id"
//!   type = "i32"
//!   key = true
//!   auto_increment = true
//!   required = true
//!
//!   [[model.field]]
//!   name = "status"
//!   type = "Option<Status>"
//!   default = 1
//!
//! [[script]]
//! op = "create_table"
//! model = "User"
//! if_not_exists = true
//! ```
//!
//! Without a script every model's table is created in declaration order.
//!
//! [`Entity`]: crate::model::Entity

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::builder::SqlBuilder;
use crate::descriptor::{SequenceDescriptor, SequenceName};
use crate::error::{DdlError, DdlResult};
use crate::model::{Member, Model};
use crate::parser::{parse_enum_repr, parse_field_type, EnumTable};
use crate::transpiler::Dialect;

/// A parsed schema file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    /// Dialect the file is written for, if it names one.
    #[serde(default)]
    pub dialect: Option<Dialect>,
    /// Enum name to underlying integer type.
    #[serde(default)]
    pub enums: HashMap<String, String>,
    #[serde(default, rename = "model")]
    pub models: Vec<ModelDef>,
    #[serde(default)]
    pub script: Vec<ScriptOp>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDef {
    pub name: String,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub key: bool,
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub not_mapped: bool,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub index: Option<IndexKind>,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub string_length: Option<u32>,
    /// Any scalar; stringified before it reaches the model.
    #[serde(default)]
    pub default: Option<toml::Value>,
    #[serde(default)]
    pub computed: Option<String>,
    #[serde(default)]
    pub foreign_key: Option<ForeignKeyDef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    Plain,
    Unique,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForeignKeyDef {
    pub model: String,
    pub field: String,
}

/// One scripted operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum ScriptOp {
    CreateSchema {
        name: String,
    },
    DropSchema {
        name: String,
    },
    CreateTable {
        model: String,
        #[serde(default)]
        if_not_exists: bool,
    },
    DropTable {
        model: String,
        #[serde(default)]
        if_exists: bool,
    },
    TruncateTable {
        model: String,
    },
    CreateSequence {
        name: String,
        #[serde(default)]
        schema: Option<String>,
        #[serde(default)]
        db_type: Option<String>,
        #[serde(default)]
        start: Option<i64>,
        #[serde(default)]
        increment_by: Option<i64>,
        #[serde(default)]
        min_value: Option<i64>,
        #[serde(default)]
        max_value: Option<i64>,
        #[serde(default)]
        cycle: Option<bool>,
    },
    DropSequence {
        name: String,
        #[serde(default)]
        schema: Option<String>,
    },
    Sql {
        text: String,
    },
}

impl SchemaFile {
    pub fn from_toml(text: &str) -> DdlResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> DdlResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Parse the `[enums]` table.
    pub fn enum_table(&self) -> DdlResult<EnumTable> {
        self.enums
            .iter()
            .map(|(name, repr)| Ok((name.clone(), parse_enum_repr(repr)?)))
            .collect()
    }

    /// Build every declared model, in declaration order.
    pub fn models(&self) -> DdlResult<Vec<Model>> {
        let enums = self.enum_table()?;
        let mut seen = HashSet::new();
        self.models
            .iter()
            .map(|def| {
                if !seen.insert(def.name.as_str()) {
                    return Err(DdlError::Schema(format!(
                        "model '{}' is declared twice",
                        def.name
                    )));
                }
                def.to_model(&enums)
            })
            .collect()
    }

    /// Queue the file's script (or one create-table per model) on `builder`.
    ///
    /// Models are registered with the builder's resolver so that foreign keys
    /// between them resolve by name.
    pub fn apply(&self, builder: SqlBuilder) -> DdlResult<SqlBuilder> {
        let models: HashMap<String, Arc<Model>> = self
            .models()?
            .into_iter()
            .map(|model| -> DdlResult<(String, Arc<Model>)> {
                let model = builder.resolver().claim(Arc::new(model))?;
                Ok((model.ident().to_string(), model))
            })
            .collect::<DdlResult<_>>()?;
        debug!(
            models = models.len(),
            operations = self.script.len(),
            "loaded schema file"
        );

        if self.script.is_empty() {
            return Ok(self.models.iter().fold(builder, |builder, def| {
                match models.get(&def.name) {
                    Some(model) => builder.create_table_model(model.clone(), false),
                    None => builder,
                }
            }));
        }

        self.script
            .iter()
            .try_fold(builder, |builder, op| op.apply(builder, &models))
    }
}

impl ScriptOp {
    fn apply(
        &self,
        builder: SqlBuilder,
        models: &HashMap<String, Arc<Model>>,
    ) -> DdlResult<SqlBuilder> {
        let lookup = |name: &str| {
            models
                .get(name)
                .cloned()
                .ok_or_else(|| DdlError::Schema(format!("unknown model '{}' in script", name)))
        };

        let builder = match self {
            ScriptOp::CreateSchema { name } => builder.create_schema(name),
            ScriptOp::DropSchema { name } => builder.drop_schema(name),
            ScriptOp::CreateTable {
                model,
                if_not_exists,
            } => builder.create_table_model(lookup(model.as_str())?, *if_not_exists),
            ScriptOp::DropTable { model, if_exists } => {
                builder.drop_table_model(lookup(model.as_str())?, *if_exists)
            }
            ScriptOp::TruncateTable { model } => builder.truncate_table_model(lookup(model.as_str())?),
            ScriptOp::CreateSequence {
                name,
                schema,
                db_type,
                start,
                increment_by,
                min_value,
                max_value,
                cycle,
            } => {
                let mut sequence_name = SequenceName::new(name);
                if let Some(schema) = schema {
                    sequence_name = sequence_name.in_schema(schema);
                }
                builder.create_sequence(SequenceDescriptor {
                    name: sequence_name,
                    db_type: db_type.clone(),
                    start: *start,
                    increment_by: *increment_by,
                    min_value: *min_value,
                    max_value: *max_value,
                    cycle: *cycle,
                })
            }
            ScriptOp::DropSequence { name, schema } => {
                builder.drop_sequence(name, schema.as_deref())
            }
            ScriptOp::Sql { text } => builder.custom_sql(text),
        };
        Ok(builder)
    }
}

impl ModelDef {
    pub fn to_model(&self, enums: &EnumTable) -> DdlResult<Model> {
        let mut model = Model::named(&self.name);
        match (&self.table, &self.schema) {
            (Some(table), Some(schema)) => model = model.table_in(table, schema),
            (Some(table), None) => model = model.table(table),
            (None, Some(schema)) => model = model.table_in(&self.name, schema),
            (None, None) => {}
        }
        self.fields.iter().try_fold(model, |model, field| {
            Ok(model.member(field.to_member(&self.name, enums)?))
        })
    }
}

impl FieldDef {
    pub fn to_member(&self, model: &str, enums: &EnumTable) -> DdlResult<Member> {
        let mut member = Member::new(&self.name, parse_field_type(&self.field_type, enums)?);

        if let Some(column) = &self.column {
            member = member.column(column);
        }
        if let Some(order) = self.order {
            member = member.order(order);
        }
        if let Some(type_name) = &self.type_name {
            member = member.type_name(type_name);
        }
        if self.key {
            member = member.key();
        }
        if self.auto_increment {
            member = member.auto_increment();
        }
        if self.required {
            member = member.required();
        }
        if self.unique {
            member = member.unique();
        }
        match self.index {
            Some(IndexKind::Plain) => member = member.index(),
            Some(IndexKind::Unique) => member = member.unique_index(),
            None => {}
        }
        if let Some(length) = self.max_length {
            member = member.max_length(length);
        }
        if let Some(length) = self.string_length {
            member = member.string_length(length);
        }
        if let Some(value) = &self.default {
            member = member.default_value(default_literal(value).ok_or_else(|| {
                DdlError::Schema(format!(
                    "default of {}.{} must be a scalar",
                    model, self.name
                ))
            })?);
        }
        if let Some(expression) = &self.computed {
            member = member.computed(expression);
        }
        if let Some(target) = &self.foreign_key {
            member = member.references(&target.model, &target.field);
        }
        if self.not_mapped {
            member = member.not_mapped();
        }
        Ok(member)
    }
}

fn default_literal(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}
