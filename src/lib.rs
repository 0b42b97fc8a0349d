//! # ddlkit: declare a schema once, get DDL for MS-SQL or PostgreSQL
//!
//! Models describe tables through annotated members; a [`SqlBuilder`]
//! queues schema objects and renders them as ready-to-run DDL text for the
//! selected dialect. Nothing here opens a connection.
//!
//! ## Quick Example
//!
//! ```
//! use ddlkit::prelude::*;
//!
//! struct Item;
//!
//! impl Entity for Item {
//!     fn model() -> Model {
//!         Model::of::<Self>()
//!             .member(Member::of::<i32>("id").key().auto_increment().required())
//!             .member(Member::of::<Option<String>>("name"))
//!     }
//! }
//!
//! let sql = ddlkit::sql_builder().create_table::<Item>(false).build().unwrap();
//! assert_eq!(
//!     sql,
//!     "CREATE TABLE dbo.Item (\n    id int IDENTITY(1,1) NOT NULL,\n    name nvarchar(max) NULL\n);\n\
//!      ALTER TABLE dbo.Item ADD CONSTRAINT PK_Item PRIMARY KEY (id);\n"
//! );
//! ```
//!
//! ## Layers
//!
//! | Module        | Role                                           |
//! |---------------|------------------------------------------------|
//! | `model`       | annotation contract (`Entity`, `Member`)       |
//! | `resolver`    | cached table and column name resolution        |
//! | `descriptor`  | queued objects, column extraction and ordering |
//! | `transpiler`  | rendering engine and the two dialects          |
//! | `builder`     | fluent queue                                   |
//! | `schema`      | TOML schema files                              |

pub mod builder;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod model;
pub mod parser;
pub mod resolver;
pub mod schema;
pub mod transpiler;

pub mod prelude {
    pub use crate::builder::SqlBuilder;
    pub use crate::descriptor::{ColumnDescriptor, SequenceDescriptor, TableDescriptor};
    pub use crate::error::*;
    pub use crate::model::{ColumnType, Entity, FieldType, Member, Model};
    pub use crate::resolver::MetadataResolver;
    pub use crate::schema::SchemaFile;
    pub use crate::transpiler::{Dialect, SqlDialect, SqlType};
}

pub use builder::SqlBuilder;

/// A fresh builder targeting MS-SQL.
///
/// # Example
///
/// ```
/// let sql = ddlkit::sql_builder()
///     .use_postgres()
///     .create_schema("app")
///     .build()
///     .unwrap();
/// assert_eq!(sql, "CREATE SCHEMA IF NOT EXISTS app;\n");
/// ```
pub fn sql_builder() -> SqlBuilder {
    SqlBuilder::new()
}
