//! SQL Server tests.

use pretty_assertions::assert_eq;

use super::{column_sql, type_sql};
use crate::builder::SqlBuilder;
use crate::descriptor::SequenceDescriptor;
use crate::model::{Entity, FieldType, Member, Model};
use crate::transpiler::Dialect;

struct Item;

impl Entity for Item {
    fn model() -> Model {
        Model::of::<Self>()
            .member(Member::of::<i32>("id").key().auto_increment().required())
            .member(Member::of::<Option<String>>("name"))
    }
}

struct Role;

impl Entity for Role {
    fn model() -> Model {
        Model::of::<Self>()
            .table_in("roles", "auth")
            .member(Member::of::<i32>("id").key().required())
    }
}

struct User;

impl Entity for User {
    fn model() -> Model {
        Model::of::<Self>()
            .table("users")
            .member(Member::of::<i32>("id").order(0).key().auto_increment().required())
            .member(Member::of::<String>("email").order(1).max_length(120).required().unique())
            .member(Member::of::<i32>("role_id").order(2).foreign_key::<Role>("id").index())
            .member(Member::of::<bool>("active").order(3).default_value(true).required())
    }
}

#[test]
fn test_type_mapping() {
    let cases = [
        (FieldType::I16, "smallint"),
        (FieldType::I32, "int"),
        (FieldType::I64, "bigint"),
        (FieldType::U8, "tinyint"),
        (FieldType::Bool, "bit"),
        (FieldType::F32, "real"),
        (FieldType::F64, "float"),
        (FieldType::Decimal, "smallmoney"),
        (FieldType::String, "nvarchar(max)"),
        (FieldType::Chars, "nvarchar(max)"),
        (FieldType::Bytes, "varbinary(max)"),
        (FieldType::Uuid, "uniqueidentifier"),
        (FieldType::DateTime, "datetime"),
        (FieldType::Time, "time"),
        (FieldType::Xml, "xml"),
    ];
    for (field_type, expected) in cases {
        assert_eq!(
            type_sql(Dialect::MsSql, field_type).unwrap(),
            format!("    c {} NULL", expected)
        );
    }
}

#[test]
fn test_length_suffix() {
    assert_eq!(
        column_sql(Dialect::MsSql, Member::of::<String>("c").max_length(50)).unwrap(),
        "    c nvarchar(50) NULL"
    );
    assert_eq!(
        column_sql(Dialect::MsSql, Member::of::<Vec<u8>>("c").string_length(16)).unwrap(),
        "    c varbinary(16) NULL"
    );
    // Fixed-length types ignore the length.
    assert_eq!(
        column_sql(Dialect::MsSql, Member::of::<i32>("c").max_length(50)).unwrap(),
        "    c int NULL"
    );
}

#[test]
fn test_enum_and_nullable_map_through_their_repr() {
    let status = FieldType::enumeration("Status", FieldType::U8);
    assert_eq!(
        type_sql(Dialect::MsSql, FieldType::nullable(status)).unwrap(),
        "    c tinyint NULL"
    );
}

#[test]
fn test_type_override_wins() {
    assert_eq!(
        column_sql(
            Dialect::MsSql,
            Member::of::<i32>("c").type_name("numeric(10,2)").auto_increment()
        )
        .unwrap(),
        "    c numeric(10,2) IDENTITY(1,1) NULL"
    );
}

#[test]
fn test_computed_column() {
    assert_eq!(
        column_sql(
            Dialect::MsSql,
            Member::of::<i32>("total").computed("price * qty").required()
        )
        .unwrap(),
        "    total AS (price * qty) PERSISTED"
    );
}

#[test]
fn test_primary_key_scenario() {
    let sql = SqlBuilder::new().create_table::<Item>(false).build().unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE dbo.Item (\n    id int IDENTITY(1,1) NOT NULL,\n    name nvarchar(max) NULL\n);\n\
         ALTER TABLE dbo.Item ADD CONSTRAINT PK_Item PRIMARY KEY (id);\n"
    );
}

#[test]
fn test_constraints_in_fixed_order() {
    let sql = SqlBuilder::new().create_table::<User>(false).build().unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE dbo.users (\n\
         \x20   id int IDENTITY(1,1) NOT NULL,\n\
         \x20   email nvarchar(120) NOT NULL,\n\
         \x20   role_id int NULL,\n\
         \x20   active bit NOT NULL\n\
         );\n\
         ALTER TABLE dbo.users ADD CONSTRAINT PK_users PRIMARY KEY (id);\n\
         ALTER TABLE dbo.users ADD CONSTRAINT FK_usersrole_id_TO_rolesid FOREIGN KEY (role_id) REFERENCES auth.roles (id);\n\
         ALTER TABLE dbo.users ADD CONSTRAINT UC_usersemail UNIQUE (email);\n\
         ALTER TABLE dbo.users ADD DEFAULT 'true' FOR active;\n\
         CREATE INDEX INX_usersrole_id ON dbo.users (role_id);\n"
    );
}

#[test]
fn test_create_table_if_not_exists_is_guarded() {
    let sql = SqlBuilder::new().create_table::<Role>(true).build().unwrap();
    assert_eq!(
        sql,
        "IF OBJECT_ID(N'auth.roles', N'U') IS NULL\nBEGIN\n\
         CREATE TABLE auth.roles (\n    id int NOT NULL\n);\n\
         ALTER TABLE auth.roles ADD CONSTRAINT PK_roles PRIMARY KEY (id);\n\
         END;\n"
    );
}

#[test]
fn test_drop_and_truncate() {
    let sql = SqlBuilder::new()
        .drop_table::<Role>(true)
        .drop_table::<Item>(false)
        .truncate_table::<User>()
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "DROP TABLE IF EXISTS auth.roles;\nDROP TABLE dbo.Item;\nTRUNCATE TABLE dbo.users;\n"
    );
}

#[test]
fn test_sequence_scenario() {
    let sql = SqlBuilder::new()
        .create_sequence(
            SequenceDescriptor::new("s")
                .start(10)
                .min_value(0)
                .max_value(100)
                .increment_by(5)
                .cycle(true),
        )
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "CREATE SEQUENCE dbo.s START WITH 10 INCREMENT BY 5 MINVALUE 0 MAXVALUE 100 CYCLE;\n"
    );
}

#[test]
fn test_sequence_without_bounds() {
    let sql = SqlBuilder::new()
        .create_sequence(SequenceDescriptor::new("s").schema("sales").db_type("bigint"))
        .create_sequence(SequenceDescriptor::new("t").cycle(false))
        .drop_sequence("s", Some("sales"))
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "CREATE SEQUENCE sales.s AS bigint NO MINVALUE NO MAXVALUE;\n\
         CREATE SEQUENCE dbo.t NO MINVALUE NO MAXVALUE NO CYCLE;\n\
         DROP SEQUENCE IF EXISTS sales.s;\n"
    );
}
