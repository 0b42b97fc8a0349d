//! PostgreSQL tests.

use pretty_assertions::assert_eq;

use super::{column_sql, type_sql};
use crate::builder::SqlBuilder;
use crate::descriptor::SequenceDescriptor;
use crate::error::DdlError;
use crate::model::{Entity, FieldType, Member, Model};
use crate::transpiler::Dialect;

struct Account;

impl Entity for Account {
    fn model() -> Model {
        Model::of::<Self>()
            .table_in("accounts", "billing")
            .member(Member::of::<i64>("id").key().auto_increment().required())
            .member(
                Member::of::<String>("code")
                    .column("account_code")
                    .string_length(12)
                    .unique_index(),
            )
            .member(Member::of::<String>("note").default_value("it's new"))
            .member(Member::of::<i32>("owner_id").references("Owner", "id"))
    }
}

#[test]
fn test_type_mapping() {
    let cases = [
        (FieldType::I16, "smallint"),
        (FieldType::I32, "integer"),
        (FieldType::I64, "bigint"),
        (FieldType::U8, "smallint"),
        (FieldType::Bool, "boolean"),
        (FieldType::F32, "real"),
        (FieldType::F64, "double precision"),
        (FieldType::Decimal, "numeric"),
        (FieldType::String, "varchar"),
        (FieldType::Chars, "varchar"),
        (FieldType::Bytes, "bytea"),
        (FieldType::Uuid, "uuid"),
        (FieldType::DateTime, "timestamp"),
        (FieldType::Time, "time without time zone"),
    ];
    for (field_type, expected) in cases {
        assert_eq!(
            type_sql(Dialect::Postgres, field_type).unwrap(),
            format!("    c {} NULL", expected)
        );
    }
}

#[test]
fn test_xml_is_unsupported() {
    let err = column_sql(Dialect::Postgres, Member::new("doc", FieldType::Xml)).unwrap_err();
    assert!(matches!(
        &err,
        DdlError::UnsupportedType { type_name, column } if type_name == "Xml" && column == "doc"
    ));
    assert_eq!(err.to_string(), "Database does not support type 'Xml' [doc]");
}

#[test]
fn test_length_suffix() {
    assert_eq!(
        column_sql(Dialect::Postgres, Member::of::<String>("c").max_length(50)).unwrap(),
        "    c varchar(50) NULL"
    );
    assert_eq!(
        column_sql(Dialect::Postgres, Member::of::<Vec<u8>>("c").max_length(50)).unwrap(),
        "    c bytea NULL"
    );
}

#[test]
fn test_serial_types() {
    assert_eq!(
        column_sql(Dialect::Postgres, Member::of::<i32>("id").auto_increment().required()).unwrap(),
        "    id SERIAL NOT NULL"
    );
    assert_eq!(
        column_sql(Dialect::Postgres, Member::of::<i64>("id").auto_increment()).unwrap(),
        "    id BIGSERIAL NULL"
    );
    // No serial form: the plain mapping without any modifier.
    assert_eq!(
        column_sql(Dialect::Postgres, Member::of::<i16>("id").auto_increment()).unwrap(),
        "    id smallint NULL"
    );
    // Nullable integers keep their plain mapping.
    assert_eq!(
        column_sql(Dialect::Postgres, Member::of::<Option<i32>>("id").auto_increment()).unwrap(),
        "    id integer NULL"
    );
    assert_eq!(
        column_sql(Dialect::Postgres, Member::of::<Option<i64>>("id").auto_increment()).unwrap(),
        "    id bigint NULL"
    );
}

#[test]
fn test_computed_column() {
    assert_eq!(
        column_sql(Dialect::Postgres, Member::of::<f64>("total").computed("price * qty")).unwrap(),
        "    total double precision GENERATED ALWAYS AS (price * qty) STORED"
    );
}

#[test]
fn test_create_table() {
    let sql = SqlBuilder::new()
        .use_postgres()
        .create_table::<Account>(true)
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE IF NOT EXISTS billing.accounts (\n\
         \x20   id BIGSERIAL NOT NULL,\n\
         \x20   account_code varchar(12) NULL,\n\
         \x20   note varchar NULL,\n\
         \x20   owner_id integer NULL\n\
         );\n\
         ALTER TABLE billing.accounts ADD CONSTRAINT accounts_pkey PRIMARY KEY (id);\n\
         ALTER TABLE billing.accounts ADD CONSTRAINT accountsowner_id_to_Ownerid_fkey FOREIGN KEY (owner_id) REFERENCES public.Owner (id);\n\
         ALTER TABLE billing.accounts ALTER COLUMN note SET DEFAULT 'it''s new';\n\
         CREATE UNIQUE INDEX accountsaccount_code_inx ON billing.accounts (account_code);\n"
    );
}

#[test]
fn test_drop_table() {
    let sql = SqlBuilder::new()
        .use_postgres()
        .drop_table::<Account>(true)
        .truncate_table::<Account>()
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "DROP TABLE IF EXISTS billing.accounts;\nTRUNCATE TABLE billing.accounts;\n"
    );
}

#[test]
fn test_sequence_scenario() {
    let sql = SqlBuilder::new()
        .use_postgres()
        .create_sequence(
            SequenceDescriptor::new("s")
                .start(10)
                .min_value(0)
                .max_value(100)
                .increment_by(5)
                .cycle(true),
        )
        .drop_sequence("s", None)
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "CREATE SEQUENCE public.s START WITH 10 INCREMENT BY 5 MINVALUE 0 MAXVALUE 100 CYCLE;\n\
         DROP SEQUENCE IF EXISTS public.s;\n"
    );
}
