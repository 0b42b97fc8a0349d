use ddlkit::prelude::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;

struct User;

impl Entity for User {
    fn model() -> Model {
        Model::of::<Self>()
            .table("users")
            .member(Member::of::<i32>("id").key().auto_increment().required().order(0))
            .member(Member::of::<String>("name").column("user_name").order(1))
            .member(Member::of::<String>("email").max_length(50).unique())
            .member(Member::of::<i32>("age").default_value(0))
            .member(Member::of::<i32>("role_id").foreign_key::<Role>("id"))
            .member(Member::new("role", FieldType::Custom("Role".into())).not_mapped())
    }
}

struct Role;

impl Entity for Role {
    fn model() -> Model {
        Model::of::<Self>()
            .table("roles")
            .member(Member::of::<i32>("id").key().auto_increment().required())
            .member(Member::of::<Option<String>>("name").column("role_name"))
    }
}

#[test]
fn test_create_tables_mssql() {
    let sql = SqlBuilder::new()
        .create_table::<Role>(false)
        .create_table::<User>(false)
        .use_mssql()
        .build()
        .unwrap();

    // Unordered columns follow the ordered ones in reverse declaration order.
    let expected = "\
CREATE TABLE dbo.roles (
    id int IDENTITY(1,1) NOT NULL,
    role_name nvarchar(max) NULL
);
ALTER TABLE dbo.roles ADD CONSTRAINT PK_roles PRIMARY KEY (id);
CREATE TABLE dbo.users (
    id int IDENTITY(1,1) NOT NULL,
    user_name nvarchar(max) NULL,
    role_id int NULL,
    age int NULL,
    email nvarchar(50) NULL
);
ALTER TABLE dbo.users ADD CONSTRAINT PK_users PRIMARY KEY (id);
ALTER TABLE dbo.users ADD CONSTRAINT FK_usersrole_id_TO_rolesid FOREIGN KEY (role_id) REFERENCES dbo.roles (id);
ALTER TABLE dbo.users ADD CONSTRAINT UC_usersemail UNIQUE (email);
ALTER TABLE dbo.users ADD DEFAULT '0' FOR age;
";
    assert_eq!(sql, expected);
}

#[test]
fn test_create_tables_postgres() {
    let sql = SqlBuilder::new()
        .create_table::<Role>(false)
        .create_table::<User>(false)
        .use_postgres()
        .build()
        .unwrap();

    let expected = "\
CREATE TABLE public.roles (
    id SERIAL NOT NULL,
    role_name varchar NULL
);
ALTER TABLE public.roles ADD CONSTRAINT roles_pkey PRIMARY KEY (id);
CREATE TABLE public.users (
    id SERIAL NOT NULL,
    user_name varchar NULL,
    role_id integer NULL,
    age integer NULL,
    email varchar(50) NULL
);
ALTER TABLE public.users ADD CONSTRAINT users_pkey PRIMARY KEY (id);
ALTER TABLE public.users ADD CONSTRAINT usersrole_id_to_rolesid_fkey FOREIGN KEY (role_id) REFERENCES public.roles (id);
ALTER TABLE public.users ADD CONSTRAINT usersemail_unique UNIQUE (email);
ALTER TABLE public.users ALTER COLUMN age SET DEFAULT '0';
";
    assert_eq!(sql, expected);
}

#[test]
fn test_drop_table() {
    let sql = SqlBuilder::new().drop_table::<User>(true).build().unwrap();
    assert_eq!(sql, "DROP TABLE IF EXISTS dbo.users;\n");
}

#[test]
fn test_sequence_round_trip() {
    let sql = SqlBuilder::new()
        .create_sequence(
            SequenceDescriptor::new("my_sequence")
                .schema("my_schema")
                .start(10)
                .min_value(0)
                .max_value(100)
                .increment_by(5)
                .cycle(true),
        )
        .drop_sequence("my_sequence", Some("my_schema"))
        .use_mssql()
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "CREATE SEQUENCE my_schema.my_sequence START WITH 10 INCREMENT BY 5 MINVALUE 0 MAXVALUE 100 CYCLE;\n\
         DROP SEQUENCE IF EXISTS my_schema.my_sequence;\n"
    );
}

#[test]
fn test_switching_dialect_rerenders_queue() {
    let builder = SqlBuilder::new().truncate_table::<Role>();
    assert_eq!(builder.build().unwrap(), "TRUNCATE TABLE dbo.roles;\n");
    let builder = builder.use_postgres();
    assert_eq!(builder.build().unwrap(), "TRUNCATE TABLE public.roles;\n");
}

#[test]
fn test_shared_resolver_across_threads() {
    let resolver = Arc::new(MetadataResolver::new());
    let scripts: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let resolver = resolver.clone();
                scope.spawn(move || {
                    SqlBuilder::with_resolver(resolver)
                        .create_table::<User>(false)
                        .build()
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(scripts.windows(2).all(|pair| pair[0] == pair[1]));
    assert!(scripts[0].contains("REFERENCES dbo.roles (id)"));
}
