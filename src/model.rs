//! Model declarations.
//!
//! A [`Model`] is the static description of one table-backed type: its
//! identity, an optional table annotation and its members, each carrying the
//! annotations the extractor reads. Rust types describe themselves through
//! [`Entity`]; schema files build the same values at runtime.
//!
//! ```
//! use ddlkit::model::{Entity, Member, Model};
//!
//! struct Role;
//!
//! impl Entity for Role {
//!     fn model() -> Model {
//!         Model::of::<Self>()
//!             .table("roles")
//!             .member(Member::of::<i32>("id").key().auto_increment().required())
//!             .member(Member::of::<Option<String>>("name").column("role_name"))
//!     }
//! }
//!
//! assert_eq!(Role::model().ident(), "Role");
//! ```

use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Semantic type of a member, before any dialect mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    I16,
    I32,
    I64,
    U8,
    Bool,
    F32,
    F64,
    Decimal,
    String,
    Chars,
    Bytes,
    Uuid,
    DateTime,
    Time,
    Xml,
    /// Enumeration stored as its underlying integer type.
    Enum { name: String, repr: Box<FieldType> },
    Nullable(Box<FieldType>),
    /// A type no dialect knows about.
    Custom(String),
}

impl FieldType {
    pub fn nullable(inner: FieldType) -> Self {
        Self::Nullable(Box::new(inner))
    }

    pub fn enumeration(name: impl Into<String>, repr: FieldType) -> Self {
        Self::Enum {
            name: name.into(),
            repr: Box::new(repr),
        }
    }

    /// The key dialect mapping tables are indexed by: nullable wrappers are
    /// stripped and enums are replaced by their underlying representation.
    pub fn lookup_key(&self) -> &FieldType {
        match self {
            Self::Nullable(inner) => inner.lookup_key(),
            Self::Enum { repr, .. } => repr.lookup_key(),
            other => other,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I16 => write!(f, "i16"),
            Self::I32 => write!(f, "i32"),
            Self::I64 => write!(f, "i64"),
            Self::U8 => write!(f, "u8"),
            Self::Bool => write!(f, "bool"),
            Self::F32 => write!(f, "f32"),
            Self::F64 => write!(f, "f64"),
            Self::Decimal => write!(f, "Decimal"),
            Self::String => write!(f, "String"),
            Self::Chars => write!(f, "Vec<char>"),
            Self::Bytes => write!(f, "Vec<u8>"),
            Self::Uuid => write!(f, "Uuid"),
            Self::DateTime => write!(f, "NaiveDateTime"),
            Self::Time => write!(f, "NaiveTime"),
            Self::Xml => write!(f, "Xml"),
            Self::Enum { name, .. } => write!(f, "{}", name),
            Self::Nullable(inner) => write!(f, "Option<{}>", inner),
            Self::Custom(name) => write!(f, "{}", name),
        }
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Static mapping from a Rust type to its [`FieldType`].
pub trait ColumnType {
    fn field_type() -> FieldType;
}

macro_rules! column_types {
    ($($ty:ty => $field:expr),* $(,)?) => {
        $(
            impl ColumnType for $ty {
                fn field_type() -> FieldType {
                    $field
                }
            }
        )*
    };
}

column_types! {
    i16 => FieldType::I16,
    i32 => FieldType::I32,
    i64 => FieldType::I64,
    u8 => FieldType::U8,
    bool => FieldType::Bool,
    f32 => FieldType::F32,
    f64 => FieldType::F64,
    String => FieldType::String,
    Vec<char> => FieldType::Chars,
    Vec<u8> => FieldType::Bytes,
    uuid::Uuid => FieldType::Uuid,
    rust_decimal::Decimal => FieldType::Decimal,
    chrono::NaiveDateTime => FieldType::DateTime,
    chrono::NaiveTime => FieldType::Time,
}

impl ColumnType for &str {
    fn field_type() -> FieldType {
        FieldType::String
    }
}

impl<Tz: chrono::TimeZone> ColumnType for chrono::DateTime<Tz> {
    fn field_type() -> FieldType {
        FieldType::DateTime
    }
}

impl<T: ColumnType> ColumnType for Option<T> {
    fn field_type() -> FieldType {
        FieldType::nullable(T::field_type())
    }
}

/// Identity of a model, used as the resolver cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ModelId(Cow<'static, str>);

impl ModelId {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<T>()))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment without generic arguments.
    pub fn short_name(&self) -> &str {
        let base = self.0.split('<').next().unwrap_or(&self.0);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to another model, resolvable without recursing at declaration
/// time (models may reference each other).
#[derive(Clone)]
pub struct ModelRef {
    id: ModelId,
    describe: Option<fn() -> Model>,
}

impl ModelRef {
    pub fn of<T: Entity>() -> Self {
        Self {
            id: ModelId::of::<T>(),
            describe: Some(T::model),
        }
    }

    /// A reference by identity only; the target must be registered with the
    /// resolver to be looked up.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: ModelId::named(name),
            describe: None,
        }
    }

    pub fn id(&self) -> &ModelId {
        &self.id
    }

    pub fn describe(&self) -> Option<Model> {
        self.describe.map(|describe| describe())
    }
}

impl fmt::Debug for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelRef").field(&self.id).finish()
    }
}

impl PartialEq for ModelRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Serialize for ModelRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id.serialize(serializer)
    }
}

/// Target of a foreign key: a model and one of its members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignKeyRef {
    pub model: ModelRef,
    pub member: String,
}

/// Column name, order and explicit type override of a member.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnAttr {
    pub name: Option<String>,
    pub order: Option<u32>,
    pub type_name: Option<String>,
}

/// One marker attached to a member.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Column(ColumnAttr),
    Key,
    ForeignKey(ForeignKeyRef),
    Index { unique: bool },
    AutoIncrement,
    Required,
    Unique,
    MaxLength(u32),
    StringLength(u32),
    DefaultValue(String),
    Computed(String),
    NotMapped,
}

/// A declared member of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    ident: String,
    field_type: FieldType,
    annotations: Vec<Annotation>,
}

impl Member {
    pub fn new(ident: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            ident: ident.into(),
            field_type,
            annotations: Vec::new(),
        }
    }

    pub fn of<T: ColumnType>(ident: impl Into<String>) -> Self {
        Self::new(ident, T::field_type())
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// First annotation for which `select` returns a value.
    pub fn find<'a, T>(&'a self, select: impl FnMut(&'a Annotation) -> Option<T>) -> Option<T> {
        self.annotations.iter().find_map(select)
    }

    pub fn has(&self, predicate: impl Fn(&Annotation) -> bool) -> bool {
        self.annotations.iter().any(predicate)
    }

    pub fn column_attr(&self) -> Option<&ColumnAttr> {
        self.find(|a| match a {
            Annotation::Column(attr) => Some(attr),
            _ => None,
        })
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    fn edit_column(mut self, edit: impl FnOnce(&mut ColumnAttr)) -> Self {
        let pos = self
            .annotations
            .iter()
            .position(|a| matches!(a, Annotation::Column(_)));
        match pos {
            Some(pos) => {
                if let Annotation::Column(attr) = &mut self.annotations[pos] {
                    edit(attr);
                }
            }
            None => {
                let mut attr = ColumnAttr::default();
                edit(&mut attr);
                self.annotations.push(Annotation::Column(attr));
            }
        }
        self
    }

    pub fn column(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.edit_column(|attr| attr.name = Some(name))
    }

    pub fn order(self, order: u32) -> Self {
        self.edit_column(|attr| attr.order = Some(order))
    }

    pub fn type_name(self, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        self.edit_column(|attr| attr.type_name = Some(type_name))
    }

    pub fn key(self) -> Self {
        self.annotate(Annotation::Key)
    }

    pub fn auto_increment(self) -> Self {
        self.annotate(Annotation::AutoIncrement)
    }

    pub fn required(self) -> Self {
        self.annotate(Annotation::Required)
    }

    pub fn unique(self) -> Self {
        self.annotate(Annotation::Unique)
    }

    pub fn index(self) -> Self {
        self.annotate(Annotation::Index { unique: false })
    }

    pub fn unique_index(self) -> Self {
        self.annotate(Annotation::Index { unique: true })
    }

    pub fn foreign_key<T: Entity>(self, member: impl Into<String>) -> Self {
        self.annotate(Annotation::ForeignKey(ForeignKeyRef {
            model: ModelRef::of::<T>(),
            member: member.into(),
        }))
    }

    /// Foreign key to a model known only by name.
    pub fn references(self, model: impl Into<String>, member: impl Into<String>) -> Self {
        self.annotate(Annotation::ForeignKey(ForeignKeyRef {
            model: ModelRef::named(model),
            member: member.into(),
        }))
    }

    pub fn max_length(self, length: u32) -> Self {
        self.annotate(Annotation::MaxLength(length))
    }

    pub fn string_length(self, length: u32) -> Self {
        self.annotate(Annotation::StringLength(length))
    }

    pub fn default_value(self, value: impl fmt::Display) -> Self {
        self.annotate(Annotation::DefaultValue(value.to_string()))
    }

    pub fn computed(self, expression: impl Into<String>) -> Self {
        self.annotate(Annotation::Computed(expression.into()))
    }

    pub fn not_mapped(self) -> Self {
        self.annotate(Annotation::NotMapped)
    }
}

/// Table annotation of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct TableAttr {
    pub name: String,
    pub schema: Option<String>,
}

/// Static description of a table-backed type.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    id: ModelId,
    ident: String,
    table: Option<TableAttr>,
    members: Vec<Member>,
}

impl Model {
    /// Model of a Rust type; the identifier is the type's own name.
    pub fn of<T: ?Sized + 'static>() -> Self {
        let id = ModelId::of::<T>();
        let ident = id.short_name().to_string();
        Self {
            id,
            ident,
            table: None,
            members: Vec::new(),
        }
    }

    /// Model identified by name only.
    pub fn named(ident: impl Into<String>) -> Self {
        let ident = ident.into();
        Self {
            id: ModelId::named(ident.clone()),
            ident,
            table: None,
            members: Vec::new(),
        }
    }

    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.table = Some(TableAttr {
            name: name.into(),
            schema: None,
        });
        self
    }

    pub fn table_in(mut self, name: impl Into<String>, schema: impl Into<String>) -> Self {
        self.table = Some(TableAttr {
            name: name.into(),
            schema: Some(schema.into()),
        });
        self
    }

    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn id(&self) -> &ModelId {
        &self.id
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn table_attr(&self) -> Option<&TableAttr> {
        self.table.as_ref()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn find_member(&self, ident: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.ident == ident)
    }
}

/// A Rust type that maps to a table.
pub trait Entity: 'static {
    fn model() -> Model;
}
