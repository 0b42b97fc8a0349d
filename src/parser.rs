//! Field type parser using nom.
//!
//! Parses the Rust-style type spellings used in schema files into a
//! [`FieldType`].
//!
//! ```text
//! i32                        -> I32
//! Option<String>             -> Nullable(String)
//! Vec<u8> / u8[]             -> Bytes
//! Vec<char> / char[]         -> Chars
//! chrono::DateTime<Utc>      -> DateTime
//! Status (declared enum)     -> Enum { Status, repr }
//! Point (anything else)      -> Custom("Point")
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, opt, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};
use std::collections::BTreeMap;

use crate::error::{DdlError, DdlResult};
use crate::model::FieldType;

/// Declared enums: name to underlying integer type.
pub type EnumTable = BTreeMap<String, FieldType>;

/// Parse a complete field type.
pub fn parse_field_type(input: &str, enums: &EnumTable) -> DdlResult<FieldType> {
    let input = input.trim();

    match parse_type(input, enums) {
        Ok(("", field_type)) => Ok(field_type),
        Ok((remaining, _)) => Err(DdlError::parse(
            input.len() - remaining.len(),
            format!("Unexpected trailing content: '{}'", remaining),
        )),
        Err(e) => Err(DdlError::parse(0, format!("Parse failed: {:?}", e))),
    }
}

/// Parse the underlying type of an enum; only integer types qualify.
pub fn parse_enum_repr(input: &str) -> DdlResult<FieldType> {
    let repr = parse_field_type(input, &EnumTable::new())?;
    match repr {
        FieldType::I16 | FieldType::I32 | FieldType::I64 | FieldType::U8 => Ok(repr),
        other => Err(DdlError::parse(
            0,
            format!("'{}' is not an integer type", other),
        )),
    }
}

fn parse_type<'a>(input: &'a str, enums: &EnumTable) -> IResult<&'a str, FieldType> {
    let (input, _) = multispace0(input)?;
    let (input, _) = opt(char('&'))(input)?;
    alt((parse_array, |i| parse_path_type(i, enums)))(input)
}

/// `char[]`, `u8[]`, `byte[]`.
fn parse_array(input: &str) -> IResult<&str, FieldType> {
    let (input, element) = alt((
        map(tag("char"), |_| FieldType::Chars),
        map(tag("u8"), |_| FieldType::Bytes),
        map(tag("byte"), |_| FieldType::Bytes),
    ))(input)?;
    let (input, _) = tuple((multispace0, char('['), multispace0, char(']')))(input)?;
    Ok((input, element))
}

/// A possibly qualified path with at most one generic argument.
fn parse_path_type<'a>(input: &'a str, enums: &EnumTable) -> IResult<&'a str, FieldType> {
    let (input, path) = parse_path(input)?;
    let name = path.rsplit("::").next().unwrap_or(path);
    let (input, argument) = opt(delimited(
        preceded(multispace0, char('<')),
        |i| parse_type(i, enums),
        preceded(multispace0, char('>')),
    ))(input)?;

    let field_type = match (name, argument) {
        ("Option", Some(inner)) => FieldType::nullable(inner),
        ("Vec", Some(FieldType::U8)) => FieldType::Bytes,
        ("Vec", Some(FieldType::Custom(element))) if element == "char" => FieldType::Chars,
        ("DateTime", Some(_)) => FieldType::DateTime,
        (name, None) => named_type(name, enums),
        (name, Some(inner)) => FieldType::Custom(format!("{}<{}>", name, inner)),
    };
    Ok((input, field_type))
}

fn parse_path(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        parse_identifier,
        many0(pair(tag("::"), parse_identifier)),
    ))(input)
}

fn parse_identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

fn named_type(name: &str, enums: &EnumTable) -> FieldType {
    match name {
        "i16" => FieldType::I16,
        "i32" => FieldType::I32,
        "i64" => FieldType::I64,
        "u8" => FieldType::U8,
        "bool" => FieldType::Bool,
        "f32" => FieldType::F32,
        "f64" => FieldType::F64,
        "Decimal" => FieldType::Decimal,
        "String" | "str" => FieldType::String,
        "Uuid" => FieldType::Uuid,
        "NaiveDateTime" | "DateTime" => FieldType::DateTime,
        "NaiveTime" => FieldType::Time,
        "Xml" => FieldType::Xml,
        other => match enums.get(other) {
            Some(repr) => FieldType::enumeration(other, repr.clone()),
            None => FieldType::Custom(other.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> FieldType {
        parse_field_type(input, &EnumTable::new()).unwrap()
    }

    #[test]
    fn test_primitives() {
        assert_eq!(parse("i32"), FieldType::I32);
        assert_eq!(parse("  bool "), FieldType::Bool);
        assert_eq!(parse("&str"), FieldType::String);
        assert_eq!(parse("Xml"), FieldType::Xml);
    }

    #[test]
    fn test_qualified_paths() {
        assert_eq!(parse("uuid::Uuid"), FieldType::Uuid);
        assert_eq!(parse("rust_decimal::Decimal"), FieldType::Decimal);
        assert_eq!(parse("chrono::NaiveTime"), FieldType::Time);
        assert_eq!(parse("chrono::DateTime<chrono::Utc>"), FieldType::DateTime);
    }

    #[test]
    fn test_byte_and_char_sequences() {
        assert_eq!(parse("Vec<u8>"), FieldType::Bytes);
        assert_eq!(parse("Vec< char >"), FieldType::Chars);
        assert_eq!(parse("char[]"), FieldType::Chars);
        assert_eq!(parse("u8 []"), FieldType::Bytes);
        assert_eq!(parse("u8"), FieldType::U8);
    }

    #[test]
    fn test_option() {
        assert_eq!(parse("Option<i64>"), FieldType::nullable(FieldType::I64));
        assert_eq!(
            parse("std::option::Option<Vec<u8>>"),
            FieldType::nullable(FieldType::Bytes)
        );
    }

    #[test]
    fn test_enums_and_custom() {
        let mut enums = EnumTable::new();
        enums.insert("Status".to_string(), FieldType::I16);
        assert_eq!(
            parse_field_type("Option<Status>", &enums).unwrap(),
            FieldType::nullable(FieldType::enumeration("Status", FieldType::I16))
        );
        assert_eq!(parse("Point"), FieldType::Custom("Point".to_string()));
        assert_eq!(
            parse("HashMap<String>"),
            FieldType::Custom("HashMap<String>".to_string())
        );
        // Characters on their own are not a column type.
        assert_eq!(parse("char"), FieldType::Custom("char".to_string()));
    }

    #[test]
    fn test_enum_repr_must_be_integer() {
        assert_eq!(parse_enum_repr("u8").unwrap(), FieldType::U8);
        assert!(parse_enum_repr("String").is_err());
    }

    #[test]
    fn test_errors() {
        assert!(parse_field_type("", &EnumTable::new()).is_err());
        let err = parse_field_type("Option<i32", &EnumTable::new()).unwrap_err();
        assert!(matches!(err, DdlError::Parse { position: 6, .. }));
        assert!(parse_field_type("i32 i64", &EnumTable::new()).is_err());
    }
}
