//! Type shapes of the intermediate representation
//!
//! Types live in an arena owned by [`crate::ir::ApiModel`] and refer to each
//! other through [`TypeId`] handles, so composites may form cycles without
//! shared mutable ownership.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ir::ModelError;

/// Handle of a type node inside a model (or generation session) arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) usize);

impl TypeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Canonical primitive names every backend must map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intrinsic {
    String,
    Integer,
    Int64,
    Float,
    Double,
    Boolean,
    Byte,
    Date,
    DateTime,
    Uri,
    Email,
    Uuid,
    Password,
    Object,
    Void,
    Any,
}

impl Intrinsic {
    pub const ALL: [Intrinsic; 16] = [
        Intrinsic::String,
        Intrinsic::Integer,
        Intrinsic::Int64,
        Intrinsic::Float,
        Intrinsic::Double,
        Intrinsic::Boolean,
        Intrinsic::Byte,
        Intrinsic::Date,
        Intrinsic::DateTime,
        Intrinsic::Uri,
        Intrinsic::Email,
        Intrinsic::Uuid,
        Intrinsic::Password,
        Intrinsic::Object,
        Intrinsic::Void,
        Intrinsic::Any,
    ];

    /// Canonical name used in model documents and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Intrinsic::String => "string",
            Intrinsic::Integer => "integer",
            Intrinsic::Int64 => "int64",
            Intrinsic::Float => "float",
            Intrinsic::Double => "double",
            Intrinsic::Boolean => "boolean",
            Intrinsic::Byte => "byte",
            Intrinsic::Date => "date",
            Intrinsic::DateTime => "datetime",
            Intrinsic::Uri => "uri",
            Intrinsic::Email => "email",
            Intrinsic::Uuid => "uuid",
            Intrinsic::Password => "password",
            Intrinsic::Object => "object",
            Intrinsic::Void => "void",
            Intrinsic::Any => "any",
        }
    }

    /// Values of this primitive are written as quoted literals
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            Intrinsic::String
                | Intrinsic::Date
                | Intrinsic::DateTime
                | Intrinsic::Uri
                | Intrinsic::Email
                | Intrinsic::Uuid
                | Intrinsic::Password
        )
    }

    /// Path parameters of this primitive must be encoded before interpolation
    pub fn needs_path_encoding(&self) -> bool {
        matches!(
            self,
            Intrinsic::String | Intrinsic::Date | Intrinsic::DateTime
        )
    }
}

impl fmt::Display for Intrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Intrinsic {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" | "str" => Ok(Intrinsic::String),
            "integer" | "int" | "int32" => Ok(Intrinsic::Integer),
            "int64" | "long" => Ok(Intrinsic::Int64),
            "float" => Ok(Intrinsic::Float),
            "double" | "number" => Ok(Intrinsic::Double),
            "boolean" | "bool" => Ok(Intrinsic::Boolean),
            "byte" | "binary" => Ok(Intrinsic::Byte),
            "date" => Ok(Intrinsic::Date),
            "datetime" | "date-time" => Ok(Intrinsic::DateTime),
            "uri" | "url" => Ok(Intrinsic::Uri),
            "email" => Ok(Intrinsic::Email),
            "uuid" => Ok(Intrinsic::Uuid),
            "password" => Ok(Intrinsic::Password),
            "object" => Ok(Intrinsic::Object),
            "void" => Ok(Intrinsic::Void),
            "any" => Ok(Intrinsic::Any),
            _ => Err(ModelError::InvalidIntrinsic(s.to_string())),
        }
    }
}

/// A single enumerated value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    Int(i64),
    Str(String),
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumValue::Int(v) => write!(f, "{v}"),
            EnumValue::Str(v) => f.write_str(v),
        }
    }
}

impl From<&str> for EnumValue {
    fn from(value: &str) -> Self {
        EnumValue::Str(value.to_string())
    }
}

impl From<i64> for EnumValue {
    fn from(value: i64) -> Self {
        EnumValue::Int(value)
    }
}

/// Named enumeration with ordered distinct values
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub values: Vec<EnumValue>,
    /// Name of the composite (or method) that first declared the values
    pub owner: String,
    pub description: String,
}

impl EnumType {
    /// Scalar the values are carried in
    pub fn base(&self) -> Intrinsic {
        if self.values.iter().all(|v| matches!(v, EnumValue::Int(_))) {
            Intrinsic::Integer
        } else {
            Intrinsic::String
        }
    }
}

static SIMPLE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));
static NAME_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-_ .]+").expect("valid separator regex"));

/// Property of a composite
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    /// Original JSON key when it is not usable as an identifier
    pub json_name: Option<String>,
    pub ty: TypeId,
    pub required: bool,
    pub read_only: bool,
    pub nullable: bool,
    pub deprecated: bool,
    pub description: String,
}

impl Property {
    pub fn new(name: &str, ty: TypeId) -> Self {
        let (name, json_name) = if is_simple_name(name) {
            (name.to_string(), None)
        } else {
            (safe_name(name), Some(name.to_string()))
        };
        Self {
            name,
            json_name,
            ty,
            required: false,
            read_only: false,
            nullable: false,
            deprecated: false,
            description: String::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// The wire key differs from the emitted identifier
    pub fn has_special_needs(&self) -> bool {
        self.json_name.is_some()
    }

    pub fn wire_name(&self) -> &str {
        self.json_name.as_deref().unwrap_or(&self.name)
    }
}

/// Usable as an identifier in every target language
pub fn is_simple_name(name: &str) -> bool {
    SIMPLE_NAME.is_match(name)
}

/// Turns a JSON key like `content-type` or `foo bar` into `content_type`
pub fn safe_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' || c == ' ' { c } else { '_' })
        .collect();
    let joined = NAME_SEPARATORS.replace_all(&cleaned, "_").to_string();
    match joined.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("_{joined}"),
        _ => joined,
    }
}

/// Where a composite came from
#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    /// Declared by the API model
    Declared,
    /// Writeable variant of another composite
    Writeable { source: TypeId },
    /// Parameter bundle of a method
    Request { method: String },
}

/// Named record with ordered properties
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    pub name: String,
    pub description: String,
    pub properties: IndexMap<String, Property>,
    pub origin: Origin,
}

impl Composite {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            properties: IndexMap::new(),
            origin: Origin::Declared,
        }
    }

    pub fn required_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values().filter(|p| p.required)
    }

    pub fn optional_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values().filter(|p| !p.required)
    }
}

/// An IR node
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Intrinsic(Intrinsic),
    Array(TypeId),
    Hash(TypeId),
    DelimArray(TypeId),
    Enum(EnumType),
    Composite(Composite),
}

impl Type {
    /// Declared name, if the node is a named declaration
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Type::Enum(e) => Some(&e.name),
            Type::Composite(c) => Some(&c.name),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Type::Intrinsic(_) => "intrinsic",
            Type::Array(_) => "array",
            Type::Hash(_) => "hash",
            Type::DelimArray(_) => "delimited array",
            Type::Enum(_) => "enum",
            Type::Composite(_) => "composite",
        }
    }

    /// Handles this node refers to directly
    pub fn children(&self) -> Vec<TypeId> {
        match self {
            Type::Array(e) | Type::Hash(e) | Type::DelimArray(e) => vec![*e],
            Type::Composite(c) => c.properties.values().map(|p| p.ty).collect(),
            Type::Intrinsic(_) | Type::Enum(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsic_round_trips_through_name() {
        for intrinsic in Intrinsic::ALL {
            assert_eq!(Intrinsic::from_str(intrinsic.name()).unwrap(), intrinsic);
        }
        assert_eq!(Intrinsic::from_str("date-time").unwrap(), Intrinsic::DateTime);
        assert!(matches!(
            Intrinsic::from_str("decimal"),
            Err(ModelError::InvalidIntrinsic(_))
        ));
    }

    #[test]
    fn test_path_encoding_rule() {
        assert!(Intrinsic::String.needs_path_encoding());
        assert!(Intrinsic::DateTime.needs_path_encoding());
        assert!(!Intrinsic::Integer.needs_path_encoding());
        assert!(!Intrinsic::Uri.needs_path_encoding());
    }

    #[test]
    fn test_property_special_needs() {
        let plain = Property::new("user_id", TypeId(0));
        assert!(!plain.has_special_needs());
        assert_eq!(plain.wire_name(), "user_id");

        let dashed = Property::new("content-type", TypeId(0));
        assert!(dashed.has_special_needs());
        assert_eq!(dashed.name, "content_type");
        assert_eq!(dashed.wire_name(), "content-type");

        let numeric = Property::new("2fa enabled", TypeId(0));
        assert_eq!(numeric.name, "_2fa_enabled");
    }

    #[test]
    fn test_enum_base_scalar() {
        let ints = EnumType {
            name: "Level".into(),
            values: vec![EnumValue::Int(1), EnumValue::Int(2)],
            owner: "Thing".into(),
            description: String::new(),
        };
        assert_eq!(ints.base(), Intrinsic::Integer);

        let mixed = EnumType {
            values: vec![EnumValue::Int(1), "two".into()],
            ..ints
        };
        assert_eq!(mixed.base(), Intrinsic::String);
    }

    #[test]
    fn test_composite_property_partitions_keep_order() {
        let mut composite = Composite::new("User", "");
        for (name, required) in [("b", false), ("a", true), ("c", true)] {
            let mut prop = Property::new(name, TypeId(0));
            prop.required = required;
            composite.properties.insert(name.to_string(), prop);
        }
        let required: Vec<_> = composite.required_properties().map(|p| p.name.as_str()).collect();
        let optional: Vec<_> = composite.optional_properties().map(|p| p.name.as_str()).collect();
        assert_eq!(required, vec!["a", "c"]);
        assert_eq!(optional, vec!["b"]);
    }
}
