//! Error types for building an API model

use thiserror::Error;

/// Errors raised while assembling the intermediate representation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Type {0} is declared more than once")]
    DuplicateType(String),

    #[error("Property {property} is declared more than once on {owner}")]
    DuplicateProperty { owner: String, property: String },

    #[error("Method {0} is declared more than once")]
    DuplicateMethod(String),

    #[error("Method {0} declares more than one body parameter")]
    MultipleBodies(String),

    #[error("Unknown type reference: {0}")]
    UnknownType(String),

    #[error("Type {0} is not a composite")]
    NotComposite(String),

    #[error("Enum {0} has no values")]
    EmptyEnum(String),

    #[error("Enum {name} repeats value {value}")]
    DuplicateEnumValue { name: String, value: String },

    #[error("Invalid intrinsic type name: {0}")]
    InvalidIntrinsic(String),
}
