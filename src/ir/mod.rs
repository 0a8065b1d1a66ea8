//! Intermediate representation of an API
//!
//! Backend-agnostic types, methods and parameters. A model is built once,
//! through [`ModelBuilder`] or a [`ModelDocument`], and is read-only for
//! every generation run that uses it.

pub mod document;
pub mod enums;
pub mod errors;
pub mod method;
pub mod model;
pub mod types;

pub use document::*;
pub use enums::*;
pub use errors::*;
pub use method::*;
pub use model::*;
pub use types::*;
