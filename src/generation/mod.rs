//! Generation domain module - the shared code-generation engine
//!
//! A [`GenerationSession`] carries the mutable state of one run over a
//! read-only [`crate::ir::ApiModel`]. Backends implement [`Backend`]; the
//! shared algorithm in [`BackendExt`] turns methods and types into source
//! text, and [`SdkGenerator`] assembles that text into files.

pub mod args;
pub mod backend;
pub mod calls;
pub mod context;
pub mod derived;
pub mod errors;
pub mod mapper;
pub mod orchestrator;
pub mod rules;
pub mod session;
pub mod types;
pub mod utils;

pub use args::{CallSlots, trailing_elision};
pub use backend::*;
pub use context::*;
pub use errors::*;
pub use mapper::{MappedType, Usage, ValueCoercion};
pub use orchestrator::*;
pub use session::*;
pub use types::*;
