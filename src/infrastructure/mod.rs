//! Infrastructure layer - backends, model loading and file output

pub mod generation;
pub mod model;
pub mod output;

pub use generation::*;
pub use model::*;
pub use output::*;
