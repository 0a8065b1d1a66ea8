//! Model loading implementations

pub mod file_loader;

pub use file_loader::FileModelLoader;
