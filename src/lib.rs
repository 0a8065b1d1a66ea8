//! sdkgen - generates REST client SDK sources for several languages from one
//! API model.
//!
//! The [`ir`] module holds the backend-agnostic model, [`generation`] the
//! shared engine and the [`generation::Backend`] contract, and
//! [`infrastructure`] the concrete backends, model loading and file output.
//! [`application`] ties them together into the generate use case.
#![deny(unsafe_code)]

pub mod application;
pub mod generation;
pub mod infrastructure;
pub mod ir;
