//! # formbind-core
//!
//! Core types shared by every formbind crate. This crate has no HTTP or
//! binding logic of its own.
//!
//! ## Modules
//!
//! - [`error`] - Binding and conversion error types
//! - [`utils`] - Utility types (`MultiValueDict`)
//! - [`settings`] - Binder configuration
//! - [`settings_loader`] - Loading configuration from TOML, JSON and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use error::{BindError, BindResult, ConversionError};
pub use settings::BinderSettings;
