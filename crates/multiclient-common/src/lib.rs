//! Liteserver Multiclient Common Types
//!
//! Shared building blocks for the liteserver multiclient:
//!
//! - [`error`] - The crate-wide error type and `Result` alias
//! - [`config`] - Global config parsing and partitioning into per-liteserver documents
//! - [`request`] - Request routing parameters and their validated form
//!
//! # Example
//!
//! ```
//! use multiclient_common::{RequestParameters, SelectionPolicy};
//!
//! let selection = RequestParameters::single_at(2).validate().unwrap();
//! assert_eq!(selection.policy, SelectionPolicy::Single(Some(2)));
//! ```

pub mod config;
pub mod error;
pub mod request;

pub use config::{split_global_config_by_liteservers, GlobalConfig, LiteServerDescriptor};
pub use error::{MulticlientError, Result};
pub use request::{RequestMode, RequestParameters, Selection, SelectionPolicy};
