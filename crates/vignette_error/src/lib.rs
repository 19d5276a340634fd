//! Error types for the Vignette library.
//!
//! This crate provides the foundation error types used throughout the Vignette
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use vignette_error::{VignetteResult, ConfigError};
//!
//! fn plan_pages(pages: usize) -> VignetteResult<usize> {
//!     if pages == 0 {
//!         Err(ConfigError::new("page count must be at least 1"))?
//!     }
//!     Ok(pages)
//! }
//!
//! match plan_pages(0) {
//!     Ok(pages) => println!("Planning {} pages", pages),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod export;
mod json;
mod keys;
mod provider;
mod storage;

pub use config::ConfigError;
pub use error::{VignetteError, VignetteErrorKind, VignetteResult};
pub use export::{ExportError, ExportErrorKind};
pub use json::JsonError;
pub use keys::{KeyError, KeyErrorKind};
pub use provider::{ProviderError, ProviderErrorKind, RateLimited};
pub use storage::{StorageError, StorageErrorKind};
