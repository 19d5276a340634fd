//! Pluggable key-value persistence for Vignette.
//!
//! The only durable state in the system is the credential record, stored as
//! a single serialized blob under one well-known key. This crate provides
//! the storage interface and two backends: a filesystem store for real use
//! and an in-memory store for tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod file;
mod memory;
mod store;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::KeyValueStore;
