//! Credential pools and the rotating-key retry wrapper.
//!
//! Providers that accept multiple interchangeable API keys are driven
//! through a [`KeyPool`]: a rotating cursor hands out the next key on every
//! attempt, and [`retry_with_rotation`] bounds total attempts while backing
//! off on rate-limit failures. The [`KeyStore`] owns the pools and mirrors
//! every mutation to an injected [`vignette_storage::KeyValueStore`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod pool;
mod retry;
mod store;

pub use pool::KeyPool;
pub use retry::{RetryPolicy, retry_with_rotation};
pub use store::{CREDENTIALS_KEY, KeyStore};
