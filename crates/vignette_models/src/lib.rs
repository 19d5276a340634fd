//! Generation provider clients for Vignette.
//!
//! Three providers cover the spread of external services the generator
//! drives:
//!
//! - [`PollinationsClient`]: keyless, URL-parameterized image synthesis.
//! - [`GeminiClient`]: keyed multimodal generation with streamed
//!   multi-part responses carrying inline base64 image payloads. Also
//!   serves text generation for script rewriting, and rotates through the
//!   primary key pool under rate limits.
//! - [`HuggingFaceClient`]: keyed inference endpoint returning binary
//!   image data, using the single secondary key.
//!
//! Provider choice is an explicit enum resolved once at configuration time
//! ([`ImageProvider::resolve`]), never re-parsed from strings per call.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod driver;
mod gemini;
mod huggingface;
mod pollinations;
mod provider;

pub use driver::{ImageDriver, ScriptDriver};
pub use gemini::GeminiClient;
pub use huggingface::HuggingFaceClient;
pub use pollinations::PollinationsClient;
pub use provider::ImageProvider;
