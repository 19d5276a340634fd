//! Screenplay-to-panel parsing and prompt assembly.
//!
//! This crate converts free-text scripts following loose screenplay
//! conventions into ordered panel sequences, and assembles the per-panel
//! prompts that drive image generation.
//!
//! Parsing is best-effort: there is no strict grammar, and unrecognized
//! input degrades to a single panel rather than failing.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod parser;
mod prompt;

pub use parser::parse_script;
pub use prompt::build_prompt;
