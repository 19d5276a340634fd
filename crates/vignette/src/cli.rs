//! Command-line interface for Vignette.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vignette_core::ComicStyle;
use vignette_models::ImageProvider;

/// Vignette CLI - screenplay to comic book generator.
#[derive(Parser)]
#[command(name = "vignette")]
#[command(about = "Generate comic books from screenplays with AI image providers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Show debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Output artifact formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Multi-page PDF with captions
    Pdf,
    /// ZIP of panel images plus caption sidecars
    Zip,
    /// Comic book archive (images only)
    Cbz,
    /// EPUB package, one page per panel
    Epub,
}

impl ExportFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Zip => "zip",
            ExportFormat::Cbz => "cbz",
            ExportFormat::Epub => "epub",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a comic from a screenplay file
    Generate {
        /// Path to the screenplay (or free-text story) file
        script: PathBuf,

        /// Comic title; defaults to the script file stem
        #[arg(short, long)]
        title: Option<String>,

        /// Number of pages
        #[arg(long, default_value = "1")]
        pages: usize,

        /// Panels per page
        #[arg(long, default_value = "4")]
        panels: usize,

        /// Visual style
        #[arg(short, long, default_value = "western-color")]
        style: ComicStyle,

        /// Image provider
        #[arg(short, long, default_value = "pollinations")]
        provider: ImageProvider,

        /// Output formats (repeatable)
        #[arg(short, long, value_enum, default_values_t = [ExportFormat::Pdf])]
        format: Vec<ExportFormat>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Delay between provider calls, in milliseconds
        #[arg(long, default_value = "1000")]
        pacing_ms: u64,

        /// Rewrite the input into screenplay form with Gemini before parsing
        #[arg(long)]
        adapt: bool,

        /// Leave dialogue captions out of PDF and ZIP output
        #[arg(long)]
        no_captions: bool,
    },

    /// Rewrite a free-text story into screenplay form and print it
    Adapt {
        /// Path to the story file
        story: PathBuf,
    },

    /// Manage stored API credentials
    Keys {
        /// Credential operation
        #[command(subcommand)]
        command: KeyCommands,
    },
}

/// Credential management commands.
#[derive(Subcommand)]
pub enum KeyCommands {
    /// Add a key to the primary rotation pool
    Add {
        /// The API key to store
        key: String,
    },
    /// Remove a key from the primary pool
    Remove {
        /// The API key to remove
        key: String,
    },
    /// List stored keys (masked)
    List,
    /// Set the secondary (single-key) credential
    Secondary {
        /// The API key to store
        key: String,
    },
}
