use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use vignette::{
    Cli, Commands, ExportFormat, FileStore, GeminiClient, KeyCommands, KeyStore, KeyValueStore,
    PdfLayout, ProgressReporter, RetryPolicy, ScriptDriver, Studio, StudioOptions,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Generate {
            script,
            title,
            pages,
            panels,
            style,
            provider,
            format,
            out,
            pacing_ms,
            adapt,
            no_captions,
        } => {
            run_generate(GenerateArgs {
                script,
                title,
                pages,
                panels,
                style,
                provider,
                format,
                out,
                pacing_ms,
                adapt,
                no_captions,
            })
            .await?;
        }

        Commands::Adapt { story } => {
            run_adapt(story).await?;
        }

        Commands::Keys { command } => {
            run_keys(command).await?;
        }
    }

    Ok(())
}

struct GenerateArgs {
    script: PathBuf,
    title: Option<String>,
    pages: usize,
    panels: usize,
    style: vignette::ComicStyle,
    provider: vignette::ImageProvider,
    format: Vec<ExportFormat>,
    out: PathBuf,
    pacing_ms: u64,
    adapt: bool,
    no_captions: bool,
}

/// Prints one line per panel as the batch progresses.
struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn panel_started(&self, index: usize, total: usize) {
        println!("  Panel {}/{}...", index + 1, total);
    }

    fn panel_finished(&self, index: usize, total: usize, ok: bool) {
        let mark = if ok { "✓" } else { "✗" };
        println!("  {} Panel {}/{}", mark, index + 1, total);
    }
}

async fn open_store() -> Result<KeyStore, Box<dyn std::error::Error>> {
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::default_location()?);
    let mut store = KeyStore::open(storage).await?;
    seed_from_env(&mut store).await?;
    Ok(store)
}

/// Seed credentials from the environment when the store has none.
async fn seed_from_env(store: &mut KeyStore) -> Result<(), Box<dyn std::error::Error>> {
    if store.key_count().await == 0 {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                store.add_key(key.trim().to_string()).await?;
            }
        }
    }
    if store.secondary().is_none() {
        if let Ok(key) = std::env::var("HF_API_KEY") {
            if !key.trim().is_empty() {
                store.set_secondary(Some(key.trim().to_string())).await?;
            }
        }
    }
    Ok(())
}

async fn run_generate(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let script_text = std::fs::read_to_string(&args.script)?;
    let title = args.title.unwrap_or_else(|| {
        args.script
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    });

    let store = open_store().await?;
    let driver = args
        .provider
        .resolve(store.pool_handle(), store.secondary(), RetryPolicy::default())
        .await?;

    let options = StudioOptions::builder()
        .title(title.clone())
        .pages(args.pages)
        .panels_per_page(args.panels)
        .style(args.style)
        .pacing(Duration::from_millis(args.pacing_ms))
        .build()?;

    let mut studio = Studio::new(driver, options).with_progress(Arc::new(ConsoleProgress));
    if args.adapt {
        if store.key_count().await > 0 {
            let gemini: Box<dyn ScriptDriver> = Box::new(GeminiClient::new(store.pool_handle()));
            studio = studio.with_script_driver(gemini);
        } else {
            eprintln!("No Gemini keys stored; skipping script adaptation");
        }
    }

    println!("Generating \"{}\" ({} pages, {} panels/page, {} style, {} provider)...",
        title, args.pages, args.panels, args.style, args.provider);
    let comic = studio.generate(&script_text).await?;

    println!(
        "\n✓ {} of {} panels generated",
        comic.success_count(),
        args.pages * args.panels
    );
    for (index, error) in comic.failures() {
        eprintln!("  ✗ panel {}: {}", index + 1, error);
    }

    let client = reqwest::Client::new();
    let export_panels = comic.export_panels(&client).await?;

    std::fs::create_dir_all(&args.out)?;
    let captions = !args.no_captions;
    for format in &args.format {
        let bytes = match format {
            ExportFormat::Pdf => {
                let layout = PdfLayout {
                    panels_per_page: args.panels,
                    captions,
                    ..PdfLayout::default()
                };
                vignette::write_pdf(&export_panels, &layout)?
            }
            ExportFormat::Zip => vignette::write_zip(&export_panels, captions)?,
            ExportFormat::Cbz => vignette::write_cbz(&export_panels)?,
            ExportFormat::Epub => vignette::write_epub(&title, &export_panels)?,
        };
        let path = args.out.join(format!("{}.{}", file_slug(&title), format.extension()));
        std::fs::write(&path, bytes)?;
        println!("  Wrote {}", path.display());
    }

    Ok(())
}

async fn run_adapt(story: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&story)?;
    let store = open_store().await?;
    if store.key_count().await == 0 {
        return Err("Script adaptation needs at least one Gemini key (vignette keys add ...)".into());
    }

    let gemini = GeminiClient::new(store.pool_handle());
    let screenplay = gemini.rewrite_script(&text).await?;
    println!("{screenplay}");
    Ok(())
}

async fn run_keys(command: KeyCommands) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store().await?;

    match command {
        KeyCommands::Add { key } => {
            store.add_key(key).await?;
            println!("✓ Key added ({} in pool)", store.key_count().await);
        }
        KeyCommands::Remove { key } => {
            if store.remove_key(&key).await? {
                println!("✓ Key removed ({} in pool)", store.key_count().await);
            } else {
                println!("Key not found");
            }
        }
        KeyCommands::List => {
            let masked = store.masked_keys().await;
            if masked.is_empty() {
                println!("No primary keys stored");
            } else {
                println!("Primary keys:");
                for (i, key) in masked.iter().enumerate() {
                    println!("  {}. {}", i + 1, key);
                }
            }
            match store.secondary() {
                Some(_) => println!("Secondary key: configured"),
                None => println!("Secondary key: not set"),
            }
        }
        KeyCommands::Secondary { key } => {
            store.set_secondary(Some(key)).await?;
            println!("✓ Secondary key stored");
        }
    }

    Ok(())
}

fn file_slug(title: &str) -> String {
    let slug: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = slug.trim_matches('_');
    if trimmed.is_empty() {
        "comic".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_slug_replaces_punctuation() {
        assert_eq!(file_slug("Night Shift!"), "night_shift");
        assert_eq!(file_slug("???"), "comic");
    }
}
