use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imgreform::models::{AppConfig, ReformSettings, SettingsOverrides, CONFIG_FILE_ENV};
use imgreform::server;
use imgreform::services::{decode_file, FileWatcher, ReformOutcome, ReformOutput, ReformService};

#[derive(Parser)]
#[command(name = "imgreform")]
#[command(about = "Reduce images to indexed color and emit C source for embedded displays")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reform one image and write the C source
    Render {
        /// Input image (PNG, JPEG, BMP or GIF)
        input: PathBuf,

        /// Output file for the C source (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write an indexed PNG preview
        #[arg(long)]
        preview: Option<PathBuf>,

        #[command(flatten)]
        reform: ReformArgs,
    },
    /// Re-render whenever the input image or config file changes
    Watch {
        /// Input image (PNG, JPEG, BMP or GIF)
        input: PathBuf,

        /// Output file for the C source
        #[arg(short, long)]
        output: PathBuf,

        /// Also write an indexed PNG preview
        #[arg(long)]
        preview: Option<PathBuf>,

        #[command(flatten)]
        reform: ReformArgs,
    },
    /// Start the HTTP server
    Serve {
        /// Listen address (overrides the config file)
        #[arg(short, long)]
        bind: Option<String>,

        /// YAML config file (defaults to $CONFIG_FILE)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Flags shared by `render` and `watch`. Unset flags fall back to the config.
#[derive(Args, Clone)]
struct ReformArgs {
    /// Bits per pixel: 1, 4 or 8
    #[arg(short, long)]
    depth: Option<u8>,

    /// Dither kernel: none, FloydSteinberg, FalseFloydSteinberg, Jarvis,
    /// Stucki, Atkinson, Burkes, Sierra, TwoRowSierra or SierraLite
    #[arg(long)]
    dither: Option<String>,

    /// Target width in pixels (source width if omitted)
    #[arg(long)]
    width: Option<usize>,

    /// Target height in pixels (source height if omitted)
    #[arg(long)]
    height: Option<usize>,

    /// Name prefix for the generated C symbols
    #[arg(short, long)]
    prefix: Option<String>,

    /// Bracket style: knr or allman
    #[arg(short, long)]
    style: Option<String>,

    /// YAML config file (defaults to $CONFIG_FILE)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ReformArgs {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            depth: self.depth,
            dither: self.dither.clone(),
            width: self.width,
            height: self.height,
            prefix: self.prefix.clone(),
            style: self.style.clone(),
        }
    }

    /// Load the config and apply the flags on top of it.
    fn settings(&self) -> anyhow::Result<ReformSettings> {
        let config = AppConfig::load(self.config.as_deref())?;
        Ok(ReformSettings::resolve(&config, &self.overrides())?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            input,
            output,
            preview,
            reform,
        }) => run_render_command(&input, output.as_deref(), preview.as_deref(), &reform),
        Some(Commands::Watch {
            input,
            output,
            preview,
            reform,
        }) => run_watch_command(input, output, preview, reform).await,
        Some(Commands::Serve { bind, config }) => run_server(bind, config).await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_tracing(default_filter: &str, with_time: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    let registry = tracing_subscriber::registry().with(filter);
    if with_time {
        registry.with(tracing_subscriber::fmt::layer()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().without_time())
            .init();
    }
}

/// Reform a single image (no server needed)
fn run_render_command(
    input: &Path,
    output: Option<&Path>,
    preview: Option<&Path>,
    reform: &ReformArgs,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    init_tracing("imgreform=warn", false);

    let settings = reform.settings()?;
    let image =
        decode_file(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let result = ReformService::render_blocking(&image, &settings)?;

    match output {
        Some(path) => {
            write_outputs(&result, path, preview)?;
            eprintln!(
                "Rendered {} ({}x{}, {} bytes packed)",
                path.display(),
                result.metadata.width(),
                result.metadata.height(),
                result.metadata.pixels().len()
            );
        }
        None => {
            if let Some(preview) = preview {
                std::fs::write(preview, &result.preview_png)?;
            }
            println!("{}", result.source);
        }
    }

    Ok(())
}

fn write_outputs(result: &ReformOutput, output: &Path, preview: Option<&Path>) -> anyhow::Result<()> {
    std::fs::write(output, &result.source)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    if let Some(preview) = preview {
        std::fs::write(preview, &result.preview_png)
            .with_context(|| format!("Failed to write {}", preview.display()))?;
    }
    Ok(())
}

/// Re-render on every change of the input image or the config file.
///
/// Each change takes a new ticket before its work is spawned, and results
/// are written through [`ReformService::commit`], so a slow stale render
/// never overwrites the output of a newer one.
async fn run_watch_command(
    input: PathBuf,
    output: PathBuf,
    preview: Option<PathBuf>,
    reform: ReformArgs,
) -> anyhow::Result<()> {
    init_tracing("imgreform=info", true);

    let config_path = AppConfig::resolve_path(reform.config.as_deref());
    let mut watched = vec![input.clone()];
    watched.extend(config_path.iter().cloned());

    let watcher = FileWatcher::new(watched);
    if !watcher.is_active() {
        anyhow::bail!("Cannot watch {}", input.display());
    }
    let mut events = watcher.subscribe();

    let service = Arc::new(ReformService::new());
    let targets = Arc::new((output, preview));

    submit_watched(&service, &input, &reform, &targets).await;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    tracing::info!(paths = ?event.paths, "Change detected, re-rendering");
                    submit_watched(&service, &input, &reform, &targets).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Dropped file events, re-rendering");
                    submit_watched(&service, &input, &reform, &targets).await;
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watch");
                break;
            }
        }
    }

    Ok(())
}

async fn submit_watched(
    service: &Arc<ReformService>,
    input: &Path,
    reform: &ReformArgs,
    targets: &Arc<(PathBuf, Option<PathBuf>)>,
) {
    // Config is re-read on every submission so config edits apply too
    let settings = match reform.settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid settings, keeping previous output");
            return;
        }
    };
    let bytes = match tokio::fs::read(input).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %input.display(), error = %e, "Failed to read input");
            return;
        }
    };

    let ticket = service.next_ticket();
    let service = service.clone();
    let targets = targets.clone();
    tokio::spawn(async move {
        match service.run_ticket(ticket, bytes, settings).await {
            Ok(ReformOutcome::Completed(result)) => {
                let (output, preview) = targets.as_ref();
                let written = service
                    .commit(ticket, || write_outputs(&result, output, preview.as_deref()))
                    .await;
                match written {
                    Some(Ok(())) => tracing::info!(
                        output = %output.display(),
                        width = result.metadata.width(),
                        height = result.metadata.height(),
                        "Wrote source"
                    ),
                    Some(Err(e)) => tracing::error!(error = %e, "Failed to write output"),
                    None => {}
                }
            }
            Ok(ReformOutcome::Superseded) => {}
            Err(e) => tracing::warn!(error = %e, "Reform failed"),
        }
    });
}

/// Run the HTTP server
async fn run_server(bind: Option<String>, config: Option<PathBuf>) -> anyhow::Result<()> {
    init_tracing("imgreform=info,tower_http=debug", true);

    let config = AppConfig::load(config.as_deref())?;
    let bind_addr = bind.unwrap_or_else(|| config.bind.clone());

    let state = server::create_app_state(config);
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "imgreform server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Display version, configuration and usage information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var(CONFIG_FILE_ENV).ok();
    let rust_log = std::env::var("RUST_LOG").ok();

    println!("imgreform v{VERSION}");
    println!("Indexed-color image reformatting for embedded displays\n");

    println!("Environment Variables:");
    println!(
        "  {CONFIG_FILE_ENV} = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  RUST_LOG    = {}",
        rust_log.as_deref().unwrap_or("(not set)")
    );

    match AppConfig::load(None) {
        Ok(config) => {
            println!("\nEffective defaults:");
            println!("  depth         = {}", config.depth);
            println!("  dither        = {}", config.dither);
            println!("  prefix        = {}", config.prefix);
            println!("  bracket_style = {}", config.bracket_style);
            println!("  bind          = {}", config.bind);
        }
        Err(e) => println!("\nConfig error: {e}"),
    }

    println!("\nCommands:");
    println!("  imgreform render <INPUT> [-o FILE]   Write C source for one image");
    println!("  imgreform watch <INPUT> -o FILE      Re-render on every change");
    println!("  imgreform serve                      Start the HTTP server");
    println!("\nRun 'imgreform <command> --help' for all options.");
}
