//! # Tiabela CLI
//!
//! Command-line interface for the coloring studio.
//!
//! ## Usage
//!
//! ```bash
//! # Run the storefront and studio API
//! GEMINI_API_KEY=... tiabela serve --listen 0.0.0.0:8080
//!
//! # List available themes and palette colors
//! tiabela themes
//!
//! # Render a theme's coloring page to PNG
//! tiabela color cute-puppy-hero --png puppy.png
//!
//! # Use the preview image without calling the generator
//! tiabela color cyber-forest --png forest.png --offline
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use tiabela::{
    StudioError,
    assets::ImageLoader,
    catalog,
    generate::{
        GeminiConfig, GeminiGenerator, GenerationOutcome, ImageGenerator, Unconfigured, gemini,
    },
    server::{self, AppState, ServerConfig},
    studio::{self, StudioSession},
};

/// Tiabela - Coloring pages for the Tia Bela studio
#[derive(Parser, Debug)]
#[command(name = "tiabela")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Generator settings shared by commands that illustrate themes.
#[derive(Args, Debug)]
struct GeneratorArgs {
    /// API key for the image generator (generation falls back to previews without it)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model used for generation
    #[arg(long, env = "TIABELA_MODEL", default_value = gemini::DEFAULT_MODEL)]
    model: String,

    /// Base URL of the generation API
    #[arg(long, env = "TIABELA_ENDPOINT", default_value = gemini::DEFAULT_ENDPOINT)]
    endpoint: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,

        #[command(flatten)]
        generator: GeneratorArgs,
    },

    /// List available themes
    Themes,

    /// Render a theme's coloring page to a PNG file
    Color {
        /// Theme to illustrate
        theme: String,

        /// Output PNG file
        #[arg(long, value_name = "FILE")]
        png: PathBuf,

        /// Page width in pixels
        #[arg(long, default_value = "1024")]
        width: u32,

        /// Page height in pixels
        #[arg(long, default_value = "1024")]
        height: u32,

        /// Skip generation and use the theme's preview image
        #[arg(long)]
        offline: bool,

        #[command(flatten)]
        generator: GeneratorArgs,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StudioError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { listen, generator } => {
            let config = ServerConfig {
                listen_addr: listen,
                ..ServerConfig::default()
            };
            let loader = ImageLoader::with_default_client()?;
            let state = AppState::new(config, build_generator(generator)?, loader);
            server::serve(Arc::new(state)).await?;
        }

        Commands::Themes => {
            println!("Available themes:");
            for theme in catalog::themes() {
                let marker = if theme.id == catalog::FEATURED_THEME_ID { " *" } else { "" };
                println!("  {:<20} {}{}", theme.id, theme.name, marker);
            }
            println!("\nPalette:");
            println!("  {}", catalog::PALETTE.join(" "));
        }

        Commands::Color {
            theme,
            png,
            width,
            height,
            offline,
            generator,
        } => {
            if width == 0 || height == 0 {
                return Err(StudioError::InvalidInput(
                    "Page dimensions must be positive".to_string(),
                ));
            }

            let theme = catalog::theme_by_id(&theme).cloned().ok_or_else(|| {
                StudioError::InvalidInput(format!(
                    "Unknown theme '{}'. Run `tiabela themes` to see available options.",
                    theme
                ))
            })?;

            let generator: Arc<dyn ImageGenerator> = if offline {
                Arc::new(Unconfigured)
            } else {
                build_generator(generator)?
            };
            let loader = ImageLoader::with_default_client()?;

            println!("Illustrating {} ({}x{})...", theme.name, width, height);

            let mut session = StudioSession::new(width, height);
            let outcome = studio::open_theme(&mut session, generator.as_ref(), &loader, theme).await;
            if let Some(reason) = fallback_reason(&outcome) {
                println!("Using preview image ({})", reason);
            }
            if !session.surface().is_base_loaded() {
                return Err(StudioError::Image(format!(
                    "Could not load {} base image",
                    outcome.image().kind()
                )));
            }

            std::fs::write(&png, session.print_page()?)?;
            println!("Saved to {}", png.display());
        }
    }

    Ok(())
}

/// Gemini when a key is available, otherwise a generator that always falls back.
fn build_generator(args: GeneratorArgs) -> Result<Arc<dyn ImageGenerator>, StudioError> {
    let api_key = args
        .api_key
        .or_else(|| std::env::var("API_KEY").ok())
        .filter(|key| !key.trim().is_empty());

    let Some(api_key) = api_key else {
        tracing::warn!("no API key configured, themes will use their preview images");
        return Ok(Arc::new(Unconfigured));
    };

    let http_client = reqwest::Client::builder()
        .user_agent(concat!("tiabela/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| StudioError::Config(format!("HTTP client error: {}", e)))?;

    let config = GeminiConfig {
        model: args.model,
        endpoint: args.endpoint,
        ..GeminiConfig::new(api_key)
    };
    let generator = GeminiGenerator::new(http_client, config);
    tracing::info!(
        model = %generator.config().model,
        endpoint = %generator.config().endpoint,
        "image generation enabled"
    );
    Ok(Arc::new(generator))
}

fn fallback_reason(outcome: &GenerationOutcome) -> Option<&str> {
    match outcome {
        GenerationOutcome::Fallback { reason, .. } => Some(reason.as_str()),
        GenerationOutcome::Generated(_) => None,
    }
}
