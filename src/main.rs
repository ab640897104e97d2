//! `checkvision` binary: HTTP server plus local analyze/ping commands.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::net::TcpListener;
use tracing::{info, warn};

use checkvision::adapters::ai::GeminiProvider;
use checkvision::adapters::http::{check_app, CheckAppState};
use checkvision::application::handlers::check::MISSING_CREDENTIAL_MESSAGE;
use checkvision::application::{
    AnalyzeCheckCommand, AnalyzeCheckHandler, ProbeConnectionHandler, ProgressEstimator,
};
use checkvision::config::AppConfig;
use checkvision::domain::check::{AnalysisResult, ImagePayload};
use checkvision::ports::VisionProvider;

type BoxError = Box<dyn Error>;

#[derive(Parser)]
#[command(name = "checkvision")]
#[command(about = "Extract bank check fields from images with Gemini")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to bind, overriding CHECKVISION__SERVER__PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Analyze a local check image (jpg, png, webp or pdf)
    Analyze {
        /// Image file to analyze
        file: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Verify the Gemini API answers with the configured key
    Ping,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    init_tracing(&config);

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;
            serve(config).await
        }
        Commands::Analyze { file, json } => {
            config.validate()?;
            analyze(&config, file, json).await
        }
        Commands::Ping => {
            config.validate()?;
            ping(&config).await
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_provider(config: &AppConfig) -> Result<Option<Arc<dyn VisionProvider>>, BoxError> {
    match config.gemini.provider_config() {
        Some(gemini) => {
            let provider: Arc<dyn VisionProvider> = Arc::new(GeminiProvider::new(gemini)?);
            Ok(Some(provider))
        }
        None => Ok(None),
    }
}

fn require_provider(config: &AppConfig) -> Result<Arc<dyn VisionProvider>, BoxError> {
    build_provider(config)?.ok_or_else(|| MISSING_CREDENTIAL_MESSAGE.into())
}

// ════════════════════════════════════════════════════════════════════════════════
// Commands
// ════════════════════════════════════════════════════════════════════════════════

async fn serve(config: AppConfig) -> Result<(), BoxError> {
    let provider = build_provider(&config)?;
    if provider.is_none() {
        warn!("GEMINI_API_KEY is not configured; analyze requests will fail");
    }

    let state = CheckAppState::new(provider, config.server.environment);
    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    info!(
        %addr,
        environment = %config.server.environment,
        model = %config.gemini.model,
        "CheckVision API listening"
    );

    axum::serve(listener, check_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn analyze(config: &AppConfig, file: PathBuf, json: bool) -> Result<(), BoxError> {
    let image = ImagePayload::from_path(&file)?;
    let handler = AnalyzeCheckHandler::new(require_provider(config)?);

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40.cyan/blue}] {pos:>3}% {msg}")?
            .progress_chars("=>-"),
    );
    bar.set_message(format!("analyzing {}", file.display()));

    let ticker = bar.clone();
    let progress = ProgressEstimator::new().start(move |p| ticker.set_position(p.value().into()));

    match handler.handle(AnalyzeCheckCommand { image }).await {
        Ok(result) => {
            bar.set_position(progress.complete().value().into());
            bar.finish_and_clear();
            print_result(&result, json)?;
            Ok(())
        }
        Err(e) => {
            bar.set_position(progress.fail().value().into());
            bar.abandon_with_message("analysis failed");
            Err(e.into())
        }
    }
}

async fn ping(config: &AppConfig) -> Result<(), BoxError> {
    let handler = ProbeConnectionHandler::new(require_provider(config)?);
    let result = match handler.handle().await {
        Ok(result) => result,
        Err(e) => {
            println!("unreachable: {}", e.user_message());
            return Err(e.into());
        }
    };

    println!(
        "reachable: {} ({})",
        result.provider.name, result.provider.model
    );
    if let Some(reply) = result.reply {
        println!("{}", reply.trim());
    }
    Ok(())
}

fn print_result(result: &AnalysisResult, json: bool) -> Result<(), BoxError> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    for (field, value) in result.record().iter() {
        println!("{:<22} {}", format!("{}:", field.label()), value);
    }
    println!("{:<22} {}", "Confidence:", result.extraction_confidence());
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("Could not install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
