use anyhow::Context;
use care_locator::config::toml_config::TomlConfig;
use care_locator::domain::ports::ConfigProvider;
use care_locator::utils::error::{ErrorSeverity, LocatorError};
use care_locator::utils::{logger, validation::Validate};
use care_locator::{CliConfig, DiscoverQuery, DispatchQuery, LocatorEngine};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "care-locator")]
#[command(about = "Find nearby emergency-care facilities and plan ambulance dispatch")]
struct Cli {
    /// Path to a TOML configuration file; replaces the settings flags below
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(flatten)]
    settings: CliConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List nearby facilities, nearest first
    Discover {
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
        /// Search radius in meters
        #[arg(long)]
        radius: Option<u32>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Pick the nearest facility and build the dispatch notification
    Dispatch {
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
    },
}

fn exit_on_config_error(e: &LocatorError) -> ! {
    tracing::error!(
        "❌ Configuration failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

async fn run<C: ConfigProvider + Validate>(config: C, command: Command) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        exit_on_config_error(&e);
    }

    let engine = match LocatorEngine::from_config(&config) {
        Ok(engine) => engine,
        Err(e) => exit_on_config_error(&e),
    };

    let output = match command {
        Command::Discover {
            lat,
            lon,
            radius,
            limit,
        } => {
            let query = DiscoverQuery {
                latitude: lat,
                longitude: lon,
                radius,
                limit,
            };
            serde_json::to_string_pretty(&engine.discover_response(&query).await)
        }
        Command::Dispatch { lat, lon } => {
            let query = DispatchQuery {
                latitude: lat,
                longitude: lon,
            };
            serde_json::to_string_pretty(&engine.dispatch_response(&query).await)
        }
    }
    .context("failed to encode response")?;

    println!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("Starting care-locator CLI");

    match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let config = match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => exit_on_config_error(&e),
            };
            run(config, cli.command).await
        }
        None => run(cli.settings, cli.command).await,
    }
}
