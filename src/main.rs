//! Ersatz fixture server.
//!
//! ```text
//!   client under test
//!        │  METHOD /endpoint/path
//!        ▼
//!   ┌──────────┐    ┌───────────┐    ┌──────────────┐    ┌──────────────┐
//!   │   http   │───▶│ resolver  │───▶│  variation   │    │   fixtures   │
//!   │  server  │    │           │───▶│  scheduler   │    │ cache/store  │
//!   └──────────┘    └─────┬─────┘    └──────────────┘    └──────┬───────┘
//!        ▲                └──────────────────────────────────────┘
//!        │                                      root/path/VERB/variant.json
//!   ┌──────────┐
//!   │  admin   │  POST /__ersatz {"command":"vary", ...}
//!   └──────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use ersatz::config::{read_config, ErsatzConfig};
use ersatz::lifecycle::{self, signals, Shutdown};
use ersatz::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "ersatz", version)]
#[command(about = "Serve pre-recorded JSON fixtures over HTTP", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the fixture tree rooted at DEFINITIONS_DIR
    Start {
        /// Port to listen on
        port: u16,

        /// Root of the <path>/<VERB>/<variant>.json tree
        definitions_dir: PathBuf,

        /// Optional TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host or IP to bind (overrides the config file)
        #[arg(long)]
        host: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            port,
            definitions_dir,
            config,
            host,
        } => {
            let mut config = match config {
                Some(path) => match read_config(&path) {
                    Ok(config) => config,
                    Err(e) => {
                        eprintln!("{e}");
                        return ExitCode::FAILURE;
                    }
                },
                None => ErsatzConfig::default(),
            };
            if let Some(host) = host {
                config.set_listen_address(&host, port);
            } else {
                config.set_port(port);
            }
            config.fixtures.root_dir = definitions_dir;

            match start(config).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!(error = %e, "Startup failed");
                    eprintln!("{e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

async fn start(config: ErsatzConfig) -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging(&config.observability.log_level);
    tracing::info!("ersatz v{} starting", env!("CARGO_PKG_VERSION"));

    let server = lifecycle::prepare(config)?;
    let config = server.config().clone();

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = lifecycle::bind(&config).await?;
    tracing::info!(address = %listener.local_addr()?, "[ERSATZ] Listening");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
