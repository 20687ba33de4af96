use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use ersatz::admin::ServerCommand;
use ersatz::http::ERSATZ_ERROR;

#[derive(Parser)]
#[command(name = "ersatz-cli")]
#[command(about = "Management CLI for a running ersatz server", long_about = None)]
struct Cli {
    /// Base URL of the admin endpoint
    #[arg(short, long, default_value = "http://localhost:8080/__ersatz")]
    url: String,

    /// Admin API key, if the server requires one
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve VARIANT for the next response(s) of METHOD URL
    Vary {
        url: String,
        method: String,
        variant: String,
        /// Number of responses the override lasts
        #[arg(long, default_value_t = 1)]
        uses: u32,
    },
    /// List discovered routes and their variants
    Routes,
    /// List pending overrides
    Schedule,
    /// Check server status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key))?,
        );
    }

    let base = cli.url.trim_end_matches('/');
    let res = match cli.command {
        Commands::Vary { url, method, variant, uses } => {
            let mut command = ServerCommand::vary(url, method, variant);
            if let Some(endpoint) = command.endpoint.as_mut() {
                endpoint.uses = Some(uses);
            }
            client.post(base).headers(headers).json(&command).send().await?
        }
        Commands::Routes => client.get(format!("{}/routes", base)).headers(headers).send().await?,
        Commands::Schedule => client.get(format!("{}/schedule", base)).headers(headers).send().await?,
        Commands::Status => client.get(format!("{}/status", base)).headers(headers).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: admin endpoint returned status {}", status);
        if let Some(reason) = res.headers().get(ERSATZ_ERROR).and_then(|v| v.to_str().ok()) {
            eprintln!("Reason: {}", reason);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
