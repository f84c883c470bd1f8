use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::ValueEnum;
use wallet_checker::client::ApiClient;
use wallet_checker::config::Settings;
use wallet_checker::service::WalletService;
use wallet_checker::store::WalletStore;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogOutputFormat {
    Json,
    Pretty,
}

/// Command line arguments for the wallet checker.
#[derive(Debug, Parser)]
#[clap(name = "Wallet Checker")]
struct WalletCheckerArgs {
    /// Optional path to the configuration file. If not provided, it is expected
    /// that all parameters are provided via environment variables.
    #[clap(short = 'c', long, required = false)]
    config: Option<PathBuf>,

    #[clap(short = 'o', long = "output-format", default_value = "pretty")]
    output_format: Option<LogOutputFormat>,

    /// Wallet addresses to verify, in order.
    #[clap(required = true)]
    addresses: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = WalletCheckerArgs::parse();

    let pretty = matches!(args.output_format, Some(LogOutputFormat::Pretty));
    wallet_checker::logging::setup_logging(wallet_checker::DEFAULT_LOG_DIRECTIVES, pretty);

    // Load the configuration file and/or environment variables.
    let settings = Settings::new(args.config)?;

    let client = ApiClient::new(&settings)?;
    tracing::info!(base_url = client.base_url(), "starting the wallet checker");

    let service = WalletService::new(client, &settings);
    let store = WalletStore::new(service);

    store.load_metadata().await;

    let mut failures = 0usize;
    for address in &args.addresses {
        if store.verify_wallet(address).await.is_err() {
            failures += 1;
        }

        let state = store.state();
        let report = serde_json::json!({
            "address": address,
            "status": state.status(),
            "state": state,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if failures > 0 {
        tracing::warn!(failures, "some wallets could not be verified");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
