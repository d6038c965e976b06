//! vpnrest - command line front end of the REST client
//!
//! Every subcommand prints its result as JSON on stdout; logs go to stderr.

use std::collections::BTreeMap;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use vpnrest_infra::api::ProblemReport;
use vpnrest_lib::utils::{init_logging, LogFormat};
use vpnrest_lib::{commands, AppContext};

#[derive(Parser)]
#[command(name = "vpnrest")]
#[command(about = "Resilient REST client for the VPN API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (pretty or json)
    #[arg(long, global = true, env = "VPNREST_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the API address list and update the address cache
    Addresses,

    /// Fetch the relay list
    Relays {
        /// ETag of the relay list already held
        #[arg(long)]
        etag: Option<String>,
    },

    /// Show account data
    Account {
        account_number: String,
    },

    /// List devices registered on an account
    Devices {
        account_number: String,
    },

    /// Remove a device from an account
    RemoveDevice {
        account_number: String,
        device_id: String,
    },

    /// Add time to an account with a voucher
    SubmitVoucher {
        account_number: String,
        voucher_code: String,
    },

    /// Send a problem report
    ProblemReport {
        /// Message describing the problem
        #[arg(short, long)]
        message: String,

        /// Reply address
        #[arg(short, long, default_value = "")]
        address: String,

        /// File whose contents are attached as the log
        #[arg(long)]
        log_file: Option<std::path::PathBuf>,
    },

    /// Show transport selection state
    Status,

    /// Reset the transport failure counter
    ResetTransport,

    /// Show the cached bridge configuration
    Bridge,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging FIRST so we can see .env loading
    init_logging(cli.log_format, cli.verbose);

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "Could not load .env file"),
    }

    let context = AppContext::new().context("failed to initialize application context")?;

    tokio::select! {
        result = run(&context, cli.command) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            Ok(())
        }
    }
}

async fn run(context: &AppContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Addresses => print(&commands::refresh_addresses(context).await?),
        Commands::Relays { etag } => print(&commands::fetch_relays(context, etag).await?),
        Commands::Account { account_number } => {
            print(&commands::account_data(context, &account_number).await?)
        }
        Commands::Devices { account_number } => {
            print(&commands::list_devices(context, &account_number).await?)
        }
        Commands::RemoveDevice { account_number, device_id } => {
            print(&commands::remove_device(context, &account_number, &device_id).await?)
        }
        Commands::SubmitVoucher { account_number, voucher_code } => {
            print(&commands::submit_voucher(context, &account_number, &voucher_code).await?)
        }
        Commands::ProblemReport { message, address, log_file } => {
            let log = match log_file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => String::new(),
            };
            let mut metadata = BTreeMap::new();
            metadata.insert("version".to_string(), env!("CARGO_PKG_VERSION").to_string());
            metadata.insert("os".to_string(), std::env::consts::OS.to_string());

            let report = ProblemReport { address, message, log, metadata };
            commands::send_problem_report(context, &report).await?;
            print(&serde_json::json!({ "sent": true }))
        }
        Commands::Status => print(&commands::transport_status(context)),
        Commands::ResetTransport => print(&commands::reset_transport(context)),
        Commands::Bridge => print(&commands::bridge_config(context)),
    }
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
