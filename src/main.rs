// Copyright (c) 2024 Nexus. All rights reserved.

mod amount;
mod cli_messages;
mod config;
mod consts;
mod contract;
mod dashboard;
mod environment;
mod error_classifier;
mod events;
mod logging;
mod session;
mod transaction;
mod workers;

use crate::config::{Config, get_config_path};
use crate::environment::Environment;
use crate::session::{run_status, run_transaction, run_watch_mode, setup_session};
use crate::transaction::{TransactionKind, TransactionRequest};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::Path;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Pegbreaker dashboard: watch DPG/DAI/DPB balances and market caps, and submit protocol transactions
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save the RPC endpoint, contract address and account to use.
    Configure {
        /// JSON-RPC URL of the node. Defaults to the PEGBREAKER_ENVIRONMENT endpoint.
        #[arg(long, value_name = "URL")]
        rpc_url: Option<String>,

        /// Address of the Pegbreaker contract. 42-character hex string starting with '0x'
        #[arg(long, value_name = "ADDRESS")]
        contract: Option<String>,

        /// Account to display and send transactions from.
        #[arg(long, value_name = "ADDRESS")]
        account: Option<String>,
    },
    /// Delete the saved configuration.
    Reset,
    /// Refresh once and print the dashboard.
    Status,
    /// Refresh every 10 seconds until Ctrl+C.
    Watch,
    /// Stake DPG.
    Stake {
        #[arg(value_name = "AMOUNT")]
        amount: String,
    },
    /// Mint DPG by paying DAI.
    MintDai {
        #[arg(value_name = "AMOUNT")]
        amount: String,
    },
    /// Mint DPG by sending ETH.
    MintEth {
        #[arg(value_name = "AMOUNT")]
        amount: String,
    },
    /// Burn DPG in exchange for DAI.
    Burn {
        #[arg(value_name = "AMOUNT")]
        amount: String,
    },
    /// Issue a bond. 1 = 1-year (25% return), 2 = 2-year (60% return).
    IssueBond {
        #[arg(value_name = "BOND_TYPE", default_value = "1")]
        bond_type: String,
    },
}

#[tokio::main]
async fn main() {
    logging::init_logger();

    let environment = std::env::var("PEGBREAKER_ENVIRONMENT")
        .unwrap_or_default()
        .parse::<Environment>()
        .unwrap_or_default();

    let args = Args::parse();
    if let Err(e) = run(args.command, environment).await {
        print_cmd_error!(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(command: Command, environment: Environment) -> Result<(), Box<dyn Error>> {
    let config_path = get_config_path()?;
    match command {
        Command::Configure {
            rpc_url,
            contract,
            account,
        } => configure(&config_path, rpc_url, contract, account),
        Command::Reset => {
            print_cmd_info!("Reset", "Clearing configuration file...");
            Config::clear(&config_path).map_err(Into::into)
        }
        Command::Status => {
            let session = setup_session(&load_config(&config_path)?, environment)?;
            run_status(session).await
        }
        Command::Watch => {
            let session = setup_session(&load_config(&config_path)?, environment)?;
            run_watch_mode(session).await
        }
        Command::Stake { amount } => {
            submit(&config_path, environment, TransactionKind::Stake, amount).await
        }
        Command::MintDai { amount } => {
            submit(&config_path, environment, TransactionKind::MintWithDai, amount).await
        }
        Command::MintEth { amount } => {
            submit(&config_path, environment, TransactionKind::MintWithEth, amount).await
        }
        Command::Burn { amount } => {
            submit(&config_path, environment, TransactionKind::BurnDpg, amount).await
        }
        Command::IssueBond { bond_type } => {
            submit(&config_path, environment, TransactionKind::IssueBond, bond_type).await
        }
    }
}

fn load_config(path: &Path) -> Result<Config, Box<dyn Error>> {
    Config::load_from_file(path).map_err(|e| {
        format!(
            "Failed to load config from {}: {}. Run `pegbreaker configure` first",
            path.display(),
            e
        )
        .into()
    })
}

/// Merges the given values into the stored configuration and saves it.
fn configure(
    path: &Path,
    rpc_url: Option<String>,
    contract: Option<String>,
    account: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let explicit = Config::new(
        rpc_url.unwrap_or_default(),
        contract.unwrap_or_default(),
        account.unwrap_or_default(),
    );
    let config = match Config::load_from_file(path) {
        Ok(stored) => explicit.merged_with(stored),
        Err(_) => explicit,
    };
    config.addresses()?;
    config
        .save(path)
        .map_err(|e| format!("Failed to save config: {}", e))?;
    print_cmd_success!("Configuration saved", "{}", path.display());
    Ok(())
}

async fn submit(
    config_path: &Path,
    environment: Environment,
    kind: TransactionKind,
    raw: String,
) -> Result<(), Box<dyn Error>> {
    let request = TransactionRequest::from_input(kind, raw)?;
    let session = setup_session(&load_config(config_path)?, environment)?;
    run_transaction(session, request).await
}
