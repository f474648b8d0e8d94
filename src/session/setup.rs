//! Session setup and initialization

use crate::config::Config;
use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::contract::{Address, RpcContract};
use crate::dashboard::{AccountContext, DashboardController};
use crate::environment::Environment;
use crate::events::Event;
use crate::workers::core::EventSender;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Everything a command needs to drive the dashboard
pub struct SessionData {
    /// Events emitted by refreshes, transactions and the poller
    pub event_receiver: mpsc::Receiver<Event>,
    /// Controller bound to the configured account
    pub controller: DashboardController,
    pub account: Address,
    pub contract_address: Address,
    pub rpc_url: String,
}

/// Resolves the RPC endpoint for a session: the configured URL, or the
/// environment default when none is set.
pub fn resolve_rpc_url(config: &Config, env: Environment) -> String {
    if config.rpc_url.is_empty() {
        env.rpc_url()
    } else {
        config.rpc_url.clone()
    }
}

/// Builds the contract binding and a controller connected to the account
///
/// # Arguments
/// * `config` - Resolved configuration with contract and account addresses
/// * `env` - Environment supplying the default RPC URL
///
/// # Returns
/// * `Ok(SessionData)` - Controller ready to refresh and submit
/// * `Err` - The configuration is incomplete or the HTTP client failed to build
pub fn setup_session(config: &Config, env: Environment) -> Result<SessionData, Box<dyn Error>> {
    let (contract_address, account) = config.addresses()?;
    let rpc_url = resolve_rpc_url(config, env);

    let contract = RpcContract::new(&rpc_url, contract_address)?;
    let (event_sender, event_receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);

    let mut controller = DashboardController::new(EventSender::new(event_sender));
    controller.connect(AccountContext::new(account, Arc::new(contract)));

    Ok(SessionData {
        event_receiver,
        controller,
        account,
        contract_address,
        rpc_url,
    })
}
