use crate::contract::error::ContractError;

pub(crate) mod client;
pub use client::RpcContract;
pub mod error;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;

pub use types::{Address, BondType, PendingTransaction, RawBalances, TxHash, TxReceipt, U256};

#[cfg(test)]
use mockall::automock;

/// The capability set of the deployed Pegbreaker contract.
///
/// Integer values are returned in the contract's fixed-point representation:
/// balances and market caps use 18 decimals, the DAI price uses 8.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PegbreakerContract: Send + Sync {
    /// DPG, DAI and DPB balances of an account.
    async fn token_balances(&self, account: &Address) -> Result<RawBalances, ContractError>;

    /// Oracle price of DAI.
    async fn dai_price(&self) -> Result<U256, ContractError>;

    /// Whether the current epoch is complete.
    async fn is_epoch_complete(&self) -> Result<bool, ContractError>;

    async fn dpg_market_cap(&self) -> Result<U256, ContractError>;

    async fn dai_market_cap(&self) -> Result<U256, ContractError>;

    async fn dpb_market_cap(&self) -> Result<U256, ContractError>;

    /// Stakes `amount` DPG from `from`.
    async fn stake_dpg(
        &self,
        from: &Address,
        amount: U256,
    ) -> Result<PendingTransaction, ContractError>;

    /// Mints DPG by paying `amount` DAI.
    async fn mint_dpg_with_dai(
        &self,
        from: &Address,
        amount: U256,
    ) -> Result<PendingTransaction, ContractError>;

    /// Mints DPG by sending `value` wei along with the call.
    async fn mint_dpg_with_eth(
        &self,
        from: &Address,
        value: U256,
    ) -> Result<PendingTransaction, ContractError>;

    /// Burns `amount` DPG in exchange for DAI.
    async fn burn_dpg(
        &self,
        from: &Address,
        amount: U256,
    ) -> Result<PendingTransaction, ContractError>;

    /// Issues a bond of the given term.
    async fn issue_bond(
        &self,
        from: &Address,
        bond_type: BondType,
    ) -> Result<PendingTransaction, ContractError>;

    /// Suspends until the transaction is mined. A mined but failed
    /// transaction resolves to `ContractError::Reverted`.
    async fn wait_for_confirmation(
        &self,
        tx: &PendingTransaction,
    ) -> Result<TxReceipt, ContractError>;
}
