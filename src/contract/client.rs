//! Pegbreaker contract client
//!
//! Talks to the deployed contract through an `ethers` provider. Reads go through
//! `eth_call`; writes go through `eth_sendTransaction` with `from` set, leaving
//! signing to the wallet or node behind the endpoint.

use crate::consts::cli_consts::{confirmation, rpc};
use crate::contract::PegbreakerContract;
use crate::contract::error::ContractError;
use crate::contract::types::{
    Address, BondType, PendingTransaction, RawBalances, TxHash, TxReceipt, U256,
};
use ethers::abi::{Detokenize, Tokenize, parse_abi};
use ethers::contract::{BaseContract, Contract, ContractCall};
use ethers::providers::{Http, JsonRpcClient, Middleware, Provider};
use ethers::types::{TransactionReceipt, U64};
use reqwest::{ClientBuilder, Url};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[cfg(test)]
use mockall::automock;

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("pegbreaker-cli/", env!("CARGO_PKG_VERSION"));

const GET_TOKEN_BALANCES: &str = "getTokenBalances";
const GET_DAI_PRICE: &str = "getDAIPrice";
const IS_EPOCH_COMPLETE: &str = "isEpochComplete";
const GET_DPG_MARKET_CAP: &str = "getDPGMarketCap";
const GET_DAI_MARKET_CAP: &str = "getDAIMarketCap";
const GET_DPB_MARKET_CAP: &str = "getDPBMarketCap";
const STAKE_DPG: &str = "stakeDPG";
const MINT_DPG_WITH_DAI: &str = "mintDPGWithDAI";
const MINT_DPG_WITH_ETH: &str = "mintDPGWithETH";
const BURN_DPG: &str = "burnDPG";
const ISSUE_BOND: &str = "issueBond";

const PEGBREAKER_ABI: &[&str] = &[
    "function getTokenBalances(address account) external view returns (uint256, uint256, uint256)",
    "function getDAIPrice() external view returns (uint256)",
    "function isEpochComplete() external view returns (bool)",
    "function getDPGMarketCap() external view returns (uint256)",
    "function getDAIMarketCap() external view returns (uint256)",
    "function getDPBMarketCap() external view returns (uint256)",
    "function stakeDPG(uint256 amount) external",
    "function mintDPGWithDAI(uint256 amount) external",
    "function mintDPGWithETH() external payable",
    "function burnDPG(uint256 amount) external",
    "function issueBond(uint256 bondType) external",
];

fn pegbreaker_abi() -> Result<BaseContract, ContractError> {
    let abi = parse_abi(PEGBREAKER_ABI).map_err(|e| ContractError::Decode(e.to_string()))?;
    Ok(BaseContract::from(abi))
}

/// Where confirmation polling looks up receipts.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub(crate) trait ReceiptSource: Send + Sync {
    /// `None` while the transaction is still pending.
    async fn receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>, ContractError>;
}

#[async_trait::async_trait]
impl<P: JsonRpcClient + 'static> ReceiptSource for Provider<P> {
    async fn receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>, ContractError> {
        Ok(self.get_transaction_receipt(hash).await?)
    }
}

/// Polls `source` until the transaction is mined or `timeout` elapses.
///
/// Failed lookups are retried: the transaction is already out, so only a mined
/// receipt or the deadline ends the wait.
pub(crate) async fn wait_for_receipt<R: ReceiptSource + ?Sized>(
    source: &R,
    hash: TxHash,
    poll_interval: Duration,
    timeout: Duration,
) -> Result<TxReceipt, ContractError> {
    let deadline = Instant::now() + timeout;
    loop {
        match source.receipt(hash).await {
            Ok(Some(receipt)) => return settle(hash, receipt),
            Ok(None) => {}
            Err(e) => log::debug!("Receipt lookup for {:?} failed, retrying: {}", hash, e),
        }
        if Instant::now() >= deadline {
            return Err(ContractError::Timeout(hash));
        }
        tokio::time::sleep(poll_interval).await;
    }
}

fn settle(hash: TxHash, receipt: TransactionReceipt) -> Result<TxReceipt, ContractError> {
    // Pre-Byzantium receipts carry no status; treat them as successful.
    if receipt.status == Some(U64::zero()) {
        return Err(ContractError::Reverted(hash));
    }
    let block_number = receipt
        .block_number
        .ok_or_else(|| ContractError::Decode(format!("receipt for {:?} has no block", hash)))?;
    Ok(TxReceipt {
        hash,
        block_number: block_number.as_u64(),
    })
}

pub struct RpcContract<P: JsonRpcClient = Http> {
    contract: Contract<Provider<P>>,
    provider: Arc<Provider<P>>,
    confirmation_poll_interval: Duration,
    confirmation_timeout: Duration,
}

impl RpcContract<Http> {
    pub fn new(rpc_url: &str, address: Address) -> Result<Self, ContractError> {
        let url = Url::parse(rpc_url)
            .map_err(|e| ContractError::Transport(format!("Invalid RPC URL {:?}: {}", rpc_url, e)))?;
        let client = ClientBuilder::new()
            .connect_timeout(rpc::connect_timeout())
            .timeout(rpc::request_timeout())
            .user_agent(USER_AGENT)
            .build()?;
        let provider = Provider::new(Http::new_with_client(url, client));
        Self::with_provider(provider, address)
    }
}

impl<P: JsonRpcClient + 'static> RpcContract<P> {
    pub fn with_provider(provider: Provider<P>, address: Address) -> Result<Self, ContractError> {
        let provider = Arc::new(provider);
        let contract = Contract::new(address, pegbreaker_abi()?, provider.clone());
        Ok(Self {
            contract,
            provider,
            confirmation_poll_interval: confirmation::receipt_poll_interval(),
            confirmation_timeout: confirmation::confirmation_timeout(),
        })
    }

    fn method<T: Tokenize, D: Detokenize>(
        &self,
        name: &str,
        args: T,
    ) -> Result<ContractCall<Provider<P>, D>, ContractError> {
        self.contract
            .method(name, args)
            .map_err(|e| ContractError::Decode(e.to_string()))
    }

    async fn read_uint(&self, name: &str) -> Result<U256, ContractError> {
        Ok(self.method::<_, U256>(name, ())?.call().await?)
    }

    fn transaction<T: Tokenize>(
        &self,
        from: &Address,
        name: &str,
        args: T,
    ) -> Result<ContractCall<Provider<P>, ()>, ContractError> {
        Ok(self.method::<_, ()>(name, args)?.from(*from))
    }

    fn stake_dpg_call(
        &self,
        from: &Address,
        amount: U256,
    ) -> Result<ContractCall<Provider<P>, ()>, ContractError> {
        self.transaction(from, STAKE_DPG, amount)
    }

    fn mint_dpg_with_dai_call(
        &self,
        from: &Address,
        amount: U256,
    ) -> Result<ContractCall<Provider<P>, ()>, ContractError> {
        self.transaction(from, MINT_DPG_WITH_DAI, amount)
    }

    fn mint_dpg_with_eth_call(
        &self,
        from: &Address,
        value: U256,
    ) -> Result<ContractCall<Provider<P>, ()>, ContractError> {
        Ok(self.transaction(from, MINT_DPG_WITH_ETH, ())?.value(value))
    }

    fn burn_dpg_call(
        &self,
        from: &Address,
        amount: U256,
    ) -> Result<ContractCall<Provider<P>, ()>, ContractError> {
        self.transaction(from, BURN_DPG, amount)
    }

    fn issue_bond_call(
        &self,
        from: &Address,
        bond_type: BondType,
    ) -> Result<ContractCall<Provider<P>, ()>, ContractError> {
        self.transaction(from, ISSUE_BOND, bond_type.code())
    }

    async fn send(
        &self,
        call: ContractCall<Provider<P>, ()>,
    ) -> Result<PendingTransaction, ContractError> {
        let pending = call.send().await?;
        let hash = pending.tx_hash();
        log::debug!("Sent {:?} to {:?}", hash, self.contract.address());
        Ok(PendingTransaction::new(hash))
    }
}

#[async_trait::async_trait]
impl<P: JsonRpcClient + 'static> PegbreakerContract for RpcContract<P> {
    async fn token_balances(&self, account: &Address) -> Result<RawBalances, ContractError> {
        let (dpg, dai, dpb) = self
            .method::<_, (U256, U256, U256)>(GET_TOKEN_BALANCES, *account)?
            .call()
            .await?;
        Ok(RawBalances { dpg, dai, dpb })
    }

    async fn dai_price(&self) -> Result<U256, ContractError> {
        self.read_uint(GET_DAI_PRICE).await
    }

    async fn is_epoch_complete(&self) -> Result<bool, ContractError> {
        Ok(self.method::<_, bool>(IS_EPOCH_COMPLETE, ())?.call().await?)
    }

    async fn dpg_market_cap(&self) -> Result<U256, ContractError> {
        self.read_uint(GET_DPG_MARKET_CAP).await
    }

    async fn dai_market_cap(&self) -> Result<U256, ContractError> {
        self.read_uint(GET_DAI_MARKET_CAP).await
    }

    async fn dpb_market_cap(&self) -> Result<U256, ContractError> {
        self.read_uint(GET_DPB_MARKET_CAP).await
    }

    async fn stake_dpg(
        &self,
        from: &Address,
        amount: U256,
    ) -> Result<PendingTransaction, ContractError> {
        self.send(self.stake_dpg_call(from, amount)?).await
    }

    async fn mint_dpg_with_dai(
        &self,
        from: &Address,
        amount: U256,
    ) -> Result<PendingTransaction, ContractError> {
        self.send(self.mint_dpg_with_dai_call(from, amount)?).await
    }

    async fn mint_dpg_with_eth(
        &self,
        from: &Address,
        value: U256,
    ) -> Result<PendingTransaction, ContractError> {
        self.send(self.mint_dpg_with_eth_call(from, value)?).await
    }

    async fn burn_dpg(
        &self,
        from: &Address,
        amount: U256,
    ) -> Result<PendingTransaction, ContractError> {
        self.send(self.burn_dpg_call(from, amount)?).await
    }

    async fn issue_bond(
        &self,
        from: &Address,
        bond_type: BondType,
    ) -> Result<PendingTransaction, ContractError> {
        self.send(self.issue_bond_call(from, bond_type)?).await
    }

    async fn wait_for_confirmation(
        &self,
        tx: &PendingTransaction,
    ) -> Result<TxReceipt, ContractError> {
        wait_for_receipt(
            self.provider.as_ref(),
            tx.hash,
            self.confirmation_poll_interval,
            self.confirmation_timeout,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::testing::ACCOUNT;
    use ethers::abi::{Token, encode};
    use ethers::providers::MockProvider;
    use ethers::types::Bytes;

    const CONTRACT: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";
    const POLL: Duration = Duration::from_secs(1);

    fn mocked_contract() -> (RpcContract<MockProvider>, MockProvider) {
        let (provider, mock) = Provider::mocked();
        let contract = RpcContract::with_provider(provider, CONTRACT.parse().unwrap()).unwrap();
        (contract, mock)
    }

    fn mined(block: u64, status: u64) -> TransactionReceipt {
        TransactionReceipt {
            block_number: Some(block.into()),
            status: Some(status.into()),
            ..Default::default()
        }
    }

    fn hash() -> TxHash {
        TxHash::repeat_byte(7)
    }

    #[tokio::test]
    // Reads decode full-width uint256 values.
    async fn test_read_accepts_values_above_u128() {
        let (contract, mock) = mocked_contract();
        let wide = U256::from(u128::MAX) + 1;
        mock.push::<Bytes, _>(Bytes::from(encode(&[Token::Uint(wide)]))).unwrap();

        assert_eq!(contract.dpg_market_cap().await.unwrap(), wide);
    }

    #[tokio::test]
    async fn test_token_balances_decode_three_words() {
        let (contract, mock) = mocked_contract();
        let words = [
            Token::Uint(U256::exp10(18) * 12u64),
            Token::Uint(U256::zero()),
            Token::Uint(U256::MAX),
        ];
        mock.push::<Bytes, _>(Bytes::from(encode(&words))).unwrap();

        let balances = contract
            .token_balances(&ACCOUNT.parse().unwrap())
            .await
            .unwrap();
        assert_eq!(balances.dpg, U256::exp10(18) * 12u64);
        assert_eq!(balances.dai, U256::zero());
        assert_eq!(balances.dpb, U256::MAX);
    }

    #[tokio::test]
    // Short return data is a decode error, not a panic.
    async fn test_read_rejects_short_return_data() {
        let (contract, mock) = mocked_contract();
        mock.push::<Bytes, _>(Bytes::from(vec![0u8; 4])).unwrap();

        let err = contract.dai_price().await.unwrap_err();
        assert!(matches!(err, ContractError::Decode(_)), "{:?}", err);
    }

    #[test]
    // mintDPGWithETH carries the amount as the transaction value, not as calldata.
    fn test_mint_with_eth_sets_value() {
        let (contract, _mock) = mocked_contract();
        let from: Address = ACCOUNT.parse().unwrap();
        let value = U256::exp10(17);

        let call = contract.mint_dpg_with_eth_call(&from, value).unwrap();
        assert_eq!(call.tx.value(), Some(&value));
        assert_eq!(call.tx.from(), Some(&from));
        assert_eq!(call.tx.to_addr(), Some(&CONTRACT.parse().unwrap()));
        // Selector only.
        assert_eq!(call.tx.data().map(|data| data.len()), Some(4));
    }

    #[test]
    fn test_amount_calls_encode_the_amount() {
        let (contract, _mock) = mocked_contract();
        let from: Address = ACCOUNT.parse().unwrap();
        let amount = U256::exp10(18) * 5u64;

        for call in [
            contract.stake_dpg_call(&from, amount).unwrap(),
            contract.mint_dpg_with_dai_call(&from, amount).unwrap(),
            contract.burn_dpg_call(&from, amount).unwrap(),
        ] {
            let data = call.tx.data().unwrap();
            assert_eq!(data.len(), 4 + 32);
            assert_eq!(U256::from_big_endian(&data[4..]), amount);
            assert!(call.tx.value().is_none());
            assert_eq!(call.tx.from(), Some(&from));
        }

        let bond = contract.issue_bond_call(&from, BondType::TwoYear).unwrap();
        let data = bond.tx.data().unwrap();
        assert_eq!(U256::from_big_endian(&data[4..]), U256::from(2u8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_returns_once_mined() {
        let mut source = MockReceiptSource::new();
        let mut calls = 0;
        source.expect_receipt().returning(move |_| {
            calls += 1;
            Ok((calls >= 3).then(|| mined(16, 1)))
        });

        let receipt = wait_for_receipt(&source, hash(), POLL, Duration::from_secs(120))
            .await
            .unwrap();
        assert_eq!(receipt.block_number, 16);
        assert_eq!(receipt.hash, hash());
    }

    #[tokio::test(start_paused = true)]
    // A failed lookup does not end the wait for an already-sent transaction.
    async fn test_wait_retries_failed_lookups() {
        let mut source = MockReceiptSource::new();
        let mut calls = 0;
        source.expect_receipt().returning(move |_| {
            calls += 1;
            match calls {
                1 => Err(ContractError::Transport("503 busy".to_string())),
                2 => Ok(None),
                _ => Ok(Some(mined(5, 1))),
            }
        });

        let receipt = wait_for_receipt(&source, hash(), POLL, Duration::from_secs(120))
            .await
            .unwrap();
        assert_eq!(receipt.block_number, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_reports_reverted_receipt() {
        let mut source = MockReceiptSource::new();
        source
            .expect_receipt()
            .times(1)
            .returning(|_| Ok(Some(mined(17, 0))));

        let err = wait_for_receipt(&source, hash(), POLL, Duration::from_secs(120))
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::Reverted(h) if h == hash()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_times_out() {
        let mut source = MockReceiptSource::new();
        source
            .expect_receipt()
            .returning(|_| Err(ContractError::Transport("connection refused".to_string())));

        let start = Instant::now();
        let err = wait_for_receipt(&source, hash(), POLL, Duration::from_secs(10))
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::Timeout(h) if h == hash()));
        assert!(start.elapsed() >= Duration::from_secs(10));
    }
}
