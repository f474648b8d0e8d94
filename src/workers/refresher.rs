//! Refresh rounds with per-slice failure isolation

use super::core::EventSender;
use crate::amount::format_units;
use crate::consts::cli_consts::{PRICE_DECIMALS, TOKEN_DECIMALS};
use crate::contract::error::ContractError;
use crate::contract::{Address, PegbreakerContract, U256};
use crate::dashboard::state::{Slice, SliceData, Store, Symbol, TokenAmounts};
use crate::dashboard::updaters::StateUpdate;
use crate::error_classifier::ErrorClassifier;
use crate::events::EventType;
use crate::logging::LogLevel;
use std::future::Future;
use std::sync::Arc;

/// Outcome of one refresh round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Slices whose read failed in this round.
    pub failed: Vec<Slice>,
}

impl RefreshReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Reads every slice of the dashboard from the contract.
#[derive(Clone)]
pub struct Refresher {
    contract: Arc<dyn PegbreakerContract>,
    account: Address,
    store: Store,
    event_sender: EventSender,
    classifier: ErrorClassifier,
}

impl Refresher {
    pub fn new(
        contract: Arc<dyn PegbreakerContract>,
        account: Address,
        store: Store,
        event_sender: EventSender,
    ) -> Self {
        Self {
            contract,
            account,
            store,
            event_sender,
            classifier: ErrorClassifier::new(),
        }
    }

    /// Runs one refresh round. The four slices are read concurrently and each one
    /// lands in the state as soon as it resolves; a failing read never cancels
    /// or invalidates the others.
    pub async fn refresh_all(&self) -> RefreshReport {
        self.store.dispatch(StateUpdate::RefreshStarted).await;
        self.event_sender
            .send_refresh_event(
                "Refreshing dashboard...".to_string(),
                EventType::Refresh,
                LogLevel::Debug,
            )
            .await;

        let (balances, price, epoch, market_caps) = tokio::join!(
            self.refresh_slice(Slice::Balances, self.fetch_balances()),
            self.refresh_slice(Slice::OraclePrice, self.fetch_price()),
            self.refresh_slice(Slice::Epoch, self.fetch_epoch()),
            self.refresh_slice(Slice::MarketCaps, self.fetch_market_caps()),
        );
        let report = RefreshReport {
            failed: [balances, price, epoch, market_caps]
                .into_iter()
                .filter_map(Result::err)
                .collect(),
        };

        self.store
            .dispatch(StateUpdate::RefreshFinished {
                all_succeeded: report.all_succeeded(),
            })
            .await;

        if report.all_succeeded() {
            self.event_sender
                .send_refresh_event(
                    "Dashboard refreshed".to_string(),
                    EventType::Success,
                    LogLevel::Debug,
                )
                .await;
        } else {
            let failed: Vec<String> = report.failed.iter().map(Slice::to_string).collect();
            self.event_sender
                .send_refresh_event(
                    format!("Refresh finished with stale {}", failed.join(", ")),
                    EventType::Refresh,
                    LogLevel::Info,
                )
                .await;
        }
        report
    }

    async fn refresh_slice<F>(&self, slice: Slice, fetch: F) -> Result<(), Slice>
    where
        F: Future<Output = Result<SliceData, ContractError>>,
    {
        match fetch.await {
            Ok(data) => {
                self.store.dispatch(StateUpdate::SliceLoaded(data)).await;
                Ok(())
            }
            Err(e) => {
                let log_level = self.classifier.classify_read_error(&e);
                self.event_sender
                    .send_refresh_event(
                        format!("Error fetching {}: {}", slice, e),
                        EventType::Error,
                        log_level,
                    )
                    .await;
                self.store
                    .dispatch(StateUpdate::SliceFailed {
                        slice,
                        message: slice.failure_message().to_string(),
                    })
                    .await;
                Err(slice)
            }
        }
    }

    async fn fetch_balances(&self) -> Result<SliceData, ContractError> {
        let raw = self.contract.token_balances(&self.account).await?;
        Ok(SliceData::Balances(token_amounts(raw.dpg, raw.dai, raw.dpb)?))
    }

    async fn fetch_price(&self) -> Result<SliceData, ContractError> {
        let price = self.contract.dai_price().await?;
        Ok(SliceData::OraclePrice(display(price, PRICE_DECIMALS)?))
    }

    async fn fetch_epoch(&self) -> Result<SliceData, ContractError> {
        let complete = self.contract.is_epoch_complete().await?;
        Ok(SliceData::Epoch(complete))
    }

    /// The three caps form one slice: they are written together or not at all.
    async fn fetch_market_caps(&self) -> Result<SliceData, ContractError> {
        let (dpg, dai, dpb) = tokio::try_join!(
            self.contract.dpg_market_cap(),
            self.contract.dai_market_cap(),
            self.contract.dpb_market_cap(),
        )?;
        Ok(SliceData::MarketCaps(token_amounts(dpg, dai, dpb)?))
    }
}

fn display(value: U256, decimals: u32) -> Result<String, ContractError> {
    format_units(value, decimals).map_err(|e| ContractError::Decode(e.to_string()))
}

fn token_amounts(dpg: U256, dai: U256, dpb: U256) -> Result<TokenAmounts, ContractError> {
    Ok(TokenAmounts::from([
        (Symbol::Dpg, display(dpg, TOKEN_DECIMALS)?),
        (Symbol::Dai, display(dai, TOKEN_DECIMALS)?),
        (Symbol::Dpb, display(dpb, TOKEN_DECIMALS)?),
    ]))
}
