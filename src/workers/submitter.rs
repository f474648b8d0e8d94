//! Transaction submission and confirmation

use super::core::EventSender;
use crate::contract::error::ContractError;
use crate::contract::{Address, PegbreakerContract, TxReceipt};
use crate::dashboard::state::Store;
use crate::dashboard::updaters::StateUpdate;
use crate::error_classifier::ErrorClassifier;
use crate::events::EventType;
use crate::logging::LogLevel;
use crate::transaction::{ContractCall, TransactionError, TransactionRequest};
use std::sync::Arc;

/// Validates, sends and confirms user transactions
#[derive(Clone)]
pub struct TransactionSubmitter {
    contract: Arc<dyn PegbreakerContract>,
    account: Address,
    store: Store,
    event_sender: EventSender,
    classifier: ErrorClassifier,
}

impl TransactionSubmitter {
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

    /// Submits a transaction and suspends until it is confirmed on chain.
    ///
    /// Invalid input short-circuits before any network call. Pending inputs are
    /// never modified here, so a failed attempt can be retried as is.
    pub async fn submit(
        &self,
        request: &TransactionRequest,
    ) -> Result<TxReceipt, TransactionError> {
        let kind = request.kind();
        let call = match request.validate() {
            Ok(call) => call,
            Err(e) => {
                self.report_validation_failure(&e).await;
                return Err(e);
            }
        };

        self.store
            .dispatch(StateUpdate::TransactionSubmitted(kind))
            .await;
        self.event_sender
            .send_transaction_event(
                format!("Submitting {}...", request),
                EventType::Refresh,
                LogLevel::Info,
            )
            .await;

        match self.send_and_confirm(call).await {
            Ok(receipt) => {
                self.store
                    .dispatch(StateUpdate::TransactionConfirmed(kind))
                    .await;
                self.event_sender
                    .send_transaction_event(
                        format!(
                            "{} (tx {:?} in block {})",
                            kind.success_message(),
                            receipt.hash,
                            receipt.block_number
                        ),
                        EventType::Success,
                        LogLevel::Info,
                    )
                    .await;
                Ok(receipt)
            }
            Err(e) => {
                let log_level = self.classifier.classify_transaction_error(&e);
                self.event_sender
                    .send_transaction_event(
                        format!("Error submitting {}: {}", request, e),
                        EventType::Error,
                        log_level,
                    )
                    .await;
                let error = TransactionError::from_contract(kind, e);
                self.store
                    .dispatch(StateUpdate::TransactionFailed {
                        kind,
                        message: error.to_string(),
                    })
                    .await;
                Err(error)
            }
        }
    }

    /// Reports an input that failed validation.
    pub async fn report_validation_failure(&self, error: &TransactionError) {
        if let TransactionError::Validation {
            field,
            message,
            reason,
        } = error
        {
            self.event_sender
                .send_transaction_event(
                    format!("Invalid {}: {}", field, reason),
                    EventType::Error,
                    LogLevel::Info,
                )
                .await;
            self.store
                .dispatch(StateUpdate::ValidationFailed {
                    message: message.clone(),
                })
                .await;
        }
    }

    async fn send_and_confirm(&self, call: ContractCall) -> Result<TxReceipt, ContractError> {
        let from = &self.account;
        let pending = match call {
            ContractCall::StakeDpg(amount) => self.contract.stake_dpg(from, amount).await?,
            ContractCall::MintDpgWithDai(amount) => {
                self.contract.mint_dpg_with_dai(from, amount).await?
            }
            ContractCall::MintDpgWithEth(value) => {
                self.contract.mint_dpg_with_eth(from, value).await?
            }
            ContractCall::BurnDpg(amount) => self.contract.burn_dpg(from, amount).await?,
            ContractCall::IssueBond(bond_type) => {
                self.contract.issue_bond(from, bond_type).await?
            }
        };

        self.event_sender
            .send_transaction_event(
                format!("Waiting for confirmation of {:?}...", pending.hash),
                EventType::Waiting,
                LogLevel::Info,
            )
            .await;
        self.contract.wait_for_confirmation(&pending).await
    }
}
