//! Dashboard controller
//!
//! Keeps the view state in line with the chain and mediates user transactions.

use super::state::{Store, ViewState};
use super::updaters::StateUpdate;
use crate::consts::cli_consts::polling;
use crate::contract::{Address, PegbreakerContract, TxReceipt};
use crate::transaction::{InputField, TransactionError, TransactionKind, TransactionRequest};
use crate::workers::core::EventSender;
use crate::workers::poller::Poller;
use crate::workers::refresher::{RefreshReport, Refresher};
use crate::workers::submitter::TransactionSubmitter;
use std::sync::Arc;
use std::time::Duration;

/// The selected account and the contract it talks to. Provided by the caller;
/// the controller only reads it.
#[derive(Clone)]
pub struct AccountContext {
    pub address: Address,
    pub contract: Arc<dyn PegbreakerContract>,
}

impl AccountContext {
    pub fn new(address: Address, contract: Arc<dyn PegbreakerContract>) -> Self {
        Self { address, contract }
    }
}

pub struct DashboardController {
    context: Option<AccountContext>,
    store: Store,
    event_sender: EventSender,
    poller: Poller,
}

impl DashboardController {
    /// Creates a controller with an empty view state and the default 10 second
    /// refresh interval.
    pub fn new(event_sender: EventSender) -> Self {
        Self::with_poll_interval(event_sender, polling::refresh_interval())
    }

    pub fn with_poll_interval(event_sender: EventSender, interval: Duration) -> Self {
        Self {
            context: None,
            store: Store::new(),
            event_sender,
            poller: Poller::new(interval),
        }
    }

    /// Selects an account. A running polling loop is restarted against it.
    pub fn connect(&mut self, context: AccountContext) {
        let was_polling = self.poller.stop();
        self.context = Some(context);
        if was_polling {
            self.start_polling();
        }
    }

    /// Drops the account context; polling stops with it.
    pub fn disconnect(&mut self) {
        self.poller.stop();
        self.context = None;
    }

    pub fn account(&self) -> Option<&Address> {
        self.context.as_ref().map(|context| &context.address)
    }

    /// A copy of the current view state.
    pub async fn state(&self) -> ViewState {
        self.store.snapshot().await
    }

    pub async fn set_input(&self, field: InputField, value: impl Into<String>) {
        self.store
            .dispatch(StateUpdate::InputChanged {
                field,
                value: value.into(),
            })
            .await;
    }

    fn refresher(&self) -> Option<Refresher> {
        self.context.as_ref().map(|context| {
            Refresher::new(
                context.contract.clone(),
                context.address,
                self.store.clone(),
                self.event_sender.clone(),
            )
        })
    }

    fn submitter(&self) -> Option<TransactionSubmitter> {
        self.context.as_ref().map(|context| {
            TransactionSubmitter::new(
                context.contract.clone(),
                context.address,
                self.store.clone(),
                self.event_sender.clone(),
            )
        })
    }

    /// Reads every slice concurrently. Without an account this does nothing.
    pub async fn refresh_all(&self) -> RefreshReport {
        match self.refresher() {
            Some(refresher) => refresher.refresh_all().await,
            None => RefreshReport::default(),
        }
    }

    /// Submits a transaction, waits for its confirmation and then refreshes
    /// the dashboard once.
    pub async fn submit_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<TxReceipt, TransactionError> {
        let submitter = self.submitter().ok_or(TransactionError::NotConnected)?;
        let receipt = submitter.submit(&request).await?;
        self.refresh_all().await;
        Ok(receipt)
    }

    /// Submits `kind` using the value of its pending input field.
    pub async fn submit_pending(
        &self,
        kind: TransactionKind,
    ) -> Result<TxReceipt, TransactionError> {
        let submitter = self.submitter().ok_or(TransactionError::NotConnected)?;
        let raw = self.store.input(kind.input_field()).await;
        let request = match TransactionRequest::from_input(kind, raw) {
            Ok(request) => request,
            Err(e) => {
                submitter.report_validation_failure(&e).await;
                return Err(e);
            }
        };
        self.submit_transaction(request).await
    }

    /// Starts the refresh loop. Returns `false` if there is no account or a
    /// loop is already running.
    pub fn start_polling(&mut self) -> bool {
        match self.refresher() {
            Some(refresher) => self.poller.start(refresher, self.event_sender.clone()),
            None => false,
        }
    }

    pub fn stop_polling(&mut self) -> bool {
        self.poller.stop()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_active()
    }
}
