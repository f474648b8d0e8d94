//! Dashboard state management
//!
//! Contains the view state struct, its slices and the related enums

use crate::transaction::InputField;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Tokens the dashboard tracks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
pub enum Symbol {
    #[strum(to_string = "DPG")]
    Dpg,
    #[strum(to_string = "DAI")]
    Dai,
    #[strum(to_string = "DPB")]
    Dpb,
}

impl Symbol {
    pub const ALL: [Symbol; 3] = [Symbol::Dpg, Symbol::Dai, Symbol::Dpb];
}

/// Formatted decimal amount per token.
pub type TokenAmounts = BTreeMap<Symbol, String>;

/// Independently refreshed groups of the view state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum Slice {
    #[strum(to_string = "token balances")]
    Balances,
    #[strum(to_string = "DAI price")]
    OraclePrice,
    #[strum(to_string = "epoch status")]
    Epoch,
    #[strum(to_string = "market caps")]
    MarketCaps,
}

impl Slice {
    pub const ALL: [Slice; 4] = [
        Slice::Balances,
        Slice::OraclePrice,
        Slice::Epoch,
        Slice::MarketCaps,
    ];

    /// Generic message surfaced when reading this slice fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Slice::Balances => "Failed to fetch token balances.",
            Slice::OraclePrice => "Failed to fetch DAI price.",
            Slice::Epoch => "Failed to check epoch status.",
            Slice::MarketCaps => "Failed to fetch market caps.",
        }
    }
}

/// Lifecycle of a single slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SlicePhase {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Error(String),
}

/// A slice value together with where it is in its lifecycle. The value is the
/// last successfully read one and survives failed refreshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceState<T> {
    pub value: Option<T>,
    pub phase: SlicePhase,
    /// Local time of the last successful read.
    pub updated_at: Option<String>,
}

impl<T> Default for SliceState<T> {
    fn default() -> Self {
        Self {
            value: None,
            phase: SlicePhase::Uninitialized,
            updated_at: None,
        }
    }
}

impl<T> SliceState<T> {
    pub fn is_error(&self) -> bool {
        matches!(self.phase, SlicePhase::Error(_))
    }
}

/// Freshly read data for one slice, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceData {
    Balances(TokenAmounts),
    OraclePrice(String),
    Epoch(bool),
    MarketCaps(TokenAmounts),
}

impl SliceData {
    pub fn slice(&self) -> Slice {
        match self {
            SliceData::Balances(_) => Slice::Balances,
            SliceData::OraclePrice(_) => Slice::OraclePrice,
            SliceData::Epoch(_) => Slice::Epoch,
            SliceData::MarketCaps(_) => Slice::MarketCaps,
        }
    }
}

/// What the user has typed but not yet submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInputs {
    pub stake_amount: String,
    pub mint_amount: String,
    pub burn_amount: String,
    pub bond_type: String,
}

impl Default for PendingInputs {
    fn default() -> Self {
        Self {
            stake_amount: String::new(),
            mint_amount: String::new(),
            burn_amount: String::new(),
            bond_type: "1".to_string(),
        }
    }
}

impl PendingInputs {
    pub fn get(&self, field: InputField) -> &str {
        match field {
            InputField::StakeAmount => &self.stake_amount,
            InputField::MintAmount => &self.mint_amount,
            InputField::BurnAmount => &self.burn_amount,
            InputField::BondType => &self.bond_type,
        }
    }

    pub fn set(&mut self, field: InputField, value: String) {
        match field {
            InputField::StakeAmount => self.stake_amount = value,
            InputField::MintAmount => self.mint_amount = value,
            InputField::BurnAmount => self.burn_amount = value,
            InputField::BondType => self.bond_type = value,
        }
    }
}

/// Overall status shown next to the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Error(String),
}

/// Everything the dashboard displays. Built on mount, discarded on teardown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub token_balances: SliceState<TokenAmounts>,
    pub oracle_price: SliceState<String>,
    pub epoch: SliceState<bool>,
    pub market_caps: SliceState<TokenAmounts>,
    pub inputs: PendingInputs,
    /// Latest error message; a newer error overwrites it.
    pub error: Option<String>,
    /// Latest transaction success message.
    pub notice: Option<String>,
    /// Local time of the last refresh round that finished.
    pub last_refreshed: Option<String>,

    refreshes_in_flight: usize,
    transactions_in_flight: usize,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Status {
        if self.refreshes_in_flight > 0 {
            Status::Loading
        } else if let Some(message) = &self.error {
            Status::Error(message.clone())
        } else {
            Status::Idle
        }
    }

    pub fn epoch_complete(&self) -> bool {
        self.epoch.value.unwrap_or(false)
    }

    pub fn phase(&self, slice: Slice) -> &SlicePhase {
        match slice {
            Slice::Balances => &self.token_balances.phase,
            Slice::OraclePrice => &self.oracle_price.phase,
            Slice::Epoch => &self.epoch.phase,
            Slice::MarketCaps => &self.market_caps.phase,
        }
    }

    /// Slices whose last read failed.
    pub fn failed_slices(&self) -> Vec<Slice> {
        Slice::ALL
            .into_iter()
            .filter(|slice| matches!(self.phase(*slice), SlicePhase::Error(_)))
            .collect()
    }

    pub fn transactions_in_flight(&self) -> usize {
        self.transactions_in_flight
    }

    pub(super) fn refreshes_in_flight_mut(&mut self) -> &mut usize {
        &mut self.refreshes_in_flight
    }

    pub(super) fn transactions_in_flight_mut(&mut self) -> &mut usize {
        &mut self.transactions_in_flight
    }
}

/// Shared owner of the view state. Every write goes through `dispatch`.
#[derive(Clone, Debug, Default)]
pub struct Store {
    inner: Arc<Mutex<ViewState>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one update to the state.
    pub async fn dispatch(&self, update: super::updaters::StateUpdate) {
        let mut state = self.inner.lock().await;
        state.apply(update);
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> ViewState {
        self.inner.lock().await.clone()
    }

    pub async fn input(&self, field: InputField) -> String {
        self.inner.lock().await.inputs.get(field).to_string()
    }
}
