//! Dashboard state update logic
//!
//! The only place the view state is mutated: every change is described by a
//! `StateUpdate` and applied through `ViewState::apply`.

use super::state::{SliceData, SlicePhase, SliceState, Slice, ViewState};
use crate::transaction::{InputField, TransactionKind};

use chrono::Local;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateUpdate {
    /// A refresh round started; every slice re-enters `Loading`.
    RefreshStarted,
    /// One slice was read successfully.
    SliceLoaded(SliceData),
    /// Reading one slice failed; its previous value is kept.
    SliceFailed { slice: Slice, message: String },
    /// A refresh round finished. A fully successful round clears the error.
    RefreshFinished { all_succeeded: bool },
    InputChanged { field: InputField, value: String },
    /// An input did not validate; nothing was sent.
    ValidationFailed { message: String },
    TransactionSubmitted(TransactionKind),
    TransactionConfirmed(TransactionKind),
    TransactionFailed { kind: TransactionKind, message: String },
}

fn now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

impl<T> SliceState<T> {
    fn start_loading(&mut self) {
        self.phase = SlicePhase::Loading;
    }

    fn load(&mut self, value: T) {
        self.value = Some(value);
        self.phase = SlicePhase::Ready;
        self.updated_at = Some(now());
    }

    fn fail(&mut self, message: String) {
        self.phase = SlicePhase::Error(message);
    }
}

impl ViewState {
    /// Applies a single update.
    pub fn apply(&mut self, update: StateUpdate) {
        match update {
            StateUpdate::RefreshStarted => {
                *self.refreshes_in_flight_mut() += 1;
                self.token_balances.start_loading();
                self.oracle_price.start_loading();
                self.epoch.start_loading();
                self.market_caps.start_loading();
            }
            StateUpdate::SliceLoaded(data) => self.handle_slice_loaded(data),
            StateUpdate::SliceFailed { slice, message } => {
                match slice {
                    Slice::Balances => self.token_balances.fail(message.clone()),
                    Slice::OraclePrice => self.oracle_price.fail(message.clone()),
                    Slice::Epoch => self.epoch.fail(message.clone()),
                    Slice::MarketCaps => self.market_caps.fail(message.clone()),
                }
                self.error = Some(message);
            }
            StateUpdate::RefreshFinished { all_succeeded } => {
                let in_flight = self.refreshes_in_flight_mut();
                *in_flight = in_flight.saturating_sub(1);
                if all_succeeded {
                    self.error = None;
                }
                self.last_refreshed = Some(now());
            }
            StateUpdate::InputChanged { field, value } => self.inputs.set(field, value),
            StateUpdate::ValidationFailed { message } => self.error = Some(message),
            StateUpdate::TransactionSubmitted(_) => {
                *self.transactions_in_flight_mut() += 1;
                self.notice = None;
            }
            StateUpdate::TransactionConfirmed(kind) => {
                self.finish_transaction();
                self.notice = Some(kind.success_message().to_string());
            }
            StateUpdate::TransactionFailed { message, .. } => {
                self.finish_transaction();
                self.error = Some(message);
            }
        }
    }

    fn handle_slice_loaded(&mut self, data: SliceData) {
        match data {
            SliceData::Balances(balances) => self.token_balances.load(balances),
            SliceData::OraclePrice(price) => self.oracle_price.load(price),
            SliceData::Epoch(complete) => self.epoch.load(complete),
            SliceData::MarketCaps(caps) => self.market_caps.load(caps),
        }
    }

    fn finish_transaction(&mut self) {
        let in_flight = self.transactions_in_flight_mut();
        *in_flight = in_flight.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::state::{Status, Symbol, TokenAmounts};

    fn balances(dpg: &str) -> TokenAmounts {
        TokenAmounts::from([
            (Symbol::Dpg, dpg.to_string()),
            (Symbol::Dai, "0.0".to_string()),
            (Symbol::Dpb, "0.0".to_string()),
        ])
    }

    #[test]
    fn slices_walk_through_their_lifecycle() {
        let mut state = ViewState::new();
        assert_eq!(state.phase(Slice::Balances), &SlicePhase::Uninitialized);
        assert_eq!(state.status(), Status::Idle);

        state.apply(StateUpdate::RefreshStarted);
        assert_eq!(state.phase(Slice::Balances), &SlicePhase::Loading);
        assert_eq!(state.status(), Status::Loading);

        state.apply(StateUpdate::SliceLoaded(SliceData::Balances(balances("1.5"))));
        state.apply(StateUpdate::RefreshFinished { all_succeeded: true });
        assert_eq!(state.phase(Slice::Balances), &SlicePhase::Ready);
        assert_eq!(state.token_balances.value, Some(balances("1.5")));
        assert!(state.token_balances.updated_at.is_some());
        assert!(state.last_refreshed.is_some());
        assert_eq!(state.status(), Status::Idle);
    }

    #[test]
    fn failed_slice_keeps_its_previous_value() {
        let mut state = ViewState::new();
        state.apply(StateUpdate::SliceLoaded(SliceData::OraclePrice("1.0001".to_string())));

        state.apply(StateUpdate::RefreshStarted);
        state.apply(StateUpdate::SliceFailed {
            slice: Slice::OraclePrice,
            message: Slice::OraclePrice.failure_message().to_string(),
        });
        state.apply(StateUpdate::RefreshFinished { all_succeeded: false });

        assert_eq!(state.oracle_price.value.as_deref(), Some("1.0001"));
        assert!(state.oracle_price.is_error());
        assert_eq!(
            state.status(),
            Status::Error("Failed to fetch DAI price.".to_string())
        );
        assert_eq!(state.failed_slices(), vec![Slice::OraclePrice]);
    }

    #[test]
    fn latest_error_overwrites_and_full_success_clears() {
        let mut state = ViewState::new();
        state.apply(StateUpdate::SliceFailed {
            slice: Slice::Epoch,
            message: "Failed to check epoch status.".to_string(),
        });
        state.apply(StateUpdate::ValidationFailed {
            message: "Please enter a valid burn amount.".to_string(),
        });
        assert_eq!(
            state.error.as_deref(),
            Some("Please enter a valid burn amount.")
        );

        state.apply(StateUpdate::RefreshStarted);
        state.apply(StateUpdate::RefreshFinished { all_succeeded: true });
        assert_eq!(state.error, None);
    }

    #[test]
    fn overlapping_refreshes_stay_loading_until_both_finish() {
        let mut state = ViewState::new();
        state.apply(StateUpdate::RefreshStarted);
        state.apply(StateUpdate::RefreshStarted);
        state.apply(StateUpdate::RefreshFinished { all_succeeded: true });
        assert_eq!(state.status(), Status::Loading);
        state.apply(StateUpdate::RefreshFinished { all_succeeded: true });
        assert_eq!(state.status(), Status::Idle);
        // An unmatched finish never underflows
        state.apply(StateUpdate::RefreshFinished { all_succeeded: true });
        assert_eq!(state.status(), Status::Idle);
    }

    #[test]
    fn transactions_update_notice_and_error() {
        let mut state = ViewState::new();
        state.apply(StateUpdate::InputChanged {
            field: InputField::StakeAmount,
            value: "2.5".to_string(),
        });
        state.apply(StateUpdate::TransactionSubmitted(TransactionKind::Stake));
        assert_eq!(state.transactions_in_flight(), 1);

        state.apply(StateUpdate::TransactionConfirmed(TransactionKind::Stake));
        assert_eq!(state.transactions_in_flight(), 0);
        assert_eq!(state.notice.as_deref(), Some("Stake successful!"));

        state.apply(StateUpdate::TransactionSubmitted(TransactionKind::Stake));
        state.apply(StateUpdate::TransactionFailed {
            kind: TransactionKind::Stake,
            message: "Failed to stake tokens.".to_string(),
        });
        assert_eq!(state.error.as_deref(), Some("Failed to stake tokens."));
        assert_eq!(state.inputs.stake_amount, "2.5");
    }

    #[test]
    // An earlier success notice does not linger next to a later failure.
    fn submitting_clears_the_previous_notice() {
        let mut state = ViewState::new();
        state.apply(StateUpdate::TransactionSubmitted(TransactionKind::Stake));
        state.apply(StateUpdate::TransactionConfirmed(TransactionKind::Stake));
        assert_eq!(state.notice.as_deref(), Some("Stake successful!"));

        state.apply(StateUpdate::TransactionSubmitted(TransactionKind::BurnDpg));
        assert_eq!(state.notice, None);
        state.apply(StateUpdate::TransactionFailed {
            kind: TransactionKind::BurnDpg,
            message: "Failed to burn DPG.".to_string(),
        });
        assert_eq!(state.notice, None);
        assert_eq!(state.error.as_deref(), Some("Failed to burn DPG."));
    }
}
