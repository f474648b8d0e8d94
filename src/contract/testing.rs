//! Shared fixtures for tests that drive the dashboard against a mocked contract.

use super::error::ContractError;
use super::{MockPegbreakerContract, RawBalances, U256};
use crate::dashboard::state::Slice;
use crate::workers::core::EventSender;
use tokio::sync::mpsc;

pub const ACCOUNT: &str = "0x1234567890abcdef1234567890abcdef12345678";

/// 1.0 in 18-decimal fixed point.
pub fn one() -> U256 {
    U256::exp10(18)
}

fn unreachable_node() -> ContractError {
    ContractError::Transport("node unavailable".to_string())
}

/// Contract whose reads all succeed, except those belonging to `failing`.
pub fn mock_contract(failing: Option<Slice>) -> MockPegbreakerContract {
    let mut contract = MockPegbreakerContract::new();
    let fails = move |slice: Slice| failing == Some(slice);

    if fails(Slice::Balances) {
        contract
            .expect_token_balances()
            .returning(|_| Err(unreachable_node()));
    } else {
        contract.expect_token_balances().returning(|_| {
            Ok(RawBalances {
                dpg: one() * 12u64 + one() / 2u64,
                dai: one() * 3u64,
                dpb: U256::zero(),
            })
        });
    }

    if fails(Slice::OraclePrice) {
        contract
            .expect_dai_price()
            .returning(|| Err(unreachable_node()));
    } else {
        contract.expect_dai_price().returning(|| Ok(U256::from(99_980_000u64)));
    }

    if fails(Slice::Epoch) {
        contract
            .expect_is_epoch_complete()
            .returning(|| Err(unreachable_node()));
    } else {
        contract.expect_is_epoch_complete().returning(|| Ok(true));
    }

    contract
        .expect_dpg_market_cap()
        .returning(|| Ok(one() * 1_000_000u64));
    if fails(Slice::MarketCaps) {
        contract
            .expect_dai_market_cap()
            .returning(|| Err(ContractError::Decode("short return data".to_string())));
    } else {
        contract
            .expect_dai_market_cap()
            .returning(|| Ok(one() * 5_000_000u64));
    }
    contract.expect_dpb_market_cap().returning(|| Ok(one() * 250u64));

    contract
}

/// Event sender whose receiver is already gone; sends complete immediately.
pub fn event_sender() -> EventSender {
    let (sender, _) = mpsc::channel(1);
    EventSender::new(sender)
}
