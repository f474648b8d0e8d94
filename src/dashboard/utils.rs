//! Dashboard utility functions
//!
//! Plain-text rendering of the view state for the command line

use super::state::{SlicePhase, SliceState, Status, Symbol, TokenAmounts, ViewState};

fn amount_or_placeholder(amounts: &SliceState<TokenAmounts>, symbol: Symbol) -> String {
    amounts
        .value
        .as_ref()
        .and_then(|values| values.get(&symbol).cloned())
        .unwrap_or_else(|| "0".to_string())
}

fn phase_suffix(phase: &SlicePhase) -> String {
    match phase {
        SlicePhase::Error(message) => format!("  (stale: {})", message),
        SlicePhase::Uninitialized => "  (not loaded)".to_string(),
        SlicePhase::Loading | SlicePhase::Ready => String::new(),
    }
}

/// Multi-line summary of balances, price, market caps and epoch status.
pub fn format_summary(state: &ViewState) -> String {
    let mut lines = Vec::new();

    match state.status() {
        Status::Loading => lines.push("Loading...".to_string()),
        Status::Error(message) => lines.push(format!("Error: {}", message)),
        Status::Idle => {}
    }
    if let Some(notice) = &state.notice {
        lines.push(notice.clone());
    }

    lines.push(format!(
        "Market Caps:{}",
        phase_suffix(&state.market_caps.phase)
    ));
    for symbol in Symbol::ALL {
        lines.push(format!(
            "  {} Market Cap: ${}",
            symbol,
            amount_or_placeholder(&state.market_caps, symbol)
        ));
    }

    lines.push(format!(
        "Token Balances in Account:{}",
        phase_suffix(&state.token_balances.phase)
    ));
    for symbol in Symbol::ALL {
        lines.push(format!(
            "  {} Token: {}",
            symbol,
            amount_or_placeholder(&state.token_balances, symbol)
        ));
    }

    let price = match &state.oracle_price.value {
        Some(price) => format!("${}", price),
        None => "Loading...".to_string(),
    };
    lines.push(format!(
        "DAI Price: {}{}",
        price,
        phase_suffix(&state.oracle_price.phase)
    ));

    let epoch = if state.epoch_complete() {
        "Epoch is complete."
    } else {
        "Epoch is not completed."
    };
    lines.push(format!(
        "Epoch Status: {}{}",
        epoch,
        phase_suffix(&state.epoch.phase)
    ));

    if let Some(at) = &state.last_refreshed {
        lines.push(format!("Last refreshed: {}", at));
    }
    lines.join("\n")
}
