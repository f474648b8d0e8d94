//! Headless command execution
//!
//! One-shot commands (status, transactions) and the long-running watch loop
//! all print controller events to the console as they arrive.

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::dashboard::format_summary;
use crate::events::Event;
use crate::transaction::TransactionRequest;
use std::error::Error;
use tokio::sync::mpsc;

fn print_event(event: &Event) {
    if event.should_display() {
        println!("{}", event);
    }
}

/// Prints whatever events are already queued.
fn drain_events(receiver: &mut mpsc::Receiver<Event>) {
    while let Ok(event) = receiver.try_recv() {
        print_event(&event);
    }
}

/// Runs one refresh round and prints the resulting dashboard.
pub async fn run_status(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    let report = session.controller.refresh_all().await;
    drain_events(&mut session.event_receiver);

    let state = session.controller.state().await;
    println!("{}", format_summary(&state));
    if !report.all_succeeded() {
        let failed: Vec<String> = report.failed.iter().map(|slice| slice.to_string()).collect();
        crate::print_cmd_warn!(
            "Partial refresh",
            "showing last known values for: {}",
            failed.join(", ")
        );
    }
    Ok(())
}

/// Submits one transaction, waits for confirmation and prints the refreshed
/// dashboard.
pub async fn run_transaction(
    mut session: SessionData,
    request: TransactionRequest,
) -> Result<(), Box<dyn Error>> {
    let result = {
        let submit = session.controller.submit_transaction(request);
        tokio::pin!(submit);
        // Print progress while waiting for the receipt.
        loop {
            tokio::select! {
                result = &mut submit => break result,
                Some(event) = session.event_receiver.recv() => print_event(&event),
            }
        }
    };
    drain_events(&mut session.event_receiver);

    let state = session.controller.state().await;
    match result {
        Ok(receipt) => {
            crate::print_cmd_success!(
                state.notice.as_deref().unwrap_or("Transaction confirmed"),
                "tx {:?} in block {}",
                receipt.hash,
                receipt.block_number
            );
            println!("{}", format_summary(&state));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Polls the contract until Ctrl+C, printing events as they arrive
///
/// # Returns
/// * `Ok(())` - Stopped by the user
/// * `Err` - The polling loop could not be started
pub async fn run_watch_mode(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    print_session_starting(&format!("{:?}", session.account), &session.rpc_url);

    if !session.controller.start_polling() {
        return Err(Box::from("Failed to start polling"));
    }

    loop {
        tokio::select! {
            Some(event) = session.event_receiver.recv() => {
                print_event(&event);
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    print_session_shutdown();
    session.controller.stop_polling();
    let state = session.controller.state().await;
    println!("{}", format_summary(&state));
    print_session_exit_success();

    Ok(())
}
