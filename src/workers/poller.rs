//! Scheduled refresh loop

use super::core::EventSender;
use super::refresher::Refresher;
use crate::events::EventType;
use crate::logging::LogLevel;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

struct PollHandle {
    cancel: CancellationToken,
    join_handle: JoinHandle<()>,
}

/// Owner of the single polling loop. The loop refreshes immediately, then once
/// per interval, and is cancelled on `stop` or when the poller is dropped.
pub struct Poller {
    interval: Duration,
    running: Option<PollHandle>,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            running: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|handle| !handle.cancel.is_cancelled() && !handle.join_handle.is_finished())
    }

    /// Spawns the loop. Returns `false` without doing anything if a loop is
    /// already running.
    pub fn start(&mut self, refresher: Refresher, event_sender: EventSender) -> bool {
        if self.is_active() {
            return false;
        }
        // Reap a loop that ended on its own.
        self.stop();

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let period = self.interval;
        let join_handle = tokio::spawn(async move {
            event_sender
                .send_poller_event(
                    format!("Refreshing every {} seconds", period.as_secs()),
                    EventType::Refresh,
                    LogLevel::Info,
                )
                .await;

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        refresher.refresh_all().await;
                    }
                }
            }

            event_sender
                .send_poller_event(
                    "Polling stopped".to_string(),
                    EventType::Refresh,
                    LogLevel::Debug,
                )
                .await;
        });

        self.running = Some(PollHandle {
            cancel,
            join_handle,
        });
        true
    }

    /// Cancels the loop. A refresh round already in flight finishes, but no new
    /// one starts. Returns whether a loop was running.
    pub fn stop(&mut self) -> bool {
        match self.running.take() {
            Some(handle) => {
                let was_active = !handle.join_handle.is_finished();
                handle.cancel.cancel();
                was_active
            }
            None => false,
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::testing::{ACCOUNT, event_sender, mock_contract};
    use crate::contract::{MockPegbreakerContract, RawBalances, U256};
    use crate::dashboard::state::Store;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    const PERIOD: Duration = Duration::from_secs(10);

    /// Contract that counts how many refresh rounds read the price.
    fn counting_contract(rounds: Arc<AtomicUsize>) -> MockPegbreakerContract {
        let mut contract = MockPegbreakerContract::new();
        contract.expect_dai_price().returning(move || {
            rounds.fetch_add(1, Ordering::SeqCst);
            Ok(U256::exp10(8))
        });
        contract
            .expect_token_balances()
            .returning(|_| Ok(RawBalances::default()));
        contract.expect_is_epoch_complete().returning(|| Ok(false));
        contract
            .expect_dpg_market_cap()
            .returning(|| Ok(U256::zero()));
        contract
            .expect_dai_market_cap()
            .returning(|| Ok(U256::zero()));
        contract
            .expect_dpb_market_cap()
            .returning(|| Ok(U256::zero()));
        contract
    }

    fn refresher(contract: MockPegbreakerContract) -> Refresher {
        Refresher::new(
            Arc::new(contract),
            ACCOUNT.parse().unwrap(),
            Store::new(),
            event_sender(),
        )
    }

    #[tokio::test(start_paused = true)]
    // The first refresh runs immediately, then one per interval.
    async fn test_refreshes_on_interval() {
        let rounds = Arc::new(AtomicUsize::new(0));
        let mut poller = Poller::new(PERIOD);
        assert!(poller.start(refresher(counting_contract(rounds.clone())), event_sender()));

        sleep(Duration::from_secs(1)).await;
        assert_eq!(rounds.load(Ordering::SeqCst), 1);

        sleep(PERIOD * 2).await;
        assert_eq!(rounds.load(Ordering::SeqCst), 3);
        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    // Starting twice keeps a single loop.
    async fn test_start_is_idempotent() {
        let rounds = Arc::new(AtomicUsize::new(0));
        let mut poller = Poller::new(PERIOD);
        assert!(poller.start(refresher(counting_contract(rounds.clone())), event_sender()));
        assert!(!poller.start(refresher(counting_contract(rounds.clone())), event_sender()));
        assert!(poller.is_active());

        sleep(PERIOD + Duration::from_secs(5)).await;
        assert_eq!(rounds.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    // No refresh happens after stop, even well past the interval.
    async fn test_stop_releases_the_loop() {
        let rounds = Arc::new(AtomicUsize::new(0));
        let mut poller = Poller::new(PERIOD);
        poller.start(refresher(counting_contract(rounds.clone())), event_sender());
        sleep(Duration::from_secs(1)).await;
        assert_eq!(rounds.load(Ordering::SeqCst), 1);

        assert!(poller.stop());
        assert!(!poller.is_active());
        assert!(!poller.stop());

        sleep(PERIOD * 3).await;
        assert_eq!(rounds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    // Dropping the poller cancels its loop.
    async fn test_drop_cancels_the_loop() {
        let rounds = Arc::new(AtomicUsize::new(0));
        {
            let mut poller = Poller::new(PERIOD);
            poller.start(refresher(counting_contract(rounds.clone())), event_sender());
            sleep(Duration::from_secs(1)).await;
        }
        sleep(PERIOD * 3).await;
        assert_eq!(rounds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    // A loop can be started again after being stopped.
    async fn test_restart_after_stop() {
        let rounds = Arc::new(AtomicUsize::new(0));
        let mut poller = Poller::new(PERIOD);
        poller.start(refresher(mock_contract(None)), event_sender());
        poller.stop();
        assert!(poller.start(refresher(counting_contract(rounds.clone())), event_sender()));
        sleep(Duration::from_secs(1)).await;
        assert_eq!(rounds.load(Ordering::SeqCst), 1);
    }
}
