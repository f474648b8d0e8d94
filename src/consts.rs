pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! This module contains all configuration constants for the dashboard client,
    //! organized by functional area for clarity and maintainability.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// Maximum number of buffered events between the controller and the session
    pub const EVENT_QUEUE_SIZE: usize = 100;

    // =============================================================================
    // TOKEN CONFIGURATION
    // =============================================================================

    /// Fixed-point decimals used by token amounts, balances and market caps
    pub const TOKEN_DECIMALS: u32 = 18;

    /// Fixed-point decimals used by the DAI oracle price
    pub const PRICE_DECIMALS: u32 = 8;

    // =============================================================================
    // POLLING CONFIGURATION
    // =============================================================================

    /// Dashboard refresh cadence
    pub mod polling {
        use std::time::Duration;

        /// Interval between two scheduled refresh rounds (milliseconds)
        pub const REFRESH_INTERVAL_MS: u64 = 10_000;

        pub const fn refresh_interval() -> Duration {
            Duration::from_millis(REFRESH_INTERVAL_MS)
        }
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// JSON-RPC transport configuration
    pub mod rpc {
        use std::time::Duration;

        /// Connect timeout for the RPC endpoint (seconds)
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;
        /// Whole-request timeout for a single RPC call (seconds)
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    /// Transaction confirmation configuration
    pub mod confirmation {
        use std::time::Duration;

        /// Delay between two receipt lookups (milliseconds)
        pub const RECEIPT_POLL_INTERVAL_MS: u64 = 1_000;
        /// Give up waiting for a receipt after this long (seconds)
        pub const CONFIRMATION_TIMEOUT_SECS: u64 = 120;

        pub const fn receipt_poll_interval() -> Duration {
            Duration::from_millis(RECEIPT_POLL_INTERVAL_MS)
        }

        pub const fn confirmation_timeout() -> Duration {
            Duration::from_secs(CONFIRMATION_TIMEOUT_SECS)
        }
    }
}
