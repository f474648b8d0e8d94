use crate::contract::error::ContractError;
use crate::logging::LogLevel;

/// JSON-RPC code public endpoints use for rate limiting (EIP-1474).
const LIMIT_EXCEEDED_CODE: i64 = -32005;

#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Log level for a failed contract read.
    pub fn classify_read_error(&self, error: &ContractError) -> LogLevel {
        match error {
            // Rate limiting by a public endpoint - the next poll will retry
            ContractError::Rpc { code, .. } if *code == LIMIT_EXCEEDED_CODE => LogLevel::Debug,
            ContractError::Transport(message) if message.contains("429") => LogLevel::Debug,
            // Unreachable or overloaded node - temporary issues
            ContractError::Transport(_) => LogLevel::Warn,

            // Critical: the contract does not answer the way the client expects
            ContractError::Decode(_) => LogLevel::Error,
            ContractError::Rpc { .. } if error.is_revert() => LogLevel::Error,

            // Network issues - usually temporary
            _ => LogLevel::Warn,
        }
    }

    /// Log level for a failed transaction.
    pub fn classify_transaction_error(&self, error: &ContractError) -> LogLevel {
        match error {
            // The user said no; nothing is wrong
            _ if error.is_rejection() => LogLevel::Info,
            _ if error.is_revert() => LogLevel::Error,
            ContractError::Timeout(_) => LogLevel::Warn,
            ContractError::Decode(_) => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}
