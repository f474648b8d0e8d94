//! Error handling for the contract module

use super::types::TxHash;
use ethers::contract::ContractError as CallError;
use ethers::providers::{JsonRpcClient, Provider, ProviderError, RpcError};
use thiserror::Error;

/// JSON-RPC error code wallets return when the user declines a request (EIP-1193).
pub const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC error code nodes use for a reverted `eth_call`/`eth_estimateGas`.
pub const EXECUTION_REVERTED_CODE: i64 = 3;

#[derive(Debug, Error)]
pub enum ContractError {
    /// Reqwest error, raised while building the HTTP client.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The request never produced a JSON-RPC answer (connection, HTTP status, bad URL).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object.
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The response could not be decoded into the expected shape.
    #[error("Decoding error: {0}")]
    Decode(String),

    /// The transaction was mined but its receipt reports failure.
    #[error("Transaction {0:?} reverted")]
    Reverted(TxHash),

    /// No receipt showed up before the confirmation deadline.
    #[error("Timed out waiting for transaction {0:?}")]
    Timeout(TxHash),
}

impl ContractError {
    /// The wallet behind the endpoint declined to sign or send.
    pub fn is_rejection(&self) -> bool {
        match self {
            ContractError::Rpc { code, message } => {
                *code == USER_REJECTED_CODE
                    || message.to_lowercase().contains("user denied")
                    || message.to_lowercase().contains("user rejected")
            }
            _ => false,
        }
    }

    /// The contract refused the call, either at estimation or once mined.
    pub fn is_revert(&self) -> bool {
        match self {
            ContractError::Reverted(_) => true,
            ContractError::Rpc { message, .. } => message.to_lowercase().contains("revert"),
            _ => false,
        }
    }
}

impl From<ProviderError> for ContractError {
    fn from(e: ProviderError) -> Self {
        if let Some(response) = e.as_error_response() {
            return ContractError::Rpc {
                code: response.code,
                message: response.message.clone(),
            };
        }
        ContractError::Transport(e.to_string())
    }
}

impl<P: JsonRpcClient> From<CallError<Provider<P>>> for ContractError {
    fn from(e: CallError<Provider<P>>) -> Self {
        match e {
            CallError::Revert(data) => ContractError::Rpc {
                code: EXECUTION_REVERTED_CODE,
                message: format!("execution reverted: {}", data),
            },
            CallError::MiddlewareError { e } => e.into(),
            CallError::ProviderError { e } => e.into(),
            CallError::DecodingError(e) => ContractError::Decode(e.to_string()),
            CallError::DetokenizationError(e) => ContractError::Decode(e.to_string()),
            CallError::AbiError(e) => ContractError::Decode(e.to_string()),
            other => ContractError::Transport(other.to_string()),
        }
    }
}
