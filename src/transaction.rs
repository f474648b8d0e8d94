//! Transaction requests the dashboard can submit, and how they fail.

use crate::amount::{AmountError, parse_positive_amount};
use crate::contract::{BondType, U256};
use crate::contract::error::ContractError;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Editable input fields of the dashboard.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum InputField {
    #[strum(to_string = "stake amount")]
    StakeAmount,
    /// Shared by minting with DAI and minting with ETH.
    #[strum(to_string = "mint amount")]
    MintAmount,
    #[strum(to_string = "burn amount")]
    BurnAmount,
    #[strum(to_string = "bond type")]
    BondType,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum TransactionKind {
    #[strum(to_string = "stake")]
    Stake,
    #[strum(to_string = "mint with DAI")]
    MintWithDai,
    #[strum(to_string = "mint with ETH")]
    MintWithEth,
    #[strum(to_string = "burn DPG")]
    BurnDpg,
    #[strum(to_string = "issue bond")]
    IssueBond,
}

impl TransactionKind {
    /// The input field this transaction reads its argument from.
    pub fn input_field(&self) -> InputField {
        match self {
            TransactionKind::Stake => InputField::StakeAmount,
            TransactionKind::MintWithDai | TransactionKind::MintWithEth => InputField::MintAmount,
            TransactionKind::BurnDpg => InputField::BurnAmount,
            TransactionKind::IssueBond => InputField::BondType,
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            TransactionKind::Stake => "Stake successful!",
            TransactionKind::MintWithDai => "Mint with DAI successful!",
            TransactionKind::MintWithEth => "Mint with ETH successful!",
            TransactionKind::BurnDpg => "Burn DPG successful!",
            TransactionKind::IssueBond => "Bond issued successfully!",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            TransactionKind::Stake => "Failed to stake tokens.",
            TransactionKind::MintWithDai => "Failed to mint with DAI.",
            TransactionKind::MintWithEth => "Failed to mint with ETH.",
            TransactionKind::BurnDpg => "Failed to burn DPG.",
            TransactionKind::IssueBond => "Failed to issue bond.",
        }
    }
}

/// A transaction with its user-entered argument, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionRequest {
    Stake(String),
    MintWithDai(String),
    MintWithEth(String),
    BurnDpg(String),
    IssueBond(BondType),
}

impl TransactionRequest {
    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionRequest::Stake(_) => TransactionKind::Stake,
            TransactionRequest::MintWithDai(_) => TransactionKind::MintWithDai,
            TransactionRequest::MintWithEth(_) => TransactionKind::MintWithEth,
            TransactionRequest::BurnDpg(_) => TransactionKind::BurnDpg,
            TransactionRequest::IssueBond(_) => TransactionKind::IssueBond,
        }
    }

    /// The raw amount for amount-based kinds.
    pub fn amount(&self) -> Option<&str> {
        match self {
            TransactionRequest::Stake(amount)
            | TransactionRequest::MintWithDai(amount)
            | TransactionRequest::MintWithEth(amount)
            | TransactionRequest::BurnDpg(amount) => Some(amount),
            TransactionRequest::IssueBond(_) => None,
        }
    }
}

impl TransactionRequest {
    /// Builds a request of `kind` from the raw text of its input field.
    pub fn from_input(kind: TransactionKind, raw: String) -> Result<Self, TransactionError> {
        Ok(match kind {
            TransactionKind::Stake => TransactionRequest::Stake(raw),
            TransactionKind::MintWithDai => TransactionRequest::MintWithDai(raw),
            TransactionKind::MintWithEth => TransactionRequest::MintWithEth(raw),
            TransactionKind::BurnDpg => TransactionRequest::BurnDpg(raw),
            TransactionKind::IssueBond => TransactionRequest::IssueBond(
                raw.parse::<BondType>()
                    .map_err(TransactionError::invalid_bond_type)?,
            ),
        })
    }

    /// Validates the argument and converts amounts to 18-decimal fixed point.
    pub fn validate(&self) -> Result<ContractCall, TransactionError> {
        let units = |raw: &str| {
            parse_positive_amount(raw)
                .map_err(|e| TransactionError::invalid_amount(self.kind().input_field(), &e))
        };
        Ok(match self {
            TransactionRequest::Stake(raw) => ContractCall::StakeDpg(units(raw)?),
            TransactionRequest::MintWithDai(raw) => ContractCall::MintDpgWithDai(units(raw)?),
            TransactionRequest::MintWithEth(raw) => ContractCall::MintDpgWithEth(units(raw)?),
            TransactionRequest::BurnDpg(raw) => ContractCall::BurnDpg(units(raw)?),
            TransactionRequest::IssueBond(bond_type) => ContractCall::IssueBond(*bond_type),
        })
    }
}

/// A validated transaction, ready to be sent. Amounts are fixed-point integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractCall {
    StakeDpg(U256),
    MintDpgWithDai(U256),
    MintDpgWithEth(U256),
    BurnDpg(U256),
    IssueBond(BondType),
}

impl Display for TransactionRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionRequest::IssueBond(bond_type) => write!(f, "issue bond: {}", bond_type),
            other => write!(f, "{} {}", other.kind(), other.amount().unwrap_or_default()),
        }
    }
}

/// Builds the message shown when an input does not validate.
pub fn validation_message(field: InputField) -> String {
    match field {
        InputField::BondType => "Please select a valid bond type.".to_string(),
        amount => format!("Please enter a valid {}.", amount),
    }
}

#[derive(Debug, Error)]
pub enum TransactionError {
    /// The input did not validate; nothing was sent.
    #[error("{message}")]
    Validation {
        field: InputField,
        message: String,
        reason: String,
    },

    /// The wallet declined to sign or send.
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: ContractError,
    },

    /// The contract refused the transaction.
    #[error("{message}")]
    Reverted {
        message: String,
        #[source]
        source: ContractError,
    },

    /// Transport failures, timeouts and malformed responses.
    #[error("{message}")]
    Unknown {
        message: String,
        #[source]
        source: ContractError,
    },

    #[error("No account connected.")]
    NotConnected,
}

impl TransactionError {
    pub fn invalid_amount(field: InputField, error: &AmountError) -> Self {
        TransactionError::Validation {
            field,
            message: validation_message(field),
            reason: error.to_string(),
        }
    }

    pub fn invalid_bond_type(reason: String) -> Self {
        TransactionError::Validation {
            field: InputField::BondType,
            message: validation_message(InputField::BondType),
            reason,
        }
    }

    /// Wraps a contract failure with the kind-specific user message.
    pub fn from_contract(kind: TransactionKind, source: ContractError) -> Self {
        let message = kind.failure_message().to_string();
        if source.is_rejection() {
            TransactionError::Rejected { message, source }
        } else if source.is_revert() {
            TransactionError::Reverted { message, source }
        } else {
            TransactionError::Unknown { message, source }
        }
    }

    /// Whether the failure happened before anything was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, TransactionError::Validation { .. })
    }
}
