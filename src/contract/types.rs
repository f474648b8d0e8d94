//! Value types exchanged with the contract binding.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub use ethers::types::{Address, TxHash, U256};

/// Bond terms offered by the contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BondType {
    /// 1-year bond, 25% return.
    #[default]
    OneYear,
    /// 2-year bond, 60% return.
    TwoYear,
}

impl BondType {
    /// The selector value the contract expects.
    pub fn code(&self) -> U256 {
        match self {
            BondType::OneYear => U256::from(1u8),
            BondType::TwoYear => U256::from(2u8),
        }
    }
}

impl FromStr for BondType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(BondType::OneYear),
            "2" => Ok(BondType::TwoYear),
            other => Err(format!("Unknown bond type {:?}, expected 1 or 2", other)),
        }
    }
}

impl Display for BondType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BondType::OneYear => write!(f, "1-Year Bond (25% return)"),
            BondType::TwoYear => write!(f, "2-Year Bond (60% return)"),
        }
    }
}

/// Raw balances returned by `getTokenBalances`, 18-decimal fixed point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawBalances {
    pub dpg: U256,
    pub dai: U256,
    pub dpb: U256,
}

/// A submitted transaction that has not been confirmed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    pub hash: TxHash,
}

impl PendingTransaction {
    pub fn new(hash: TxHash) -> Self {
        Self { hash }
    }
}

/// A mined, successful transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub hash: TxHash,
    pub block_number: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_parse_case_insensitively() {
        let text = "0x1234567890abcdef1234567890abcdef12345678";
        let address: Address = text.parse().unwrap();
        assert_eq!(format!("{:?}", address), text);

        let upper: Address = "0x1234567890ABCDEF1234567890ABCDEF12345678".parse().unwrap();
        assert_eq!(upper, address);
        assert!("0x1234".parse::<Address>().is_err());
    }

    #[test]
    fn bond_type_codes() {
        assert_eq!("1".parse::<BondType>().unwrap().code(), U256::one());
        assert_eq!("2".parse::<BondType>().unwrap(), BondType::TwoYear);
        assert_eq!(BondType::TwoYear.code(), U256::from(2u8));
        assert!("3".parse::<BondType>().is_err());
        assert_eq!(BondType::default(), BondType::OneYear);
    }
}
