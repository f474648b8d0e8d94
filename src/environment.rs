use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents the chains the dashboard knows a default RPC endpoint for.
#[derive(Clone, Default, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local development node (anvil, hardhat).
    #[default]
    Local,
    /// Sepolia public testnet.
    Sepolia,
}

impl Environment {
    /// Returns the default JSON-RPC URL associated with the environment.
    pub fn rpc_url(&self) -> String {
        match self {
            Environment::Local => "http://127.0.0.1:8545".to_string(),
            Environment::Sepolia => "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "sepolia" => Ok(Environment::Sepolia),
            _ => Err(()),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Sepolia => write!(f, "Sepolia"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.rpc_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("SEPOLIA".parse::<Environment>(), Ok(Environment::Sepolia));
        assert_eq!("local".parse::<Environment>(), Ok(Environment::Local));
        assert!("mainnet".parse::<Environment>().is_err());
    }
}
