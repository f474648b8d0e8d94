//! Application configuration.

use crate::contract::Address;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Directory under `$HOME` holding the configuration file.
const CONFIG_DIR: &str = ".pegbreaker";
const CONFIG_FILE: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// JSON-RPC endpoint of the node. Empty means "use the environment default".
    #[serde(default)]
    pub rpc_url: String,
    /// Address of the deployed Pegbreaker contract.
    pub contract_address: String,
    /// The account whose balances are shown and which sends transactions.
    pub account: String,
}

impl Config {
    pub fn new(rpc_url: String, contract_address: String, account: String) -> Self {
        Config {
            rpc_url,
            contract_address,
            account,
        }
    }

    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Deletes the configuration file. A missing file is not an error.
    pub fn clear(path: &Path) -> Result<(), std::io::Error> {
        if !path.ends_with(CONFIG_FILE) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Path must end with {}", CONFIG_FILE),
            ));
        }
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(path)
    }

    /// Parses the stored contract and account addresses.
    pub fn addresses(&self) -> Result<(Address, Address), String> {
        let contract = parse_address("contract", &self.contract_address)?;
        let account = parse_address("account", &self.account)?;
        Ok((contract, account))
    }

    /// Fills empty fields from `other`.
    pub fn merged_with(mut self, other: Config) -> Config {
        if self.rpc_url.is_empty() {
            self.rpc_url = other.rpc_url;
        }
        if self.contract_address.is_empty() {
            self.contract_address = other.contract_address;
        }
        if self.account.is_empty() {
            self.account = other.account;
        }
        self
    }
}

/// A `0x`-prefixed, 40-digit hex address.
fn parse_address(label: &str, text: &str) -> Result<Address, String> {
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| format!("Invalid {} address {:?}: missing 0x prefix", label, text))?;
    digits
        .parse::<Address>()
        .map_err(|e| format!("Invalid {} address {:?}: {}", label, text, e))
}

/// `~/.pegbreaker/config.json`
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home = home::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine the home directory",
        )
    })?;
    Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const CONTRACT: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";
    const ACCOUNT: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    fn sample() -> Config {
        Config::new(
            "http://127.0.0.1:8545".to_string(),
            CONTRACT.to_string(),
            ACCOUNT.to_string(),
        )
    }

    #[test]
    // Loading a saved configuration file should return the same configuration.
    fn test_load_recovers_saved_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = sample();
        config.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config, loaded_config);
    }

    #[test]
    // Saving a configuration should create directories if they don't exist.
    fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent_dir").join("config.json");

        let result = sample().save(&path);

        assert!(result.is_ok(), "Failed to save config");
        assert!(
            path.parent().unwrap().exists(),
            "Parent directory does not exist"
        );
    }

    #[test]
    // Saving a configuration should overwrite an existing file.
    fn test_save_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        sample().save(&path).unwrap();

        let mut config2 = sample();
        config2.rpc_url = "https://ethereum-sepolia-rpc.publicnode.com".to_string();
        config2.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config2, loaded_config);
    }

    #[test]
    // Loading an invalid JSON file should return an error.
    fn test_load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid_config.json");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "invalid json").unwrap();

        let result = Config::load_from_file(&path);
        assert!(result.is_err());
    }

    #[test]
    // A file without an RPC URL still loads.
    fn test_rpc_url_is_optional() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            format!(r#"{{"contract_address":"{CONTRACT}","account":"{ACCOUNT}"}}"#),
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert!(config.rpc_url.is_empty());
        assert_eq!(config.account, ACCOUNT);
    }

    #[test]
    // Clearing removes the file and tolerates a missing one.
    fn test_clear_removes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        sample().save(&path).unwrap();

        Config::clear(&path).unwrap();
        assert!(!path.exists());
        assert!(Config::clear(&path).is_ok());
        assert!(Config::clear(&dir.path().join("other.json")).is_err());
    }

    #[test]
    fn test_addresses_are_validated() {
        let (contract, account) = sample().addresses().unwrap();
        assert_eq!(format!("{:?}", contract), CONTRACT);
        assert_eq!(format!("{:?}", account), ACCOUNT);

        let mut bad = sample();
        bad.account = "0x1234".to_string();
        assert!(bad.addresses().is_err());
        bad.account = ACCOUNT.trim_start_matches("0x").to_string();
        assert!(bad.addresses().is_err());
    }

    #[test]
    // Values given explicitly win over stored ones.
    fn test_merge_prefers_explicit_values() {
        let explicit = Config::new(String::new(), String::new(), "0xabc".to_string());
        let merged = explicit.merged_with(sample());
        assert_eq!(merged.account, "0xabc");
        assert_eq!(merged.contract_address, CONTRACT);
        assert_eq!(merged.rpc_url, "http://127.0.0.1:8545");
    }
}
