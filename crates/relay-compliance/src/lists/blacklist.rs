use crate::codec::ComplianceMap;
use crate::error::{ComplianceError, Result};
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistEntry {
    pub account_type: String,
    pub wallet: String,
    pub reason: String,
}

/// Operator-maintained blacklist, checked alongside whichever list a validator asked for.
#[derive(Debug, Clone)]
pub struct Blacklist {
    addresses: ComplianceMap,
    entries: Vec<BlacklistEntry>,
}

impl Blacklist {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ComplianceError::ListLoadError(format!("Failed to read blacklist file: {}", e))
        })?;

        Self::from_string(&content)
    }

    /// Parses a JSON array of entries. Only `evm` entries with a well-formed
    /// wallet contribute addresses; the rest are logged and kept as entries.
    pub fn from_string(content: &str) -> Result<Self> {
        let entries: Vec<BlacklistEntry> = serde_json::from_str(content)
            .map_err(|e| ComplianceError::ListLoadError(format!("Failed to parse blacklist JSON: {}", e)))?;

        let mut addresses = ComplianceMap::new();

        for entry in &entries {
            if !entry.account_type.eq_ignore_ascii_case("evm") {
                tracing::debug!(
                    account_type = %entry.account_type,
                    wallet = %entry.wallet,
                    "Skipping non-EVM blacklist entry"
                );
                continue;
            }
            match Address::from_str(entry.wallet.trim()) {
                Ok(address) => {
                    addresses.insert(address);
                }
                Err(e) => {
                    tracing::warn!(
                        wallet = %entry.wallet,
                        error = %e,
                        "Ill-formatted EVM wallet in blacklist, skipping"
                    );
                }
            }
        }

        tracing::info!("Loaded blacklist: {} EVM addresses", addresses.len());

        Ok(Self { addresses, entries })
    }

    pub fn empty() -> Self {
        Self {
            addresses: ComplianceMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn get_reason(&self, address: &Address) -> Option<String> {
        if !self.addresses.contains(address) {
            return None;
        }
        self.entries
            .iter()
            .find(|e| Address::from_str(e.wallet.trim()).ok().as_ref() == Some(address))
            .map(|e| e.reason.clone())
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.addresses.contains(address)
    }

    pub fn total_blocked(&self) -> usize {
        self.addresses.len()
    }
}

impl Default for Blacklist {
    fn default() -> Self {
        Self::empty()
    }
}

/// A bare address set, with no recorded reasons.
impl From<ComplianceMap> for Blacklist {
    fn from(addresses: ComplianceMap) -> Self {
        Self {
            addresses,
            entries: Vec::new(),
        }
    }
}
