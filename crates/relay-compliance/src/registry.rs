//! Named sanctions lists shared by every compliance check in the process.
//!
//! The registry starts with the built-in [`OFAC`](crate::lists::ofac::OFAC) list.
//! Updates only ever upsert whole lists by name, so a list fetched for one
//! validator never evicts a list another validator still relies on. A separate
//! supplementary list (the operator blacklist) is screened on every check.

use alloy::primitives::Address;
use chrono::Utc;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::codec::{ComplianceMap, ComplianceRegistry};
use crate::config::Config;
use crate::error::Result;
use crate::lists::blacklist::Blacklist;
use crate::lists::ofac::{default_ofac_list, OFAC};
use crate::lists::ListMetadata;

static GLOBAL: Lazy<Arc<ComplianceListRegistry>> =
    Lazy::new(|| Arc::new(ComplianceListRegistry::new()));

#[derive(Debug, Default)]
struct RegistryState {
    lists: HashMap<String, ComplianceMap>,
    metadata: HashMap<String, ListMetadata>,
    supplementary: Blacklist,
}

impl RegistryState {
    fn upsert(&mut self, name: String, list: ComplianceMap) -> ListMetadata {
        let metadata = ListMetadata {
            name: name.clone(),
            record_count: list.len(),
            checksum: list.checksum(),
            updated_at: Utc::now(),
        };
        self.metadata.insert(name.clone(), metadata.clone());
        self.lists.insert(name, list);
        metadata
    }
}

#[derive(Debug)]
pub struct ComplianceListRegistry {
    state: RwLock<RegistryState>,
}

impl Default for ComplianceListRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceListRegistry {
    /// Creates a registry holding only the built-in OFAC list.
    pub fn new() -> Self {
        let mut state = RegistryState::default();
        state.upsert(OFAC.to_string(), default_ofac_list());
        Self {
            state: RwLock::new(state),
        }
    }

    /// Process-wide instance for callers that have no registry wired in.
    pub fn global() -> Arc<ComplianceListRegistry> {
        Arc::clone(&GLOBAL)
    }

    /// Builds a registry from `config`: loads the blacklist as the supplementary
    /// list and merges the binary snapshot, when either is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = Self::new();
        if let Some(path) = &config.blacklist_path {
            registry.set_blacklist(Blacklist::from_file(path)?);
        }
        if let Some(path) = &config.snapshot_path {
            if path.exists() {
                registry.load_snapshot_file(path)?;
            } else {
                tracing::warn!(path = %path.display(), "Compliance snapshot not found, starting from built-in lists");
            }
        }
        Ok(registry)
    }

    pub fn with_supplementary_list(self, list: ComplianceMap) -> Self {
        self.set_supplementary_list(list);
        self
    }

    /// Replaces the list screened on every check regardless of the list name.
    pub fn set_supplementary_list(&self, list: ComplianceMap) {
        self.set_blacklist(Blacklist::from(list));
    }

    /// Same as [`set_supplementary_list`](Self::set_supplementary_list), keeping
    /// the blacklist's per-address reasons for audit logging.
    pub fn set_blacklist(&self, blacklist: Blacklist) {
        tracing::info!(address_count = blacklist.total_blocked(), "Supplementary compliance list set");
        self.write().supplementary = blacklist;
    }

    /// Reason recorded for `address` in the supplementary blacklist, if any.
    pub fn supplementary_reason(&self, address: &Address) -> Option<String> {
        self.read().supplementary.get_reason(address)
    }

    /// Returns `true` when none of `addresses` is sanctioned.
    ///
    /// `list_name` selects the list; an empty or unregistered name falls back to
    /// the OFAC list. The supplementary list is always consulted too. Both
    /// lookups happen under one read guard so a concurrent update cannot be
    /// observed halfway.
    pub fn check_compliance(&self, list_name: &str, addresses: &[Address]) -> bool {
        let state = self.read();

        let resolved = if list_name.is_empty() {
            OFAC
        } else if state.lists.contains_key(list_name) {
            list_name
        } else {
            tracing::warn!(list = %list_name, "Compliance list not found, using OFAC list as a backup");
            OFAC
        };

        if let Some(list) = state.lists.get(resolved) {
            if let Some(hit) = addresses.iter().find(|a| list.contains(a)) {
                tracing::warn!(target: "compliance_audit", list = %resolved, address = %hit, "Sanctioned address detected");
                return false;
            }
        }

        if let Some(hit) = addresses.iter().find(|a| state.supplementary.contains(a)) {
            let reason = state.supplementary.get_reason(hit);
            tracing::warn!(
                target: "compliance_audit",
                list = "supplementary",
                address = %hit,
                reason = reason.as_deref().unwrap_or("unspecified"),
                "Sanctioned address detected"
            );
            return false;
        }

        true
    }

    /// Replaces each named list in `new_entries`; other lists are untouched.
    pub fn update_compliance_lists(&self, new_entries: ComplianceRegistry) {
        let mut state = self.write();
        for (name, list) in new_entries {
            let metadata = state.upsert(name, list);
            tracing::info!(
                list = %metadata.name,
                address_count = metadata.record_count,
                checksum = %metadata.checksum,
                "Compliance list updated"
            );
        }
    }

    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().lists.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn list_metadata(&self, name: &str) -> Option<ListMetadata> {
        self.read().metadata.get(name).cloned()
    }

    /// Copy of every named list (the supplementary list is not included).
    pub fn snapshot(&self) -> ComplianceRegistry {
        self.read()
            .lists
            .iter()
            .map(|(name, list)| (name.clone(), list.clone()))
            .collect()
    }

    /// Writes [`snapshot`](Self::snapshot) to `path` in the binary encoding.
    pub fn persist_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.snapshot().encode();
        fs::write(path.as_ref(), &bytes)?;
        tracing::info!(path = %path.as_ref().display(), bytes = bytes.len(), "Compliance snapshot written");
        Ok(())
    }

    /// Decodes a binary snapshot and merges it in. Nothing is merged if the
    /// file fails to decode. Returns the number of lists merged.
    pub fn load_snapshot_file<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let bytes = fs::read(path.as_ref())?;
        let snapshot = ComplianceRegistry::decode(&bytes)?;
        let count = snapshot.len();
        self.update_compliance_lists(snapshot);
        tracing::info!(path = %path.as_ref().display(), lists = count, "Compliance snapshot loaded");
        Ok(count)
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
