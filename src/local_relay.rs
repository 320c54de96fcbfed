use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::types::ValidatorData;

/// Source of locally configured registrations that take precedence over the
/// remote relay. Lookups must not touch the network.
pub trait LocalValidatorSource: Send + Sync {
    fn validator_for_slot(&self, slot: u64) -> Option<ValidatorData>;
}

/// In-memory override table.
#[derive(Debug, Default)]
pub struct LocalRelay {
    validators: RwLock<HashMap<u64, ValidatorData>>,
}

impl LocalRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, slot: u64, data: ValidatorData) -> Option<ValidatorData> {
        tracing::info!(slot, pubkey = %data.pubkey, fee_recipient = %data.fee_recipient, "Local validator registration");
        self.validators
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(slot, data)
    }

    pub fn remove(&self, slot: u64) -> Option<ValidatorData> {
        self.validators
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&slot)
    }

    pub fn len(&self) -> usize {
        self.validators.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalValidatorSource for LocalRelay {
    fn validator_for_slot(&self, slot: u64) -> Option<ValidatorData> {
        self.validators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&slot)
            .cloned()
    }
}
