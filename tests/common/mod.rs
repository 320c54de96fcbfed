#![allow(dead_code)]

use alloy::primitives::Address;
use async_trait::async_trait;
use relay_compliance::ComplianceRegistry;
use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

use validator_relay::types::{
    GetValidatorRelayResponse, RegistrationMessage, SignedRegistration, ValidatorRegistration,
};
use validator_relay::{RelayConfig, RelayError, RelayTransport, SubmitBody};

/// Scripted relay: answers with queued results first, then the fallback response.
/// `hold` parks every validators request until `release` is called.
pub struct MockTransport {
    scripted: Mutex<VecDeque<Result<GetValidatorRelayResponse, RelayError>>>,
    fallback: Mutex<GetValidatorRelayResponse>,
    lists: Mutex<ComplianceRegistry>,
    validator_calls: AtomicUsize,
    list_requests: Mutex<Vec<BTreeSet<String>>>,
    submissions: Mutex<Vec<(SubmitBody, bool)>>,
    held: AtomicBool,
    gate: Semaphore,
}

impl MockTransport {
    pub fn new(fallback: GetValidatorRelayResponse) -> Arc<Self> {
        Arc::new(Self {
            scripted: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(fallback),
            lists: Mutex::new(ComplianceRegistry::new()),
            validator_calls: AtomicUsize::new(0),
            list_requests: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
            held: AtomicBool::new(false),
            gate: Semaphore::new(0),
        })
    }

    pub fn push_validators(&self, response: Result<GetValidatorRelayResponse, RelayError>) {
        self.scripted.lock().unwrap().push_back(response);
    }

    pub fn push_failures(&self, count: usize) {
        for _ in 0..count {
            self.push_validators(Err(RelayError::HttpStatus {
                url: "mock".to_string(),
                status: 503,
            }));
        }
    }

    pub fn set_validators(&self, response: GetValidatorRelayResponse) {
        *self.fallback.lock().unwrap() = response;
    }

    pub fn set_lists(&self, lists: ComplianceRegistry) {
        *self.lists.lock().unwrap() = lists;
    }

    pub fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.held.store(false, Ordering::SeqCst);
        self.gate.add_permits(16);
    }

    pub fn validator_calls(&self) -> usize {
        self.validator_calls.load(Ordering::SeqCst)
    }

    pub fn list_requests(&self) -> Vec<BTreeSet<String>> {
        self.list_requests.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<(SubmitBody, bool)> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl RelayTransport for MockTransport {
    async fn get_validators(&self) -> Result<GetValidatorRelayResponse, RelayError> {
        self.validator_calls.fetch_add(1, Ordering::SeqCst);
        if self.held.load(Ordering::SeqCst) {
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }

        let scripted = self.scripted.lock().unwrap().pop_front();
        if let Some(response) = scripted {
            return response;
        }
        let fallback = self.fallback.lock().unwrap().clone();
        Ok(fallback)
    }

    async fn get_compliance_lists(&self, names: &BTreeSet<String>) -> Result<ComplianceRegistry, RelayError> {
        self.list_requests.lock().unwrap().push(names.clone());
        let lists = self.lists.lock().unwrap().clone();
        Ok(lists
            .into_iter()
            .filter(|(name, _)| names.contains(name))
            .collect())
    }

    async fn submit_block(&self, body: SubmitBody, cancellations: bool) -> Result<(), RelayError> {
        self.submissions.lock().unwrap().push((body, cancellations));
        Ok(())
    }
}

pub fn registration(slot: u64, fee_recipient: Address, list: Option<&str>) -> ValidatorRegistration {
    registration_raw(slot, &fee_recipient.to_checksum(None), list)
}

pub fn registration_raw(slot: u64, fee_recipient: &str, list: Option<&str>) -> ValidatorRegistration {
    ValidatorRegistration {
        slot,
        entry: SignedRegistration {
            message: RegistrationMessage {
                fee_recipient: fee_recipient.to_string(),
                gas_limit: 30_000_000,
                timestamp: 1_700_000_000,
                pubkey: format!("0xAB{:04X}", slot),
            },
            signature: "0x00".to_string(),
        },
        compliance_list: list.map(str::to_string),
    }
}

pub fn config() -> RelayConfig {
    RelayConfig::new(Url::parse("http://relay.invalid").unwrap())
}

/// Polls `condition` until it holds, failing the test after two seconds.
pub async fn wait_for(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

/// Gives spawned background work a chance to run.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
