//! Slot-indexed cache of validator registrations fetched from a remote relay.
//!
//! # Consistency
//!
//! The cache answers from whatever snapshot it holds. When a lookup lands in an
//! epoch newer than the last successful sync, it fires a background resync and
//! still answers immediately from the old snapshot:
//!
//! ```text
//! get_validator_for_slot(slot)
//!       |
//!       |-- epoch(slot) > epoch(last sync)? --> tokio::spawn(resync, then compliance lists)
//!       |
//!       v
//! local override? --> cached entry? --> ValidatorNotFound
//! ```
//!
//! Only one resync runs at a time. A second attempt fails with
//! [`RelayError::SyncBusy`] instead of queueing. A successful resync swaps the
//! whole slot map under the write lock; a failed one leaves it untouched.
//!
//! # Locking
//!
//! The slot map and the compliance registry have separate locks. The only place
//! both are involved is [`RemoteRelay::resync_compliance_lists`], which collects
//! list names under the slot-map read lock and releases it before the registry
//! write lock is taken.

use alloy::primitives::Address;
use relay_compliance::ComplianceListRegistry;
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use crate::error::RelayError;
use crate::from_env::RelayConfig;
use crate::local_relay::LocalValidatorSource;
use crate::transport::{HttpRelayTransport, RelayTransport};
use crate::types::{
    DataVersion, GetValidatorRelayResponse, PubkeyHex, SubmitBlockPayload, SubmitBody, ValidatorData,
};

pub const SLOTS_PER_EPOCH: u64 = 32;
/// Extra attempts made while constructing the cache.
pub const STARTUP_RETRIES: u32 = 3;
/// Extra attempts made by a lookup-triggered resync.
pub const LOOKUP_RETRIES: u32 = 1;
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
struct ValidatorState {
    slot_map: HashMap<u64, ValidatorData>,
    last_synced_slot: Option<u64>,
}

struct RelayInner {
    config: RelayConfig,
    transport: Arc<dyn RelayTransport>,
    compliance: Arc<ComplianceListRegistry>,
    local_relay: Option<Arc<dyn LocalValidatorSource>>,
    cancellations_enabled: bool,
    retry_delay: Duration,
    validators: RwLock<ValidatorState>,
    sync_ongoing: AtomicBool,
}

impl RelayInner {
    fn read_validators(&self) -> RwLockReadGuard<'_, ValidatorState> {
        self.validators.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_validators(&self) -> RwLockWriteGuard<'_, ValidatorState> {
        self.validators.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the single sync slot; releases it on drop, success or not.
struct SyncGuard<'a>(&'a AtomicBool);

impl<'a> SyncGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SyncGuard(flag))
    }
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Builder for [`RemoteRelay`].
pub struct RemoteRelayBuilder {
    config: RelayConfig,
    transport: Arc<dyn RelayTransport>,
    compliance: Option<Arc<ComplianceListRegistry>>,
    local_relay: Option<Arc<dyn LocalValidatorSource>>,
    cancellations_enabled: bool,
    retry_delay: Duration,
}

impl RemoteRelayBuilder {
    pub fn new(config: RelayConfig, transport: Arc<dyn RelayTransport>) -> Self {
        Self {
            config,
            transport,
            compliance: None,
            local_relay: None,
            cancellations_enabled: false,
            retry_delay: RETRY_DELAY,
        }
    }

    /// Registry that fetched compliance lists are merged into. Defaults to
    /// [`ComplianceListRegistry::global`].
    pub fn with_compliance_registry(mut self, registry: Arc<ComplianceListRegistry>) -> Self {
        self.compliance = Some(registry);
        self
    }

    pub fn with_local_relay(mut self, local_relay: Arc<dyn LocalValidatorSource>) -> Self {
        self.local_relay = Some(local_relay);
        self
    }

    pub fn with_cancellations(mut self, enabled: bool) -> Self {
        self.cancellations_enabled = enabled;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Builds the cache and runs the startup sync.
    ///
    /// The startup sync is best effort: if the relay cannot be reached the
    /// cache starts empty and fills in on the first epoch-triggered resync.
    /// Must be called from within a tokio runtime; background resyncs are
    /// spawned onto that runtime.
    pub async fn build(self) -> RemoteRelay {
        let inner = RelayInner {
            config: self.config,
            transport: self.transport,
            compliance: self.compliance.unwrap_or_else(ComplianceListRegistry::global),
            local_relay: self.local_relay,
            cancellations_enabled: self.cancellations_enabled,
            retry_delay: self.retry_delay,
            validators: RwLock::new(ValidatorState::default()),
            sync_ongoing: AtomicBool::new(false),
        };
        let relay = RemoteRelay {
            inner: Arc::new(inner),
            runtime: Handle::current(),
        };

        if let Err(e) = relay.resync(0, STARTUP_RETRIES).await {
            error!(error = %e, "Could not connect to remote relay to update validators map, continuing anyway");
        }

        if relay.inner.config.compliance_lists_enabled {
            if let Err(e) = relay.resync_compliance_lists(0, STARTUP_RETRIES).await {
                error!(error = %e, "Could not connect to remote relay to update compliance lists, continuing anyway");
            }
        }

        relay
    }
}

/// Validator registration cache backed by one remote relay.
///
/// Cheap to clone; clones share the same cache.
#[derive(Clone)]
pub struct RemoteRelay {
    inner: Arc<RelayInner>,
    runtime: Handle,
}

impl std::fmt::Debug for RemoteRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteRelay")
            .field("endpoint", &self.inner.config.endpoint.as_str())
            .field("last_synced_slot", &self.last_synced_slot())
            .finish()
    }
}

impl RemoteRelay {
    /// Creates a cache talking HTTP to `config.endpoint` and feeding the global
    /// compliance registry.
    pub async fn new(
        config: RelayConfig,
        local_relay: Option<Arc<dyn LocalValidatorSource>>,
        cancellations_enabled: bool,
    ) -> Result<Self, RelayError> {
        let transport = Arc::new(HttpRelayTransport::new(config.clone())?);
        let mut builder = RemoteRelayBuilder::new(config, transport).with_cancellations(cancellations_enabled);
        if let Some(local_relay) = local_relay {
            builder = builder.with_local_relay(local_relay);
        }
        Ok(builder.build().await)
    }

    pub fn builder(config: RelayConfig, transport: Arc<dyn RelayTransport>) -> RemoteRelayBuilder {
        RemoteRelayBuilder::new(config, transport)
    }

    pub fn config(&self) -> &RelayConfig {
        &self.inner.config
    }

    pub fn compliance_registry(&self) -> &Arc<ComplianceListRegistry> {
        &self.inner.compliance
    }

    /// Slot passed to the last successful resync, `None` before the first one.
    pub fn last_synced_slot(&self) -> Option<u64> {
        self.inner.read_validators().last_synced_slot
    }

    pub fn validator_count(&self) -> usize {
        self.inner.read_validators().slot_map.len()
    }

    pub fn is_syncing(&self) -> bool {
        self.inner.sync_ongoing.load(Ordering::Acquire)
    }

    /// Returns the registration a block for `next_slot` must honor.
    ///
    /// `next_slot` is expected to come from the chain's own clock: a lookup far
    /// in the future moves the sync epoch forward and postpones later resyncs.
    ///
    /// Never waits on the network. If `next_slot` starts an epoch newer than the
    /// last sync, a resync is spawned in the background and this call answers
    /// from the current snapshot. A local override wins over the cached entry.
    pub fn get_validator_for_slot(&self, next_slot: u64) -> Result<ValidatorData, RelayError> {
        let (stale, cached) = {
            let state = self.inner.read_validators();
            let stale = match state.last_synced_slot {
                None => true,
                Some(last) => next_slot / SLOTS_PER_EPOCH > last / SLOTS_PER_EPOCH,
            };
            (stale, state.slot_map.get(&next_slot).cloned())
        };

        if stale {
            self.spawn_epoch_resync(next_slot);
        }

        self.resolve(next_slot, cached)
    }

    /// Same answer as [`get_validator_for_slot`](Self::get_validator_for_slot)
    /// without ever triggering a resync.
    pub fn peek_validator_for_slot(&self, slot: u64) -> Result<ValidatorData, RelayError> {
        let cached = self.inner.read_validators().slot_map.get(&slot).cloned();
        self.resolve(slot, cached)
    }

    fn resolve(&self, slot: u64, cached: Option<ValidatorData>) -> Result<ValidatorData, RelayError> {
        if let Some(local) = self
            .inner
            .local_relay
            .as_ref()
            .and_then(|local| local.validator_for_slot(slot))
        {
            info!(slot, pubkey = %local.pubkey, "Validator registration overwritten by local data");
            return Ok(local);
        }

        cached.ok_or(RelayError::ValidatorNotFound)
    }

    fn spawn_epoch_resync(&self, slot: u64) {
        let relay = self.clone();
        self.runtime.spawn(async move {
            match relay.resync(slot, LOOKUP_RETRIES).await {
                Ok(_) => {}
                Err(RelayError::SyncBusy) => {
                    debug!(slot, "Validator sync already in flight");
                    return;
                }
                Err(e) => error!(slot, error = %e, "Could not update validators map"),
            }

            if relay.inner.config.compliance_lists_enabled {
                if let Err(e) = relay.resync_compliance_lists(slot, LOOKUP_RETRIES).await {
                    error!(slot, error = %e, "Could not update compliance lists");
                }
            }
        });
    }

    /// Refetches the slot map, making up to `retries + 1` attempts.
    ///
    /// Fails with [`RelayError::SyncBusy`] right away if another resync is
    /// running. On success the map is replaced wholesale and `target_slot` is
    /// recorded as the last synced slot. Returns the number of registrations.
    pub async fn resync(&self, target_slot: u64, retries: u32) -> Result<usize, RelayError> {
        let _guard = SyncGuard::try_acquire(&self.inner.sync_ongoing).ok_or(RelayError::SyncBusy)?;

        info!(current_slot = target_slot, "Requesting validators");
        let new_map = with_retries("validators map", retries, self.inner.retry_delay, || {
            self.fetch_slot_validator_map()
        })
        .await
        .inspect_err(|e| error!(error = %e, "Could not get validators map from relay"))?;

        let count = new_map.len();
        {
            let mut state = self.inner.write_validators();
            state.slot_map = new_map;
            state.last_synced_slot = Some(target_slot);
        }

        info!(count, slot = target_slot, "Updated validators");
        Ok(count)
    }

    /// Fetches the compliance lists named by the current slot map and merges
    /// them into the registry. Skips the request when no validator names a list.
    /// Returns the number of lists merged.
    pub async fn resync_compliance_lists(&self, current_slot: u64, retries: u32) -> Result<usize, RelayError> {
        let names = self.requested_compliance_lists();
        if names.is_empty() {
            info!(
                current_slot,
                "Skipping compliance list update, no validator requested a compliance list this epoch"
            );
            return Ok(0);
        }

        info!(current_slot, lists = ?names, "Requesting compliance lists");
        let lists = with_retries("compliance lists", retries, self.inner.retry_delay, || {
            self.inner.transport.get_compliance_lists(&names)
        })
        .await
        .inspect_err(|e| error!(error = %e, "Could not get compliance lists from relay"))?;

        let count = lists.len();
        self.inner.compliance.update_compliance_lists(lists);

        info!(count, slot = current_slot, "Updated compliance lists");
        Ok(count)
    }

    fn requested_compliance_lists(&self) -> BTreeSet<String> {
        self.inner
            .read_validators()
            .slot_map
            .values()
            .filter_map(|data| data.compliance_list.clone())
            .filter(|name| !name.is_empty())
            .collect()
    }

    async fn fetch_slot_validator_map(&self) -> Result<HashMap<u64, ValidatorData>, RelayError> {
        let registrations = self.inner.transport.get_validators().await?;
        Ok(slot_map_from_registrations(registrations))
    }

    /// Sends a block to the relay, as SSZ or JSON depending on the config.
    ///
    /// Not retried: a transport error or non-2xx answer is returned as is.
    pub async fn submit_block(&self, payload: &dyn SubmitBlockPayload) -> Result<(), RelayError> {
        let version = payload.version();
        info!(endpoint = %self.inner.config.endpoint, %version, "Submitting block to remote relay");

        match version {
            DataVersion::Bellatrix | DataVersion::Capella | DataVersion::Deneb => {}
            other => return Err(RelayError::UnknownVersion(other.to_string())),
        }

        let body = if self.inner.config.ssz_enabled {
            SubmitBody::Ssz(payload.to_ssz()?)
        } else {
            SubmitBody::Json(payload.to_json()?)
        };

        self.inner
            .transport
            .submit_block(body, self.inner.cancellations_enabled)
            .await
    }
}

/// Converts relay registrations into the slot map.
///
/// An entry whose fee recipient does not parse is logged and dropped; the rest
/// of the response is kept.
pub fn slot_map_from_registrations(registrations: GetValidatorRelayResponse) -> HashMap<u64, ValidatorData> {
    let mut slot_map = HashMap::with_capacity(registrations.len());
    for registration in registrations {
        let message = registration.entry.message;
        let fee_recipient = match Address::from_str(message.fee_recipient.trim()) {
            Ok(address) => address,
            Err(_) => {
                let e = RelayError::MalformedAddress {
                    slot: registration.slot,
                    value: message.fee_recipient,
                };
                error!(error = %e, pubkey = %message.pubkey, "Ill-formatted fee_recipient from relay");
                continue;
            }
        };

        slot_map.insert(
            registration.slot,
            ValidatorData {
                pubkey: PubkeyHex::new(&message.pubkey),
                fee_recipient,
                gas_limit: message.gas_limit,
                compliance_list: registration.compliance_list.filter(|name| !name.is_empty()),
            },
        );
    }
    slot_map
}

/// Runs `op` up to `retries + 1` times with a fixed `delay` between attempts.
async fn with_retries<T, F, Fut>(what: &str, retries: u32, delay: Duration, mut op: F) -> Result<T, RelayError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RelayError>>,
{
    let mut remaining = retries;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if remaining > 0 => {
                warn!(what, error = %e, remaining, "Relay request failed, retrying");
                tokio::time::sleep(delay).await;
                remaining -= 1;
            }
            Err(e) => return Err(e),
        }
    }
}
