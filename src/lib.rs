//! Validator registration cache for a block builder talking to a remote MEV relay.
//!
//! [`RemoteRelay`] keeps the relay's slot-to-validator map in memory and refreshes
//! it once per epoch in the background. Compliance lists requested by validators
//! are fetched alongside and merged into a shared
//! [`ComplianceListRegistry`](relay_compliance::ComplianceListRegistry).

pub mod error;
pub mod from_env;
pub mod handlers;
pub mod local_relay;
pub mod remote_relay;
pub mod shutdown;
pub mod telemetry;
pub mod transport;
pub mod types;

pub use error::RelayError;
pub use from_env::{RelayConfig, SlotClock};
pub use local_relay::{LocalRelay, LocalValidatorSource};
pub use remote_relay::{RemoteRelay, RemoteRelayBuilder, SLOTS_PER_EPOCH};
pub use transport::{HttpRelayTransport, RelayTransport};
pub use types::{DataVersion, PubkeyHex, SubmitBlockPayload, SubmitBody, ValidatorData};
