/// Errors surfaced by the relay cache and its transport.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Network failure talking to the relay
    #[error("relay request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// Relay answered with a non-2xx status
    #[error("non-ok response code {status} from relay {url}")]
    HttpStatus { url: String, status: u16 },

    /// Relay answered 2xx with a body we could not parse
    #[error("could not decode relay response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// One registration carried an unparseable fee recipient
    #[error("ill-formatted fee_recipient {value:?} for slot {slot}")]
    MalformedAddress { slot: u64, value: String },

    /// Another resync holds the sync slot
    #[error("validator sync is ongoing")]
    SyncBusy,

    #[error("validator not found")]
    ValidatorNotFound,

    #[error("unknown data version {0}")]
    UnknownVersion(String),

    #[error("could not encode block payload: {0}")]
    PayloadEncoding(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl RelayError {
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            RelayError::Transport { .. } | RelayError::HttpStatus { .. } | RelayError::Decode { .. }
        )
    }
}

