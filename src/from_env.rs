use std::env;
use std::time::Duration;
use url::Url;

use crate::error::RelayError;

pub const ENV_RELAY_ENDPOINT: &str = "RELAY_ENDPOINT";
pub const ENV_RELAY_SSZ_ENABLED: &str = "RELAY_SSZ_ENABLED";
pub const ENV_RELAY_GZIP_ENABLED: &str = "RELAY_GZIP_ENABLED";
pub const ENV_RELAY_COMPLIANCE_LISTS_ENABLED: &str = "RELAY_COMPLIANCE_LISTS_ENABLED";
pub const ENV_RELAY_CANCELLATIONS_ENABLED: &str = "RELAY_CANCELLATIONS_ENABLED";
pub const ENV_RELAY_REQUEST_TIMEOUT_MS: &str = "RELAY_REQUEST_TIMEOUT_MS";
pub const ENV_GENESIS_TIME: &str = "GENESIS_TIME";
pub const ENV_SECONDS_PER_SLOT: &str = "SECONDS_PER_SLOT";

/// Timeout applied to every relay request unless overridden.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_SECONDS_PER_SLOT: u64 = 12;

/// Settings for talking to one remote relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub endpoint: Url,
    /// Submit blocks as SSZ instead of JSON.
    pub ssz_enabled: bool,
    /// Gzip SSZ submissions and send them with `Content-Encoding: gzip`.
    pub gzip_enabled: bool,
    /// Fetch the compliance lists validators ask for.
    pub compliance_lists_enabled: bool,
    pub request_timeout: Duration,
}

impl RelayConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            ssz_enabled: false,
            gzip_enabled: false,
            compliance_lists_enabled: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_ssz(mut self, enabled: bool) -> Self {
        self.ssz_enabled = enabled;
        self
    }

    pub fn with_gzip(mut self, enabled: bool) -> Self {
        self.gzip_enabled = enabled;
        self
    }

    pub fn with_compliance_lists(mut self, enabled: bool) -> Self {
        self.compliance_lists_enabled = enabled;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// `endpoint` + `path` with no doubled slash.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.endpoint.as_str().trim_end_matches('/'), path)
    }

    /// Reads `RELAY_ENDPOINT` (required) and the optional `RELAY_*` flags.
    pub fn from_env() -> Result<Self, RelayError> {
        let endpoint = env::var(ENV_RELAY_ENDPOINT)
            .map_err(|_| RelayError::Config(format!("env {} not set", ENV_RELAY_ENDPOINT)))?;
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| RelayError::Config(format!("invalid {} {:?}: {}", ENV_RELAY_ENDPOINT, endpoint, e)))?;

        let request_timeout = match env::var(ENV_RELAY_REQUEST_TIMEOUT_MS) {
            Ok(ms) => ms
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| RelayError::Config(format!("invalid {}: {}", ENV_RELAY_REQUEST_TIMEOUT_MS, e)))?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            endpoint,
            ssz_enabled: env_flag(ENV_RELAY_SSZ_ENABLED),
            gzip_enabled: env_flag(ENV_RELAY_GZIP_ENABLED),
            compliance_lists_enabled: env_flag(ENV_RELAY_COMPLIANCE_LISTS_ENABLED),
            request_timeout,
        })
    }
}

/// Whether block submissions ask the relay to allow later cancellation.
pub fn cancellations_from_env() -> bool {
    env_flag(ENV_RELAY_CANCELLATIONS_ENABLED)
}

/// `true`, `TRUE`, `1` and `yes` enable a flag; anything else (or unset) disables it.
pub fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Wall-clock to slot conversion for the host chain.
#[derive(Debug, Clone, Copy)]
pub struct SlotClock {
    pub genesis_time: u64,
    pub seconds_per_slot: u64,
}

impl SlotClock {
    /// Returns `None` when `GENESIS_TIME` is unset.
    pub fn from_env() -> Result<Option<Self>, RelayError> {
        let Ok(genesis) = env::var(ENV_GENESIS_TIME) else {
            return Ok(None);
        };
        let genesis_time = genesis
            .parse::<u64>()
            .map_err(|e| RelayError::Config(format!("invalid {}: {}", ENV_GENESIS_TIME, e)))?;
        let seconds_per_slot = match env::var(ENV_SECONDS_PER_SLOT) {
            Ok(s) => s
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| RelayError::Config(format!("invalid {}: {:?}", ENV_SECONDS_PER_SLOT, s)))?,
            Err(_) => DEFAULT_SECONDS_PER_SLOT,
        };
        Ok(Some(Self {
            genesis_time,
            seconds_per_slot,
        }))
    }

    pub fn slot_at(&self, unix_seconds: u64) -> u64 {
        unix_seconds.saturating_sub(self.genesis_time) / self.seconds_per_slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_trims_slash() {
        let config = RelayConfig::new(Url::parse("https://relay.example.com/").unwrap());
        assert_eq!(
            config.url_for("/relay/v1/builder/validators"),
            "https://relay.example.com/relay/v1/builder/validators"
        );
    }

    #[test]
    fn test_env_flag() {
        env::set_var("TEST_VALIDATOR_RELAY_FLAG", "TRUE");
        assert!(env_flag("TEST_VALIDATOR_RELAY_FLAG"));
        env::set_var("TEST_VALIDATOR_RELAY_FLAG", "0");
        assert!(!env_flag("TEST_VALIDATOR_RELAY_FLAG"));
        env::remove_var("TEST_VALIDATOR_RELAY_FLAG");
        assert!(!env_flag("TEST_VALIDATOR_RELAY_FLAG"));
    }

    #[test]
    fn test_from_env_reads_flags() {
        env::set_var(ENV_RELAY_ENDPOINT, "http://relay.local:9000");
        env::set_var(ENV_RELAY_SSZ_ENABLED, "true");
        env::set_var(ENV_RELAY_GZIP_ENABLED, "1");
        env::set_var(ENV_RELAY_REQUEST_TIMEOUT_MS, "250");

        let config = RelayConfig::from_env().unwrap();
        assert_eq!(config.endpoint.as_str(), "http://relay.local:9000/");
        assert!(config.ssz_enabled);
        assert!(config.gzip_enabled);
        assert!(!config.compliance_lists_enabled);
        assert_eq!(config.request_timeout, Duration::from_millis(250));

        for name in [
            ENV_RELAY_ENDPOINT,
            ENV_RELAY_SSZ_ENABLED,
            ENV_RELAY_GZIP_ENABLED,
            ENV_RELAY_REQUEST_TIMEOUT_MS,
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn test_slot_clock() {
        let clock = SlotClock {
            genesis_time: 1_606_824_023,
            seconds_per_slot: 12,
        };
        assert_eq!(clock.slot_at(1_606_824_023), 0);
        assert_eq!(clock.slot_at(1_606_824_023 + 12 * 32 + 5), 32);
        assert_eq!(clock.slot_at(0), 0);
    }
}
