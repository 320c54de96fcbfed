//! Validator registration data and the relay wire formats that carry it.

use alloy::primitives::Address;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::error::RelayError;

/// Hex-encoded BLS public key, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PubkeyHex(String);

impl PubkeyHex {
    pub fn new(pubkey: impl AsRef<str>) -> Self {
        Self(pubkey.as_ref().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PubkeyHex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a block built for a given slot has to honor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorData {
    pub pubkey: PubkeyHex,
    pub fee_recipient: Address,
    pub gas_limit: u64,
    /// Compliance list the proposer asked to be screened against, if any.
    pub compliance_list: Option<String>,
}

/// One element of `GET /relay/v1/builder/validators`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorRegistration {
    #[serde(deserialize_with = "quoted_u64")]
    pub slot: u64,
    pub entry: SignedRegistration,
    #[serde(default)]
    pub compliance_list: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedRegistration {
    pub message: RegistrationMessage,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationMessage {
    pub fee_recipient: String,
    #[serde(deserialize_with = "quoted_u64")]
    pub gas_limit: u64,
    #[serde(default, deserialize_with = "quoted_u64")]
    pub timestamp: u64,
    pub pubkey: String,
}

pub type GetValidatorRelayResponse = Vec<ValidatorRegistration>;

/// Accepts both `"123"` and `123`; beacon APIs quote their integers.
fn quoted_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Quoted {
        Str(String),
        Num(u64),
    }

    match Quoted::deserialize(deserializer)? {
        Quoted::Num(n) => Ok(n),
        Quoted::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Consensus fork a block payload was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataVersion {
    Phase0,
    Altair,
    Bellatrix,
    Capella,
    Deneb,
}

impl Display for DataVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataVersion::Phase0 => "phase0",
            DataVersion::Altair => "altair",
            DataVersion::Bellatrix => "bellatrix",
            DataVersion::Capella => "capella",
            DataVersion::Deneb => "deneb",
        };
        f.write_str(name)
    }
}

/// A versioned builder block submission.
///
/// The payload object formats live with the block builder; this crate only
/// needs each version's JSON and SSZ bodies.
pub trait SubmitBlockPayload: Send + Sync {
    fn version(&self) -> DataVersion;

    fn to_json(&self) -> Result<serde_json::Value, RelayError>;

    fn to_ssz(&self) -> Result<Vec<u8>, RelayError>;
}

/// Request body for a block submission, already encoded.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitBody {
    Json(serde_json::Value),
    Ssz(Vec<u8>),
}
