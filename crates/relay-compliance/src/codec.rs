//! Compact binary encoding of compliance lists.
//!
//! A [`ComplianceMap`] encodes as its member addresses back to back, 20 raw bytes
//! each, in no particular order. A [`ComplianceRegistry`] wraps any number of
//! named maps behind length prefixes. Every length is a little-endian `u64`:
//!
//! ```text
//! registry := count { name_len name map_len map }*count
//! map      := address*
//! ```
//!
//! Decoding checks the remaining buffer before every read, so truncated or
//! hostile input yields a [`CodecError`] instead of a panic or an over-read.
//! The same types also (de)serialize through serde as `name -> [hex address]`,
//! which is the form relays serve over HTTP.

use alloy::primitives::Address;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Width of every length prefix.
pub const LENGTH_SIZE: usize = 8;
/// Width of one encoded address.
pub const ADDRESS_SIZE: usize = 20;

/// Field being read when a decode ran out of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Count,
    NameLength(u64),
    Name(u64),
    MapLength(u64),
    Map(u64),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Count => write!(f, "registry entry count"),
            Field::NameLength(i) => write!(f, "name length of entry {}", i),
            Field::Name(i) => write!(f, "name of entry {}", i),
            Field::MapLength(i) => write!(f, "address set length of entry {}", i),
            Field::Map(i) => write!(f, "address set of entry {}", i),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("buffer too short for {field}: need {needed} bytes, {remaining} remaining")]
    Truncated {
        field: Field,
        needed: u64,
        remaining: usize,
    },

    #[error("name of entry {index} is not valid UTF-8")]
    InvalidName { index: u64 },
}

impl CodecError {
    pub fn field(&self) -> Field {
        match self {
            CodecError::Truncated { field, .. } => *field,
            CodecError::InvalidName { index } => Field::Name(*index),
        }
    }
}

/// One named sanctions list: a set of addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplianceMap(HashSet<Address>);

impl ComplianceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.0.contains(address)
    }

    pub fn insert(&mut self, address: Address) -> bool {
        self.0.insert(address)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.0.iter()
    }

    /// Encoded size in bytes.
    pub fn encoded_len(&self) -> usize {
        self.0.len() * ADDRESS_SIZE
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_to(&mut buf);
        buf
    }

    pub fn encode_to(&self, buf: &mut Vec<u8>) {
        for address in &self.0 {
            buf.extend_from_slice(address.as_slice());
        }
    }

    /// Decodes whole 20-byte chunks; a trailing partial chunk is ignored.
    pub fn decode(buf: &[u8]) -> Self {
        let trailing = buf.len() % ADDRESS_SIZE;
        if trailing != 0 {
            tracing::debug!(
                trailing_bytes = trailing,
                "Address set length is not a multiple of 20, dropping trailing bytes"
            );
        }
        buf.chunks_exact(ADDRESS_SIZE)
            .map(Address::from_slice)
            .collect()
    }

    /// SHA-256 over the sorted member addresses, hex encoded.
    ///
    /// Stable across processes regardless of set iteration order.
    pub fn checksum(&self) -> String {
        let mut sorted: Vec<&Address> = self.0.iter().collect();
        sorted.sort_unstable();
        let mut hasher = Sha256::new();
        for address in sorted {
            hasher.update(address.as_slice());
        }
        hex::encode(hasher.finalize())
    }
}

impl FromIterator<Address> for ComplianceMap {
    fn from_iter<I: IntoIterator<Item = Address>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Address> for ComplianceMap {
    fn extend<I: IntoIterator<Item = Address>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl From<HashSet<Address>> for ComplianceMap {
    fn from(set: HashSet<Address>) -> Self {
        Self(set)
    }
}

impl IntoIterator for ComplianceMap {
    type Item = Address;
    type IntoIter = std::collections::hash_set::IntoIter<Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ComplianceMap {
    type Item = &'a Address;
    type IntoIter = std::collections::hash_set::Iter<'a, Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for ComplianceMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for address in &self.0 {
            seq.serialize_element(&address.to_string())?;
        }
        seq.end()
    }
}

/// Accepts either `["0x..", ..]` or `{"0x..": <anything>, ..}`.
///
/// The object form is what relays emit for a set keyed by address.
impl<'de> Deserialize<'de> for ComplianceMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ComplianceMapVisitor;

        fn parse<E: de::Error>(s: &str) -> Result<Address, E> {
            Address::from_str(s.trim())
                .map_err(|e| E::custom(format!("invalid address {:?}: {}", s, e)))
        }

        impl<'de> Visitor<'de> for ComplianceMapVisitor {
            type Value = ComplianceMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of hex addresses or an object keyed by hex address")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut map = ComplianceMap::new();
                while let Some(s) = seq.next_element::<String>()? {
                    map.insert(parse(&s)?);
                }
                Ok(map)
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = ComplianceMap::new();
                while let Some((key, _)) = access.next_entry::<String, de::IgnoredAny>()? {
                    map.insert(parse(&key)?);
                }
                Ok(map)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(ComplianceMap::new())
            }
        }

        deserializer.deserialize_any(ComplianceMapVisitor)
    }
}

/// Named sanctions lists keyed by list name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplianceRegistry(HashMap<String, ComplianceMap>);

impl ComplianceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, map: ComplianceMap) -> Option<ComplianceMap> {
        self.0.insert(name.into(), map)
    }

    pub fn get(&self, name: &str) -> Option<&ComplianceMap> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ComplianceMap)> {
        self.0.iter()
    }

    pub fn encoded_len(&self) -> usize {
        self.0.iter().fold(LENGTH_SIZE, |size, (name, map)| {
            size + LENGTH_SIZE + name.len() + LENGTH_SIZE + map.encoded_len()
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_to(&mut buf);
        buf
    }

    pub fn encode_to(&self, buf: &mut Vec<u8>) {
        put_len(buf, self.0.len());
        for (name, map) in &self.0 {
            put_len(buf, name.len());
            buf.extend_from_slice(name.as_bytes());
            put_len(buf, map.encoded_len());
            map.encode_to(buf);
        }
    }

    /// Decodes a full registry.
    ///
    /// Either every entry decodes and the registry is returned, or nothing is:
    /// a truncated buffer never yields a partially populated registry. Bytes past
    /// the last declared entry are ignored.
    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        let mut reader = Reader::new(buf);
        let count = reader.read_u64(Field::Count)?;

        let mut registry = HashMap::new();
        for index in 0..count {
            let name_len = reader.read_u64(Field::NameLength(index))?;
            let name = reader.take(name_len, Field::Name(index))?;
            let name = std::str::from_utf8(name).map_err(|_| CodecError::InvalidName { index })?;

            let map_len = reader.read_u64(Field::MapLength(index))?;
            let map = ComplianceMap::decode(reader.take(map_len, Field::Map(index))?);

            registry.insert(name.to_owned(), map);
        }
        Ok(Self(registry))
    }

    pub fn into_inner(self) -> HashMap<String, ComplianceMap> {
        self.0
    }
}

impl FromIterator<(String, ComplianceMap)> for ComplianceRegistry {
    fn from_iter<I: IntoIterator<Item = (String, ComplianceMap)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<HashMap<String, ComplianceMap>> for ComplianceRegistry {
    fn from(map: HashMap<String, ComplianceMap>) -> Self {
        Self(map)
    }
}

impl IntoIterator for ComplianceRegistry {
    type Item = (String, ComplianceMap);
    type IntoIter = std::collections::hash_map::IntoIter<String, ComplianceMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

fn put_len(buf: &mut Vec<u8>, len: usize) {
    buf.extend_from_slice(&(len as u64).to_le_bytes());
}

struct Reader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    fn take(&mut self, len: u64, field: Field) -> Result<&'a [u8], CodecError> {
        let remaining = self.remaining();
        let n = match usize::try_from(len) {
            Ok(n) if n <= remaining => n,
            _ => {
                return Err(CodecError::Truncated {
                    field,
                    needed: len,
                    remaining,
                })
            }
        };
        let slice = &self.buf[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    fn read_u64(&mut self, field: Field) -> Result<u64, CodecError> {
        let bytes = self.take(LENGTH_SIZE as u64, field)?;
        let mut raw = [0u8; LENGTH_SIZE];
        raw.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn registry_of(entries: &[(&str, &[Address])]) -> ComplianceRegistry {
        entries
            .iter()
            .map(|(name, addrs)| (name.to_string(), addrs.iter().copied().collect()))
            .collect()
    }

    #[test]
    fn test_map_encoding_is_raw_addresses() {
        let a = address!("abcdef1234567890abcdef1234567890abcdef12");
        let map: ComplianceMap = [a].into_iter().collect();
        assert_eq!(map.encode(), a.as_slice().to_vec());
        assert_eq!(map.encoded_len(), ADDRESS_SIZE);
    }

    #[test]
    fn test_registry_layout() {
        let a = address!("fedcba0987654321fedcba0987654321fedcba09");
        let registry = registry_of(&[("list2", &[a])]);
        let bytes = registry.encode();

        let mut expected = Vec::new();
        expected.extend_from_slice(&1u64.to_le_bytes());
        expected.extend_from_slice(&5u64.to_le_bytes());
        expected.extend_from_slice(b"list2");
        expected.extend_from_slice(&20u64.to_le_bytes());
        expected.extend_from_slice(a.as_slice());

        assert_eq!(bytes, expected);
        assert_eq!(registry.encoded_len(), expected.len());
    }

    #[test]
    fn test_registry_roundtrip() {
        let registry = registry_of(&[
            (
                "list1",
                &[
                    address!("abcdef1234567890abcdef1234567890abcdef12"),
                    address!("1234567890abcdef1234567890abcdef12345678"),
                ],
            ),
            ("list2", &[address!("fedcba0987654321fedcba0987654321fedcba09")]),
        ]);
        let decoded = ComplianceRegistry::decode(&registry.encode()).unwrap();
        assert_eq!(decoded, registry);
    }

    #[test]
    fn test_empty_registry_roundtrip() {
        let registry = ComplianceRegistry::new();
        let bytes = registry.encode();
        assert_eq!(bytes, 0u64.to_le_bytes().to_vec());
        assert!(ComplianceRegistry::decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_empty_name_and_empty_map_roundtrip() {
        let registry = registry_of(&[("", &[])]);
        let decoded = ComplianceRegistry::decode(&registry.encode()).unwrap();
        assert_eq!(decoded.len(), 1);
        assert!(decoded.get("").unwrap().is_empty());
    }

    #[test]
    fn test_large_entries_roundtrip() {
        let mut registry = ComplianceRegistry::new();
        for j in 0..3u64 {
            let map: ComplianceMap = (1000 * j..1000 * (j + 1))
                .map(|i| Address::left_padding_from(&i.to_be_bytes()))
                .collect();
            let name = if j == 2 { "a".repeat(1000) } else { format!("big_{}", j) };
            registry.insert(name, map);
        }

        let decoded = ComplianceRegistry::decode(&registry.encode()).unwrap();
        assert_eq!(decoded, registry);
        assert_eq!(decoded.get(&"a".repeat(1000)).unwrap().len(), 1000);
    }

    #[test]
    fn test_decode_short_buffer() {
        let err = ComplianceRegistry::decode(&[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            CodecError::Truncated {
                field: Field::Count,
                needed: 8,
                remaining: 3
            }
        );
    }

    #[test]
    fn test_decode_truncated_at_every_boundary() {
        let registry = registry_of(&[
            ("first", &[address!("1111111111111111111111111111111111111111")]),
            ("second", &[address!("2222222222222222222222222222222222222222")]),
        ]);
        let bytes = registry.encode();

        for cut in 0..bytes.len() {
            let result = ComplianceRegistry::decode(&bytes[..cut]);
            assert!(result.is_err(), "decode of {} of {} bytes succeeded", cut, bytes.len());
        }
        assert!(ComplianceRegistry::decode(&bytes).is_ok());
    }

    #[test]
    fn test_decode_reports_entry_index() {
        let registry = registry_of(&[("only", &[address!("1111111111111111111111111111111111111111")])]);
        let mut bytes = registry.encode();
        // Claim a second entry that is not there.
        bytes[..8].copy_from_slice(&2u64.to_le_bytes());

        let err = ComplianceRegistry::decode(&bytes).unwrap_err();
        assert_eq!(err.field(), Field::NameLength(1));
    }

    #[test]
    fn test_decode_huge_length_does_not_panic() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        bytes.extend_from_slice(b"abc");

        let err = ComplianceRegistry::decode(&bytes).unwrap_err();
        assert_eq!(
            err,
            CodecError::Truncated {
                field: Field::Name(0),
                needed: u64::MAX,
                remaining: 3
            }
        );
    }

    #[test]
    fn test_decode_invalid_utf8_name() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.extend_from_slice(&2u64.to_le_bytes());
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(&0u64.to_le_bytes());

        let err = ComplianceRegistry::decode(&bytes).unwrap_err();
        assert_eq!(err, CodecError::InvalidName { index: 0 });
    }

    #[test]
    fn test_map_decode_drops_trailing_bytes() {
        let a = address!("3333333333333333333333333333333333333333");
        let mut bytes = a.as_slice().to_vec();
        bytes.extend_from_slice(&[9, 9, 9]);

        let map = ComplianceMap::decode(&bytes);
        assert_eq!(map.len(), 1);
        assert!(map.contains(&a));
    }

    #[test]
    fn test_registry_with_ragged_map_keeps_following_entries() {
        let a = address!("4444444444444444444444444444444444444444");
        let b = address!("5555555555555555555555555555555555555555");

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2u64.to_le_bytes());
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.extend_from_slice(b"x");
        bytes.extend_from_slice(&23u64.to_le_bytes());
        bytes.extend_from_slice(a.as_slice());
        bytes.extend_from_slice(&[0, 0, 0]);
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.extend_from_slice(b"y");
        bytes.extend_from_slice(&20u64.to_le_bytes());
        bytes.extend_from_slice(b.as_slice());

        let registry = ComplianceRegistry::decode(&bytes).unwrap();
        assert!(registry.get("x").unwrap().contains(&a));
        assert!(registry.get("y").unwrap().contains(&b));
    }

    #[test]
    fn test_checksum_is_order_independent() {
        let a = address!("1111111111111111111111111111111111111111");
        let b = address!("2222222222222222222222222222222222222222");
        let one: ComplianceMap = [a, b].into_iter().collect();
        let two: ComplianceMap = [b, a].into_iter().collect();
        assert_eq!(one.checksum(), two.checksum());
        assert_ne!(one.checksum(), ComplianceMap::new().checksum());
    }

    #[test]
    fn test_json_object_and_array_forms() {
        let object = r#"{"ofac": {"0x8576acc5c05d6ce88f4e49bf65bdf0c62f91353c": {}}}"#;
        let array = r#"{"ofac": ["0x8576AcC5C05D6Ce88f4e49bf65BdF0C62F91353C"]}"#;

        let from_object: ComplianceRegistry = serde_json::from_str(object).unwrap();
        let from_array: ComplianceRegistry = serde_json::from_str(array).unwrap();
        assert_eq!(from_object, from_array);
        assert!(from_object
            .get("ofac")
            .unwrap()
            .contains(&address!("8576acc5c05d6ce88f4e49bf65bdf0c62f91353c")));
    }

    #[test]
    fn test_json_rejects_bad_address() {
        let json = r#"{"ofac": ["0x1234"]}"#;
        assert!(serde_json::from_str::<ComplianceRegistry>(json).is_err());
    }

    #[test]
    fn test_json_to_binary_conversion() {
        let json = r#"{"a": ["0x1111111111111111111111111111111111111111"], "b": []}"#;
        let registry: ComplianceRegistry = serde_json::from_str(json).unwrap();
        let decoded = ComplianceRegistry::decode(&registry.encode()).unwrap();
        let back: ComplianceRegistry =
            serde_json::from_str(&serde_json::to_string(&decoded).unwrap()).unwrap();
        assert_eq!(back, registry);
    }
}
