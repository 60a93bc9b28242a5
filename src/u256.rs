//! 256-bit integer wrapper for `Wallet::salt` (spec.md §3, SPEC_FULL.md §5:
//! "Salt width... modeled as `primitive_types::U256`").
//!
//! The teacher's own `common::u256::U256` wraps `primitive_types::U256` to
//! hand-roll a Borsh implementation (the upstream crate has no `borsh`
//! feature); reused verbatim here, trimmed to the operations `Wallet`
//! actually needs, plus a hex-string `serde` impl for event-log readability.

use borsh::{BorshDeserialize, BorshSerialize};
use primitive_types::U256 as Inner;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
#[repr(transparent)]
pub struct U256(pub Inner);

impl U256 {
    pub fn from_little_endian(slice: &[u8]) -> Self {
        Self(Inner::from_little_endian(slice))
    }

    pub fn to_little_endian(self, slice: &mut [u8]) {
        self.0.to_little_endian(slice);
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        Self(Inner::from(value))
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        Self(Inner::from(value))
    }
}

impl BorshSerialize for U256 {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut buf = [0u8; 32];
        self.0.to_little_endian(&mut buf);
        writer.write_all(&buf)
    }
}

impl BorshDeserialize for U256 {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut buf = [0u8; 32];
        reader.read_exact(&mut buf)?;
        Ok(Self(Inner::from_little_endian(&buf)))
    }
}

impl serde::Serialize for U256 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut buf = [0u8; 32];
        self.0.to_big_endian(&mut buf);
        serializer.serialize_str(&format!("0x{}", hex::encode(buf)))
    }
}

impl<'de> serde::Deserialize<'de> for U256 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let trimmed = s.strip_prefix("0x").unwrap_or(&s);
        let bytes = hex::decode(trimmed).map_err(serde::de::Error::custom)?;
        Ok(Self(Inner::from_big_endian(&bytes)))
    }
}
