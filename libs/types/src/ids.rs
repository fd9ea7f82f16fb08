//! Identity and identifier types for escrow entities
//!
//! Every participant and every stored account is named by a 32-byte `Pubkey`.
//! Transactions are tagged with UUID v7 identifiers so that emitted events can
//! be ordered chronologically and traced back to the call that produced them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Length of a public key in bytes
pub const PUBKEY_BYTES: usize = 32;

/// Errors produced when parsing a `Pubkey` from text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsePubkeyError {
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid key length: expected 32 bytes, got {0}")]
    WrongLength(usize),
}

/// A 32-byte identity.
///
/// Used for wallets (creator, judge, payout destinations), for program ids,
/// and for the addresses of stored accounts. Serialized as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Pubkey([u8; PUBKEY_BYTES]);

/// Address of a stored account. Same representation as an identity.
pub type Address = Pubkey;

impl Pubkey {
    /// Wrap raw key bytes
    pub const fn new_from_array(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// Create a fresh, unique key.
    ///
    /// Built from two UUID v7 values; suitable for tests and harnesses that
    /// need distinct identities without a wallet.
    pub fn new_unique() -> Self {
        let mut bytes = [0u8; PUBKEY_BYTES];
        bytes[..16].copy_from_slice(Uuid::now_v7().as_bytes());
        bytes[16..].copy_from_slice(Uuid::now_v7().as_bytes());
        Self(bytes)
    }

    /// Copy out the raw bytes
    pub fn to_bytes(&self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    pub fn as_array(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; PUBKEY_BYTES]> for Pubkey {
    fn from(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Pubkey {
    type Err = ParsePubkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = hex::decode(s).map_err(|e| ParsePubkeyError::InvalidHex(e.to_string()))?;
        let bytes: [u8; PUBKEY_BYTES] = raw
            .as_slice()
            .try_into()
            .map_err(|_| ParsePubkeyError::WrongLength(raw.len()))?;
        Ok(Self(bytes))
    }
}

impl From<Pubkey> for String {
    fn from(key: Pubkey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for Pubkey {
    type Error = ParsePubkeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Unique identifier for an executed transaction
///
/// Uses UUID v7 so that identifiers sort in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
