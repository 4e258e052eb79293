//! CSPRNG-backed reference identifiers.
//!
//! Masked error replies correlate a server-side log entry with an opaque
//! client-facing message through a [`ReferenceId`], a UUIDv4-shaped value
//! built from OS randomness. Nothing here is persisted; an ID lives exactly
//! as long as the log line it keys.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Largest number of random bytes a single [`fill_random`] call may request.
/// Inherited from the platform random-source contract.
pub const MAX_RANDOM_BYTES: usize = 65536;

/// Failure to obtain randomness
#[derive(Debug)]
pub enum RandomError {
    /// More bytes requested in one call than the random-source contract allows
    QuotaExceeded {
        /// Number of bytes that were requested
        requested: usize,
    },
    /// The OS random source failed
    Source(getrandom::Error),
}

impl Display for RandomError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RandomError::QuotaExceeded { requested } => write!(
                f,
                "requested byte length ({requested}) exceeds the number of bytes of entropy \
                available in a single call ({MAX_RANDOM_BYTES})"
            ),
            RandomError::Source(e) => write!(f, "random source failure: {e}"),
        }
    }
}

impl std::error::Error for RandomError {}

/// Fill `buf` with cryptographically strong random bytes.
///
/// Requests above [`MAX_RANDOM_BYTES`] are rejected with
/// [`RandomError::QuotaExceeded`] before touching the OS source.
pub fn fill_random(buf: &mut [u8]) -> Result<(), RandomError> {
    if buf.len() > MAX_RANDOM_BYTES {
        return Err(RandomError::QuotaExceeded {
            requested: buf.len(),
        });
    }
    getrandom::fill(buf).map_err(RandomError::Source)
}

/// UUIDv4-shaped reference identifier.
///
/// 122 bits of CSPRNG output with the version nibble fixed to `4` and the
/// variant bits to `10`, rendered as the canonical hyphenated `8-4-4-4-12`
/// lowercase hex string.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct ReferenceId([u8; 16]);

impl ReferenceId {
    /// Generate a fresh identifier from the OS random source
    pub fn new() -> Result<Self, RandomError> {
        let mut bytes = [0u8; 16];
        fill_random(&mut bytes)?;
        bytes[6] = (bytes[6] & 0x0f) | 0x40; // version 4
        bytes[8] = (bytes[8] & 0x3f) | 0x80; // RFC 4122 variant
        Ok(Self(bytes))
    }

    /// Raw bytes, with version/variant bits applied
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl Display for ReferenceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                write!(f, "-")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Error parsing a [`ReferenceId`] from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReferenceIdError;

impl Display for ParseReferenceIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "invalid reference id")
    }
}

impl std::error::Error for ParseReferenceIdError {}

impl FromStr for ReferenceId {
    type Err = ParseReferenceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.as_bytes();
        if raw.len() != 36 {
            return Err(ParseReferenceIdError);
        }
        for pos in [8, 13, 18, 23] {
            if raw[pos] != b'-' {
                return Err(ParseReferenceIdError);
            }
        }
        let mut bytes = [0u8; 16];
        let hex = s
            .chars()
            .filter(|c| *c != '-')
            .collect::<String>();
        if hex.len() != 32 {
            return Err(ParseReferenceIdError);
        }
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk).map_err(|_| ParseReferenceIdError)?;
            bytes[i] = u8::from_str_radix(pair, 16).map_err(|_| ParseReferenceIdError)?;
        }
        Ok(ReferenceId(bytes))
    }
}

impl Serialize for ReferenceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ReferenceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<ReferenceId>()
            .map_err(|_| serde::de::Error::custom("invalid reference id"))
    }
}
