//! Identifier newtypes for reserve assets and accounts
//!
//! Both identifiers are 20-byte values rendered as 0x-prefixed hex, matching
//! the address format of the chains the engine settles against. They are
//! opaque to the engine itself: equality and ordering are all it relies on.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing an identifier out of its hex representation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdParseError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("expected 20 bytes, got {0}")]
    InvalidLength(usize),
}

fn parse_hex_20(s: &str) -> Result<[u8; 20], IdParseError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(stripped).map_err(|e| IdParseError::InvalidHex(e.to_string()))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| IdParseError::InvalidLength(bytes.len()))
}

macro_rules! hex_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name([u8; 20]);

        impl $name {
            pub const fn new(bytes: [u8; 20]) -> Self {
                Self(bytes)
            }

            /// Identifier with the low 8 bytes set from `value`, handy in tests
            pub fn from_low_u64(value: u64) -> Self {
                let mut bytes = [0u8; 20];
                bytes[12..].copy_from_slice(&value.to_be_bytes());
                Self(bytes)
            }

            pub const fn as_bytes(&self) -> &[u8; 20] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 20]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_hex_20(s).map(Self)
            }
        }

        impl From<[u8; 20]> for $name {
            fn from(bytes: [u8; 20]) -> Self {
                Self(bytes)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(|e: IdParseError| D::Error::custom(e.to_string()))
            }
        }
    };
}

hex_id! {
    /// Identifier of one reserve asset held by a pool
    ReserveId
}

hex_id! {
    /// Account identifier for callers and the network-fee wallet
    Address
}
