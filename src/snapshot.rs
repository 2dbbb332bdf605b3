//! Versioned byte snapshots for shipping whole CRDT states between replicas.
//!
//! A snapshot is the postcard encoding of a CRDT wrapped in a 3-byte
//! envelope:
//!
//! ```text
//! [MAGIC: 0xCF][VERSION: u8][CRDT_TYPE: u8][PAYLOAD: N bytes]
//! ```
//!
//! The receiver checks the header before decoding so a snapshot of the
//! wrong type or from a newer schema is rejected instead of misread.
//!
//! # Example
//!
//! ```
//! use cvrdt::prelude::*;
//! use cvrdt::snapshot;
//!
//! let mut counter = GCounter::<String>::new();
//! counter.increase("node-1".to_string());
//!
//! let bytes = snapshot::to_bytes(&counter).unwrap();
//! let received: GCounter<String> = snapshot::from_bytes(&bytes).unwrap();
//! assert_eq!(received, counter);
//! ```

use alloc::string::ToString;
use alloc::vec::Vec;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{GCounter, GSet, LWWRegister, ORSet, PNCounter, TwoPSet, VectorClock};

/// Magic byte identifying a snapshot.
pub const MAGIC_BYTE: u8 = 0xCF;

/// Size of the envelope header in bytes.
pub const HEADER_SIZE: usize = 3;

/// Identifies the type of CRDT stored in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CrdtType {
    /// Grow-only counter.
    GCounter = 1,
    /// Positive-negative counter.
    PNCounter = 2,
    /// Grow-only set.
    GSet = 3,
    /// Two-phase set.
    TwoPSet = 4,
    /// Last-writer-wins register.
    LWWRegister = 5,
    /// Vector clock.
    VectorClock = 6,
    /// Observed-remove set.
    ORSet = 7,
}

impl CrdtType {
    /// Convert from a raw byte.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(Self::GCounter),
            2 => Some(Self::PNCounter),
            3 => Some(Self::GSet),
            4 => Some(Self::TwoPSet),
            5 => Some(Self::LWWRegister),
            6 => Some(Self::VectorClock),
            7 => Some(Self::ORSet),
            _ => None,
        }
    }
}

/// CRDT types that can be written as snapshots.
pub trait Versioned {
    /// Current schema version of this type's encoding.
    const CURRENT_VERSION: u8;

    /// The type tag written into the envelope.
    const CRDT_TYPE: CrdtType;
}

/// Error reading or writing a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// Data is too short to contain an envelope header.
    #[error("snapshot too short: {0} bytes")]
    TooShort(usize),

    /// Missing or incorrect magic byte.
    #[error("invalid magic byte: 0x{0:02X}, expected 0xCF")]
    InvalidMagic(u8),

    /// Unknown CRDT type byte.
    #[error("unknown CRDT type: {0}")]
    UnknownCrdtType(u8),

    /// The snapshot holds a different CRDT type than requested.
    #[error("snapshot holds {found:?}, expected {expected:?}")]
    TypeMismatch {
        /// Type the caller asked for.
        expected: CrdtType,
        /// Type found in the header.
        found: CrdtType,
    },

    /// The version byte is 0 or from a newer schema.
    #[error("snapshot version {found} is not supported (current is {current})")]
    UnsupportedVersion {
        /// Version found in the header.
        found: u8,
        /// Newest version this build understands.
        current: u8,
    },

    /// Payload serialization failed.
    #[error("serialization error: {0}")]
    Encode(alloc::string::String),

    /// Payload deserialization failed.
    #[error("deserialization error: {0}")]
    Decode(alloc::string::String),
}

/// Encode `crdt` as an enveloped snapshot.
pub fn to_bytes<T>(crdt: &T) -> Result<Vec<u8>, SnapshotError>
where
    T: Versioned + Serialize,
{
    let payload = postcard::to_allocvec(crdt).map_err(|e| SnapshotError::Encode(e.to_string()))?;

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.push(MAGIC_BYTE);
    bytes.push(T::CURRENT_VERSION);
    bytes.push(T::CRDT_TYPE as u8);
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode an enveloped snapshot of type `T`.
pub fn from_bytes<T>(bytes: &[u8]) -> Result<T, SnapshotError>
where
    T: Versioned + DeserializeOwned,
{
    let payload = check_header::<T>(bytes).map_err(|err| {
        debug!(reason = %err, "rejected snapshot");
        err
    })?;

    postcard::from_bytes(payload).map_err(|e| SnapshotError::Decode(e.to_string()))
}

fn check_header<T: Versioned>(bytes: &[u8]) -> Result<&[u8], SnapshotError> {
    if bytes.len() < HEADER_SIZE {
        return Err(SnapshotError::TooShort(bytes.len()));
    }
    if bytes[0] != MAGIC_BYTE {
        return Err(SnapshotError::InvalidMagic(bytes[0]));
    }

    let found = CrdtType::from_byte(bytes[2]).ok_or(SnapshotError::UnknownCrdtType(bytes[2]))?;
    if found != T::CRDT_TYPE {
        return Err(SnapshotError::TypeMismatch {
            expected: T::CRDT_TYPE,
            found,
        });
    }
    // versions start at 1
    if bytes[1] == 0 || bytes[1] > T::CURRENT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: bytes[1],
            current: T::CURRENT_VERSION,
        });
    }

    Ok(&bytes[HEADER_SIZE..])
}

impl<R: Ord> Versioned for GCounter<R> {
    const CURRENT_VERSION: u8 = 1;
    const CRDT_TYPE: CrdtType = CrdtType::GCounter;
}

impl<R: Ord> Versioned for PNCounter<R> {
    const CURRENT_VERSION: u8 = 1;
    const CRDT_TYPE: CrdtType = CrdtType::PNCounter;
}

impl<T: Ord> Versioned for GSet<T> {
    const CURRENT_VERSION: u8 = 1;
    const CRDT_TYPE: CrdtType = CrdtType::GSet;
}

impl<T: Ord> Versioned for TwoPSet<T> {
    const CURRENT_VERSION: u8 = 1;
    const CRDT_TYPE: CrdtType = CrdtType::TwoPSet;
}

impl<T, R: Ord> Versioned for LWWRegister<T, R> {
    const CURRENT_VERSION: u8 = 1;
    const CRDT_TYPE: CrdtType = CrdtType::LWWRegister;
}

impl<R: Ord> Versioned for VectorClock<R> {
    const CURRENT_VERSION: u8 = 1;
    const CRDT_TYPE: CrdtType = CrdtType::VectorClock;
}

impl<T: Ord, R: Ord> Versioned for ORSet<T, R> {
    const CURRENT_VERSION: u8 = 1;
    const CRDT_TYPE: CrdtType = CrdtType::ORSet;
}
