//! # cvrdt
//!
//! State-based (convergent) replicated data types.
//!
//! Each replica mutates its own snapshot without coordination and
//! periodically merges a snapshot received from a peer. Merge is a join:
//! commutative, associative and idempotent, so replicas that have seen the
//! same updates converge regardless of merge order or duplication.
//!
//! ## `no_std` Support
//!
//! This crate supports `no_std` environments with the `alloc` crate.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! cvrdt = { version = "0.1", default-features = false }
//! ```
//!
//! Without `std` there is no [`clock::SystemClock`]; pass any other
//! [`clock::ClockSource`] to [`LWWRegister`].
//!
//! ## Quick Start
//!
//! ```
//! use cvrdt::prelude::*;
//!
//! // Grow-only counter
//! let mut c1 = GCounter::new();
//! c1.increase("device-1");
//!
//! let mut c2 = GCounter::new();
//! c2.increase("device-2");
//!
//! c1.merge(&c2);
//! assert_eq!(c1.value(), 2);
//! ```
//!
//! ## Available CRDTs
//!
//! ### Counters and clocks
//! - [`GCounter`] - Grow-only counter (increment only)
//! - [`PNCounter`] - Positive-negative counter (increment and decrement)
//! - [`VectorClock`] - Per-replica logical time with a causal partial order
//!
//! ### Registers
//! - [`LWWRegister`] - Last-writer-wins register (timestamp, then replica id)
//!
//! ### Sets
//! - [`GSet`] - Grow-only set (add only)
//! - [`TwoPSet`] - Two-phase set (add and remove, remove is permanent)
//! - [`ORSet`] - Add-wins observed-remove set (add, remove and re-add)
//!
//! ## The `Crdt` Trait
//!
//! All types implement the [`Crdt`] trait, which provides in-place
//! [`Crdt::merge`] and the snapshot-returning [`Crdt::merged`].
//!
//! ## Features
//!
//! - `std` (default): [`clock::SystemClock`] and std support in dependencies.
//! - `serde`: `Serialize`/`Deserialize` for every type and the
//!   `snapshot` module for enveloped byte snapshots.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod crdt;
mod gcounter;
mod gset;
mod lww_register;
mod or_set;
mod pncounter;
mod twop_set;
mod vector_clock;

pub mod clock;
pub mod prelude;
#[cfg(feature = "serde")]
pub mod snapshot;

pub use crdt::Crdt;
pub use gcounter::GCounter;
pub use gset::GSet;
pub use lww_register::LWWRegister;
pub use or_set::ORSet;
pub use pncounter::PNCounter;
pub use twop_set::TwoPSet;
pub use vector_clock::{CausalOrder, VectorClock};
