//! Convenient re-exports for common usage.
//!
//! ```
//! use cvrdt::prelude::*;
//! ```

pub use crate::CausalOrder;
pub use crate::Crdt;
pub use crate::GCounter;
pub use crate::GSet;
pub use crate::LWWRegister;
pub use crate::ORSet;
pub use crate::PNCounter;
pub use crate::TwoPSet;
pub use crate::VectorClock;
