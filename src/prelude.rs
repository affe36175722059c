//! Convenient re-exports for common usage.
//!
//! ```
//! use register_map::prelude::*;
//! ```

pub use crate::clock::HybridTimestamp;
pub use crate::Crdt;
pub use crate::LWWRegister;
pub use crate::ORMap;
pub use crate::RegisterMap;
