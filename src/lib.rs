//! # register-map
//!
//! A convergent register map for local-first and distributed applications.
//!
//! [`RegisterMap`] maps opaque keys to single-value registers. Replicas
//! update it independently and exchange state; merging replicas in any
//! order converges on the same observable map without coordination or
//! consensus. Presence of a key resolves by observed-remove rules, the
//! value under a key by last-writer-wins over hybrid logical stamps.
//!
//! ## `no_std` Support
//!
//! This crate supports `no_std` environments with the `alloc` crate.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! register-map = { version = "0.1", default-features = false }
//! ```
//!
//! Note: [`RegisterMap::set_value`], [`ORMap::get_or_create`] and
//! [`LWWRegister::new`]/[`LWWRegister::set`] require the `std` feature for
//! automatic stamps via `SystemTime`. Without it, use the `*_at` and
//! `with_stamp` twins with stamps you supply.
//!
//! ## Quick Start
//!
//! ```
//! use register_map::prelude::*;
//!
//! let mut alice = RegisterMap::new(1);
//! let mut bob = RegisterMap::new(2);
//!
//! // Each replica writes locally, with no coordination
//! alice.set_value("alice/cursor", 12);
//! bob.set_value("bob/cursor", 40);
//!
//! // Exchange state; both sides converge
//! let snapshot = alice.clone();
//! alice.merge(&bob);
//! bob.merge(&snapshot);
//!
//! assert_eq!(alice.get_value(&"bob/cursor"), Some(&40));
//! assert_eq!(bob.get_value(&"alice/cursor"), Some(&12));
//! assert_eq!(alice.len(), 2);
//! assert_eq!(bob.len(), 2);
//! ```
//!
//! ## How conflicts resolve
//!
//! - **Write vs write**: the write with the greater stamp wins. Stamps
//!   embed the writer's node id, so the order is total and deterministic.
//! - **Write vs remove**: a remove retires only the key instances the
//!   remover observed. A concurrent [`RegisterMap::set_value`] that
//!   *created* the key survives; one that overwrote the observed instance
//!   in place is removed with it. A causally later write always revives
//!   the key.
//!
//! ## Layers
//!
//! - [`RegisterMap`] - the value-level map most callers want
//! - [`ORMap`] - observed-remove map of registers underneath
//! - [`LWWRegister`] - last-writer-wins register primitive
//! - [`HybridTimestamp`] - the stamps writes are ordered by
//!
//! ## The `Crdt` Trait
//!
//! All types implement the [`Crdt`] trait, which provides the
//! [`Crdt::merge`] method. Merge is guaranteed to be commutative,
//! associative, and idempotent.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod crdt;
mod lww_register;
mod or_map;
mod register_map;

pub mod clock;
pub mod prelude;

pub use clock::HybridTimestamp;
pub use crdt::Crdt;
pub use lww_register::LWWRegister;
pub use or_map::ORMap;
pub use register_map::RegisterMap;
