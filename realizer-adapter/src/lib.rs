//! Host-side helpers for the `realizer` crate.
//!
//! The `realizer` crate is UI-agnostic and only implements realization and recycling. This crate
//! provides small, framework-neutral pieces commonly needed to drive it:
//!
//! - A recycle pool keyed by element kind ([`KindedFactory`])
//! - A model scroll surface with scroll anchoring ([`ScrollSurface`])
//! - A presenter that owns the item list and keeps engine and surface in sync ([`Presenter`])
//!
//! This crate is intentionally framework-agnostic (no toolkit bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod key;
mod pool;
mod presenter;
mod surface;


pub use key::ElementKind;
pub use pool::{KindedFactory, PoolStats, Pooled};
pub use presenter::Presenter;
pub use surface::{ScrollAnchor, ScrollSurface};
