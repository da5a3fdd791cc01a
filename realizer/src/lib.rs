//! A headless virtualization and element-recycling engine for scrollable item lists.
//!
//! For a ready-made recycling pool, scroll surface and layout driver, see the
//! `realizer-adapter` crate.
//!
//! Only the part of a (possibly huge) item sequence that intersects the viewport is backed by
//! live elements. As the viewport moves, elements that leave it are handed back to a factory and
//! reused for items that enter it. Sizes of unrealized items are extrapolated from the realized
//! ones, so the reported extent is an estimate that converges as the user scrolls.
//!
//! It is UI-agnostic. The host is expected to provide:
//! - an [`ItemSource`] (item count and item lookup)
//! - an [`ElementFactory`] that creates and recycles elements
//! - a [`LayoutStrategy`] that measures and places one element
//! - a [`ScrollHost`] that reports viewports and performs scrolling
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod engine;
mod factory;
mod host;
mod options;
mod pins;
mod scroll_into_view;
mod source;
mod strategy;
mod types;
mod viewport;
mod window;

#[cfg(test)]
mod tests;

pub use engine::VirtualizingEngine;
pub use factory::ElementFactory;
pub use host::ScrollHost;
pub use options::EngineOptions;
pub use source::ItemSource;
pub use strategy::{LayoutStrategy, SharedCrossLayout, StackLayout};
pub use types::{
    Constraint, ItemsChanged, Orientation, OwnerId, RealizedRange, Rect, Size, Viewport,
};
pub use viewport::ViewportTracker;
pub use window::{Anchor, ItemWindow, Slot, WindowSink};
