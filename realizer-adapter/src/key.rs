#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
pub(crate) type KindMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub(crate) type KindMap<K, V> = BTreeMap<K, V>;

/// A tag distinguishing element kinds in a [`crate::KindedFactory`], typically a small enum.
#[cfg(feature = "std")]
pub trait ElementKind: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> ElementKind for K {}

/// A tag distinguishing element kinds in a [`crate::KindedFactory`], typically a small enum.
#[cfg(not(feature = "std"))]
pub trait ElementKind: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> ElementKind for K {}
