use alloc::vec::Vec;

/// An ordered, finite sequence of items with random access.
///
/// The engine only reads from a source. Structural changes are reported separately through
/// [`crate::VirtualizingEngine::items_changed`], and the source is expected to already reflect
/// them by the time the next measure pass runs.
pub trait ItemSource {
    type Item;

    fn count(&self) -> usize;

    /// Returns the item at `index`. Callers never pass an index `>= count()`.
    fn item(&self, index: usize) -> &Self::Item;
}

impl<T> ItemSource for [T] {
    type Item = T;

    fn count(&self) -> usize {
        self.len()
    }

    fn item(&self, index: usize) -> &T {
        &self[index]
    }
}

impl<T> ItemSource for Vec<T> {
    type Item = T;

    fn count(&self) -> usize {
        self.len()
    }

    fn item(&self, index: usize) -> &T {
        &self[index]
    }
}

impl<S: ItemSource + ?Sized> ItemSource for &S {
    type Item = S::Item;

    fn count(&self) -> usize {
        (**self).count()
    }

    fn item(&self, index: usize) -> &S::Item {
        (**self).item(index)
    }
}
