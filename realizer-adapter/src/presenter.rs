use alloc::vec::Vec;
use core::fmt;
use core::mem;
use core::ops::Range;

use realizer::{Constraint, ElementFactory, ItemsChanged, LayoutStrategy, Size, VirtualizingEngine};

use crate::ScrollSurface;

/// Drives a [`VirtualizingEngine`] end to end.
///
/// The presenter owns the item list, the engine and a [`ScrollSurface`], and keeps the three
/// consistent: every mutation updates the list, reports the matching [`ItemsChanged`] to the
/// engine and lays out again. Layout is repeated until the viewport stops moving, since arranging
/// can change the extent and with it the clamped scroll offset.
///
/// With anchoring enabled (the default) the first visible element keeps its on-screen position
/// across mutations.
pub struct Presenter<T, F: ElementFactory<T>, L> {
    items: Vec<T>,
    engine: VirtualizingEngine<T, F, L>,
    surface: ScrollSurface,
    anchoring: bool,
    max_layout_cycles: usize,
}

impl<T, F, L> Presenter<T, F, L>
where
    F: ElementFactory<T>,
    L: LayoutStrategy<F::Element>,
{
    /// Creates a presenter and runs the initial layout.
    pub fn new(items: Vec<T>, engine: VirtualizingEngine<T, F, L>, viewport_size: Size) -> Self {
        let surface = ScrollSurface::new(engine.orientation(), viewport_size);
        let mut presenter = Self {
            items,
            engine,
            surface,
            anchoring: true,
            max_layout_cycles: 8,
        };
        presenter.settle();
        presenter
    }

    pub fn with_anchoring(mut self, anchoring: bool) -> Self {
        self.anchoring = anchoring;
        self
    }

    /// Bounds how many measure/arrange cycles [`Self::settle`] runs.
    pub fn with_max_layout_cycles(mut self, cycles: usize) -> Self {
        self.max_layout_cycles = cycles.max(1);
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn engine(&self) -> &VirtualizingEngine<T, F, L> {
        &self.engine
    }

    /// Direct engine access. Call [`Self::settle`] after anything that invalidates layout.
    pub fn engine_mut(&mut self) -> &mut VirtualizingEngine<T, F, L> {
        &mut self.engine
    }

    pub fn surface(&self) -> &ScrollSurface {
        &self.surface
    }

    pub fn element(&self, index: usize) -> Option<&F::Element> {
        self.engine.try_get_element(index)
    }

    /// The measurement constraint handed to the engine: unbounded along the primary axis, the
    /// viewport's cross extent across it.
    pub fn available(&self) -> Constraint {
        let o = self.surface.orientation();
        Constraint::UNBOUNDED.with_cross(o, Some(o.cross(self.surface.viewport_size())))
    }

    /// Indices of the arranged elements intersecting the viewport.
    pub fn visible_indices(&self) -> Range<usize> {
        let viewport = self.surface.viewport();
        let mut visible = self
            .surface
            .candidates()
            .iter()
            .filter(|(_, r)| r.intersects(&viewport))
            .map(|(i, _)| *i);
        let Some(first) = visible.next() else {
            return 0..0;
        };
        let last = visible.last().unwrap_or(first);
        first..last + 1
    }

    /// Lays out until the reported viewport is stable. Returns the number of passes run.
    pub fn settle(&mut self) -> usize {
        let available = self.available();
        self.engine.on_viewport_changed(self.surface.viewport());
        let mut passes = 0;
        loop {
            self.engine.layout(&self.items, available, &mut self.surface);
            passes += 1;
            if !self.engine.on_viewport_changed(self.surface.viewport()) {
                break;
            }
            if passes >= self.max_layout_cycles {
                awarn!(passes, "layout did not settle");
                break;
            }
        }
        atrace!(passes, offset = self.surface.offset(), "settled");
        passes
    }

    pub fn scroll_to(&mut self, offset: f64) -> f64 {
        self.surface.scroll_to(offset);
        self.settle();
        self.surface.offset()
    }

    pub fn scroll_by(&mut self, delta: f64) -> f64 {
        self.surface.scroll_by(delta);
        self.settle();
        self.surface.offset()
    }

    pub fn resize(&mut self, viewport_size: Size) {
        self.surface.set_viewport_size(viewport_size);
        self.engine.invalidate_measure();
        self.settle();
    }

    /// Scrolls until the element for `index` is visible and returns it.
    pub fn bring_into_view(&mut self, index: usize) -> Option<&F::Element> {
        self.engine
            .bring_into_view(&self.items, index, None, &mut self.surface);
        self.settle();
        self.engine.try_get_element(index)
    }

    pub fn focus(&mut self, index: usize) {
        self.engine.focus_entered(index);
    }

    pub fn blur(&mut self) {
        self.engine.focus_lost();
    }

    pub fn push(&mut self, item: T) {
        let at = self.items.len();
        self.insert(at, item);
    }

    pub fn insert(&mut self, at: usize, item: T) {
        self.apply(ItemsChanged::Insert { at, count: 1 }, |items| {
            items.insert(at, item)
        });
    }

    pub fn insert_many(&mut self, at: usize, items: impl IntoIterator<Item = T>) {
        let new: Vec<T> = items.into_iter().collect();
        let count = new.len();
        if count == 0 {
            return;
        }
        self.apply(ItemsChanged::Insert { at, count }, |items| {
            items.splice(at..at, new);
        });
    }

    pub fn remove(&mut self, at: usize) -> T {
        self.apply(ItemsChanged::Remove { at, count: 1 }, |items| {
            items.remove(at)
        })
    }

    pub fn remove_range(&mut self, range: Range<usize>) -> Vec<T> {
        let at = range.start;
        let count = range.len();
        self.apply(ItemsChanged::Remove { at, count }, |items| {
            items.drain(range).collect()
        })
    }

    pub fn replace(&mut self, at: usize, item: T) -> T {
        let change = ItemsChanged::Replace {
            at,
            old_count: 1,
            new_count: 1,
        };
        self.apply(change, |items| mem::replace(&mut items[at], item))
    }

    /// Moves the item at `from` so it ends up at `to`.
    pub fn move_item(&mut self, from: usize, to: usize) {
        let change = ItemsChanged::Move { from, to, count: 1 };
        self.apply(change, |items| {
            let item = items.remove(from);
            items.insert(to, item);
        });
    }

    /// Replaces the whole list.
    pub fn set_items(&mut self, items: Vec<T>) -> Vec<T> {
        self.apply(ItemsChanged::Reset, |current| mem::replace(current, items))
    }

    fn apply<R>(&mut self, change: ItemsChanged, mutate: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let anchor = if self.anchoring {
            self.surface.capture_anchor()
        } else {
            None
        };
        let out = mutate(&mut self.items);
        self.engine.items_changed(change);
        self.settle();
        if let Some(anchor) = anchor.and_then(|a| a.shifted(change)) {
            if self.surface.apply_anchor(&anchor) {
                adebug!(index = anchor.index, "scroll anchor moved the viewport");
                self.settle();
            }
        }
        out
    }
}

impl<T, F, L> fmt::Debug for Presenter<T, F, L>
where
    F: ElementFactory<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presenter")
            .field("items", &self.items.len())
            .field("engine", &self.engine)
            .field("surface", &self.surface)
            .field("anchoring", &self.anchoring)
            .finish()
    }
}
