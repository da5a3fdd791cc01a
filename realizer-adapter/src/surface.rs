use alloc::vec::Vec;

use realizer::{ItemsChanged, Orientation, Rect, ScrollHost, Size};

/// A scroll anchor that can be used to preserve visual position across source changes.
///
/// Typical use cases:
/// - chat/timeline "prepend" (load older items above) without content jumping
/// - removals or inserts above the viewport while the user reads further down
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor {
    pub index: usize,
    /// The distance from the anchor element's start to the scroll offset.
    pub offset_in_viewport: f64,
}

impl ScrollAnchor {
    /// Follows the anchored item through a source change. Returns `None` when the item is gone.
    pub fn shifted(self, change: ItemsChanged) -> Option<Self> {
        let index = match change {
            ItemsChanged::Insert { at, count } => shift_insert(self.index, at, count),
            ItemsChanged::Remove { at, count } => shift_remove(self.index, at, count)?,
            ItemsChanged::Replace {
                at,
                old_count,
                new_count,
            } => shift_insert(shift_remove(self.index, at, old_count)?, at, new_count),
            ItemsChanged::Move { from, to, count } => {
                if self.index >= from && self.index < from + count {
                    to + (self.index - from)
                } else {
                    shift_insert(shift_remove(self.index, from, count)?, to, count)
                }
            }
            ItemsChanged::Reset => return None,
        };
        Some(Self { index, ..self })
    }
}

fn shift_insert(index: usize, at: usize, count: usize) -> usize {
    if index >= at { index + count } else { index }
}

fn shift_remove(index: usize, at: usize, count: usize) -> Option<usize> {
    if index < at {
        Some(index)
    } else if index < at.saturating_add(count) {
        None
    } else {
        Some(index - count)
    }
}

/// A model scroll viewer: a fixed-size viewport sliding over the extent an engine arranges.
///
/// It implements [`ScrollHost`] for any element type, collects the anchor candidates registered
/// during arrange, clamps its offset when the extent shrinks, and scrolls minimally on
/// bring-into-view requests.
#[derive(Clone, Debug)]
pub struct ScrollSurface {
    orientation: Orientation,
    viewport_size: Size,
    offset: f64,
    extent: Size,
    candidates: Vec<(usize, Rect)>,
}

impl ScrollSurface {
    pub fn new(orientation: Orientation, viewport_size: Size) -> Self {
        Self {
            orientation,
            viewport_size,
            offset: 0.0,
            extent: Size::ZERO,
            candidates: Vec::new(),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    /// Resizes the viewport. The offset is clamped to the new scroll range.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
        self.offset = self.clamp(self.offset);
    }

    /// Primary-axis scroll offset.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// The extent of the most recent arrange pass.
    pub fn extent(&self) -> Size {
        self.extent
    }

    pub fn max_offset(&self) -> f64 {
        let o = self.orientation;
        (o.main(self.extent) - o.main(self.viewport_size)).max(0.0)
    }

    /// The visible rect in the engine's local coordinates.
    pub fn viewport(&self) -> Rect {
        let o = self.orientation;
        o.rect(
            self.offset,
            o.main(self.viewport_size),
            o.cross(self.viewport_size),
        )
    }

    /// Scrolls to `offset`, clamped to the scroll range. Returns the applied offset.
    pub fn scroll_to(&mut self, offset: f64) -> f64 {
        self.offset = self.clamp(offset);
        self.offset
    }

    pub fn scroll_by(&mut self, delta: f64) -> f64 {
        self.scroll_to(self.offset + delta)
    }

    /// Anchor candidates of the most recent arrange pass, in index order.
    pub fn candidates(&self) -> &[(usize, Rect)] {
        &self.candidates
    }

    pub fn candidate_rect(&self, index: usize) -> Option<Rect> {
        self.candidates
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, r)| *r)
    }

    /// Captures an anchor for the first candidate intersecting the viewport.
    ///
    /// Returns `None` if nothing has been arranged inside the viewport.
    pub fn capture_anchor(&self) -> Option<ScrollAnchor> {
        let viewport = self.viewport();
        let (index, rect) = self
            .candidates
            .iter()
            .find(|(_, r)| r.intersects(&viewport))?;
        Some(ScrollAnchor {
            index: *index,
            offset_in_viewport: self.offset - self.orientation.main_start(*rect),
        })
    }

    /// Applies a previously captured anchor by adjusting the scroll offset so the anchored
    /// element sits where it was.
    ///
    /// Returns `true` when the anchored element was arranged and the offset changed.
    pub fn apply_anchor(&mut self, anchor: &ScrollAnchor) -> bool {
        let Some(rect) = self.candidate_rect(anchor.index) else {
            return false;
        };
        let target = self.orientation.main_start(rect) + anchor.offset_in_viewport;
        let before = self.offset;
        self.scroll_to(target);
        atrace!(
            index = anchor.index,
            before,
            after = self.offset,
            "scroll anchor applied"
        );
        self.offset != before
    }

    fn clamp(&self, offset: f64) -> f64 {
        offset.max(0.0).min(self.max_offset())
    }
}

impl<E> ScrollHost<E> for ScrollSurface {
    fn extent_changed(&mut self, extent: Size) {
        self.extent = extent;
        let clamped = self.clamp(self.offset);
        if clamped != self.offset {
            adebug!(from = self.offset, to = clamped, "extent shrank, clamping offset");
            self.offset = clamped;
        }
    }

    fn realigned(&mut self, delta: f64) {
        adebug!(delta, "content realigned, scrolling along");
        // Only clamped at 0 here; the extent reported after arrange clamps the far end.
        self.offset = (self.offset + delta).max(0.0);
    }

    fn clear_anchor_candidates(&mut self) {
        self.candidates.clear();
    }

    fn register_anchor_candidate(&mut self, index: usize, _element: &E, rect: Rect) {
        self.candidates.push((index, rect));
    }

    fn bring_into_view(&mut self, _element: &E, rect: Rect) -> Option<Rect> {
        let o = self.orientation;
        let start = o.main_start(rect);
        let end = o.main_end(rect);
        let len = o.main(self.viewport_size);
        if start < self.offset || end - start >= len {
            self.scroll_to(start);
        } else if end > self.offset + len {
            self.scroll_to(end - len);
        }
        atrace!(start, end, offset = self.offset, "bring_into_view");
        Some(self.viewport())
    }
}
