use alloc::collections::VecDeque;
use core::mem;

use crate::{Constraint, RealizedRange, Rect};

/// One realized index: the element bound to it plus its primary-axis placement.
#[derive(Clone, Debug)]
pub struct Slot<E> {
    pub index: usize,
    pub element: E,
    /// Start offset along the primary axis.
    pub start: f64,
    /// Size along the primary axis.
    pub size: f64,
    /// Measured cross-axis size.
    pub cross: f64,
    /// The constraint of the most recent measurement.
    pub measured_with: Constraint,
    /// The rect of the most recent arrange, if any.
    pub rect: Option<Rect>,
}

impl<E> Slot<E> {
    pub fn new(index: usize, element: E) -> Self {
        Self {
            index,
            element,
            start: 0.0,
            size: 0.0,
            cross: 0.0,
            measured_with: Constraint::UNBOUNDED,
            rect: None,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.size
    }
}

/// Receives slots that leave an [`ItemWindow`] and index changes of slots that stay.
pub trait WindowSink<E> {
    fn recycle(&mut self, slot: Slot<E>);

    fn reindex(&mut self, element: &mut E, old_index: usize, new_index: usize) {
        let _ = (element, old_index, new_index);
    }
}

/// An anchor index and the primary-axis offset it starts at.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    pub index: usize,
    pub offset: f64,
}

/// The run of realized indices, ordered by index.
///
/// After a completed measure pass the run is contiguous: indices increase by exactly one and
/// offsets never decrease. An insert that lands inside the run shifts the slots after it without
/// realizing the inserted indices, which leaves a hole until the next measure pass walks over
/// it. Removals never leave holes.
#[derive(Clone, Debug)]
pub struct ItemWindow<E> {
    slots: VecDeque<Slot<E>>,
}

impl<E> Default for ItemWindow<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ItemWindow<E> {
    pub fn new() -> Self {
        Self {
            slots: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn first_index(&self) -> Option<usize> {
        self.slots.front().map(|s| s.index)
    }

    pub fn last_index(&self) -> Option<usize> {
        self.slots.back().map(|s| s.index)
    }

    /// The span from the first to the last realized index, `end_index` exclusive. It also covers
    /// holes left by an insert; [`Self::get`] tells whether one index is realized.
    pub fn range(&self) -> Option<RealizedRange> {
        Some(RealizedRange {
            start_index: self.first_index()?,
            end_index: self.last_index()? + 1,
        })
    }

    /// `true` when `index` lies between the first and last realized index.
    pub fn spans(&self, index: usize) -> bool {
        self.range().is_some_and(|r| r.contains(index))
    }

    pub fn is_contiguous(&self) -> bool {
        self.slots
            .iter()
            .zip(self.slots.iter().skip(1))
            .all(|(a, b)| b.index == a.index + 1 && b.start >= a.start)
    }

    fn position(&self, index: usize) -> Option<usize> {
        self.slots.binary_search_by_key(&index, |s| s.index).ok()
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.slot(index).map(|s| &s.element)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        let pos = self.position(index)?;
        Some(&mut self.slots[pos].element)
    }

    pub fn slot(&self, index: usize) -> Option<&Slot<E>> {
        let pos = self.position(index)?;
        self.slots.get(pos)
    }

    pub fn offset_of(&self, index: usize) -> Option<f64> {
        self.slot(index).map(|s| s.start)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Slot<E>> + '_ {
        self.slots.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut Slot<E>> + '_ {
        self.slots.iter_mut()
    }

    /// Adds a slot at whichever end of the run it extends.
    ///
    /// # Panics
    ///
    /// Panics when the slot is neither directly before the first nor directly after the last
    /// realized index.
    pub fn append(&mut self, slot: Slot<E>) {
        let (Some(first), Some(last)) = (self.first_index(), self.last_index()) else {
            self.slots.push_back(slot);
            return;
        };
        if slot.index == last + 1 {
            debug_assert!(
                self.slots.back().is_none_or(|s| slot.start >= s.start),
                "ItemWindow: offsets must not decrease (index={})",
                slot.index
            );
            self.slots.push_back(slot);
        } else if slot.index + 1 == first {
            debug_assert!(
                self.slots.front().is_none_or(|s| slot.start <= s.start),
                "ItemWindow: offsets must not decrease (index={})",
                slot.index
            );
            self.slots.push_front(slot);
        } else {
            panic!(
                "ItemWindow: index {} does not extend the realized run [{first}, {last}]",
                slot.index
            );
        }
    }

    /// Recycles every slot whose index is below `index`.
    pub fn recycle_before(&mut self, index: usize, sink: &mut impl WindowSink<E>) {
        while self.slots.front().is_some_and(|s| s.index < index) {
            if let Some(slot) = self.slots.pop_front() {
                sink.recycle(slot);
            }
        }
    }

    /// Recycles every slot whose index is above `index`.
    pub fn recycle_after(&mut self, index: usize, sink: &mut impl WindowSink<E>) {
        while self.slots.back().is_some_and(|s| s.index > index) {
            if let Some(slot) = self.slots.pop_back() {
                sink.recycle(slot);
            }
        }
    }

    pub fn recycle_all(&mut self, sink: &mut impl WindowSink<E>) {
        for slot in self.slots.drain(..) {
            sink.recycle(slot);
        }
    }

    /// Shifts every slot at or after `start` by `count`. Offsets are left for the next measure
    /// pass to correct and nothing is recycled.
    pub fn items_inserted(&mut self, start: usize, count: usize, sink: &mut impl WindowSink<E>) {
        if count == 0 {
            return;
        }
        for slot in self.slots.iter_mut().rev() {
            if slot.index < start {
                break;
            }
            let old = slot.index;
            slot.index += count;
            sink.reindex(&mut slot.element, old, slot.index);
        }
    }

    /// Recycles slots in `[start, start + count)` and shifts the ones after the range down.
    pub fn items_removed(&mut self, start: usize, count: usize, sink: &mut impl WindowSink<E>) {
        if count == 0 {
            return;
        }
        let end = start.saturating_add(count);
        let slots = mem::take(&mut self.slots);
        for mut slot in slots {
            if slot.index < start {
                self.slots.push_back(slot);
            } else if slot.index < end {
                sink.recycle(slot);
            } else {
                let old = slot.index;
                slot.index -= count;
                sink.reindex(&mut slot.element, old, slot.index);
                self.slots.push_back(slot);
            }
        }
    }

    pub fn items_replaced(
        &mut self,
        start: usize,
        old_count: usize,
        new_count: usize,
        sink: &mut impl WindowSink<E>,
    ) {
        self.items_removed(start, old_count, sink);
        self.items_inserted(start, new_count, sink);
    }

    /// `to` is the destination index after the moved items have been taken out.
    pub fn items_moved(
        &mut self,
        from: usize,
        to: usize,
        count: usize,
        sink: &mut impl WindowSink<E>,
    ) {
        self.items_removed(from, count, sink);
        self.items_inserted(to, count, sink);
    }

    /// Mean primary-axis size of the realized slots, or `None` when nothing is realized.
    pub fn estimate_element_size(&self) -> Option<f64> {
        if self.slots.is_empty() {
            return None;
        }
        let total: f64 = self.slots.iter().map(|s| s.size).sum();
        Some(total / self.slots.len() as f64)
    }

    /// Picks the index that forward/backward realization should start from.
    ///
    /// A realized slot whose span overlaps `[viewport_start, viewport_end)` wins, the first such
    /// slot in index order. Overlap is half-open, so when a boundary falls exactly between two
    /// slots the later index is chosen. Without an overlapping slot the anchor is extrapolated
    /// from the nearest realized slot (or from zero when the window is empty) using the mean
    /// realized size, falling back to `fallback_size`.
    pub fn get_or_estimate_anchor(
        &self,
        viewport_start: f64,
        viewport_end: f64,
        count: usize,
        fallback_size: f64,
    ) -> Option<Anchor> {
        if count == 0 {
            return None;
        }
        for slot in self.slots.iter().take_while(|s| s.index < count) {
            if slot.end() > viewport_start && slot.start < viewport_end {
                return Some(Anchor {
                    index: slot.index,
                    offset: slot.start,
                });
            }
        }

        let estimate = self.usable_estimate(fallback_size);
        let last_valid = count - 1;
        let realized = self.slots.iter().filter(|s| s.index < count);
        let (Some(first), Some(last)) = (realized.clone().next(), realized.last()) else {
            let index = units_floor(viewport_start, estimate).min(last_valid);
            return Some(Anchor {
                index,
                offset: index as f64 * estimate,
            });
        };

        if viewport_start >= last.end() {
            let index = last
                .index
                .saturating_add(1)
                .saturating_add(units_floor(viewport_start - last.end(), estimate))
                .min(last_valid);
            if index <= last.index {
                return Some(Anchor {
                    index: last.index,
                    offset: last.start,
                });
            }
            let offset = last.end() + (index - last.index - 1) as f64 * estimate;
            return Some(Anchor { index, offset });
        }

        if viewport_start < first.start {
            return Some(estimate_before(
                first.index,
                first.start,
                viewport_start,
                estimate,
            ));
        }

        // Inside the realized span but not overlapping any slot (a hole or zero-sized slots):
        // take the last slot starting at or before the viewport.
        let slot = self
            .slots
            .iter()
            .take_while(|s| s.index < count)
            .filter(|s| s.start <= viewport_start)
            .last()
            .unwrap_or(first);
        Some(Anchor {
            index: slot.index,
            offset: slot.start,
        })
    }

    /// The start offset of `index`, realized or extrapolated from the nearest realized slot.
    pub fn get_or_estimate_offset(&self, index: usize, fallback_size: f64) -> f64 {
        if let Some(start) = self.offset_of(index) {
            return start;
        }
        let estimate = self.usable_estimate(fallback_size);
        let before = self.slots.iter().filter(|s| s.index < index).last();
        if let Some(prev) = before {
            return prev.end() + (index - prev.index - 1) as f64 * estimate;
        }
        match self.slots.front() {
            Some(first) => {
                let step = step_before(first.index, first.start, estimate);
                (first.start - (first.index - index) as f64 * step).max(0.0)
            }
            None => index as f64 * estimate,
        }
    }

    fn usable_estimate(&self, fallback_size: f64) -> f64 {
        match self.estimate_element_size() {
            Some(e) if e > 0.0 => e,
            _ if fallback_size > 0.0 => fallback_size,
            _ => 1.0,
        }
    }

    /// Moves every slot by `delta` along the primary axis.
    pub(crate) fn translate(&mut self, delta: f64) {
        for slot in self.slots.iter_mut() {
            slot.start += delta;
        }
    }

    /// Splits off the slots whose index is `>= index` into a new window.
    pub(crate) fn split_off(&mut self, index: usize) -> ItemWindow<E> {
        let at = self.slots.partition_point(|s| s.index < index);
        ItemWindow {
            slots: self.slots.split_off(at),
        }
    }

    pub(crate) fn take_front_if(&mut self, index: usize) -> Option<Slot<E>> {
        if self.slots.front()?.index == index {
            self.slots.pop_front()
        } else {
            None
        }
    }

    pub(crate) fn take_back_if(&mut self, index: usize) -> Option<Slot<E>> {
        if self.slots.back()?.index == index {
            self.slots.pop_back()
        } else {
            None
        }
    }
}

/// Extrapolates an anchor for an empty window from where an earlier pass placed `reference`.
/// `reference.index` must be below `count`.
pub(crate) fn estimate_from_reference(
    reference: Anchor,
    viewport_start: f64,
    count: usize,
    estimate: f64,
) -> Anchor {
    if viewport_start < reference.offset {
        return estimate_before(reference.index, reference.offset, viewport_start, estimate);
    }
    let index = reference
        .index
        .saturating_add(units_floor(viewport_start - reference.offset, estimate))
        .min(count - 1);
    Anchor {
        index,
        offset: reference.offset + (index - reference.index) as f64 * estimate,
    }
}

/// Per-item step used when extrapolating towards index 0 from `index` at `start`. Never larger
/// than the space actually left before `start`, so extrapolated offsets stay non-negative.
fn step_before(index: usize, start: f64, estimate: f64) -> f64 {
    if index == 0 || !(start > 0.0) {
        return estimate;
    }
    estimate.min(start / index as f64)
}

fn estimate_before(index: usize, start: f64, viewport_start: f64, estimate: f64) -> Anchor {
    let step = step_before(index, start, estimate);
    let back = units_ceil(start - viewport_start, step);
    let anchor_index = index.saturating_sub(back);
    Anchor {
        index: anchor_index,
        offset: start - (index - anchor_index) as f64 * step,
    }
}

/// How many whole `unit`s fit in `span` (non-negative inputs).
fn units_floor(span: f64, unit: f64) -> usize {
    if !(span > 0.0) {
        return 0;
    }
    let q = span / unit;
    if q >= usize::MAX as f64 {
        usize::MAX
    } else {
        q as usize
    }
}

fn units_ceil(span: f64, unit: f64) -> usize {
    let floor = units_floor(span, unit);
    if (floor as f64) * unit < span {
        floor.saturating_add(1)
    } else {
        floor
    }
}
