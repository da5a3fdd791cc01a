use core::marker::PhantomData;
use core::mem;

use crate::pins::{Pin, Pins, Retire, Retirer};
use crate::window::{self, Anchor, ItemWindow, Slot};
use crate::{
    Constraint, ElementFactory, EngineOptions, ItemSource, ItemsChanged, LayoutStrategy,
    Orientation, RealizedRange, Rect, ScrollHost, Size, Viewport, ViewportTracker,
};

/// Per-pass view of where realization starts and where it has to reach.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MeasureViewport {
    pub(crate) anchor_index: usize,
    pub(crate) anchor_offset: f64,
    pub(crate) viewport_start: f64,
    pub(crate) viewport_end: f64,
    pub(crate) cross_size: f64,
    pub(crate) last_index: usize,
    pub(crate) end_offset: f64,
    /// The anchor lies outside the previously realized run.
    pub(crate) disjunct: bool,
}

/// Realizes elements for the part of an item sequence that intersects the viewport and recycles
/// them as the viewport moves.
///
/// The engine is driven by its host's layout callbacks: [`Self::measure`] then
/// [`Self::arrange`], with [`Self::on_viewport_changed`] and [`Self::items_changed`] in between.
/// It owns its element factory and layout strategy; the item source and scroll host are lent per
/// call.
///
/// Two window buffers exist: `realized`, which queries read, and `building`, which only a measure
/// pass touches. They are swapped when the pass completes.
pub struct VirtualizingEngine<T, F: ElementFactory<T>, L> {
    pub(crate) options: EngineOptions,
    pub(crate) factory: F,
    pub(crate) strategy: L,
    pub(crate) realized: ItemWindow<F::Element>,
    pub(crate) building: ItemWindow<F::Element>,
    pub(crate) pins: Pins<F::Element>,
    pub(crate) tracker: ViewportTracker,
    pub(crate) estimated_size: f64,
    pub(crate) desired: Size,
    pub(crate) last_constraint: Option<Constraint>,
    pub(crate) last_final: Option<Size>,
    /// Where the first realized element sat after the latest pass; anchors an emptied window.
    last_anchor: Option<Anchor>,
    measure_valid: bool,
    _item: PhantomData<fn(&T)>,
}

impl<T, F, L> VirtualizingEngine<T, F, L>
where
    F: ElementFactory<T>,
    L: LayoutStrategy<F::Element>,
{
    pub fn new(factory: F, strategy: L) -> Self {
        Self::with_options(factory, strategy, EngineOptions::default())
    }

    pub fn with_options(factory: F, strategy: L, options: EngineOptions) -> Self {
        let orientation = strategy.orientation();
        rdebug!(
            ?orientation,
            estimated_element_size = options.estimated_element_size,
            owner = options.owner.0,
            "VirtualizingEngine::new"
        );
        Self {
            estimated_size: options.estimated_element_size,
            options,
            factory,
            strategy,
            realized: ItemWindow::new(),
            building: ItemWindow::new(),
            pins: Pins::default(),
            tracker: ViewportTracker::new(orientation),
            desired: Size::ZERO,
            last_constraint: None,
            last_final: None,
            last_anchor: None,
            measure_valid: false,
            _item: PhantomData,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn orientation(&self) -> Orientation {
        self.strategy.orientation()
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn strategy(&self) -> &L {
        &self.strategy
    }

    /// Mutable access to the strategy. Anything that changes how elements measure should be
    /// followed by [`Self::invalidate_measure`].
    pub fn strategy_mut(&mut self) -> &mut L {
        &mut self.strategy
    }

    pub fn window(&self) -> &ItemWindow<F::Element> {
        &self.realized
    }

    pub fn viewport(&self) -> Viewport {
        self.tracker.viewport()
    }

    pub fn desired_size(&self) -> Size {
        self.desired
    }

    /// The constraint passed to the most recent measure pass.
    pub fn last_measure_constraint(&self) -> Option<Constraint> {
        self.last_constraint
    }

    /// The element size used to extrapolate unrealized indices.
    pub fn estimated_element_size(&self) -> f64 {
        self.estimated_size
    }

    pub fn needs_measure(&self) -> bool {
        !self.measure_valid
    }

    pub fn invalidate_measure(&mut self) {
        self.measure_valid = false;
    }

    pub fn is_waiting_for_viewport(&self) -> bool {
        self.tracker.is_waiting()
    }

    /// Feeds a viewport report from the host. Returns `true` when the engine needs to be
    /// measured again.
    pub fn on_viewport_changed(&mut self, rect: Rect) -> bool {
        self.tracker.set_orientation(self.strategy.orientation());
        let needs = self.tracker.update(rect);
        if needs {
            self.measure_valid = false;
        }
        needs
    }

    pub fn try_get_element(&self, index: usize) -> Option<&F::Element> {
        self.realized
            .get(index)
            .or_else(|| self.pins.parked_slot(index).map(|s| &s.element))
    }

    pub fn try_get_element_mut(&mut self, index: usize) -> Option<&mut F::Element> {
        if let Some(e) = self.realized.get_mut(index) {
            return Some(e);
        }
        self.pins
            .parked_slots_mut()
            .find(|s| s.index == index)
            .map(|s| &mut s.element)
    }

    /// The rect the element at `index` was last arranged at.
    pub fn element_rect(&self, index: usize) -> Option<Rect> {
        self.realized
            .slot(index)
            .or_else(|| self.pins.parked_slot(index))
            .and_then(|s| s.rect)
    }

    /// Every element currently bound to an index: the realized window in index order, followed by
    /// pinned elements parked outside it.
    pub fn realized_elements(&self) -> impl Iterator<Item = (usize, &F::Element)> + '_ {
        self.realized
            .iter()
            .chain(self.pins.parked_slots())
            .map(|s| (s.index, &s.element))
    }

    /// The span of the realized window. Between an insert inside the window and the next
    /// measure pass the span includes the inserted indices, which have no element yet; use
    /// [`Self::is_realized`] to test a single index.
    pub fn realized_range(&self) -> Option<RealizedRange> {
        self.realized.range()
    }

    /// `true` when an element is bound to `index`, in the window or parked.
    pub fn is_realized(&self, index: usize) -> bool {
        self.realized.slot(index).is_some() || self.pins.parked_slot(index).is_some()
    }

    /// Index of the first bound element matching `pred`.
    pub fn index_where(&self, mut pred: impl FnMut(&F::Element) -> bool) -> Option<usize> {
        self.realized_elements()
            .find(|&(_, e)| pred(e))
            .map(|(i, _)| i)
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.pins.focused.as_ref().map(|p| p.index)
    }

    /// Pins `index` as holding input focus. Its element survives viewport trimming until
    /// [`Self::focus_lost`].
    pub fn focus_entered(&mut self, index: usize) {
        if self.focused_index() == Some(index) {
            return;
        }
        self.pins.release_focused::<T, F>(&mut self.factory);
        rtrace!(index, "focus_entered");
        self.pins.focused = Some(Pin::new(index));
    }

    /// Releases the focus pin; a parked element goes back to the factory.
    pub fn focus_lost(&mut self) {
        if self.pins.focused.is_none() {
            return;
        }
        rtrace!("focus_lost");
        self.pins.release_focused::<T, F>(&mut self.factory);
    }

    /// Applies a structural change of the item source.
    ///
    /// # Panics
    ///
    /// Panics when called while a measure pass is in flight.
    pub fn items_changed(&mut self, change: ItemsChanged) {
        assert!(
            self.building.is_empty(),
            "items_changed called while a measure pass is in flight"
        );
        rdebug!(?change, "items_changed");
        self.measure_valid = false;
        match change {
            ItemsChanged::Insert { at, count } => self.insert(at, count),
            ItemsChanged::Remove { at, count } => self.remove(at, count),
            ItemsChanged::Replace {
                at,
                old_count,
                new_count,
            } => {
                self.remove(at, old_count);
                self.insert(at, new_count);
            }
            ItemsChanged::Move { from, to, count } => {
                self.remove(from, count);
                self.insert(to, count);
            }
            ItemsChanged::Reset => self.reset(),
        }
    }

    fn insert(&mut self, at: usize, count: usize) {
        let mut sink = Retirer::<T, _, F>::new(&mut self.pins, &mut self.factory, Retire::Removed);
        self.realized.items_inserted(at, count, &mut sink);
        self.pins.items_inserted::<T, F>(at, count, &mut self.factory);
    }

    fn remove(&mut self, at: usize, count: usize) {
        let mut sink = Retirer::<T, _, F>::new(&mut self.pins, &mut self.factory, Retire::Removed);
        self.realized.items_removed(at, count, &mut sink);
        self.pins.items_removed::<T, F>(at, count, &mut self.factory);
    }

    /// Discards every element, pinned ones included. Used when the source is reset or replaced.
    pub fn reset(&mut self) {
        rdebug!(realized = self.realized.len(), "reset");
        self.remember_anchor();
        let mut sink = Retirer::<T, _, F>::new(&mut self.pins, &mut self.factory, Retire::Removed);
        self.realized.recycle_all(&mut sink);
        self.pins.evict_focused::<T, F>(&mut self.factory);
        self.pins.release_scroll_target::<T, F>(&mut self.factory);
        self.measure_valid = false;
    }

    /// Discards every element and forgets the viewport, as when the host removes the engine from
    /// display.
    pub fn detach(&mut self) {
        self.reset();
        self.tracker.clear();
        self.last_final = None;
        self.last_anchor = None;
    }

    /// Runs a measure pass against `available` and returns the desired size.
    ///
    /// A pending bring-into-view pin is released first: a measurement the coordinator did not
    /// start cancels it.
    pub fn measure<S, H>(&mut self, source: &S, available: Constraint, host: &mut H) -> Size
    where
        S: ItemSource<Item = T> + ?Sized,
        H: ScrollHost<F::Element> + ?Sized,
    {
        if self.pins.scroll_target.is_some() {
            rtrace!("measure releases pending scroll target");
            self.pins.release_scroll_target::<T, F>(&mut self.factory);
        }
        self.measure_pass(source, available, host)
    }

    pub(crate) fn measure_pass<S, H>(
        &mut self,
        source: &S,
        available: Constraint,
        host: &mut H,
    ) -> Size
    where
        S: ItemSource<Item = T> + ?Sized,
        H: ScrollHost<F::Element> + ?Sized,
    {
        if self.run_measure(source, available, host) {
            rtrace!("realigned window no longer reaches the viewport end; measuring again");
            self.run_measure(source, available, host);
        }
        self.desired
    }

    /// One realization pass. Returns `true` when realigning index 0 left the viewport end
    /// uncovered.
    fn run_measure<S, H>(&mut self, source: &S, available: Constraint, host: &mut H) -> bool
    where
        S: ItemSource<Item = T> + ?Sized,
        H: ScrollHost<F::Element> + ?Sized,
    {
        assert!(
            self.building.is_empty(),
            "measure re-entered while a pass is in flight"
        );
        let o = self.strategy.orientation();
        self.tracker.set_orientation(o);
        let count = source.count();
        self.last_constraint = Some(available);

        if count == 0 {
            let mut sink = Retirer::<T, _, F>::new(&mut self.pins, &mut self.factory, Retire::Viewport);
            self.realized.recycle_all(&mut sink);
            self.pins.prune::<T, F>(0, &mut self.factory);
            self.desired = Size::ZERO;
            self.measure_valid = true;
            return false;
        }

        if self.tracker.is_waiting() {
            // The host owes us a viewport; keep the current elements and only refresh the extent.
            rtrace!(count, "measure deferred until the viewport is updated");
            self.desired = self.estimate_desired_size(count);
            return false;
        }

        self.strategy.begin_pass();
        let mut mv = self.measure_viewport(count, available, host);
        rtrace!(
            anchor_index = mv.anchor_index,
            anchor_offset = mv.anchor_offset,
            viewport_start = mv.viewport_start,
            viewport_end = mv.viewport_end,
            disjunct = mv.disjunct,
            "measure pass"
        );

        let mut head = mem::take(&mut self.realized);
        if mv.disjunct {
            rdebug!(
                anchor_index = mv.anchor_index,
                recycled = head.len(),
                "anchor is disjunct from the realized window"
            );
            let mut sink = Retirer::<T, _, F>::new(&mut self.pins, &mut self.factory, Retire::Viewport);
            head.recycle_all(&mut sink);
        }
        let mut tail = head.split_off(mv.anchor_index);

        // Forward from the anchor; the anchor itself is always realized.
        let mut index = mv.anchor_index;
        let mut offset = mv.anchor_offset;
        loop {
            let reused = tail.take_front_if(index);
            let mut slot = self.realize(source, index, reused, available);
            slot.start = offset;
            offset += slot.size;
            mv.cross_size = mv.cross_size.max(slot.cross);
            self.building.append(slot);
            index += 1;
            if !(offset < mv.viewport_end && index < count) {
                break;
            }
        }
        mv.last_index = index - 1;
        mv.end_offset = offset;
        {
            let mut sink = Retirer::<T, _, F>::new(&mut self.pins, &mut self.factory, Retire::Viewport);
            tail.recycle_after(mv.last_index, &mut sink);
        }
        debug_assert!(tail.is_empty());

        // Backward from just before the anchor.
        let mut offset = mv.anchor_offset;
        let mut next = mv.anchor_index;
        while offset > mv.viewport_start && next > 0 {
            let index = next - 1;
            let reused = head.take_back_if(index);
            let mut slot = self.realize(source, index, reused, available);
            offset -= slot.size;
            slot.start = offset;
            mv.cross_size = mv.cross_size.max(slot.cross);
            self.building.append(slot);
            next = index;
        }
        {
            let mut sink = Retirer::<T, _, F>::new(&mut self.pins, &mut self.factory, Retire::Viewport);
            head.recycle_before(next, &mut sink);
        }
        debug_assert!(head.is_empty());

        if let Some(cross) = self.second_pass(&mv, available) {
            mv.cross_size = cross;
            mv.end_offset = self.building.iter().last().map_or(mv.end_offset, Slot::end);
        }

        let mut refill = false;
        let drift = self.drift();
        if drift != 0.0 {
            rdebug!(drift, "realigning window with its estimated position");
            self.building.translate(-drift);
            for slot in self.pins.parked_slots_mut() {
                slot.start -= drift;
            }
            mv.end_offset -= drift;
            // The host is expected to scroll along; a later report corrects the tracker if it
            // does not.
            host.realigned(-drift);
            let viewport_end = self
                .tracker
                .realign(-drift)
                .map_or(mv.viewport_end, |rect| o.main_end(rect));
            refill = mv.end_offset < viewport_end && mv.last_index + 1 < count;
        }

        // Swap buffers: what was built becomes the realized window.
        mem::swap(&mut self.realized, &mut self.building);
        debug_assert!(self.building.is_empty());
        debug_assert!(self.realized.is_contiguous());

        self.pins.prune::<T, F>(count, &mut self.factory);
        self.measure_parked(available);
        self.remember_anchor();

        if let Some(estimate) = self.realized.estimate_element_size() {
            if estimate > 0.0 {
                self.estimated_size = estimate;
            }
        }

        let remaining = count - mv.last_index - 1;
        let main = mv.end_offset + remaining as f64 * self.estimated_size;
        self.desired = o.size(main, mv.cross_size);
        self.measure_valid = true;
        rtrace!(
            first = self.realized.first_index(),
            last = mv.last_index,
            desired_main = main,
            desired_cross = mv.cross_size,
            "measure pass done"
        );
        refill
    }

    fn measure_viewport<H>(
        &mut self,
        count: usize,
        available: Constraint,
        host: &mut H,
    ) -> MeasureViewport
    where
        H: ScrollHost<F::Element> + ?Sized,
    {
        let o = self.strategy.orientation();
        let rect = self
            .tracker
            .viewport()
            .rect()
            .or_else(|| host.ancestor_viewport())
            .unwrap_or_else(|| {
                Rect::new(
                    0.0,
                    0.0,
                    available.width.unwrap_or(f64::INFINITY),
                    available.height.unwrap_or(f64::INFINITY),
                )
            });
        let mut viewport_start = o.main_start(rect);
        let mut viewport_end = o.main_end(rect);

        let pinned_target = self
            .pins
            .scroll_target
            .as_ref()
            .and_then(|p| p.parked.as_ref())
            .filter(|s| s.index < count)
            .map(|s| (s.index, s.start, s.end()));

        let (anchor_index, anchor_offset) = match pinned_target {
            Some((index, start, end)) => {
                if end <= viewport_start || start >= viewport_end {
                    // The scrolled viewport has not arrived yet; realize as if it had.
                    let length = viewport_end - viewport_start;
                    viewport_start = start;
                    viewport_end = start + length;
                }
                (index, start)
            }
            None => match self.last_anchor.filter(|a| a.index < count) {
                Some(reference) if self.realized.is_empty() => {
                    let a = window::estimate_from_reference(
                        reference,
                        viewport_start,
                        count,
                        self.estimated_size,
                    );
                    (a.index, a.offset)
                }
                _ => self
                    .realized
                    .get_or_estimate_anchor(
                        viewport_start,
                        viewport_end,
                        count,
                        self.estimated_size,
                    )
                    .map_or((0, 0.0), |a| (a.index, a.offset)),
            },
        };

        let disjunct = !self.realized.is_empty() && !self.realized.spans(anchor_index);
        MeasureViewport {
            anchor_index,
            anchor_offset,
            viewport_start,
            viewport_end,
            cross_size: 0.0,
            last_index: anchor_index,
            end_offset: anchor_offset,
            disjunct,
        }
    }

    /// How far the freshly built run has to move back. Index 0 belongs at offset 0; a run that
    /// starts before offset 0 further down is moved to its estimated position.
    fn drift(&self) -> f64 {
        let Some(first) = self.building.iter().next() else {
            return 0.0;
        };
        if first.index == 0 {
            return first.start;
        }
        if first.start < 0.0 {
            let estimate = self
                .building
                .estimate_element_size()
                .filter(|e| *e > 0.0)
                .unwrap_or(self.estimated_size);
            return first.start - first.index as f64 * estimate;
        }
        0.0
    }

    fn remember_anchor(&mut self) {
        if let Some(first) = self.realized.iter().next() {
            self.last_anchor = Some(Anchor {
                index: first.index,
                offset: first.start,
            });
        }
    }

    /// Produces a measured slot for `index`, reusing `reused` or a parked pin when possible.
    fn realize<S>(
        &mut self,
        source: &S,
        index: usize,
        reused: Option<Slot<F::Element>>,
        available: Constraint,
    ) -> Slot<F::Element>
    where
        S: ItemSource<Item = T> + ?Sized,
    {
        let mut slot = match reused.or_else(|| self.pins.take_parked(index)) {
            Some(slot) => slot,
            None => {
                let element =
                    self.factory
                        .get_or_create(source.item(index), index, self.options.owner);
                Slot::new(index, element)
            }
        };
        let o = self.strategy.orientation();
        let constraint = self.strategy.initial_constraint(index, available);
        let size = self
            .strategy
            .measure_element(&mut slot.element, index, constraint);
        slot.size = o.main(size);
        slot.cross = o.cross(size);
        slot.measured_with = constraint;
        slot
    }

    /// Re-measures elements whose first measurement has been superseded by a definite bound.
    /// Returns the new cross extent when anything was re-measured.
    fn second_pass(&mut self, mv: &MeasureViewport, available: Constraint) -> Option<f64> {
        let o = self.strategy.orientation();
        let mut remeasured = 0usize;
        for slot in self.building.iter_mut() {
            let Some(constraint) =
                self.strategy
                    .needs_second_pass(slot.index, slot.measured_with, available)
            else {
                continue;
            };
            if constraint == slot.measured_with {
                continue;
            }
            let size = self
                .strategy
                .measure_element(&mut slot.element, slot.index, constraint);
            slot.size = o.main(size);
            slot.cross = o.cross(size);
            slot.measured_with = constraint;
            remeasured += 1;
        }
        if remeasured == 0 {
            return None;
        }
        rdebug!(remeasured, "second measure pass");

        // Primary sizes may have changed; lay offsets out again around the fixed anchor.
        let mut cross = 0.0f64;
        let mut offset = mv.anchor_offset;
        for slot in self
            .building
            .iter_mut()
            .filter(|s| s.index >= mv.anchor_index)
        {
            slot.start = offset;
            offset += slot.size;
            cross = cross.max(slot.cross);
        }
        let mut offset = mv.anchor_offset;
        for slot in self
            .building
            .iter_mut()
            .rev()
            .filter(|s| s.index < mv.anchor_index)
        {
            offset -= slot.size;
            slot.start = offset;
            cross = cross.max(slot.cross);
        }
        Some(cross)
    }

    /// Parked pinned elements are not part of the window but still take part in layout.
    fn measure_parked(&mut self, available: Constraint) {
        let o = self.strategy.orientation();
        for slot in self.pins.parked_slots_mut() {
            let constraint = self.strategy.initial_constraint(slot.index, available);
            let size = self
                .strategy
                .measure_element(&mut slot.element, slot.index, constraint);
            slot.size = o.main(size);
            slot.cross = o.cross(size);
            slot.measured_with = constraint;
        }
    }

    /// The extent reported while a pass is deferred: grown to reach a pending scroll target so an
    /// enclosing scroll surface can scroll that far.
    fn estimate_desired_size(&self, count: usize) -> Size {
        let o = self.strategy.orientation();
        let target = self
            .pins
            .scroll_target
            .as_ref()
            .and_then(|p| p.parked.as_ref())
            .filter(|s| s.index < count);
        let Some(target) = target else {
            return self.desired;
        };
        let remaining = count - target.index - 1;
        let main = target.end() + remaining as f64 * self.estimated_size;
        o.size(main.max(o.main(self.desired)), o.cross(self.desired))
    }

    /// Places the realized elements one after another starting at the window's first offset and
    /// offers each to the host as a scroll-anchor candidate.
    pub fn arrange<H>(&mut self, final_size: Size, host: &mut H) -> Size
    where
        H: ScrollHost<F::Element> + ?Sized,
    {
        let o = self.strategy.orientation();
        let cross = o.cross(final_size);
        host.clear_anchor_candidates();

        let mut offset = self.realized.iter().next().map_or(0.0, |s| s.start);
        for slot in self.realized.iter_mut() {
            let rect = o.rect(offset, slot.size, cross);
            self.strategy
                .arrange_element(&mut slot.element, slot.index, rect);
            slot.start = offset;
            slot.rect = Some(rect);
            host.register_anchor_candidate(slot.index, &slot.element, rect);
            offset += slot.size;
        }

        for slot in self.pins.parked_slots_mut() {
            let rect = o.rect(slot.start, slot.size, cross.max(slot.cross));
            self.strategy
                .arrange_element(&mut slot.element, slot.index, rect);
            slot.rect = Some(rect);
        }

        self.last_final = Some(final_size);
        host.extent_changed(final_size);
        rtrace!(
            width = final_size.width,
            height = final_size.height,
            realized = self.realized.len(),
            "arrange"
        );
        final_size
    }

    /// Measures against `available` and arranges at the resulting extent.
    pub fn layout<S, H>(&mut self, source: &S, available: Constraint, host: &mut H) -> Size
    where
        S: ItemSource<Item = T> + ?Sized,
        H: ScrollHost<F::Element> + ?Sized,
    {
        let desired = self.measure(source, available, host);
        let final_size = self.final_size_for(desired, available);
        self.arrange(final_size, host)
    }

    /// Re-runs measure and arrange with the previous constraint, keeping any scroll target pin.
    pub(crate) fn layout_pass<S, H>(&mut self, source: &S, host: &mut H)
    where
        S: ItemSource<Item = T> + ?Sized,
        H: ScrollHost<F::Element> + ?Sized,
    {
        let available = self.last_constraint.unwrap_or(Constraint::UNBOUNDED);
        let desired = self.measure_pass(source, available, host);
        let final_size = self.final_size_for(desired, available);
        self.arrange(final_size, host);
    }

    fn final_size_for(&self, desired: Size, available: Constraint) -> Size {
        let o = self.strategy.orientation();
        let cross = available
            .cross(o)
            .filter(|c| c.is_finite())
            .map_or(o.cross(desired), |c| c.max(o.cross(desired)));
        o.size(o.main(desired), cross)
    }
}

impl<T, F, L> core::fmt::Debug for VirtualizingEngine<T, F, L>
where
    F: ElementFactory<T>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualizingEngine")
            .field("options", &self.options)
            .field("realized", &self.realized.range())
            .field("viewport", &self.tracker.viewport())
            .field("desired", &self.desired)
            .field("estimated_size", &self.estimated_size)
            .field("measure_valid", &self.measure_valid)
            .finish_non_exhaustive()
    }
}
