use crate::pins::Pin;
use crate::window::Slot;
use crate::{
    Constraint, ElementFactory, ItemSource, LayoutStrategy, Rect, ScrollHost, VirtualizingEngine,
};

impl<T, F, L> VirtualizingEngine<T, F, L>
where
    F: ElementFactory<T>,
    L: LayoutStrategy<F::Element>,
{
    /// Scrolls the host until the element for `index` is visible and returns it.
    ///
    /// An element that is already bound (realized or pinned) is handed to the host directly.
    /// Otherwise the element is created, measured unbounded and placed at its estimated offset,
    /// then pinned as the scroll target while the host scrolls and a layout pass runs around it.
    /// `sub_rect`, in the element's local coordinates, narrows what has to become visible.
    ///
    /// Returns `None` when the engine has never been measured, or when the element did not end up
    /// in the realized window once the pin was released.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of range for `source`.
    pub fn bring_into_view<S, H>(
        &mut self,
        source: &S,
        index: usize,
        sub_rect: Option<Rect>,
        host: &mut H,
    ) -> Option<&F::Element>
    where
        S: ItemSource<Item = T> + ?Sized,
        H: ScrollHost<F::Element> + ?Sized,
    {
        let count = source.count();
        assert!(
            index < count,
            "bring_into_view: index {index} out of range for {count} items"
        );
        let o = self.strategy.orientation();

        if let Some(rect) = self.bound_rect(index) {
            let target = sub_rect.map_or(rect, |r| r.translate(rect.x, rect.y));
            rdebug!(index, "bring_into_view: element already bound");
            let reported = match self.try_get_element(index) {
                Some(element) => host.bring_into_view(element, target),
                None => None,
            };
            if let Some(viewport) = reported {
                self.on_viewport_changed(viewport);
            }
            return self.try_get_element(index);
        }

        if self.last_constraint.is_none() {
            rdebug!(index, "bring_into_view before the first measure pass");
            return None;
        }

        self.pins.release_scroll_target::<T, F>(&mut self.factory);
        let mut element = self
            .factory
            .get_or_create(source.item(index), index, self.options.owner);
        let size = self
            .strategy
            .measure_element(&mut element, index, Constraint::UNBOUNDED);
        let start = self
            .realized
            .get_or_estimate_offset(index, self.estimated_size);
        let mut rect = o.rect(start, o.main(size), o.cross(size));
        self.strategy.arrange_element(&mut element, index, rect);

        let mut slot = Slot::new(index, element);
        slot.start = start;
        slot.size = o.main(size);
        slot.cross = o.cross(size);
        slot.rect = Some(rect);
        self.pins.scroll_target = Some(Pin::parked(index, slot));
        rdebug!(
            index,
            start,
            main = o.main(size),
            "bring_into_view: pinned scroll target"
        );

        let bounds = Rect::from_size(self.last_final.unwrap_or(self.desired));
        if !bounds.contains(&rect) && !self.tracker.contains(&rect) {
            // Grow the extent first so the host can scroll as far as the estimated offset.
            self.tracker.set_waiting(true);
            self.layout_pass(source, host);
            self.tracker.set_waiting(false);
        }

        let target = sub_rect.map_or(rect, |r| r.translate(rect.x, rect.y));
        let reported = match self.pins.scroll_target.as_ref().and_then(|p| p.parked.as_ref()) {
            Some(slot) => host.bring_into_view(&slot.element, target),
            None => None,
        };
        let mut placed = false;
        if let Some(viewport) = reported {
            self.on_viewport_changed(viewport);
            let missed = self
                .tracker
                .viewport()
                .rect()
                .is_some_and(|vp| {
                    o.main_end(target) < o.main_start(vp) || o.main_start(target) > o.main_end(vp)
                });
            if missed {
                if let Some(moved) = self.place_scroll_target(index) {
                    rect = moved;
                    placed = true;
                }
            }
        }

        self.tracker.set_waiting(!placed && !self.tracker.contains(&rect));
        self.layout_pass(source, host);
        if self.tracker.is_waiting() {
            rwarn!(
                index,
                "bring_into_view: host did not report a viewport containing the target"
            );
            self.tracker.set_waiting(false);
            self.invalidate_measure();
            self.layout_pass(source, host);
        }

        self.pins.release_scroll_target::<T, F>(&mut self.factory);
        self.try_get_element(index)
    }

    /// Moves the pinned target into the known viewport when the host could not scroll to its
    /// estimated position. Returns the target's new rect.
    fn place_scroll_target(&mut self, index: usize) -> Option<Rect> {
        let o = self.strategy.orientation();
        let viewport = self.tracker.viewport().rect()?;
        let slot = self.pins.scroll_target.as_mut()?.parked.as_mut()?;
        let (vp_start, vp_end) = (o.main_start(viewport), o.main_end(viewport));
        let start = if slot.start < vp_start || slot.size >= vp_end - vp_start {
            vp_start
        } else {
            vp_end - slot.size
        };
        rdebug!(
            index,
            from = slot.start,
            to = start,
            "bring_into_view: estimate out of the host's reach, moving target"
        );
        slot.start = start;
        let rect = o.rect(start, slot.size, slot.cross);
        slot.rect = Some(rect);
        self.strategy.arrange_element(&mut slot.element, index, rect);
        Some(rect)
    }

    /// Where the bound element for `index` sits, arranged or not.
    fn bound_rect(&self, index: usize) -> Option<Rect> {
        let o = self.strategy.orientation();
        let slot = self
            .realized
            .slot(index)
            .or_else(|| self.pins.parked_slot(index))?;
        Some(
            slot.rect
                .unwrap_or_else(|| o.rect(slot.start, slot.size, slot.cross)),
        )
    }
}
