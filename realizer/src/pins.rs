use core::marker::PhantomData;

use crate::ElementFactory;
use crate::window::{Slot, WindowSink};

/// An index exempt from viewport-driven recycling.
///
/// While the pinned element is inside the realized window `parked` is `None`; once trimming
/// would have recycled it, it is parked here instead until the pin is released.
#[derive(Debug)]
pub(crate) struct Pin<E> {
    pub(crate) index: usize,
    pub(crate) parked: Option<Slot<E>>,
}

impl<E> Pin<E> {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            parked: None,
        }
    }

    pub(crate) fn parked(index: usize, slot: Slot<E>) -> Self {
        Self {
            index,
            parked: Some(slot),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Pins<E> {
    pub(crate) focused: Option<Pin<E>>,
    pub(crate) scroll_target: Option<Pin<E>>,
}

impl<E> Default for Pins<E> {
    fn default() -> Self {
        Self {
            focused: None,
            scroll_target: None,
        }
    }
}

/// Why a slot is leaving the realized window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Retire {
    /// Trimmed because it scrolled away; pinned slots are parked instead.
    Viewport,
    /// Its item was removed from the source; pins do not protect it.
    Removed,
}

impl<E> Pins<E> {
    pub(crate) fn parked_slot(&self, index: usize) -> Option<&Slot<E>> {
        [&self.focused, &self.scroll_target]
            .into_iter()
            .flatten()
            .filter_map(|p| p.parked.as_ref())
            .find(|s| s.index == index)
    }

    pub(crate) fn parked_slots(&self) -> impl Iterator<Item = &Slot<E>> + '_ {
        [&self.focused, &self.scroll_target]
            .into_iter()
            .flatten()
            .filter_map(|p| p.parked.as_ref())
    }

    pub(crate) fn parked_slots_mut(&mut self) -> impl Iterator<Item = &mut Slot<E>> + '_ {
        [&mut self.focused, &mut self.scroll_target]
            .into_iter()
            .flatten()
            .filter_map(|p| p.parked.as_mut())
    }

    /// Takes a parked slot back so a measure pass can put it into the window again.
    pub(crate) fn take_parked(&mut self, index: usize) -> Option<Slot<E>> {
        for pin in [&mut self.focused, &mut self.scroll_target]
            .into_iter()
            .flatten()
        {
            if pin.index == index && pin.parked.is_some() {
                return pin.parked.take();
            }
        }
        None
    }

    /// Routes a slot leaving the window either into a pin or back to the factory.
    pub(crate) fn retire<T, F>(&mut self, mut slot: Slot<E>, cause: Retire, factory: &mut F)
    where
        F: ElementFactory<T, Element = E>,
    {
        match cause {
            Retire::Viewport => {
                for pin in [&mut self.focused, &mut self.scroll_target]
                    .into_iter()
                    .flatten()
                {
                    if pin.index == slot.index && pin.parked.is_none() {
                        rtrace!(index = slot.index, "parking pinned element");
                        pin.parked = Some(slot);
                        return;
                    }
                }
                factory.recycle(slot.element);
            }
            Retire::Removed => {
                if self.focused.as_ref().is_some_and(|p| p.index == slot.index) {
                    rdebug!(index = slot.index, "focused item removed");
                    factory.clear_focus(&mut slot.element);
                    self.focused = None;
                }
                if self
                    .scroll_target
                    .as_ref()
                    .is_some_and(|p| p.index == slot.index)
                {
                    self.scroll_target = None;
                }
                factory.recycle(slot.element);
            }
        }
    }

    pub(crate) fn release_focused<T, F>(&mut self, factory: &mut F)
    where
        F: ElementFactory<T, Element = E>,
    {
        if let Some(slot) = self.focused.take().and_then(|p| p.parked) {
            factory.recycle(slot.element);
        }
    }

    /// Drops the focus pin because its item is gone, clearing focus on a parked element before
    /// it goes back to the factory.
    pub(crate) fn evict_focused<T, F>(&mut self, factory: &mut F)
    where
        F: ElementFactory<T, Element = E>,
    {
        if let Some(mut slot) = self.focused.take().and_then(|p| p.parked) {
            rdebug!(index = slot.index, "focused item removed");
            factory.clear_focus(&mut slot.element);
            factory.recycle(slot.element);
        }
    }

    pub(crate) fn release_scroll_target<T, F>(&mut self, factory: &mut F)
    where
        F: ElementFactory<T, Element = E>,
    {
        if let Some(slot) = self.scroll_target.take().and_then(|p| p.parked) {
            factory.recycle(slot.element);
        }
    }

    pub(crate) fn items_inserted<T, F>(&mut self, start: usize, count: usize, factory: &mut F)
    where
        F: ElementFactory<T, Element = E>,
    {
        for pin in [&mut self.focused, &mut self.scroll_target]
            .into_iter()
            .flatten()
        {
            if pin.index >= start {
                let old = pin.index;
                pin.index += count;
                if let Some(slot) = pin.parked.as_mut() {
                    slot.index = pin.index;
                    factory.update_index(&mut slot.element, old, pin.index);
                }
            }
        }
    }

    /// Evicts pins whose item was removed and shifts the rest. Pins whose element sits in the
    /// window have already been handled through [`Self::retire`].
    pub(crate) fn items_removed<T, F>(&mut self, start: usize, count: usize, factory: &mut F)
    where
        F: ElementFactory<T, Element = E>,
    {
        let end = start.saturating_add(count);
        for is_focus in [true, false] {
            let slot_ref = if is_focus {
                &mut self.focused
            } else {
                &mut self.scroll_target
            };
            let Some(pin) = slot_ref.as_mut() else {
                continue;
            };
            if pin.index >= end {
                let old = pin.index;
                pin.index -= count;
                if let Some(slot) = pin.parked.as_mut() {
                    slot.index = pin.index;
                    factory.update_index(&mut slot.element, old, pin.index);
                }
            } else if pin.index >= start {
                if let Some(mut slot) = slot_ref.take().and_then(|p| p.parked) {
                    if is_focus {
                        factory.clear_focus(&mut slot.element);
                    }
                    factory.recycle(slot.element);
                }
            }
        }
    }

    /// Drops pins at or beyond `count`, returning any parked element to the factory.
    pub(crate) fn prune<T, F>(&mut self, count: usize, factory: &mut F)
    where
        F: ElementFactory<T, Element = E>,
    {
        if self.focused.as_ref().is_some_and(|p| p.index >= count) {
            rdebug!(count, "pruning focus pin beyond item count");
            self.evict_focused::<T, F>(factory);
        }
        if self.scroll_target.as_ref().is_some_and(|p| p.index >= count) {
            rdebug!(count, "pruning scroll target beyond item count");
            self.release_scroll_target::<T, F>(factory);
        }
    }
}

/// Adapts [`Pins::retire`] to the [`WindowSink`] interface used by `ItemWindow`.
pub(crate) struct Retirer<'a, T, E, F> {
    pub(crate) pins: &'a mut Pins<E>,
    pub(crate) factory: &'a mut F,
    pub(crate) cause: Retire,
    pub(crate) _item: PhantomData<fn(&T)>,
}

impl<'a, T, E, F: ElementFactory<T, Element = E>> Retirer<'a, T, E, F> {
    pub(crate) fn new(pins: &'a mut Pins<E>, factory: &'a mut F, cause: Retire) -> Self {
        Self {
            pins,
            factory,
            cause,
            _item: PhantomData,
        }
    }
}

impl<T, E, F: ElementFactory<T, Element = E>> WindowSink<E> for Retirer<'_, T, E, F> {
    fn recycle(&mut self, slot: Slot<E>) {
        self.pins
            .retire::<T, F>(slot, self.cause, &mut *self.factory);
    }

    fn reindex(&mut self, element: &mut E, old_index: usize, new_index: usize) {
        self.factory.update_index(element, old_index, new_index);
    }
}
