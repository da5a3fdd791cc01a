use alloc::rc::Rc;
use core::cell::RefCell;

use crate::OwnerId;

/// Creates elements for items and takes them back when they are no longer realized.
///
/// A factory may hand out an element it previously received through [`Self::recycle`]; it is
/// responsible for clearing that element's old binding before returning it.
///
/// Pools are allowed to be shared between engines (see the `Rc<RefCell<_>>` impl), so an engine
/// never assumes it owns what is in the pool. `owner` tells the factory which engine is asking.
pub trait ElementFactory<T> {
    type Element;

    fn get_or_create(&mut self, item: &T, index: usize, owner: OwnerId) -> Self::Element;

    fn recycle(&mut self, element: Self::Element);

    /// Called when a realized element's model index shifts because of an insert or removal
    /// elsewhere in the source.
    fn update_index(&mut self, element: &mut Self::Element, old_index: usize, new_index: usize) {
        let _ = (element, old_index, new_index);
    }

    /// Called before a focused element is torn down because its item was removed.
    fn clear_focus(&mut self, element: &mut Self::Element) {
        let _ = element;
    }
}

impl<T, F: ElementFactory<T> + ?Sized> ElementFactory<T> for &mut F {
    type Element = F::Element;

    fn get_or_create(&mut self, item: &T, index: usize, owner: OwnerId) -> F::Element {
        (**self).get_or_create(item, index, owner)
    }

    fn recycle(&mut self, element: F::Element) {
        (**self).recycle(element)
    }

    fn update_index(&mut self, element: &mut F::Element, old_index: usize, new_index: usize) {
        (**self).update_index(element, old_index, new_index)
    }

    fn clear_focus(&mut self, element: &mut F::Element) {
        (**self).clear_focus(element)
    }
}

impl<T, F: ElementFactory<T>> ElementFactory<T> for Rc<RefCell<F>> {
    type Element = F::Element;

    fn get_or_create(&mut self, item: &T, index: usize, owner: OwnerId) -> F::Element {
        self.borrow_mut().get_or_create(item, index, owner)
    }

    fn recycle(&mut self, element: F::Element) {
        self.borrow_mut().recycle(element)
    }

    fn update_index(&mut self, element: &mut F::Element, old_index: usize, new_index: usize) {
        self.borrow_mut().update_index(element, old_index, new_index)
    }

    fn clear_focus(&mut self, element: &mut F::Element) {
        self.borrow_mut().clear_focus(element)
    }
}
