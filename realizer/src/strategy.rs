use crate::{Constraint, Orientation, Rect, Size};

/// Axis- and role-specific layout behavior injected into a [`crate::VirtualizingEngine`].
///
/// Rows, columns and header cells differ only in how an element is measured and placed; the
/// realization algorithm itself is shared.
pub trait LayoutStrategy<E> {
    fn orientation(&self) -> Orientation;

    /// Called once at the start of every measure pass.
    fn begin_pass(&mut self) {}

    /// The constraint an element is first measured with during a pass.
    ///
    /// The default leaves the primary axis unbounded and passes the available cross extent
    /// through.
    fn initial_constraint(&mut self, index: usize, available: Constraint) -> Constraint {
        let _ = index;
        available.with_main(self.orientation(), None)
    }

    fn measure_element(&mut self, element: &mut E, index: usize, constraint: Constraint) -> Size;

    /// Asked after both walks of a pass for every realized element. Returning a constraint that
    /// differs from `measured_with` re-measures the element with it.
    fn needs_second_pass(
        &mut self,
        index: usize,
        measured_with: Constraint,
        available: Constraint,
    ) -> Option<Constraint> {
        let _ = (index, measured_with, available);
        None
    }

    fn arrange_element(&mut self, element: &mut E, index: usize, rect: Rect);
}

impl<E, L: LayoutStrategy<E> + ?Sized> LayoutStrategy<E> for &mut L {
    fn orientation(&self) -> Orientation {
        (**self).orientation()
    }

    fn begin_pass(&mut self) {
        (**self).begin_pass()
    }

    fn initial_constraint(&mut self, index: usize, available: Constraint) -> Constraint {
        (**self).initial_constraint(index, available)
    }

    fn measure_element(&mut self, element: &mut E, index: usize, constraint: Constraint) -> Size {
        (**self).measure_element(element, index, constraint)
    }

    fn needs_second_pass(
        &mut self,
        index: usize,
        measured_with: Constraint,
        available: Constraint,
    ) -> Option<Constraint> {
        (**self).needs_second_pass(index, measured_with, available)
    }

    fn arrange_element(&mut self, element: &mut E, index: usize, rect: Rect) {
        (**self).arrange_element(element, index, rect)
    }
}

/// A single-pass stack layout backed by closures.
pub struct StackLayout<M, A> {
    orientation: Orientation,
    measure: M,
    arrange: A,
}

impl<M, A> StackLayout<M, A> {
    pub fn new(orientation: Orientation, measure: M, arrange: A) -> Self {
        Self {
            orientation,
            measure,
            arrange,
        }
    }
}

impl<E, M, A> LayoutStrategy<E> for StackLayout<M, A>
where
    M: FnMut(&mut E, usize, Constraint) -> Size,
    A: FnMut(&mut E, usize, Rect),
{
    fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn measure_element(&mut self, element: &mut E, index: usize, constraint: Constraint) -> Size {
        (self.measure)(element, index, constraint)
    }

    fn arrange_element(&mut self, element: &mut E, index: usize, rect: Rect) {
        (self.arrange)(element, index, rect)
    }
}

impl<M, A> core::fmt::Debug for StackLayout<M, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StackLayout")
            .field("orientation", &self.orientation)
            .finish_non_exhaustive()
    }
}

/// Wraps a strategy so that every element shares one cross-axis extent.
///
/// Elements are first measured at their natural cross size. Once the pass has seen all of them,
/// the largest natural size is committed and each element is measured again bounded to it, so no
/// element ends up smaller than its own measured minimum. The committed extent only grows until
/// [`Self::reset`] is called.
#[derive(Debug)]
pub struct SharedCrossLayout<L> {
    inner: L,
    committed: Option<f64>,
}

impl<L> SharedCrossLayout<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            committed: None,
        }
    }

    pub fn committed_cross(&self) -> Option<f64> {
        self.committed
    }

    pub fn reset(&mut self) {
        self.committed = None;
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut L {
        &mut self.inner
    }
}

impl<E, L: LayoutStrategy<E>> LayoutStrategy<E> for SharedCrossLayout<L> {
    fn orientation(&self) -> Orientation {
        self.inner.orientation()
    }

    fn begin_pass(&mut self) {
        self.inner.begin_pass();
    }

    fn initial_constraint(&mut self, index: usize, available: Constraint) -> Constraint {
        let o = self.inner.orientation();
        self.inner
            .initial_constraint(index, available)
            .with_cross(o, None)
    }

    fn measure_element(&mut self, element: &mut E, index: usize, constraint: Constraint) -> Size {
        let size = self.inner.measure_element(element, index, constraint);
        let cross = self.inner.orientation().cross(size);
        self.committed = Some(self.committed.map_or(cross, |c| c.max(cross)));
        size
    }

    fn needs_second_pass(
        &mut self,
        index: usize,
        measured_with: Constraint,
        available: Constraint,
    ) -> Option<Constraint> {
        let o = self.inner.orientation();
        if !measured_with.is_unbounded_cross(o) {
            return self.inner.needs_second_pass(index, measured_with, available);
        }
        let committed = self.committed?;
        Some(measured_with.with_cross(o, Some(committed)))
    }

    fn arrange_element(&mut self, element: &mut E, index: usize, rect: Rect) {
        self.inner.arrange_element(element, index, rect)
    }
}
