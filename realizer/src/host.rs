use crate::{Rect, Size};

/// The scroll surface (and layout root) an engine is hosted in.
///
/// Every method except [`Self::bring_into_view`] has a no-op default so simple hosts only need to
/// implement scrolling.
pub trait ScrollHost<E> {
    /// The viewport obtained by walking ancestor bounds, used when no viewport has been reported
    /// yet. `None` falls back to the available measurement constraint.
    fn ancestor_viewport(&self) -> Option<Rect> {
        None
    }

    /// Called at the end of every arrange pass with the arranged extent.
    fn extent_changed(&mut self, extent: Size) {
        let _ = extent;
    }

    /// Called when a measure pass moved every realized element by `delta` along the primary axis
    /// because index 0 had drifted away from offset 0. A surface that keeps its content in place
    /// scrolls by the same amount.
    fn realigned(&mut self, delta: f64) {
        let _ = delta;
    }

    /// Called at the start of every arrange pass, before candidates are registered again.
    fn clear_anchor_candidates(&mut self) {}

    /// Offers an arranged element as a scroll-anchoring candidate.
    fn register_anchor_candidate(&mut self, index: usize, element: &E, rect: Rect) {
        let _ = (index, element, rect);
    }

    /// Asks the surface to scroll so `rect` (in the engine's local coordinates) becomes visible.
    ///
    /// Returns the resulting effective viewport when the surface knows it synchronously; `None`
    /// means a viewport update will arrive later through `on_viewport_changed`.
    fn bring_into_view(&mut self, element: &E, rect: Rect) -> Option<Rect>;
}

impl<E, H: ScrollHost<E> + ?Sized> ScrollHost<E> for &mut H {
    fn ancestor_viewport(&self) -> Option<Rect> {
        (**self).ancestor_viewport()
    }

    fn extent_changed(&mut self, extent: Size) {
        (**self).extent_changed(extent)
    }

    fn realigned(&mut self, delta: f64) {
        (**self).realigned(delta)
    }

    fn clear_anchor_candidates(&mut self) {
        (**self).clear_anchor_candidates()
    }

    fn register_anchor_candidate(&mut self, index: usize, element: &E, rect: Rect) {
        (**self).register_anchor_candidate(index, element, rect)
    }

    fn bring_into_view(&mut self, element: &E, rect: Rect) -> Option<Rect> {
        (**self).bring_into_view(element, rect)
    }
}
