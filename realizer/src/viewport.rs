use crate::types::are_close;
use crate::{Orientation, Rect, Viewport};

/// Tracks the effective viewport reported by the host scroll surface.
///
/// The tracker decides whether a report is worth a new measure pass: only a change of the
/// primary-axis span counts. It also carries the "waiting for a viewport" flag a bring-into-view
/// sequence sets while the host has not yet delivered the scrolled viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportTracker {
    orientation: Orientation,
    viewport: Viewport,
    waiting: bool,
}

impl ViewportTracker {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            viewport: Viewport::Unknown,
            waiting: false,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Records a viewport report. Returns `true` when the layout must be measured again.
    pub fn update(&mut self, reported: Rect) -> bool {
        let next = Viewport::from_reported(reported);
        let was_waiting = core::mem::replace(&mut self.waiting, false);
        let o = self.orientation;
        let moved = match (self.viewport, next) {
            (Viewport::Known(prev), Viewport::Known(cur)) => {
                !are_close(o.main_start(prev), o.main_start(cur))
                    || !are_close(o.main_end(prev), o.main_end(cur))
            }
            (Viewport::Unknown, Viewport::Unknown) => false,
            _ => true,
        };
        rtrace!(
            x = reported.x,
            y = reported.y,
            width = reported.width,
            height = reported.height,
            moved,
            was_waiting,
            "viewport reported"
        );
        self.viewport = next;
        moved || was_waiting
    }

    /// Moves the known viewport by `delta` along the primary axis, never past offset 0, after the
    /// realized run was moved by the same amount. Returns the moved rect.
    pub(crate) fn realign(&mut self, delta: f64) -> Option<Rect> {
        let rect = self.viewport.rect()?;
        let o = self.orientation;
        let delta = delta.max(-o.main_start(rect));
        let moved = match o {
            Orientation::Vertical => rect.translate(0.0, delta),
            Orientation::Horizontal => rect.translate(delta, 0.0),
        };
        rtrace!(delta, "viewport realigned");
        self.viewport = Viewport::Known(moved);
        Some(moved)
    }

    /// Forgets the viewport, e.g. after the host detaches the engine.
    pub fn clear(&mut self) {
        self.viewport = Viewport::Unknown;
        self.waiting = false;
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub(crate) fn set_waiting(&mut self, waiting: bool) {
        self.waiting = waiting;
    }

    /// `true` when the known viewport fully contains `rect`.
    pub fn contains(&self, rect: &Rect) -> bool {
        self.viewport.rect().is_some_and(|v| v.contains(rect))
    }
}
