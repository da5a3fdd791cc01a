/// The axis along which items are laid out one after another.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    /// Primary-axis component of a size.
    pub fn main(self, size: Size) -> f64 {
        match self {
            Self::Vertical => size.height,
            Self::Horizontal => size.width,
        }
    }

    /// Cross-axis component of a size.
    pub fn cross(self, size: Size) -> f64 {
        match self {
            Self::Vertical => size.width,
            Self::Horizontal => size.height,
        }
    }

    pub fn size(self, main: f64, cross: f64) -> Size {
        match self {
            Self::Vertical => Size::new(cross, main),
            Self::Horizontal => Size::new(main, cross),
        }
    }

    /// Builds a rect whose primary axis spans `[main_start, main_start + main_size)` and whose
    /// cross axis starts at zero.
    pub fn rect(self, main_start: f64, main_size: f64, cross_size: f64) -> Rect {
        match self {
            Self::Vertical => Rect::new(0.0, main_start, cross_size, main_size),
            Self::Horizontal => Rect::new(main_start, 0.0, main_size, cross_size),
        }
    }

    pub fn main_start(self, rect: Rect) -> f64 {
        match self {
            Self::Vertical => rect.y,
            Self::Horizontal => rect.x,
        }
    }

    pub fn main_end(self, rect: Rect) -> f64 {
        match self {
            Self::Vertical => rect.bottom(),
            Self::Horizontal => rect.right(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A rectangle in local layout coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// `true` when the rect covers no area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Half-open intersection test: rects that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        other.x < self.right()
            && self.x < other.right()
            && other.y < self.bottom()
            && self.y < other.bottom()
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// A measurement constraint. `None` on an axis means "unbounded".
///
/// This is deliberately a separate type from [`Viewport`]: an unbounded measurement axis and an
/// unknown viewport are different facts and never share a sentinel value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Constraint {
    pub const UNBOUNDED: Constraint = Constraint {
        width: None,
        height: None,
    };

    pub const fn new(width: Option<f64>, height: Option<f64>) -> Self {
        Self { width, height }
    }

    pub const fn bounded(size: Size) -> Self {
        Self {
            width: Some(size.width),
            height: Some(size.height),
        }
    }

    pub fn main(&self, orientation: Orientation) -> Option<f64> {
        match orientation {
            Orientation::Vertical => self.height,
            Orientation::Horizontal => self.width,
        }
    }

    pub fn cross(&self, orientation: Orientation) -> Option<f64> {
        match orientation {
            Orientation::Vertical => self.width,
            Orientation::Horizontal => self.height,
        }
    }

    pub fn with_main(mut self, orientation: Orientation, main: Option<f64>) -> Self {
        match orientation {
            Orientation::Vertical => self.height = main,
            Orientation::Horizontal => self.width = main,
        }
        self
    }

    pub fn with_cross(mut self, orientation: Orientation, cross: Option<f64>) -> Self {
        match orientation {
            Orientation::Vertical => self.width = cross,
            Orientation::Horizontal => self.height = cross,
        }
        self
    }

    pub fn is_unbounded_cross(&self, orientation: Orientation) -> bool {
        self.cross(orientation).is_none()
    }
}

/// The visible region reported by the host scroll surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Viewport {
    #[default]
    Unknown,
    Known(Rect),
}

impl Viewport {
    /// Normalizes a host report: a zero-area rect carries no information and becomes `Unknown`.
    pub fn from_reported(rect: Rect) -> Self {
        if rect.is_empty() {
            Self::Unknown
        } else {
            Self::Known(rect)
        }
    }

    pub fn rect(&self) -> Option<Rect> {
        match self {
            Self::Unknown => None,
            Self::Known(r) => Some(*r),
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

/// A structural change to an item source, delivered synchronously to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemsChanged {
    Insert {
        at: usize,
        count: usize,
    },
    Remove {
        at: usize,
        count: usize,
    },
    Replace {
        at: usize,
        old_count: usize,
        new_count: usize,
    },
    /// `count` items formerly at `from` now start at `to` (indices after the removal).
    Move {
        from: usize,
        to: usize,
        count: usize,
    },
    Reset,
}

/// Identifies an engine instance to a factory that may serve several engines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OwnerId(pub u64);

/// The index range currently realized, `end_index` exclusive.
///
/// Contiguous after every measure pass. An insert inside the window widens the range before the
/// inserted indices have elements, so until the next pass it may cover indices with no element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RealizedRange {
    pub start_index: usize,
    pub end_index: usize,
}

impl RealizedRange {
    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }
}

pub(crate) fn are_close(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let eps = (abs(a) + abs(b) + 10.0) * 1.0e-9;
    abs(a - b) < eps
}

// `f64::abs` is not available without `std` on every supported toolchain.
pub(crate) fn abs(v: f64) -> f64 {
    if v < 0.0 { -v } else { v }
}
