use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Axis-aligned box in whatever space its producer works in (data or pixels).
///
/// Boxes are only constructed from at least one finite coordinate pair, so an
/// existing `BoundingBox` is never empty. Absence is modeled as `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn from_point(x: f64, y: f64) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    /// Folds `(x, y)` into the box. Non-finite pairs are ignored.
    pub fn include(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// Builds a box from coordinate pairs, skipping non-finite ones.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut bounds: Option<Self> = None;
        for (x, y) in points {
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            match bounds.as_mut() {
                Some(existing) => existing.include(x, y),
                None => bounds = Some(Self::from_point(x, y)),
            }
        }
        bounds
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn area(self) -> f64 {
        self.width() * self.height()
    }

    /// Smaller of the two extents; used by the zoom-range heuristic.
    #[must_use]
    pub fn min_extent(self) -> f64 {
        self.width().min(self.height())
    }

    /// Point at relative offsets inside the box (`0.5, 0.5` is the mid-box).
    #[must_use]
    pub fn relative_point(self, offset_x: f64, offset_y: f64) -> (f64, f64) {
        (
            self.min_x + self.width() * offset_x,
            self.min_y + self.height() * offset_y,
        )
    }

    #[must_use]
    pub fn contains_box(self, other: Self) -> bool {
        self.min_x <= other.min_x
            && self.max_x >= other.max_x
            && self.min_y <= other.min_y
            && self.max_y >= other.max_y
    }

    #[must_use]
    pub fn contains_point(self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Closed value range of a series' numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueExtremes {
    pub min: f64,
    pub max: f64,
}

impl ValueExtremes {
    /// Relative position of `value` inside the range, clamped to `[0, 1]`.
    ///
    /// A degenerate range maps every value to `1.0`.
    #[must_use]
    pub fn normalize(self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 || !span.is_finite() {
            return 1.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}
