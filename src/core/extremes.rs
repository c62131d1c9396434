use tracing::{debug, trace};

use crate::core::{AxisPair, BoundingBox, MapPoint, ValueExtremes};

/// Zoom floor factor: never zoom closer than a fifth of the smallest shape.
pub const MIN_RANGE_SHAPE_FACTOR: f64 = 5.0;
/// Zoom floor relative to the whole collection extent.
pub const MIN_RANGE_COLLECTION_DIVISOR: f64 = 5.0;

/// Result of one collection-wide box pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxUpdate {
    pub collection: Option<BoundingBox>,
    /// Smallest positive single-entity extent seen in the pass.
    pub smallest_extent: Option<f64>,
    /// Entities whose geometry was (re)scanned instead of read from cache.
    pub rescanned: usize,
    /// Entities that contributed a box.
    pub boxed: usize,
}

/// Running bounding box of an entity collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtremesTracker {
    mid_offsets: (f64, f64),
    collection_box: Option<BoundingBox>,
    smallest_extent: Option<f64>,
}

impl Default for ExtremesTracker {
    fn default() -> Self {
        Self::new((0.5, 0.5))
    }
}

impl ExtremesTracker {
    #[must_use]
    pub fn new(mid_offsets: (f64, f64)) -> Self {
        Self {
            mid_offsets,
            collection_box: None,
            smallest_extent: None,
        }
    }

    #[must_use]
    pub fn collection_box(&self) -> Option<BoundingBox> {
        self.collection_box
    }

    #[must_use]
    pub fn smallest_extent(&self) -> Option<f64> {
        self.smallest_extent
    }

    pub fn reset(&mut self) {
        self.collection_box = None;
        self.smallest_extent = None;
    }

    /// Rebuilds the collection box from every entity's cached box.
    ///
    /// Only entities with stale caches rescan their path. Entities without
    /// finite geometry stay in the collection but do not contribute.
    pub fn update_box(&mut self, points: &mut [MapPoint]) -> BoxUpdate {
        self.reset();
        let mut rescanned = 0;
        let mut boxed = 0;

        for point in points.iter_mut() {
            if !point.has_fresh_geometry() {
                rescanned += 1;
            }
            if self.include_point(point).is_some() {
                boxed += 1;
            }
        }

        debug!(
            entities = points.len(),
            rescanned,
            boxed,
            smallest_extent = ?self.smallest_extent,
            "updated collection box"
        );

        BoxUpdate {
            collection: self.collection_box,
            smallest_extent: self.smallest_extent,
            rescanned,
            boxed,
        }
    }

    /// Folds one entity into the running box; the box only ever grows.
    pub fn include_point(&mut self, point: &mut MapPoint) -> Option<BoundingBox> {
        let geometry = point.resolve_geometry(self.mid_offsets)?;
        let bounds = geometry.bounds;
        trace!(index = point.index(), ?bounds, "entity box");

        self.collection_box = Some(match self.collection_box {
            Some(existing) => existing.union(bounds),
            None => bounds,
        });

        let extent = bounds.min_extent();
        if extent > 0.0 {
            self.smallest_extent = Some(self.smallest_extent.map_or(extent, |e| e.min(extent)));
        }
        Some(bounds)
    }

    /// Lowers each axis' `min_range` to `min(5 x smallest extent,
    /// axis extent / 5, previous)`. Axes with a configured range are left
    /// untouched.
    pub fn apply_min_range(&self, axes: &mut AxisPair) {
        let (Some(bounds), Some(smallest)) = (self.collection_box, self.smallest_extent) else {
            return;
        };
        let shape_floor = MIN_RANGE_SHAPE_FACTOR * smallest;
        axes.x
            .fold_min_range(shape_floor.min(bounds.width() / MIN_RANGE_COLLECTION_DIVISOR));
        axes.y
            .fold_min_range(shape_floor.min(bounds.height() / MIN_RANGE_COLLECTION_DIVISOR));
    }
}

/// Min/max over finite values; nulls and non-finite entries are ignored.
#[must_use]
pub fn value_extremes(values: impl IntoIterator<Item = Option<f64>>) -> Option<ValueExtremes> {
    let mut extremes: Option<ValueExtremes> = None;
    for value in values.into_iter().flatten() {
        if !value.is_finite() {
            continue;
        }
        extremes = Some(match extremes {
            Some(current) => ValueExtremes {
                min: current.min.min(value),
                max: current.max.max(value),
            },
            None => ValueExtremes {
                min: value,
                max: value,
            },
        });
    }
    extremes
}
