use serde::{Deserialize, Serialize};

use crate::core::{BoundingBox, PathSegment, path_bounds};

/// Geometry derived once per path version.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedGeometry {
    pub bounds: BoundingBox,
    /// Label anchor at the configured relative offsets of `bounds`
    /// (mid-box by default, not the area centroid).
    pub mid_x: f64,
    pub mid_y: f64,
    pub label_rank: f64,
}

/// Per-entity cache keyed by the entity's geometry version.
///
/// A cache entry is valid only for the exact version it was computed for;
/// bumping the version on the owning entity is the only invalidation path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryCache {
    computed_for: Option<u64>,
    derived: Option<DerivedGeometry>,
}

impl GeometryCache {
    #[must_use]
    pub fn is_fresh(&self, version: u64) -> bool {
        self.computed_for == Some(version)
    }

    /// Cached geometry for `version`, without computing anything.
    #[must_use]
    pub fn get(&self, version: u64) -> Option<DerivedGeometry> {
        if self.is_fresh(version) {
            self.derived
        } else {
            None
        }
    }

    /// Returns cached geometry, scanning `path` only when the cache is stale.
    ///
    /// Paths without any finite coordinate cache `None`, so they are not
    /// rescanned either.
    pub fn resolve(
        &mut self,
        version: u64,
        path: &[PathSegment],
        mid_offsets: (f64, f64),
        label_rank_override: Option<f64>,
    ) -> Option<DerivedGeometry> {
        if self.is_fresh(version) {
            return self.derived;
        }

        self.derived = path_bounds(path).map(|bounds| {
            let (mid_x, mid_y) = bounds.relative_point(mid_offsets.0, mid_offsets.1);
            DerivedGeometry {
                bounds,
                mid_x,
                mid_y,
                label_rank: label_rank_override.unwrap_or_else(|| bounds.area()),
            }
        });
        self.computed_for = Some(version);
        self.derived
    }

    pub fn invalidate(&mut self) {
        self.computed_for = None;
        self.derived = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<PathSegment> {
        vec![
            PathSegment::Move { x: 0.0, y: 0.0 },
            PathSegment::Line { x: size, y: 0.0 },
            PathSegment::Line { x: size, y: size },
            PathSegment::Close,
        ]
    }

    #[test]
    fn stale_version_recomputes() {
        let mut cache = GeometryCache::default();
        let first = cache.resolve(1, &square(2.0), (0.5, 0.5), None).expect("box");
        assert_eq!(first.label_rank, 4.0);

        // Same version: the cache wins even if the caller passes other data.
        let cached = cache.resolve(1, &square(8.0), (0.5, 0.5), None).expect("box");
        assert_eq!(cached, first);

        let refreshed = cache.resolve(2, &square(8.0), (0.5, 0.5), None).expect("box");
        assert_eq!(refreshed.bounds.max_x, 8.0);
        assert_eq!(refreshed.mid_x, 4.0);
    }

    #[test]
    fn empty_path_is_cached_as_absent() {
        let mut cache = GeometryCache::default();
        assert!(cache.resolve(0, &[], (0.5, 0.5), None).is_none());
        assert!(cache.is_fresh(0));
    }
}
