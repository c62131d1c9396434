use serde::{Deserialize, Serialize};

use crate::core::{PathSegment, path_bounds};

/// Shape primitive requested from the rendering service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShapeType {
    #[default]
    Path,
}

/// Pixel-space arguments for one shape: the path plus its bounding rect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeArgs {
    pub d: Vec<PathSegment>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ShapeArgs {
    /// Wraps a translated path, deriving the rect from its bounds.
    ///
    /// Paths without a finite coordinate produce a zero rect at the origin.
    #[must_use]
    pub fn from_path(d: Vec<PathSegment>) -> Self {
        match path_bounds(&d) {
            Some(bounds) => Self {
                x: bounds.min_x,
                y: bounds.min_y,
                width: bounds.width(),
                height: bounds.height(),
                d,
            },
            None => Self {
                d,
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
            },
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::from_path(Vec::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }
}
