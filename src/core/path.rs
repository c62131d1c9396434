use kurbo::{BezPath, PathEl};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;

use crate::core::BoundingBox;
use crate::error::{ChartError, ChartResult};

/// Segment tag shared by data-space and pixel-space paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    Move,
    Line,
    CubicBezier,
    QuadraticBezier,
    Close,
}

impl SegmentKind {
    /// Absolute SVG command letter for this kind.
    #[must_use]
    pub const fn command(self) -> char {
        match self {
            Self::Move => 'M',
            Self::Line => 'L',
            Self::CubicBezier => 'C',
            Self::QuadraticBezier => 'Q',
            Self::Close => 'Z',
        }
    }

    /// Number of scalar coordinates carried by a segment of this kind.
    #[must_use]
    pub const fn coordinate_count(self) -> usize {
        match self {
            Self::Move | Self::Line => 2,
            Self::CubicBezier => 6,
            Self::QuadraticBezier => 4,
            Self::Close => 0,
        }
    }
}

/// One typed path segment.
///
/// Control points come first and the end point last, matching SVG argument
/// order, so `points()` yields pairs in drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathSegment {
    Move {
        x: f64,
        y: f64,
    },
    Line {
        x: f64,
        y: f64,
    },
    CubicBezier {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    QuadraticBezier {
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
    },
    Close,
}

impl PathSegment {
    #[must_use]
    pub const fn kind(&self) -> SegmentKind {
        match self {
            Self::Move { .. } => SegmentKind::Move,
            Self::Line { .. } => SegmentKind::Line,
            Self::CubicBezier { .. } => SegmentKind::CubicBezier,
            Self::QuadraticBezier { .. } => SegmentKind::QuadraticBezier,
            Self::Close => SegmentKind::Close,
        }
    }

    /// Coordinate pairs in argument order (control points, then end point).
    #[must_use]
    pub fn points(&self) -> SmallVec<[(f64, f64); 3]> {
        let mut points = SmallVec::new();
        match *self {
            Self::Move { x, y } | Self::Line { x, y } => points.push((x, y)),
            Self::CubicBezier {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                points.push((x1, y1));
                points.push((x2, y2));
                points.push((x, y));
            }
            Self::QuadraticBezier { x1, y1, x, y } => {
                points.push((x1, y1));
                points.push((x, y));
            }
            Self::Close => {}
        }
        points
    }

    /// End point of the segment, `None` for `Close`.
    #[must_use]
    pub fn end_point(&self) -> Option<(f64, f64)> {
        match *self {
            Self::Move { x, y }
            | Self::Line { x, y }
            | Self::CubicBezier { x, y, .. }
            | Self::QuadraticBezier { x, y, .. } => Some((x, y)),
            Self::Close => None,
        }
    }

    /// Applies `map` to every coordinate pair, keeping the segment kind.
    #[must_use]
    pub fn map_points(&self, mut map: impl FnMut(f64, f64) -> (f64, f64)) -> Self {
        match *self {
            Self::Move { x, y } => {
                let (x, y) = map(x, y);
                Self::Move { x, y }
            }
            Self::Line { x, y } => {
                let (x, y) = map(x, y);
                Self::Line { x, y }
            }
            Self::CubicBezier {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let (x1, y1) = map(x1, y1);
                let (x2, y2) = map(x2, y2);
                let (x, y) = map(x, y);
                Self::CubicBezier {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                }
            }
            Self::QuadraticBezier { x1, y1, x, y } => {
                let (x1, y1) = map(x1, y1);
                let (x, y) = map(x, y);
                Self::QuadraticBezier { x1, y1, x, y }
            }
            Self::Close => Self::Close,
        }
    }

    /// Absolute SVG command for this segment (`C 1 2 3 4 5 6`).
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut out = String::from(self.kind().command());
        for (x, y) in self.points() {
            out.push_str(&format!(" {x} {y}"));
        }
        out
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.points()
            .iter()
            .all(|(x, y)| x.is_finite() && y.is_finite())
    }
}

/// Bounding box over every coordinate pair of `segments`.
///
/// Control points are included; non-finite pairs are skipped.
#[must_use]
pub fn path_bounds(segments: &[PathSegment]) -> Option<BoundingBox> {
    BoundingBox::from_points(segments.iter().flat_map(PathSegment::points))
}

/// Serializes segments as an absolute SVG path string (`M 0 0 L 10 0 Z`).
#[must_use]
pub fn path_to_svg(segments: &[PathSegment]) -> String {
    segments
        .iter()
        .map(PathSegment::to_svg)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses SVG path data (absolute or relative commands, implicit line-to).
///
/// Arcs and smooth curves come back as cubic or quadratic Béziers, so the
/// result only ever holds the five segment kinds.
pub fn parse_svg_path(input: &str) -> ChartResult<Vec<PathSegment>> {
    let path = BezPath::from_svg(input)
        .map_err(|e| ChartError::InvalidData(format!("invalid svg path `{input}`: {e}")))?;
    Ok(path
        .elements()
        .iter()
        .map(|&element| segment_from_element(element))
        .collect())
}

/// Reads a path from its JSON form: an SVG string, a flat array
/// (`["M", 0, 0, "L", 10, 0, "Z"]`), an array of segment arrays
/// (`[["M", 0, 0], ["Z"]]`), or `null` for "no geometry".
pub fn path_from_json(value: &Value) -> ChartResult<Vec<PathSegment>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(text) => parse_svg_path(text),
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Array(nested) => {
                        for inner in nested {
                            parts.push(json_path_part(inner)?);
                        }
                    }
                    other => parts.push(json_path_part(other)?),
                }
            }
            parse_svg_path(&parts.join(" "))
        }
        other => Err(ChartError::InvalidData(format!(
            "path must be a string or an array, got `{other}`"
        ))),
    }
}

fn json_path_part(value: &Value) -> ChartResult<String> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .filter(|n| n.is_finite())
            .map(|n| n.to_string())
            .ok_or_else(|| ChartError::InvalidData("path number out of range".to_owned())),
        Value::String(text) => Ok(text.clone()),
        other => Err(ChartError::InvalidData(format!(
            "unexpected path element `{other}`"
        ))),
    }
}

fn segment_from_element(element: PathEl) -> PathSegment {
    match element {
        PathEl::MoveTo(p) => PathSegment::Move { x: p.x, y: p.y },
        PathEl::LineTo(p) => PathSegment::Line { x: p.x, y: p.y },
        PathEl::QuadTo(c, p) => PathSegment::QuadraticBezier {
            x1: c.x,
            y1: c.y,
            x: p.x,
            y: p.y,
        },
        PathEl::CurveTo(c1, c2, p) => PathSegment::CubicBezier {
            x1: c1.x,
            y1: c1.y,
            x2: c2.x,
            y2: c2.y,
            x: p.x,
            y: p.y,
        },
        PathEl::ClosePath => PathSegment::Close,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn implicit_line_to_after_move() {
        let segments = parse_svg_path("M 0 0 10 0 10 -10 Z").expect("parse");
        assert_eq!(
            segments,
            vec![
                PathSegment::Move { x: 0.0, y: 0.0 },
                PathSegment::Line { x: 10.0, y: 0.0 },
                PathSegment::Line { x: 10.0, y: -10.0 },
                PathSegment::Close,
            ]
        );
    }

    #[test]
    fn relative_commands_track_current_point() {
        let segments = parse_svg_path("m 5 5 l 10 0 v 10 h -10 z m 1 1 l 1 0").expect("parse");
        assert_eq!(segments[1], PathSegment::Line { x: 15.0, y: 5.0 });
        assert_eq!(segments[2], PathSegment::Line { x: 15.0, y: 15.0 });
        assert_eq!(segments[3], PathSegment::Line { x: 5.0, y: 15.0 });
        // After close the cursor is back at the subpath start.
        assert_eq!(segments[5], PathSegment::Move { x: 6.0, y: 6.0 });
        assert_eq!(segments[6], PathSegment::Line { x: 7.0, y: 6.0 });
    }

    #[test]
    fn arcs_become_cubic_segments() {
        let segments = parse_svg_path("M 0 0 A 5 5 0 0 1 10 0").expect("parse");
        assert_eq!(segments[0], PathSegment::Move { x: 0.0, y: 0.0 });
        assert!(segments.len() > 1);
        assert!(
            segments[1..]
                .iter()
                .all(|segment| segment.kind() == SegmentKind::CubicBezier)
        );
        let (x, y) = segments
            .last()
            .and_then(PathSegment::end_point)
            .expect("end point");
        assert!((x - 10.0).abs() < 1e-9 && y.abs() < 1e-9);
    }

    #[test]
    fn malformed_paths_are_rejected() {
        assert!(parse_svg_path("M 0 0 X 5 5").is_err());
        assert!(parse_svg_path("M 0 0 L 5").is_err());
        assert!(path_from_json(&json!(["M", 0, 0, true])).is_err());
    }
}
