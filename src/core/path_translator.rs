use crate::core::{AxisState, PathSegment};

/// Translates data-space path segments into pixel space.
///
/// Every coordinate is mapped with `(coord - min) * trans_a + padding`,
/// x against `x_axis` and y against `y_axis`. Segment kinds are preserved
/// one to one. A missing axis minimum is read as `0`, so this never fails.
#[must_use]
pub fn translate_path(
    segments: &[PathSegment],
    x_axis: &AxisState,
    y_axis: &AxisState,
) -> Vec<PathSegment> {
    segments
        .iter()
        .map(|segment| translate_segment(segment, x_axis, y_axis))
        .collect()
}

#[must_use]
pub fn translate_segment(
    segment: &PathSegment,
    x_axis: &AxisState,
    y_axis: &AxisState,
) -> PathSegment {
    segment.map_points(|x, y| (x_axis.linear_to_pixels(x), y_axis.linear_to_pixels(y)))
}
