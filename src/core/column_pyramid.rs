use serde::{Deserialize, Serialize};

use crate::core::{AxisState, PathSegment, ShapeArgs};

/// Width and x offset of one column inside its category slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetrics {
    pub width: f64,
    pub offset: f64,
}

/// Slot layout inputs for [`column_metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnSlot {
    /// Data-space width of one category (`point_range` or closest spacing).
    pub category_range: f64,
    pub group_padding: f64,
    pub point_padding: f64,
    pub max_point_width: Option<f64>,
    pub column_index: usize,
    pub column_count: usize,
}

#[must_use]
pub fn column_metrics(x_axis: &AxisState, slot: ColumnSlot) -> ColumnMetrics {
    let category_width = (x_axis.trans_a().abs() * slot.category_range).min(x_axis.len());
    let group_padding = category_width * slot.group_padding;
    let group_width = category_width - 2.0 * group_padding;
    let point_offset_width = group_width / slot.column_count.max(1) as f64;
    let point_width = slot
        .max_point_width
        .unwrap_or(x_axis.len())
        .min(point_offset_width * (1.0 - 2.0 * slot.point_padding));
    let point_padding = (point_offset_width - point_width) / 2.0;
    let direction = if x_axis.is_flipped() { -1.0 } else { 1.0 };
    let offset = point_padding
        + (group_padding + slot.column_index as f64 * point_offset_width - category_width / 2.0)
            * direction;

    ColumnMetrics {
        width: point_width,
        offset,
    }
}

/// Pixel inputs for one pyramid slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PyramidSlice {
    pub plot_x: f64,
    pub plot_y: f64,
    /// Pixel where this slice starts (threshold or the stack below it).
    pub y_bottom: f64,
    /// Pixel of the pyramid apex (stack total, or the point when unstacked).
    pub apex_y: f64,
    /// Pixel of the pyramid base (threshold).
    pub base_y: f64,
    /// `true` for values below the threshold; only consulted when the
    /// apex sits on the base.
    pub negative: bool,
}

/// Resolved pyramid slice geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PyramidShape {
    pub bar_x: f64,
    pub bar_y: f64,
    pub bar_h: f64,
    pub shape_args: ShapeArgs,
}

/// Trapezoid for one slice of a column pyramid.
///
/// Half widths grow linearly with the distance from the apex and reach
/// `bar_w / 2` at the base. A zero-height stack yields zero widths instead
/// of dividing by zero. Slices shorter than `min_point_length` grow away
/// from `y_bottom` in the direction of their value.
#[must_use]
pub fn pyramid_shape(
    slice: PyramidSlice,
    metrics: ColumnMetrics,
    bar_w: f64,
    min_point_length: f64,
    y_len: f64,
) -> PyramidShape {
    let safe_distance = 999.0 + slice.y_bottom.abs();
    let plot_y = slice.plot_y.clamp(-safe_distance, y_len + safe_distance);
    let half_width = bar_w / 2.0;
    let bar_x = slice.plot_x + metrics.offset;
    let center_x = bar_x + half_width;

    let mut bar_y = plot_y.min(slice.y_bottom);
    let mut bar_h = (plot_y - slice.y_bottom).abs();
    if min_point_length > 0.0 && bar_h < min_point_length {
        bar_h = min_point_length;
        let grows_up = if slice.apex_y == slice.base_y {
            !slice.negative
        } else {
            slice.apex_y < slice.base_y
        };
        bar_y = if grows_up {
            slice.y_bottom - min_point_length
        } else {
            slice.y_bottom
        };
    }

    let stack_height = (slice.base_y - slice.apex_y).abs();
    let half_at = |y: f64| {
        if stack_height == 0.0 {
            0.0
        } else {
            (half_width * (y - slice.apex_y).abs() / stack_height).min(half_width)
        }
    };
    let y1 = bar_y;
    let y2 = bar_y + bar_h;
    let h1 = half_at(y1);
    let h2 = half_at(y2);

    let d = vec![
        PathSegment::Move {
            x: center_x - h1,
            y: y1,
        },
        PathSegment::Line {
            x: center_x + h1,
            y: y1,
        },
        PathSegment::Line {
            x: center_x + h2,
            y: y2,
        },
        PathSegment::Line {
            x: center_x - h2,
            y: y2,
        },
        PathSegment::Close,
    ];

    PyramidShape {
        bar_x,
        bar_y,
        bar_h,
        shape_args: ShapeArgs::from_path(d),
    }
}
