pub mod axis;
pub mod column_pyramid;
pub mod compare;
pub mod extremes;
pub mod geojson;
pub mod geometry_cache;
pub mod join;
pub mod map_point;
pub mod map_transform;
pub mod path;
pub mod path_translator;
pub mod primitives;
pub mod shape;
pub mod transform;
pub mod types;

pub use axis::{AxisOrientation, AxisPair, AxisState};
pub use column_pyramid::{
    ColumnMetrics, ColumnSlot, PyramidShape, PyramidSlice, column_metrics, pyramid_shape,
};
pub use compare::{
    CompareMode, CompareOptions, ComparisonState, ValueStrategy, modify_value,
    resolve_compare_value,
};
pub use extremes::{
    BoxUpdate, ExtremesTracker, MIN_RANGE_COLLECTION_DIVISOR, MIN_RANGE_SHAPE_FACTOR,
    value_extremes,
};
pub use geojson::shapes_from_geojson;
pub use geometry_cache::{DerivedGeometry, GeometryCache};
pub use join::{
    DEFAULT_JOIN_FIELD, JoinBy, JoinOptions, JoinOutcome, ShapeDataset, ShapeRecord,
    is_value_only_record, join_data, normalize_value_record, value_key,
};
pub use map_point::MapPoint;
pub use map_transform::{MapTransform, MapTransforms};
pub use path::{
    PathSegment, SegmentKind, parse_svg_path, path_bounds, path_from_json, path_to_svg,
};
pub use path_translator::{translate_path, translate_segment};
pub use primitives::{datetime_to_unix_millis, decimal_to_f64, sample_to_xy};
pub use shape::{ShapeArgs, ShapeType};
pub use transform::{
    FullTransformReason, GroupTransform, RedrawCriteria, SCALE_SNAP_MAX, SCALE_SNAP_MIN,
    TransformDecision, TransformMode, TransformSnapshot, fast_group_transform,
    scaled_stroke_width,
};
pub use types::{BoundingBox, ValueExtremes, Viewport};
