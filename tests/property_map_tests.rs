use std::collections::BTreeSet;

use chart_map_rs::core::{
    AxisState, ExtremesTracker, JoinOptions, MapPoint, PathSegment, ShapeDataset, ShapeRecord,
    Viewport, join_data, translate_path,
};
use chart_map_rs::render::NullRenderer;
use chart_map_rs::series::MapSeriesOptions;
use chart_map_rs::{ChartEngine, ChartEngineConfig};
use proptest::prelude::*;
use serde_json::json;

fn rect(x: f64, y: f64, w: f64, h: f64) -> Vec<PathSegment> {
    vec![
        PathSegment::Move { x, y },
        PathSegment::Line { x: x + w, y },
        PathSegment::Line { x: x + w, y: y + h },
        PathSegment::Line { x, y: y + h },
        PathSegment::Close,
    ]
}

fn map_engine() -> ChartEngine<NullRenderer> {
    let mut engine = ChartEngine::new(
        NullRenderer::default(),
        ChartEngineConfig::map(Viewport::new(100, 100)),
    )
    .expect("engine init");
    let shapes = ShapeDataset::new(vec![
        ShapeRecord::new(rect(0.0, 0.0, 6.0, 6.0)).with_property("shape-key", json!("a")),
        ShapeRecord::new(rect(6.0, 6.0, 4.0, 4.0)).with_property("shape-key", json!("b")),
    ]);
    engine
        .add_map_series(
            "map",
            MapSeriesOptions::default(),
            vec![json!(["a", 1]), json!(["b", 2])],
            shapes,
        )
        .expect("add map");
    engine.redraw().expect("first redraw");
    engine
}

/// Largest distance between a retained pixel moved by the group and a
/// fresh translate of the same coordinate.
fn fast_path_error(engine: &ChartEngine<NullRenderer>, retained: &[Vec<PathSegment>]) -> f64 {
    let series = engine.map_series("map").expect("map series");
    let group = series.group_transform();
    let mut worst: f64 = 0.0;
    for (point, old) in series.points().iter().zip(retained) {
        let fresh = translate_path(point.path(), &engine.axes().x, &engine.axes().y);
        for (old_segment, new_segment) in old.iter().zip(&fresh) {
            for ((ox, oy), (nx, ny)) in old_segment.points().into_iter().zip(new_segment.points()) {
                let (gx, gy) = group.apply(ox, oy);
                worst = worst.max((gx - nx).abs()).max((gy - ny).abs());
            }
        }
    }
    worst
}

fn retained_paths(engine: &ChartEngine<NullRenderer>) -> Vec<Vec<PathSegment>> {
    engine
        .map_series("map")
        .expect("map series")
        .points()
        .iter()
        .map(|point| point.shape_args().expect("retained shape").d.clone())
        .collect()
}

proptest! {
    #[test]
    fn collection_box_only_grows(
        rects in prop::collection::vec(
            (-1_000.0f64..1_000.0, -1_000.0f64..1_000.0, 0.0f64..100.0, 0.0f64..100.0),
            1..24
        )
    ) {
        let mut tracker = ExtremesTracker::default();
        let mut previous = None;
        for (i, (x, y, w, h)) in rects.into_iter().enumerate() {
            let mut point = MapPoint::new(i, rect(x, y, w, h));
            let bounds = tracker.include_point(&mut point).expect("finite rect");
            let collection = tracker.collection_box().expect("collection box");
            prop_assert!(collection.contains_box(bounds));
            if let Some(previous) = previous {
                prop_assert!(collection.contains_box(previous));
            }
            previous = Some(collection);
        }
    }

    #[test]
    fn unit_axes_translate_paths_unchanged(
        x in 0.0f64..500.0,
        y in 0.0f64..500.0,
        w in 0.0f64..500.0,
        h in 0.0f64..500.0
    ) {
        let x_axis = AxisState::horizontal(1_000.0)
            .expect("x axis")
            .with_domain(0.0, 1_000.0)
            .expect("x domain");
        let y_axis = AxisState::vertical(1_000.0)
            .expect("y axis")
            .with_reversed(true)
            .with_domain(0.0, 1_000.0)
            .expect("y domain");
        let path = rect(x, y, w, h);
        prop_assert_eq!(translate_path(&path, &x_axis, &y_axis), path);
    }

    #[test]
    fn panned_group_matches_full_translate(dx in -40.0f64..40.0, dy in -40.0f64..40.0) {
        let mut engine = map_engine();
        let retained = retained_paths(&engine);

        engine.pan(dx, dy).expect("pan");
        engine.redraw().expect("pan redraw");

        prop_assert!(fast_path_error(&engine, &retained) <= 1.0);
    }

    #[test]
    fn zoomed_group_matches_full_translate(
        factor in 0.3f64..0.95,
        anchor_x in 2.0f64..8.0,
        anchor_y in 2.0f64..8.0
    ) {
        let mut engine = map_engine();
        let retained = retained_paths(&engine);

        engine.zoom(factor, Some((anchor_x, anchor_y))).expect("zoom");
        engine.redraw().expect("zoom redraw");

        prop_assert!(fast_path_error(&engine, &retained) <= 1e-6);
    }

    #[test]
    fn all_areas_yields_one_entity_per_shape(mask in prop::collection::vec(any::<bool>(), 1..32)) {
        let mut shapes = ShapeDataset::new(
            (0..mask.len())
                .map(|i| {
                    ShapeRecord::new(rect(i as f64, 0.0, 1.0, 1.0))
                        .with_property("shape-key", json!(format!("k{i}")))
                })
                .collect(),
        );
        let values: Vec<_> = mask
            .iter()
            .enumerate()
            .filter(|(_, present)| **present)
            .map(|(i, _)| json!([format!("k{i}"), i]))
            .collect();

        let outcome = join_data(&values, &mut shapes, &JoinOptions::default());
        prop_assert_eq!(outcome.points.len(), mask.len());
        prop_assert_eq!(outcome.matched, values.len());
        prop_assert_eq!(outcome.synthesized, mask.len() - values.len());

        let keys: BTreeSet<_> = outcome
            .points
            .iter()
            .filter_map(|p| p.key().map(str::to_owned))
            .collect();
        prop_assert_eq!(keys.len(), mask.len());
        for (i, point) in outcome.points.iter().enumerate() {
            prop_assert_eq!(point.index(), i);
        }
    }
}
