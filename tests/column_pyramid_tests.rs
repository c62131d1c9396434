use chart_map_rs::core::{PathSegment, Viewport};
use chart_map_rs::render::NullRenderer;
use chart_map_rs::series::{ColumnPyramidOptions, ColumnPyramidSeries, SeriesType};
use chart_map_rs::{ChartEngine, ChartEngineConfig};
use serde_json::{Value, json};

fn engine() -> ChartEngine<NullRenderer> {
    ChartEngine::new(
        NullRenderer::default(),
        ChartEngineConfig::new(Viewport::new(100, 100)),
    )
    .expect("engine init")
}

fn definition(extra: Value, data: Value) -> Value {
    let mut definition = json!({
        "pointRange": 1,
        "groupPadding": 0,
        "pointPadding": 0,
        "minPointLength": 0,
        "data": data
    });
    if let (Value::Object(target), Value::Object(extra)) = (&mut definition, extra) {
        target.extend(extra);
    }
    definition
}

fn pyramid<'a>(engine: &'a ChartEngine<NullRenderer>, id: &str) -> &'a ColumnPyramidSeries {
    engine
        .series_as::<ColumnPyramidSeries>(id)
        .expect("pyramid series")
}

fn outline(series: &ColumnPyramidSeries, index: usize) -> Vec<PathSegment> {
    series.points()[index]
        .shape
        .as_ref()
        .expect("slice shape")
        .shape_args
        .d
        .clone()
}

fn quad(points: [(f64, f64); 4]) -> Vec<PathSegment> {
    vec![
        PathSegment::Move {
            x: points[0].0,
            y: points[0].1,
        },
        PathSegment::Line {
            x: points[1].0,
            y: points[1].1,
        },
        PathSegment::Line {
            x: points[2].0,
            y: points[2].1,
        },
        PathSegment::Line {
            x: points[3].0,
            y: points[3].1,
        },
        PathSegment::Close,
    ]
}

#[test]
fn single_value_draws_a_full_triangle() {
    let mut engine = engine();
    engine
        .add_series(
            SeriesType::ColumnPyramid,
            "p",
            &definition(json!({}), json!([[0, 10]])),
        )
        .expect("add pyramid");
    engine.redraw().expect("redraw");

    assert_eq!(engine.axes().x.domain(), Some((-0.5, 0.5)));
    assert_eq!(engine.axes().y.domain(), Some((0.0, 10.0)));

    let series = pyramid(&engine, "p");
    assert_eq!(
        outline(series, 0),
        quad([(50.0, 0.0), (50.0, 0.0), (100.0, 100.0), (0.0, 100.0)])
    );
    assert_eq!(series.points()[0].plot, Some((50.0, 0.0)));
    assert_eq!(engine.renderer().last_instruction_count, 1);
}

#[test]
fn stacked_series_share_one_pyramid() {
    let mut engine = engine();
    for (id, value) in [("a", 4), ("b", 6)] {
        engine
            .add_series(
                SeriesType::ColumnPyramid,
                id,
                &definition(json!({ "stacking": true }), json!([[0, value]])),
            )
            .expect("add stacked pyramid");
    }
    engine.redraw().expect("redraw");

    assert_eq!(engine.axes().y.domain(), Some((0.0, 10.0)));
    let lower = pyramid(&engine, "a");
    let upper = pyramid(&engine, "b");
    assert_eq!(lower.points()[0].stack_bottom, Some(0.0));
    assert_eq!(upper.points()[0].stack_bottom, Some(4.0));
    assert_eq!(
        outline(lower, 0),
        quad([(20.0, 60.0), (80.0, 60.0), (100.0, 100.0), (0.0, 100.0)])
    );
    assert_eq!(
        outline(upper, 0),
        quad([(50.0, 0.0), (50.0, 0.0), (80.0, 60.0), (20.0, 60.0)])
    );
    assert_eq!(lower.column_metrics(), upper.column_metrics());
}

#[test]
fn unstacked_series_get_their_own_columns() {
    let mut engine = engine();
    for (id, value) in [("a", 4), ("b", 6)] {
        engine
            .add_series(
                SeriesType::ColumnPyramid,
                id,
                &definition(json!({}), json!([[0, value]])),
            )
            .expect("add pyramid");
    }
    engine.redraw().expect("redraw");

    let first = pyramid(&engine, "a").column_metrics().expect("metrics a");
    let second = pyramid(&engine, "b").column_metrics().expect("metrics b");
    assert_eq!((first.width, first.offset), (50.0, -50.0));
    assert_eq!((second.width, second.offset), (50.0, 0.0));
}

#[test]
fn short_slices_grow_to_min_point_length() {
    let mut engine = engine();
    engine
        .add_series(
            SeriesType::ColumnPyramid,
            "p",
            &definition(json!({ "minPointLength": 5 }), json!([[0, 10], [1, 0.1]])),
        )
        .expect("add pyramid");
    engine.redraw().expect("redraw");

    let shape = pyramid(&engine, "p").points()[1]
        .shape
        .clone()
        .expect("short slice");
    assert_eq!(shape.bar_h, 5.0);
    assert_eq!(shape.bar_y, 95.0);
}

#[test]
fn negative_values_hang_below_the_threshold() {
    let mut engine = engine();
    engine
        .add_series(
            SeriesType::ColumnPyramid,
            "p",
            &definition(json!({}), json!([[0, -10]])),
        )
        .expect("add pyramid");
    engine.redraw().expect("redraw");

    assert_eq!(engine.axes().y.domain(), Some((-10.0, 0.0)));
    assert_eq!(
        outline(pyramid(&engine, "p"), 0),
        quad([(0.0, 0.0), (100.0, 0.0), (50.0, 100.0), (50.0, 100.0)])
    );
}

#[test]
fn compared_pyramids_plot_the_change() {
    let mut engine = engine();
    engine
        .add_series(
            SeriesType::ColumnPyramid,
            "p",
            &definition(json!({ "compare": "percent" }), json!([[0, 50], [1, 75]])),
        )
        .expect("add pyramid");
    engine.redraw().expect("redraw");

    let series = pyramid(&engine, "p");
    assert_eq!(series.compare_value(), Some(50.0));
    let changes: Vec<_> = series.points().iter().map(|p| p.change).collect();
    assert_eq!(changes, vec![Some(0.0), Some(50.0)]);
    assert_eq!(series.points()[0].y, Some(50.0));
}

#[test]
fn null_values_produce_no_shape() {
    let mut engine = engine();
    engine
        .add_series(
            SeriesType::ColumnPyramid,
            "p",
            &definition(json!({}), json!([[0, 3], [1, null]])),
        )
        .expect("add pyramid");
    engine.redraw().expect("redraw");

    let series = pyramid(&engine, "p");
    assert!(series.points()[1].shape.is_none());
    assert_eq!(engine.renderer().last_instruction_count, 1);
}

#[test]
fn paddings_outside_half_are_rejected() {
    let options = ColumnPyramidOptions::default().with_paddings(0.5, 0.1);
    assert!(options.validate().is_err());
    assert!(ColumnPyramidSeries::new("", ColumnPyramidOptions::default()).is_err());
}
