use chart_map_rs::api::AxisKind;
use chart_map_rs::core::{CompareMode, CompareOptions, PathSegment, Viewport};
use chart_map_rs::render::NullRenderer;
use chart_map_rs::series::{LineSeries, SeriesType};
use chart_map_rs::{ChartEngine, ChartEngineConfig};
use serde_json::{Value, json};

fn engine_with_line(definition: Value) -> ChartEngine<NullRenderer> {
    let mut engine = ChartEngine::new(
        NullRenderer::default(),
        ChartEngineConfig::new(Viewport::new(100, 100)),
    )
    .expect("engine init");
    engine
        .add_series(SeriesType::Line, "line", &definition)
        .expect("add line");
    engine
}

fn line(engine: &ChartEngine<NullRenderer>) -> &LineSeries {
    engine.series_as::<LineSeries>("line").expect("line series")
}

#[test]
fn percent_compare_rebases_to_first_visible_value() {
    let mut engine = engine_with_line(json!({
        "compare": "percent",
        "data": [[0, 50], [1, 75], [2, 100]]
    }));
    engine.redraw().expect("redraw");

    let series = line(&engine);
    assert_eq!(series.compare_value(), Some(50.0));
    let changes: Vec<_> = series.points().iter().map(|p| p.change).collect();
    assert_eq!(changes, vec![Some(0.0), Some(50.0), Some(100.0)]);
    assert_eq!(engine.axes().y.domain(), Some((0.0, 100.0)));
    assert_eq!(
        series.path(),
        &[
            PathSegment::Move { x: 0.0, y: 100.0 },
            PathSegment::Line { x: 50.0, y: 50.0 },
            PathSegment::Line { x: 100.0, y: 0.0 },
        ]
    );
}

#[test]
fn narrowing_the_x_range_moves_the_baseline() {
    let mut engine = engine_with_line(json!({
        "compare": "value",
        "data": [[0, 50], [1, 75], [2, 100]]
    }));
    engine.redraw().expect("first redraw");
    assert_eq!(line(&engine).compare_value(), Some(50.0));

    engine
        .set_axis_extremes(AxisKind::X, 1.0, 2.0)
        .expect("x extremes");
    engine.redraw().expect("second redraw");

    let series = line(&engine);
    assert_eq!(series.compare_value(), Some(75.0));
    let changes: Vec<_> = series.points().iter().map(|p| p.change).collect();
    assert_eq!(changes, vec![Some(-25.0), Some(0.0), Some(25.0)]);
}

#[test]
fn compare_start_pins_the_baseline_to_the_first_sample() {
    let mut engine = engine_with_line(json!({
        "compare": "value",
        "compareStart": true,
        "data": [[0, 50], [1, 75], [2, 100]]
    }));
    engine
        .set_axis_extremes(AxisKind::X, 1.0, 2.0)
        .expect("x extremes");
    engine.redraw().expect("redraw");
    assert_eq!(line(&engine).compare_value(), Some(50.0));
}

#[test]
fn indexed_percent_starts_at_one_hundred() {
    let mut engine = engine_with_line(json!({
        "compare": "percent",
        "compareBase": 100,
        "data": [[0, 50], [1, 75]]
    }));
    engine.redraw().expect("redraw");
    let changes: Vec<_> = line(&engine).points().iter().map(|p| p.change).collect();
    assert_eq!(changes, vec![Some(100.0), Some(150.0)]);
}

#[test]
fn null_values_break_the_line() {
    let mut engine = engine_with_line(json!({
        "data": [[0, 1], [1, null], [2, 3], [3, 4]]
    }));
    engine.redraw().expect("redraw");

    let kinds: Vec<_> = line(&engine).path().iter().map(PathSegment::kind).collect();
    assert_eq!(
        kinds,
        vec![
            chart_map_rs::core::SegmentKind::Move,
            chart_map_rs::core::SegmentKind::Move,
            chart_map_rs::core::SegmentKind::Line,
        ]
    );
    assert!(line(&engine).points()[1].plot.is_none());
    assert_eq!(line(&engine).compare_value(), None);
}

#[test]
fn invalid_compare_base_is_rejected() {
    let mut engine = ChartEngine::new(
        NullRenderer::default(),
        ChartEngineConfig::new(Viewport::new(100, 100)),
    )
    .expect("engine init");
    let result = engine.add_series(
        SeriesType::Line,
        "line",
        &json!({ "compare": "percent", "compareBase": 50, "data": [] }),
    );
    assert!(result.is_err());
    assert_eq!(engine.series_count(), 0);
}

#[test]
fn compare_options_serialize_with_stock_names() {
    let options = CompareOptions::new(CompareMode::Percent).with_compare_start(true);
    let value = serde_json::to_value(options).expect("serialize");
    assert_eq!(
        value,
        json!({ "compare": "percent", "compareStart": true, "compareBase": 0.0 })
    );
}
