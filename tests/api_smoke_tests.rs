use chart_map_rs::ChartError;
use chart_map_rs::api::{AxisConfig, AxisKind, ChartEngine, ChartEngineConfig};
use chart_map_rs::core::Viewport;
use chart_map_rs::render::NullRenderer;
use chart_map_rs::series::{MapSeriesOptions, SeriesKind, SeriesType};
use serde_json::json;

#[test]
fn engine_smoke_flow() {
    let renderer = NullRenderer::default();
    let config = ChartEngineConfig::new(Viewport::new(800, 600));
    let mut engine = ChartEngine::new(renderer, config).expect("engine init");

    engine
        .add_series(SeriesType::Line, "line", &json!({ "data": [[1, 10], [2, 20], [3, 30]] }))
        .expect("add line");
    engine
        .add_series(
            SeriesType::ColumnPyramid,
            "pyramid",
            &json!({ "data": [[1, 5], [2, 8], [3, 2]] }),
        )
        .expect("add pyramid");
    engine.redraw().expect("redraw should succeed");
    assert_eq!(engine.series_count(), 2);
    assert_eq!(engine.renderer().frames_rendered, 1);
    assert_eq!(engine.renderer().last_instruction_count, 4);

    let x_px = engine.map_value_to_pixel(AxisKind::X, 2.0);
    let x_back = engine.map_pixel_to_value(AxisKind::X, x_px);
    assert!((x_back - 2.0).abs() <= 1e-9);

    let y_px = engine.map_value_to_pixel(AxisKind::Y, 20.0);
    let y_back = engine.map_pixel_to_value(AxisKind::Y, y_px);
    assert!((y_back - 20.0).abs() <= 1e-9);

    assert_eq!(engine.axes().y.domain(), Some((0.0, 30.0)));
    assert!(engine.remove_series("pyramid"));
    assert!(!engine.remove_series("pyramid"));
    assert_eq!(engine.series_index("line"), Some(0));
}

#[test]
fn config_json_round_trip() {
    let config = ChartEngineConfig::map(Viewport::new(640, 480))
        .with_x_axis(AxisConfig::default().with_min_range(2.0))
        .with_hardware_transforms(false);
    let json = config.to_json_pretty().expect("serialize config");
    assert!(json.contains("preserveAspectRatio"));
    let restored = ChartEngineConfig::from_json_str(&json).expect("parse config");
    assert_eq!(restored, config);

    let minimal =
        ChartEngineConfig::from_json_str(r#"{ "viewport": { "width": 10, "height": 10 } }"#)
            .expect("minimal config");
    assert!(minimal.hardware_transforms);
    assert!(!minimal.preserve_aspect_ratio);
}

#[test]
fn half_configured_axis_is_rejected() {
    let config = ChartEngineConfig::new(Viewport::new(100, 100)).with_y_axis(AxisConfig {
        min: Some(0.0),
        ..AxisConfig::default()
    });
    let err = ChartEngine::new(NullRenderer::default(), config)
        .err()
        .expect("half axis must fail");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
}

#[test]
fn configured_extremes_survive_redraws() {
    let config = ChartEngineConfig::new(Viewport::new(100, 100))
        .with_y_axis(AxisConfig::default().with_extremes(-50.0, 50.0));
    let mut engine = ChartEngine::new(NullRenderer::default(), config).expect("engine init");
    engine
        .add_series(SeriesType::Line, "line", &json!({ "data": [1, 2, 3] }))
        .expect("add line");
    engine.redraw().expect("redraw");
    assert_eq!(engine.axes().y.domain(), Some((-50.0, 50.0)));
    assert_eq!(engine.axes().x.domain(), Some((0.0, 2.0)));
}

#[test]
fn duplicate_series_ids_are_rejected() {
    let mut engine = ChartEngine::new(
        NullRenderer::default(),
        ChartEngineConfig::new(Viewport::new(100, 100)),
    )
    .expect("engine init");
    engine
        .add_series(SeriesType::Line, "s", &json!({ "data": [] }))
        .expect("first series");
    let err = engine
        .add_series(SeriesType::Line, "s", &json!({ "data": [] }))
        .expect_err("duplicate must fail");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
    assert!(engine.set_map_values("s", Vec::new()).is_err());
    assert!(engine.set_map_values("missing", Vec::new()).is_err());
}

#[test]
fn series_type_and_map_options_use_json_names() {
    let series_type: SeriesType = serde_json::from_str("\"columnpyramid\"").expect("type");
    assert_eq!(series_type, SeriesType::ColumnPyramid);

    let options = MapSeriesOptions::from_json_str(
        r#"{ "joinBy": "iso", "borderWidth": 0.5, "middleX": 0.25 }"#,
    )
    .expect("map options");
    assert_eq!(options.border_width, 0.5);
    assert_eq!(options.middle_x, 0.25);
    assert!(options.join.all_areas);

    let round_trip =
        MapSeriesOptions::from_json_str(&options.to_json_pretty().expect("serialize"))
            .expect("re-parse");
    assert_eq!(round_trip, options);
    assert!(MapSeriesOptions::from_json_str(r#"{ "borderWidth": -1 }"#).is_err());
}

#[test]
fn empty_engine_renders_an_empty_frame() {
    let mut engine = ChartEngine::new(
        NullRenderer::default(),
        ChartEngineConfig::map(Viewport::new(100, 100)),
    )
    .expect("engine init");
    engine.redraw().expect("redraw");
    let frame = engine.renderer().last_frame.as_ref().expect("frame");
    assert!(frame.is_empty());
    assert!(engine.axes().x.domain().is_none());

    let pan = engine.pan(5.0, 5.0);
    assert!(matches!(pan, Err(ChartError::InvalidAxis(_))));
}

#[test]
fn series_kind_reports_its_type() {
    let mut engine = ChartEngine::new(
        NullRenderer::default(),
        ChartEngineConfig::new(Viewport::new(100, 100)),
    )
    .expect("engine init");
    engine
        .add_series(SeriesType::ColumnPyramid, "p", &json!({ "data": [1] }))
        .expect("add pyramid");
    let series: &dyn SeriesKind = engine.series("p").expect("series");
    assert_eq!(series.series_type(), SeriesType::ColumnPyramid);
    assert_eq!(series.point_count(), 1);
}
