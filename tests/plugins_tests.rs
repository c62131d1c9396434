use std::cell::RefCell;
use std::rc::Rc;

use chart_map_rs::ChartError;
use chart_map_rs::api::{ChartEngine, ChartEngineConfig};
use chart_map_rs::core::{PathSegment, ShapeDataset, ShapeRecord, TransformMode, Viewport};
use chart_map_rs::extensions::{ChartPlugin, PluginContext, PluginEvent};
use chart_map_rs::render::NullRenderer;
use chart_map_rs::series::{MapSeriesOptions, SeriesType};
use serde_json::json;

#[derive(Clone)]
struct RecordingPlugin {
    id: String,
    events: Rc<RefCell<Vec<(PluginEvent, PluginContext)>>>,
}

impl RecordingPlugin {
    fn new(id: impl Into<String>, events: Rc<RefCell<Vec<(PluginEvent, PluginContext)>>>) -> Self {
        Self {
            id: id.into(),
            events,
        }
    }
}

impl ChartPlugin for RecordingPlugin {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: PluginEvent, context: PluginContext) {
        self.events.borrow_mut().push((event, context));
    }
}

fn event_kind(event: &PluginEvent) -> &'static str {
    match event {
        PluginEvent::DataUpdated { .. } => "data",
        PluginEvent::ExtremesChanged { .. } => "extremes",
        PluginEvent::ViewportResized { .. } => "resized",
        PluginEvent::SeriesTranslated { .. } => "translated",
        PluginEvent::Rendered => "rendered",
    }
}

fn map_engine() -> ChartEngine<NullRenderer> {
    let renderer = NullRenderer::default();
    let config = ChartEngineConfig::map(Viewport::new(100, 100));
    ChartEngine::new(renderer, config).expect("engine init")
}

fn square_shapes() -> ShapeDataset {
    ShapeDataset::new(vec![
        ShapeRecord::new(vec![
            PathSegment::Move { x: 0.0, y: 0.0 },
            PathSegment::Line { x: 10.0, y: 0.0 },
            PathSegment::Line { x: 10.0, y: 10.0 },
            PathSegment::Close,
        ])
        .with_property("shape-key", json!("a")),
    ])
}

#[test]
fn plugin_receives_deterministic_event_sequence() {
    let mut engine = map_engine();
    let events = Rc::new(RefCell::new(Vec::new()));
    engine
        .register_plugin(Box::new(RecordingPlugin::new("recorder", events.clone())))
        .expect("register plugin");

    engine
        .add_map_series(
            "map",
            MapSeriesOptions::default(),
            vec![json!(["a", 1])],
            square_shapes(),
        )
        .expect("add map");
    engine.redraw().expect("first redraw");
    engine.pan(10.0, 0.0).expect("pan");
    engine.redraw().expect("pan redraw");
    engine.resize(Viewport::new(200, 100)).expect("resize");
    engine
        .set_map_values("map", vec![json!(["a", 2])])
        .expect("set values");

    let events = events.borrow();
    let kinds: Vec<&'static str> = events.iter().map(|(event, _)| event_kind(event)).collect();
    assert_eq!(
        kinds,
        vec![
            "data",
            "translated",
            "rendered",
            "extremes",
            "translated",
            "rendered",
            "resized",
            "data",
        ]
    );

    let modes: Vec<TransformMode> = events
        .iter()
        .filter_map(|(event, _)| match event {
            PluginEvent::SeriesTranslated { mode, .. } => Some(*mode),
            _ => None,
        })
        .collect();
    assert_eq!(modes, vec![TransformMode::Full, TransformMode::Fast]);
}

#[test]
fn duplicate_plugin_ids_are_rejected() {
    let mut engine = map_engine();
    let events = Rc::new(RefCell::new(Vec::new()));
    engine
        .register_plugin(Box::new(RecordingPlugin::new("dupe", events.clone())))
        .expect("first plugin");
    let err = engine
        .register_plugin(Box::new(RecordingPlugin::new("dupe", events)))
        .expect_err("duplicate must fail");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn unregister_plugin_stops_dispatch() {
    let mut engine = map_engine();
    let events = Rc::new(RefCell::new(Vec::new()));
    engine
        .register_plugin(Box::new(RecordingPlugin::new("to-remove", events.clone())))
        .expect("register");
    assert_eq!(engine.plugin_count(), 1);
    assert!(engine.has_plugin("to-remove"));

    engine
        .add_series(SeriesType::Line, "line", &json!({ "data": [1, 2] }))
        .expect("add line");
    assert!(engine.unregister_plugin("to-remove"));
    assert_eq!(engine.plugin_count(), 0);
    assert!(!engine.has_plugin("to-remove"));

    engine.redraw().expect("redraw");
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn extremes_event_carries_the_new_domains() {
    let mut engine = map_engine();
    let events = Rc::new(RefCell::new(Vec::new()));
    engine
        .register_plugin(Box::new(RecordingPlugin::new("extremes", events.clone())))
        .expect("register");
    engine
        .add_map_series(
            "map",
            MapSeriesOptions::default(),
            vec![json!(["a", 1])],
            square_shapes(),
        )
        .expect("add map");
    engine.redraw().expect("redraw");
    engine.zoom(0.5, None).expect("zoom");

    let (last, context) = events.borrow().last().copied().expect("at least one event");
    assert_eq!(
        last,
        PluginEvent::ExtremesChanged {
            x_min: 2.5,
            x_max: 7.5,
            y_min: 2.5,
            y_max: 7.5,
        }
    );
    assert_eq!(context.x_domain, Some((2.5, 7.5)));
    assert_eq!(context.series_count, 1);
    assert_eq!(context.points_len, 1);
}

#[test]
fn data_event_reports_point_count() {
    let mut engine = map_engine();
    let events = Rc::new(RefCell::new(Vec::new()));
    engine
        .register_plugin(Box::new(RecordingPlugin::new("data", events.clone())))
        .expect("register");
    engine
        .add_series(SeriesType::Line, "line", &json!({ "data": [1, 2, 3] }))
        .expect("add line");

    let (event, _) = events.borrow()[0];
    assert_eq!(
        event,
        PluginEvent::DataUpdated {
            series_index: 0,
            points_len: 3,
        }
    );
}
