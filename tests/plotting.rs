use std::time::{Duration, Instant};

use gpui_fnplot::{
    Clock, DrawCommand, PlayState, PlotError, PlotSurface, Point, SampleParams, Sampler,
    SurfaceRegistry, TraceData, TraceOptions, Value, ViewportOptions, curve, validate_axes_pair,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn axes_pairs_broadcast_and_map() {
    let single = validate_axes_pair::<f64>("scale", &Value::from([5.0])).expect("one value");
    assert_eq!((single.x, single.y), (5.0, 5.0));
    let pair = validate_axes_pair::<f64>("scale", &Value::from([5.0, 7.0])).expect("two values");
    assert_eq!((pair.x, pair.y), (5.0, 7.0));
    assert!(matches!(
        validate_axes_pair::<f64>("scale", &Value::from([5.0, 7.0, 9.0])),
        Err(PlotError::WrongArity { found: 3, .. })
    ));
}

#[test]
fn x_lims_round_trip() {
    for (width, min, max) in [(500.0, -3.0, 7.0), (123.0, 0.25, 0.5), (1920.0, -1e3, 1e3)] {
        let mut surface = PlotSurface::new(width, 300.0).expect("valid size");
        surface.set_x_lims(min, max).expect("valid range");
        let viewport = surface.viewport();
        assert!((viewport.x_lims().min - min).abs() < 1e-9);
        assert!((viewport.x_lims().max - max).abs() < 1e-9);
        assert!((viewport.scale().x - width / (max - min)).abs() < 1e-9);
    }
}

#[test]
fn continuous_runs_extend_one_step_past_the_boundary() {
    let sampler = Sampler::continuous(curve(|x, _| x)).expect("numeric");
    let params = SampleParams::new(
        0.0,
        gpui_fnplot::Range::new(0.0, 10.0),
        gpui_fnplot::Range::new(-5.0, 5.0),
        1.0,
    );
    let points: Vec<Point> = sampler.sample(&params).collect();
    let xs: Vec<f64> = points.iter().map(|point| point.x).collect();
    assert!(xs.contains(&5.0));
    assert_eq!(xs.last(), Some(&6.0));
    assert!(xs.iter().all(|x| (0.0..=10.0).contains(x)));
}

#[test]
fn every_kind_restarts_identically() {
    let mut surface = PlotSurface::new(400.0, 400.0).expect("valid size");
    let options = TraceOptions::new().marker_style("cross");
    surface
        .add_trace("continuous", TraceData::function(|x, t| (x + t).sin()), &options)
        .expect("valid trace");
    surface
        .add_trace(
            "parametric",
            TraceData::pair(
                TraceData::function(|p, _| p.cos()),
                TraceData::function(|p, t| p.sin() * t),
            ),
            &options.clone().parameter_range([0.0, std::f64::consts::TAU]),
        )
        .expect("valid trace");
    surface
        .add_trace(
            "map",
            TraceData::pair([-1.0, 0.0, 1.0], TraceData::function(|x, t| x * t)),
            &options,
        )
        .expect("valid trace");
    surface
        .add_trace(
            "points",
            TraceData::pair(
                vec![TraceData::of_time(|t| t), TraceData::from(2.0)],
                vec![TraceData::function(|x, _| -x), TraceData::from(1.0)],
            ),
            &options,
        )
        .expect("valid trace");

    let first = surface.redraw(1.5).clone();
    surface.set_scale(50.0, 50.0).expect("valid scale");
    assert!(surface.is_dirty());
    assert_eq!(surface.redraw(1.5), &first);
    assert_eq!(first.commands().len(), 8);
}

#[test]
fn mismatched_point_lists_leave_the_surface_unchanged() {
    let mut surface = PlotSurface::new(100.0, 100.0).expect("valid size");
    let result = surface.add_trace(
        "t",
        TraceData::pair([1.0, 2.0, 3.0], [1.0, 2.0]),
        &TraceOptions::new(),
    );
    assert!(result.is_err());
    assert!(surface.trace("t").is_none());
}

#[test]
fn duplicate_trace_ids_are_rejected() {
    let mut surface = PlotSurface::new(100.0, 100.0).expect("valid size");
    surface
        .add_trace("t", TraceData::pair([1.0], [2.0]), &TraceOptions::new())
        .expect("valid trace");
    assert_eq!(
        surface.add_trace("t", TraceData::function(|x, _| x), &TraceOptions::new()),
        Err(PlotError::DuplicateTraceId("t".into()))
    );
    assert_eq!(
        surface.trace("t").map(|trace| trace.kind()),
        Some(gpui_fnplot::TraceKind::DiscretePoints)
    );
}

#[test]
fn parabola_end_to_end() {
    init_logging();
    let mut surface = PlotSurface::builder()
        .viewport(ViewportOptions::new().scale([50.0, 50.0]).origin([250.0, 250.0]))
        .build(500.0, 500.0)
        .expect("valid viewport");
    surface
        .add_trace("y", TraceData::function(|x, _| x * x), &TraceOptions::new())
        .expect("valid trace");

    let list = surface.redraw(0.0);
    let runs = list
        .commands()
        .iter()
        .find_map(|command| match command {
            DrawCommand::Polyline { runs, .. } => Some(runs),
            DrawCommand::Markers { .. } => None,
        })
        .expect("polyline");
    assert!(runs.iter().flatten().any(|pixel| {
        (pixel.x - 50.0).abs() < 1e-3 && (pixel.y + 50.0).abs() < 1e-3
    }));
}

#[test]
fn clock_drives_registered_surfaces() {
    init_logging();
    let t0 = Instant::now();
    let mut clock = Clock::new();
    let mut registry = SurfaceRegistry::new();
    let mut surface = PlotSurface::new(200.0, 200.0).expect("valid size");
    surface
        .add_trace("wave", TraceData::function(|x, t| (x - t).sin()), &TraceOptions::new())
        .expect("valid trace");
    registry.attach("a", surface);
    clock.add_object("a", false, t0).expect("new id");

    clock.start_all(t0);
    assert_eq!(clock.drive(t0 + Duration::from_secs(1), &mut registry), Ok(1));
    let drawn = registry.get("a").expect("attached");
    assert!(!drawn.is_dirty());

    clock.pause_all(t0 + Duration::from_secs(2));
    let frozen = clock.elapsed("a", t0 + Duration::from_secs(2)).expect("registered");
    assert!(frozen > 0.0);
    assert_eq!(clock.drive(t0 + Duration::from_secs(3), &mut registry), Ok(0));
    assert_eq!(clock.elapsed("a", t0 + Duration::from_secs(9)), Ok(frozen));

    clock.stop_all();
    assert_eq!(clock.state("a"), Ok(PlayState::Idle));
    assert_eq!(clock.elapsed("a", t0 + Duration::from_secs(10)), Ok(0.0));
}
