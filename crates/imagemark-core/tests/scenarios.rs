//! End-to-end behavior of the marker board through its public API.

use imagemark_core::{
    BoardConfig, ChangeKind, GuideKind, ImageFrame, Key, Marker, MarkerBoard, MarkerPosition, MarkerStyle,
    Modifiers, NewMarker, ResizeHandle, calculate_alignment_guides_with_snap, clamp_position,
    get_marker_bounds, percent_to_pixel, pixel_to_percent,
};
use kurbo::{Point, Size};

const EPS: f64 = 1e-9;

/// 1000x500 image in a 500x250 container, so scale is 0.5.
fn half_scale_board() -> MarkerBoard<()> {
    let mut board = MarkerBoard::new(BoardConfig {
        width: 500.0,
        height: 250.0,
        ..BoardConfig::default()
    });
    board.image_loaded(Size::new(1000.0, 500.0));
    board
}

fn add_at(board: &mut MarkerBoard<()>, x: f64, y: f64) -> String {
    board.add_marker(NewMarker::at(MarkerPosition::new(x, y))).id
}

#[test]
fn test_marker_bounds_at_half_scale() {
    let marker: Marker<()> = Marker::new("a", MarkerPosition::new(10.0, 10.0));
    let bounds = get_marker_bounds(&marker, 1000.0, 500.0, 0.5, &MarkerStyle::default());

    assert_eq!(bounds.center(), Point::new(50.0, 25.0));
    assert_eq!(bounds.left, 36.0);
    assert_eq!(bounds.top, 11.0);
    assert_eq!(bounds.right, 64.0);
    assert_eq!(bounds.bottom, 39.0);
}

#[test]
fn test_drag_snaps_right_edge_to_left_edge() {
    let mut board = half_scale_board();
    let a = add_at(&mut board, 10.0, 10.0);
    // Screen center x 78, so the left edge sits at 64.
    add_at(&mut board, 15.6, 80.0);
    board.poll_events();

    assert!(board.drag_start(&a));
    // Right edge lands at 66, two pixels past the other marker's left edge.
    let position = board.drag_move(&a, Point::new(52.0, 25.0)).unwrap();

    let guides = board.alignment_guides();
    assert_eq!(guides.len(), 1);
    assert_eq!(guides[0].kind, GuideKind::Vertical);
    assert!((guides[0].position - 64.0).abs() < EPS);

    // Center pulled back so the right edge is exactly on the guide.
    assert!((position.x - 10.0).abs() < EPS);
    let frame = board.image_frame().unwrap();
    let bounds = frame.marker_bounds(board.marker_by_id(&a).unwrap(), &MarkerStyle::default());
    assert!((bounds.right - 64.0).abs() < EPS);

    board.drag_end(&a);
    assert!(board.alignment_guides().is_empty());
}

#[test]
fn test_delete_missing_id_is_silent() {
    let mut board = half_scale_board();
    for i in 0..3 {
        add_at(&mut board, 10.0 * i as f64, 10.0);
    }
    let before = board.markers().to_vec();
    board.poll_events();

    assert!(board.delete_marker("missing-id").is_none());
    assert_eq!(board.markers(), before.as_slice());
    assert!(board.poll_events().is_empty());
}

#[test]
fn test_shift_nudge_moves_selection_only() {
    let mut board = half_scale_board();
    let a = add_at(&mut board, 10.0, 10.0);
    let b = add_at(&mut board, 20.0, 30.0);
    let c = add_at(&mut board, 40.0, 40.0);
    board.select_markers([&a, &b]);
    board.poll_events();

    assert!(board.key_down(&Key::ArrowRight, Modifiers::shift()));

    let step = 10.0 / 1000.0 * 100.0;
    assert!((board.marker_by_id(&a).unwrap().position.x - (10.0 + step)).abs() < EPS);
    assert!((board.marker_by_id(&b).unwrap().position.x - (20.0 + step)).abs() < EPS);
    assert_eq!(board.marker_by_id(&c).unwrap().position, MarkerPosition::new(40.0, 40.0));

    let events = board.poll_events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.kind == ChangeKind::Update));
    let moved: Vec<_> = events.iter().map(|e| e.marker.id.clone()).collect();
    assert_eq!(moved, vec![a, b]);
}

#[test]
fn test_resize_rounds_to_step() {
    let mut board = MarkerBoard::<()>::new(BoardConfig {
        width: 1000.0,
        height: 1000.0,
        resize_step: 3.0,
        default_marker_style: MarkerStyle::sized(10.0, 10.0),
        ..BoardConfig::default()
    });
    board.image_loaded(Size::new(1000.0, 1000.0));
    let a = add_at(&mut board, 50.0, 50.0);

    board.transform_start(&a, ResizeHandle::MiddleRight);
    board.transform_end(2.9, 1.0, &[]);

    let style = board.marker_by_id(&a).unwrap().style.clone().unwrap();
    assert_eq!(style.width, 30.0);
    // 10 rounds to 9, then the default minimum height applies.
    assert_eq!(style.height, 10.0);
}

#[test]
fn test_resize_rounded_then_floored() {
    let mut board = MarkerBoard::<()>::new(BoardConfig {
        width: 1000.0,
        height: 1000.0,
        resize_step: 3.0,
        min_marker_width: 40.0,
        default_marker_style: MarkerStyle::sized(10.0, 10.0),
        ..BoardConfig::default()
    });
    board.image_loaded(Size::new(1000.0, 1000.0));
    let a = add_at(&mut board, 50.0, 50.0);

    board.transform_start(&a, ResizeHandle::MiddleRight);
    board.transform_end(2.9, 1.0, &[]);

    assert_eq!(board.marker_by_id(&a).unwrap().style.as_ref().unwrap().width, 40.0);
}

#[test]
fn test_resize_floor_holds_for_all_selected() {
    let mut board = half_scale_board();
    let ids: Vec<String> = (0..4).map(|i| add_at(&mut board, 10.0 + 20.0 * i as f64, 50.0)).collect();
    board.select_markers(&ids);

    for scale in [0.0, 0.01, 0.3, 1.7] {
        board.transform_start(&ids[0], ResizeHandle::TopLeft);
        board.transform_end(scale, scale, &[]);
        for id in &ids {
            let style = board.marker_by_id(id).unwrap().style.clone().unwrap();
            assert!(style.width >= board.config().min_marker_width);
            assert!(style.height >= board.config().min_marker_height);
        }
    }
}

#[test]
fn test_percent_pixel_round_trip() {
    let sizes = [(1000.0, 500.0), (1.0, 1.0), (4096.0, 3.0), (333.3, 777.7)];
    let positions = [(0.0, 0.0), (100.0, 100.0), (12.5, 87.25), (33.333, 66.667)];
    for (w, h) in sizes {
        for (x, y) in positions {
            let p = MarkerPosition::new(x, y);
            let px = percent_to_pixel(p, w, h);
            let back = pixel_to_percent(px.x, px.y, w, h);
            assert!((back.x - x).abs() < 1e-9, "{w}x{h} {x}");
            assert!((back.y - y).abs() < 1e-9, "{w}x{h} {y}");
        }
    }
}

#[test]
fn test_clamp_idempotent() {
    let samples = [(-5.0, 50.0), (150.0, -0.1), (f64::NAN, 42.0), (100.0, 0.0), (f64::INFINITY, 3.0)];
    for (x, y) in samples {
        let once = clamp_position(MarkerPosition::new(x, y));
        assert_eq!(clamp_position(once), once);
        assert!((0.0..=100.0).contains(&once.x));
        assert!((0.0..=100.0).contains(&once.y));
    }
}

#[test]
fn test_ids_unique_after_many_adds() {
    let mut board = half_scale_board();
    let first = add_at(&mut board, 1.0, 1.0);
    for i in 0..200 {
        let partial = if i % 3 == 0 {
            NewMarker::at(MarkerPosition::new(5.0, 5.0)).with_id(first.clone())
        } else {
            NewMarker::at(MarkerPosition::new(5.0, 5.0))
        };
        board.add_marker(partial);
    }

    let mut ids: Vec<_> = board.markers().iter().map(|m| m.id.clone()).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert_eq!(total, 201);
}

fn wide_marker(id: &str, x: f64) -> Marker<()> {
    Marker {
        style: Some(MarkerStyle::sized(400.0, 400.0)),
        ..Marker::new(id, MarkerPosition::new(x, 90.0))
    }
}

#[test]
fn test_alignment_tie_break() {
    let frame = ImageFrame::new(Size::new(1000.0, 1000.0), Size::new(1000.0, 1000.0)).unwrap();
    let style = MarkerStyle::sized(10.0, 10.0);
    // Dragged center x is 500. Wide targets keep their edges out of range,
    // so only centers compete.
    let dragged: Marker<()> = Marker::new("a", MarkerPosition::new(50.0, 10.0));
    let far = wide_marker("b", 62.5);
    let near = wide_marker("c", 43.75);

    let result = calculate_alignment_guides_with_snap(&dragged, [&far, &near], &frame, &style, 150.0);
    assert_eq!(result.guides.len(), 1);
    assert_eq!(result.vertical().unwrap().position, 437.5);

    // Exact tie: the first marker in list order wins.
    let left = wide_marker("l", 43.75);
    let right = wide_marker("r", 56.25);
    let result = calculate_alignment_guides_with_snap(&dragged, [&right, &left], &frame, &style, 150.0);
    assert_eq!(result.vertical().unwrap().position, 562.5);
    let result = calculate_alignment_guides_with_snap(&dragged, [&left, &right], &frame, &style, 150.0);
    assert_eq!(result.vertical().unwrap().position, 437.5);
}

#[test]
fn test_initial_snapshot_round_trips_through_json() {
    let json = r#"[
        {"id": "a", "position": {"x": 10, "y": 20}, "data": {"label": "door"}},
        {"id": "b", "position": {"x": 120, "y": -4}}
    ]"#;
    let markers: Vec<Marker> = serde_json::from_str(json).unwrap();
    let board = MarkerBoard::with_markers(BoardConfig::default(), markers);

    assert_eq!(board.markers().len(), 2);
    assert_eq!(board.marker_by_id("b").unwrap().position, MarkerPosition::new(100.0, 0.0));
    assert_eq!(board.marker_by_id("a").unwrap().data.as_ref().unwrap()["label"], "door");
}
