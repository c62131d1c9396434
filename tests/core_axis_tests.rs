use chart_map_rs::core::{AxisPair, AxisState};

#[test]
fn axis_round_trip_within_tolerance() {
    let axis = AxisState::horizontal(1000.0)
        .expect("valid axis")
        .with_domain(10.0, 110.0)
        .expect("valid domain");

    let original = 42.5;
    let px = axis.to_pixels(original, true);
    let recovered = axis.to_value(px, true);

    assert!((recovered - original).abs() <= 1e-9);
}

#[test]
fn invalid_length_is_rejected() {
    assert!(AxisState::horizontal(0.0).is_err());
    assert!(AxisState::vertical(f64::NAN).is_err());
}

#[test]
fn trans_a_tracks_length_padding_and_domain() {
    let mut axis = AxisState::horizontal(100.0)
        .expect("valid axis")
        .with_domain(0.0, 10.0)
        .expect("valid domain");
    assert_eq!(axis.trans_a(), 10.0);

    axis.set_min_pixel_padding(10.0).expect("padding");
    assert_eq!(axis.trans_a(), 8.0);
    assert_eq!(axis.to_pixels(0.0, true), 10.0);
    assert_eq!(axis.to_pixels(10.0, true), 90.0);

    axis.set_len(200.0).expect("len");
    assert_eq!(axis.trans_a(), 18.0);
}

#[test]
fn pos_offset_only_applies_outside_pane_coordinates() {
    let axis = AxisState::horizontal(100.0)
        .expect("valid axis")
        .with_domain(0.0, 10.0)
        .expect("valid domain")
        .with_pos(20.0);
    assert_eq!(axis.to_pixels(5.0, true), 50.0);
    assert_eq!(axis.to_pixels(5.0, false), 70.0);
    assert_eq!(axis.to_value(70.0, false), 5.0);
}

#[test]
fn vertical_axes_flip_unless_reversed() {
    let upward = AxisState::vertical(100.0)
        .expect("valid axis")
        .with_domain(0.0, 10.0)
        .expect("valid domain");
    assert!(upward.is_flipped());
    assert_eq!(upward.to_pixels(0.0, true), 100.0);
    assert_eq!(upward.to_pixels(10.0, true), 0.0);

    let map_axis = upward.with_reversed(true);
    assert!(!map_axis.is_flipped());
    assert_eq!(map_axis.to_pixels(0.0, true), 0.0);
    assert_eq!(map_axis.to_pixels(10.0, true), 100.0);
}

#[test]
fn missing_domain_reads_as_zero_with_unit_scale() {
    let axis = AxisState::horizontal(100.0).expect("valid axis");
    assert_eq!(axis.domain(), None);
    assert_eq!(axis.trans_a(), 1.0);
    assert_eq!(axis.linear_to_pixels(7.0), 7.0);
}

#[test]
fn degenerate_extremes_need_a_min_range() {
    let mut axis = AxisState::horizontal(100.0).expect("valid axis");
    assert!(axis.set_extremes(5.0, 5.0).is_err());
    assert!(axis.set_extremes(6.0, 5.0).is_err());

    let mut pinned = axis
        .with_configured_min_range(Some(2.0))
        .expect("min range");
    pinned.set_extremes(5.0, 5.0).expect("widened");
    assert_eq!(pinned.domain(), Some((4.0, 6.0)));
}

#[test]
fn pan_moves_content_by_pixels() {
    let mut x = AxisState::horizontal(100.0)
        .expect("valid axis")
        .with_domain(0.0, 10.0)
        .expect("valid domain");
    x.pan_by_pixels(10.0).expect("pan");
    assert_eq!(x.domain(), Some((-1.0, 9.0)));
    assert_eq!(x.to_pixels(5.0, true), 60.0);

    let mut y = AxisState::vertical(100.0)
        .expect("valid axis")
        .with_domain(0.0, 10.0)
        .expect("valid domain");
    let before = y.to_pixels(5.0, true);
    y.pan_by_pixels(10.0).expect("pan");
    assert_eq!(y.to_pixels(5.0, true), before + 10.0);
}

#[test]
fn pan_without_domain_fails() {
    let mut axis = AxisState::horizontal(100.0).expect("valid axis");
    assert!(axis.pan_by_pixels(5.0).is_err());
}

#[test]
fn zoom_respects_min_range() {
    let mut axis = AxisState::horizontal(100.0)
        .expect("valid axis")
        .with_domain(0.0, 10.0)
        .expect("valid domain");
    axis.zoom(0.5, None).expect("zoom");
    assert_eq!(axis.domain(), Some((2.5, 7.5)));

    let mut floored = AxisState::horizontal(100.0)
        .expect("valid axis")
        .with_configured_min_range(Some(4.0))
        .expect("min range")
        .with_domain(0.0, 10.0)
        .expect("valid domain");
    floored.zoom(0.1, Some(5.0)).expect("zoom");
    assert_eq!(floored.domain(), Some((3.0, 7.0)));
    assert!(floored.zoom(0.0, None).is_err());
}

#[test]
fn configured_min_range_wins_over_derived() {
    let mut axis = AxisState::horizontal(100.0)
        .expect("valid axis")
        .with_configured_min_range(Some(3.0))
        .expect("min range");
    axis.fold_min_range(1.0);
    assert_eq!(axis.min_range(), Some(3.0));

    let mut derived = AxisState::horizontal(100.0).expect("valid axis");
    derived.fold_min_range(4.0);
    derived.fold_min_range(6.0);
    assert_eq!(derived.min_range(), Some(4.0));
}

#[test]
fn preserve_aspect_ratio_centers_the_slack_axis() {
    let mut axes = AxisPair::new(
        AxisState::horizontal(200.0)
            .expect("valid axis")
            .with_domain(0.0, 10.0)
            .expect("valid domain"),
        AxisState::vertical(100.0)
            .expect("valid axis")
            .with_reversed(true)
            .with_domain(0.0, 10.0)
            .expect("valid domain"),
    );
    axes.preserve_aspect_ratio().expect("aspect ratio");

    assert_eq!(axes.x.trans_a(), 10.0);
    assert_eq!(axes.y.trans_a(), 10.0);
    assert_eq!(axes.x.min_pixel_padding(), 50.0);
    assert_eq!(axes.y.min_pixel_padding(), 0.0);
    assert_eq!(axes.x.to_pixels(0.0, true), 50.0);
    assert_eq!(axes.x.to_pixels(10.0, true), 150.0);
}
