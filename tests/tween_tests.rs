//! Tween and Timeline Tests
//!
//! Tests for:
//! - Easing names and curve endpoints
//! - Partial-axis tweens with lazily captured start values
//! - Timeline placement (sequential, negative offset, absolute)
//! - Overlap ordering, completion and time clamping

mod common;

use std::str::FromStr;

use glam::Vec3;

use common::{approx, vec3_approx};
use phoenix::tween::{AxisTargets, EaseDirection, Easing, Position, Timeline, Tween, TweenState};

fn linear(target: AxisTargets, duration: f32) -> Tween {
    Tween::new(target, duration, Easing::None)
}

// ============================================================================
// Easing
// ============================================================================

#[test]
fn easing_names_parse() {
    assert_eq!(Easing::from_str("none").unwrap(), Easing::None);
    assert_eq!(
        Easing::from_str("power2.out").unwrap(),
        Easing::Power(2, EaseDirection::Out)
    );
    assert_eq!(
        Easing::from_str("sine.inOut").unwrap(),
        Easing::Sine(EaseDirection::InOut)
    );
    assert!(Easing::from_str("bounce.wobble").is_err());
}

#[test]
fn every_easing_hits_its_endpoints() {
    let easings = [
        Easing::None,
        Easing::Power(1, EaseDirection::In),
        Easing::Power(3, EaseDirection::Out),
        Easing::Sine(EaseDirection::InOut),
        Easing::Expo(EaseDirection::InOut),
    ];
    for easing in easings {
        assert!(approx(easing.apply(0.0), 0.0), "{easing} at 0");
        assert!(approx(easing.apply(1.0), 1.0), "{easing} at 1");
    }
}

#[test]
fn easing_deserializes_from_gsap_name() {
    let easing: Easing = serde_json::from_str("\"power2.inOut\"").unwrap();
    assert_eq!(easing, Easing::Power(2, EaseDirection::InOut));
}

// ============================================================================
// Tween
// ============================================================================

#[test]
fn tween_captures_start_on_first_render() {
    let mut tween = linear(AxisTargets::default().with_x(10.0), 2.0);
    assert_eq!(tween.state(), TweenState::Pending);
    assert_eq!(tween.start_values(), None);

    let mut pos = Vec3::new(2.0, 3.0, 4.0);
    assert!(tween.render(0.0, &mut pos));
    assert_eq!(tween.start_values(), Some(Vec3::new(2.0, 3.0, 4.0)));
    assert_eq!(tween.state(), TweenState::Active);

    tween.render(1.0, &mut pos);
    assert!(vec3_approx(pos, Vec3::new(6.0, 3.0, 4.0)));
}

#[test]
fn tween_leaves_untargeted_axes_alone() {
    let mut tween = linear(AxisTargets::default().with_y(15.0), 3.0);
    let mut pos = Vec3::new(0.0, 5.0, 25.0);

    tween.render(1.5, &mut pos);
    pos.x = 7.0;
    tween.render(2.0, &mut pos);

    assert_eq!(pos.x, 7.0);
    assert_eq!(pos.z, 25.0);
}

#[test]
fn tween_writes_exact_target_on_completion() {
    let mut tween = Tween::new(
        AxisTargets::all(Vec3::new(-1050.0, 6.38, 5.53)),
        10.0,
        Easing::Sine(EaseDirection::InOut),
    );
    let mut pos = Vec3::new(10.0, 5.0, 15.0);
    tween.render(4.0, &mut pos);
    tween.render(12.0, &mut pos);

    assert_eq!(pos, Vec3::new(-1050.0, 6.38, 5.53));
    assert_eq!(tween.state(), TweenState::Complete);

    pos = Vec3::ZERO;
    assert!(!tween.render(13.0, &mut pos), "completed tweens never write again");
    assert_eq!(pos, Vec3::ZERO);
}

#[test]
fn tween_ignores_negative_local_time() {
    let mut tween = linear(AxisTargets::default().with_z(1.0), 1.0);
    let mut pos = Vec3::ZERO;
    assert!(!tween.render(-0.5, &mut pos));
    assert_eq!(tween.state(), TweenState::Pending);
}

#[test]
fn zero_duration_tween_snaps() {
    let mut tween = linear(AxisTargets::default().with_x(3.0), 0.0);
    let mut pos = Vec3::ZERO;
    tween.render(0.0, &mut pos);
    assert_eq!(pos.x, 3.0);
    assert_eq!(tween.state(), TweenState::Complete);
}

// ============================================================================
// Timeline
// ============================================================================

#[test]
fn timeline_places_steps_end_to_end() {
    let mut timeline = Timeline::new();
    timeline.add(linear(AxisTargets::default().with_x(1.0), 3.0), Position::default());
    timeline.add(linear(AxisTargets::default().with_y(1.0), 2.0), Position::After(0.0));
    timeline.add(linear(AxisTargets::default().with_z(1.0), 4.0), Position::After(-1.0));
    timeline.add(linear(AxisTargets::default().with_z(2.0), 1.0), Position::At(0.5));

    assert_eq!(timeline.start_time(0), Some(0.0));
    assert_eq!(timeline.start_time(1), Some(3.0));
    assert_eq!(timeline.start_time(2), Some(4.0));
    assert_eq!(timeline.start_time(3), Some(0.5));
    assert_eq!(timeline.duration(), 8.0);
}

#[test]
fn negative_offset_cannot_start_before_zero() {
    let mut timeline = Timeline::new();
    timeline.add(linear(AxisTargets::default().with_x(1.0), 1.0), Position::After(-5.0));
    assert_eq!(timeline.start_time(0), Some(0.0));
}

#[test]
fn overlapping_steps_render_in_declared_order() {
    let mut timeline = Timeline::new();
    timeline.add(linear(AxisTargets::default().with_x(10.0), 2.0), Position::default());
    timeline.add(linear(AxisTargets::default().with_x(-10.0), 2.0), Position::After(-1.0));

    let mut pos = Vec3::ZERO;
    let mut writes = 0;
    timeline.tick(1.5, &mut pos, |_| writes += 1);

    // Both steps wrote; the later one wins.
    assert_eq!(writes, 2);
    let first = 7.5;
    let expected = first + (-10.0 - first) * 0.25;
    assert!(approx(pos.x, expected), "x = {}", pos.x);
}

#[test]
fn timeline_clamps_time_and_stops_when_complete() {
    let mut timeline = Timeline::new();
    timeline.add(linear(AxisTargets::default().with_x(4.0), 2.0), Position::default());

    let mut pos = Vec3::ZERO;
    timeline.tick(-1.0, &mut pos, |_| {});
    assert_eq!(timeline.time(), 0.0);

    timeline.tick(50.0, &mut pos, |_| {});
    assert_eq!(timeline.time(), 2.0);
    assert!(timeline.is_complete());
    assert_eq!(pos.x, 4.0);

    let mut calls = 0;
    pos.x = 0.0;
    timeline.tick(1.0, &mut pos, |_| calls += 1);
    assert_eq!(calls, 0);
    assert_eq!(pos.x, 0.0);
}

#[test]
fn empty_timeline_is_complete() {
    let mut timeline = Timeline::new();
    let mut pos = Vec3::ONE;
    timeline.tick(1.0, &mut pos, |_| panic!("nothing to update"));
    assert!(timeline.is_empty());
    assert!(timeline.is_complete());
}
