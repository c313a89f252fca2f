//! Camera Flight Tests
//!
//! Tests for:
//! - The shipped seven-step path (timing, exact end pose)
//! - Look-at after every write
//! - Driving the flight through a scene camera node

mod common;

use glam::Vec3;

use common::{approx, vec3_approx};
use phoenix::scene::{Camera, Scene, Transform};
use phoenix::showcase::{CameraFlight, CameraKeyframe, look_at_point};
use phoenix::tween::{AxisTargets, TweenState};

const FINAL_POSE: Vec3 = Vec3::new(-1050.0, 6.38, 5.53);

fn start_transform() -> Transform {
    let mut t = Transform::new();
    t.position = Vec3::new(0.0, 5.0, 15.0);
    t
}

fn shipped_flight() -> CameraFlight {
    CameraFlight::new(&CameraKeyframe::default_flight(), Vec3::ZERO)
}

fn faces_origin(t: &Transform) -> bool {
    let expected = (Vec3::ZERO - t.position).normalize();
    vec3_approx(t.forward(), expected)
}

// ============================================================================
// Timing
// ============================================================================

#[test]
fn last_step_starts_one_second_before_sixth_ends() {
    let flight = shipped_flight();
    let timeline = flight.timeline();

    assert_eq!(timeline.len(), 7);
    assert_eq!(timeline.start_time(5), Some(15.0));
    assert_eq!(timeline.start_time(6), Some(17.0));
    assert_eq!(timeline.duration(), 27.0);
}

#[test]
fn opening_scenario() {
    let mut flight = shipped_flight();
    let mut t = start_transform();

    flight.advance(0.0, &mut t);
    assert_eq!(t.position, Vec3::new(0.0, 5.0, 15.0));

    flight.advance(1.5, &mut t);
    assert_eq!(t.position.y, 5.0, "y holds until the second step runs");

    flight.advance(1.5, &mut t);
    assert_eq!(t.position, Vec3::new(0.0, 5.0, 25.0));

    flight.advance(3.0, &mut t);
    assert_eq!(t.position.y, 15.0);
    assert_eq!(t.position.z, 25.0);
}

#[test]
fn last_step_captures_its_start_at_seventeen() {
    let mut flight = shipped_flight();
    let mut t = start_transform();

    flight.advance(16.5, &mut t);
    let last = flight.timeline().tween(6).unwrap();
    assert_eq!(last.state(), TweenState::Pending);
    assert_eq!(last.start_values(), None);

    flight.advance(1.0, &mut t);
    let last = flight.timeline().tween(6).unwrap();
    assert_eq!(last.state(), TweenState::Active);
    assert!(last.start_values().is_some());
    // The sixth step is still running underneath.
    assert_eq!(flight.timeline().tween(5).unwrap().state(), TweenState::Active);
}

#[test]
fn final_pose_is_exact_and_permanent() {
    let mut flight = shipped_flight();
    let mut t = start_transform();

    flight.advance(27.0, &mut t);
    assert!(flight.is_complete());
    assert_eq!(t.position, FINAL_POSE);

    let rotation = t.rotation;
    for _ in 0..10 {
        flight.advance(5.0, &mut t);
    }
    assert_eq!(t.position, FINAL_POSE);
    assert_eq!(t.rotation, rotation);
}

#[test]
fn small_steps_reach_the_same_end() {
    let mut flight = shipped_flight();
    let mut t = start_transform();
    for _ in 0..2000 {
        flight.advance(1.0 / 60.0, &mut t);
    }
    assert!(flight.is_complete());
    assert_eq!(t.position, FINAL_POSE);
}

// ============================================================================
// Look-at
// ============================================================================

#[test]
fn camera_faces_origin_at_every_tick() {
    let mut flight = shipped_flight();
    let mut t = start_transform();

    for step in 0..120 {
        flight.advance(0.25, &mut t);
        assert!(
            faces_origin(&t),
            "tick {step}: forward {:?} at {:?}",
            t.forward(),
            t.position
        );
    }
}

#[test]
fn look_at_point_keeps_world_up() {
    let mut t = Transform::new();
    t.position = Vec3::new(-50.0, 15.0, 10.0);
    look_at_point(&mut t, Vec3::ZERO);

    assert!(faces_origin(&t));
    let right = t.rotation * Vec3::X;
    assert!(approx(right.y, 0.0), "no roll: right = {right:?}");
}

#[test]
fn custom_keyframes_follow_the_same_rules() {
    let keyframes = vec![
        CameraKeyframe::new(AxisTargets::default().with_x(4.0), 1.0),
        CameraKeyframe::new(AxisTargets::default().with_x(8.0), 1.0).with_start_offset(-0.5),
    ];
    let flight = CameraFlight::new(&keyframes, Vec3::new(0.0, 0.0, -100.0));
    assert_eq!(flight.timeline().start_time(1), Some(0.5));
    assert_eq!(flight.timeline().duration(), 1.5);
}

// ============================================================================
// Scene integration
// ============================================================================

#[test]
fn tick_moves_the_scene_camera_node() {
    let mut scene = Scene::new();
    let camera = scene.add_camera(Camera::new_perspective(45.0, 1.5, 0.1, 1000.0));
    scene.get_node_mut(camera).unwrap().transform.position = Vec3::new(0.0, 5.0, 15.0);

    let mut flight = shipped_flight();
    flight.tick(3.0, &mut scene, camera);

    let node = scene.get_node(camera).unwrap();
    assert_eq!(node.transform.position, Vec3::new(0.0, 5.0, 25.0));
    assert!(faces_origin(&node.transform));

    // Camera matrices follow after the frame's matrix update.
    scene.update();
    let cam = scene.camera_of(camera).unwrap();
    assert!(vec3_approx(cam.world_position(), Vec3::new(0.0, 5.0, 25.0)));
}
