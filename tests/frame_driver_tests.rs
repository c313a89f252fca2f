//! Frame Driver and Scene State Tests
//!
//! Tests for:
//! - Mixer advance proportional to each instance's playback rate
//! - Frames before the model has loaded
//! - Render dispatch through a RenderSurface
//! - Viewport resize reaching both the surface and the camera aspect

mod common;

use glam::Vec3;

use common::{RecordingSurface, approx, skinned_prefab};
use phoenix::errors::Error;
use phoenix::showcase::{FrameDriver, SceneState, ShowcaseConfig};

fn loaded_state() -> (SceneState, ShowcaseConfig) {
    let config = ShowcaseConfig::default();
    let mut state = SceneState::new(&config, 16.0 / 9.0);
    state.populate_flock(&skinned_prefab(), &config);
    (state, config)
}

// ============================================================================
// Mixer advance
// ============================================================================

#[test]
fn mixers_advance_by_dt_times_rate() {
    let (mut state, config) = loaded_state();

    for d in [0.0_f32, 0.016, 0.5, 2.0] {
        let before: Vec<f32> = state
            .flock
            .as_ref()
            .unwrap()
            .members
            .iter()
            .map(|m| m.mixer.time())
            .collect();

        FrameDriver::advance(d, &mut state);

        let flock = state.flock.as_ref().unwrap();
        for ((member, rate), t0) in flock.members.iter().zip(&config.playback_rates).zip(before) {
            assert!(
                approx(member.mixer.time() - t0, d * rate),
                "rate {rate}: advanced {} for d = {d}",
                member.mixer.time() - t0
            );
        }
    }
}

#[test]
fn playback_rates_are_per_instance() {
    let (mut state, _) = loaded_state();
    FrameDriver::advance(1.0, &mut state);

    let times: Vec<f32> = state
        .flock
        .as_ref()
        .unwrap()
        .members
        .iter()
        .map(|m| m.mixer.time())
        .collect();
    assert_eq!(times, vec![0.7, 0.6, 0.8]);
}

#[test]
fn mixer_output_reaches_instance_nodes() {
    let (mut state, _) = loaded_state();
    FrameDriver::advance(0.5, &mut state);

    let flock = state.flock.as_ref().unwrap();
    for member in &flock.members {
        let hips = member.instance.node(1).unwrap();
        let y = state.scene.get_node(hips).unwrap().transform.position.y;
        // Flap runs 0 -> 1 over one second, so y equals the mixer's clip time.
        assert!(approx(y, 0.5 * member.playback_rate), "y = {y}");
    }
}

#[test]
fn advance_before_load_is_a_no_op() {
    let config = ShowcaseConfig::default();
    let mut state = SceneState::new(&config, 1.0);
    assert!(!state.mixers_ready());

    FrameDriver::advance(0.5, &mut state);
    assert!(state.flock.is_none());
}

// ============================================================================
// Frames
// ============================================================================

#[test]
fn frame_renders_from_the_state_camera() {
    let (mut state, _) = loaded_state();
    let mut surface = RecordingSurface::default();
    let mut driver = FrameDriver::new();

    driver.frame(&mut state, &mut surface).unwrap();
    driver.frame(&mut state, &mut surface).unwrap();

    assert_eq!(surface.renders, vec![state.camera, state.camera]);
}

#[test]
fn frame_without_mixers_still_renders() {
    let config = ShowcaseConfig::default();
    let mut state = SceneState::new(&config, 1.0);
    let mut surface = RecordingSurface::default();

    FrameDriver::new().frame(&mut state, &mut surface).unwrap();
    assert_eq!(surface.renders.len(), 1);
}

#[test]
fn frame_updates_world_matrices_before_render() {
    let (mut state, config) = loaded_state();
    let mut surface = RecordingSurface::default();
    FrameDriver::new().frame(&mut state, &mut surface).unwrap();

    let root = state.flock.as_ref().unwrap().members[0].instance.root;
    let world = *state.scene.get_node(root).unwrap().world_matrix();
    assert_eq!(Vec3::from(world.translation), config.instance_positions[0]);
}

#[test]
fn render_errors_reach_the_caller() {
    let (mut state, _) = loaded_state();
    let mut surface = RecordingSurface {
        fail: true,
        ..RecordingSurface::default()
    };
    let result = FrameDriver::new().frame(&mut state, &mut surface);
    assert!(matches!(result, Err(Error::Surface(_))));
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn resize_viewport_resizes_surface_and_camera_together() {
    let config = ShowcaseConfig::default();
    let mut state = SceneState::new(&config, 1.0);
    let mut surface = RecordingSurface::default();

    let before = state.scene.camera_of(state.camera).unwrap().clone();
    let position = state.scene.get_node(state.camera).unwrap().transform.position;

    state.resize_viewport(&mut surface, 1920, 1080);

    assert_eq!(surface.size, Some((1920, 1080)));
    assert_eq!(surface.resizes, 1);

    let after = state.scene.camera_of(state.camera).unwrap();
    assert!(approx(after.aspect, 1920.0 / 1080.0));
    assert_eq!(after.fov, before.fov);
    assert_eq!(after.near, before.near);
    assert_eq!(after.far, before.far);
    assert_ne!(after.projection_matrix(), before.projection_matrix());
    assert_eq!(
        state.scene.get_node(state.camera).unwrap().transform.position,
        position
    );
}

#[test]
fn resized_viewport_is_rendered_with_the_new_aspect() {
    let (mut state, _) = loaded_state();
    let mut surface = RecordingSurface::default();
    let mut driver = FrameDriver::new();

    state.resize_viewport(&mut surface, 800, 200);
    driver.frame(&mut state, &mut surface).unwrap();

    assert_eq!(surface.renders.len(), 1);
    assert!(approx(state.scene.camera_of(state.camera).unwrap().aspect, 4.0));
}

#[test]
fn zero_sized_resize_is_ignored() {
    let config = ShowcaseConfig::default();
    let mut state = SceneState::new(&config, 1.5);
    let mut surface = RecordingSurface::default();

    state.resize_viewport(&mut surface, 0, 720);
    state.resize_viewport(&mut surface, 1280, 0);
    state.resize(0, 0);

    assert_eq!(surface.resizes, 0);
    assert_eq!(surface.size, None);
    assert!(approx(state.scene.camera_of(state.camera).unwrap().aspect, 1.5));
}
