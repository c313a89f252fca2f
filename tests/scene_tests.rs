//! Scene Graph and Instancing Tests
//!
//! Tests for:
//! - Hierarchy propagation and re-parenting
//! - Prefab instancing (independent nodes and skeletons per instance)
//! - Joint palettes following animated bones

mod common;

use std::sync::Arc;

use glam::{Affine3A, Vec3};

use common::{skinned_prefab, vec3_approx};
use phoenix::animation::AnimationMixer;
use phoenix::scene::{Node, Scene};

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn child_world_matrix_follows_parent() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent"));
    let child = scene.add_to_parent(Node::new("Child"), parent);

    scene.get_node_mut(parent).unwrap().transform.position = Vec3::new(1.0, 0.0, 0.0);
    scene.get_node_mut(child).unwrap().transform.position = Vec3::new(0.0, 2.0, 0.0);
    scene.update();

    let world = scene.get_node(child).unwrap().world_matrix().translation;
    assert!(vec3_approx(world.into(), Vec3::new(1.0, 2.0, 0.0)));

    // Moving only the parent still refreshes the child.
    scene.get_node_mut(parent).unwrap().transform.position = Vec3::new(5.0, 0.0, 0.0);
    scene.update();
    let world = scene.get_node(child).unwrap().world_matrix().translation;
    assert!(vec3_approx(world.into(), Vec3::new(5.0, 2.0, 0.0)));
}

#[test]
fn attach_moves_node_off_the_top_level() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("A"));
    let b = scene.add_node(Node::new("B"));
    assert_eq!(scene.root_nodes.len(), 2);

    scene.attach(b, a);
    assert_eq!(scene.root_nodes, vec![a]);
    assert_eq!(scene.get_node(b).unwrap().parent(), Some(a));
    assert_eq!(scene.get_node(a).unwrap().children(), &[b]);

    scene.attach(a, a);
    assert_eq!(scene.get_node(a).unwrap().parent(), None);
}

// ============================================================================
// Instancing
// ============================================================================

#[test]
fn instances_get_their_own_nodes_and_skeletons() {
    let prefab = skinned_prefab();
    let mut scene = Scene::new();

    let first = scene.instantiate(&prefab);
    let second = scene.instantiate(&prefab);

    assert_eq!(first.nodes.len(), 3);
    assert_eq!(second.nodes.len(), 3);
    assert!(first.nodes.iter().all(|h| !second.nodes.contains(h)));
    assert_ne!(first.root, second.root);
    assert_eq!(scene.skins.len(), 2);

    let skin_of = |body| {
        scene
            .get_node(body)
            .and_then(|n| n.skin.as_ref())
            .map(|s| s.skeleton)
            .unwrap()
    };
    let first_skin = skin_of(first.nodes[2]);
    let second_skin = skin_of(second.nodes[2]);
    assert_ne!(first_skin, second_skin);

    // Each skeleton's bones are the instance's own nodes.
    assert_eq!(scene.skins[first_skin].bones, vec![first.nodes[1]]);
    assert_eq!(scene.skins[second_skin].bones, vec![second.nodes[1]]);
}

#[test]
fn instance_hierarchy_matches_prefab() {
    let prefab = skinned_prefab();
    let mut scene = Scene::new();
    let inst = scene.instantiate(&prefab);

    assert_eq!(scene.root_nodes, vec![inst.root]);
    let group = scene.get_node(inst.root).unwrap();
    assert_eq!(group.name, "Bird");
    // Root and Body have no prefab parent; Hips hangs under Root.
    assert_eq!(group.children(), &[inst.nodes[0], inst.nodes[2]]);
    assert_eq!(scene.get_node(inst.nodes[1]).unwrap().parent(), Some(inst.nodes[0]));
    assert_eq!(scene.meshes.len(), 1);
}

#[test]
fn place_moves_and_scales_the_whole_instance() {
    let prefab = skinned_prefab();
    let mut scene = Scene::new();
    let inst = scene.instantiate(&prefab);

    scene.get_node_mut(inst.nodes[1]).unwrap().transform.position = Vec3::new(0.0, 100.0, 0.0);
    scene.place(inst.root, Vec3::new(8.0, 3.0, -8.0), 0.01);
    scene.update();

    let root = scene.get_node(inst.root).unwrap();
    assert_eq!(root.transform.position, Vec3::new(8.0, 3.0, -8.0));
    assert_eq!(root.transform.scale, Vec3::splat(0.01));

    let hips = scene.get_node(inst.nodes[1]).unwrap().world_matrix().translation;
    assert!(vec3_approx(hips.into(), Vec3::new(8.0, 4.0, -8.0)));
}

#[test]
fn animating_one_instance_leaves_the_other_alone() {
    let prefab = skinned_prefab();
    let clip = Arc::clone(&prefab.animations[0]);
    let mut scene = Scene::new();

    let first = scene.instantiate(&prefab);
    let second = scene.instantiate(&prefab);

    let mut mixer = AnimationMixer::new();
    mixer.play(&clip, &first);
    mixer.update(0.5, &mut scene);
    scene.update();

    let hips_y = |handle| scene.get_node(handle).unwrap().transform.position.y;
    assert!((hips_y(first.nodes[1]) - 0.5).abs() < 1e-5);
    assert_eq!(hips_y(second.nodes[1]), 0.0);

    let joint_y = |body| {
        let key = scene.get_node(body).unwrap().skin.as_ref().unwrap().skeleton;
        scene.skins[key].joint_matrices()[0].w_axis.y
    };
    assert!((joint_y(first.nodes[2]) - 0.5).abs() < 1e-5);
    assert_eq!(joint_y(second.nodes[2]), 0.0);
}

#[test]
fn joint_palette_is_relative_to_the_skinned_node() {
    let prefab = skinned_prefab();
    let mut scene = Scene::new();
    let inst = scene.instantiate(&prefab);

    scene.place(inst.root, Vec3::new(-10.0, 1.0, -5.0), 1.0);
    scene.update();

    // Body and Hips share the instance root, so the placement cancels out.
    let key = scene.get_node(inst.nodes[2]).unwrap().skin.as_ref().unwrap().skeleton;
    let joint = scene.skins[key].joint_matrices()[0];
    let affine = Affine3A::from_mat4(joint);
    assert!(vec3_approx(affine.translation.into(), Vec3::ZERO));
}
