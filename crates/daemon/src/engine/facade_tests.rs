// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use voxel_core::ArtifactFormat;

fn red() -> Color {
    Color::opaque(255, 0, 0)
}

#[test]
fn add_and_get_voxel_round_trip() {
    let mut scene = Scene::new("demo");
    add_voxel(&mut scene, Coord::ORIGIN, red(), None).unwrap();
    assert_eq!(get_voxel(&scene, Coord::ORIGIN, None).unwrap(), Some(red()));
}

#[test]
fn remove_voxel_reports_existed() {
    let mut scene = Scene::new("demo");
    add_voxel(&mut scene, Coord::ORIGIN, red(), None).unwrap();
    assert!(remove_voxel(&mut scene, Coord::ORIGIN, None).unwrap());
    assert!(!remove_voxel(&mut scene, Coord::ORIGIN, None).unwrap());
}

#[test]
fn paint_voxels_fills_region() {
    let mut scene = Scene::new("demo");
    let region = BoundingBox { min: Coord::new(0, 0, 0), max: Coord::new(1, 1, 1) };
    let count = paint_voxels(&mut scene, region, red(), None).unwrap();
    assert_eq!(count, 8);
    assert_eq!(get_voxel(&scene, Coord::new(1, 1, 1), None).unwrap(), Some(red()));
}

#[test]
fn flood_fill_replaces_connected_empty_region() {
    let mut scene = Scene::new("demo");
    let region = BoundingBox { min: Coord::new(0, 0, 0), max: Coord::new(2, 0, 0) };
    paint_voxels(&mut scene, region, Color::opaque(0, 0, 255), None).unwrap();
    // carve a hole in the middle, then flood-fill the empty origin voxel
    remove_voxel(&mut scene, Coord::new(1, 0, 0), None).unwrap();
    let filled = flood_fill(&mut scene, Coord::new(1, 0, 0), red(), None).unwrap();
    assert_eq!(filled, 1);
    assert_eq!(get_voxel(&scene, Coord::new(1, 0, 0), None).unwrap(), Some(red()));
}

#[test]
fn flood_fill_noop_when_already_target_color() {
    let mut scene = Scene::new("demo");
    add_voxel(&mut scene, Coord::ORIGIN, red(), None).unwrap();
    let filled = flood_fill(&mut scene, Coord::ORIGIN, red(), None).unwrap();
    assert_eq!(filled, 0);
}

#[test]
fn procedural_sphere_fills_a_roughly_spherical_region() {
    let mut scene = Scene::new("demo");
    let region = BoundingBox { min: Coord::new(-2, -2, -2), max: Coord::new(2, 2, 2) };
    let count = procedural_sphere(&mut scene, region, red(), None).unwrap();
    assert!(count > 0);
    // Center voxel must always be inside the sphere.
    assert_eq!(get_voxel(&scene, Coord::ORIGIN, None).unwrap(), Some(red()));
}

#[test]
fn layer_lifecycle_through_facade() {
    let mut scene = Scene::new("demo");
    let id = create_layer(&mut scene, "roof");
    set_layer_visibility(&mut scene, id, false).unwrap();
    assert!(!list_layers(&scene).iter().find(|l| l.id == id).unwrap().visible);
    delete_layer(&mut scene, id).unwrap();
    assert!(list_layers(&scene).iter().all(|l| l.id != id));
}

#[test]
fn save_and_load_project_round_trips_voxels() {
    let mut scene = Scene::new("demo");
    add_voxel(&mut scene, Coord::new(1, 2, 3), red(), None).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project.gox");
    save_project(&scene, &path).unwrap();
    let loaded = load_project(&path).unwrap();
    assert_eq!(get_voxel(&loaded, Coord::new(1, 2, 3), None).unwrap(), Some(red()));
}

#[test]
fn export_model_writes_a_nonempty_file() {
    let scene = Scene::new("demo");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.obj");
    let bytes = export_model(&scene, ArtifactFormat::Obj, &path).unwrap();
    assert!(bytes > 0);
    assert!(path.exists());
}

#[test]
fn render_scene_writes_a_nonempty_file() {
    let scene = Scene::new("demo");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("render.png");
    let bytes = render_scene(&scene, 64, 64, &path).unwrap();
    assert!(bytes > 0);
}
