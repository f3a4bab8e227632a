// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn red() -> Color {
    Color::opaque(255, 0, 0)
}

#[test]
fn set_then_get_voxel() {
    let mut layer = Layer::new("base");
    layer.set_voxel(Coord::ORIGIN, red());
    assert_eq!(layer.get_voxel(Coord::ORIGIN), Some(red()));
    assert_eq!(layer.len(), 1);
}

#[test]
fn setting_transparent_color_removes_voxel() {
    let mut layer = Layer::new("base");
    layer.set_voxel(Coord::ORIGIN, red());
    layer.set_voxel(Coord::ORIGIN, Color::TRANSPARENT);
    assert!(layer.is_empty());
}

#[test]
fn remove_voxel_reports_presence() {
    let mut layer = Layer::new("base");
    assert!(!layer.remove_voxel(Coord::ORIGIN));
    layer.set_voxel(Coord::ORIGIN, red());
    assert!(layer.remove_voxel(Coord::ORIGIN));
}

#[test]
fn bounding_box_none_when_empty() {
    let layer = Layer::new("base");
    assert!(layer.bounding_box().is_none());
}

#[test]
fn bounding_box_covers_all_voxels() {
    let mut layer = Layer::new("base");
    layer.set_voxel(Coord::new(0, 0, 0), red());
    layer.set_voxel(Coord::new(2, -1, 4), red());
    let bbox = layer.bounding_box().unwrap();
    assert_eq!(bbox.min, Coord::new(0, -1, 0));
    assert_eq!(bbox.max, Coord::new(2, 0, 4));
}

#[test]
fn merge_from_overwrites_on_overlap() {
    let mut a = Layer::new("a");
    a.set_voxel(Coord::ORIGIN, red());
    let mut b = Layer::new("b");
    b.set_voxel(Coord::ORIGIN, Color::opaque(0, 255, 0));
    a.merge_from(&b);
    assert_eq!(a.get_voxel(Coord::ORIGIN), Some(Color::opaque(0, 255, 0)));
}
