// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use proptest::prelude::*;

use super::*;

#[test]
fn add_sums_components() {
    assert_eq!(Coord::new(1, 2, 3) + Coord::new(4, 5, 6), Coord::new(5, 7, 9));
}

#[test]
fn bounding_box_expands_to_contain_points() {
    let mut bbox = BoundingBox::point(Coord::new(0, 0, 0));
    bbox.expand(Coord::new(3, -2, 5));
    assert_eq!(bbox.min, Coord::new(0, -2, 0));
    assert_eq!(bbox.max, Coord::new(3, 0, 5));
    assert!(bbox.contains(Coord::new(1, -1, 2)));
    assert!(!bbox.contains(Coord::new(4, 0, 0)));
}

#[test]
fn bounding_box_dimensions_are_inclusive() {
    let bbox = BoundingBox { min: Coord::new(0, 0, 0), max: Coord::new(1, 1, 1) };
    assert_eq!(bbox.dimensions(), (2, 2, 2));
}

fn arb_coord() -> impl Strategy<Value = Coord> {
    (-1000i32..1000, -1000i32..1000, -1000i32..1000).prop_map(|(x, y, z)| Coord::new(x, y, z))
}

proptest! {
    #[test]
    fn expand_always_contains_the_expanded_point(start in arb_coord(), point in arb_coord()) {
        let mut bbox = BoundingBox::point(start);
        bbox.expand(point);
        prop_assert!(bbox.contains(point));
        prop_assert!(bbox.contains(start));
    }

    #[test]
    fn dimensions_are_never_zero(a in arb_coord(), b in arb_coord()) {
        let mut bbox = BoundingBox::point(a);
        bbox.expand(b);
        let (w, h, d) = bbox.dimensions();
        prop_assert!(w >= 1 && h >= 1 && d >= 1);
    }
}
