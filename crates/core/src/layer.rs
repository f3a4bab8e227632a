// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single layer of voxels within a scene.

use std::collections::HashMap;

use crate::color::Color;
use crate::coord::{BoundingBox, Coord};

crate::define_id! {
    /// Identifies a layer within a scene.
    pub struct LayerId("lyr-");
}

/// A named, independently-visible sparse grid of voxels.
#[derive(Debug, Clone)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    voxels: HashMap<Coord, Color>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: LayerId::new(), name: name.into(), visible: true, voxels: HashMap::new() }
    }

    pub fn set_voxel(&mut self, at: Coord, color: Color) {
        if color.is_transparent() {
            self.voxels.remove(&at);
        } else {
            self.voxels.insert(at, color);
        }
    }

    pub fn remove_voxel(&mut self, at: Coord) -> bool {
        self.voxels.remove(&at).is_some()
    }

    pub fn get_voxel(&self, at: Coord) -> Option<Color> {
        self.voxels.get(&at).copied()
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, Color)> + '_ {
        self.voxels.iter().map(|(&c, &col)| (c, col))
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut iter = self.voxels.keys();
        let first = *iter.next()?;
        let mut bbox = BoundingBox::point(first);
        for &c in iter {
            bbox.expand(c);
        }
        Some(bbox)
    }

    /// Merges `other`'s voxels into this layer, `other` winning on overlap.
    pub fn merge_from(&mut self, other: &Layer) {
        for (c, col) in other.iter() {
            self.voxels.insert(c, col);
        }
    }
}

#[cfg(test)]
#[path = "layer_tests.rs"]
mod tests;
