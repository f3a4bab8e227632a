// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The in-memory voxel world: a named project made of one or more layers.
//!
//! A [`Scene`] is reachable only through the engine guard (`voxel-daemon`);
//! this module defines its shape and invariants but performs no locking of
//! its own.

use std::collections::HashMap;

use crate::color::Color;
use crate::coord::{BoundingBox, Coord};
use crate::error::EngineError;
use crate::layer::{Layer, LayerId};

crate::define_id! {
    /// Identifies a project (one per loaded/created scene).
    pub struct ProjectId("prj-");
}

/// The active voxel project: an ordered list of layers and a current
/// selection used by operations that default to "the active layer".
#[derive(Debug)]
pub struct Scene {
    pub project_id: ProjectId,
    pub name: String,
    layers: Vec<Layer>,
    current: usize,
}

impl Scene {
    /// Creates a fresh scene with a single default layer named "Layer 1".
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            project_id: ProjectId::new(),
            name: name.into(),
            layers: vec![Layer::new("Layer 1")],
            current: 0,
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn current_layer_id(&self) -> LayerId {
        self.layers[self.current].id
    }

    fn index_of(&self, id: LayerId) -> Result<usize, EngineError> {
        self.layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| EngineError::LayerNotFound(id.to_string()))
    }

    pub fn layer(&self, id: LayerId) -> Result<&Layer, EngineError> {
        self.index_of(id).map(|i| &self.layers[i])
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Result<&mut Layer, EngineError> {
        let i = self.index_of(id)?;
        Ok(&mut self.layers[i])
    }

    pub fn current_layer_mut(&mut self) -> &mut Layer {
        &mut self.layers[self.current]
    }

    pub fn create_layer(&mut self, name: impl Into<String>) -> LayerId {
        let layer = Layer::new(name);
        let id = layer.id;
        self.layers.push(layer);
        self.current = self.layers.len() - 1;
        id
    }

    pub fn delete_layer(&mut self, id: LayerId) -> Result<(), EngineError> {
        if self.layers.len() == 1 {
            return Err(EngineError::OperationFailed("cannot delete the only layer".into()));
        }
        let i = self.index_of(id)?;
        self.layers.remove(i);
        if self.current >= self.layers.len() {
            self.current = self.layers.len() - 1;
        }
        Ok(())
    }

    /// Merges `src` into `dest` and removes `src`.
    pub fn merge_layers(&mut self, dest: LayerId, src: LayerId) -> Result<(), EngineError> {
        if dest == src {
            return Err(EngineError::OperationFailed("cannot merge a layer into itself".into()));
        }
        let src_idx = self.index_of(src)?;
        let src_layer = self.layers[src_idx].clone();
        self.layer_mut(dest)?.merge_from(&src_layer);
        self.delete_layer(src)
    }

    pub fn set_layer_visibility(&mut self, id: LayerId, visible: bool) -> Result<(), EngineError> {
        self.layer_mut(id)?.visible = visible;
        Ok(())
    }

    /// The union bounding box of all visible layers, if any layer has voxels.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut acc: Option<BoundingBox> = None;
        for layer in self.layers.iter().filter(|l| l.visible) {
            if let Some(bbox) = layer.bounding_box() {
                match &mut acc {
                    Some(a) => {
                        a.expand(bbox.min);
                        a.expand(bbox.max);
                    }
                    None => acc = Some(bbox),
                }
            }
        }
        acc
    }

    pub fn unique_colors(&self) -> Vec<Color> {
        let mut set = std::collections::HashSet::new();
        for layer in &self.layers {
            for (_, color) in layer.iter() {
                set.insert(color);
            }
        }
        set.into_iter().collect()
    }

    pub fn color_histogram(&self) -> HashMap<Color, u64> {
        let mut hist = HashMap::new();
        for layer in &self.layers {
            for (_, color) in layer.iter() {
                *hist.entry(color).or_insert(0u64) += 1;
            }
        }
        hist
    }

    pub fn find_voxels_by_color(&self, color: Color) -> Vec<Coord> {
        self.layers
            .iter()
            .flat_map(|l| l.iter())
            .filter(|&(_, c)| c == color)
            .map(|(coord, _)| coord)
            .collect()
    }

    pub fn voxels_in_region(&self, region: BoundingBox) -> Vec<(Coord, Color)> {
        self.layers
            .iter()
            .filter(|l| l.visible)
            .flat_map(|l| l.iter())
            .filter(|&(c, _)| region.contains(c))
            .collect()
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
