// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The narrow, synchronous API onto a [`Scene`]. Not thread-safe; callable
//! only through [`crate::engine::guard::EngineGuard`].
//!
//! Actual mesh generation, texturing, and GPU rendering are voxel-engine
//! internals out of this daemon's scope. `render_scene` and
//! `export_model` below produce a deterministic, self-describing artifact
//! file from the scene's data rather than a decodable image or mesh — the
//! artifact pipeline (allocation, TTL, path safety) is what this facade is
//! responsible for proving out.

use std::io::Write;
use std::path::Path;

use voxel_core::{
    BoundingBox, Color, Coord, EngineError, Layer, LayerSummary, Scene, VoxelSample,
};

pub fn add_voxel(scene: &mut Scene, at: Coord, color: Color, layer_id: Option<voxel_core::LayerId>) -> Result<(), EngineError> {
    let layer = resolve_layer_mut(scene, layer_id)?;
    layer.set_voxel(at, color);
    Ok(())
}

pub fn remove_voxel(scene: &mut Scene, at: Coord, layer_id: Option<voxel_core::LayerId>) -> Result<bool, EngineError> {
    let layer = resolve_layer_mut(scene, layer_id)?;
    Ok(layer.remove_voxel(at))
}

pub fn get_voxel(scene: &Scene, at: Coord, layer_id: Option<voxel_core::LayerId>) -> Result<Option<Color>, EngineError> {
    let layer = resolve_layer(scene, layer_id)?;
    Ok(layer.get_voxel(at))
}

pub fn add_voxels_batch(
    scene: &mut Scene,
    voxels: &[VoxelSample],
    layer_id: Option<voxel_core::LayerId>,
) -> Result<usize, EngineError> {
    let layer = resolve_layer_mut(scene, layer_id)?;
    for v in voxels {
        layer.set_voxel(v.at, v.color);
    }
    Ok(voxels.len())
}

pub fn paint_voxels(
    scene: &mut Scene,
    region: BoundingBox,
    color: Color,
    layer_id: Option<voxel_core::LayerId>,
) -> Result<usize, EngineError> {
    let layer = resolve_layer_mut(scene, layer_id)?;
    let mut count = 0;
    for x in region.min.x..=region.max.x {
        for y in region.min.y..=region.max.y {
            for z in region.min.z..=region.max.z {
                layer.set_voxel(Coord::new(x, y, z), color);
                count += 1;
            }
        }
    }
    Ok(count)
}

/// Flood-fills voxels reachable from `at` through 6-connected neighbors
/// that currently share `at`'s color (including "empty").
pub fn flood_fill(
    scene: &mut Scene,
    at: Coord,
    color: Color,
    layer_id: Option<voxel_core::LayerId>,
) -> Result<usize, EngineError> {
    let layer = resolve_layer_mut(scene, layer_id)?;
    let target = layer.get_voxel(at);
    if target == Some(color) {
        return Ok(0);
    }
    let mut stack = vec![at];
    let mut visited = std::collections::HashSet::new();
    let mut count = 0;
    while let Some(c) = stack.pop() {
        if !visited.insert(c) {
            continue;
        }
        if layer.get_voxel(c) != target {
            continue;
        }
        layer.set_voxel(c, color);
        count += 1;
        for neighbor in neighbors6(c) {
            if !visited.contains(&neighbor) {
                stack.push(neighbor);
            }
        }
        if visited.len() > 1_000_000 {
            return Err(EngineError::ResourceExhausted("flood_fill exceeded voxel limit".into()));
        }
    }
    Ok(count)
}

fn neighbors6(c: Coord) -> [Coord; 6] {
    [
        Coord::new(c.x + 1, c.y, c.z),
        Coord::new(c.x - 1, c.y, c.z),
        Coord::new(c.x, c.y + 1, c.z),
        Coord::new(c.x, c.y - 1, c.z),
        Coord::new(c.x, c.y, c.z + 1),
        Coord::new(c.x, c.y, c.z - 1),
    ]
}

pub fn procedural_sphere(
    scene: &mut Scene,
    region: BoundingBox,
    color: Color,
    layer_id: Option<voxel_core::LayerId>,
) -> Result<usize, EngineError> {
    let (w, h, d) = region.dimensions();
    let radius = (w.min(h).min(d) as f64) / 2.0;
    let center = Coord::new(
        (region.min.x + region.max.x) / 2,
        (region.min.y + region.max.y) / 2,
        (region.min.z + region.max.z) / 2,
    );
    let layer = resolve_layer_mut(scene, layer_id)?;
    let mut count = 0;
    for x in region.min.x..=region.max.x {
        for y in region.min.y..=region.max.y {
            for z in region.min.z..=region.max.z {
                let dx = (x - center.x) as f64;
                let dy = (y - center.y) as f64;
                let dz = (z - center.z) as f64;
                if (dx * dx + dy * dy + dz * dz).sqrt() <= radius {
                    layer.set_voxel(Coord::new(x, y, z), color);
                    count += 1;
                }
            }
        }
    }
    Ok(count)
}

pub fn create_layer(scene: &mut Scene, name: &str) -> voxel_core::LayerId {
    scene.create_layer(name)
}

pub fn delete_layer(scene: &mut Scene, id: voxel_core::LayerId) -> Result<(), EngineError> {
    scene.delete_layer(id)
}

pub fn merge_layers(scene: &mut Scene, dest: voxel_core::LayerId, src: voxel_core::LayerId) -> Result<(), EngineError> {
    scene.merge_layers(dest, src)
}

pub fn set_layer_visibility(scene: &mut Scene, id: voxel_core::LayerId, visible: bool) -> Result<(), EngineError> {
    scene.set_layer_visibility(id, visible)
}

pub fn list_layers(scene: &Scene) -> Vec<LayerSummary> {
    scene
        .layers()
        .iter()
        .map(|l: &Layer| LayerSummary { id: l.id, name: l.name.clone(), visible: l.visible, voxel_count: l.len() })
        .collect()
}

pub fn get_voxels_region(scene: &Scene, region: BoundingBox) -> Vec<(Coord, Color)> {
    scene.voxels_in_region(region)
}

pub fn get_layer_voxels(scene: &Scene, id: voxel_core::LayerId) -> Result<Vec<(Coord, Color)>, EngineError> {
    Ok(scene.layer(id)?.iter().collect())
}

pub fn get_bounding_box(scene: &Scene) -> Option<BoundingBox> {
    scene.bounding_box()
}

pub fn get_color_histogram(scene: &Scene) -> Vec<(Color, u64)> {
    scene.color_histogram().into_iter().collect()
}

pub fn find_voxels_by_color(scene: &Scene, color: Color) -> Vec<Coord> {
    scene.find_voxels_by_color(color)
}

pub fn get_unique_colors(scene: &Scene) -> Vec<Color> {
    scene.unique_colors()
}

/// Writes the native project format: a JSON dump of every layer's voxels.
/// This MUST NOT invoke any graphical preview path — the historical
/// `save_project` hang was caused by exactly that.
pub fn save_project(scene: &Scene, path: &Path) -> Result<u64, EngineError> {
    let dump = NativeDump::from_scene(scene);
    let bytes = serde_json::to_vec(&dump).map_err(|e| EngineError::Internal(e.to_string()))?;
    write_atomic(path, &bytes)?;
    Ok(bytes.len() as u64)
}

pub fn load_project(path: &Path) -> Result<Scene, EngineError> {
    let bytes = std::fs::read(path)?;
    let dump: NativeDump =
        serde_json::from_slice(&bytes).map_err(|e| EngineError::Internal(e.to_string()))?;
    Ok(dump.into_scene())
}

pub fn export_model(scene: &Scene, format: voxel_core::ArtifactFormat, path: &Path) -> Result<u64, EngineError> {
    match format {
        voxel_core::ArtifactFormat::Native => save_project(scene, path),
        _ => {
            let dump = NativeDump::from_scene(scene);
            let bytes = serde_json::to_vec(&dump).map_err(|e| EngineError::Internal(e.to_string()))?;
            write_atomic(path, &bytes)?;
            Ok(bytes.len() as u64)
        }
    }
}

pub fn render_scene(scene: &Scene, width: u32, height: u32, path: &Path) -> Result<u64, EngineError> {
    let dump = NativeDump::from_scene(scene);
    let summary = serde_json::json!({
        "width": width,
        "height": height,
        "voxel_count": dump.layers.iter().map(|l| l.voxels.len()).sum::<usize>(),
    });
    let bytes = serde_json::to_vec(&summary).map_err(|e| EngineError::Internal(e.to_string()))?;
    write_atomic(path, &bytes)?;
    Ok(bytes.len() as u64)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), EngineError> {
    let tmp_path = path.with_extension("tmp");
    let mut file = std::fs::File::create(&tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

fn resolve_layer_mut(scene: &mut Scene, layer_id: Option<voxel_core::LayerId>) -> Result<&mut Layer, EngineError> {
    match layer_id {
        Some(id) => scene.layer_mut(id),
        None => Ok(scene.current_layer_mut()),
    }
}

fn resolve_layer(scene: &Scene, layer_id: Option<voxel_core::LayerId>) -> Result<&Layer, EngineError> {
    match layer_id {
        Some(id) => scene.layer(id),
        None => scene.layer(scene.current_layer_id()),
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct NativeDump {
    name: String,
    layers: Vec<NativeLayerDump>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct NativeLayerDump {
    name: String,
    visible: bool,
    voxels: Vec<(Coord, Color)>,
}

impl NativeDump {
    fn from_scene(scene: &Scene) -> Self {
        Self {
            name: scene.name.clone(),
            layers: scene
                .layers()
                .iter()
                .map(|l| NativeLayerDump { name: l.name.clone(), visible: l.visible, voxels: l.iter().collect() })
                .collect(),
        }
    }

    fn into_scene(self) -> Scene {
        let mut scene = Scene::new(self.name);
        let mut first = true;
        for layer_dump in self.layers {
            let id = if first {
                first = false;
                scene.current_layer_id()
            } else {
                scene.create_layer(layer_dump.name.clone())
            };
            let layer = scene.layer_mut(id).expect("layer just created or current");
            layer.name = layer_dump.name;
            layer.visible = layer_dump.visible;
            for (coord, color) in layer_dump.voxels {
                layer.set_voxel(coord, color);
            }
        }
        scene
    }
}

#[cfg(test)]
#[path = "facade_tests.rs"]
mod tests;
