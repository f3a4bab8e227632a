// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single serializer that owns the [`Scene`] and mediates every call
//! into [`crate::engine::facade`].
//!
//! All ops run on a blocking-pool task while holding a synchronous
//! [`parking_lot::Mutex`] for their duration only; a panic inside an op is
//! caught at this boundary and converted to [`EngineError::Internal`], and
//! the guard transitions to `Degraded` rather than risk the scene being
//! left half-mutated by a partially-applied create-while-aliased op.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use voxel_core::{EngineError, EngineOp, EngineOpOutcome, EngineOpResult, HealthSnapshot, Scene};

use crate::engine::facade;

pub struct EngineGuard {
    scene: Arc<Mutex<Scene>>,
    degraded: Arc<AtomicBool>,
}

impl EngineGuard {
    pub fn new() -> Self {
        Self { scene: Arc::new(Mutex::new(Scene::new("untitled"))), degraded: Arc::new(AtomicBool::new(false)) }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    /// Runs `op` against the scene, blocking the calling worker until it
    /// completes. `deadline` is checked before acquisition; an already-past
    /// deadline short-circuits without touching the scene. `cancel` is only
    /// consulted by ops that can check it cooperatively mid-run (currently
    /// `ExecuteScript`); every other op runs to completion regardless, since
    /// the guard must never forcibly unwind a native op mid-call.
    pub async fn submit(&self, op: EngineOp, deadline: Option<Instant>, cancel: Arc<AtomicBool>) -> EngineOpOutcome {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return Err(EngineError::DeadlineExceeded);
            }
        }

        if self.degraded.load(Ordering::Acquire) && !matches!(op, EngineOp::CreateProject { .. }) {
            return Err(EngineError::Internal(
                "engine is degraded; call create_project to recover".into(),
            ));
        }

        let scene = Arc::clone(&self.scene);
        let degraded = Arc::clone(&self.degraded);
        let join = tokio::task::spawn_blocking(move || {
            std::panic::catch_unwind(AssertUnwindSafe(|| {
                let mut guard = scene.lock();
                run_op(&mut guard, op, &cancel)
            }))
        })
        .await;

        match join {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_panic)) => {
                degraded.store(true, Ordering::Release);
                Err(EngineError::Internal("engine operation panicked".into()))
            }
            Err(_join_error) => Err(EngineError::Internal("engine worker task was lost".into())),
        }
    }
}

impl Default for EngineGuard {
    fn default() -> Self {
        Self::new()
    }
}

fn run_op(scene: &mut Scene, op: EngineOp, cancel: &AtomicBool) -> EngineOpOutcome {
    use voxel_core::ops::ShapeKind;

    match op {
        EngineOp::CreateProject { name, width, height, depth } => {
            *scene = Scene::new(name);
            Ok(EngineOpResult::ProjectCreated { project_id: scene.project_id, width, height, depth })
        }
        EngineOp::LoadProject { path } => {
            let loaded = facade::load_project(&path)?;
            let project_id = loaded.project_id;
            *scene = loaded;
            Ok(EngineOpResult::ProjectLoaded { project_id })
        }
        EngineOp::SaveProject { path } => {
            let bytes = facade::save_project(scene, &path)?;
            Ok(EngineOpResult::ProjectSaved { path, bytes })
        }
        EngineOp::GetStatus => Ok(EngineOpResult::Status(HealthSnapshot::default())),

        EngineOp::AddVoxel { at, color, layer_id } => {
            facade::add_voxel(scene, at, color, layer_id)?;
            Ok(EngineOpResult::VoxelSet)
        }
        EngineOp::RemoveVoxel { at, layer_id } => {
            let existed = facade::remove_voxel(scene, at, layer_id)?;
            Ok(EngineOpResult::VoxelRemoved { existed })
        }
        EngineOp::GetVoxel { at, layer_id } => {
            let color = facade::get_voxel(scene, at, layer_id)?;
            Ok(EngineOpResult::Voxel { exists: color.is_some(), color })
        }
        EngineOp::AddVoxelsBatch { voxels, layer_id } => {
            let count = facade::add_voxels_batch(scene, &voxels, layer_id)?;
            Ok(EngineOpResult::VoxelsBatchApplied { count })
        }
        EngineOp::PaintVoxels { region, color, layer_id } => {
            facade::paint_voxels(scene, region, color, layer_id)?;
            Ok(EngineOpResult::VoxelSet)
        }
        EngineOp::FloodFill { at, color, layer_id } => {
            facade::flood_fill(scene, at, color, layer_id)?;
            Ok(EngineOpResult::VoxelSet)
        }
        EngineOp::ProceduralShape { shape, region, color, layer_id } => {
            match shape {
                ShapeKind::Sphere => {
                    facade::procedural_sphere(scene, region, color, layer_id)?;
                }
                ShapeKind::Cube | ShapeKind::Cylinder => {
                    facade::paint_voxels(scene, region, color, layer_id)?;
                }
            }
            Ok(EngineOpResult::VoxelSet)
        }

        EngineOp::CreateLayer { name } => {
            let layer_id = facade::create_layer(scene, &name);
            Ok(EngineOpResult::LayerCreated { layer_id })
        }
        EngineOp::DeleteLayer { layer_id } => {
            facade::delete_layer(scene, layer_id)?;
            Ok(EngineOpResult::LayerDeleted)
        }
        EngineOp::MergeLayers { dest, src } => {
            facade::merge_layers(scene, dest, src)?;
            Ok(EngineOpResult::LayersMerged)
        }
        EngineOp::SetLayerVisibility { layer_id, visible } => {
            facade::set_layer_visibility(scene, layer_id, visible)?;
            Ok(EngineOpResult::LayerVisibilitySet)
        }
        EngineOp::ListLayers => Ok(EngineOpResult::Layers(facade::list_layers(scene))),

        EngineOp::GetVoxelsRegion { region } => {
            Ok(EngineOpResult::VoxelsRegion(facade::get_voxels_region(scene, region)))
        }
        EngineOp::GetLayerVoxels { layer_id } => {
            Ok(EngineOpResult::VoxelsRegion(facade::get_layer_voxels(scene, layer_id)?))
        }
        EngineOp::GetBoundingBox => Ok(EngineOpResult::BoundingBox(facade::get_bounding_box(scene))),
        EngineOp::GetColorHistogram => {
            Ok(EngineOpResult::ColorHistogram(facade::get_color_histogram(scene)))
        }
        EngineOp::FindVoxelsByColor { color } => {
            Ok(EngineOpResult::VoxelsByColor(facade::find_voxels_by_color(scene, color)))
        }
        EngineOp::GetUniqueColors => Ok(EngineOpResult::UniqueColors(facade::get_unique_colors(scene))),

        EngineOp::ExportModel { format, path } => {
            let bytes = facade::export_model(scene, format, &path)?;
            Ok(EngineOpResult::ModelExported { path, bytes })
        }
        EngineOp::RenderScene { width, height, path, .. } => {
            let size = facade::render_scene(scene, width, height, &path)?;
            Ok(EngineOpResult::Rendered { path, size, format: voxel_core::ArtifactFormat::Png })
        }
        EngineOp::ExecuteScript { source, name: _ } => crate::engine::script::execute(scene, &source, cancel),

        EngineOp::Ping => Ok(EngineOpResult::Pong),
        EngineOp::Echo { payload } => Ok(EngineOpResult::Echoed(payload)),
        EngineOp::Version => Ok(EngineOpResult::Version(crate::env::PROTOCOL_VERSION.to_string())),
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
