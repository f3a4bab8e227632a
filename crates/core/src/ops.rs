// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The catalog of operations the engine guard can run against a [`crate::scene::Scene`].
//!
//! Each [`EngineOp`] variant carries already-validated, independently-owned
//! parameters (no borrows into a request's wire representation survive past
//! the method registry's dispatch step). Each produces a matching
//! [`EngineOpResult`] variant or an [`EngineError`].

use std::path::PathBuf;

use crate::artifact::ArtifactFormat;
use crate::color::Color;
use crate::coord::{BoundingBox, Coord};
use crate::error::EngineError;
use crate::layer::LayerId;
use crate::scene::ProjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPreset {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
    Iso,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderReturnMode {
    InlinePath,
    ManagedFile,
}

#[derive(Debug, Clone)]
pub struct VoxelSample {
    pub at: Coord,
    pub color: Color,
}

/// A single requested operation and its fully-owned parameters.
#[derive(Debug, Clone)]
pub enum EngineOp {
    CreateProject { name: String, width: u32, height: u32, depth: u32 },
    LoadProject { path: PathBuf },
    SaveProject { path: PathBuf },
    GetStatus,

    AddVoxel { at: Coord, color: Color, layer_id: Option<LayerId> },
    RemoveVoxel { at: Coord, layer_id: Option<LayerId> },
    GetVoxel { at: Coord, layer_id: Option<LayerId> },
    AddVoxelsBatch { voxels: Vec<VoxelSample>, layer_id: Option<LayerId> },
    PaintVoxels { region: BoundingBox, color: Color, layer_id: Option<LayerId> },
    FloodFill { at: Coord, color: Color, layer_id: Option<LayerId> },
    ProceduralShape { shape: ShapeKind, region: BoundingBox, color: Color, layer_id: Option<LayerId> },

    CreateLayer { name: String },
    DeleteLayer { layer_id: LayerId },
    MergeLayers { dest: LayerId, src: LayerId },
    SetLayerVisibility { layer_id: LayerId, visible: bool },
    ListLayers,

    GetVoxelsRegion { region: BoundingBox },
    GetLayerVoxels { layer_id: LayerId },
    GetBoundingBox,
    GetColorHistogram,
    FindVoxelsByColor { color: Color },
    GetUniqueColors,

    ExportModel { format: ArtifactFormat, path: PathBuf },
    /// `path` is pre-allocated by the render artifact manager; both
    /// `RenderReturnMode` values write here and return the same record.
    RenderScene { width: u32, height: u32, camera_preset: CameraPreset, quality: u8, path: PathBuf },
    ExecuteScript { source: String, name: Option<String> },

    Ping,
    Echo { payload: serde_json::Value },
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Sphere,
    Cube,
    Cylinder,
}

/// The successful outcome of an [`EngineOp`].
#[derive(Debug, Clone)]
pub enum EngineOpResult {
    ProjectCreated { project_id: ProjectId, width: u32, height: u32, depth: u32 },
    ProjectLoaded { project_id: ProjectId },
    ProjectSaved { path: PathBuf, bytes: u64 },
    Status(crate::health::HealthSnapshot),

    VoxelSet,
    VoxelRemoved { existed: bool },
    Voxel { exists: bool, color: Option<Color> },
    VoxelsBatchApplied { count: usize },

    LayerCreated { layer_id: LayerId },
    LayerDeleted,
    LayersMerged,
    LayerVisibilitySet,
    Layers(Vec<LayerSummary>),

    VoxelsRegion(Vec<(Coord, Color)>),
    BoundingBox(Option<BoundingBox>),
    ColorHistogram(Vec<(Color, u64)>),
    VoxelsByColor(Vec<Coord>),
    UniqueColors(Vec<Color>),

    ModelExported { path: PathBuf, bytes: u64 },
    Rendered { path: PathBuf, size: u64, format: ArtifactFormat },
    ScriptExecuted { success: bool, message: String },

    Pong,
    Echoed(serde_json::Value),
    Version(String),
}

#[derive(Debug, Clone)]
pub struct LayerSummary {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub voxel_count: usize,
}

impl EngineOp {
    /// Whether this op mutates the scene (used by the method registry to
    /// decide logging verbosity and by tests asserting ordering).
    pub fn mutates(&self) -> bool {
        !matches!(
            self,
            EngineOp::GetStatus
                | EngineOp::GetVoxel { .. }
                | EngineOp::ListLayers
                | EngineOp::GetVoxelsRegion { .. }
                | EngineOp::GetLayerVoxels { .. }
                | EngineOp::GetBoundingBox
                | EngineOp::GetColorHistogram
                | EngineOp::FindVoxelsByColor { .. }
                | EngineOp::GetUniqueColors
                | EngineOp::RenderScene { .. }
                | EngineOp::Ping
                | EngineOp::Echo { .. }
                | EngineOp::Version
        )
    }
}

pub type EngineOpOutcome = Result<EngineOpResult, EngineError>;

#[cfg(test)]
#[path = "ops_tests.rs"]
mod tests;
