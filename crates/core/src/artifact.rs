// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Render/export artifact records.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifies a managed artifact file.
    pub struct ArtifactId("art-");
}

/// On-disk format of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactFormat {
    Png,
    Obj,
    Ply,
    Stl,
    Vox,
    Gltf,
    Native,
}

impl ArtifactFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactFormat::Png => "png",
            ArtifactFormat::Obj => "obj",
            ArtifactFormat::Ply => "ply",
            ArtifactFormat::Stl => "stl",
            ArtifactFormat::Vox => "vox",
            ArtifactFormat::Gltf => "gltf",
            ArtifactFormat::Native => "gox",
        }
    }

    /// The inverse of [`ArtifactFormat::extension`], used to recognize
    /// artifact files left over from a prior process on disk.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Some(match ext {
            "png" => ArtifactFormat::Png,
            "obj" => ArtifactFormat::Obj,
            "ply" => ArtifactFormat::Ply,
            "stl" => ArtifactFormat::Stl,
            "vox" => ArtifactFormat::Vox,
            "gltf" => ArtifactFormat::Gltf,
            "gox" => ArtifactFormat::Native,
            _ => return None,
        })
    }
}

/// A file produced by `render_scene` or `export_model` and tracked by the
/// render artifact manager until it expires or is evicted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub id: ArtifactId,
    pub path: std::path::PathBuf,
    pub size: u64,
    pub format: ArtifactFormat,
    pub created_at_epoch_ms: u64,
    pub expires_at_epoch_ms: u64,
    pub checksum: Option<String>,
}

impl Artifact {
    pub fn is_expired(&self, now_epoch_ms: u64) -> bool {
        now_epoch_ms >= self.expires_at_epoch_ms
    }
}

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;
