// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Method name → parameter schema → [`EngineOp`] translation (C5, part 1).
//!
//! Every function here either returns a fully-owned `EngineOp` or an
//! `InvalidParams` error naming the first offending parameter; nothing here
//! touches the engine guard.

use std::path::PathBuf;

use serde_json::Value;
use voxel_core::ops::{CameraPreset, ShapeKind, VoxelSample};
use voxel_core::{ArtifactFormat, BoundingBox, Color, Coord, EngineOp, LayerId};
use voxel_wire::{Params, RpcError};

fn field<'a>(params: &'a Params, index: usize, name: &str) -> Option<&'a Value> {
    params.get(index, name)
}

fn required<'a>(params: &'a Params, index: usize, name: &str) -> Result<&'a Value, RpcError> {
    field(params, index, name).ok_or_else(|| RpcError::invalid_params(name, "required"))
}

fn as_str(v: &Value, name: &str) -> Result<String, RpcError> {
    v.as_str().map(str::to_string).ok_or_else(|| RpcError::invalid_params(name, "string"))
}

fn as_i32(v: &Value, name: &str) -> Result<i32, RpcError> {
    v.as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| RpcError::invalid_params(name, "i32"))
}

fn as_u32(v: &Value, name: &str) -> Result<u32, RpcError> {
    v.as_u64().and_then(|n| u32::try_from(n).ok()).ok_or_else(|| RpcError::invalid_params(name, "u32"))
}

fn as_u8(v: &Value, name: &str) -> Result<u8, RpcError> {
    v.as_u64().and_then(|n| u8::try_from(n).ok()).ok_or_else(|| RpcError::invalid_params(name, "u8"))
}

fn as_bool(v: &Value, name: &str) -> Result<bool, RpcError> {
    v.as_bool().ok_or_else(|| RpcError::invalid_params(name, "bool"))
}

fn required_str(params: &Params, index: usize, name: &str) -> Result<String, RpcError> {
    as_str(required(params, index, name)?, name)
}

fn required_i32(params: &Params, index: usize, name: &str) -> Result<i32, RpcError> {
    as_i32(required(params, index, name)?, name)
}

fn optional_u32(params: &Params, index: usize, name: &str, default: u32) -> Result<u32, RpcError> {
    match field(params, index, name) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => as_u32(v, name),
    }
}

fn optional_u8(params: &Params, index: usize, name: &str, default: u8) -> Result<u8, RpcError> {
    match field(params, index, name) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => as_u8(v, name),
    }
}

fn required_color(params: &Params, index: usize, name: &str) -> Result<Color, RpcError> {
    let v = required(params, index, name)?;
    let arr = v.as_array().ok_or_else(|| RpcError::invalid_params(name, "[r,g,b,a] u8 array"))?;
    if arr.len() != 4 {
        return Err(RpcError::invalid_params(name, "[r,g,b,a] u8 array"));
    }
    let mut channels = [0u8; 4];
    for (i, item) in arr.iter().enumerate() {
        channels[i] = as_u8(item, name)?;
    }
    Ok(Color::from(channels))
}

fn required_coord(params: &Params, x_idx: usize, y_idx: usize, z_idx: usize) -> Result<Coord, RpcError> {
    Ok(Coord::new(
        required_i32(params, x_idx, "x")?,
        required_i32(params, y_idx, "y")?,
        required_i32(params, z_idx, "z")?,
    ))
}

fn optional_layer_id(params: &Params, index: usize, name: &str) -> Result<Option<LayerId>, RpcError> {
    match field(params, index, name) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => Ok(Some(LayerId::from_string(as_str(v, name)?))),
    }
}

fn required_layer_id(params: &Params, index: usize, name: &str) -> Result<LayerId, RpcError> {
    Ok(LayerId::from_string(required_str(params, index, name)?))
}

fn required_region(params: &Params, index: usize, name: &str) -> Result<BoundingBox, RpcError> {
    let v = required(params, index, name)?;
    let min = v.get("min").ok_or_else(|| RpcError::invalid_params(name, "{min:{x,y,z},max:{x,y,z}}"))?;
    let max = v.get("max").ok_or_else(|| RpcError::invalid_params(name, "{min:{x,y,z},max:{x,y,z}}"))?;
    Ok(BoundingBox { min: coord_object(min, name)?, max: coord_object(max, name)? })
}

fn coord_object(v: &Value, name: &str) -> Result<Coord, RpcError> {
    let x = v.get("x").and_then(Value::as_i64).ok_or_else(|| RpcError::invalid_params(name, "i32"))?;
    let y = v.get("y").and_then(Value::as_i64).ok_or_else(|| RpcError::invalid_params(name, "i32"))?;
    let z = v.get("z").and_then(Value::as_i64).ok_or_else(|| RpcError::invalid_params(name, "i32"))?;
    Ok(Coord::new(x as i32, y as i32, z as i32))
}

fn required_format(params: &Params, index: usize, name: &str) -> Result<ArtifactFormat, RpcError> {
    let s = required_str(params, index, name)?;
    match s.as_str() {
        "native" => Ok(ArtifactFormat::Native),
        "obj" => Ok(ArtifactFormat::Obj),
        "ply" => Ok(ArtifactFormat::Ply),
        "stl" => Ok(ArtifactFormat::Stl),
        "vox" => Ok(ArtifactFormat::Vox),
        "png" => Ok(ArtifactFormat::Png),
        "gltf" => Ok(ArtifactFormat::Gltf),
        _ => Err(RpcError::invalid_params(name, "one of native|obj|ply|stl|vox|png|gltf")),
    }
}

fn camera_preset(params: &Params, index: usize, name: &str) -> Result<CameraPreset, RpcError> {
    match field(params, index, name) {
        None | Some(Value::Null) => Ok(CameraPreset::Iso),
        Some(v) => match as_str(v, name)?.as_str() {
            "front" => Ok(CameraPreset::Front),
            "back" => Ok(CameraPreset::Back),
            "left" => Ok(CameraPreset::Left),
            "right" => Ok(CameraPreset::Right),
            "top" => Ok(CameraPreset::Top),
            "bottom" => Ok(CameraPreset::Bottom),
            "iso" => Ok(CameraPreset::Iso),
            _ => Err(RpcError::invalid_params(name, "one of front|back|left|right|top|bottom|iso")),
        },
    }
}

fn shape_kind(params: &Params, index: usize, name: &str) -> Result<ShapeKind, RpcError> {
    match required_str(params, index, name)?.as_str() {
        "sphere" => Ok(ShapeKind::Sphere),
        "cube" => Ok(ShapeKind::Cube),
        "cylinder" => Ok(ShapeKind::Cylinder),
        _ => Err(RpcError::invalid_params(name, "one of sphere|cube|cylinder")),
    }
}

/// Translates a validated method + params pair into an [`EngineOp`].
///
/// `render_scene`'s output path is allocated by the caller (the artifact
/// manager must run first) and passed in as `render_path`; every other
/// method ignores it.
pub fn translate(method: &str, params: &Params, render_path: Option<PathBuf>) -> Result<EngineOp, RpcError> {
    match method {
        "create_project" => Ok(EngineOp::CreateProject {
            name: required_str(params, 0, "name")?,
            width: optional_u32(params, 1, "width", 64)?,
            height: optional_u32(params, 2, "height", 64)?,
            depth: optional_u32(params, 3, "depth", 64)?,
        }),
        "load_project" => Ok(EngineOp::LoadProject { path: PathBuf::from(required_str(params, 0, "path")?) }),
        "save_project" => Ok(EngineOp::SaveProject { path: PathBuf::from(required_str(params, 0, "path")?) }),

        "add_voxel" => Ok(EngineOp::AddVoxel {
            at: required_coord(params, 0, 1, 2)?,
            color: required_color(params, 3, "color")?,
            layer_id: optional_layer_id(params, 4, "layer_id")?,
        }),
        "remove_voxel" => Ok(EngineOp::RemoveVoxel {
            at: required_coord(params, 0, 1, 2)?,
            layer_id: optional_layer_id(params, 3, "layer_id")?,
        }),
        "get_voxel" => Ok(EngineOp::GetVoxel {
            at: required_coord(params, 0, 1, 2)?,
            layer_id: optional_layer_id(params, 3, "layer_id")?,
        }),
        "add_voxels_batch" => {
            let v = required(params, 0, "voxels")?;
            let items = v.as_array().ok_or_else(|| RpcError::invalid_params("voxels", "array"))?;
            let mut voxels = Vec::with_capacity(items.len());
            for item in items {
                let x = item.get("x").and_then(Value::as_i64).ok_or_else(|| RpcError::invalid_params("voxels[].x", "i32"))?;
                let y = item.get("y").and_then(Value::as_i64).ok_or_else(|| RpcError::invalid_params("voxels[].y", "i32"))?;
                let z = item.get("z").and_then(Value::as_i64).ok_or_else(|| RpcError::invalid_params("voxels[].z", "i32"))?;
                let color = item.get("color").ok_or_else(|| RpcError::invalid_params("voxels[].color", "[r,g,b,a]"))?;
                let arr = color.as_array().ok_or_else(|| RpcError::invalid_params("voxels[].color", "[r,g,b,a]"))?;
                if arr.len() != 4 {
                    return Err(RpcError::invalid_params("voxels[].color", "[r,g,b,a]"));
                }
                let mut channels = [0u8; 4];
                for (i, c) in arr.iter().enumerate() {
                    channels[i] = as_u8(c, "voxels[].color")?;
                }
                voxels.push(VoxelSample { at: Coord::new(x as i32, y as i32, z as i32), color: Color::from(channels) });
            }
            Ok(EngineOp::AddVoxelsBatch { voxels, layer_id: optional_layer_id(params, 1, "layer_id")? })
        }
        "paint_voxels" => Ok(EngineOp::PaintVoxels {
            region: required_region(params, 0, "region")?,
            color: required_color(params, 1, "color")?,
            layer_id: optional_layer_id(params, 2, "layer_id")?,
        }),
        "flood_fill" => Ok(EngineOp::FloodFill {
            at: required_coord(params, 0, 1, 2)?,
            color: required_color(params, 3, "color")?,
            layer_id: optional_layer_id(params, 4, "layer_id")?,
        }),
        "procedural_shape" => Ok(EngineOp::ProceduralShape {
            shape: shape_kind(params, 0, "shape")?,
            region: required_region(params, 1, "region")?,
            color: required_color(params, 2, "color")?,
            layer_id: optional_layer_id(params, 3, "layer_id")?,
        }),

        "create_layer" => Ok(EngineOp::CreateLayer { name: required_str(params, 0, "name")? }),
        "delete_layer" => Ok(EngineOp::DeleteLayer { layer_id: required_layer_id(params, 0, "layer_id")? }),
        "merge_layers" => Ok(EngineOp::MergeLayers {
            dest: required_layer_id(params, 0, "dest")?,
            src: required_layer_id(params, 1, "src")?,
        }),
        "set_layer_visibility" => Ok(EngineOp::SetLayerVisibility {
            layer_id: required_layer_id(params, 0, "layer_id")?,
            visible: as_bool(required(params, 1, "visible")?, "visible")?,
        }),
        "list_layers" => Ok(EngineOp::ListLayers),

        "get_voxels_region" => Ok(EngineOp::GetVoxelsRegion { region: required_region(params, 0, "region")? }),
        "get_layer_voxels" => Ok(EngineOp::GetLayerVoxels { layer_id: required_layer_id(params, 0, "layer_id")? }),
        "get_bounding_box" => Ok(EngineOp::GetBoundingBox),
        "get_color_histogram" => Ok(EngineOp::GetColorHistogram),
        "find_voxels_by_color" => Ok(EngineOp::FindVoxelsByColor { color: required_color(params, 0, "color")? }),
        "get_unique_colors" => Ok(EngineOp::GetUniqueColors),

        "export_model" => Ok(EngineOp::ExportModel {
            format: required_format(params, 0, "format")?,
            path: PathBuf::from(required_str(params, 1, "path")?),
        }),
        "render_scene" => Ok(EngineOp::RenderScene {
            width: optional_u32(params, 0, "width", 256)?,
            height: optional_u32(params, 1, "height", 256)?,
            camera_preset: camera_preset(params, 2, "camera_preset")?,
            quality: optional_u8(params, 3, "quality", 80)?,
            path: render_path.ok_or_else(|| RpcError::internal("render artifact path was not allocated"))?,
        }),
        "execute_script" => Ok(EngineOp::ExecuteScript {
            source: required_str(params, 0, "script")?,
            name: match field(params, 1, "name") {
                None | Some(Value::Null) => None,
                Some(v) => Some(as_str(v, "name")?),
            },
        }),

        "ping" => Ok(EngineOp::Ping),
        "echo" => Ok(EngineOp::Echo { payload: field(params, 0, "payload").cloned().unwrap_or(Value::Null) }),
        "version" => Ok(EngineOp::Version),

        other => Err(RpcError::method_not_found(other)),
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
