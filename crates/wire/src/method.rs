// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The closed set of recognized method names and the `goxel.` alias.

/// Every method name the registry accepts, unprefixed. The method registry
/// in `voxel-daemon` maps each of these to a handler; this list exists here
/// so the wire layer can validate and canonicalize a method name before it
/// ever reaches dispatch.
pub const METHODS: &[&str] = &[
    "create_project",
    "load_project",
    "save_project",
    "status",
    "add_voxel",
    "remove_voxel",
    "get_voxel",
    "add_voxels_batch",
    "paint_voxels",
    "flood_fill",
    "procedural_shape",
    "create_layer",
    "delete_layer",
    "merge_layers",
    "set_layer_visibility",
    "list_layers",
    "get_voxels_region",
    "get_layer_voxels",
    "get_bounding_box",
    "get_color_histogram",
    "find_voxels_by_color",
    "get_unique_colors",
    "export_model",
    "render_scene",
    "execute_script",
    "ping",
    "echo",
    "version",
    "list_methods",
];

/// Legacy compatibility prefix accepted as a synonym for the unprefixed
/// method name.
pub const LEGACY_PREFIX: &str = "goxel.";

/// Strips a leading `goxel.` prefix, if present, leaving all other method
/// names untouched. Does not validate that the result names a known
/// method — that's the registry's job.
pub fn canonicalize(method: &str) -> &str {
    method.strip_prefix(LEGACY_PREFIX).unwrap_or(method)
}

pub fn is_known_method(method: &str) -> bool {
    METHODS.contains(&canonicalize(method))
}

#[cfg(test)]
#[path = "method_tests.rs"]
mod tests;
