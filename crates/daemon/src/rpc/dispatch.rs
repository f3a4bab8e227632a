// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The method dispatcher (C5, part 2): resolves a method name, translates
//! params into an [`voxel_core::EngineOp`], runs it through the engine
//! guard, and shapes the result back into wire JSON.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use voxel_core::{ArtifactFormat, Clock, EngineOpResult, HealthSnapshot};
use voxel_wire::{self as wire, Id, Params, RawRequest, RawResponse, RpcError};

use crate::artifacts::ArtifactManager;
use crate::engine::EngineGuard;
use crate::rpc::registry;

/// Supplies the live health snapshot for the `status` method without
/// creating a dependency from `rpc` onto `supervisor`.
pub trait StatusProvider: Send + Sync {
    fn snapshot(&self) -> HealthSnapshot;
}

pub struct Dispatcher<C: Clock> {
    pub engine: Arc<EngineGuard>,
    pub artifacts: Arc<ArtifactManager<C>>,
    pub status: Arc<dyn StatusProvider>,
}

impl<C: Clock> Dispatcher<C> {
    pub fn new(engine: Arc<EngineGuard>, artifacts: Arc<ArtifactManager<C>>, status: Arc<dyn StatusProvider>) -> Self {
        Self { engine, artifacts, status }
    }

    /// Handles one already-framed request. Returns `None` for notifications:
    /// no bytes are ever written as a direct result of a notification, even
    /// on failure. `cancel` is the originating job's cooperative-cancellation
    /// flag; it is only consulted by ops that can check it mid-run (scripts).
    pub async fn dispatch(
        &self,
        raw: RawRequest,
        deadline: Option<Instant>,
        session_id: &str,
        cancel: &Arc<AtomicBool>,
    ) -> Option<RawResponse> {
        let is_notification = raw.is_notification();
        let id = raw.id.clone().unwrap_or(Id::Null);
        let method = wire::canonicalize(&raw.method);

        if !wire::is_known_method(method) {
            return respond(is_notification, id, Err(RpcError::method_not_found(method)));
        }

        let result = self.run(method, &raw.params, deadline, session_id, cancel).await;
        respond(is_notification, id, result)
    }

    async fn run(
        &self,
        method: &str,
        params: &Params,
        deadline: Option<Instant>,
        session_id: &str,
        cancel: &Arc<AtomicBool>,
    ) -> Result<Value, RpcError> {
        match method {
            "status" => return Ok(health_snapshot_json(&self.status.snapshot())),
            "list_methods" => return Ok(json!({ "methods": wire::METHODS })),
            _ => {}
        }

        if method == "render_scene" {
            return self.run_render_scene(params, deadline, session_id).await;
        }

        let op = registry::translate(method, params, None)?;
        let outcome = self.engine.submit(op, deadline, Arc::clone(cancel)).await.map_err(RpcError::from)?;
        Ok(shape_result(outcome))
    }

    async fn run_render_scene(
        &self,
        params: &Params,
        deadline: Option<Instant>,
        session_id: &str,
    ) -> Result<Value, RpcError> {
        let path = self.artifacts.allocate(session_id, ArtifactFormat::Png);
        let op = registry::translate("render_scene", params, Some(path.clone()))?;
        let outcome =
            self.engine.submit(op, deadline, Arc::new(AtomicBool::new(false))).await.map_err(RpcError::from)?;
        let EngineOpResult::Rendered { path, size, format } = outcome else {
            return Err(RpcError::internal("render_scene produced an unexpected result"));
        };
        let artifact_id = self
            .artifacts
            .register(path, size, format)
            .map_err(|e| RpcError::internal(e.to_string()))?;
        let info = self.artifacts.get_info(artifact_id).expect("just registered");
        self.artifacts.unpin(artifact_id);
        Ok(json!({
            "file": {
                "path": info.path,
                "size": info.size,
                "format": info.format,
                "expires_at": info.expires_at_epoch_ms,
                "checksum": info.checksum,
            }
        }))
    }
}

fn respond(is_notification: bool, id: Id, result: Result<Value, RpcError>) -> Option<RawResponse> {
    if is_notification {
        if let Err(e) = &result {
            tracing::warn!(error = %e.message, "notification failed, not reporting to client");
        }
        return None;
    }
    Some(match result {
        Ok(value) => RawResponse::ok(id, value),
        Err(e) => RawResponse::err(id, e),
    })
}

fn health_snapshot_json(snapshot: &HealthSnapshot) -> Value {
    serde_json::to_value(snapshot).expect("HealthSnapshot always serializes")
}

fn shape_result(outcome: EngineOpResult) -> Value {
    match outcome {
        EngineOpResult::ProjectCreated { project_id, width, height, depth } => json!({
            "project_id": project_id,
            "dimensions": { "width": width, "height": height, "depth": depth },
        }),
        EngineOpResult::ProjectLoaded { project_id } => json!({ "project_id": project_id }),
        EngineOpResult::ProjectSaved { path, bytes } => json!({ "path": path, "bytes": bytes }),
        EngineOpResult::Status(snapshot) => health_snapshot_json(&snapshot),

        EngineOpResult::VoxelSet => json!({}),
        EngineOpResult::VoxelRemoved { existed } => json!({ "existed": existed }),
        EngineOpResult::Voxel { exists, color } => json!({
            "exists": exists,
            "color": color.map(|c| c.to_array()),
        }),
        EngineOpResult::VoxelsBatchApplied { count } => json!({ "count": count }),

        EngineOpResult::LayerCreated { layer_id } => json!({ "layer_id": layer_id }),
        EngineOpResult::LayerDeleted => json!({}),
        EngineOpResult::LayersMerged => json!({}),
        EngineOpResult::LayerVisibilitySet => json!({}),
        EngineOpResult::Layers(layers) => Value::Array(
            layers
                .into_iter()
                .map(|l| json!({ "id": l.id, "name": l.name, "visible": l.visible, "voxel_count": l.voxel_count }))
                .collect(),
        ),

        EngineOpResult::VoxelsRegion(voxels) => Value::Array(
            voxels
                .into_iter()
                .map(|(at, color)| json!({ "at": [at.x, at.y, at.z], "color": color.to_array() }))
                .collect(),
        ),
        EngineOpResult::BoundingBox(bbox) => match bbox {
            Some(b) => json!({
                "min": [b.min.x, b.min.y, b.min.z],
                "max": [b.max.x, b.max.y, b.max.z],
            }),
            None => Value::Null,
        },
        EngineOpResult::ColorHistogram(entries) => Value::Array(
            entries.into_iter().map(|(color, count)| json!({ "color": color.to_array(), "count": count })).collect(),
        ),
        EngineOpResult::VoxelsByColor(coords) => {
            Value::Array(coords.into_iter().map(|c| json!([c.x, c.y, c.z])).collect())
        }
        EngineOpResult::UniqueColors(colors) => {
            Value::Array(colors.into_iter().map(|c| json!(c.to_array())).collect())
        }

        EngineOpResult::ModelExported { path, bytes } => json!({ "path": path, "bytes": bytes }),
        EngineOpResult::Rendered { path, size, format } => json!({ "path": path, "size": size, "format": format }),
        EngineOpResult::ScriptExecuted { success, message } => {
            json!({ "success": success, "code": if success { 0 } else { 1 }, "message": message })
        }

        EngineOpResult::Pong => json!({ "pong": true }),
        EngineOpResult::Echoed(value) => json!({ "payload": value }),
        EngineOpResult::Version(version) => json!({ "version": version }),
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
