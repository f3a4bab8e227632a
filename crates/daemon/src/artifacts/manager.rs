// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The render artifact manager (C3): allocates unique, path-safe artifact
//! files, tracks their TTL, and exempts in-flight artifacts from cleanup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use voxel_core::{Artifact, ArtifactFormat, ArtifactId, Clock};

use crate::supervisor::SupervisorError;

struct Entry {
    artifact: Artifact,
    /// Set while the artifact's creating response is still queued for send;
    /// cleanup skips entries with this set.
    pinned: bool,
}

pub struct ArtifactManager<C: Clock> {
    dir: PathBuf,
    ttl_sec: u32,
    cache_bytes: u64,
    clock: C,
    entries: Mutex<HashMap<ArtifactId, Entry>>,
}

impl<C: Clock> ArtifactManager<C> {
    /// Also seeds tracking for any artifact files already present in `dir`
    /// (left over from a prior process), keyed off each file's on-disk
    /// mtime, so a restart doesn't orphan them from cleanup.
    pub fn new(dir: PathBuf, ttl_sec: u32, cache_bytes: u64, clock: C) -> Result<Self, SupervisorError> {
        std::fs::create_dir_all(&dir).map_err(SupervisorError::Io)?;
        set_dir_permissions(&dir)?;
        let entries = scan_existing(&dir, ttl_sec);
        Ok(Self { dir, ttl_sec, cache_bytes, clock, entries: Mutex::new(entries) })
    }

    /// Allocates a unique, collision-resistant path inside the managed
    /// directory. The filename is never derived from user input.
    pub fn allocate(&self, session_id: &str, format: ArtifactFormat) -> PathBuf {
        let token = nanoid::nanoid!(21);
        let epoch_ms = self.clock.epoch_ms();
        let safe_session = sanitize_session_component(session_id);
        self.dir.join(format!("{epoch_ms}-{safe_session}-{token}.{}", format.extension()))
    }

    /// Records a newly-written artifact file and returns its id.
    pub fn register(&self, path: PathBuf, size: u64, format: ArtifactFormat) -> Result<ArtifactId, SupervisorError> {
        validate_path(&self.dir, &path)?;
        set_file_permissions(&path)?;
        let checksum = sha256_hex(&path).ok();
        let now = self.clock.epoch_ms();
        let artifact = Artifact {
            id: ArtifactId::new(),
            path,
            size,
            format,
            created_at_epoch_ms: now,
            expires_at_epoch_ms: now + (self.ttl_sec as u64) * 1000,
            checksum,
        };
        let id = artifact.id;
        self.entries.lock().insert(id, Entry { artifact, pinned: true });
        Ok(id)
    }

    /// Releases the pin set at registration time; call once the artifact's
    /// response has left the connection's send queue.
    pub fn unpin(&self, id: ArtifactId) {
        if let Some(entry) = self.entries.lock().get_mut(&id) {
            entry.pinned = false;
        }
    }

    pub fn touch(&self, id: ArtifactId) {
        let now = self.clock.epoch_ms();
        if let Some(entry) = self.entries.lock().get_mut(&id) {
            entry.artifact.expires_at_epoch_ms = now + (self.ttl_sec as u64) * 1000;
        }
    }

    pub fn get_info(&self, id: ArtifactId) -> Option<Artifact> {
        self.entries.lock().get(&id).map(|e| e.artifact.clone())
    }

    pub fn drop_artifact(&self, id: ArtifactId) -> Result<(), SupervisorError> {
        let artifact = self.entries.lock().remove(&id).map(|e| e.artifact);
        if let Some(artifact) = artifact {
            let _ = std::fs::remove_file(&artifact.path);
        }
        Ok(())
    }

    pub fn list(&self) -> Vec<Artifact> {
        self.entries.lock().values().map(|e| e.artifact.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn total_bytes(&self) -> u64 {
        self.entries.lock().values().map(|e| e.artifact.size).sum()
    }

    /// Runs one cleanup pass: removes expired, unpinned artifacts, then
    /// evicts the oldest unpinned ones until the total size is under the
    /// configured cap.
    pub fn run_cleanup_cycle(&self) -> usize {
        let now = self.clock.epoch_ms();
        let mut removed = 0;
        let mut entries = self.entries.lock();

        let expired: Vec<ArtifactId> = entries
            .iter()
            .filter(|(_, e)| !e.pinned && e.artifact.is_expired(now))
            .map(|(id, _)| *id)
            .collect();
        for id in expired {
            if let Some(e) = entries.remove(&id) {
                let _ = std::fs::remove_file(&e.artifact.path);
                removed += 1;
            }
        }

        let mut total: u64 = entries.values().map(|e| e.artifact.size).sum();
        if total > self.cache_bytes {
            let mut candidates: Vec<(ArtifactId, u64, u64)> = entries
                .iter()
                .filter(|(_, e)| !e.pinned)
                .map(|(id, e)| (*id, e.artifact.created_at_epoch_ms, e.artifact.size))
                .collect();
            candidates.sort_by_key(|&(_, created_at, _)| created_at);
            for (id, _, size) in candidates {
                if total <= self.cache_bytes {
                    break;
                }
                if let Some(e) = entries.remove(&id) {
                    let _ = std::fs::remove_file(&e.artifact.path);
                    total -= size;
                    removed += 1;
                }
            }
        }
        removed
    }
}

/// Walks `dir` and builds an unpinned [`Entry`] for every recognized
/// artifact file found, using the file's mtime as `created_at`/`expires_at`
/// so cleanup is driven off the file system rather than this process's
/// memory of what it has registered. Unreadable entries (permissions,
/// races with a concurrent writer) are skipped rather than failing startup.
fn scan_existing(dir: &Path, ttl_sec: u32) -> HashMap<ArtifactId, Entry> {
    let mut entries = HashMap::new();
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return entries;
    };
    for dir_entry in read_dir.flatten() {
        let path = dir_entry.path();
        let Some(format) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ArtifactFormat::from_extension)
        else {
            continue;
        };
        let Ok(metadata) = dir_entry.metadata() else { continue };
        if !metadata.is_file() {
            continue;
        }
        let created_at_epoch_ms = metadata
            .modified()
            .ok()
            .and_then(|m| m.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let artifact = Artifact {
            id: ArtifactId::new(),
            path,
            size: metadata.len(),
            format,
            created_at_epoch_ms,
            expires_at_epoch_ms: created_at_epoch_ms + (ttl_sec as u64) * 1000,
            checksum: None,
        };
        entries.insert(artifact.id, Entry { artifact, pinned: false });
    }
    entries
}

/// Hashes an artifact file's contents for the optional `checksum` field.
/// Failures (e.g. the file vanished before this ran) are treated as "no
/// checksum available" rather than a registration error.
fn sha256_hex(path: &Path) -> std::io::Result<String> {
    use sha2::{Digest, Sha256};
    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{digest:x}"))
}

fn sanitize_session_component(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).take(16).collect::<String>()
}

/// Rejects any path that escapes `dir`, is not absolute-under-dir, or
/// resolves through a symlink.
fn validate_path(dir: &Path, path: &Path) -> Result<(), SupervisorError> {
    if path.components().any(|c| matches!(c, std::path::Component::ParentDir)) {
        return Err(SupervisorError::Config("artifact path contains `..`".into()));
    }
    if !path.starts_with(dir) {
        return Err(SupervisorError::Config("artifact path escapes managed directory".into()));
    }
    if let Ok(meta) = std::fs::symlink_metadata(path) {
        if meta.file_type().is_symlink() {
            return Err(SupervisorError::Config("artifact path is a symlink".into()));
        }
    }
    Ok(())
}

#[cfg(unix)]
fn set_dir_permissions(dir: &Path) -> Result<(), SupervisorError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700)).map_err(SupervisorError::Io)
}

#[cfg(not(unix))]
fn set_dir_permissions(_dir: &Path) -> Result<(), SupervisorError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), SupervisorError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(SupervisorError::Io)
}

#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), SupervisorError> {
    Ok(())
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
