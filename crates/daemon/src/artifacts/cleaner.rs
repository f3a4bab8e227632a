// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background task that periodically runs the artifact manager's cleanup
//! cycle until told to stop.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;
use voxel_core::Clock;

use crate::artifacts::manager::ArtifactManager;

pub async fn run<C: Clock + 'static>(
    manager: Arc<ArtifactManager<C>>,
    interval: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("artifact cleaner stopping");
                return;
            }
            _ = ticker.tick() => {
                let removed = manager.run_cleanup_cycle();
                if removed > 0 {
                    debug!(removed, "artifact cleanup cycle evicted entries");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "cleaner_tests.rs"]
mod tests;
