// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `execute_script`: a narrow, in-process expression evaluator over the
//! same typed voxel operations the facade already exposes.
//!
//! There is deliberately no subprocess, no embedded general-purpose VM, no
//! file I/O, and no network access reachable from a script — "sandboxed"
//! here means "no syscalls by construction", not "a runtime sandbox around
//! an otherwise-general interpreter".
//!
//! Script syntax is one command per line:
//!   add_voxel x y z r g b a
//!   remove_voxel x y z
//!   fill x0 y0 z0 x1 y1 z1 r g b a

use std::sync::atomic::{AtomicBool, Ordering};

use voxel_core::{Color, Coord, EngineError, EngineOpOutcome, EngineOpResult, Scene};

use crate::engine::facade;

/// Runs `source` one command per line, checking `cancel` between every
/// command so a deadline expiry or connection close can abort a long script
/// at the next line boundary instead of running it to completion.
pub fn execute(scene: &mut Scene, source: &str, cancel: &AtomicBool) -> EngineOpOutcome {
    let mut commands_run = 0usize;
    for (line_no, line) in source.lines().enumerate() {
        if cancel.load(Ordering::Acquire) {
            return Err(EngineError::Cancelled);
        }
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        run_line(scene, line).map_err(|e| {
            EngineError::Script(format!("line {}: {e}", line_no + 1))
        })?;
        commands_run += 1;
    }
    Ok(EngineOpResult::ScriptExecuted {
        success: true,
        message: format!("{commands_run} command(s) executed"),
    })
}

fn run_line(scene: &mut Scene, line: &str) -> Result<(), String> {
    let mut tokens = line.split_whitespace();
    let command = tokens.next().ok_or("empty command")?;
    let rest: Vec<&str> = tokens.collect();
    match command {
        "add_voxel" => {
            let [x, y, z, r, g, b, a] = parse_fixed::<7>(&rest)?;
            facade::add_voxel(
                scene,
                Coord::new(x, y, z),
                Color::new(r as u8, g as u8, b as u8, a as u8),
                None,
            )
            .map_err(|e| e.to_string())
        }
        "remove_voxel" => {
            let [x, y, z] = parse_fixed::<3>(&rest)?;
            facade::remove_voxel(scene, Coord::new(x, y, z), None).map_err(|e| e.to_string())?;
            Ok(())
        }
        "fill" => {
            let [x0, y0, z0, x1, y1, z1, r, g, b, a] = parse_fixed::<10>(&rest)?;
            let region = voxel_core::BoundingBox {
                min: Coord::new(x0.min(x1), y0.min(y1), z0.min(z1)),
                max: Coord::new(x0.max(x1), y0.max(y1), z0.max(z1)),
            };
            facade::paint_voxels(scene, region, Color::new(r as u8, g as u8, b as u8, a as u8), None)
                .map_err(|e| e.to_string())?;
            Ok(())
        }
        other => Err(format!("unknown command: {other}")),
    }
}

fn parse_fixed<const N: usize>(tokens: &[&str]) -> Result<[i32; N], String> {
    if tokens.len() != N {
        return Err(format!("expected {N} arguments, got {}", tokens.len()));
    }
    let mut out = [0i32; N];
    for (i, token) in tokens.iter().enumerate() {
        out[i] = token.parse::<i32>().map_err(|_| format!("not an integer: {token}"))?;
    }
    Ok(out)
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
