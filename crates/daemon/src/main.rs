// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! voxd: the headless voxel engine daemon binary.
//!
//! Startup order matters: the tracing subscriber is installed before
//! anything else can log, configuration is resolved next, and only then
//! does the supervisor attempt to bind the socket and take the pid lock.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use voxel_daemon::connection::ConnectionLimits;
use voxel_daemon::listener::Listener;
use voxel_daemon::rpc::Dispatcher;
use voxel_daemon::worker_pool::WorkerPool;
use voxel_daemon::{Config, Supervisor, SupervisorError};

#[tokio::main]
async fn main() {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("voxd {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "--help" | "-h" => {
                print_help();
                return;
            }
            other => {
                eprintln!("error: unexpected argument '{other}'");
                eprintln!("usage: voxd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    setup_logging();

    let config = match Config::load(None) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("voxd: failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let supervisor = match Supervisor::start(&config).await {
        Ok(s) => s,
        Err(SupervisorError::AlreadyRunning) => {
            eprintln!("voxd: a daemon is already running against {}", config.socket_path.display());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("voxd: failed to start: {e}");
            std::process::exit(1);
        }
    };
    let supervisor = Arc::new(supervisor);

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&supervisor.engine_guard),
        Arc::clone(&supervisor.artifact_manager),
        Arc::clone(&supervisor) as Arc<dyn voxel_daemon::rpc::StatusProvider>,
    ));
    let worker_pool = Arc::new(WorkerPool::spawn(config.worker_count(), dispatcher, 1024));

    let listener = match Listener::bind(config.socket_path.clone(), config.max_connections) {
        Ok(l) => l,
        Err(e) => {
            error!(error = %e, "failed to bind listener");
            std::process::exit(1);
        }
    };

    let limits = ConnectionLimits::from_config(&config);
    let cleaner_handle = tokio::spawn(voxel_daemon::artifacts::cleaner::run(
        Arc::clone(&supervisor.artifact_manager),
        std::time::Duration::from_secs(config.artifact_cleanup_interval_sec as u64),
        supervisor.shutdown.clone(),
    ));
    let serve_handle = tokio::spawn(listener.serve(
        worker_pool,
        limits,
        supervisor.shutdown.clone(),
        Arc::clone(&supervisor.stats),
    ));

    info!(socket = %config.socket_path.display(), "voxd ready");

    supervisor.wait_for_shutdown_signal().await;

    info!("draining connections");
    let _ = tokio::time::timeout(
        std::time::Duration::from_secs(config.shutdown_deadline_sec as u64),
        serve_handle,
    )
    .await;
    cleaner_handle.abort();

    supervisor.finish_shutdown();
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_help() {
    println!("voxd {}", env!("CARGO_PKG_VERSION"));
    println!("Headless voxel engine daemon, speaking JSON-RPC 2.0 over a Unix domain socket.");
    println!();
    println!("USAGE:");
    println!("    voxd");
    println!();
    println!("voxd is typically started by a supervising process and should not be run");
    println!("interactively. Configuration is read from VOXD_STATE_DIR/voxd.toml (see");
    println!("README for recognized keys) and a handful of VOXD_* environment overrides.");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Print help information");
    println!("    -V, --version    Print version information");
}
