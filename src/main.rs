//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use iarp::config::Config;
use iarp::daemon::Daemon;
use iarp::southbound::netlink::NetlinkInstaller;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn main() {
    let config = match Config::parse_args(std::env::args()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };

    init_tracing();
    info!(router_id = %config.router_id, "starting up");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to create async runtime");

    let exit_code = runtime.block_on(run(config));
    std::process::exit(exit_code);
}

async fn run(config: Config) -> i32 {
    let (connection, handle, _messages) = match rtnetlink::new_connection() {
        Ok(parts) => parts,
        Err(error) => {
            error!(%error, "failed to open netlink connection");
            return 1;
        }
    };
    tokio::spawn(connection);

    let installer = Box::new(NetlinkInstaller::new(handle));
    let daemon = match Daemon::bind(config, installer).await {
        Ok(daemon) => daemon,
        Err(error) => {
            error.log();
            return 1;
        }
    };

    let shutdown = async {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    };
    daemon.run(shutdown).await;

    info!("shutting down");
    0
}
