//! The default aggregate: the full dev loop.

use anyhow::Result;
use sitewright_pipeline::{BuildTask, Paths, SeverityGate};
use sitewright_server::{run_task, watch_and_rebuild, DevServer, ReloadHub, ServeConfig};

/// Trigger every asset task, the watch loop, and the dev server, all sharing
/// one reload hub. The asset tasks are spawned concurrently and not awaited;
/// deploy is never part of this aggregate.
pub async fn run(paths: Paths, gate: SeverityGate, port: u16) -> Result<()> {
    let hub = ReloadHub::new();

    for task in BuildTask::ALL {
        tokio::spawn(run_task(task, paths.clone(), gate, hub.clone()));
    }

    let server = DevServer::new(
        ServeConfig {
            root: paths.dist_root.clone(),
            port,
            ..ServeConfig::default()
        },
        hub.clone(),
    );

    tokio::select! {
        res = watch_and_rebuild(paths, gate, hub) => res?,
        res = server.start() => res?,
    }

    Ok(())
}
