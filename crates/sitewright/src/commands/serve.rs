//! Standalone preview server.

use anyhow::Result;
use sitewright_pipeline::Paths;
use sitewright_server::{DevServer, ReloadHub, ServeConfig};

/// Serve the destination root until the process ends.
pub async fn run(paths: Paths, port: u16) -> Result<()> {
    let config = ServeConfig {
        root: paths.dist_root,
        port,
        ..ServeConfig::default()
    };

    DevServer::new(config, ReloadHub::new()).start().await?;

    Ok(())
}
