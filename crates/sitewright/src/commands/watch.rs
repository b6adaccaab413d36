//! Standalone watch loop.

use anyhow::Result;
use sitewright_pipeline::{Paths, SeverityGate};
use sitewright_server::{watch_and_rebuild, ReloadHub};

/// Rebuild on source changes until the process ends.
pub async fn run(paths: Paths, gate: SeverityGate) -> Result<()> {
    // No server is attached, so reload signals have no subscribers.
    watch_and_rebuild(paths, gate, ReloadHub::new()).await?;

    Ok(())
}
