//! One-shot publish of the built site.

use anyhow::Result;
use sitewright_pipeline::{publish, Paths};

use crate::config::DeploySection;

/// Publish the destination root to the configured pages branch.
pub async fn run(paths: &Paths, deploy: &DeploySection) -> Result<()> {
    let summary = publish(&paths.dist_root, deploy.remote.as_deref(), &deploy.branch).await?;

    tracing::info!(
        "Published {} files to {} ({})",
        summary.files,
        summary.remote,
        summary.branch
    );

    Ok(())
}
