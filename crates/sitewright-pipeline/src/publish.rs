//! One-shot publishing of the destination root to a pages branch.

use std::path::Path;

use tokio::process::Command;

use crate::copy::copy_tree;

/// Branch published to when none is configured.
pub const DEFAULT_BRANCH: &str = "gh-pages";

/// Committer identity for publish commits, so publishing works on hosts
/// without a global git identity.
const COMMIT_IDENTITY: [&str; 4] = [
    "-c",
    "user.name=sitewright",
    "-c",
    "user.email=sitewright@localhost",
];

/// Errors from the deploy publisher.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Nothing to publish: {0}")]
    MissingSite(String),

    #[error("No publish remote configured and none detected: {0}")]
    NoRemote(String),

    #[error("Failed to stage site: {0}")]
    StageError(String),

    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Failed to run git: {0}")]
    GitUnavailable(String),
}

/// Result of a successful publish.
#[derive(Debug)]
pub struct PublishSummary {
    /// Number of files pushed.
    pub files: usize,

    /// Remote the branch was pushed to.
    pub remote: String,

    /// Branch name on the remote.
    pub branch: String,
}

/// Publish everything under `dist_root` to `branch` on `remote`.
///
/// The site is staged into a temporary directory, committed as a fresh
/// single-commit history, and force-pushed; the remote branch's previous
/// history is replaced. When `remote` is `None`, the working directory's
/// `remote.origin.url` is used.
pub async fn publish(
    dist_root: &Path,
    remote: Option<&str>,
    branch: &str,
) -> Result<PublishSummary, PublishError> {
    if !dist_root.is_dir() {
        return Err(PublishError::MissingSite(format!(
            "{} is not a directory; build the site first",
            dist_root.display()
        )));
    }

    let remote = match remote {
        Some(remote) => remote.to_string(),
        None => detect_remote().await?,
    };

    let stage = tempfile::tempdir().map_err(|e| PublishError::StageError(e.to_string()))?;
    let files = copy_tree(dist_root, stage.path(), |_| true)
        .map_err(|e| PublishError::StageError(e.to_string()))?;

    if files == 0 {
        return Err(PublishError::MissingSite(format!(
            "{} is empty; build the site first",
            dist_root.display()
        )));
    }

    tracing::info!("Publishing {} files to {} ({})", files, remote, branch);

    run_git(stage.path(), &["init", "-q"]).await?;
    run_git(stage.path(), &["add", "-A"]).await?;

    let mut commit: Vec<&str> = COMMIT_IDENTITY.to_vec();
    commit.extend(["commit", "-q", "-m", "Publish site"]);
    run_git(stage.path(), &commit).await?;

    let refspec = format!("HEAD:{branch}");
    run_git(stage.path(), &["push", "--force", "-q", &remote, &refspec]).await?;

    Ok(PublishSummary {
        files,
        remote,
        branch: branch.to_string(),
    })
}

/// Resolve the publish remote from the working directory's origin.
async fn detect_remote() -> Result<String, PublishError> {
    let output = Command::new("git")
        .args(["config", "--get", "remote.origin.url"])
        .output()
        .await
        .map_err(|e| PublishError::GitUnavailable(e.to_string()))?;

    let remote = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() || remote.is_empty() {
        return Err(PublishError::NoRemote(
            "set [deploy] remote in sitewright.toml or add a git origin".to_string(),
        ));
    }

    Ok(remote)
}

/// Run one git command in `dir`, capturing output.
async fn run_git(dir: &Path, args: &[&str]) -> Result<(), PublishError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await
        .map_err(|e| PublishError::GitUnavailable(e.to_string()))?;

    if !output.status.success() {
        return Err(PublishError::CommandFailed {
            command: format!("git {}", args.join(" ")),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    async fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .await
            .is_ok()
    }

    #[tokio::test]
    async fn missing_destination_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("dist");

        let err = publish(&missing, Some("unused"), DEFAULT_BRANCH)
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::MissingSite(_)));
    }

    #[tokio::test]
    async fn empty_destination_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let dist = temp.path().join("dist");
        fs::create_dir_all(&dist).unwrap();

        let err = publish(&dist, Some("unused"), DEFAULT_BRANCH)
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::MissingSite(_)));
    }

    #[tokio::test]
    async fn pushes_to_a_local_bare_remote() {
        if !git_available().await {
            return;
        }

        let temp = tempfile::tempdir().unwrap();

        let remote = temp.path().join("remote.git");
        fs::create_dir_all(&remote).unwrap();
        run_git(&remote, &["init", "-q", "--bare"]).await.unwrap();

        let dist = temp.path().join("dist");
        fs::create_dir_all(dist.join("css")).unwrap();
        fs::write(dist.join("index.html"), "<html></html>").unwrap();
        fs::write(dist.join("css").join("main.css"), "body{}").unwrap();

        let remote_url = remote.display().to_string();
        let summary = publish(&dist, Some(&remote_url), DEFAULT_BRANCH)
            .await
            .unwrap();

        assert_eq!(summary.files, 2);
        assert_eq!(summary.branch, DEFAULT_BRANCH);

        let refs = Command::new("git")
            .args(["ls-remote", "--heads", &remote_url])
            .output()
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&refs.stdout).contains("refs/heads/gh-pages"));
    }
}
