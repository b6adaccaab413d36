//! Sitewright CLI - static-site asset pipeline with a live-reloading dev
//! server.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use sitewright_pipeline::{BuildTask, Paths, Severity, SeverityGate};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "sitewright")]
#[command(about = "Static-site asset pipeline with a live-reloading dev server")]
#[command(version)]
pub struct Cli {
    /// Task to run
    #[arg(value_enum, default_value = "default")]
    task: TaskName,

    /// Problem level that terminates the process (defaults to error)
    #[arg(long, value_enum, value_name = "LEVEL")]
    fatal: Option<FatalLevel>,

    /// Path to sitewright.toml config file
    #[arg(short, long, default_value = "sitewright.toml")]
    config: PathBuf,

    /// Source root override
    #[arg(long, value_name = "DIR")]
    src: Option<PathBuf>,

    /// Destination root override
    #[arg(long, value_name = "DIR")]
    dist: Option<PathBuf>,

    /// Dev server port override
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Invokable task names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TaskName {
    /// Full dev loop: watch, serve, and every asset task
    Default,
    Styles,
    Templates,
    Scripts,
    Images,
    Files,
    Serve,
    Watch,
    Deploy,
}

/// Severity threshold as exposed on the CLI.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FatalLevel {
    Error,
    Warning,
}

impl From<FatalLevel> for Severity {
    fn from(level: FatalLevel) -> Self {
        match level {
            FatalLevel::Error => Severity::Error,
            FatalLevel::Warning => Severity::Warning,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let file = config::load(&cli.config)?;

    let src = cli.src.unwrap_or_else(|| PathBuf::from(&file.paths.src));
    let dist = cli.dist.unwrap_or_else(|| PathBuf::from(&file.paths.dist));
    let paths = Paths::resolve(src, dist);
    let gate = SeverityGate::new(cli.fatal.map(Into::into));
    let port = cli.port.unwrap_or(file.serve.port);

    match cli.task {
        TaskName::Default => commands::dev::run(paths, gate, port).await?,
        TaskName::Serve => commands::serve::run(paths, port).await?,
        TaskName::Watch => commands::watch::run(paths, gate).await?,
        TaskName::Deploy => commands::deploy::run(&paths, &file.deploy).await?,
        TaskName::Styles => commands::build::run(BuildTask::Styles, &paths, &gate)?,
        TaskName::Templates => commands::build::run(BuildTask::Templates, &paths, &gate)?,
        TaskName::Scripts => commands::build::run(BuildTask::Scripts, &paths, &gate)?,
        TaskName::Images => commands::build::run(BuildTask::Images, &paths, &gate)?,
        TaskName::Files => commands::build::run(BuildTask::Files, &paths, &gate)?,
    }

    Ok(())
}
