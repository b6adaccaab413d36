//! Development server, live reload, and source watching for sitewright.

mod dispatch;
mod reload;
mod server;
mod watcher;

pub use dispatch::{run_task, watch_and_rebuild, WatchError};
pub use reload::{reload_client_script, ReloadHub, ReloadMessage};
pub use server::{DevServer, ServeConfig, ServeError};
pub use watcher::WatchCoordinator;
