pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use app::server::{router, serve, AppState};
pub use config::ServiceConfig;
pub use crate::core::{extract::ExtractService, pipeline::ToolPipeline};
pub use utils::error::{ExtractError, Result};
