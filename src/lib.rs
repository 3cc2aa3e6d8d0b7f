pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use config::AppConfig;
pub use core::{DrawEngine, Orchestrator};
pub use domain::catalog::Catalog;
pub use utils::error::{Result, TarotError};
