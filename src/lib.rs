pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::JobConfig;

pub use adapters::{JsonFileStore, MemoryStore};
pub use app::sources::source_from_config;
pub use crate::core::{Driver, DriverOptions, RunSummary};
pub use utils::error::{DomainError, Result};
