#[cfg(feature = "cli")]
pub mod cli;
pub mod job_config;

#[cfg(feature = "cli")]
pub use cli::CliArgs;
pub use job_config::{
    EmptySourcePolicy, ExistingDomainPolicy, JobConfig, SourceConfig, SourceKind, StoreConfig,
};
