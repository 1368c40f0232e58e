use crate::config::job_config::{ExistingDomainPolicy, JobConfig};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnExistingArg {
    Fail,
    Skip,
}

impl From<OnExistingArg> for ExistingDomainPolicy {
    fn from(arg: OnExistingArg) -> Self {
        match arg {
            OnExistingArg::Fail => ExistingDomainPolicy::Fail,
            OnExistingArg::Skip => ExistingDomainPolicy::Skip,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "domain-etl")]
#[command(about = "Build coded-value domains from CSV, YAML or another store")]
pub struct CliArgs {
    /// Path to TOML job file
    #[arg(short, long, default_value = "domains.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit JSON log lines instead of compact text
    #[arg(long)]
    pub json_logs: bool,

    /// Override `[monitoring] system_stats`
    #[arg(long)]
    pub monitor: Option<bool>,

    /// Override `[store] on_existing`
    #[arg(long, value_enum)]
    pub on_existing: Option<OnExistingArg>,

    /// Collect values and print the plan without touching the store
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Applies command-line overrides on top of the loaded job file.
    pub fn apply_overrides(&self, config: &mut JobConfig) {
        if let Some(policy) = self.on_existing {
            config.store.on_existing = policy.into();
            tracing::info!(policy = ?config.store.on_existing, "on_existing overridden");
        }
        if let Some(monitor) = self.monitor {
            let monitoring = config.monitoring.get_or_insert_with(Default::default);
            monitoring.system_stats = Some(monitor);
        }
    }
}
