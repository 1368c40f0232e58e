use crate::config::{EmptySourcePolicy, ExistingDomainPolicy, JobConfig};
use crate::core::writer::DomainWriter;
use crate::domain::model::CodeSet;
use crate::domain::ports::{DomainStore, ValueSource};
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;
use regex::Regex;

/// One domain's worth of work, collected and sorted but not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainPlan {
    pub name: String,
    pub description: String,
    pub codes: CodeSet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub created: Vec<String>,
    pub skipped_existing: Vec<String>,
    pub skipped_empty: Vec<String>,
    pub values_added: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DriverOptions {
    pub name_filter: Option<Regex>,
    pub on_existing: ExistingDomainPolicy,
    pub on_empty: EmptySourcePolicy,
}

impl DriverOptions {
    pub fn from_config(config: &JobConfig) -> Result<Self> {
        Ok(Self {
            name_filter: config.name_filter()?,
            on_existing: config.store.on_existing,
            on_empty: config.source.on_empty,
        })
    }
}

/// Collects every domain's codes from `source` without any store involved.
pub async fn plan(source: &dyn ValueSource, options: &DriverOptions) -> Result<Vec<DomainPlan>> {
    let names = source.domain_names().await?;
    tracing::info!(source = source.kind(), domains = names.len(), "discovered domains");

    let mut plans = Vec::with_capacity(names.len());
    for name in names {
        if let Some(filter) = &options.name_filter {
            if !filter.is_match(&name) {
                tracing::debug!(domain = %name, "name does not match pattern, skipping");
                continue;
            }
        }

        let codes = source.collect(&name).await?;
        tracing::info!(domain = %name, values = codes.len(), "collected values");
        plans.push(DomainPlan {
            description: name.clone(),
            name,
            codes,
        });
    }
    Ok(plans)
}

/// Discovers domain names from a source and materializes each one in the
/// target store, strictly one after another.
pub struct Driver<S: DomainStore> {
    store: S,
    source: Box<dyn ValueSource>,
    options: DriverOptions,
    monitor: RunMonitor,
}

impl<S: DomainStore> Driver<S> {
    pub fn new(store: S, source: Box<dyn ValueSource>, options: DriverOptions) -> Self {
        Self {
            store,
            source,
            options,
            monitor: RunMonitor::default(),
        }
    }

    pub fn with_monitor(mut self, monitor: RunMonitor) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Collects every domain's codes without touching the store.
    pub async fn plan(&self) -> Result<Vec<DomainPlan>> {
        let plans = plan(self.source.as_ref(), &self.options).await?;
        self.monitor.log_phase("plan");
        Ok(plans)
    }

    /// Writes the plans in order, stopping at the first failure.
    pub async fn apply(&self, plans: Vec<DomainPlan>) -> Result<RunSummary> {
        let writer = DomainWriter::new(&self.store, self.options.on_existing);
        let mut summary = RunSummary::default();

        for plan in plans {
            if plan.codes.is_empty() {
                match self.options.on_empty {
                    EmptySourcePolicy::Skip => {
                        tracing::warn!(domain = %plan.name, "source has no values, skipping");
                        summary.skipped_empty.push(plan.name);
                        continue;
                    }
                    EmptySourcePolicy::CreateEmpty => {
                        tracing::warn!(domain = %plan.name, "source has no values, creating empty domain");
                    }
                }
            }

            let Some(mut handle) = writer.create_domain(&plan.name, &plan.description).await? else {
                summary.skipped_existing.push(plan.name);
                continue;
            };

            for code in plan.codes.iter() {
                if writer.add_value(&mut handle, code).await? {
                    summary.values_added += 1;
                }
            }
            tracing::info!(domain = handle.name(), values = handle.len(), "domain done");
            summary.created.push(plan.name);
        }

        self.monitor.log_phase("apply");
        Ok(summary)
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let plans = self.plan().await?;
        let summary = self.apply(plans).await?;
        tracing::info!(
            created = summary.created.len(),
            skipped_existing = summary.skipped_existing.len(),
            skipped_empty = summary.skipped_empty.len(),
            values = summary.values_added,
            "run finished"
        );
        self.monitor.log_final();
        Ok(summary)
    }
}
