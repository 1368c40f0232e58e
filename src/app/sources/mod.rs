pub mod combinations;
pub mod csv_dir;
pub mod existing_domain;
pub mod yaml;

pub use combinations::{CombinationSource, CombinationSpec};
pub use csv_dir::CsvDirSource;
pub use existing_domain::ExistingDomainSource;
pub use yaml::YamlSource;

use crate::adapters::JsonFileStore;
use crate::config::{JobConfig, SourceKind};
use crate::domain::ports::ValueSource;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;

/// Builds the source a job file asks for. File-backed sources are read here,
/// so parse failures surface before the target store is opened.
pub async fn source_from_config(config: &JobConfig) -> Result<Box<dyn ValueSource>> {
    let settings = &config.source;
    let source: Box<dyn ValueSource> = match settings.kind {
        SourceKind::CsvDir => {
            let location = validate_required_field("source.location", &settings.location)?;
            Box::new(CsvDirSource::new(location, settings.has_headers))
        }
        SourceKind::Yaml => {
            let location = validate_required_field("source.location", &settings.location)?;
            Box::new(YamlSource::from_file(location).await?)
        }
        SourceKind::ExistingDomains => {
            let location = validate_required_field("source.location", &settings.location)?;
            Box::new(ExistingDomainSource::new(JsonFileStore::open(location).await?))
        }
        SourceKind::Combinations => Box::new(CombinationSource::new(config.combination_spec())),
    };

    tracing::debug!(kind = source.kind(), "value source ready");
    Ok(source)
}
