use crate::app::sources::combinations::CombinationSpec;
use crate::utils::error::{DomainError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub job: JobSection,
    pub store: StoreConfig,
    pub source: SourceConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSection {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: String,
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
    #[serde(default)]
    pub on_existing: ExistingDomainPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistingDomainPolicy {
    #[default]
    Fail,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySourcePolicy {
    #[default]
    Skip,
    CreateEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    CsvDir,
    Yaml,
    ExistingDomains,
    Combinations,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub location: Option<String>,
    pub domain_name_pattern: Option<String>,
    #[serde(default)]
    pub has_headers: bool,
    #[serde(default)]
    pub on_empty: EmptySourcePolicy,
    pub combinations: Option<CombinationSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: Option<String>,
    pub system_stats: Option<bool>,
}

fn default_true() -> bool {
    true
}

impl JobConfig {
    /// Reads and parses a TOML job file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DomainError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DomainError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| DomainError::config(format!("env pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;
        validation::validate_path("store.path", &self.store.path)?;

        if self.source.kind != SourceKind::Combinations {
            let location = validation::validate_required_field("source.location", &self.source.location)?;
            validation::validate_path("source.location", location)?;
        }

        if let Some(pattern) = &self.source.domain_name_pattern {
            validation::validate_regex("source.domain_name_pattern", pattern)?;
        }

        if let Some(spec) = &self.source.combinations {
            spec.validate()?;
        }

        if let Some(level) = self.log_level() {
            validation::validate_one_of(
                "monitoring.log_level",
                level,
                &["trace", "debug", "info", "warn", "error"],
            )?;
        }

        Ok(())
    }

    pub fn name_filter(&self) -> Result<Option<Regex>> {
        self.source
            .domain_name_pattern
            .as_deref()
            .map(|p| validation::validate_regex("source.domain_name_pattern", p))
            .transpose()
    }

    pub fn combination_spec(&self) -> CombinationSpec {
        self.source
            .combinations
            .clone()
            .unwrap_or_else(CombinationSpec::seabird_dotting)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }

    pub fn system_stats_enabled(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.system_stats)
            .unwrap_or(false)
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV_JOB: &str = r#"
[job]
name = "dotting-domains"

[store]
path = "./Seabird_Photo_Dotting.json"

[source]
kind = "csv_dir"
location = "./domains"
domain_name_pattern = "^[A-Z_]+$"
"#;

    #[test]
    fn test_parse_csv_job_with_defaults() {
        let config = JobConfig::from_toml_str(CSV_JOB).unwrap();

        assert_eq!(config.job.name, "dotting-domains");
        assert_eq!(config.source.kind, SourceKind::CsvDir);
        assert!(config.store.create_if_missing);
        assert_eq!(config.store.on_existing, ExistingDomainPolicy::Fail);
        assert_eq!(config.source.on_empty, EmptySourcePolicy::Skip);
        assert!(!config.source.has_headers);
        assert!(config.validate().is_ok());
        assert!(config.name_filter().unwrap().unwrap().is_match("NEST_TYPE"));
    }

    #[test]
    fn test_parse_policies() {
        let toml_content = r#"
[job]
name = "copy"

[store]
path = "./FreshDB.json"
create_if_missing = false
on_existing = "skip"

[source]
kind = "existing_domains"
location = "./BRPE_Dotting_ver2.json"
on_empty = "create_empty"

[monitoring]
log_level = "debug"
system_stats = true
"#;
        let config = JobConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.store.on_existing, ExistingDomainPolicy::Skip);
        assert_eq!(config.source.on_empty, EmptySourcePolicy::CreateEmpty);
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.system_stats_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DOMAIN_ETL_TEST_ROOT", "/data/gis");

        let toml_content = r#"
[job]
name = "env"

[store]
path = "${DOMAIN_ETL_TEST_ROOT}/store.json"

[source]
kind = "yaml"
location = "${DOMAIN_ETL_TEST_ROOT}/domains.yaml"
"#;
        let config = JobConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.store.path, "/data/gis/store.json");
        assert_eq!(config.source.location.as_deref(), Some("/data/gis/domains.yaml"));

        std::env::remove_var("DOMAIN_ETL_TEST_ROOT");
    }

    #[test]
    fn test_missing_location_fails_validation() {
        let toml_content = r#"
[job]
name = "no-location"

[store]
path = "./store.json"

[source]
kind = "yaml"
"#;
        let config = JobConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(DomainError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_combinations_need_no_location() {
        let toml_content = r#"
[job]
name = "combos"

[store]
path = "./store.json"

[source]
kind = "combinations"
"#;
        let config = JobConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.combination_spec().domain_name, "DOTTING_TYPE");
    }

    #[test]
    fn test_invalid_pattern_and_unknown_kind() {
        let bad_pattern = CSV_JOB.replace("^[A-Z_]+$", "([A-Z");
        let config = JobConfig::from_toml_str(&bad_pattern).unwrap();
        assert!(config.validate().is_err());

        let bad_kind = CSV_JOB.replace("csv_dir", "shapefile");
        assert!(matches!(
            JobConfig::from_toml_str(&bad_kind),
            Err(DomainError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(CSV_JOB.as_bytes()).unwrap();

        let config = JobConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "dotting-domains");
    }
}
