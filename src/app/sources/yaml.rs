use crate::domain::model::CodeSet;
use crate::domain::ports::ValueSource;
use crate::utils::error::{DomainError, Result};
use async_trait::async_trait;
use serde_yaml::Value;
use std::path::Path;

/// A YAML document mapping each domain name to its list of values:
///
/// ```yaml
/// STATUS:
///   - ADULT
///   - JUVENILE
/// ```
///
/// The whole file is parsed up front; key order is kept for discovery.
#[derive(Debug, Clone)]
pub struct YamlSource {
    domains: Vec<(String, Vec<String>)>,
}

impl YamlSource {
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DomainError::YamlError {
                path: origin.clone(),
                message: e.to_string(),
            })?;
        Self::from_yaml_str(&content, origin)
    }

    pub fn from_yaml_str(content: &str, origin: impl Into<String>) -> Result<Self> {
        let origin = origin.into();
        let fail = |message: String| DomainError::YamlError {
            path: origin.clone(),
            message,
        };

        let document: Value = serde_yaml::from_str(content).map_err(|e| fail(e.to_string()))?;
        let Value::Mapping(mapping) = document else {
            return Err(fail(
                "top level must be a mapping of domain name to list of values".to_string(),
            ));
        };

        let mut domains = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let name = scalar_to_string(&key)
                .ok_or_else(|| fail(format!("domain name must be a scalar, got {:?}", key)))?;
            let values = match value {
                Value::Null => Vec::new(),
                Value::Sequence(items) => {
                    let mut values = Vec::with_capacity(items.len());
                    for item in items.iter().filter(|item| !item.is_null()) {
                        let value = scalar_to_string(item).ok_or_else(|| {
                            fail(format!("values of '{}' must be scalars, got {:?}", name, item))
                        })?;
                        values.push(value);
                    }
                    values
                }
                other => {
                    return Err(fail(format!(
                        "'{}' must map to a list of values, got {:?}",
                        name, other
                    )))
                }
            };
            domains.push((name, values));
        }

        tracing::debug!(path = %origin, domains = domains.len(), "parsed yaml domains");
        Ok(Self { domains })
    }

    /// Values for `domain_name` exactly as listed in the file.
    pub fn values(&self, domain_name: &str) -> Option<&[String]> {
        self.domains
            .iter()
            .find(|(name, _)| name == domain_name)
            .map(|(_, values)| values.as_slice())
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[async_trait]
impl ValueSource for YamlSource {
    fn kind(&self) -> &'static str {
        "yaml"
    }

    async fn domain_names(&self) -> Result<Vec<String>> {
        Ok(self.domains.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn collect(&self, domain_name: &str) -> Result<CodeSet> {
        self.values(domain_name)
            .map(|values| values.iter().collect())
            .ok_or_else(|| DomainError::DomainNotFound {
                name: domain_name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorCategory;

    #[tokio::test]
    async fn test_keys_keep_file_order() {
        let source = YamlSource::from_yaml_str(
            "STATUS: [X, Y]\nAGE:\n  - 6-8WK OLD CHICK\n  - 0-5WK OLD CHICK\n",
            "inline",
        )
        .unwrap();

        assert_eq!(source.domain_names().await.unwrap(), vec!["STATUS", "AGE"]);
        assert_eq!(
            source.values("AGE").unwrap(),
            &["6-8WK OLD CHICK".to_string(), "0-5WK OLD CHICK".to_string()]
        );
        assert_eq!(
            source.collect("AGE").await.unwrap().to_vec(),
            vec!["0-5WK OLD CHICK", "6-8WK OLD CHICK"]
        );
    }

    #[test]
    fn test_scalars_become_strings_and_nulls_are_dropped() {
        let source =
            YamlSource::from_yaml_str("COUNT: [1, 2.5, true, ~, '007']\nEMPTY:\n", "inline")
                .unwrap();
        assert_eq!(
            source.values("COUNT").unwrap(),
            &["1", "2.5", "true", "007"].map(String::from)
        );
        assert!(source.values("EMPTY").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let err = YamlSource::from_yaml_str("STATUS: [X, Y\n", "broken.yaml").unwrap_err();
        assert!(matches!(err, DomainError::YamlError { .. }));
        assert_eq!(err.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_wrong_shapes_are_rejected() {
        assert!(YamlSource::from_yaml_str("- X\n- Y\n", "list.yaml").is_err());
        assert!(YamlSource::from_yaml_str("STATUS: X\n", "scalar.yaml").is_err());
        assert!(YamlSource::from_yaml_str("STATUS: [[X]]\n", "nested.yaml").is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let err = YamlSource::from_file("/nonexistent/domain-etl/domains.yaml")
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Config);
    }
}
