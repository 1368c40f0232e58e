use crate::domain::model::CodeSet;
use crate::domain::ports::ValueSource;
use crate::utils::error::{DomainError, Result};
use crate::utils::validation::Validate;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single domain whose values are every combination of a list of
/// dimensions, joined with `separator`.
///
/// Rows whose first-dimension value appears in `extended_for` get one more
/// trailing dimension, `extended`. The dotting lists use this to add chick age
/// for brown pelicans only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationSpec {
    pub domain_name: String,
    #[serde(default = "default_separator")]
    pub separator: String,
    pub dimensions: Vec<Vec<String>>,
    #[serde(default)]
    pub extended: Vec<String>,
    #[serde(default)]
    pub extended_for: Vec<String>,
}

fn default_separator() -> String {
    " - ".to_string()
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl CombinationSpec {
    /// Species × bird status × nest state, with chick age for brown pelicans.
    pub fn seabird_dotting() -> Self {
        Self {
            domain_name: "DOTTING_TYPE".to_string(),
            separator: default_separator(),
            dimensions: vec![
                owned(&[
                    "BRANDTS CORMORANT",
                    "BROWN BOOBY",
                    "BROWN PELICAN",
                    "DOUBLECRESTED CORMORANT",
                    "OTHER",
                    "PELAGIC CORMORANT",
                    "WESTERN GULL",
                ]),
                owned(&[
                    "ADULT",
                    "DEAD",
                    "JUVENILE",
                    "ROOSTING OUT OF NESTING AREA",
                    "UNKNOWN",
                ]),
                owned(&[
                    "ABANDONED NEST",
                    "BROOD",
                    "CHICKS IN NEST",
                    "EMPTY NEST",
                    "PARTIALLY BUILT NEST",
                    "SITE",
                    "WELL BUILT NEST",
                ]),
            ],
            extended: owned(&["0-5WK OLD CHICK", "6-8WK OLD CHICK", "9+WK OLD CHICK", "CHICK", "DEAD"]),
            extended_for: owned(&["BROWN PELICAN"]),
        }
    }

    /// Combinations in nested-loop order (first dimension outermost).
    pub fn combinations(&self) -> Vec<String> {
        let mut rows: Vec<Vec<&str>> = vec![Vec::new()];
        for dimension in &self.dimensions {
            rows = rows
                .iter()
                .flat_map(|row| {
                    dimension.iter().map(move |value| {
                        let mut next = row.clone();
                        next.push(value.as_str());
                        next
                    })
                })
                .collect();
        }

        let mut out = Vec::new();
        for row in rows {
            let extend = !self.extended.is_empty()
                && row
                    .first()
                    .map(|head| self.extended_for.iter().any(|v| v.as_str() == *head))
                    .unwrap_or(false);
            if extend {
                for value in &self.extended {
                    out.push(format!("{}{}{}", row.join(self.separator.as_str()), self.separator, value));
                }
            } else {
                out.push(row.join(self.separator.as_str()));
            }
        }
        out
    }
}

impl Validate for CombinationSpec {
    fn validate(&self) -> Result<()> {
        let invalid = |field: &str, value: String, reason: &str| DomainError::InvalidConfigValueError {
            field: format!("source.combinations.{}", field),
            value,
            reason: reason.to_string(),
        };

        if self.domain_name.trim().is_empty() {
            return Err(invalid("domain_name", self.domain_name.clone(), "Domain name cannot be empty"));
        }
        if self.dimensions.is_empty() {
            return Err(invalid("dimensions", "[]".to_string(), "At least one dimension is required"));
        }
        if let Some(index) = self.dimensions.iter().position(|d| d.is_empty()) {
            return Err(invalid(
                "dimensions",
                index.to_string(),
                "Dimensions cannot be empty",
            ));
        }
        for value in &self.extended_for {
            if !self.dimensions[0].contains(value) {
                return Err(invalid(
                    "extended_for",
                    value.clone(),
                    "Value does not appear in the first dimension",
                ));
            }
        }
        Ok(())
    }
}

/// Static list source backed by a [`CombinationSpec`].
#[derive(Debug, Clone)]
pub struct CombinationSource {
    spec: CombinationSpec,
}

impl CombinationSource {
    pub fn new(spec: CombinationSpec) -> Self {
        Self { spec }
    }
}

#[async_trait]
impl ValueSource for CombinationSource {
    fn kind(&self) -> &'static str {
        "combinations"
    }

    async fn domain_names(&self) -> Result<Vec<String>> {
        Ok(vec![self.spec.domain_name.clone()])
    }

    async fn collect(&self, domain_name: &str) -> Result<CodeSet> {
        if domain_name != self.spec.domain_name {
            return Err(DomainError::DomainNotFound {
                name: domain_name.to_string(),
            });
        }
        Ok(self.spec.combinations().iter().collect())
    }
}
