use crate::utils::error::{DomainError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One row of a coded-value domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEntry {
    pub code: String,
    pub description: String,
}

impl CodeEntry {
    /// Entry whose description repeats the code.
    pub fn same(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            description: code.clone(),
            code,
        }
    }
}

/// Distinct, non-blank codes iterated in byte-wise sorted order. Values are
/// kept exactly as given, surrounding whitespace included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeSet {
    codes: BTreeSet<String>,
}

impl CodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the value was new. Empty and whitespace-only values
    /// are ignored.
    pub fn insert(&mut self, value: &str) -> bool {
        if value.trim().is_empty() {
            return false;
        }
        self.codes.insert(value.to_string())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.codes.contains(value)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.codes.iter().cloned().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for CodeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = CodeSet::new();
        for value in iter {
            set.insert(value.as_ref());
        }
        set
    }
}

impl<'a> IntoIterator for &'a CodeSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    Text,
    Short,
    Long,
    Double,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DomainType {
    Coded,
    Range,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    pub description: String,
    pub field_type: FieldType,
    pub domain_type: DomainType,
    #[serde(default)]
    pub coded_values: Vec<CodeEntry>,
    pub created_at: DateTime<Utc>,
}

impl Domain {
    pub fn text_coded(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            field_type: FieldType::Text,
            domain_type: DomainType::Coded,
            coded_values: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.coded_values.iter().any(|entry| entry.code == code)
    }
}

/// A feature-class field that references a domain by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBinding {
    pub feature_class: String,
    pub field: String,
    pub domain: String,
}

/// Everything a store persists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub domains: Vec<Domain>,
    #[serde(default)]
    pub field_bindings: Vec<FieldBinding>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Catalog {
    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.domains.iter().find(|d| d.name == name)
    }

    fn domain_mut(&mut self, name: &str) -> Result<&mut Domain> {
        self.domains
            .iter_mut()
            .find(|d| d.name == name)
            .ok_or_else(|| DomainError::DomainNotFound {
                name: name.to_string(),
            })
    }

    pub fn domain_names(&self) -> Vec<String> {
        self.domains.iter().map(|d| d.name.clone()).collect()
    }

    pub fn create_domain(&mut self, domain: Domain) -> Result<()> {
        if domain.name.trim().is_empty() {
            return Err(DomainError::ValidationError {
                message: "Domain name cannot be empty".to_string(),
            });
        }
        if self.domain(&domain.name).is_some() {
            return Err(DomainError::DomainAlreadyExists { name: domain.name });
        }
        self.domains.push(domain);
        self.touch();
        Ok(())
    }

    pub fn add_coded_value(&mut self, domain_name: &str, entry: CodeEntry) -> Result<()> {
        let domain = self.domain_mut(domain_name)?;
        if domain.domain_type != DomainType::Coded {
            return Err(DomainError::store(format!(
                "Domain '{}' is not a coded-value domain",
                domain_name
            )));
        }
        if domain.has_code(&entry.code) {
            return Err(DomainError::DuplicateCode {
                domain: domain_name.to_string(),
                code: entry.code,
            });
        }
        domain.coded_values.push(entry);
        self.touch();
        Ok(())
    }

    /// Code/description table of a coded domain, in insertion order.
    pub fn domain_to_table(&self, domain_name: &str) -> Result<Vec<CodeEntry>> {
        let domain = self
            .domain(domain_name)
            .ok_or_else(|| DomainError::DomainNotFound {
                name: domain_name.to_string(),
            })?;
        if domain.domain_type != DomainType::Coded {
            return Err(DomainError::store(format!(
                "Domain '{}' is not a coded-value domain",
                domain_name
            )));
        }
        Ok(domain.coded_values.clone())
    }

    /// Records that a feature-class field uses a domain. Returns `false` when
    /// the exact binding is already present; a field can use only one domain.
    pub fn bind_field(&mut self, binding: FieldBinding) -> Result<bool> {
        if self.domain(&binding.domain).is_none() {
            return Err(DomainError::DomainNotFound {
                name: binding.domain,
            });
        }
        let existing = self
            .field_bindings
            .iter()
            .find(|b| b.feature_class == binding.feature_class && b.field == binding.field);
        if let Some(existing) = existing {
            if existing.domain == binding.domain {
                return Ok(false);
            }
            return Err(DomainError::ValidationError {
                message: format!(
                    "Field '{}.{}' already uses domain '{}'",
                    binding.feature_class, binding.field, existing.domain
                ),
            });
        }
        self.field_bindings.push(binding);
        self.touch();
        Ok(true)
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_set_dedups_and_sorts() {
        let set: CodeSet = ["B", "A", "A", "C"].into_iter().collect();
        assert_eq!(set.to_vec(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_code_set_ignores_blank_values() {
        let mut set = CodeSet::new();
        assert!(!set.insert(""));
        assert!(!set.insert("   "));
        assert!(!set.insert("\t\n"));
        assert!(set.insert(" NEST "));
        assert!(set.contains(" NEST "));
        assert!(!set.contains("NEST"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_code_set_keeps_whitespace_variants_apart() {
        let set: CodeSet = ["A", "A ", "A"].into_iter().collect();
        assert_eq!(set.to_vec(), vec!["A", "A "]);
    }

    #[test]
    fn test_catalog_rejects_duplicate_domain() {
        let mut catalog = Catalog::default();
        catalog
            .create_domain(Domain::text_coded("STATUS", "STATUS"))
            .unwrap();
        let err = catalog
            .create_domain(Domain::text_coded("STATUS", "STATUS"))
            .unwrap_err();
        assert!(matches!(err, DomainError::DomainAlreadyExists { .. }));
    }

    #[test]
    fn test_catalog_rejects_duplicate_code() {
        let mut catalog = Catalog::default();
        catalog
            .create_domain(Domain::text_coded("STATUS", "STATUS"))
            .unwrap();
        catalog
            .add_coded_value("STATUS", CodeEntry::same("X"))
            .unwrap();
        let err = catalog
            .add_coded_value("STATUS", CodeEntry::same("X"))
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateCode { .. }));
        assert_eq!(catalog.domain_to_table("STATUS").unwrap().len(), 1);
    }

    #[test]
    fn test_domain_to_table_on_range_domain_fails() {
        let mut catalog = Catalog::default();
        let mut range = Domain::text_coded("DEPTH", "Depth");
        range.field_type = FieldType::Double;
        range.domain_type = DomainType::Range;
        catalog.create_domain(range).unwrap();

        assert!(matches!(
            catalog.domain_to_table("DEPTH"),
            Err(DomainError::StoreError { .. })
        ));
        assert!(matches!(
            catalog.domain_to_table("MISSING"),
            Err(DomainError::DomainNotFound { .. })
        ));
    }

    #[test]
    fn test_bind_field_rules() {
        let mut catalog = Catalog::default();
        catalog
            .create_domain(Domain::text_coded("SUBCOLONY_1", "SUBCOLONY_1"))
            .unwrap();
        catalog
            .create_domain(Domain::text_coded("TYPE", "TYPE"))
            .unwrap();
        let binding = |domain: &str| FieldBinding {
            feature_class: "BRPE_2019".to_string(),
            field: "SUBCOLONY".to_string(),
            domain: domain.to_string(),
        };

        assert!(catalog.bind_field(binding("SUBCOLONY_1")).unwrap());
        assert!(!catalog.bind_field(binding("SUBCOLONY_1")).unwrap());
        assert!(matches!(
            catalog.bind_field(binding("TYPE")),
            Err(DomainError::ValidationError { .. })
        ));
        assert!(matches!(
            catalog.bind_field(binding("MISSING")),
            Err(DomainError::DomainNotFound { .. })
        ));
        assert_eq!(catalog.field_bindings, vec![binding("SUBCOLONY_1")]);
    }

    #[test]
    fn test_catalog_round_trips_through_json() {
        let json = r#"{
            "domains": [{
                "name": "TYPE",
                "description": "Type",
                "field_type": "TEXT",
                "domain_type": "CODED",
                "coded_values": [{"code": "1", "description": "ADULT"}],
                "created_at": "2024-01-01T00:00:00Z"
            }],
            "field_bindings": [
                {"feature_class": "BRPE_2019", "field": "TYPE", "domain": "TYPE"}
            ]
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.domain_names(), vec!["TYPE"]);
        assert_eq!(catalog.field_bindings.len(), 1);
        assert!(catalog.updated_at.is_none());
    }
}
