use crate::config::ExistingDomainPolicy;
use crate::domain::model::{CodeEntry, Domain};
use crate::domain::ports::DomainStore;
use crate::utils::error::{DomainError, Result};
use std::collections::HashSet;

/// A domain created during this run, remembering which codes went in.
#[derive(Debug, Clone)]
pub struct DomainHandle {
    name: String,
    registered: HashSet<String>,
}

impl DomainHandle {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            registered: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

/// Creates text/coded-value domains and fills them one code at a time.
///
/// Nothing is transactional: a failure between two `add_value` calls leaves
/// the domain partially populated in the store.
pub struct DomainWriter<'a, S: DomainStore> {
    store: &'a S,
    on_existing: ExistingDomainPolicy,
}

impl<'a, S: DomainStore> DomainWriter<'a, S> {
    pub fn new(store: &'a S, on_existing: ExistingDomainPolicy) -> Self {
        Self { store, on_existing }
    }

    /// Returns `None` when the domain already exists and the policy is `Skip`.
    pub async fn create_domain(&self, name: &str, description: &str) -> Result<Option<DomainHandle>> {
        if self.store.domain_exists(name).await? {
            return match self.on_existing {
                ExistingDomainPolicy::Fail => Err(DomainError::DomainAlreadyExists {
                    name: name.to_string(),
                }),
                ExistingDomainPolicy::Skip => {
                    tracing::warn!(domain = name, "domain already exists, skipping");
                    Ok(None)
                }
            };
        }

        self.store
            .create_domain(Domain::text_coded(name, description))
            .await?;
        tracing::info!(domain = name, "created domain");
        Ok(Some(DomainHandle::new(name)))
    }

    /// Registers `code` verbatim with itself as description. Returns `false`
    /// if this handle already registered the exact same code.
    pub async fn add_value(&self, handle: &mut DomainHandle, code: &str) -> Result<bool> {
        if code.trim().is_empty() {
            return Err(DomainError::ValidationError {
                message: format!("Empty code for domain '{}'", handle.name),
            });
        }
        if handle.registered.contains(code) {
            tracing::debug!(domain = %handle.name, code, "code already registered");
            return Ok(false);
        }

        self.store
            .add_coded_value(&handle.name, CodeEntry::same(code))
            .await?;
        handle.registered.insert(code.to_string());
        tracing::debug!(domain = %handle.name, code, "added code");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    #[tokio::test]
    async fn test_creates_text_coded_domain() {
        let store = MemoryStore::new();
        let writer = DomainWriter::new(&store, ExistingDomainPolicy::Fail);

        let mut handle = writer.create_domain("STATUS", "STATUS").await.unwrap().unwrap();
        assert!(writer.add_value(&mut handle, "X").await.unwrap());
        assert!(writer.add_value(&mut handle, "Y").await.unwrap());
        assert_eq!(handle.len(), 2);

        let catalog = store.snapshot().await;
        let domain = catalog.domain("STATUS").unwrap();
        assert_eq!(domain.field_type, crate::domain::model::FieldType::Text);
        assert_eq!(domain.domain_type, crate::domain::model::DomainType::Coded);
        assert_eq!(
            domain.coded_values,
            vec![CodeEntry::same("X"), CodeEntry::same("Y")]
        );
    }

    #[tokio::test]
    async fn test_re_adding_a_code_is_a_no_op() {
        let store = MemoryStore::new();
        let writer = DomainWriter::new(&store, ExistingDomainPolicy::Fail);
        let mut handle = writer.create_domain("STATUS", "STATUS").await.unwrap().unwrap();

        assert!(writer.add_value(&mut handle, "X").await.unwrap());
        assert!(!writer.add_value(&mut handle, "X").await.unwrap());
        assert_eq!(handle.len(), 1);

        assert_eq!(store.domain_to_table("STATUS").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_padded_code_is_a_separate_value() {
        let store = MemoryStore::new();
        let writer = DomainWriter::new(&store, ExistingDomainPolicy::Fail);
        let mut handle = writer.create_domain("STATUS", "STATUS").await.unwrap().unwrap();

        assert!(writer.add_value(&mut handle, "X").await.unwrap());
        assert!(writer.add_value(&mut handle, "X ").await.unwrap());

        assert_eq!(
            store.domain_to_table("STATUS").await.unwrap(),
            vec![CodeEntry::same("X"), CodeEntry::same("X ")]
        );
    }

    #[tokio::test]
    async fn test_values_keep_call_order() {
        let store = MemoryStore::new();
        let writer = DomainWriter::new(&store, ExistingDomainPolicy::Fail);
        let mut handle = writer.create_domain("AGE", "AGE").await.unwrap().unwrap();

        for code in ["C", "A", "B"] {
            writer.add_value(&mut handle, code).await.unwrap();
        }
        let codes: Vec<String> = store
            .domain_to_table("AGE")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.code)
            .collect();
        assert_eq!(codes, vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_existing_domain_policy() {
        let store = MemoryStore::new();
        DomainWriter::new(&store, ExistingDomainPolicy::Fail)
            .create_domain("STATUS", "STATUS")
            .await
            .unwrap();

        let err = DomainWriter::new(&store, ExistingDomainPolicy::Fail)
            .create_domain("STATUS", "STATUS")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DomainAlreadyExists { .. }));

        let skipped = DomainWriter::new(&store, ExistingDomainPolicy::Skip)
            .create_domain("STATUS", "STATUS")
            .await
            .unwrap();
        assert!(skipped.is_none());
        assert_eq!(store.list_domains().await.unwrap(), vec!["STATUS"]);
    }

    #[tokio::test]
    async fn test_blank_code_is_rejected() {
        let store = MemoryStore::new();
        let writer = DomainWriter::new(&store, ExistingDomainPolicy::Fail);
        let mut handle = writer.create_domain("STATUS", "STATUS").await.unwrap().unwrap();

        assert!(matches!(
            writer.add_value(&mut handle, "  ").await,
            Err(DomainError::ValidationError { .. })
        ));
        assert!(handle.is_empty());
    }
}
