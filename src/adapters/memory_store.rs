use crate::domain::model::{Catalog, CodeEntry, Domain, FieldBinding};
use crate::domain::ports::DomainStore;
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Store that lives only for the process. Clones share the same catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    catalog: Arc<Mutex<Catalog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Catalog {
        self.catalog.lock().await.clone()
    }
}

impl DomainStore for MemoryStore {
    async fn list_domains(&self) -> Result<Vec<String>> {
        Ok(self.catalog.lock().await.domain_names())
    }

    async fn domain_exists(&self, name: &str) -> Result<bool> {
        Ok(self.catalog.lock().await.domain(name).is_some())
    }

    async fn create_domain(&self, domain: Domain) -> Result<()> {
        self.catalog.lock().await.create_domain(domain)
    }

    async fn add_coded_value(&self, domain: &str, entry: CodeEntry) -> Result<()> {
        self.catalog.lock().await.add_coded_value(domain, entry)
    }

    async fn domain_to_table(&self, domain: &str) -> Result<Vec<CodeEntry>> {
        self.catalog.lock().await.domain_to_table(domain)
    }

    async fn field_bindings(&self) -> Result<Vec<FieldBinding>> {
        Ok(self.catalog.lock().await.field_bindings.clone())
    }

    async fn bind_field(&self, binding: FieldBinding) -> Result<bool> {
        self.catalog.lock().await.bind_field(binding)
    }
}
