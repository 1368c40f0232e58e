use crate::domain::model::CodeSet;
use crate::domain::ports::{DomainStore, ValueSource};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Re-keys every domain of another store by its descriptions: the
/// Description column of the exported code table becomes the new code.
pub struct ExistingDomainSource<S: DomainStore> {
    store: S,
}

impl<S: DomainStore> ExistingDomainSource<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: DomainStore> ValueSource for ExistingDomainSource<S> {
    fn kind(&self) -> &'static str {
        "existing_domains"
    }

    async fn domain_names(&self) -> Result<Vec<String>> {
        self.store.list_domains().await
    }

    async fn collect(&self, domain_name: &str) -> Result<CodeSet> {
        let table = self.store.domain_to_table(domain_name).await?;
        for row in &table {
            tracing::trace!(domain = domain_name, code = %row.code, description = %row.description, "source row");
        }
        Ok(table.iter().map(|row| row.description.as_str()).collect())
    }
}
