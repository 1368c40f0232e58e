use crate::domain::model::{CodeEntry, CodeSet, Domain, FieldBinding};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A geodatabase-like container holding domains and the fields that use them.
pub trait DomainStore: Send + Sync {
    fn list_domains(&self) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;

    fn domain_exists(&self, name: &str) -> impl std::future::Future<Output = Result<bool>> + Send;

    fn create_domain(&self, domain: Domain) -> impl std::future::Future<Output = Result<()>> + Send;

    fn add_coded_value(
        &self,
        domain: &str,
        entry: CodeEntry,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn domain_to_table(
        &self,
        domain: &str,
    ) -> impl std::future::Future<Output = Result<Vec<CodeEntry>>> + Send;

    fn field_bindings(&self) -> impl std::future::Future<Output = Result<Vec<FieldBinding>>> + Send;

    /// Returns `false` if the binding was already recorded.
    fn bind_field(
        &self,
        binding: FieldBinding,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;
}

/// Where a run's domain names and their codes come from.
#[async_trait]
pub trait ValueSource: Send + Sync {
    fn kind(&self) -> &'static str;

    async fn domain_names(&self) -> Result<Vec<String>>;

    async fn collect(&self, domain_name: &str) -> Result<CodeSet>;
}
