use crate::domain::model::{Catalog, CodeEntry, Domain, FieldBinding};
use crate::domain::ports::DomainStore;
use crate::utils::error::{DomainError, Result};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Domain catalog persisted as a single JSON document.
///
/// The whole document is rewritten after every mutation, so a run that fails
/// halfway leaves the values added so far on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    catalog: Mutex<Catalog>,
}

impl JsonFileStore {
    /// Opens an existing store file.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DomainError::store(format!("Store file not found: {}", path.display()))
            } else {
                DomainError::IoError(e)
            }
        })?;
        let catalog: Catalog = serde_json::from_slice(&content)?;
        tracing::debug!(
            path = %path.display(),
            domains = catalog.domains.len(),
            "opened store"
        );

        Ok(Self {
            path,
            catalog: Mutex::new(catalog),
        })
    }

    /// Creates an empty store file, failing if one is already there.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if tokio::fs::try_exists(&path).await? {
            return Err(DomainError::store(format!(
                "Store file already exists: {}",
                path.display()
            )));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let catalog = Catalog::default();
        write_catalog(&path, &catalog).await?;
        tracing::info!(path = %path.display(), "created empty store");

        Ok(Self {
            path,
            catalog: Mutex::new(catalog),
        })
    }

    pub async fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        if tokio::fs::try_exists(path.as_ref()).await? {
            Self::open(path).await
        } else {
            Self::create(path).await
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn write_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    let data = serde_json::to_vec_pretty(catalog)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    tokio::fs::write(&tmp, &data).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

impl DomainStore for JsonFileStore {
    async fn list_domains(&self) -> Result<Vec<String>> {
        Ok(self.catalog.lock().await.domain_names())
    }

    async fn domain_exists(&self, name: &str) -> Result<bool> {
        Ok(self.catalog.lock().await.domain(name).is_some())
    }

    async fn create_domain(&self, domain: Domain) -> Result<()> {
        let mut catalog = self.catalog.lock().await;
        catalog.create_domain(domain)?;
        write_catalog(&self.path, &catalog).await
    }

    async fn add_coded_value(&self, domain: &str, entry: CodeEntry) -> Result<()> {
        let mut catalog = self.catalog.lock().await;
        catalog.add_coded_value(domain, entry)?;
        write_catalog(&self.path, &catalog).await
    }

    async fn domain_to_table(&self, domain: &str) -> Result<Vec<CodeEntry>> {
        self.catalog.lock().await.domain_to_table(domain)
    }

    async fn field_bindings(&self) -> Result<Vec<FieldBinding>> {
        Ok(self.catalog.lock().await.field_bindings.clone())
    }

    async fn bind_field(&self, binding: FieldBinding) -> Result<bool> {
        let mut catalog = self.catalog.lock().await;
        if !catalog.bind_field(binding)? {
            return Ok(false);
        }
        write_catalog(&self.path, &catalog).await?;
        Ok(true)
    }
}
