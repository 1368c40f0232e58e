use crate::domain::model::{CodeEntry, FieldBinding};
use crate::domain::ports::DomainStore;
use crate::utils::error::{DomainError, Result};
use std::path::{Path, PathBuf};

pub async fn show_domain<S: DomainStore>(store: &S, name: &str) -> Result<Vec<CodeEntry>> {
    store.domain_to_table(name).await
}

/// Feature-class fields that reference `domain`, in catalog order.
pub async fn find_domain_usages<S: DomainStore>(store: &S, domain: &str) -> Result<Vec<FieldBinding>> {
    let usages: Vec<FieldBinding> = store
        .field_bindings()
        .await?
        .into_iter()
        .filter(|binding| binding.domain == domain)
        .collect();

    for usage in &usages {
        tracing::debug!(
            feature_class = %usage.feature_class,
            field = %usage.field,
            domain,
            "field uses domain"
        );
    }
    Ok(usages)
}

/// Records that `feature_class.field` uses `domain`. The domain must already
/// exist in the store.
pub async fn record_field_usage<S: DomainStore>(
    store: &S,
    feature_class: &str,
    field: &str,
    domain: &str,
) -> Result<bool> {
    let added = store
        .bind_field(FieldBinding {
            feature_class: feature_class.to_string(),
            field: field.to_string(),
            domain: domain.to_string(),
        })
        .await?;
    if added {
        tracing::info!(feature_class, field, domain, "bound field to domain");
    } else {
        tracing::debug!(feature_class, field, domain, "field already bound");
    }
    Ok(added)
}

/// Writes the domain's descriptions, one per row, to `<out_dir>/<name>.csv`.
/// The result can be pasted into a data-dictionary pick list or loaded back
/// through the csv source.
pub async fn export_domain_csv<S: DomainStore>(
    store: &S,
    name: &str,
    out_dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let table = store.domain_to_table(name).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in &table {
        writer.write_record([entry.description.as_str()])?;
    }
    let data = writer
        .into_inner()
        .map_err(|e| DomainError::store(format!("csv buffer: {}", e)))?;

    tokio::fs::create_dir_all(out_dir.as_ref()).await?;
    let path = out_dir.as_ref().join(format!("{}.csv", name));
    tokio::fs::write(&path, data).await?;

    tracing::info!(domain = name, rows = table.len(), path = %path.display(), "exported domain");
    Ok(path)
}
