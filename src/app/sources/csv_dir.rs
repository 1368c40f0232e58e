use crate::domain::model::CodeSet;
use crate::domain::ports::ValueSource;
use crate::utils::error::{DomainError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// One domain per `*.csv` file in a directory; the file stem names the domain
/// and the first column of every row is a code.
#[derive(Debug, Clone)]
pub struct CsvDirSource {
    dir: PathBuf,
    has_headers: bool,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>, has_headers: bool) -> Self {
        Self {
            dir: dir.into(),
            has_headers,
        }
    }

    async fn csv_files(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file() || !is_csv(&path) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                files.push((stem.to_string(), path.clone()));
            }
        }
        files.sort();
        Ok(files)
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Reads column 0 of every record. Blank first columns are dropped.
pub fn read_first_column(data: &[u8], has_headers: bool) -> Result<CodeSet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(data);

    let mut codes = CodeSet::new();
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(0) {
            codes.insert(value);
        }
    }
    Ok(codes)
}

#[async_trait]
impl ValueSource for CsvDirSource {
    fn kind(&self) -> &'static str {
        "csv_dir"
    }

    async fn domain_names(&self) -> Result<Vec<String>> {
        Ok(self
            .csv_files()
            .await?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    async fn collect(&self, domain_name: &str) -> Result<CodeSet> {
        let path = self
            .csv_files()
            .await?
            .into_iter()
            .find(|(name, _)| name == domain_name)
            .map(|(_, path)| path)
            .ok_or_else(|| DomainError::DomainNotFound {
                name: domain_name.to_string(),
            })?;

        tracing::debug!(domain = domain_name, path = %path.display(), "reading csv");
        let data = tokio::fs::read(&path).await?;
        read_first_column(&data, self.has_headers)
    }
}
