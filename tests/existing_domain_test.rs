use anyhow::Result;
use domain_etl::core::{CodeEntry, Domain, DomainStore};
use domain_etl::{source_from_config, Driver, DriverOptions, JobConfig, JsonFileStore};
use tempfile::TempDir;

#[tokio::test]
async fn test_domains_copied_by_description() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source_path = temp_dir.path().join("BRPE_Dotting_ver2.json");
    let target_path = temp_dir.path().join("FreshDB.json");

    let source_store = JsonFileStore::create(&source_path).await?;
    source_store
        .create_domain(Domain::text_coded("TYPE", "Dot type"))
        .await?;
    for (code, description) in [("2", "JUVENILE"), ("1", "ADULT"), ("3", "ADULT")] {
        source_store
            .add_coded_value(
                "TYPE",
                CodeEntry {
                    code: code.to_string(),
                    description: description.to_string(),
                },
            )
            .await?;
    }
    source_store
        .create_domain(Domain::text_coded("SIDE", "Side"))
        .await?;
    source_store
        .add_coded_value("SIDE", CodeEntry::same("LEFT"))
        .await?;
    drop(source_store);

    let config = JobConfig::from_toml_str(&format!(
        r#"
[job]
name = "fresh-db"

[store]
path = "{}"

[source]
kind = "existing_domains"
location = "{}"
"#,
        target_path.to_str().unwrap().replace('\\', "/"),
        source_path.to_str().unwrap().replace('\\', "/"),
    ))?;

    let source = source_from_config(&config).await?;
    let store = JsonFileStore::open_or_create(&config.store.path).await?;
    let driver = Driver::new(store, source, DriverOptions::from_config(&config)?);
    let summary = driver.run().await?;

    assert_eq!(summary.created, vec!["TYPE", "SIDE"]);
    assert_eq!(summary.values_added, 3);
    assert_eq!(
        driver.store().domain_to_table("TYPE").await?,
        vec![CodeEntry::same("ADULT"), CodeEntry::same("JUVENILE")]
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_source_store_is_reported() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = JobConfig::from_toml_str(&format!(
        r#"
[job]
name = "fresh-db"

[store]
path = "{}"

[source]
kind = "existing_domains"
location = "{}"
"#,
        temp_dir.path().join("out.json").to_str().unwrap().replace('\\', "/"),
        temp_dir.path().join("missing.json").to_str().unwrap().replace('\\', "/"),
    ))?;

    assert!(source_from_config(&config).await.is_err());
    Ok(())
}
