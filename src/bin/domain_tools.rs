use anyhow::Context;
use clap::{Parser, Subcommand};
use domain_etl::core::inspect::{
    export_domain_csv, find_domain_usages, record_field_usage, show_domain,
};
use domain_etl::core::DomainStore;
use domain_etl::utils::logger;
use domain_etl::JsonFileStore;

#[derive(Parser)]
#[command(name = "domain-tools")]
#[command(about = "Inspect, bind and export the domains of a store")]
struct Args {
    /// Path to the store file
    #[arg(short, long)]
    store: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List domain names
    List,
    /// Print a domain's code table
    Show { domain: String },
    /// Find feature-class fields that use a domain
    Usages { domain: String },
    /// Record that a feature-class field uses a domain
    Bind {
        feature_class: String,
        field: String,
        domain: String,
    },
    /// Write a domain's descriptions to <out>/<domain>.csv
    Export {
        domain: String,
        #[arg(short, long, default_value = ".")]
        out: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose, None);

    let store = JsonFileStore::open(&args.store)
        .await
        .with_context(|| format!("opening store {}", args.store))?;

    match args.command {
        Command::List => {
            for name in store.list_domains().await? {
                println!("{}", name);
            }
        }
        Command::Show { domain } => {
            for entry in show_domain(&store, &domain).await? {
                println!("{}\t{}", entry.code, entry.description);
            }
        }
        Command::Usages { domain } => {
            let usages = find_domain_usages(&store, &domain).await?;
            if usages.is_empty() {
                println!("No fields use domain {}", domain);
            }
            for usage in usages {
                println!(
                    "Featureclass: {} Field Name: {}  Domain Name: {}",
                    usage.feature_class, usage.field, usage.domain
                );
            }
        }
        Command::Bind {
            feature_class,
            field,
            domain,
        } => {
            let added = record_field_usage(&store, &feature_class, &field, &domain)
                .await
                .with_context(|| format!("binding {}.{} to {}", feature_class, field, domain))?;
            if added {
                println!("🔗 {}.{} now uses domain {}", feature_class, field, domain);
            } else {
                println!("{}.{} already uses domain {}", feature_class, field, domain);
            }
        }
        Command::Export { domain, out } => {
            let path = export_domain_csv(&store, &domain, &out)
                .await
                .with_context(|| format!("exporting {}", domain))?;
            println!("📁 Exported to {}", path.display());
        }
    }

    Ok(())
}
