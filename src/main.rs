use clap::Parser;
use domain_etl::core::{plan, DomainPlan, Driver, DriverOptions};
use domain_etl::utils::monitor::RunMonitor;
use domain_etl::utils::{logger, validation::Validate};
use domain_etl::{source_from_config, CliArgs, DomainError, JobConfig, JsonFileStore};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let mut config = match JobConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if args.json_logs {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(args.verbose, config.log_level());
    }
    tracing::info!(config = %args.config, job = %config.job.name, "starting domain-etl");

    args.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        fail(&e);
    }

    if let Err(e) = run(&args, config).await {
        fail(&e);
    }
}

async fn run(args: &CliArgs, config: JobConfig) -> domain_etl::Result<()> {
    let options = DriverOptions::from_config(&config)?;
    // Sources are parsed before the target store is opened or created.
    let source = source_from_config(&config).await?;

    if args.dry_run {
        tracing::info!("dry run, the store will not be opened");
        let plans = plan(source.as_ref(), &options).await?;
        print_plan(&plans);
        return Ok(());
    }

    let store = if config.store.create_if_missing {
        JsonFileStore::open_or_create(&config.store.path).await?
    } else {
        JsonFileStore::open(&config.store.path).await?
    };

    let monitor = RunMonitor::new(config.system_stats_enabled());
    if monitor.is_enabled() {
        tracing::info!("system monitoring enabled");
    }
    let driver = Driver::new(store, source, options).with_monitor(monitor);

    let summary = driver.run().await?;
    println!("✅ Domains written to {}", config.store.path);
    println!("   created:          {}", summary.created.join(", "));
    if !summary.skipped_existing.is_empty() {
        println!("   already existed:  {}", summary.skipped_existing.join(", "));
    }
    if !summary.skipped_empty.is_empty() {
        println!("   no values:        {}", summary.skipped_empty.join(", "));
    }
    println!("   values added:     {}", summary.values_added);
    Ok(())
}

fn print_plan(plans: &[DomainPlan]) {
    println!("📋 {} domain(s) would be created:", plans.len());
    for plan in plans {
        println!("  {} ({} values)", plan.name, plan.codes.len());
        for code in plan.codes.iter() {
            println!("    - {}", code);
        }
    }
}

fn fail(e: &DomainError) -> ! {
    tracing::error!(
        error = %e,
        category = ?e.category(),
        severity = ?e.severity(),
        "domain-etl failed"
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}
