use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use litterbook::utils::{logger, validation::Validate};
use litterbook::{
    CliConfig, EntityStore, HttpSummarizer, LifecycleManager, ReportAggregator, Sex, SummaryCache,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting litterbook");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let store = if config.auto_register_mothers {
        Arc::new(EntityStore::with_auto_register())
    } else {
        Arc::new(EntityStore::new())
    };
    let lifecycle = LifecycleManager::new(store.clone());
    let aggregator = ReportAggregator::new(store.clone());

    seed_demo_herd(&store, &lifecycle).await?;

    let start: NaiveDate = "2026-01-01".parse().context("invalid range start")?;
    let end: NaiveDate = "2026-06-30".parse().context("invalid range end")?;

    for mother in ["SOW-101", "SOW-102"] {
        let entries = aggregator
            .generate_report(mother, start, end, "spring-performance")
            .await?;
        tracing::info!(mother, entries = entries.len(), "Generated report");
    }

    let entries = store
        .get_report("spring-performance")
        .await
        .map(|r| r.entries)
        .unwrap_or_default();
    println!("Report: spring-performance");
    for entry in &entries {
        println!("  {}", entry);
    }

    // The summary needs live credentials; without them the demo stops here.
    match HttpSummarizer::from_config(&config) {
        Ok(summarizer) => {
            let cache = SummaryCache::new(store.clone(), summarizer);
            let summary = cache.get_summary("spring-performance").await?;
            println!("Insights: {}", summary.insights);
        }
        Err(e) => {
            tracing::warn!("Skipping summary: {}", e);
        }
    }

    Ok(())
}

/// A small herd covering the interesting lifecycle paths: weaned and alive,
/// weaned then died, died unweaned, still unweaned.
async fn seed_demo_herd(store: &EntityStore, lifecycle: &LifecycleManager) -> anyhow::Result<()> {
    store.add_mother("SOW-101").await?;
    store.add_mother("SOW-102").await?;

    let birth: NaiveDate = "2026-02-14".parse().context("invalid birth date")?;
    let litter = store
        .record_litter("SOW-101", Some("BOAR-7"), birth, 8, Some("first spring litter"))
        .await?;

    for (id, sex) in [
        ("PIG-001", Sex::Female),
        ("PIG-002", Sex::Female),
        ("PIG-003", Sex::Male),
        ("PIG-004", Sex::Male),
    ] {
        store.record_offspring(&litter, id, sex, None).await?;
    }

    lifecycle.record_weaning("PIG-001").await?;
    lifecycle.record_weaning("PIG-002").await?;
    lifecycle.record_death("PIG-002").await?;
    lifecycle.record_death("PIG-003").await?;

    Ok(())
}
