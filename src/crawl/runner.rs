//! Harvest orchestration
//!
//! Drives the per-section run: load or discover the identifier universe,
//! reconcile it against what is already on disk, process the pending queue
//! one identifier at a time, and persist this run's failures. Sections run
//! strictly in sequence and never interleave.

use crate::config::Config;
use crate::crawl::discover::discover_section_ids;
use crate::crawl::fetcher::PageFetcher;
use crate::crawl::process::process_item;
use crate::state::compute_pending;
use crate::storage::{FsStore, StateStore};
use crate::HarvestError;

/// Sequential harvester over the configured sections.
///
/// All network traffic flows through the one owned fetcher, and every fetch
/// is awaited before the next one starts, so politeness toward the site is
/// structural rather than conventional.
pub struct Harvester {
    config: Config,
    fetcher: PageFetcher,
    store: FsStore,
}

impl Harvester {
    /// Creates a harvester: opens the data directory and builds the HTTP
    /// client.
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let store = FsStore::open(&config.output.data_dir)?;
        let fetcher = PageFetcher::new(&config.site, &config.crawler)?;
        Ok(Self {
            config,
            fetcher,
            store,
        })
    }

    /// Runs every configured section to completion, in order.
    pub async fn run(&self) -> Result<(), HarvestError> {
        for section in &self.config.sections {
            self.run_section(section).await?;
        }
        Ok(())
    }

    /// Runs one section: universe, reconciliation, pending queue, failures.
    ///
    /// Per-item errors are caught at the item boundary and recorded; a
    /// storage failure aborts the whole run.
    async fn run_section(&self, section: &str) -> Result<(), HarvestError> {
        let universe = self.load_or_discover_universe(section).await?;
        let done = self.store.done_ids(section)?;
        let prior_failures = self.store.load_failures(section)?;
        let pending = compute_pending(&universe, &done, &prior_failures);

        tracing::info!(
            "section {}: {} in universe, {} done, {} failed last run, {} pending",
            section,
            universe.len(),
            done.len(),
            prior_failures.len(),
            pending.len()
        );

        let mut failed = Vec::new();
        let start = std::time::Instant::now();
        for (index, id) in pending.iter().enumerate() {
            match process_item(&self.fetcher, id).await {
                Ok(record) => self.store.save_record(section, id, &record)?,
                Err(e) => {
                    tracing::warn!("section {}: {} failed: {}", section, id, e);
                    failed.push(id.clone());
                }
            }

            let processed = index + 1;
            if processed % 10 == 0 {
                let rate = processed as f64 / start.elapsed().as_secs_f64();
                tracing::info!(
                    "section {}: {}/{} processed, {:.2} items/sec",
                    section,
                    processed,
                    pending.len(),
                    rate
                );
            }
        }

        self.store.save_failures(section, &failed)?;
        tracing::info!(
            "section {}: finished, {} newly materialized, {} failed",
            section,
            pending.len() - failed.len(),
            failed.len()
        );
        Ok(())
    }

    /// Returns the section's universe, discovering and caching it on first
    /// use. An existing snapshot is trusted as-is: staleness is accepted in
    /// exchange for never re-walking the listing.
    async fn load_or_discover_universe(
        &self,
        section: &str,
    ) -> Result<Vec<String>, HarvestError> {
        if let Some(ids) = self.store.load_universe(section)? {
            tracing::debug!(
                "section {}: universe snapshot loaded ({} identifiers)",
                section,
                ids.len()
            );
            return Ok(ids);
        }

        let ids = discover_section_ids(&self.fetcher, section).await?;
        self.store.save_universe(section, &ids)?;
        Ok(ids)
    }
}

/// Runs a complete harvest with the given configuration.
pub async fn run_harvest(config: Config) -> Result<(), HarvestError> {
    let harvester = Harvester::new(config)?;
    harvester.run().await
}
