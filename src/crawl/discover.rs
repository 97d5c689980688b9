//! Identifier discovery
//!
//! Walks a section's paginated listing and accumulates the deduplicated
//! universe of item identifiers. Discovery is stateless: callers that want
//! the result cached persist it through the work-state store.

use crate::crawl::extract;
use crate::crawl::fetcher::PageFetcher;
use crate::HarvestError;
use std::collections::HashSet;

fn section_path(section: &str) -> String {
    format!("/?status={}", section)
}

fn listing_path(section: &str, page: u32) -> String {
    format!("/?status={}&seite={}", section, page)
}

/// Discovers the complete identifier universe for one section.
///
/// Reads the page count from the pager of the first listing page, then
/// sweeps the listing pages in order and collects identifiers. The pager's
/// final index is excluded from the sweep. First-seen order is preserved;
/// identifiers appearing on several pages collapse to one entry.
///
/// Any fetch or extraction failure aborts discovery for the section; there
/// is no partial result.
pub async fn discover_section_ids(
    fetcher: &PageFetcher,
    section: &str,
) -> Result<Vec<String>, HarvestError> {
    let anchor = fetcher.fetch(&section_path(section)).await?;
    let count = extract::page_count(&anchor)?;
    tracing::info!("section {}: pager reports {} listing pages", section, count);

    let mut seen = HashSet::new();
    let mut universe = Vec::new();
    for page in 1..count {
        let listing = fetcher.fetch(&listing_path(section, page)).await?;
        for id in extract::listing_ids(&listing)? {
            if seen.insert(id.clone()) {
                universe.push(id);
            }
        }
    }

    tracing::info!(
        "section {}: discovered {} unique identifiers",
        section,
        universe.len()
    );
    Ok(universe)
}
