//! Flattened argument export
//!
//! A reporting view over already-materialized records: one TSV file per
//! petition whose debate is large enough, with one row per argument and one
//! row per counter-argument reply. The export never touches the network.

use crate::config::Config;
use crate::crawl::debate_path;
use crate::record::ItemRecord;
use crate::storage::{FsStore, StateStore};
use crate::HarvestError;
use serde::Serialize;
use std::path::Path;

/// One flattened row of the argument table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentRow {
    pub link: String,
    pub argument_id: u32,
    pub reply_id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub question: String,
    pub content: String,
}

/// Flattens one record into export rows.
///
/// Con arguments come first, then pro. `argument_id` is a 1-based counter
/// continuous across both sides; `reply_id` is 0 on the argument row itself
/// and counts up over the replies that follow it.
pub fn flatten_record(record: &ItemRecord, link: &str) -> Vec<ArgumentRow> {
    let mut rows = Vec::new();
    let mut argument_id = 0;

    for (kind, side) in [("con", &record.arguments.con), ("pro", &record.arguments.pro)] {
        for argument in side {
            argument_id += 1;
            rows.push(ArgumentRow {
                link: link.to_string(),
                argument_id,
                reply_id: 0,
                kind: kind.to_string(),
                question: record.claim_short.clone(),
                content: argument.content.trim().to_string(),
            });

            for (offset, reply) in argument.counter_arguments.iter().enumerate() {
                rows.push(ArgumentRow {
                    link: link.to_string(),
                    argument_id,
                    reply_id: offset as u32 + 1,
                    kind: "reply".to_string(),
                    question: record.claim_short.clone(),
                    content: reply.argument_text.trim().to_string(),
                });
            }
        }
    }
    rows
}

/// Exports every qualifying record across the configured sections.
///
/// A petition qualifies when its pro+con argument count reaches the
/// configured minimum. Returns the number of files written. A record that
/// cannot be read back aborts the export.
pub fn export_arguments(store: &FsStore, config: &Config) -> Result<usize, HarvestError> {
    let export_dir = Path::new(&config.output.export_dir);
    std::fs::create_dir_all(export_dir)?;

    let root = config.site.root_url.trim_end_matches('/');
    let threshold = config.export.min_arguments as usize;

    let mut written = 0;
    for section in &config.sections {
        let mut ids: Vec<String> = store.done_ids(section)?.into_iter().collect();
        ids.sort();

        for id in ids {
            let record = store.load_record(section, &id)?;
            if record.arguments.len() < threshold {
                continue;
            }

            let link = format!("{}{}", root, debate_path(&id));
            let rows = flatten_record(&record, &link);
            let path = export_dir.join(format!("{}_{}.tsv", section, id));
            write_rows(&path, &rows)?;
            written += 1;
        }
    }

    tracing::info!("export: wrote {} TSV files", written);
    Ok(written)
}

fn write_rows(path: &Path, rows: &[ArgumentRow]) -> Result<(), HarvestError> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
