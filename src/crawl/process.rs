//! Single-item processing
//!
//! Assembles the complete record for one identifier from its core page,
//! its debate page (plus one reply request per argument), and its comments
//! page. A failure anywhere in the chain aborts this identifier only; the
//! caller decides what to do with the error.

use crate::crawl::extract::{self, RawArgument};
use crate::crawl::fetcher::PageFetcher;
use crate::record::{Argument, Debate, ItemRecord};
use crate::HarvestError;

fn petition_path(id: &str) -> String {
    format!("/petition/online/{}", id)
}

pub(crate) fn debate_path(id: &str) -> String {
    format!("/petition/argumente/{}", id)
}

fn replies_path(argument_id: &str) -> String {
    format!("/ajax/argument_replies?id={}", argument_id)
}

fn comments_path(id: &str) -> String {
    format!("/petition/kommentare/{}", id)
}

/// Fetches and assembles the full record for one identifier.
pub async fn process_item(fetcher: &PageFetcher, id: &str) -> Result<ItemRecord, HarvestError> {
    let core = extract::petition(&fetcher.fetch(&petition_path(id)).await?)?;

    let sides = extract::debate(&fetcher.fetch(&debate_path(id)).await?)?;
    let pro = attach_replies(fetcher, sides.pro).await?;
    let con = attach_replies(fetcher, sides.con).await?;

    let comments = extract::comments(&fetcher.fetch(&comments_path(id)).await?)?;

    Ok(ItemRecord {
        claim_short: core.claim_short,
        claim: core.claim,
        ground: core.ground,
        arguments: Debate { pro, con },
        comments,
    })
}

/// Fetches the counter-argument replies for each argument of one side.
async fn attach_replies(
    fetcher: &PageFetcher,
    raw: Vec<RawArgument>,
) -> Result<Vec<Argument>, HarvestError> {
    let mut out = Vec::with_capacity(raw.len());
    for argument in raw {
        let payload = fetcher.fetch(&replies_path(&argument.id)).await?;
        let counter_arguments = extract::replies(&payload)?;
        out.push(Argument {
            id: argument.id,
            content: argument.content,
            tags: argument.tags,
            source: argument.source,
            weight: argument.weight,
            counter_arguments,
        });
    }
    Ok(out)
}
