//! Page extractors
//!
//! Pure functions from fetched page content to typed records. Nothing in
//! here touches the network or the disk, and a missing structural element
//! is always a typed error, never an empty default.

use crate::record::Reply;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

const LISTING_LINKS: &str = "ul.petitionen-liste li div.text h2 a";
const PAGER_LINKS: &str = "p.pager a";
const PETITION_BLOCK: &str = "div#main div.content > div > div > div.col2";
const DEBATE_GROUPS: &str = "div.petition-argumente > div > div > div.col2 > div > div.twocol";
const COMMENT_BLOCKS: &str = "article.kommentar > div.text";

/// Errors raised when a page does not have the expected structure
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector: {0}")]
    Selector(&'static str),

    #[error("expected element missing: {0}")]
    MissingElement(&'static str),

    #[error("element {selector} has no {attribute} attribute")]
    MissingAttribute {
        selector: &'static str,
        attribute: &'static str,
    },

    #[error("pager label {0:?} is not a page number")]
    PageCount(String),

    #[error("reply payload is not valid JSON: {0}")]
    ReplyPayload(#[from] serde_json::Error),
}

/// Core fields of one petition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetitionCore {
    pub claim_short: String,
    pub claim: String,
    pub ground: String,
}

/// One argument as it appears on the debate page, before its replies are
/// fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArgument {
    pub id: String,
    pub content: String,
    pub tags: Option<String>,
    pub source: Option<String>,
    pub weight: Option<String>,
}

/// The two argument groups of a debate page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebateSides {
    pub pro: Vec<RawArgument>,
    pub con: Vec<RawArgument>,
}

fn selector(css: &'static str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|_| ExtractError::Selector(css))
}

fn collect_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// First non-empty text chunk of an element, trimmed.
fn leading_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .find(|chunk| !chunk.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Extracts the item identifiers from one listing page, in document order.
///
/// The identifier is the last path segment of each listing link. A listing
/// page without any item links is reported as an error.
pub fn listing_ids(html: &str) -> Result<Vec<String>, ExtractError> {
    let document = Html::parse_document(html);
    let links = selector(LISTING_LINKS)?;

    let mut ids = Vec::new();
    for element in document.select(&links) {
        let href = element
            .value()
            .attr("href")
            .ok_or(ExtractError::MissingAttribute {
                selector: LISTING_LINKS,
                attribute: "href",
            })?;
        let id = href.rsplit('/').next().unwrap_or_default();
        ids.push(id.to_string());
    }

    if ids.is_empty() {
        return Err(ExtractError::MissingElement(LISTING_LINKS));
    }
    Ok(ids)
}

/// Reads the total listing page count from the pager at the bottom of the
/// first listing page: the label of the pager's last link.
pub fn page_count(html: &str) -> Result<u32, ExtractError> {
    let document = Html::parse_document(html);
    let pager = selector(PAGER_LINKS)?;

    let last = document
        .select(&pager)
        .last()
        .ok_or(ExtractError::MissingElement(PAGER_LINKS))?;
    let label = collect_text(&last);
    label
        .parse()
        .map_err(|_| ExtractError::PageCount(label.clone()))
}

/// Extracts the core petition fields: the headline and the first two
/// paragraphs of the content block.
pub fn petition(html: &str) -> Result<PetitionCore, ExtractError> {
    let document = Html::parse_document(html);
    let block_sel = selector(PETITION_BLOCK)?;
    let heading_sel = selector("h2")?;
    let text_sel = selector("div.text")?;
    let paragraph_sel = selector("p")?;

    let block = document
        .select(&block_sel)
        .next()
        .ok_or(ExtractError::MissingElement(PETITION_BLOCK))?;

    let heading = block
        .select(&heading_sel)
        .next()
        .ok_or(ExtractError::MissingElement("petition h2"))?;

    let text = block
        .select(&text_sel)
        .next()
        .ok_or(ExtractError::MissingElement("petition div.text"))?;

    let mut paragraphs = text.select(&paragraph_sel);
    let claim = paragraphs
        .next()
        .ok_or(ExtractError::MissingElement("petition claim paragraph"))?;
    let ground = paragraphs
        .next()
        .ok_or(ExtractError::MissingElement("petition ground paragraph"))?;

    Ok(PetitionCore {
        claim_short: collect_text(&heading),
        claim: collect_text(&claim),
        ground: collect_text(&ground),
    })
}

/// Extracts both argument groups from a debate page.
///
/// Groups are keyed by their polarity heading ("Pro"/"Contra"); groups with
/// any other label are skipped. A page without argument groups yields two
/// empty sides, since petitions without a debate exist.
pub fn debate(html: &str) -> Result<DebateSides, ExtractError> {
    let document = Html::parse_document(html);
    let group_sel = selector(DEBATE_GROUPS)?;
    let heading_sel = selector("h2.h1")?;
    let article_sel = selector("article")?;
    let text_sel = selector("div.text")?;
    let tags_sel = selector("ul.tags")?;
    let source_sel = selector("span.source")?;
    let weight_sel = selector("div.tools span.gewicht")?;

    let mut sides = DebateSides::default();
    for group in document.select(&group_sel) {
        let polarity = group
            .select(&heading_sel)
            .next()
            .map(|heading| collect_text(&heading))
            .unwrap_or_default();

        let mut arguments = Vec::new();
        for article in group.select(&article_sel) {
            let id = article
                .value()
                .attr("data-id")
                .ok_or(ExtractError::MissingAttribute {
                    selector: "article",
                    attribute: "data-id",
                })?
                .to_string();

            let text = article
                .select(&text_sel)
                .next()
                .ok_or(ExtractError::MissingElement("argument div.text"))?;

            arguments.push(RawArgument {
                id,
                // The argument body is the text preceding any inline
                // source span.
                content: leading_text(&text),
                tags: article.select(&tags_sel).next().map(|el| collect_text(&el)),
                source: text.select(&source_sel).next().map(|el| collect_text(&el)),
                weight: article
                    .select(&weight_sel)
                    .next()
                    .map(|el| collect_text(&el)),
            });
        }

        match polarity.as_str() {
            "Pro" => sides.pro = arguments,
            "Contra" => sides.con = arguments,
            _ => {}
        }
    }
    Ok(sides)
}

/// Extracts the comment texts from a comments page, in document order.
///
/// Each comment block carries the author line in its first paragraph and
/// the comment body in the second; a block without a body paragraph is an
/// error. A page without comment blocks is a legitimate empty list.
pub fn comments(html: &str) -> Result<Vec<String>, ExtractError> {
    let document = Html::parse_document(html);
    let block_sel = selector(COMMENT_BLOCKS)?;

    let mut out = Vec::new();
    for block in document.select(&block_sel) {
        let mut paragraphs = block
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "p");
        paragraphs.next();
        let body = paragraphs
            .next()
            .ok_or(ExtractError::MissingElement("comment body paragraph"))?;
        out.push(collect_text(&body));
    }
    Ok(out)
}

/// Decodes the counter-argument endpoint's JSON payload.
pub fn replies(payload: &str) -> Result<Vec<Reply>, ExtractError> {
    Ok(serde_json::from_str(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_html(hrefs: &[&str], pager: Option<&[&str]>) -> String {
        let items: String = hrefs
            .iter()
            .map(|href| {
                format!(
                    r#"<li><div class="text"><h2><a href="{}">Title</a></h2></div></li>"#,
                    href
                )
            })
            .collect();
        let pager_html = pager
            .map(|labels| {
                let links: String = labels
                    .iter()
                    .map(|label| format!("<a>{}</a>", label))
                    .collect();
                format!(r#"<p class="pager">{}</p>"#, links)
            })
            .unwrap_or_default();
        format!(
            r#"<html><body><ul class="petitionen-liste">{}</ul>{}</body></html>"#,
            items, pager_html
        )
    }

    fn petition_html(claim_short: &str, paragraphs: &[&str]) -> String {
        let body: String = paragraphs.iter().map(|p| format!("<p>{}</p>", p)).collect();
        format!(
            r#"<html><body><div id="main"><div class="content"><div><div>
            <div class="col2"><h2>{}</h2><div class="text">{}</div></div>
            </div></div></div></body></html>"#,
            claim_short, body
        )
    }

    #[test]
    fn test_listing_ids_take_last_path_segment() {
        let html = listing_html(
            &["/petition/online/first-item", "/petition/online/second-item"],
            None,
        );
        let ids = listing_ids(&html).unwrap();
        assert_eq!(ids, vec!["first-item", "second-item"]);
    }

    #[test]
    fn test_listing_ids_keep_document_order_and_duplicates() {
        let html = listing_html(&["/p/a", "/p/b", "/p/a"], None);
        let ids = listing_ids(&html).unwrap();
        assert_eq!(ids, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_empty_listing_is_an_error() {
        let html = r#"<html><body><ul class="petitionen-liste"></ul></body></html>"#;
        assert!(matches!(
            listing_ids(html),
            Err(ExtractError::MissingElement(_))
        ));
    }

    #[test]
    fn test_page_count_reads_last_pager_label() {
        let html = listing_html(&["/p/a"], Some(&["1", "2", "17"]));
        assert_eq!(page_count(&html).unwrap(), 17);
    }

    #[test]
    fn test_page_count_missing_pager() {
        let html = listing_html(&["/p/a"], None);
        assert!(matches!(
            page_count(&html),
            Err(ExtractError::MissingElement(_))
        ));
    }

    #[test]
    fn test_page_count_non_numeric_label() {
        let html = listing_html(&["/p/a"], Some(&["1", "next"]));
        assert!(matches!(page_count(&html), Err(ExtractError::PageCount(_))));
    }

    #[test]
    fn test_petition_core_fields() {
        let html = petition_html("Save the park", &["We demand a park.", "Because trees."]);
        let core = petition(&html).unwrap();
        assert_eq!(core.claim_short, "Save the park");
        assert_eq!(core.claim, "We demand a park.");
        assert_eq!(core.ground, "Because trees.");
    }

    #[test]
    fn test_petition_missing_second_paragraph() {
        let html = petition_html("Claim", &["Only one paragraph."]);
        assert!(matches!(
            petition(&html),
            Err(ExtractError::MissingElement("petition ground paragraph"))
        ));
    }

    #[test]
    fn test_petition_missing_content_block() {
        let html = "<html><body><div id=\"main\"></div></body></html>";
        assert!(matches!(
            petition(html),
            Err(ExtractError::MissingElement(PETITION_BLOCK))
        ));
    }

    fn debate_html(groups: &[(&str, &str)]) -> String {
        // One article per group, article markup supplied by the caller.
        let twocols: String = groups
            .iter()
            .map(|(label, article)| {
                format!(
                    r#"<div class="twocol"><h2 class="h1">{}</h2>{}</div>"#,
                    label, article
                )
            })
            .collect();
        format!(
            r#"<html><body><div class="petition-argumente"><div><div>
            <div class="col2"><div>{}</div></div>
            </div></div></div></body></html>"#,
            twocols
        )
    }

    #[test]
    fn test_debate_sides_and_optional_fields() {
        let pro_article = r#"<article data-id="11">
            <ul class="tags">economy</ul>
            <div class="text">More jobs<span class="source">a study</span></div>
            <div class="tools"><span class="gewicht">4.5</span></div>
            </article>"#;
        let con_article = r#"<article data-id="12">
            <div class="text">Too expensive</div>
            </article>"#;
        let html = debate_html(&[("Pro", pro_article), ("Contra", con_article)]);

        let sides = debate(&html).unwrap();
        assert_eq!(sides.pro.len(), 1);
        assert_eq!(sides.con.len(), 1);

        let pro = &sides.pro[0];
        assert_eq!(pro.id, "11");
        assert_eq!(pro.content, "More jobs");
        assert_eq!(pro.tags.as_deref(), Some("economy"));
        assert_eq!(pro.source.as_deref(), Some("a study"));
        assert_eq!(pro.weight.as_deref(), Some("4.5"));

        let con = &sides.con[0];
        assert_eq!(con.id, "12");
        assert_eq!(con.content, "Too expensive");
        assert_eq!(con.tags, None);
        assert_eq!(con.source, None);
        assert_eq!(con.weight, None);
    }

    #[test]
    fn test_debate_unknown_polarity_is_skipped() {
        let article = r#"<article data-id="1"><div class="text">x</div></article>"#;
        let html = debate_html(&[("Neutral", article)]);
        let sides = debate(&html).unwrap();
        assert!(sides.pro.is_empty() && sides.con.is_empty());
    }

    #[test]
    fn test_debate_without_groups_is_empty() {
        let html = "<html><body><p>no debate yet</p></body></html>";
        let sides = debate(html).unwrap();
        assert!(sides.pro.is_empty() && sides.con.is_empty());
    }

    #[test]
    fn test_debate_missing_data_id() {
        let article = r#"<article><div class="text">x</div></article>"#;
        let html = debate_html(&[("Pro", article)]);
        assert!(matches!(
            debate(&html),
            Err(ExtractError::MissingAttribute { .. })
        ));
    }

    fn comments_html(blocks: &[&str]) -> String {
        let articles: String = blocks
            .iter()
            .map(|block| format!(r#"<article class="kommentar"><div class="text">{}</div></article>"#, block))
            .collect();
        format!("<html><body>{}</body></html>", articles)
    }

    #[test]
    fn test_comments_take_second_paragraph() {
        let html = comments_html(&[
            "<p>anna, yesterday</p><p>I fully agree.</p>",
            "<p>bert, today</p><p>So do I.</p>",
        ]);
        let comments = comments(&html).unwrap();
        assert_eq!(comments, vec!["I fully agree.", "So do I."]);
    }

    #[test]
    fn test_comment_without_body_is_an_error() {
        let html = comments_html(&["<p>anna, yesterday</p>"]);
        assert!(matches!(
            comments(&html),
            Err(ExtractError::MissingElement("comment body paragraph"))
        ));
    }

    #[test]
    fn test_no_comments_is_empty() {
        let html = "<html><body></body></html>";
        assert_eq!(comments(html).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_replies_decoding() {
        let payload = r#"[{"argument_text": "counter one"}, {"argument_text": "counter two"}]"#;
        let replies = replies(payload).unwrap();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].argument_text, "counter one");
    }

    #[test]
    fn test_replies_malformed_payload() {
        assert!(matches!(
            replies("<html>not json</html>"),
            Err(ExtractError::ReplyPayload(_))
        ));
    }
}
