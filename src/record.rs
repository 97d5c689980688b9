//! Typed records for harvested petition data
//!
//! The JSON shape of these records matches the historical data files:
//! camelCase keys on items and arguments, and `argument_text` on replies
//! (the key used by the site's counter-argument endpoint).

use serde::{Deserialize, Serialize};

/// The fully assembled output for one petition identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    /// Petition headline
    pub claim_short: String,

    /// First paragraph of the petition text
    pub claim: String,

    /// Second paragraph: the supporting grounds
    pub ground: String,

    /// Pro and con argument groups from the debate page
    pub arguments: Debate,

    /// Comment texts in page order
    pub comments: Vec<String>,
}

/// Both sides of a petition debate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Debate {
    #[serde(default)]
    pub pro: Vec<Argument>,

    #[serde(default)]
    pub con: Vec<Argument>,
}

impl Debate {
    /// Total number of arguments across both sides
    pub fn len(&self) -> usize {
        self.pro.len() + self.con.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pro.is_empty() && self.con.is_empty()
    }
}

/// One argument from a debate page, with its counter-argument replies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    /// The site's argument identifier, used to fetch its replies
    pub id: String,

    /// Free-text argument content
    pub content: String,

    /// Tag list text, if the argument is tagged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    /// Cited source, if one is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Displayed weight, if one is shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,

    /// Replies fetched from the counter-argument endpoint
    #[serde(default)]
    pub counter_arguments: Vec<Reply>,
}

/// One counter-argument reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// Reply text, key name preserved from the reply endpoint's payload
    pub argument_text: String,
}
