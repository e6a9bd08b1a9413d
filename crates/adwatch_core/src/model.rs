use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The keyword catalog: category name to category record, ordered by name.
pub type Catalog = BTreeMap<String, CategoryRecord>;

fn default_enabled() -> bool {
    true
}

/// A user-managed group of keywords with an enabled flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub keywords: Vec<KeywordEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// One keyword within a category.
///
/// Older catalogs store bare strings instead of records; those deserialize as
/// enabled keywords with no `added_at` stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawKeywordEntry")]
pub struct KeywordEntry {
    pub text: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKeywordEntry {
    Bare(String),
    Entry {
        text: String,
        #[serde(default = "default_enabled")]
        enabled: bool,
        #[serde(default)]
        added_at: Option<String>,
    },
}

impl From<RawKeywordEntry> for KeywordEntry {
    fn from(raw: RawKeywordEntry) -> Self {
        match raw {
            RawKeywordEntry::Bare(text) => KeywordEntry {
                text,
                enabled: true,
                added_at: None,
            },
            RawKeywordEntry::Entry {
                text,
                enabled,
                added_at,
            } => KeywordEntry {
                text,
                enabled,
                added_at,
            },
        }
    }
}

/// One crawled advertisement with the keyword searches that surfaced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AdRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub landing_page: String,
    #[serde(default)]
    pub keyword_records: Vec<KeywordRecord>,
}

impl AdRecord {
    /// Host of the landing page, or `None` when the URL does not parse.
    pub fn domain(&self) -> Option<String> {
        url::Url::parse(&self.landing_page)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_owned))
    }
}

/// One (keyword, market, title, description, timestamp) tuple attached to an
/// ad. Missing fields on the wire default to empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct KeywordRecord {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub timestamp: String,
}

/// The result set together with the server-side refresh stamp.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultsSnapshot {
    pub results: Vec<AdRecord>,
    pub last_updated: Option<String>,
}

/// Outcome of a crawl request; the response is used for signaling only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CrawlOutcome {
    pub message: Option<String>,
    pub new_results: Option<u64>,
}

/// Active result-set filters. `None`/empty means "no filter applied".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub market: Option<String>,
    pub category: Option<String>,
    pub search: String,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.market.is_none() && self.category.is_none() && self.search.is_empty()
    }
}

/// A failed backend request, as seen by the state machine.
///
/// The IO layer maps its error type into this so the core stays free of HTTP
/// dependencies; the update function decides how a failure is worded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub kind: RequestFailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFailureKind {
    Timeout,
    Http,
    Network,
    Application,
    Decode,
}

impl RequestFailure {
    pub fn new(kind: RequestFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Text shown to the user: timeouts get a generic retry hint, everything
    /// else surfaces the underlying message.
    pub fn user_message(&self) -> String {
        match self.kind {
            RequestFailureKind::Timeout => "request timed out, please retry later".to_string(),
            _ => self.message.clone(),
        }
    }
}
