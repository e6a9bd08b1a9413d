use crate::model::{Catalog, CrawlOutcome, RequestFailure, ResultsSnapshot};

/// Messages applied to [`crate::AppState`] by [`crate::update`].
///
/// Timestamps (`created_at`, `added_at`) are attached by the shell when the
/// message is constructed; the update function itself never reads a clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Reload results and catalog from the backend.
    RefreshRequested,
    /// User edited the free-text search box.
    SearchChanged(String),
    /// User cleared the search box.
    SearchCleared,
    /// User picked a market tab; `None` is the "All" tab.
    MarketSelected(Option<String>),
    /// User picked a category filter; `None` clears it.
    CategorySelected(Option<String>),
    /// User asked for a crawl over the enabled keywords.
    CrawlRequested,
    /// User asked to delete one ad record.
    DeleteRequested { landing_page: String },
    /// User opened the keyword editor; triggers a catalog fetch.
    EditorOpened,
    /// User closed the keyword editor.
    EditorClosed,
    AddCategorySubmitted {
        name: String,
        created_at: String,
    },
    DeleteCategorySubmitted {
        category: String,
    },
    ToggleCategorySubmitted {
        category: String,
    },
    AddKeywordSubmitted {
        category: String,
        text: String,
        added_at: String,
    },
    DeleteKeywordSubmitted {
        category: String,
        keyword: String,
    },
    ToggleKeywordSubmitted {
        category: String,
        keyword: String,
    },
    /// One keyword per line; duplicates are skipped.
    BatchAddSubmitted {
        category: String,
        input: String,
        added_at: String,
    },
    /// Ask the backend for keyword suggestions for a category.
    ExpandRequested {
        category: String,
    },
    /// Backend completion for a results fetch.
    ResultsLoaded {
        result: Result<ResultsSnapshot, RequestFailure>,
    },
    /// Backend completion for a catalog fetch.
    CatalogLoaded {
        result: Result<Catalog, RequestFailure>,
    },
    /// Backend completion for a full-catalog save.
    CatalogSaved {
        result: Result<(), RequestFailure>,
    },
    /// Backend completion for a crawl request.
    CrawlFinished {
        result: Result<CrawlOutcome, RequestFailure>,
    },
    /// Backend completion for a record deletion.
    RecordDeleted {
        landing_page: String,
        result: Result<(), RequestFailure>,
    },
    /// Backend completion for a keyword expansion.
    CategoryExpanded {
        category: String,
        suggested_at: String,
        result: Result<Vec<String>, RequestFailure>,
    },
    /// UI tick; expires notices and settles the crawl gauge.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
