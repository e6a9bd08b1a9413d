use crate::model::{AdRecord, Catalog, FilterSelection, ResultsSnapshot};
use crate::view_model::{self, AppViewModel};

/// Lifetime of a notice, in UI ticks (~3 s at the 75 ms tick).
pub const NOTICE_TICKS: u8 = 40;
/// How long the crawl gauge holds at 100% before resetting (~1 s).
pub const CRAWL_SETTLE_TICKS: u8 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// A transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub remaining: u8,
}

/// The keyword editor modal: closed, waiting for the catalog fetch that an
/// open triggers, or open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Closed,
    Opening,
    Open,
}

/// Crawl lifecycle. `Settling` holds the gauge at 100% for the given number
/// of remaining ticks; there is no server-driven progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlState {
    #[default]
    Idle,
    Running,
    Settling(u8),
}

/// A catalog candidate awaiting backend confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingSave {
    pub candidate: Catalog,
    pub success_notice: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    results: Vec<AdRecord>,
    catalog: Catalog,
    filter: FilterSelection,
    last_updated: Option<String>,
    notices: Vec<Notice>,
    editor: EditorState,
    crawl: CrawlState,
    pending_save: Option<PendingSave>,
    pending_deletes: Vec<String>,
    loading_results: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        view_model::build(self)
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn results(&self) -> &[AdRecord] {
        &self.results
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn filter(&self) -> &FilterSelection {
        &self.filter
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn editor(&self) -> EditorState {
        self.editor
    }

    pub fn crawl(&self) -> CrawlState {
        self.crawl
    }

    pub fn is_save_pending(&self) -> bool {
        self.pending_save.is_some()
    }

    pub fn is_loading_results(&self) -> bool {
        self.loading_results
    }

    pub fn is_delete_pending(&self, landing_page: &str) -> bool {
        self.pending_deletes.iter().any(|p| p == landing_page)
    }

    pub(crate) fn push_notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
            remaining: NOTICE_TICKS,
        });
        self.dirty = true;
    }

    pub(crate) fn begin_results_load(&mut self) {
        self.loading_results = true;
        self.dirty = true;
    }

    pub(crate) fn finish_results_load(&mut self) {
        self.loading_results = false;
        self.dirty = true;
    }

    pub(crate) fn set_results(&mut self, snapshot: ResultsSnapshot) {
        self.results = snapshot.results;
        self.last_updated = snapshot.last_updated;
        self.dirty = true;
    }

    pub(crate) fn remove_result(&mut self, landing_page: &str) {
        self.results.retain(|ad| ad.landing_page != landing_page);
        self.dirty = true;
    }

    pub(crate) fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.dirty = true;
    }

    pub(crate) fn set_search(&mut self, text: String) {
        self.filter.search = text;
        self.dirty = true;
    }

    pub(crate) fn set_market(&mut self, market: Option<String>) {
        self.filter.market = market;
        self.dirty = true;
    }

    pub(crate) fn set_category(&mut self, category: Option<String>) {
        self.filter.category = category;
        self.dirty = true;
    }

    pub(crate) fn open_editor(&mut self) {
        self.editor = EditorState::Opening;
        self.dirty = true;
    }

    /// The catalog fetch triggered by an open has arrived.
    pub(crate) fn finish_editor_open(&mut self) {
        if self.editor == EditorState::Opening {
            self.editor = EditorState::Open;
            self.dirty = true;
        }
    }

    /// The catalog fetch triggered by an open failed; drop back to closed.
    pub(crate) fn abort_editor_open(&mut self) {
        if self.editor == EditorState::Opening {
            self.editor = EditorState::Closed;
            self.dirty = true;
        }
    }

    pub(crate) fn close_editor(&mut self) {
        if self.editor != EditorState::Closed {
            self.editor = EditorState::Closed;
            self.dirty = true;
        }
    }

    pub(crate) fn begin_save(&mut self, candidate: Catalog, success_notice: String) {
        self.pending_save = Some(PendingSave {
            candidate,
            success_notice,
        });
        self.dirty = true;
    }

    pub(crate) fn take_pending_save(&mut self) -> Option<PendingSave> {
        let pending = self.pending_save.take();
        if pending.is_some() {
            self.dirty = true;
        }
        pending
    }

    pub(crate) fn begin_crawl(&mut self) {
        self.crawl = CrawlState::Running;
        self.dirty = true;
    }

    pub(crate) fn settle_crawl(&mut self) {
        self.crawl = CrawlState::Settling(CRAWL_SETTLE_TICKS);
        self.dirty = true;
    }

    pub(crate) fn reset_crawl(&mut self) {
        self.crawl = CrawlState::Idle;
        self.dirty = true;
    }

    pub(crate) fn begin_delete(&mut self, landing_page: String) {
        self.pending_deletes.push(landing_page);
        self.dirty = true;
    }

    pub(crate) fn finish_delete(&mut self, landing_page: &str) {
        self.pending_deletes.retain(|p| p != landing_page);
        self.dirty = true;
    }

    /// Advances tick-driven timers; marks dirty only when something changed.
    pub(crate) fn tick(&mut self) {
        let before = self.notices.len();
        for notice in &mut self.notices {
            notice.remaining = notice.remaining.saturating_sub(1);
        }
        self.notices.retain(|notice| notice.remaining > 0);
        if self.notices.len() != before {
            self.dirty = true;
        }

        if let CrawlState::Settling(remaining) = self.crawl {
            self.crawl = match remaining.checked_sub(1) {
                Some(0) | None => CrawlState::Idle,
                Some(left) => CrawlState::Settling(left),
            };
            self.dirty = true;
        }
    }
}
