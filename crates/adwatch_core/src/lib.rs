//! Adwatch core: pure state machine and view-model helpers.
pub mod catalog;
mod effect;
pub mod filter;
mod model;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use model::{
    AdRecord, Catalog, CategoryRecord, CrawlOutcome, FilterSelection, KeywordEntry, KeywordRecord,
    RequestFailure, RequestFailureKind, ResultsSnapshot,
};
pub use msg::Msg;
pub use state::{
    AppState, CrawlState, EditorState, Notice, NoticeLevel, CRAWL_SETTLE_TICKS, NOTICE_TICKS,
};
pub use update::update;
pub use view_model::{
    AdCardView, AppViewModel, CategoryView, CrawlView, EditorView, KeywordRecordView, KeywordView,
    MarketTab, NoticeView, StatsView,
};
