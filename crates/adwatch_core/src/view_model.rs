use crate::catalog;
use crate::filter;
use crate::state::{AppState, CrawlState, EditorState, NoticeLevel};

/// Snapshot of everything the UI draws. Rebuilt from [`AppState`] on demand;
/// the shell renders it whenever the state reports itself dirty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub market_tabs: Vec<MarketTab>,
    pub cards: Vec<AdCardView>,
    pub stats: StatsView,
    pub search: String,
    pub selected_category: Option<String>,
    pub crawl: CrawlView,
    pub editor: Option<EditorView>,
    pub notices: Vec<NoticeView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketTab {
    /// `None` is the "All" tab.
    pub code: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdCardView {
    pub landing_page: String,
    pub domain: String,
    pub deleting: bool,
    pub records: Vec<KeywordRecordView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRecordView {
    pub keyword: String,
    pub market: String,
    pub title: String,
    pub description: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsView {
    pub total_keywords: usize,
    pub total_ads: usize,
    pub shown_ads: usize,
    pub last_updated: Option<String>,
    pub loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrawlView {
    pub running: bool,
    /// `Some(100)` while the finished gauge settles.
    pub percent: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorView {
    pub loading: bool,
    pub saving: bool,
    pub categories: Vec<CategoryView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub name: String,
    pub enabled: bool,
    pub keywords: Vec<KeywordView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordView {
    pub text: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeView {
    pub level: NoticeLevel,
    pub message: String,
}

pub(crate) fn build(state: &AppState) -> AppViewModel {
    let filtered = filter::filtered_results(state.results(), state.catalog(), state.filter());

    let market_tabs = std::iter::once(MarketTab {
        code: None,
        active: state.filter().market.is_none(),
    })
    .chain(filter::markets(state.results()).into_iter().map(|code| {
        let active = state.filter().market.as_deref() == Some(code.as_str());
        MarketTab {
            code: Some(code),
            active,
        }
    }))
    .collect();

    let cards = filtered
        .iter()
        .map(|ad| AdCardView {
            domain: ad.domain().unwrap_or_else(|| "unknown domain".to_string()),
            deleting: state.is_delete_pending(&ad.landing_page),
            landing_page: ad.landing_page.clone(),
            records: ad
                .keyword_records
                .iter()
                .map(|record| KeywordRecordView {
                    keyword: record.keyword.clone(),
                    market: record.market.clone(),
                    title: record.title.clone(),
                    description: record.description.clone(),
                    timestamp: record.timestamp.clone(),
                })
                .collect(),
        })
        .collect::<Vec<_>>();

    let stats = StatsView {
        total_keywords: catalog::total_keywords(state.catalog()),
        total_ads: state.results().len(),
        shown_ads: cards.len(),
        last_updated: state.last_updated().map(str::to_owned),
        loading: state.is_loading_results(),
    };

    let crawl = match state.crawl() {
        CrawlState::Idle => CrawlView {
            running: false,
            percent: None,
        },
        CrawlState::Running => CrawlView {
            running: true,
            percent: None,
        },
        CrawlState::Settling(_) => CrawlView {
            running: false,
            percent: Some(100),
        },
    };

    let editor = match state.editor() {
        EditorState::Closed => None,
        EditorState::Opening => Some(EditorView {
            loading: true,
            saving: state.is_save_pending(),
            categories: Vec::new(),
        }),
        EditorState::Open => Some(EditorView {
            loading: false,
            saving: state.is_save_pending(),
            categories: state
                .catalog()
                .iter()
                .map(|(name, data)| CategoryView {
                    name: name.clone(),
                    enabled: data.enabled,
                    keywords: data
                        .keywords
                        .iter()
                        .map(|entry| KeywordView {
                            text: entry.text.clone(),
                            enabled: entry.enabled,
                        })
                        .collect(),
                })
                .collect(),
        }),
    };

    let notices = state
        .notices()
        .iter()
        .map(|notice| NoticeView {
            level: notice.level,
            message: notice.message.clone(),
        })
        .collect();

    AppViewModel {
        market_tabs,
        cards,
        stats,
        search: state.filter().search.clone(),
        selected_category: state.filter().category.clone(),
        crawl,
        editor,
        notices,
    }
}
