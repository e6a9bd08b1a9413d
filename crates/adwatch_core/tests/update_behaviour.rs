use std::sync::Once;

use adwatch_core::{
    update, AdRecord, AppState, Catalog, CategoryRecord, CrawlOutcome, CrawlState, EditorState,
    Effect, KeywordEntry, KeywordRecord, Msg, NoticeLevel, RequestFailure, RequestFailureKind,
    ResultsSnapshot, CRAWL_SETTLE_TICKS, NOTICE_TICKS,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn failure(kind: RequestFailureKind) -> RequestFailure {
    RequestFailure::new(kind, "boom")
}

fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(
        "shoes".to_string(),
        CategoryRecord {
            enabled: true,
            keywords: vec![KeywordEntry {
                text: "nike".to_string(),
                enabled: true,
                added_at: None,
            }],
            created_at: None,
        },
    );
    catalog
}

fn sample_snapshot() -> ResultsSnapshot {
    ResultsSnapshot {
        results: vec![AdRecord {
            id: "1".to_string(),
            landing_page: "https://shoes.example.com".to_string(),
            keyword_records: vec![KeywordRecord {
                keyword: "nike".to_string(),
                market: "in".to_string(),
                title: "Nike".to_string(),
                description: String::new(),
                timestamp: "2026-01-01T00:00:00Z".to_string(),
            }],
        }],
        last_updated: Some("2026-01-01T00:00:00Z".to_string()),
    }
}

/// Opens the editor and completes the catalog fetch it triggers.
fn open_editor(state: AppState, catalog: Catalog) -> AppState {
    let (state, effects) = update(state, Msg::EditorOpened);
    assert_eq!(effects, vec![Effect::LoadCatalog]);
    let (state, _) = update(
        state,
        Msg::CatalogLoaded {
            result: Ok(catalog),
        },
    );
    state
}

#[test]
fn refresh_loads_results_and_catalog() {
    init_logging();
    let state = AppState::new();

    let (state, effects) = update(state, Msg::RefreshRequested);
    assert_eq!(effects, vec![Effect::LoadResults, Effect::LoadCatalog]);
    assert!(state.is_loading_results());

    // A second refresh while one is in flight is a no-op.
    let (state, effects) = update(state, Msg::RefreshRequested);
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::ResultsLoaded {
            result: Ok(sample_snapshot()),
        },
    );
    assert!(!state.is_loading_results());
    assert_eq!(state.results().len(), 1);
    assert_eq!(state.last_updated(), Some("2026-01-01T00:00:00Z"));
}

#[test]
fn failed_results_load_becomes_a_notice() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::RefreshRequested);
    let (state, effects) = update(
        state,
        Msg::ResultsLoaded {
            result: Err(failure(RequestFailureKind::Network)),
        },
    );

    assert!(effects.is_empty());
    assert!(state.results().is_empty());
    let notices = state.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, "boom");
}

#[test]
fn timeout_failures_use_the_generic_retry_wording() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::RefreshRequested);
    let (state, _) = update(
        state,
        Msg::ResultsLoaded {
            result: Err(failure(RequestFailureKind::Timeout)),
        },
    );
    assert_eq!(
        state.notices()[0].message,
        "request timed out, please retry later"
    );
}

#[test]
fn editor_open_fetches_catalog_then_opens() {
    init_logging();
    let state = AppState::new();

    let (state, effects) = update(state, Msg::EditorOpened);
    assert_eq!(state.editor(), EditorState::Opening);
    assert_eq!(effects, vec![Effect::LoadCatalog]);

    // Opening twice does not trigger a second fetch.
    let (state, effects) = update(state, Msg::EditorOpened);
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::CatalogLoaded {
            result: Ok(sample_catalog()),
        },
    );
    assert_eq!(state.editor(), EditorState::Open);
    assert_eq!(state.catalog(), &sample_catalog());

    let (state, _) = update(state, Msg::EditorClosed);
    assert_eq!(state.editor(), EditorState::Closed);
}

#[test]
fn failed_editor_open_falls_back_to_closed() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::EditorOpened);
    let (state, _) = update(
        state,
        Msg::CatalogLoaded {
            result: Err(failure(RequestFailureKind::Http)),
        },
    );
    assert_eq!(state.editor(), EditorState::Closed);
    assert_eq!(state.notices().len(), 1);
}

#[test]
fn catalog_mutation_commits_only_after_confirmed_save() {
    init_logging();
    let state = open_editor(AppState::new(), sample_catalog());

    let (state, effects) = update(
        state,
        Msg::AddKeywordSubmitted {
            category: "shoes".to_string(),
            text: "puma".to_string(),
            added_at: "2026-01-02T00:00:00Z".to_string(),
        },
    );

    // The effect carries the candidate; the in-memory catalog is untouched.
    let candidate = match effects.as_slice() {
        [Effect::SaveCatalog { catalog }] => catalog.clone(),
        other => panic!("expected SaveCatalog effect, got {other:?}"),
    };
    assert_eq!(candidate["shoes"].keywords.len(), 2);
    assert_eq!(state.catalog(), &sample_catalog());
    assert!(state.is_save_pending());

    let (state, _) = update(state, Msg::CatalogSaved { result: Ok(()) });
    assert!(!state.is_save_pending());
    assert_eq!(state.catalog(), &candidate);
    assert_eq!(state.notices()[0].level, NoticeLevel::Success);
}

#[test]
fn failed_save_discards_the_candidate() {
    init_logging();
    let state = open_editor(AppState::new(), sample_catalog());

    let (state, _) = update(
        state,
        Msg::AddKeywordSubmitted {
            category: "shoes".to_string(),
            text: "puma".to_string(),
            added_at: "2026-01-02T00:00:00Z".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::CatalogSaved {
            result: Err(failure(RequestFailureKind::Http)),
        },
    );

    assert!(!state.is_save_pending());
    assert_eq!(state.catalog(), &sample_catalog());
    assert_eq!(state.notices()[0].level, NoticeLevel::Error);
}

#[test]
fn mutations_are_rejected_while_a_save_is_pending() {
    init_logging();
    let state = open_editor(AppState::new(), sample_catalog());

    let (state, effects) = update(
        state,
        Msg::AddCategorySubmitted {
            name: "bags".to_string(),
            created_at: "2026-01-02T00:00:00Z".to_string(),
        },
    );
    assert_eq!(effects.len(), 1);

    let (state, effects) = update(
        state,
        Msg::DeleteCategorySubmitted {
            category: "shoes".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.notices()[0].level, NoticeLevel::Warning);
    assert_eq!(state.notices()[0].message, "a save is already in progress");
}

#[test]
fn invalid_mutations_surface_errors_without_effects() {
    init_logging();
    let state = open_editor(AppState::new(), sample_catalog());

    let (state, effects) = update(
        state,
        Msg::AddKeywordSubmitted {
            category: "shoes".to_string(),
            text: "nike".to_string(),
            added_at: "2026-01-02T00:00:00Z".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.is_save_pending());
    assert_eq!(state.notices()[0].level, NoticeLevel::Error);
    assert_eq!(state.catalog(), &sample_catalog());
}

#[test]
fn mutations_outside_an_open_editor_are_ignored() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::DeleteCategorySubmitted {
            category: "shoes".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert!(state.notices().is_empty());
}

#[test]
fn batch_add_with_only_duplicates_saves_nothing() {
    init_logging();
    let state = open_editor(AppState::new(), sample_catalog());

    let (state, effects) = update(
        state,
        Msg::BatchAddSubmitted {
            category: "shoes".to_string(),
            input: "nike\n".to_string(),
            added_at: "2026-01-02T00:00:00Z".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert!(!state.is_save_pending());
    assert_eq!(state.notices()[0].level, NoticeLevel::Warning);
    assert_eq!(state.notices()[0].message, "all keywords already exist");
}

#[test]
fn expansion_suggestions_merge_as_a_batch_add() {
    init_logging();
    let state = open_editor(AppState::new(), sample_catalog());

    let (state, effects) = update(
        state,
        Msg::ExpandRequested {
            category: "shoes".to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::ExpandCategory {
            category: "shoes".to_string()
        }]
    );

    let (state, effects) = update(
        state,
        Msg::CategoryExpanded {
            category: "shoes".to_string(),
            suggested_at: "2026-01-02T00:00:00Z".to_string(),
            result: Ok(vec!["nike".to_string(), "puma".to_string()]),
        },
    );
    let candidate = match effects.as_slice() {
        [Effect::SaveCatalog { catalog }] => catalog.clone(),
        other => panic!("expected SaveCatalog effect, got {other:?}"),
    };
    assert_eq!(candidate["shoes"].keywords.len(), 2);

    let (state, _) = update(state, Msg::CatalogSaved { result: Ok(()) });
    assert_eq!(state.catalog()["shoes"].keywords[1].text, "puma");
}

#[test]
fn crawl_requires_enabled_keywords() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::CrawlRequested);
    assert!(effects.is_empty());
    assert_eq!(state.crawl(), CrawlState::Idle);
    assert_eq!(state.notices()[0].message, "no enabled keywords to crawl");
}

#[test]
fn crawl_runs_then_settles_and_reloads_results() {
    init_logging();
    let state = open_editor(AppState::new(), sample_catalog());

    let (state, effects) = update(state, Msg::CrawlRequested);
    assert_eq!(
        effects,
        vec![Effect::StartCrawl {
            keywords: vec!["nike".to_string()]
        }]
    );
    assert_eq!(state.crawl(), CrawlState::Running);

    // A second request while running is rejected.
    let (state, effects) = update(state, Msg::CrawlRequested);
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::CrawlFinished {
            result: Ok(CrawlOutcome {
                message: Some("crawl done, 3 new ads".to_string()),
                new_results: Some(3),
            }),
        },
    );
    assert_eq!(effects, vec![Effect::LoadResults]);
    assert_eq!(state.crawl(), CrawlState::Settling(CRAWL_SETTLE_TICKS));
    assert!(state
        .notices()
        .iter()
        .any(|n| n.message == "crawl done, 3 new ads"));

    // The gauge resets to idle after the settle ticks elapse.
    let mut state = state;
    for _ in 0..CRAWL_SETTLE_TICKS {
        let (next, _) = update(state, Msg::Tick);
        state = next;
    }
    assert_eq!(state.crawl(), CrawlState::Idle);
}

#[test]
fn failed_crawl_resets_the_gauge() {
    init_logging();
    let state = open_editor(AppState::new(), sample_catalog());
    let (state, _) = update(state, Msg::CrawlRequested);
    let (state, effects) = update(
        state,
        Msg::CrawlFinished {
            result: Err(failure(RequestFailureKind::Application)),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.crawl(), CrawlState::Idle);
    assert_eq!(state.notices()[0].level, NoticeLevel::Error);
}

#[test]
fn record_deletion_is_applied_only_after_confirmation() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::RefreshRequested);
    let (state, _) = update(
        state,
        Msg::ResultsLoaded {
            result: Ok(sample_snapshot()),
        },
    );

    let landing = "https://shoes.example.com".to_string();
    let (state, effects) = update(
        state,
        Msg::DeleteRequested {
            landing_page: landing.clone(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::DeleteRecord {
            landing_page: landing.clone()
        }]
    );
    assert_eq!(state.results().len(), 1);

    // A repeat request for the same record is ignored while in flight.
    let (state, effects) = update(
        state,
        Msg::DeleteRequested {
            landing_page: landing.clone(),
        },
    );
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::RecordDeleted {
            landing_page: landing.clone(),
            result: Ok(()),
        },
    );
    assert!(state.results().is_empty());
}

#[test]
fn failed_deletion_keeps_the_record() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::RefreshRequested);
    let (state, _) = update(
        state,
        Msg::ResultsLoaded {
            result: Ok(sample_snapshot()),
        },
    );
    let landing = "https://shoes.example.com".to_string();
    let (state, _) = update(
        state,
        Msg::DeleteRequested {
            landing_page: landing.clone(),
        },
    );
    let (state, _) = update(
        state,
        Msg::RecordDeleted {
            landing_page: landing,
            result: Err(failure(RequestFailureKind::Http)),
        },
    );
    assert_eq!(state.results().len(), 1);
    assert_eq!(state.notices()[0].level, NoticeLevel::Error);
}

#[test]
fn notices_expire_after_their_ticks() {
    init_logging();
    let (mut state, _) = update(AppState::new(), Msg::CrawlRequested);
    assert_eq!(state.notices().len(), 1);

    for _ in 0..NOTICE_TICKS {
        let (next, _) = update(state, Msg::Tick);
        state = next;
    }
    assert!(state.notices().is_empty());
}
