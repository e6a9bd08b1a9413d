use crate::catalog::{self, CatalogError};
use crate::model::Catalog;
use crate::state::{AppState, CrawlState, EditorState, NoticeLevel};
use crate::{Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::RefreshRequested => {
            if state.is_loading_results() {
                Vec::new()
            } else {
                state.begin_results_load();
                vec![Effect::LoadResults, Effect::LoadCatalog]
            }
        }
        Msg::SearchChanged(text) => {
            state.set_search(text);
            Vec::new()
        }
        Msg::SearchCleared => {
            state.set_search(String::new());
            Vec::new()
        }
        Msg::MarketSelected(market) => {
            state.set_market(market);
            Vec::new()
        }
        Msg::CategorySelected(category) => {
            state.set_category(category);
            Vec::new()
        }
        Msg::CrawlRequested => {
            if state.crawl() != CrawlState::Idle {
                state.push_notice(NoticeLevel::Warning, "a crawl is already running");
                return (state, Vec::new());
            }
            let keywords = catalog::enabled_keywords(state.catalog());
            if keywords.is_empty() {
                state.push_notice(NoticeLevel::Warning, "no enabled keywords to crawl");
                Vec::new()
            } else {
                state.begin_crawl();
                vec![Effect::StartCrawl { keywords }]
            }
        }
        Msg::CrawlFinished { result } => match result {
            Ok(outcome) => {
                state.settle_crawl();
                let message = outcome
                    .message
                    .unwrap_or_else(|| "crawl finished".to_string());
                state.push_notice(NoticeLevel::Success, message);
                state.begin_results_load();
                vec![Effect::LoadResults]
            }
            Err(failure) => {
                state.reset_crawl();
                state.push_notice(NoticeLevel::Error, failure.user_message());
                Vec::new()
            }
        },
        Msg::DeleteRequested { landing_page } => {
            if state.is_delete_pending(&landing_page) {
                Vec::new()
            } else {
                state.begin_delete(landing_page.clone());
                vec![Effect::DeleteRecord { landing_page }]
            }
        }
        Msg::RecordDeleted {
            landing_page,
            result,
        } => {
            state.finish_delete(&landing_page);
            match result {
                Ok(()) => {
                    state.remove_result(&landing_page);
                    state.push_notice(NoticeLevel::Success, "record deleted");
                }
                Err(failure) => {
                    state.push_notice(NoticeLevel::Error, failure.user_message());
                }
            }
            Vec::new()
        }
        Msg::EditorOpened => {
            if state.editor() == EditorState::Closed {
                state.open_editor();
                vec![Effect::LoadCatalog]
            } else {
                Vec::new()
            }
        }
        Msg::EditorClosed => {
            state.close_editor();
            Vec::new()
        }
        Msg::ResultsLoaded { result } => {
            state.finish_results_load();
            match result {
                Ok(snapshot) => state.set_results(snapshot),
                Err(failure) => {
                    state.push_notice(NoticeLevel::Error, failure.user_message());
                }
            }
            Vec::new()
        }
        Msg::CatalogLoaded { result } => {
            match result {
                Ok(loaded) => {
                    state.set_catalog(loaded);
                    state.finish_editor_open();
                }
                Err(failure) => {
                    state.push_notice(NoticeLevel::Error, failure.user_message());
                    state.abort_editor_open();
                }
            }
            Vec::new()
        }
        Msg::AddCategorySubmitted { name, created_at } => submit_edit(&mut state, |current| {
            catalog::add_category(current, &name, Some(created_at.clone()))
                .map(|candidate| (candidate, format!("category \"{}\" added", name.trim())))
        }),
        Msg::DeleteCategorySubmitted { category } => submit_edit(&mut state, |current| {
            catalog::delete_category(current, &category)
                .map(|candidate| (candidate, format!("category \"{category}\" deleted")))
        }),
        Msg::ToggleCategorySubmitted { category } => submit_edit(&mut state, |current| {
            catalog::toggle_category(current, &category)
                .map(|candidate| (candidate, format!("category \"{category}\" updated")))
        }),
        Msg::AddKeywordSubmitted {
            category,
            text,
            added_at,
        } => submit_edit(&mut state, |current| {
            catalog::add_keyword(current, &category, &text, Some(added_at.clone()))
                .map(|candidate| (candidate, format!("keyword \"{}\" added", text.trim())))
        }),
        Msg::DeleteKeywordSubmitted { category, keyword } => submit_edit(&mut state, |current| {
            catalog::delete_keyword(current, &category, &keyword)
                .map(|candidate| (candidate, format!("keyword \"{keyword}\" deleted")))
        }),
        Msg::ToggleKeywordSubmitted { category, keyword } => submit_edit(&mut state, |current| {
            catalog::toggle_keyword(current, &category, &keyword)
                .map(|candidate| (candidate, format!("keyword \"{keyword}\" updated")))
        }),
        Msg::BatchAddSubmitted {
            category,
            input,
            added_at,
        } => submit_batch(&mut state, &category, &input, Some(added_at)),
        Msg::ExpandRequested { category } => {
            if state.editor() != EditorState::Open {
                Vec::new()
            } else if state.is_save_pending() {
                state.push_notice(NoticeLevel::Warning, "a save is already in progress");
                Vec::new()
            } else if !state.catalog().contains_key(&category) {
                state.push_notice(
                    NoticeLevel::Error,
                    CatalogError::UnknownCategory(category).to_string(),
                );
                Vec::new()
            } else {
                vec![Effect::ExpandCategory { category }]
            }
        }
        Msg::CategoryExpanded {
            category,
            suggested_at,
            result,
        } => match result {
            Ok(suggestions) => {
                let input = suggestions.join("\n");
                if input.is_empty() {
                    state.push_notice(NoticeLevel::Info, "no keyword suggestions returned");
                    Vec::new()
                } else {
                    submit_batch(&mut state, &category, &input, Some(suggested_at))
                }
            }
            Err(failure) => {
                state.push_notice(NoticeLevel::Error, failure.user_message());
                Vec::new()
            }
        },
        Msg::CatalogSaved { result } => {
            if let Some(pending) = state.take_pending_save() {
                match result {
                    Ok(()) => {
                        state.set_catalog(pending.candidate);
                        state.push_notice(NoticeLevel::Success, pending.success_notice);
                    }
                    Err(failure) => {
                        state.push_notice(NoticeLevel::Error, failure.user_message());
                    }
                }
            }
            Vec::new()
        }
        Msg::Tick => {
            state.tick();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Shared protocol for catalog mutations: validate and build a candidate,
/// then persist it. The candidate is committed by `CatalogSaved`, never here.
fn submit_edit<F>(state: &mut AppState, build: F) -> Vec<Effect>
where
    F: FnOnce(&Catalog) -> Result<(Catalog, String), CatalogError>,
{
    if state.editor() != EditorState::Open {
        return Vec::new();
    }
    if state.is_save_pending() {
        state.push_notice(NoticeLevel::Warning, "a save is already in progress");
        return Vec::new();
    }
    match build(state.catalog()) {
        Ok((candidate, success_notice)) => {
            state.begin_save(candidate.clone(), success_notice);
            vec![Effect::SaveCatalog { catalog: candidate }]
        }
        Err(err) => {
            state.push_notice(NoticeLevel::Error, err.to_string());
            Vec::new()
        }
    }
}

/// Batch additions report `{added, skipped}`; when every keyword was a
/// duplicate there is nothing to persist and no save is issued.
fn submit_batch(
    state: &mut AppState,
    category: &str,
    input: &str,
    added_at: Option<String>,
) -> Vec<Effect> {
    if state.editor() != EditorState::Open {
        return Vec::new();
    }
    if state.is_save_pending() {
        state.push_notice(NoticeLevel::Warning, "a save is already in progress");
        return Vec::new();
    }
    match catalog::batch_add_keywords(state.catalog(), category, input, added_at) {
        Ok((_, outcome)) if outcome.added == 0 => {
            state.push_notice(NoticeLevel::Warning, "all keywords already exist");
            Vec::new()
        }
        Ok((candidate, outcome)) => {
            let notice = if outcome.skipped > 0 {
                format!(
                    "added {} keywords ({} duplicates skipped)",
                    outcome.added, outcome.skipped
                )
            } else {
                format!("added {} keywords", outcome.added)
            };
            state.begin_save(candidate.clone(), notice);
            vec![Effect::SaveCatalog { catalog: candidate }]
        }
        Err(err) => {
            state.push_notice(NoticeLevel::Error, err.to_string());
            Vec::new()
        }
    }
}
