use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use adwatch_api::{ApiError, ApiEvent, ApiHandle, ErrorKind, MonitorBackend};
use adwatch_core::{Effect, Msg, RequestFailure, RequestFailureKind};
use chrono::Utc;
use client_logging::{client_info, client_warn};

/// Executes core [`Effect`]s against the backend and feeds completions back
/// into the message channel.
pub struct EffectRunner {
    api: ApiHandle,
}

impl EffectRunner {
    pub fn new(backend: Arc<dyn MonitorBackend>, msg_tx: mpsc::Sender<Msg>) -> Self {
        let api = ApiHandle::new(backend);
        let runner = Self { api };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadResults => {
                    client_info!("LoadResults");
                    self.api.load_results();
                }
                Effect::LoadCatalog => {
                    client_info!("LoadCatalog");
                    self.api.load_catalog();
                }
                Effect::SaveCatalog { catalog } => {
                    client_info!("SaveCatalog categories={}", catalog.len());
                    self.api.save_catalog(catalog);
                }
                Effect::StartCrawl { keywords } => {
                    client_info!("StartCrawl keywords={}", keywords.len());
                    self.api.start_crawl(keywords);
                }
                Effect::DeleteRecord { landing_page } => {
                    client_info!("DeleteRecord url={}", landing_page);
                    self.api.delete_record(landing_page);
                }
                Effect::ExpandCategory { category } => {
                    client_info!("ExpandCategory category={}", category);
                    self.api.expand_category(category);
                }
            }
        }
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let api = self.api.clone();
        thread::spawn(move || loop {
            if let Some(event) = api.try_recv() {
                if msg_tx.send(map_event(event)).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn map_event(event: ApiEvent) -> Msg {
    match event {
        ApiEvent::ResultsLoaded { result } => Msg::ResultsLoaded {
            result: result.map_err(map_failure),
        },
        ApiEvent::CatalogLoaded { result } => Msg::CatalogLoaded {
            result: result.map_err(map_failure),
        },
        ApiEvent::CatalogSaved { result } => Msg::CatalogSaved {
            result: result.map_err(map_failure),
        },
        ApiEvent::CrawlFinished { result } => Msg::CrawlFinished {
            result: result.map_err(map_failure),
        },
        ApiEvent::RecordDeleted {
            landing_page,
            result,
        } => Msg::RecordDeleted {
            landing_page,
            result: result.map_err(map_failure),
        },
        ApiEvent::CategoryExpanded { category, result } => Msg::CategoryExpanded {
            category,
            suggested_at: Utc::now().to_rfc3339(),
            result: result.map_err(map_failure),
        },
    }
}

fn map_failure(err: ApiError) -> RequestFailure {
    client_warn!("backend request failed: {}", err);
    let kind = match err.kind {
        ErrorKind::Timeout => RequestFailureKind::Timeout,
        ErrorKind::Http(_) => RequestFailureKind::Http,
        ErrorKind::Network | ErrorKind::InvalidUrl => RequestFailureKind::Network,
        ErrorKind::Decode => RequestFailureKind::Decode,
        ErrorKind::Application => RequestFailureKind::Application,
    };
    RequestFailure::new(kind, err.message)
}
