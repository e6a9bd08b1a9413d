use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use adwatch_core::{Catalog, CrawlOutcome, ResultsSnapshot};

use crate::{ApiError, MonitorBackend};

enum ApiCommand {
    LoadResults,
    LoadCatalog,
    SaveCatalog(Catalog),
    StartCrawl(Vec<String>),
    DeleteRecord(String),
    ExpandCategory(String),
}

/// Completion of a backend call, polled by the UI loop.
#[derive(Debug)]
pub enum ApiEvent {
    ResultsLoaded {
        result: Result<ResultsSnapshot, ApiError>,
    },
    CatalogLoaded {
        result: Result<Catalog, ApiError>,
    },
    CatalogSaved {
        result: Result<(), ApiError>,
    },
    CrawlFinished {
        result: Result<CrawlOutcome, ApiError>,
    },
    RecordDeleted {
        landing_page: String,
        result: Result<(), ApiError>,
    },
    CategoryExpanded {
        category: String,
        result: Result<Vec<String>, ApiError>,
    },
}

/// Bridges the synchronous UI and the async backend: commands go in over a
/// channel, a dedicated thread drives them on a tokio runtime, completions
/// come back as [`ApiEvent`]s.
///
/// Clones share the command and event channels, so one clone can submit
/// commands while another drains events.
#[derive(Clone)]
pub struct ApiHandle {
    cmd_tx: mpsc::Sender<ApiCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<ApiEvent>>>,
}

impl ApiHandle {
    pub fn new(backend: Arc<dyn MonitorBackend>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(backend.as_ref(), command, event_tx).await;
                });
            }
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    pub fn load_results(&self) {
        let _ = self.cmd_tx.send(ApiCommand::LoadResults);
    }

    pub fn load_catalog(&self) {
        let _ = self.cmd_tx.send(ApiCommand::LoadCatalog);
    }

    pub fn save_catalog(&self, catalog: Catalog) {
        let _ = self.cmd_tx.send(ApiCommand::SaveCatalog(catalog));
    }

    pub fn start_crawl(&self, keywords: Vec<String>) {
        let _ = self.cmd_tx.send(ApiCommand::StartCrawl(keywords));
    }

    pub fn delete_record(&self, landing_page: impl Into<String>) {
        let _ = self
            .cmd_tx
            .send(ApiCommand::DeleteRecord(landing_page.into()));
    }

    pub fn expand_category(&self, category: impl Into<String>) {
        let _ = self
            .cmd_tx
            .send(ApiCommand::ExpandCategory(category.into()));
    }

    pub fn try_recv(&self) -> Option<ApiEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }
}

async fn handle_command(
    backend: &dyn MonitorBackend,
    command: ApiCommand,
    event_tx: mpsc::Sender<ApiEvent>,
) {
    let event = match command {
        ApiCommand::LoadResults => ApiEvent::ResultsLoaded {
            result: backend.fetch_results().await,
        },
        ApiCommand::LoadCatalog => ApiEvent::CatalogLoaded {
            result: backend.fetch_catalog().await,
        },
        ApiCommand::SaveCatalog(catalog) => ApiEvent::CatalogSaved {
            result: backend.save_catalog(&catalog).await,
        },
        ApiCommand::StartCrawl(keywords) => ApiEvent::CrawlFinished {
            result: backend.start_crawl(&keywords).await,
        },
        ApiCommand::DeleteRecord(landing_page) => {
            let result = backend.delete_record(&landing_page).await;
            ApiEvent::RecordDeleted {
                landing_page,
                result,
            }
        }
        ApiCommand::ExpandCategory(category) => {
            let result = backend.expand_keywords(&category).await;
            ApiEvent::CategoryExpanded { category, result }
        }
    };
    let _ = event_tx.send(event);
}
