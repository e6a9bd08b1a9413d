//! Application shell: owns the core state, the terminal, and the event loop.
//!
//! The shell is the only place `update` runs. Crossterm events become
//! semantic UI events, UI events become core messages, and returned effects
//! go to the [`EffectRunner`]; completions come back over the message
//! channel and are dispatched the same way.

use std::io;
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use client_logging::{client_info, client_warn};
use crossterm::event as ct_event;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use adwatch_api::MonitorApi;
use adwatch_core::{update, AppState, AppViewModel, Msg};

use super::config;
use super::effects::EffectRunner;
use super::event::{self, Direction, UiEvent};
use super::logging;
use super::ui::{self, render, EditorRow, Focus, Prompt, PromptKind, UiState};

pub fn run_app() -> anyhow::Result<()> {
    let cfg = config::load(Path::new(config::CONFIG_FILENAME));
    logging::initialize(cfg.log_to_file);
    client_info!("adwatch starting against {}", cfg.base_url);

    let api = Arc::new(
        MonitorApi::new(&cfg.base_url, cfg.retry_policy()).context("build backend client")?,
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(api.clone(), msg_tx.clone());

    // Background tick to expire notices and settle the crawl gauge.
    thread::spawn(move || {
        let interval = Duration::from_millis(75);
        while msg_tx.send(Msg::Tick).is_ok() {
            thread::sleep(interval);
        }
    });

    App::new(api, runner, msg_rx).run()
}

struct App {
    api: Arc<MonitorApi>,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
    state: AppState,
    view: AppViewModel,
    ui: UiState,
    quit: bool,
}

impl App {
    fn new(api: Arc<MonitorApi>, runner: EffectRunner, msg_rx: mpsc::Receiver<Msg>) -> Self {
        Self {
            api,
            runner,
            msg_rx,
            state: AppState::new(),
            view: AppViewModel::default(),
            ui: UiState::new(),
            quit: false,
        }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on
    /// exit.
    fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore the terminal, even if the loop returned an error.
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        self.dispatch(Msg::RefreshRequested);

        let mut needs_render = true;
        loop {
            while let Ok(msg) = self.msg_rx.try_recv() {
                self.dispatch(msg);
            }
            if self.state.consume_dirty() {
                self.view = self.state.view();
                self.clamp_selection();
                needs_render = true;
            }

            if needs_render {
                terminal.draw(|frame| render::draw(frame, &self.view, &self.ui))?;
                needs_render = false;
            }

            if self.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(25))? {
                let raw = ct_event::read()?;
                if self.handle_raw(raw) {
                    needs_render = true;
                }
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        if !effects.is_empty() {
            self.runner.enqueue(effects);
        }
    }

    /// Returns true when the screen needs a redraw for a UI-only change.
    fn handle_raw(&mut self, raw: ct_event::Event) -> bool {
        if let ct_event::Event::Key(key) = &raw {
            if key.kind != ct_event::KeyEventKind::Press {
                return false;
            }
        }

        // Text entry (prompt or search box) uses the insert-mode mapping so
        // shortcut letters type normally.
        let insert = self.ui.prompt.is_some()
            || (self.view.editor.is_none() && self.ui.focus == Focus::Search);
        let mapped = if insert {
            event::to_ui_event_insert(&raw)
        } else {
            event::to_ui_event(&raw)
        };
        let Some(ev) = mapped else {
            return false;
        };
        if ev == UiEvent::Resize {
            return true;
        }

        if self.ui.prompt.is_some() {
            self.handle_prompt_event(ev)
        } else if self.view.editor.is_some() {
            self.handle_editor_event(ev)
        } else if self.ui.focus == Focus::Search {
            self.handle_search_event(ev)
        } else {
            self.handle_main_event(ev)
        }
    }

    fn handle_main_event(&mut self, ev: UiEvent) -> bool {
        match ev {
            UiEvent::Quit => {
                self.quit = true;
                true
            }
            UiEvent::Refresh => {
                self.dispatch(Msg::RefreshRequested);
                false
            }
            UiEvent::Crawl => {
                self.dispatch(Msg::CrawlRequested);
                false
            }
            UiEvent::OpenEditor => {
                self.ui.editor_row = 0;
                self.dispatch(Msg::EditorOpened);
                false
            }
            UiEvent::SearchFocus => {
                self.ui.focus = Focus::Search;
                true
            }
            UiEvent::CycleCategory => {
                let next = self.next_category();
                self.dispatch(Msg::CategorySelected(next));
                false
            }
            UiEvent::Nav(Direction::Up) => {
                self.ui.selected_card = self.ui.selected_card.saturating_sub(1);
                true
            }
            UiEvent::Nav(Direction::Down) => {
                if self.ui.selected_card + 1 < self.view.cards.len() {
                    self.ui.selected_card += 1;
                }
                true
            }
            UiEvent::Nav(Direction::Left) => {
                self.cycle_market(-1);
                false
            }
            UiEvent::Nav(Direction::Right) => {
                self.cycle_market(1);
                false
            }
            UiEvent::Delete => {
                let landing = self.selected_landing_page();
                if let Some(landing_page) = landing {
                    self.dispatch(Msg::DeleteRequested { landing_page });
                }
                false
            }
            UiEvent::OpenLink => {
                if let Some(landing_page) = self.selected_landing_page() {
                    open_in_browser(&landing_page);
                }
                false
            }
            UiEvent::OpenPreview => {
                if let Some(landing_page) = self.selected_landing_page() {
                    open_in_browser(&self.api.proxy_url(&landing_page));
                }
                false
            }
            UiEvent::Escape => {
                if !self.view.search.is_empty() {
                    self.dispatch(Msg::SearchCleared);
                }
                false
            }
            _ => false,
        }
    }

    fn handle_search_event(&mut self, ev: UiEvent) -> bool {
        match ev {
            UiEvent::Quit => {
                self.quit = true;
                true
            }
            UiEvent::Char(c) => {
                let mut text = self.view.search.clone();
                text.push(c);
                self.dispatch(Msg::SearchChanged(text));
                false
            }
            UiEvent::Backspace => {
                let mut text = self.view.search.clone();
                text.pop();
                self.dispatch(Msg::SearchChanged(text));
                false
            }
            UiEvent::Enter | UiEvent::Escape => {
                self.ui.focus = Focus::Cards;
                true
            }
            _ => false,
        }
    }

    fn handle_editor_event(&mut self, ev: UiEvent) -> bool {
        let Some(editor) = &self.view.editor else {
            return false;
        };
        let rows = ui::editor_rows(editor);

        match ev {
            UiEvent::Quit | UiEvent::Escape => {
                self.dispatch(Msg::EditorClosed);
                false
            }
            UiEvent::Nav(Direction::Up) => {
                self.ui.editor_row = self.ui.editor_row.saturating_sub(1);
                true
            }
            UiEvent::Nav(Direction::Down) => {
                if self.ui.editor_row + 1 < rows.len() {
                    self.ui.editor_row += 1;
                }
                true
            }
            UiEvent::Toggle => {
                match rows.get(self.ui.editor_row) {
                    Some(EditorRow::Category { name, .. }) => {
                        let category = name.clone();
                        self.dispatch(Msg::ToggleCategorySubmitted { category });
                    }
                    Some(EditorRow::Keyword { category, text, .. }) => {
                        let (category, keyword) = (category.clone(), text.clone());
                        self.dispatch(Msg::ToggleKeywordSubmitted { category, keyword });
                    }
                    None => {}
                }
                false
            }
            UiEvent::Delete => {
                match rows.get(self.ui.editor_row) {
                    Some(EditorRow::Category { name, .. }) => {
                        let category = name.clone();
                        self.dispatch(Msg::DeleteCategorySubmitted { category });
                    }
                    Some(EditorRow::Keyword { category, text, .. }) => {
                        let (category, keyword) = (category.clone(), text.clone());
                        self.dispatch(Msg::DeleteKeywordSubmitted { category, keyword });
                    }
                    None => {}
                }
                false
            }
            UiEvent::AddKeyword => {
                if let Some(row) = rows.get(self.ui.editor_row) {
                    self.ui.prompt = Some(Prompt::new(PromptKind::NewKeyword {
                        category: row.category().to_string(),
                    }));
                }
                true
            }
            UiEvent::BatchAdd => {
                if let Some(row) = rows.get(self.ui.editor_row) {
                    self.ui.prompt = Some(Prompt::new(PromptKind::BatchAdd {
                        category: row.category().to_string(),
                    }));
                }
                true
            }
            UiEvent::NewCategory => {
                self.ui.prompt = Some(Prompt::new(PromptKind::NewCategory));
                true
            }
            UiEvent::Expand => {
                if let Some(row) = rows.get(self.ui.editor_row) {
                    let category = row.category().to_string();
                    self.dispatch(Msg::ExpandRequested { category });
                }
                false
            }
            _ => false,
        }
    }

    fn handle_prompt_event(&mut self, ev: UiEvent) -> bool {
        match ev {
            UiEvent::Quit => {
                self.quit = true;
                true
            }
            UiEvent::Char(c) => {
                if let Some(prompt) = &mut self.ui.prompt {
                    prompt.input.push(c);
                }
                true
            }
            UiEvent::Backspace => {
                if let Some(prompt) = &mut self.ui.prompt {
                    prompt.input.pop();
                }
                true
            }
            UiEvent::Escape => {
                self.ui.prompt = None;
                true
            }
            UiEvent::Enter => {
                if let Some(prompt) = self.ui.prompt.take() {
                    self.submit_prompt(prompt);
                }
                true
            }
            _ => false,
        }
    }

    fn submit_prompt(&mut self, prompt: Prompt) {
        let stamp = Utc::now().to_rfc3339();
        let msg = match prompt.kind {
            PromptKind::NewCategory => Msg::AddCategorySubmitted {
                name: prompt.input.trim().to_string(),
                created_at: stamp,
            },
            PromptKind::NewKeyword { category } => Msg::AddKeywordSubmitted {
                category,
                text: prompt.input,
                added_at: stamp,
            },
            PromptKind::BatchAdd { category } => {
                let input = prompt
                    .input
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n");
                Msg::BatchAddSubmitted {
                    category,
                    input,
                    added_at: stamp,
                }
            }
        };
        self.dispatch(msg);
    }

    fn selected_landing_page(&self) -> Option<String> {
        self.view
            .cards
            .get(self.ui.selected_card)
            .map(|card| card.landing_page.clone())
    }

    fn cycle_market(&mut self, step: isize) {
        let tabs = &self.view.market_tabs;
        if tabs.is_empty() {
            return;
        }
        let current = tabs.iter().position(|tab| tab.active).unwrap_or(0);
        let next = (current as isize + step).rem_euclid(tabs.len() as isize) as usize;
        let code = tabs[next].code.clone();
        self.dispatch(Msg::MarketSelected(code));
    }

    /// Cycle the category filter: none → each catalog category → none.
    fn next_category(&self) -> Option<String> {
        let names: Vec<&String> = self.state.catalog().keys().collect();
        if names.is_empty() {
            return None;
        }
        match self.state.filter().category.as_ref() {
            None => Some(names[0].clone()),
            Some(current) => match names.iter().position(|name| *name == current) {
                Some(index) if index + 1 < names.len() => Some(names[index + 1].clone()),
                _ => None,
            },
        }
    }

    /// Keep cursors valid after the view shrinks (deletes, filter changes).
    fn clamp_selection(&mut self) {
        if self.view.cards.is_empty() {
            self.ui.selected_card = 0;
        } else if self.ui.selected_card >= self.view.cards.len() {
            self.ui.selected_card = self.view.cards.len() - 1;
        }

        if let Some(editor) = &self.view.editor {
            let rows = ui::editor_rows(editor).len();
            if rows == 0 {
                self.ui.editor_row = 0;
            } else if self.ui.editor_row >= rows {
                self.ui.editor_row = rows - 1;
            }
        }
    }
}

fn open_in_browser(url: &str) {
    if let Err(err) = webbrowser::open(url) {
        client_warn!("Failed to open {} in browser: {}", url, err);
    }
}

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}
