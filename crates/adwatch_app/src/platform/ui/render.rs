//! View-model-driven drawing. Pure functions from [`AppViewModel`] and the
//! widget-local [`UiState`] to ratatui draw calls; no app logic lives here.

use adwatch_core::{AppViewModel, EditorView, NoticeLevel};
use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Gauge, Paragraph},
    Frame,
};

use super::{constants, editor_rows, timefmt, EditorRow, Focus, Prompt, UiState};

pub fn draw(frame: &mut Frame, view: &AppViewModel, ui: &UiState) {
    let area = frame.area();

    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    draw_market_tabs(frame, vert[0], view);
    draw_cards(frame, vert[1], view, ui);
    draw_search(frame, vert[2], view, ui);
    draw_status(frame, vert[3], view);

    if let Some(editor) = &view.editor {
        draw_editor(frame, area, editor, ui);
    }
    if let Some(prompt) = &ui.prompt {
        draw_prompt(frame, area, prompt);
    }
    draw_notices(frame, area, view);
}

fn draw_market_tabs(frame: &mut Frame, area: Rect, view: &AppViewModel) {
    let mut spans = vec![Span::styled(
        " adwatch ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for tab in &view.market_tabs {
        let label = match &tab.code {
            Some(code) => code.as_str(),
            None => constants::LABEL_ALL_MARKETS,
        };
        let style = if tab.active {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Cyan)
        };
        spans.push(Span::styled(format!(" {label} "), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_cards(frame: &mut Frame, area: Rect, view: &AppViewModel, ui: &UiState) {
    let block = Block::bordered().title(format!(
        "{} ({})",
        constants::TITLE_ADS,
        view.cards.len()
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.cards.is_empty() {
        let hint = if view.stats.total_ads == 0 {
            "No ads yet. Press r to refresh or c to crawl."
        } else {
            "No ads match the active filters."
        };
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().add_modifier(Modifier::DIM)),
            inner,
        );
        return;
    }

    let now = Utc::now();
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut selected_start = 0usize;
    for (index, card) in view.cards.iter().enumerate() {
        if index == ui.selected_card {
            selected_start = lines.len();
        }
        let selected = index == ui.selected_card;
        let mut card_lines = Vec::new();

        let mut header = vec![
            Span::styled(
                card.domain.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                card.landing_page.clone(),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ];
        if card.deleting {
            header.push(Span::styled(
                "  (deleting…)",
                Style::default().fg(Color::Red),
            ));
        }
        card_lines.push(Line::from(header));

        for record in &card.records {
            card_lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("[{}]", record.keyword),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!(" {} ", record.market),
                    Style::default().fg(Color::Green),
                ),
                Span::raw(record.title.clone()),
                Span::styled(
                    format!("  {}", timefmt::format_relative(&record.timestamp, now)),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ]));
            if !record.description.is_empty() {
                card_lines.push(Line::from(Span::styled(
                    format!("      {}", record.description),
                    Style::default().add_modifier(Modifier::DIM),
                )));
            }
        }

        if selected {
            card_lines = card_lines
                .into_iter()
                .map(|line| line.patch_style(Style::default().add_modifier(Modifier::REVERSED)))
                .collect();
        }
        lines.extend(card_lines);
        lines.push(Line::default());
    }

    // Keep the selected card roughly centered in the viewport.
    let height = inner.height as usize;
    let offset = selected_start.saturating_sub(height / 2);
    frame.render_widget(Paragraph::new(lines).scroll((offset as u16, 0)), inner);
}

fn draw_search(frame: &mut Frame, area: Rect, view: &AppViewModel, ui: &UiState) {
    let focused = ui.focus == Focus::Search && view.editor.is_none();
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    let block = Block::bordered()
        .title(constants::TITLE_SEARCH)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(view.search.clone()), inner);

    if focused && ui.prompt.is_none() {
        let col = inner.x + view.search.chars().count() as u16;
        frame.set_cursor_position((col.min(inner.right().saturating_sub(1)), inner.y));
    }
}

fn draw_status(frame: &mut Frame, area: Rect, view: &AppViewModel) {
    let stats = &view.stats;
    let mut text = format!(
        "Keywords: {} | Ads: {}/{}",
        stats.total_keywords, stats.shown_ads, stats.total_ads
    );
    if let Some(updated) = &stats.last_updated {
        text.push_str(&format!(" | Updated: {updated}"));
    }
    if let Some(category) = &view.selected_category {
        text.push_str(&format!(" | Category: {category}"));
    }
    if stats.loading {
        text.push_str(" | loading…");
    }

    let crawl_active = view.crawl.running || view.crawl.percent.is_some();
    if crawl_active {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(constants::GAUGE_WIDTH),
            ])
            .split(area);
        frame.render_widget(Paragraph::new(text), chunks[0]);

        let (percent, label) = match view.crawl.percent {
            Some(done) => (done as u16, format!("{done}%")),
            None => (0, "crawling…".to_string()),
        };
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(Color::Green))
                .percent(percent)
                .label(label),
            chunks[1],
        );
    } else {
        let hints = if view.editor.is_some() {
            constants::EDITOR_HINTS
        } else {
            constants::MAIN_HINTS
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw(text),
                Span::raw("   "),
                Span::styled(hints, Style::default().add_modifier(Modifier::DIM)),
            ])),
            area,
        );
    }
}

fn draw_editor(frame: &mut Frame, area: Rect, editor: &EditorView, ui: &UiState) {
    let popup = centered_rect(
        area,
        constants::EDITOR_WIDTH_PCT,
        constants::EDITOR_HEIGHT_PCT,
    );
    frame.render_widget(Clear, popup);

    let mut title = constants::TITLE_EDITOR.to_string();
    if editor.loading {
        title.push_str(" — loading…");
    }
    if editor.saving {
        title.push_str(" — saving…");
    }
    let block = Block::bordered().title(title);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(1)])
        .split(inner);

    let rows = editor_rows(editor);
    if rows.is_empty() && !editor.loading {
        frame.render_widget(
            Paragraph::new("No categories yet. Press n to add one.")
                .style(Style::default().add_modifier(Modifier::DIM)),
            chunks[0],
        );
    } else {
        let lines: Vec<Line<'static>> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let mut line = editor_row_line(row);
                if index == ui.editor_row {
                    line = line.patch_style(Style::default().add_modifier(Modifier::REVERSED));
                }
                line
            })
            .collect();
        let height = chunks[0].height as usize;
        let offset = ui.editor_row.saturating_sub(height.saturating_sub(1));
        frame.render_widget(Paragraph::new(lines).scroll((offset as u16, 0)), chunks[0]);
    }

    frame.render_widget(
        Paragraph::new(constants::EDITOR_HINTS)
            .style(Style::default().add_modifier(Modifier::DIM)),
        chunks[1],
    );
}

fn editor_row_line(row: &EditorRow) -> Line<'static> {
    match row {
        EditorRow::Category { name, enabled } => Line::from(vec![
            Span::styled(
                name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                if *enabled { "  [on]" } else { "  [off]" },
                Style::default().fg(if *enabled { Color::Green } else { Color::Red }),
            ),
        ]),
        EditorRow::Keyword { text, enabled, .. } => {
            let style = if *enabled {
                Style::default()
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            Line::from(vec![
                Span::styled(format!("  {text}"), style),
                Span::styled(
                    if *enabled { "  [on]" } else { "  [off]" },
                    Style::default().fg(if *enabled { Color::Green } else { Color::Red }),
                ),
            ])
        }
    }
}

fn draw_prompt(frame: &mut Frame, area: Rect, prompt: &Prompt) {
    let width = constants::PROMPT_WIDTH.min(area.width.saturating_sub(4));
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + area.height / 2,
        width,
        height: 3,
    };
    frame.render_widget(Clear, popup);
    let block = Block::bordered().title(prompt.title());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    frame.render_widget(Paragraph::new(prompt.input.clone()), inner);

    let col = inner.x + prompt.input.chars().count() as u16;
    frame.set_cursor_position((col.min(inner.right().saturating_sub(1)), inner.y));
}

fn draw_notices(frame: &mut Frame, area: Rect, view: &AppViewModel) {
    if view.notices.is_empty() {
        return;
    }

    let shown = view
        .notices
        .iter()
        .rev()
        .take(constants::MAX_NOTICES)
        .collect::<Vec<_>>();
    let width = shown
        .iter()
        .map(|notice| notice.message.chars().count() + 4)
        .max()
        .unwrap_or(0)
        .min(area.width.saturating_sub(2) as usize) as u16;
    let height = shown.len() as u16;
    let rect = Rect {
        x: area.right().saturating_sub(width + 1),
        y: area.y + 1,
        width,
        height,
    };

    frame.render_widget(Clear, rect);
    let lines: Vec<Line<'static>> = shown
        .iter()
        .map(|notice| {
            let (color, prefix) = match notice.level {
                NoticeLevel::Success => (Color::Green, "✓"),
                NoticeLevel::Error => (Color::Red, "✗"),
                NoticeLevel::Warning => (Color::Yellow, "!"),
                NoticeLevel::Info => (Color::Cyan, "·"),
            };
            Line::from(Span::styled(
                format!(" {prefix} {} ", notice.message),
                Style::default().fg(color).add_modifier(Modifier::REVERSED),
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), rect);
}

fn centered_rect(area: Rect, width_pct: u16, height_pct: u16) -> Rect {
    let width = area.width * width_pct / 100;
    let height = area.height * height_pct / 100;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
