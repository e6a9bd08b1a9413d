//! Semantic UI events — crossterm key events mapped to a widget-agnostic
//! vocabulary so the rest of the app never touches crossterm types.
//!
//! Two mappings exist: [`to_ui_event`] for navigation mode and
//! [`to_ui_event_insert`] for text entry (search box, prompts), where letters
//! that double as shortcuts must produce characters instead.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A semantic application event derived from a raw crossterm [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Quit,
    Refresh,
    Crawl,
    OpenEditor,
    SearchFocus,
    /// Cycle the category filter (none → each category → none).
    CycleCategory,
    /// Flip the enabled flag of the editor row under the cursor.
    Toggle,
    Delete,
    AddKeyword,
    BatchAdd,
    NewCategory,
    Expand,
    /// Open the selected ad's landing page in the system browser.
    OpenLink,
    /// Open the proxied preview of the selected ad in the system browser.
    OpenPreview,
    Nav(Direction),
    Char(char),
    Backspace,
    Enter,
    Escape,
    Resize,
}

/// Navigation-mode mapping. Returns `None` for events with no binding.
pub fn to_ui_event(event: &Event) -> Option<UiEvent> {
    match event {
        Event::Resize(_, _) => Some(UiEvent::Resize),
        Event::Key(key) => map_key(key),
        _ => None,
    }
}

/// Text-entry mapping: printable characters are forwarded verbatim and only
/// `Ctrl+c`, `Escape`, `Enter`, `Backspace` and the arrow keys keep special
/// bindings.
pub fn to_ui_event_insert(event: &Event) -> Option<UiEvent> {
    match event {
        Event::Resize(_, _) => Some(UiEvent::Resize),
        Event::Key(key) => map_key_insert(key),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Option<UiEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('q') if key.modifiers == Mod::NONE => Some(UiEvent::Quit),
        Char('c') if key.modifiers == Mod::CONTROL => Some(UiEvent::Quit),

        Char('r') if key.modifiers == Mod::NONE => Some(UiEvent::Refresh),
        Char('c') if key.modifiers == Mod::NONE => Some(UiEvent::Crawl),
        Char('e') if key.modifiers == Mod::NONE => Some(UiEvent::OpenEditor),
        Char('/') if key.modifiers == Mod::NONE => Some(UiEvent::SearchFocus),
        Tab if key.modifiers == Mod::NONE => Some(UiEvent::CycleCategory),

        Char(' ') if key.modifiers == Mod::NONE => Some(UiEvent::Toggle),
        Char('d') if key.modifiers == Mod::NONE => Some(UiEvent::Delete),
        Char('a') if key.modifiers == Mod::NONE => Some(UiEvent::AddKeyword),
        Char('b') if key.modifiers == Mod::NONE => Some(UiEvent::BatchAdd),
        Char('n') if key.modifiers == Mod::NONE => Some(UiEvent::NewCategory),
        Char('x') if key.modifiers == Mod::NONE => Some(UiEvent::Expand),
        Char('o') if key.modifiers == Mod::NONE => Some(UiEvent::OpenLink),
        Char('p') if key.modifiers == Mod::NONE => Some(UiEvent::OpenPreview),

        Up | Char('k') if key.modifiers == Mod::NONE => Some(UiEvent::Nav(Direction::Up)),
        Down | Char('j') if key.modifiers == Mod::NONE => Some(UiEvent::Nav(Direction::Down)),
        Left | Char('h') if key.modifiers == Mod::NONE => Some(UiEvent::Nav(Direction::Left)),
        Right | Char('l') if key.modifiers == Mod::NONE => Some(UiEvent::Nav(Direction::Right)),

        Backspace if key.modifiers == Mod::NONE => Some(UiEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(UiEvent::Enter),
        Esc => Some(UiEvent::Escape),

        _ => None,
    }
}

fn map_key_insert(key: &KeyEvent) -> Option<UiEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        // Ctrl+c always quits, even while typing.
        Char('c') if key.modifiers == Mod::CONTROL => Some(UiEvent::Quit),

        Up => Some(UiEvent::Nav(Direction::Up)),
        Down => Some(UiEvent::Nav(Direction::Down)),
        Left => Some(UiEvent::Nav(Direction::Left)),
        Right => Some(UiEvent::Nav(Direction::Right)),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(UiEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(UiEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(UiEvent::Enter),
        Esc => Some(UiEvent::Escape),

        _ => None,
    }
}
