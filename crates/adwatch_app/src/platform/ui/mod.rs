pub mod constants;
pub mod render;
pub mod timefmt;

use adwatch_core::EditorView;

/// Which region owns keyboard input on the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Cards,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    NewCategory,
    NewKeyword { category: String },
    BatchAdd { category: String },
}

/// An active single-line text prompt layered over the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }

    pub fn title(&self) -> String {
        match &self.kind {
            PromptKind::NewCategory => "New category".to_string(),
            PromptKind::NewKeyword { category } => format!("New keyword in \"{category}\""),
            PromptKind::BatchAdd { category } => {
                format!("Batch add to \"{category}\" (comma-separated)")
            }
        }
    }
}

/// Widget-local state: cursor positions and the active prompt. Everything
/// semantic lives in the core state; this is presentation only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiState {
    pub focus: Focus,
    pub selected_card: usize,
    pub editor_row: usize,
    pub prompt: Option<Prompt>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// One selectable line of the keyword editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorRow {
    Category {
        name: String,
        enabled: bool,
    },
    Keyword {
        category: String,
        text: String,
        enabled: bool,
    },
}

impl EditorRow {
    /// The category this row acts on.
    pub fn category(&self) -> &str {
        match self {
            EditorRow::Category { name, .. } => name,
            EditorRow::Keyword { category, .. } => category,
        }
    }
}

/// Flattens the editor view into its selectable rows: each category header
/// followed by its keywords.
pub fn editor_rows(editor: &EditorView) -> Vec<EditorRow> {
    let mut rows = Vec::new();
    for category in &editor.categories {
        rows.push(EditorRow::Category {
            name: category.name.clone(),
            enabled: category.enabled,
        });
        for keyword in &category.keywords {
            rows.push(EditorRow::Keyword {
                category: category.name.clone(),
                text: keyword.text.clone(),
                enabled: keyword.enabled,
            });
        }
    }
    rows
}
