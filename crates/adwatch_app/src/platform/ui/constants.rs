//! Labels, hints and layout constants for the terminal UI.

pub const TITLE_ADS: &str = "Ads";
pub const TITLE_SEARCH: &str = "Search";
pub const TITLE_EDITOR: &str = "Keywords";
pub const LABEL_ALL_MARKETS: &str = "All";

pub const MAIN_HINTS: &str =
    "q quit | r refresh | c crawl | e keywords | / search | h/l market | tab category | d delete | o open | p preview";
pub const EDITOR_HINTS: &str =
    "space toggle | d delete | a keyword | b batch | n category | x expand | esc close";

/// Editor popup size, in percent of the terminal.
pub const EDITOR_WIDTH_PCT: u16 = 70;
pub const EDITOR_HEIGHT_PCT: u16 = 70;
/// Prompt popup width, in columns.
pub const PROMPT_WIDTH: u16 = 60;
/// Crawl gauge width on the status line, in columns.
pub const GAUGE_WIDTH: u16 = 24;
/// At most this many notices are stacked on screen.
pub const MAX_NOTICES: usize = 5;
