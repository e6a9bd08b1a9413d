//! Platform logging initialization for adwatch_app.
//!
//! The terminal is owned by the TUI, so the default destination is a file:
//! `./adwatch.log` in the current working directory.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILENAME: &str = "./adwatch.log";

/// Initialize the global logger. With `to_file` set, logs go to
/// [`LOG_FILENAME`]; otherwise to the terminal (useful when debugging
/// headless pieces without the TUI running).
pub fn initialize(to_file: bool) {
    let level = LevelFilter::Info;
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let logger: Box<dyn SharedLogger> = if to_file {
        match create_file_logger(level, config) {
            Some(file_logger) => file_logger,
            None => return,
        }
    } else {
        TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
    };

    let _ = CombinedLogger::init(vec![logger]);
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let log_path = PathBuf::from(LOG_FILENAME);
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {log_path:?}: {err}");
            None
        }
    }
}
