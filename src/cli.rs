use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Parser, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default)]
#[command(
    author,
    version,
    about,
    long_about = "Checks a driver's age on their profile page and sends an email when it reaches the target.\n\n\
Email credentials are read from SENDER_EMAIL, SENDER_PASSWORD and RECEIVER_EMAIL (a .env file is also honoured). \
Meant to be run from a scheduler, always exits with 0."
)]
pub struct Cli {
    /// Specify config file to use
    ///
    /// If not specified the built in defaults are used
    #[arg(long = "config", short, value_name = "PATH")]
    pub config_filename: Option<PathBuf>,

    /// Set logging level to use
    #[arg(long, short, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Read the page from this file instead of fetching it
    #[arg(long, value_name = "PATH")]
    pub html_file: Option<PathBuf>,

    /// Log the email instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

/// Exists to provide better help messages variants copied from LevelFilter as
/// that's the type that is actually needed
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum LogLevel {
    /// Nothing emitted in this mode
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
