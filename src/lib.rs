mod check;
mod cli;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod notification;
mod units;
mod utils;

use anyhow::Context;
use log::debug;

pub use check::{AgeCheck, CheckOutcome, Timestamp};
pub use cli::{Cli, LogLevel};
pub use config::{Config, EmailCredentials};
pub use units::{Age, Seconds};

use crate::{
    fetch::{FileFetcher, Fetcher, HttpFetcher},
    notification::{email::Email, DryRun, Notifier},
};

/// Runs a single check, returns true if the age matched the threshold
pub fn run(cli: &Cli, config: Config) -> anyhow::Result<bool> {
    debug!("Starting check with {config:?}");
    let credentials = EmailCredentials::from_env();
    debug!("Email credentials: {credentials:?}");

    let fetcher: Box<dyn Fetcher> = match &cli.html_file {
        Some(path) => {
            debug!("Reading page from {path:?}");
            Box::new(FileFetcher::new(path))
        }
        None => {
            let fetcher = HttpFetcher::new(&config).context("Failed to create HTTP client")?;
            debug!("Fetching {}", fetcher.url());
            Box::new(fetcher)
        }
    };

    let extractor = config
        .extraction
        .build()
        .with_context(|| format!("Failed to set up extraction using {}", config.extraction))?;

    let notifier: Box<dyn Notifier> = if cli.dry_run {
        Box::new(DryRun)
    } else {
        Box::new(Email::new(credentials, config.smtp.clone()))
    };

    let check = AgeCheck::new(config.age_threshold, fetcher, extractor, notifier)
        .with_timezone(config.timezone);
    Ok(check.run().matched())
}
