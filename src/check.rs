use std::fmt::Display;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::{debug, error, info, warn};

use crate::{
    extract::{AgeExtractor, ExtractError},
    fetch::{FetchError, Fetcher},
    notification::{Notifier, NotifyError},
    utils::truncate_for_log,
    Age,
};

/// Longest piece of page text that is copied into a log line
const MAX_LOGGED_TEXT: usize = 200;

#[derive(Debug)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(timezone: Tz) -> Self {
        Self::at(Utc::now(), timezone)
    }

    pub fn at(instant: DateTime<Utc>, timezone: Tz) -> Self {
        Self(format!(
            "{}",
            instant.with_timezone(&timezone).format("%Y-%m-%d %H:%M:%S %Z")
        ))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happened during one check. Each stage's failure is kept as a value
/// so the caller can tell them apart.
#[derive(Debug)]
pub enum CheckOutcome {
    FetchFailed(FetchError),
    ExtractionFailed(ExtractError),
    /// Age was found but is not the one we are waiting for
    NoMatch(Age),
    Matched {
        age: Age,
        delivery: Result<(), NotifyError>,
    },
}

impl CheckOutcome {
    /// True if the age equalled the threshold, whether or not the email got out
    pub fn matched(&self) -> bool {
        matches!(self, CheckOutcome::Matched { .. })
    }

    pub fn notification_sent(&self) -> bool {
        matches!(self, CheckOutcome::Matched { delivery: Ok(()), .. })
    }

    pub fn age(&self) -> Option<Age> {
        match self {
            CheckOutcome::NoMatch(age) | CheckOutcome::Matched { age, .. } => Some(*age),
            CheckOutcome::FetchFailed(_) | CheckOutcome::ExtractionFailed(_) => None,
        }
    }
}

/// Runs fetch, extract and notify in order. This is the only place stage
/// results get logged.
pub struct AgeCheck {
    threshold: Age,
    timezone: Tz,
    fetcher: Box<dyn Fetcher>,
    extractor: Box<dyn AgeExtractor>,
    notifier: Box<dyn Notifier>,
}

impl AgeCheck {
    pub fn new(
        threshold: Age,
        fetcher: Box<dyn Fetcher>,
        extractor: Box<dyn AgeExtractor>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            threshold,
            timezone: chrono_tz::Europe::Budapest,
            fetcher,
            extractor,
            notifier,
        }
    }

    /// Zone used for the "Checking age at" line
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn run(&self) -> CheckOutcome {
        info!("Checking age at {}", Timestamp::new(self.timezone));

        let html = match self.fetcher.fetch() {
            Ok(html) => html,
            Err(e) => {
                error!("Error checking age: {e}");
                return CheckOutcome::FetchFailed(e);
            }
        };
        debug!("Fetched page of {} bytes", html.len());

        let age = match self.extractor.extract_age(&html) {
            Ok(age) => age,
            Err(e) => {
                let msg = e.to_string();
                warn!("Age not found on page: {}", truncate_for_log(&msg, MAX_LOGGED_TEXT));
                return CheckOutcome::ExtractionFailed(e);
            }
        };
        info!("Age found: {age}");

        if age != self.threshold {
            debug!("Age {age} is not {}, no email needed", self.threshold);
            return CheckOutcome::NoMatch(age);
        }

        let delivery = self.notifier.notify(age);
        match &delivery {
            Ok(()) => info!("Age is {age}, email sent successfully"),
            Err(e) => error!("Age is {age} but failed to send email: {e}"),
        }
        CheckOutcome::Matched { age, delivery }
    }
}
