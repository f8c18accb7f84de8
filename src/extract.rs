//! Locating the age inside the fetched page.
//!
//! The page layout is outside our control so the lookup is a pluggable
//! [`ExtractionStrategy`]. Extractors are pure: they never log and the same
//! input always gives the same result.

use std::{fmt::Display, sync::OnceLock};

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

use crate::{utils::normalize_whitespace, Age};

/// Word that must appear in the element holding the age
pub const AGE_LABEL: &str = "Age";

const DEFAULT_SELECTOR: &str = "div.driver-info p";

/// How many levels above the text node containing the label are searched
const YEARS_OLD_MAX_DEPTH: usize = 3;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("age element not found: {0}")]
    ElementNotFound(String),
    #[error("no age number in {0:?}")]
    NoNumber(String),
    #[error("invalid selector {0:?}")]
    InvalidSelector(String),
}

pub trait AgeExtractor {
    fn extract_age(&self, html: &str) -> Result<Age, ExtractError>;
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Take the first element matching `selector` whose text contains "Age"
    /// and keep only its digits
    SelectorDigits {
        #[serde(default = "default_selector")]
        selector: String,
    },

    /// Find the text containing "Age" and match "<n> years old" around it
    YearsOld,
}

fn default_selector() -> String {
    DEFAULT_SELECTOR.to_string()
}

impl Default for ExtractionStrategy {
    fn default() -> Self {
        Self::SelectorDigits {
            selector: default_selector(),
        }
    }
}

impl Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionStrategy::SelectorDigits { selector } => {
                write!(f, "digits in {selector:?}")
            }
            ExtractionStrategy::YearsOld => write!(f, "\"years old\" pattern"),
        }
    }
}

impl ExtractionStrategy {
    pub fn build(&self) -> Result<Box<dyn AgeExtractor>, ExtractError> {
        Ok(match self {
            ExtractionStrategy::SelectorDigits { selector } => {
                Box::new(SelectorDigits::new(selector)?)
            }
            ExtractionStrategy::YearsOld => Box::new(YearsOld),
        })
    }
}

/// Convenience for callers that only care whether an age was found
pub fn extract_age(strategy: &ExtractionStrategy, html: &str) -> Option<Age> {
    strategy.build().ok()?.extract_age(html).ok()
}

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

#[derive(Debug)]
pub struct SelectorDigits {
    source: String,
    selector: Selector,
}

impl SelectorDigits {
    pub fn new(selector: &str) -> Result<Self, ExtractError> {
        let parsed = Selector::parse(selector)
            .map_err(|e| ExtractError::InvalidSelector(format!("{selector}: {e}")))?;
        Ok(Self {
            source: selector.to_string(),
            selector: parsed,
        })
    }
}

impl AgeExtractor for SelectorDigits {
    fn extract_age(&self, html: &str) -> Result<Age, ExtractError> {
        let document = Html::parse_document(html);
        let text = document
            .select(&self.selector)
            .map(elem_text)
            .find(|text| text.contains(AGE_LABEL))
            .ok_or_else(|| {
                ExtractError::ElementNotFound(format!(
                    "nothing matching {:?} contains {AGE_LABEL:?}",
                    self.source
                ))
            })?;

        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(ExtractError::NoNumber(normalize_whitespace(&text).into()));
        }
        digits
            .parse()
            .map_err(|_| ExtractError::NoNumber(normalize_whitespace(&text).into()))
    }
}

#[derive(Debug, Default)]
pub struct YearsOld;

impl YearsOld {
    fn label_regex() -> &'static Regex {
        static CELL: OnceLock<Regex> = OnceLock::new();
        CELL.get_or_init(|| Regex::new(r"\bAge\b").expect("failed to compile regex"))
    }

    fn years_old_regex() -> &'static Regex {
        static CELL: OnceLock<Regex> = OnceLock::new();
        CELL.get_or_init(|| {
            Regex::new(r"(?i)(\d+)\s*years?\s+old").expect("failed to compile regex")
        })
    }
}

impl AgeExtractor for YearsOld {
    fn extract_age(&self, html: &str) -> Result<Age, ExtractError> {
        let document = Html::parse_document(html);

        let label_node = document
            .root_element()
            .descendants()
            .filter(|node| {
                // Text in scripts and styles is never visible on the page
                !node
                    .parent()
                    .and_then(ElementRef::wrap)
                    .is_some_and(|e| matches!(e.value().name(), "script" | "style"))
            })
            .find(|node| {
                node.value()
                    .as_text()
                    .is_some_and(|text| Self::label_regex().is_match(text))
            })
            .ok_or_else(|| {
                ExtractError::ElementNotFound(format!("no text contains {AGE_LABEL:?}"))
            })?;

        let mut nearest_text = None;
        for element in label_node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .take(YEARS_OLD_MAX_DEPTH)
        {
            let text = elem_text(element);
            let text = normalize_whitespace(&text);
            if let Some(captures) = Self::years_old_regex().captures(&text) {
                // Group 1 is not optional so always present on a match
                let number = &captures[1];
                return number
                    .parse()
                    .map_err(|_| ExtractError::NoNumber(number.to_string()));
            }
            nearest_text.get_or_insert_with(|| text.into_owned());
        }

        Err(ExtractError::NoNumber(nearest_text.unwrap_or_default()))
    }
}
