use std::{fmt::Display, str::FromStr, time::Duration};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, Clone, Copy)]
pub struct Age(u32);

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, Clone, Copy)]
pub struct Seconds(u64);

impl Display for Age {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Seconds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl From<u32> for Age {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl FromStr for Age {
    type Err = anyhow::Error;

    /// Expects only ascii digits, anything else (including an empty string) is an error
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .parse()
            .with_context(|| format!("Failed to parse age from {s:?}"))?;
        Ok(Self(value))
    }
}

impl From<u64> for Seconds {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Seconds> for Duration {
    fn from(value: Seconds) -> Self {
        Duration::from_secs(value.0)
    }
}
