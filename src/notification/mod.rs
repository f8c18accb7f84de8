pub mod email;

use log::info;

use crate::Age;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("missing environment variable {0}")]
    MissingCredential(&'static str),
    #[error("invalid email address {address:?}: {source}")]
    Address {
        address: String,
        source: lettre::address::AddressError,
    },
    #[error("failed to build email: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

pub trait Notifier {
    fn notify(&self, age: Age) -> Result<(), NotifyError>;
}

/// Stands in for a real notifier when nothing should leave the machine
#[derive(Debug, Default)]
pub struct DryRun;

impl Notifier for DryRun {
    fn notify(&self, age: Age) -> Result<(), NotifyError> {
        info!(
            "DRY RUN - would have sent {:?}: {}",
            email::SUBJECT,
            email::Email::body(age)
        );
        Ok(())
    }
}
