use std::time::Duration;

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};

use crate::{
    config::{EmailCredentials, SmtpConfig, RECEIVER_EMAIL_VAR, SENDER_EMAIL_VAR, SENDER_PASSWORD_VAR},
    Age,
};

use super::{NotifyError, Notifier};

pub const SUBJECT: &str = "Driver Age Update";

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends a plain text email over STARTTLS. Credentials are only checked when
/// a message is actually sent.
#[derive(Debug)]
pub struct Email {
    credentials: EmailCredentials,
    smtp: SmtpConfig,
}

impl Email {
    pub fn new(credentials: EmailCredentials, smtp: SmtpConfig) -> Self {
        Self { credentials, smtp }
    }

    pub fn body(age: Age) -> String {
        format!("The driver's age has changed to {age}!")
    }

    fn required<'a>(value: &'a Option<String>, var: &'static str) -> Result<&'a str, NotifyError> {
        value.as_deref().ok_or(NotifyError::MissingCredential(var))
    }

    fn mailbox(address: &str) -> Result<Mailbox, NotifyError> {
        address.parse().map_err(|source| NotifyError::Address {
            address: address.to_string(),
            source,
        })
    }

    pub(crate) fn compose(&self, age: Age) -> Result<Message, NotifyError> {
        let sender = Self::required(&self.credentials.sender, SENDER_EMAIL_VAR)?;
        let receiver = Self::required(&self.credentials.receiver, RECEIVER_EMAIL_VAR)?;
        let message = Message::builder()
            .from(Self::mailbox(sender)?)
            .to(Self::mailbox(receiver)?)
            .subject(SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(Self::body(age))?;
        Ok(message)
    }
}

impl Notifier for Email {
    fn notify(&self, age: Age) -> Result<(), NotifyError> {
        let message = self.compose(age)?;
        let sender = Self::required(&self.credentials.sender, SENDER_EMAIL_VAR)?;
        let password = Self::required(&self.credentials.password, SENDER_PASSWORD_VAR)?;

        let mailer = SmtpTransport::starttls_relay(&self.smtp.server)?
            .port(self.smtp.port)
            .credentials(Credentials::new(sender.to_string(), password.to_string()))
            .timeout(Some(SMTP_TIMEOUT))
            .build();
        mailer.send(&message)?;
        Ok(())
    }
}
