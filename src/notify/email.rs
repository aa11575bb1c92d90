//! Email announcements
//!
//! Email has no length constraint, so a venue's new films go out in a single
//! body, one message per recipient.

use super::format::prepare_film_name;
use crate::error::{Result, WatchError};
use crate::models::{Film, Settings};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Subject line for a venue's announcement
pub fn email_subject(settings: &Settings) -> String {
    format!("[ShowtimeWatch] Now On Sale at {}", settings.venue_name)
}

/// Header line with the venue link, then `<date bucket>\t<name>` per film
pub fn format_email_body(settings: &Settings, films: &[Film]) -> String {
    let mut body = format!("Now On Sale at {}\n", settings.shortened_url);
    for film in films {
        body.push_str(&format!(
            "{}\t{}\n",
            film.date_id,
            prepare_film_name(&film.name)
        ));
    }
    body
}

/// Outgoing email channel
#[allow(async_fn_in_trait)]
pub trait Mailer {
    async fn send_email(&self, recipient: &str, subject: &str, body: &str) -> Result<()>;
}

/// Sends mail through an SMTP relay over implicit TLS (port 465)
pub struct SmtpMailer {
    host: String,
    user: Option<String>,
    password: Option<String>,
}

impl SmtpMailer {
    pub fn new(host: impl Into<String>, user: Option<String>, password: Option<String>) -> Self {
        Self {
            host: host.into(),
            user,
            password,
        }
    }

    fn build_message(
        &self,
        from: &str,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<Message> {
        let from: Mailbox = format!("ShowtimeWatch <{}>", from)
            .parse()
            .map_err(|e| WatchError::Email(format!("Invalid sender {}: {}", from, e)))?;
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| WatchError::Email(format!("Invalid recipient {}: {}", recipient, e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| WatchError::Email(format!("Failed to build message: {}", e)))
    }
}

impl Mailer for SmtpMailer {
    async fn send_email(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        let user = self
            .user
            .as_deref()
            .ok_or(WatchError::MissingCredential("SMTP user"))?;
        let password = self
            .password
            .as_deref()
            .ok_or(WatchError::MissingCredential("SMTP password"))?;

        let message = self.build_message(user, recipient, subject, body)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
            .map_err(|e| WatchError::Email(format!("SMTP relay {}: {}", self.host, e)))?
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();

        log::info!("Sending email to {}: {}", recipient, subject);
        transport.send(message).await.map_err(|e| {
            log::error!("{}\n{}", send_failure(recipient, subject, &e), body);
            WatchError::Email(send_failure(recipient, subject, &e))
        })?;
        Ok(())
    }
}

/// Names the recipient and the subject (which carries the venue) of a failed send
fn send_failure(recipient: &str, subject: &str, error: &dyn std::fmt::Display) -> String {
    format!("Failed to send \"{}\" to {}: {}", subject, recipient, error)
}
