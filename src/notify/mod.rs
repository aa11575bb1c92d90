//! Announcement formatting and delivery channels

pub mod batch;
pub mod email;
pub mod format;
pub mod social;

pub use batch::{batch_messages, social_prefix, MessageBatches};
pub use email::{email_subject, format_email_body, Mailer, SmtpMailer};
pub use format::prepare_film_name;
pub use social::{SocialPoster, TwitterPoster};
