//! Packing film announcements into length-bounded messages

use super::format::prepare_film_name;
use crate::models::{Film, Settings};

/// First line of every social message for a venue
pub fn social_prefix(settings: &Settings) -> String {
    format!("Now On Sale {}\n", settings.shortened_url)
}

/// Lazily pack `films` into messages of at most `max_length` characters.
///
/// Each message starts with `prefix` followed by one normalized film name per
/// line. A film is never split across messages, so a single name too long to
/// fit still gets a message of its own, over the limit.
pub fn batch_messages<'a>(
    films: &'a [Film],
    max_length: usize,
    prefix: impl Into<String>,
) -> MessageBatches<'a> {
    let prefix = prefix.into();
    let prefix_len = prefix.chars().count();
    MessageBatches {
        films: films.iter(),
        buffer: prefix.clone(),
        buffer_len: prefix_len,
        prefix,
        prefix_len,
        max_length,
    }
}

/// Iterator returned by [`batch_messages`]
pub struct MessageBatches<'a> {
    films: std::slice::Iter<'a, Film>,
    prefix: String,
    prefix_len: usize,
    buffer: String,
    buffer_len: usize,
    max_length: usize,
}

impl MessageBatches<'_> {
    fn has_content(&self) -> bool {
        self.buffer_len > self.prefix_len
    }

    /// Hand out the current buffer and restart from the prefix
    fn take_buffer(&mut self) -> String {
        self.buffer_len = self.prefix_len;
        std::mem::replace(&mut self.buffer, self.prefix.clone())
    }
}

impl Iterator for MessageBatches<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some(film) = self.films.next() {
            let line = format!("{}\n", prepare_film_name(&film.name));
            let line_len = line.chars().count();

            if self.has_content() && self.buffer_len + line_len > self.max_length {
                let message = self.take_buffer();
                self.buffer.push_str(&line);
                self.buffer_len += line_len;
                return Some(message);
            }

            self.buffer.push_str(&line);
            self.buffer_len += line_len;
        }

        if self.has_content() {
            return Some(self.take_buffer());
        }
        None
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
