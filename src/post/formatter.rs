//! Post formatting

use super::{FormatError, FormattedPost};
use crate::config::PublishConfig;

const DEFAULT_FALLBACK_TAG: &str = "Crypto";

/// Composes message text and a single hashtag within the platform limit
#[derive(Debug, Clone)]
pub struct ContentFormatter {
    char_limit: usize,
    fallback_tag: String,
}

impl ContentFormatter {
    /// Between message and hashtag
    pub const SEPARATOR: &'static str = "\n\n";

    /// Create a formatter from the publish config section
    pub fn new(config: &PublishConfig) -> Self {
        Self::with_limit(config.char_limit, &config.fallback_hashtag)
    }

    /// Create a formatter with an explicit limit and fallback tag
    pub fn with_limit(char_limit: usize, fallback_tag: &str) -> Self {
        let fallback_tag = match sanitize_tag(fallback_tag) {
            tag if tag.is_empty() => DEFAULT_FALLBACK_TAG.to_string(),
            tag => tag,
        };
        Self {
            char_limit,
            fallback_tag,
        }
    }

    pub fn char_limit(&self) -> usize {
        self.char_limit
    }

    /// `#` plus the tag's word characters, or the fallback when none remain
    pub fn normalize_tag(&self, tag: &str) -> String {
        match sanitize_tag(tag) {
            tag if tag.is_empty() => format!("#{}", self.fallback_tag),
            tag => format!("#{}", tag),
        }
    }

    /// Longest message that still fits next to this tag
    pub fn message_budget(&self, tag: &str) -> usize {
        let tag_chars = self.normalize_tag(tag).chars().count();
        self.char_limit
            .saturating_sub(Self::SEPARATOR.chars().count() + tag_chars)
    }

    /// Compose `message + "\n\n" + #tag`
    ///
    /// An empty message yields the hashtag alone, without the separator.
    /// Fails with [`FormatError::ContentTooLong`] when the combined length
    /// exceeds the limit. Pure: the same inputs always give the same result.
    pub fn format(&self, message: &str, tag: &str) -> Result<FormattedPost, FormatError> {
        let message = message.trim();
        let hashtag = self.normalize_tag(tag);

        let separator = if message.is_empty() {
            ""
        } else {
            Self::SEPARATOR
        };
        let length = message.chars().count() + separator.chars().count() + hashtag.chars().count();
        if length > self.char_limit {
            return Err(FormatError::ContentTooLong {
                length,
                limit: self.char_limit,
            });
        }

        let text = format!("{}{}{}", message, separator, hashtag);

        Ok(FormattedPost { text, hashtag })
    }
}

impl Default for ContentFormatter {
    fn default() -> Self {
        Self::new(&PublishConfig::default())
    }
}

/// Strip leading `#` and keep only characters valid in a hashtag
fn sanitize_tag(tag: &str) -> String {
    tag.trim()
        .trim_start_matches('#')
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}
