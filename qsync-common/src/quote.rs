//! Quote model
//!
//! A quote is a `{text, category}` pair. The collection-wide uniqueness key is
//! the lower-cased text; there is no identifier, timestamp or version field.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A single quote record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Quote text (uniqueness key, compared case-insensitively)
    pub text: String,
    /// Category label (free-form, e.g. "Motivation")
    pub category: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Normalized uniqueness key: lower-cased text
    pub fn normalized_key(&self) -> String {
        self.text.to_lowercase()
    }

    /// A quote is valid when both fields are non-empty after trimming
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && !self.category.trim().is_empty()
    }
}

/// Built-in default collection, used when no persisted collection exists or
/// the persisted copy cannot be parsed
static DEFAULT_QUOTES: Lazy<Vec<Quote>> = Lazy::new(|| {
    vec![
        Quote::new(
            "The only way to do great work is to love what you do.",
            "Motivation",
        ),
        Quote::new(
            "Life is what happens when you're busy making other plans.",
            "Life",
        ),
        Quote::new(
            "Innovation distinguishes between a leader and a follower.",
            "Innovation",
        ),
        Quote::new(
            "Success is not final, failure is not fatal: it is the courage to continue that counts.",
            "Motivation",
        ),
        Quote::new(
            "The best time to plant a tree was 20 years ago. The second best time is now.",
            "Wisdom",
        ),
        Quote::new(
            "Your time is limited, don't waste it living someone else's life.",
            "Life",
        ),
        Quote::new(
            "Code is like humor. When you have to explain it, it's bad.",
            "Technology",
        ),
        Quote::new(
            "The only impossible journey is the one you never begin.",
            "Inspiration",
        ),
        Quote::new("Believe you can and you're halfway there.", "Motivation"),
        Quote::new(
            "The future belongs to those who believe in the beauty of their dreams.",
            "Inspiration",
        ),
    ]
});

/// Clone of the default quote collection
pub fn default_quotes() -> Vec<Quote> {
    DEFAULT_QUOTES.clone()
}
