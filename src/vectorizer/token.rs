use std::fmt::Debug;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Split text into lower-cased alphanumeric tokens.
///
/// Every char that is not alphanumeric is a boundary, so `"sci-fi"` becomes
/// `["sci", "fi"]`. Empty pieces are dropped.
///
/// # Arguments
/// * `text` - raw text
///
/// # Returns
/// * `Vec<String>` - tokens in order of appearance
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// TokenFrequency
/// Counts how often each token occurs in one document.
/// Tokens keep their first-seen order.
///
/// # Examples
/// ```
/// use tf_idf_recommender::TokenFrequency;
/// let mut token_freq = TokenFrequency::new();
/// token_freq.add_token("action");
/// token_freq.add_token("drama");
/// token_freq.add_token("action");
///
/// assert_eq!(token_freq.token_count("action"), 2);
/// assert_eq!(token_freq.token_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TokenFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    token_count: IndexMap<String, u32>,
    total_token_count: u64,
}

/// Adding tokens
impl TokenFrequency {
    /// Create an empty TokenFrequency
    pub fn new() -> Self {
        TokenFrequency {
            token_count: IndexMap::new(),
            total_token_count: 0,
        }
    }

    /// Tokenize `text` and count the result
    pub fn from_text(text: &str) -> Self {
        let mut freq = Self::new();
        freq.add_tokens(&tokenize(text));
        freq
    }

    /// Add one token
    ///
    /// # Arguments
    /// * `token` - token to count
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        let count = self.token_count.entry(token.to_string()).or_insert(0);
        *count += 1;
        self.total_token_count += 1;
        self
    }

    /// Add several tokens
    ///
    /// # Arguments
    /// * `tokens` - slice of tokens to count
    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }
}

/// Reading counts
impl TokenFrequency {
    /// Occurrence count of `token`, `0` when absent
    #[inline]
    pub fn token_count(&self, token: &str) -> u32 {
        self.token_count.get(token).copied().unwrap_or(0)
    }

    /// Total number of tokens counted, duplicates included
    #[inline]
    pub fn token_sum(&self) -> u64 {
        self.total_token_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.token_count.is_empty()
    }

    /// Distinct tokens as borrowed strings, first-seen order
    #[inline]
    pub fn token_set_ref_str(&self) -> Vec<&str> {
        self.token_count.keys().map(String::as_str).collect()
    }

    /// `(token, count)` pairs, first-seen order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.token_count.iter().map(|(token, &count)| (token.as_str(), count))
    }
}
