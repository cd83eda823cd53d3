use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// One catalog entry: a title and the free text that describes it.
/// Only the description feeds the similarity signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub description: String,
}

impl Document {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

impl<T, D> From<(T, D)> for Document
where
    T: Into<String>,
    D: Into<String>,
{
    fn from((title, description): (T, D)) -> Self {
        Document::new(title, description)
    }
}

/// keep document count and per-token document frequency
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    /// number of documents added
    pub doc_num: u64,
    /// number of documents each token appears in
    pub token_counts: IndexMap<Box<str>, u64>,
}

impl Corpus {
    /// Create a new instance
    pub fn new() -> Self {
        Self {
            doc_num: 0,
            token_counts: IndexMap::new(),
        }
    }

    /// Add one document's tokens to the corpus
    /// Duplicates within `tokens` are counted once per call.
    pub fn add_set<T>(&mut self, tokens: &[T])
    where
        T: AsRef<str>,
    {
        self.doc_num += 1;
        let distinct: IndexSet<&str> = tokens.iter().map(|t| t.as_ref()).collect();
        for token in distinct {
            *self.token_counts.entry(token.into()).or_insert(0) += 1;
        }
    }

    /// Get the number of documents in the corpus
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Get the number of documents containing `token`
    pub fn get_token_count(&self, token: &str) -> u64 {
        self.token_counts.get(token).copied().unwrap_or(0)
    }

    /// Get the current vocabulary size (number of unique tokens)
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.token_counts.len()
    }

    /// Get all tokens in the corpus, first-seen order
    pub fn get_all_tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.token_counts.keys().map(|t| t.as_ref())
    }
}
