pub mod corpus;
pub mod tfidf;
pub mod token;
pub mod serde;
pub mod evaluate;
pub mod index;

use std::marker::PhantomData;
use std::time::Instant;

use indexmap::IndexSet;
use num::Num;
use rayon::prelude::*;
use ::serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{IndexError, Result};
use crate::utils::math::vector::VectorMath;
use crate::vectorizer::{corpus::{Corpus, Document}, tfidf::{DefaultTFIDFEngine, TFIDFEngine}, token::TokenFrequency};

/// Sorted set of distinct corpus tokens.
/// The position of a token is its dimension in every `DocumentVector`
/// and never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    tokens: IndexSet<Box<str>>,
}

impl Vocabulary {
    /// Build from any token stream; duplicates are merged and the result is sorted.
    pub fn from_tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut sorted: Vec<Box<str>> = tokens.into_iter().map(|t| t.as_ref().into()).collect();
        sorted.sort_unstable();
        sorted.dedup();
        Self {
            tokens: sorted.into_iter().collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Dimension of `token`, if it is in the vocabulary
    #[inline]
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.tokens.get_index_of(token)
    }

    /// Tokens in dimension order
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().map(|t| t.as_ref())
    }

    /// Sorted order holds for every adjacent pair
    pub(crate) fn is_sorted(&self) -> bool {
        self.tokens
            .iter()
            .zip(self.tokens.iter().skip(1))
            .all(|(a, b)| a < b)
    }
}

/// Dense TF-IDF vector of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVector<N>
where
    N: Num + Copy,
{
    /// one weight per vocabulary dimension
    pub weights: Vec<N>,
}

impl<N> DocumentVector<N>
where
    N: Num + Copy,
{
    pub fn new(weights: Vec<N>) -> Self {
        Self { weights }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weight at dimension `idx`, zero when out of range
    #[inline]
    pub fn get(&self, idx: usize) -> N {
        self.weights.get(idx).copied().unwrap_or_else(N::zero)
    }

    /// true when every weight is zero (empty or out-of-vocabulary description)
    pub fn is_zero(&self) -> bool {
        self.weights.iter().all(|w| w.is_zero())
    }
}

impl<N> DocumentVector<N>
where
    N: Num + Copy + Into<f64>,
{
    #[inline]
    pub fn norm(&self) -> f64 {
        self.weights.norm()
    }

    #[inline]
    pub fn cosine_similarity(&self, other: &Self) -> f64 {
        self.weights.cosine_similarity(&other.weights)
    }
}

/// TF-IDF Vectorizer
/// Turns a fixed document collection into dense TF-IDF vectors over a
/// vocabulary derived from the collection itself.
///
/// `TFIDFVectorizer<N, E>` has the following generic parameters:
/// - `N`: vector element type (f32, f64)
/// - `E`: TF-IDF calculation engine type (e.g., DefaultTFIDFEngine)
///
/// It is built once with `build` and never updated afterwards.
#[derive(Debug, Clone)]
pub struct TFIDFVectorizer<N = f64, E = DefaultTFIDFEngine>
where
    N: Num + Copy + Into<f64> + Send + Sync,
    E: TFIDFEngine<N>,
{
    /// Sorted token dimensions
    pub vocabulary: Vocabulary,
    /// One vector per input document, input order
    pub documents: Vec<DocumentVector<N>>,
    /// IDF weight per dimension
    pub idf_cache: Vec<N>,
    /// Document frequency statistics the IDF was computed from
    pub corpus: Corpus,
    _marker: PhantomData<E>,
}

impl<N, E> TFIDFVectorizer<N, E>
where
    N: Num + Copy + Into<f64> + Send + Sync,
    E: TFIDFEngine<N>,
{
    /// Vectorize `documents`.
    ///
    /// # Arguments
    /// * `documents` - the whole corpus, at least one document
    ///
    /// # Returns
    /// * `Result<Self>` - `InvalidArgument` when `documents` is empty
    pub fn build(documents: &[Document]) -> Result<Self> {
        if documents.is_empty() {
            return Err(IndexError::InvalidArgument(
                "corpus must contain at least one document".to_string(),
            ));
        }
        let start = Instant::now();

        let freqs: Vec<TokenFrequency> = documents
            .par_iter()
            .map(|doc| TokenFrequency::from_text(&doc.description))
            .collect();

        let mut corpus = Corpus::new();
        for freq in &freqs {
            corpus.add_set(&freq.token_set_ref_str());
        }
        let vocabulary = Vocabulary::from_tokens(corpus.get_all_tokens());
        let idf_cache = E::idf_vec(&corpus, &vocabulary);

        let vectors: Vec<DocumentVector<N>> = freqs
            .par_iter()
            .map(|freq| E::tf_idf_vec(freq, &idf_cache, &vocabulary))
            .collect();

        for (doc, vec) in documents.iter().zip(vectors.iter()) {
            if vec.is_zero() {
                debug!(title = %doc.title, "document has no vocabulary tokens, vector is all zero");
            }
        }
        info!(
            doc_num = documents.len(),
            vocab_size = vocabulary.len(),
            token_total = freqs.iter().map(TokenFrequency::token_sum).sum::<u64>(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "built tf-idf vectors"
        );

        Ok(Self {
            vocabulary,
            documents: vectors,
            idf_cache,
            corpus,
            _marker: PhantomData,
        })
    }

    /// Split into the vocabulary and the document vectors
    pub fn into_parts(self) -> (Vocabulary, Vec<DocumentVector<N>>) {
        (self.vocabulary, self.documents)
    }

    pub fn doc_num(&self) -> usize {
        self.documents.len()
    }
}

/// Vectorize `documents` with the default engine.
/// Shorthand for `TFIDFVectorizer::<f64>::build(documents)?.into_parts()`.
pub fn build(documents: &[Document]) -> Result<(Vocabulary, Vec<DocumentVector<f64>>)> {
    Ok(TFIDFVectorizer::<f64>::build(documents)?.into_parts())
}
