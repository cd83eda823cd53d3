/// This crate is a content-based title recommender built on a TF-IDF similarity index.
pub mod vectorizer;
pub mod utils;
pub mod catalog;
pub mod error;

/// Similarity Index
/// The top-level struct of this crate.
/// It holds a fixed corpus, its TF-IDF vectors and the full pairwise cosine
/// similarity matrix, and answers ranked nearest-neighbour queries by title.
///
/// Internally, it holds:
/// - The documents (title + description)
/// - A case-insensitive title lookup
/// - The sorted corpus vocabulary
/// - One dense TF-IDF vector per document
/// - The N×N similarity matrix
///
/// `SimilarityIndex<N>` is generic over the vector element type `N` (f32, f64).
/// Scores are always `f64`.
///
/// # Lifecycle
/// Built once by `initialize` or `SimilarityIndex::new`, read-only afterwards.
/// Queries take `&self` and can run on many threads at once.
///
/// # Serialization
/// Supported. The title lookup is left out and rebuilt on load.
/// Use `IndexData` to deserialize.
pub use vectorizer::index::SimilarityIndex;

/// Build a `SimilarityIndex` from `(title, description)` pairs.
/// Fails with `InvalidArgument` when the corpus is empty.
pub use vectorizer::index::initialize;

/// Outcome of `SimilarityIndex::recommend`
/// - `Found`: ranked `(title, score)` pairs
/// - `NotFound`: the queried title is not in the corpus
pub use vectorizer::index::{Recommendation, DEFAULT_TOP_N, NOT_FOUND_MESSAGE};

/// Index Data Structure for Serialization
/// A plain, serializable copy of a `SimilarityIndex` without the title lookup.
/// Convert it back with `into_index`.
///
/// # Serialization
/// Supported, CBOR helpers included (`to_cbor`, `from_cbor`).
///
/// # Deserialization
/// Supported, with consistency checks on conversion.
pub use vectorizer::serde::IndexData;

/// TF-IDF Vectorizer
/// Turns a fixed corpus into dense TF-IDF vectors over its own vocabulary.
/// `build` is the plain function form returning `(Vocabulary, Vec<DocumentVector>)`.
pub use vectorizer::{build, DocumentVector, TFIDFVectorizer, Vocabulary};

/// Document and corpus statistics
/// - `Document`: title + description
/// - `Corpus`: document count and per-token document frequency, the base data for IDF
pub use vectorizer::corpus::{Corpus, Document};

/// Token Frequency structure
/// Counts token occurrences within one document; base data for TF.
/// `tokenize` is the tokenizer every document goes through.
pub use vectorizer::token::{tokenize, TokenFrequency};

/// TF IDF Calculation Engine Trait
/// Defines how TF and IDF weights are computed.
///
/// `DefaultTFIDFEngine` uses the raw token count as TF and
/// `ln((1 + n) / (1 + df)) + 1` as IDF, for `f32` and `f64`.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Ranked results and the similarity matrix
/// - `Hits`: ordered `(key, score)` list with stable descending sort
/// - `SimilarityMatrix`: dense pairwise cosine matrix
pub use vectorizer::evaluate::{matrix::SimilarityMatrix, scoring::Hits};

/// Error type and result alias
pub use error::{IndexError, Result};
