use std::fmt::{self, Display};

use indexmap::IndexMap;
use num::Num;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::{IndexError, Result},
    vectorizer::{
        corpus::Document,
        evaluate::{matrix::SimilarityMatrix, scoring::Hits},
        tfidf::{DefaultTFIDFEngine, TFIDFEngine},
        DocumentVector, TFIDFVectorizer, Vocabulary,
    },
};

/// Number of results `recommend_default` returns
pub const DEFAULT_TOP_N: usize = 5;

/// Message rendered for an unknown title
pub const NOT_FOUND_MESSAGE: &str = "Movie not found in database. Please check the spelling.";

/// Outcome of a title query.
/// An unknown title is a value of its own, never an empty hit list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Recommendation {
    /// No stored title matches the query
    NotFound { query: String },
    /// Nearest documents, best first, query document excluded
    Found(Hits<String>),
}

impl Recommendation {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Recommendation::NotFound { .. })
    }

    pub fn hits(&self) -> Option<&Hits<String>> {
        match self {
            Recommendation::Found(hits) => Some(hits),
            Recommendation::NotFound { .. } => None,
        }
    }

    pub fn into_hits(self) -> Option<Hits<String>> {
        match self {
            Recommendation::Found(hits) => Some(hits),
            Recommendation::NotFound { .. } => None,
        }
    }
}

impl Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::NotFound { .. } => f.write_str(NOT_FOUND_MESSAGE),
            Recommendation::Found(hits) => Display::fmt(hits, f),
        }
    }
}

/// Key used for case-insensitive title identity
#[inline]
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Similarity Index
/// Holds the corpus, its TF-IDF vectors and the precomputed similarity
/// matrix, and answers nearest-neighbour queries by title.
///
/// Built once, read-only afterwards: `recommend` takes `&self` and touches no
/// shared mutable state, so one index can serve many threads at once.
///
/// Titles that normalize to the same key: the later document wins the
/// lookup. Both documents stay in the corpus and still rank for other queries.
#[derive(Debug, Clone)]
pub struct SimilarityIndex<N = f64>
where
    N: Num + Copy + Into<f64> + Send + Sync,
{
    pub(crate) documents: Vec<Document>,
    pub(crate) title_index: IndexMap<String, usize>,
    pub(crate) vocabulary: Vocabulary,
    pub(crate) vectors: Vec<DocumentVector<N>>,
    pub(crate) matrix: SimilarityMatrix,
}

impl<N> SimilarityIndex<N>
where
    N: Num + Copy + Into<f64> + Send + Sync,
{
    /// Build the index from documents and their vectorizer output.
    ///
    /// # Arguments
    /// * `documents` - corpus, same order as `vectors`
    /// * `vocabulary` - token dimensions of `vectors`
    /// * `vectors` - one TF-IDF vector per document
    ///
    /// # Returns
    /// * `InvalidArgument` for an empty corpus or vectors that do not line up
    pub fn new(documents: Vec<Document>, vocabulary: Vocabulary, vectors: Vec<DocumentVector<N>>) -> Result<Self> {
        Self::check_parts(&documents, &vocabulary, &vectors)?;
        let matrix = SimilarityMatrix::from_vectors(&vectors);
        let index = Self::assemble(documents, vocabulary, vectors, matrix);
        info!(doc_num = index.len(), "similarity index ready");
        Ok(index)
    }

    /// Vectorize `documents` with engine `E` and build the index.
    pub fn from_documents<E>(documents: Vec<Document>) -> Result<Self>
    where
        E: TFIDFEngine<N>,
    {
        let (vocabulary, vectors) = TFIDFVectorizer::<N, E>::build(&documents)?.into_parts();
        Self::new(documents, vocabulary, vectors)
    }

    pub(crate) fn check_parts(documents: &[Document], vocabulary: &Vocabulary, vectors: &[DocumentVector<N>]) -> Result<()> {
        if documents.is_empty() {
            return Err(IndexError::InvalidArgument(
                "corpus must contain at least one document".to_string(),
            ));
        }
        if documents.len() != vectors.len() {
            return Err(IndexError::InvalidArgument(format!(
                "{} documents but {} vectors",
                documents.len(),
                vectors.len()
            )));
        }
        if let Some((row, vec)) = vectors.iter().enumerate().find(|(_, v)| v.len() != vocabulary.len()) {
            return Err(IndexError::InvalidArgument(format!(
                "vector {} has {} dimensions, vocabulary has {}",
                row,
                vec.len(),
                vocabulary.len()
            )));
        }
        Ok(())
    }

    /// Wire up the title lookup around already validated parts
    pub(crate) fn assemble(
        documents: Vec<Document>,
        vocabulary: Vocabulary,
        vectors: Vec<DocumentVector<N>>,
        matrix: SimilarityMatrix,
    ) -> Self {
        let mut title_index = IndexMap::with_capacity(documents.len());
        for (row, doc) in documents.iter().enumerate() {
            if let Some(shadowed) = title_index.insert(normalize_title(&doc.title), row) {
                warn!(title = %doc.title, row, shadowed, "duplicate title, later document wins lookup");
            }
        }
        Self {
            documents,
            title_index,
            vocabulary,
            vectors,
            matrix,
        }
    }

    /// Rank the documents most similar to `query_title`.
    ///
    /// # Arguments
    /// * `query_title` - matched case-insensitively, surrounding whitespace ignored
    /// * `top_n` - maximum number of results, at least 1
    ///
    /// # Returns
    /// * `Recommendation::NotFound` for an unknown title
    /// * `Recommendation::Found` with up to `top_n` `(title, score)` pairs,
    ///   descending score, ties in corpus order, query document excluded
    /// * `InvalidArgument` when `top_n == 0`
    pub fn recommend(&self, query_title: &str, top_n: usize) -> Result<Recommendation> {
        if top_n == 0 {
            return Err(IndexError::InvalidArgument(
                "top_n must be at least 1".to_string(),
            ));
        }
        let Some(query_row) = self.position(query_title) else {
            debug!(query = query_title, "title not found");
            return Ok(Recommendation::NotFound {
                query: query_title.to_string(),
            });
        };
        let Some(row) = self.matrix.row(query_row) else {
            return Ok(Recommendation::NotFound {
                query: query_title.to_string(),
            });
        };

        let mut hits = Hits::new(
            row.iter()
                .copied()
                .enumerate()
                .filter(|&(k, _)| k != query_row)
                .collect(),
        );
        hits.sort_by_score().truncate(top_n);
        Ok(Recommendation::Found(
            hits.map_keys(|k| self.documents[k].title.clone()),
        ))
    }

    /// `recommend` with `DEFAULT_TOP_N`
    pub fn recommend_default(&self, query_title: &str) -> Result<Recommendation> {
        self.recommend(query_title, DEFAULT_TOP_N)
    }

    /// Row of the document whose title matches `title` case-insensitively
    pub fn position(&self, title: &str) -> Option<usize> {
        self.title_index.get(&normalize_title(title)).copied()
    }

    /// Stored title of row `row`
    pub fn title(&self, row: usize) -> Option<&str> {
        self.documents.get(row).map(|d| d.title.as_str())
    }

    /// Cosine similarity of rows `i` and `k`
    pub fn similarity(&self, i: usize, k: usize) -> Option<f64> {
        self.matrix.get(i, k)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn vectors(&self) -> &[DocumentVector<N>] {
        &self.vectors
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }
}

/// Build an index over `(title, description)` pairs with the default engine.
///
/// # Returns
/// * `InvalidArgument` when `corpus` is empty
pub fn initialize<I, T>(corpus: I) -> Result<SimilarityIndex>
where
    I: IntoIterator<Item = T>,
    T: Into<Document>,
{
    let documents: Vec<Document> = corpus.into_iter().map(Into::into).collect();
    SimilarityIndex::<f64>::from_documents::<DefaultTFIDFEngine>(documents)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::reference_corpus;

    fn reference_index() -> SimilarityIndex {
        initialize(reference_corpus()).unwrap()
    }

    fn found(rec: Recommendation) -> Vec<(String, f64)> {
        match rec {
            Recommendation::Found(hits) => hits.list,
            Recommendation::NotFound { query } => panic!("expected hits for {query}"),
        }
    }

    #[test]
    fn empty_corpus_is_invalid() {
        let res = initialize(Vec::<(&str, &str)>::new());
        assert!(matches!(res, Err(IndexError::InvalidArgument(_))));
    }

    #[test]
    fn lower_case_query_matches_and_excludes_itself() {
        let index = reference_index();
        let hits = found(index.recommend("inception", 5).unwrap());

        assert_eq!(hits.len(), 5);
        assert!(hits.iter().all(|(t, _)| t != "Inception"));
        assert_eq!(hits[0].0, "Tenet");
        assert!(hits.iter().any(|(t, _)| t == "The Matrix"));
    }

    #[test]
    fn shared_tokens_rank_above_disjoint_documents() {
        let index = reference_index();
        let hits = found(index.recommend("Inception", index.len()).unwrap());
        let score_of = |title: &str| hits.iter().find(|(t, _)| t == title).map(|(_, s)| *s).unwrap();
        let rank_of = |title: &str| hits.iter().position(|(t, _)| t == title).unwrap();

        assert_eq!(score_of("The Notebook"), 0.0);
        assert!(score_of("The Matrix") > score_of("The Notebook"));
        assert!(score_of("Tenet") > score_of("The Notebook"));
        assert!(rank_of("The Matrix") < rank_of("The Notebook"));
        assert!(rank_of("Tenet") < rank_of("The Notebook"));
    }

    #[test]
    fn unknown_title_is_not_found() {
        let index = reference_index();
        let rec = index.recommend("Nonexistent Movie", 5).unwrap();
        assert!(rec.is_not_found());
        assert_eq!(rec.to_string(), NOT_FOUND_MESSAGE);
        assert!(index.recommend("NONEXISTENT MOVIE", 1).unwrap().is_not_found());
    }

    #[test]
    fn zero_top_n_is_invalid() {
        let index = reference_index();
        assert!(matches!(
            index.recommend("Inception", 0),
            Err(IndexError::InvalidArgument(_))
        ));
        // checked before the lookup
        assert!(matches!(
            index.recommend("Nonexistent Movie", 0),
            Err(IndexError::InvalidArgument(_))
        ));
    }

    #[test]
    fn large_top_n_returns_every_other_document() {
        let index = reference_index();
        let hits = found(index.recommend("Frozen", 1000).unwrap());
        assert_eq!(hits.len(), index.len() - 1);
    }

    #[test]
    fn two_disjoint_documents() {
        let index = initialize(vec![("Alpha", "space robots"), ("Beta", "ocean whales")]).unwrap();
        let hits = found(index.recommend("alpha", 5).unwrap());
        assert_eq!(hits, vec![("Beta".to_string(), 0.0)]);
    }

    #[test]
    fn single_document_has_no_neighbours() {
        let index = initialize(vec![("Solo", "drama")]).unwrap();
        let rec = index.recommend("solo", 3).unwrap();
        assert!(!rec.is_not_found());
        assert!(rec.hits().unwrap().is_empty());
    }

    #[test]
    fn results_descend_with_ties_in_corpus_order() {
        let index = initialize(vec![
            ("Query", "drama action"),
            ("Tie A", "drama"),
            ("Best", "drama action"),
            ("Tie B", "drama"),
            ("None", "cartoon"),
        ])
        .unwrap();
        let hits = found(index.recommend("query", 10).unwrap());
        let titles: Vec<&str> = hits.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(titles, vec!["Best", "Tie A", "Tie B", "None"]);
        assert!(hits.windows(2).all(|w| w[0].1 >= w[1].1));
        assert_eq!(hits[1].1, hits[2].1);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let index = reference_index();
        for i in 0..index.len() {
            assert!((index.similarity(i, i).unwrap() - 1.0).abs() < 1e-12);
            for k in 0..index.len() {
                assert_eq!(index.similarity(i, k), index.similarity(k, i));
            }
        }
    }

    #[test]
    fn empty_description_scores_zero_everywhere() {
        let index = initialize(vec![
            ("Blank", ""),
            ("Drama", "drama family"),
            ("Action", "action drama"),
        ])
        .unwrap();
        let blank = index.position("blank").unwrap();
        for k in 0..index.len() {
            assert_eq!(index.similarity(blank, k), Some(0.0));
            assert_eq!(index.similarity(k, blank), Some(0.0));
        }
        let hits = found(index.recommend("Blank", 5).unwrap());
        assert!(hits.iter().all(|(_, s)| *s == 0.0));
        // ties keep corpus order
        assert_eq!(hits[0].0, "Drama");
        assert_eq!(hits[1].0, "Action");
    }

    #[test]
    fn duplicate_titles_last_one_wins() {
        let index = initialize(vec![
            ("Remake", "western desert"),
            ("REMAKE", "space opera"),
            ("Star", "space opera"),
        ])
        .unwrap();
        assert_eq!(index.position("remake"), Some(1));
        let hits = found(index.recommend("Remake", 5).unwrap());
        assert_eq!(hits[0].0, "Star");
        // the shadowed row still ranks
        assert!(hits.iter().any(|(t, _)| t == "Remake"));
    }

    #[test]
    fn build_twice_is_identical() {
        let a = reference_index();
        let b = reference_index();
        assert_eq!(a.vocabulary(), b.vocabulary());
        assert_eq!(a.vectors(), b.vectors());
        assert_eq!(a.matrix(), b.matrix());
    }

    #[test]
    fn query_whitespace_is_ignored() {
        let index = reference_index();
        assert_eq!(index.position("  the matrix "), index.position("The Matrix"));
        assert_eq!(index.title(index.position("the dark knight").unwrap()), Some("The Dark Knight"));
    }

    #[test]
    fn mismatched_parts_are_invalid() {
        let docs = vec![Document::new("A", "drama"), Document::new("B", "action")];
        let (vocabulary, mut vectors) = crate::vectorizer::build(&docs).unwrap();
        vectors.pop();
        let res = SimilarityIndex::new(docs.clone(), vocabulary.clone(), vectors);
        assert!(matches!(res, Err(IndexError::InvalidArgument(_))));

        let res = SimilarityIndex::new(docs, vocabulary, vec![DocumentVector::new(vec![1.0]); 2]);
        assert!(matches!(res, Err(IndexError::InvalidArgument(_))));
    }

    #[test]
    fn concurrent_queries_agree() {
        let index = Arc::new(reference_index());
        let expected = index.recommend("Inception", 5).unwrap();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let index = Arc::clone(&index);
                std::thread::spawn(move || index.recommend("INCEPTION", 5).unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn found_display_lists_titles() {
        let index = reference_index();
        let rec = index.recommend("Inception", 1).unwrap();
        assert!(rec.to_string().starts_with("Tenet (Similarity: 0.7"));
    }

    #[test]
    fn f32_index_ranks_like_f64() {
        let docs = reference_corpus();
        let index32 = SimilarityIndex::<f32>::from_documents::<DefaultTFIDFEngine>(docs).unwrap();
        let index64 = reference_index();
        let top32 = index32.recommend("Inception", 1).unwrap().into_hits().unwrap();
        let top64 = index64.recommend("Inception", 1).unwrap().into_hits().unwrap();
        assert_eq!(top32.list[0].0, top64.list[0].0);
    }
}
