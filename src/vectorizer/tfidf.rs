use num::Num;

use crate::vectorizer::{corpus::Corpus, token::TokenFrequency, DocumentVector, Vocabulary};

pub trait TFIDFEngine<N>
where
    N: Num + Copy,
{
    /// Build the IDF vector
    /// # Arguments
    /// * `corpus` - document frequency statistics
    /// * `vocabulary` - token dimension layout
    /// # Returns
    /// * `Vec<N>` - one IDF weight per vocabulary entry
    fn idf_vec(corpus: &Corpus, vocabulary: &Vocabulary) -> Vec<N>;

    /// Build one document's TF-IDF vector
    /// # Arguments
    /// * `freq` - token counts of the document
    /// * `idf_vec` - output of `idf_vec` for the same vocabulary;
    ///   dimensions past its end get weight zero
    /// * `vocabulary` - token dimension layout
    /// # Returns
    /// * `DocumentVector<N>` - dense vector, `vocabulary.len()` entries
    fn tf_idf_vec(freq: &TokenFrequency, idf_vec: &[N], vocabulary: &Vocabulary) -> DocumentVector<N>;
}

/// Default TF-IDF engine
/// TF is the raw token count, IDF is `ln((1 + n) / (1 + df)) + 1`.
/// Supports `f32` and `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl DefaultTFIDFEngine {
    pub fn new() -> Self {
        DefaultTFIDFEngine
    }

    /// Smoothed IDF.
    /// Always >= 1.0 because `doc_freq <= doc_num`, and finite for `doc_freq == doc_num`.
    #[inline]
    pub fn smooth_idf(doc_num: u64, doc_freq: u64) -> f64 {
        ((1.0 + doc_num as f64) / (1.0 + doc_freq as f64)).ln() + 1.0
    }
}

impl TFIDFEngine<f64> for DefaultTFIDFEngine {
    fn idf_vec(corpus: &Corpus, vocabulary: &Vocabulary) -> Vec<f64> {
        let doc_num = corpus.get_doc_num();
        vocabulary
            .iter()
            .map(|token| Self::smooth_idf(doc_num, corpus.get_token_count(token)))
            .collect()
    }

    fn tf_idf_vec(freq: &TokenFrequency, idf_vec: &[f64], vocabulary: &Vocabulary) -> DocumentVector<f64> {
        let mut weights = vec![0.0_f64; vocabulary.len()];
        for (token, count) in freq.iter() {
            if let Some(idx) = vocabulary.index_of(token) {
                if let Some(&idf) = idf_vec.get(idx) {
                    weights[idx] = count as f64 * idf;
                }
            }
        }
        DocumentVector::new(weights)
    }
}

impl TFIDFEngine<f32> for DefaultTFIDFEngine {
    fn idf_vec(corpus: &Corpus, vocabulary: &Vocabulary) -> Vec<f32> {
        let doc_num = corpus.get_doc_num();
        vocabulary
            .iter()
            .map(|token| Self::smooth_idf(doc_num, corpus.get_token_count(token)) as f32)
            .collect()
    }

    fn tf_idf_vec(freq: &TokenFrequency, idf_vec: &[f32], vocabulary: &Vocabulary) -> DocumentVector<f32> {
        let mut weights = vec![0.0_f32; vocabulary.len()];
        for (token, count) in freq.iter() {
            if let Some(idx) = vocabulary.index_of(token) {
                if let Some(&idf) = idf_vec.get(idx) {
                    weights[idx] = count as f32 * idf;
                }
            }
        }
        DocumentVector::new(weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idf_is_positive_and_non_increasing_in_df() {
        let n = 10;
        let mut prev = f64::INFINITY;
        for df in 0..=n {
            let idf = DefaultTFIDFEngine::smooth_idf(n, df);
            assert!(idf.is_finite());
            assert!(idf > 0.0, "idf must stay positive, got {idf} at df={df}");
            assert!(idf <= prev, "idf increased at df={df}");
            prev = idf;
        }
        // token in every document keeps weight 1.0
        assert_eq!(DefaultTFIDFEngine::smooth_idf(n, n), 1.0);
    }

    #[test]
    fn tf_is_raw_count_times_idf() {
        let mut corpus = Corpus::new();
        let a = TokenFrequency::from_text("drama drama action");
        let b = TokenFrequency::from_text("drama romance");
        corpus.add_set(&a.token_set_ref_str());
        corpus.add_set(&b.token_set_ref_str());
        let vocabulary = Vocabulary::from_tokens(corpus.get_all_tokens());

        let idf = <DefaultTFIDFEngine as TFIDFEngine<f64>>::idf_vec(&corpus, &vocabulary);
        let vec = <DefaultTFIDFEngine as TFIDFEngine<f64>>::tf_idf_vec(&a, &idf, &vocabulary);

        let drama = vocabulary.index_of("drama").unwrap();
        let action = vocabulary.index_of("action").unwrap();
        let romance = vocabulary.index_of("romance").unwrap();
        assert_eq!(vec.len(), vocabulary.len());
        assert_eq!(vec.weights[drama], 2.0 * idf[drama]);
        assert_eq!(vec.weights[action], idf[action]);
        assert_eq!(vec.weights[romance], 0.0);
        assert!(idf[action] > idf[drama]);
    }

    #[test]
    fn short_idf_slice_leaves_missing_dimensions_zero() {
        let mut corpus = Corpus::new();
        let freq = TokenFrequency::from_text("action drama");
        corpus.add_set(&freq.token_set_ref_str());
        let vocabulary = Vocabulary::from_tokens(corpus.get_all_tokens());
        let idf = <DefaultTFIDFEngine as TFIDFEngine<f64>>::idf_vec(&corpus, &vocabulary);

        let vec = <DefaultTFIDFEngine as TFIDFEngine<f64>>::tf_idf_vec(&freq, &idf[..1], &vocabulary);
        assert_eq!(vec.len(), 2);
        assert_eq!(vec.weights[0], idf[0]);
        assert_eq!(vec.weights[1], 0.0);

        let vec = <DefaultTFIDFEngine as TFIDFEngine<f32>>::tf_idf_vec(&freq, &[], &vocabulary);
        assert!(vec.is_zero());
    }

    #[test]
    fn f32_engine_matches_f64_engine() {
        let mut corpus = Corpus::new();
        let a = TokenFrequency::from_text("horror thriller");
        corpus.add_set(&a.token_set_ref_str());
        let vocabulary = Vocabulary::from_tokens(corpus.get_all_tokens());

        let idf64 = <DefaultTFIDFEngine as TFIDFEngine<f64>>::idf_vec(&corpus, &vocabulary);
        let idf32 = <DefaultTFIDFEngine as TFIDFEngine<f32>>::idf_vec(&corpus, &vocabulary);
        for (x, y) in idf64.iter().zip(idf32.iter()) {
            assert!((x - *y as f64).abs() < 1e-6);
        }
    }
}
