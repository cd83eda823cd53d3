use num::Num;
use serde::{de::DeserializeOwned, ser::SerializeStruct, Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{IndexError, Result},
    vectorizer::{corpus::Document, evaluate::matrix::SimilarityMatrix, index::SimilarityIndex, DocumentVector, Vocabulary},
};

/// Serializable form of a built `SimilarityIndex`.
/// The title lookup is not stored; `into_index` rebuilds it.
/// The similarity matrix is stored as is, so loading does not recompute it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "N: Deserialize<'de>"))]
pub struct IndexData<N = f64>
where
    N: Num + Copy,
{
    /// corpus, row order
    pub documents: Vec<Document>,
    /// token dimensions
    pub vocabulary: Vocabulary,
    /// TF-IDF vector per document
    pub vectors: Vec<DocumentVector<N>>,
    /// precomputed pairwise similarity
    pub matrix: SimilarityMatrix,
}

impl<N> IndexData<N>
where
    N: Num + Copy + Into<f64> + Send + Sync,
{
    /// Convert back into a `SimilarityIndex`.
    /// Fails with `InvalidArgument` or `Snapshot` when the parts do not fit together,
    /// including a matrix that breaks symmetry or the diagonal rules for its vectors.
    pub fn into_index(self) -> Result<SimilarityIndex<N>> {
        SimilarityIndex::check_parts(&self.documents, &self.vocabulary, &self.vectors)?;
        if !self.vocabulary.is_sorted() {
            return Err(IndexError::Snapshot("vocabulary is not sorted".to_string()));
        }
        self.matrix.validate(&self.vectors)?;
        Ok(SimilarityIndex::assemble(self.documents, self.vocabulary, self.vectors, self.matrix))
    }
}

impl<N> IndexData<N>
where
    N: Num + Copy + Serialize + DeserializeOwned,
{
    /// Encode as CBOR
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }

    /// Decode from CBOR
    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        let data: Self = serde_cbor::from_slice(bytes)?;
        debug!(doc_num = data.documents.len(), bytes = bytes.len(), "decoded index snapshot");
        Ok(data)
    }
}

impl<N> SimilarityIndex<N>
where
    N: Num + Copy + Into<f64> + Send + Sync,
{
    /// Copy out a serializable snapshot
    pub fn to_data(&self) -> IndexData<N> {
        IndexData {
            documents: self.documents.clone(),
            vocabulary: self.vocabulary.clone(),
            vectors: self.vectors.clone(),
            matrix: self.matrix.clone(),
        }
    }

    /// Move into a serializable snapshot
    pub fn into_data(self) -> IndexData<N> {
        IndexData {
            documents: self.documents,
            vocabulary: self.vocabulary,
            vectors: self.vectors,
            matrix: self.matrix,
        }
    }
}

impl<N> SimilarityIndex<N>
where
    N: Num + Copy + Into<f64> + Send + Sync + Serialize,
{
    /// Encode the index as CBOR; read it back with `IndexData::from_cbor`
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }
}

impl<N> Serialize for SimilarityIndex<N>
where
    N: Num + Copy + Into<f64> + Send + Sync + Serialize,
{
    /// Serializes the same fields as `IndexData`, leaving out the title lookup.
    /// Deserialize with `IndexData`.
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("IndexData", 4)?;
        state.serialize_field("documents", &self.documents)?;
        state.serialize_field("vocabulary", &self.vocabulary)?;
        state.serialize_field("vectors", &self.vectors)?;
        state.serialize_field("matrix", &self.matrix)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::reference_corpus, vectorizer::index::initialize};

    #[test]
    fn cbor_roundtrip_reproduces_recommendations() {
        let index = initialize(reference_corpus()).unwrap();
        let bytes = index.to_cbor().unwrap();
        let restored = IndexData::<f64>::from_cbor(&bytes).unwrap().into_index().unwrap();

        assert_eq!(restored.len(), index.len());
        assert_eq!(restored.matrix(), index.matrix());
        for title in ["Inception", "frozen", "The Notebook", "Nonexistent Movie"] {
            assert_eq!(
                restored.recommend(title, 5).unwrap(),
                index.recommend(title, 5).unwrap()
            );
        }
    }

    #[test]
    fn data_and_index_serialize_identically() {
        let index = initialize(vec![("A", "drama"), ("B", "drama action")]).unwrap();
        let from_index = serde_json::to_value(&index).unwrap();
        let from_data = serde_json::to_value(index.to_data()).unwrap();
        assert_eq!(from_index, from_data);
    }

    #[test]
    fn mismatched_matrix_is_rejected() {
        let small = initialize(vec![("A", "drama")]).unwrap();
        let mut data = initialize(vec![("A", "drama"), ("B", "action")]).unwrap().into_data();
        data.matrix = small.matrix().clone();
        assert!(matches!(data.into_index(), Err(IndexError::Snapshot(_))));
    }

    #[test]
    fn tampered_matrix_is_rejected() {
        let index = initialize(vec![("A", "drama"), ("B", "drama action"), ("C", "")]).unwrap();
        let mut value = serde_json::to_value(index.to_data()).unwrap();
        // 3×3 row-major: (0, 1) breaks symmetry, (2, 2) gives the empty document a unit diagonal
        value["matrix"]["values"][1] = serde_json::json!(-0.9);
        value["matrix"]["values"][8] = serde_json::json!(1.0);
        let data: IndexData<f64> = serde_json::from_value(value).unwrap();
        assert!(matches!(data.into_index(), Err(IndexError::Snapshot(_))));
    }

    #[test]
    fn empty_document_with_unit_diagonal_is_rejected() {
        let index = initialize(vec![("A", "drama"), ("C", "")]).unwrap();
        let mut value = serde_json::to_value(index.to_data()).unwrap();
        value["matrix"]["values"][3] = serde_json::json!(1.0);
        let data: IndexData<f64> = serde_json::from_value(value).unwrap();
        let err = data.into_index().unwrap_err();
        assert!(err.to_string().contains("diagonal (1, 1)"), "{err}");
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let res = IndexData::<f64>::from_cbor(&[0xff, 0x00, 0x13]);
        assert!(matches!(res, Err(IndexError::Cbor(_))));
    }
}
