use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::embedding::{Embedder, EmbeddingError};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to read skill vocabulary {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("skill vocabulary is not a JSON array of strings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("skill vocabulary is empty")]
    EmptyVocabulary,

    #[error("vocabulary has {vocabulary} entries but {vectors} embedding vectors")]
    CountMismatch { vocabulary: usize, vectors: usize },

    #[error("vector {position} has dimension {found}, expected {expected}")]
    RaggedVectors {
        position: usize,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

/// Skill vocabulary with one precomputed vector per entry.
///
/// Built once at startup and shared read-only (`Arc<EmbeddingIndex>`) by every
/// request; there is no mutation after construction, so no locking.
#[derive(Debug)]
pub struct EmbeddingIndex {
    vocabulary: Vec<String>,
    vectors: Vec<Vec<f32>>,
    dimension: usize,
}

impl EmbeddingIndex {
    /// Embeds every vocabulary entry with `embedder`. Blank entries and
    /// repeats are dropped, keeping the first occurrence.
    pub fn build(vocabulary: Vec<String>, embedder: &dyn Embedder) -> Result<Self, IndexError> {
        let total = vocabulary.len();
        let mut seen = HashSet::new();
        let vocabulary: Vec<String> = vocabulary
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();
        if vocabulary.len() < total {
            warn!(
                "Dropped {} blank or duplicate vocabulary entries",
                total - vocabulary.len()
            );
        }
        if vocabulary.is_empty() {
            return Err(IndexError::EmptyVocabulary);
        }

        let refs: Vec<&str> = vocabulary.iter().map(String::as_str).collect();
        let vectors = embedder.embed_batch(&refs)?;
        let index = Self::from_parts(vocabulary, vectors)?;

        info!(
            "Embedding index ready: {} skills, dimension {} ({})",
            index.len(),
            index.dimension,
            embedder.name()
        );
        Ok(index)
    }

    /// Assembles an index from precomputed vectors, enforcing one vector per
    /// entry and a single shared dimension.
    pub fn from_parts(vocabulary: Vec<String>, vectors: Vec<Vec<f32>>) -> Result<Self, IndexError> {
        if vocabulary.is_empty() {
            return Err(IndexError::EmptyVocabulary);
        }
        if vocabulary.len() != vectors.len() {
            return Err(IndexError::CountMismatch {
                vocabulary: vocabulary.len(),
                vectors: vectors.len(),
            });
        }
        let dimension = vectors[0].len();
        if let Some((position, v)) = vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != dimension || v.is_empty())
        {
            return Err(IndexError::RaggedVectors {
                position,
                expected: dimension,
                found: v.len(),
            });
        }

        Ok(Self {
            vocabulary,
            vectors,
            dimension,
        })
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// `(skill, vector)` pairs in vocabulary order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.vocabulary
            .iter()
            .map(String::as_str)
            .zip(self.vectors.iter().map(Vec::as_slice))
    }
}

/// Reads the skill vocabulary: a JSON array of strings.
pub fn load_vocabulary(path: impl AsRef<Path>) -> Result<Vec<String>, IndexError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}
