//! Text embedding backends and the process-wide skill index.
//!
//! `Embedder` is the seam between the skill matcher and whichever model turns
//! text into vectors: the built-in `HashingEmbedder`, or fastembed (ONNX) when
//! the `embeddings` feature is enabled.

use thiserror::Error;

use crate::skills::matcher::DEFAULT_THRESHOLD;

pub mod hashing;
pub mod index;

pub use hashing::HashingEmbedder;
pub use index::EmbeddingIndex;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding model error: {0}")]
    Model(String),

    #[error("embedding returned no results")]
    EmptyResult,

    #[error("embedding returned {found} vectors for {expected} inputs")]
    BatchSize { expected: usize, found: usize },

    #[error("vector dimension {found} does not match index dimension {expected}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// Embeds a batch of texts, one vector per input, in input order.
pub trait Embedder: Send + Sync {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Short backend label for logs and health output.
    fn name(&self) -> &'static str;

    /// Cosine threshold the skill matcher uses with this backend unless
    /// configured otherwise.
    fn match_threshold(&self) -> f32 {
        DEFAULT_THRESHOLD
    }
}

/// Cosine similarity; zero when either vector has no magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(feature = "embeddings")]
mod fastembed_impl {
    use super::{Embedder, EmbeddingError};
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use std::sync::Mutex;

    /// Sentence embedder backed by fastembed (ONNX Runtime).
    ///
    /// `TextEmbedding::embed` takes `&mut self`, hence the `Mutex`.
    pub struct FastEmbedEmbedder {
        model: Mutex<TextEmbedding>,
    }

    impl FastEmbedEmbedder {
        pub fn new(model: EmbeddingModel) -> Result<Self, EmbeddingError> {
            let options = InitOptions::new(model).with_show_download_progress(false);
            let embedding = TextEmbedding::try_new(options)
                .map_err(|e| EmbeddingError::Model(e.to_string()))?;
            Ok(Self {
                model: Mutex::new(embedding),
            })
        }

        /// MiniLM sentence model, the same family the skill threshold was tuned on.
        pub fn default_model() -> Result<Self, EmbeddingError> {
            Self::new(EmbeddingModel::AllMiniLML6V2)
        }
    }

    impl Embedder for FastEmbedEmbedder {
        fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            let mut model = self
                .model
                .lock()
                .map_err(|_| EmbeddingError::Model("embedding model lock poisoned".into()))?;
            let embeddings = model
                .embed(texts.to_vec(), None)
                .map_err(|e| EmbeddingError::Model(e.to_string()))?;
            if embeddings.is_empty() {
                return Err(EmbeddingError::EmptyResult);
            }
            Ok(embeddings)
        }

        fn name(&self) -> &'static str {
            "fastembed"
        }
    }
}

#[cfg(feature = "embeddings")]
pub use fastembed_impl::FastEmbedEmbedder;

#[cfg(test)]
pub mod testing {
    use super::{Embedder, EmbeddingError};

    /// One axis per keyword: a text's vector has 1.0 on every axis whose
    /// keyword it contains (case-insensitive). Makes similarities easy to
    /// compute by hand: a skill hitting one axis against a chunk hitting `n`
    /// axes scores `1/sqrt(n)`.
    pub struct KeywordEmbedder {
        keywords: Vec<String>,
    }

    impl KeywordEmbedder {
        pub fn new(keywords: &[&str]) -> Self {
            Self {
                keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            }
        }
    }

    impl Embedder for KeywordEmbedder {
        fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts
                .iter()
                .map(|text| {
                    let lower = text.to_lowercase();
                    self.keywords
                        .iter()
                        .map(|k| if lower.contains(k.as_str()) { 1.0 } else { 0.0 })
                        .collect()
                })
                .collect())
        }

        fn name(&self) -> &'static str {
            "keyword"
        }
    }

    /// Always fails, standing in for a missing model artifact.
    pub struct BrokenEmbedder;

    impl Embedder for BrokenEmbedder {
        fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Err(EmbeddingError::Model("model file not found".into()))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }
}
