//! Semantic skill matcher.
//!
//! Algorithm:
//! 1. Newlines become sentence breaks; split on ". " and keep chunks whose
//!    trimmed length is strictly between 10 and 500 characters.
//! 2. Embed every chunk with the same backend that built the index.
//! 3. Compare every chunk against every vocabulary vector (cosine).
//! 4. A skill matches when some chunk beats the threshold; the best chunk
//!    sets its confidence and context (first seen wins an exact tie).
//! 5. Sort by confidence descending and keep the top 25.

use std::sync::Arc;

use tracing::debug;

use crate::embedding::{cosine_similarity, Embedder, EmbeddingError, EmbeddingIndex};
use crate::models::skills::SkillMatch;

pub const DEFAULT_THRESHOLD: f32 = 0.55;
pub const MAX_MATCHES: usize = 25;
const CONTEXT_CHARS: usize = 150;
const MIN_CHUNK_CHARS: usize = 10;
const MAX_CHUNK_CHARS: usize = 500;

#[derive(Clone)]
pub struct SkillMatcher {
    index: Arc<EmbeddingIndex>,
    embedder: Arc<dyn Embedder>,
    threshold: f32,
}

impl SkillMatcher {
    /// `embedder` must be the one `index` was built with.
    pub fn new(index: Arc<EmbeddingIndex>, embedder: Arc<dyn Embedder>, threshold: f32) -> Self {
        Self {
            index,
            embedder,
            threshold,
        }
    }

    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }

    pub fn embedder_name(&self) -> &'static str {
        self.embedder.name()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn match_skills(&self, text: &str) -> Result<Vec<SkillMatch>, EmbeddingError> {
        self.match_with_threshold(text, self.threshold)
    }

    /// Embedding failures are not recoverable per request and propagate.
    pub fn match_with_threshold(
        &self,
        text: &str,
        threshold: f32,
    ) -> Result<Vec<SkillMatch>, EmbeddingError> {
        let chunks = chunk_text(text);
        if chunks.is_empty() || self.index.is_empty() {
            debug!("No usable text chunks; skipping skill matching");
            return Ok(Vec::new());
        }

        let chunk_vectors = self.embedder.embed_batch(&chunks)?;
        if chunk_vectors.len() != chunks.len() {
            return Err(EmbeddingError::BatchSize {
                expected: chunks.len(),
                found: chunk_vectors.len(),
            });
        }
        if let Some(v) = chunk_vectors
            .iter()
            .find(|v| v.len() != self.index.dimension())
        {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.index.dimension(),
                found: v.len(),
            });
        }

        // best[i] = (similarity, chunk position) for vocabulary entry i
        let mut best: Vec<Option<(f32, usize)>> = vec![None; self.index.len()];
        for (chunk_pos, chunk_vector) in chunk_vectors.iter().enumerate() {
            for (slot, (_, skill_vector)) in best.iter_mut().zip(self.index.entries()) {
                let similarity = cosine_similarity(chunk_vector, skill_vector);
                if similarity <= threshold {
                    continue;
                }
                if slot.map_or(true, |(current, _)| similarity > current) {
                    *slot = Some((similarity, chunk_pos));
                }
            }
        }

        let mut matches: Vec<SkillMatch> = self
            .index
            .vocabulary()
            .iter()
            .zip(best)
            .filter_map(|(skill, hit)| {
                hit.map(|(confidence, chunk_pos)| SkillMatch {
                    skill: skill.clone(),
                    confidence,
                    context: chunks[chunk_pos].chars().take(CONTEXT_CHARS).collect(),
                })
            })
            .collect();

        // Stable: equal confidences keep vocabulary order.
        matches.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        matches.truncate(MAX_MATCHES);

        debug!(
            chunks = chunks.len(),
            matched = matches.len(),
            threshold,
            "Skill matching complete"
        );
        Ok(matches)
    }
}

/// Splits resume text into sentence-like chunks in original order.
pub fn chunk_text(text: &str) -> Vec<&str> {
    // Split on ". " after treating each newline as a sentence end.
    let mut chunks = Vec::new();
    for line in text.split('\n') {
        for piece in line.split(". ") {
            let piece = piece.trim();
            let len = piece.chars().count();
            if len > MIN_CHUNK_CHARS && len < MAX_CHUNK_CHARS {
                chunks.push(piece);
            }
        }
    }
    chunks
}
