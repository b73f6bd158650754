use serde::{Deserialize, Serialize};

/// A vocabulary skill found in the resume by embedding similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub skill: String,
    /// Best cosine similarity over all chunks; always above the match threshold.
    pub confidence: f32,
    /// First 150 characters of the chunk that produced `confidence`.
    pub context: String,
}
