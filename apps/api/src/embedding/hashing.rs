use crate::embedding::{Embedder, EmbeddingError};

pub const DEFAULT_DIMENSION: usize = 4096;

/// Cosine threshold for lexical matching. A one-word skill against a chunk of
/// `n` content words scores roughly `1/sqrt(n)`, far below what sentence
/// models reach for the same chunk.
pub const HASHING_THRESHOLD: f32 = 0.35;

const TOKEN_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.25;

/// Function words carry no skill signal and only dilute chunk vectors.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "the", "with", "in", "on", "of", "for", "to", "at", "by", "as", "from",
    "into", "using", "via", "them", "it", "its", "our", "we", "i", "my", "was", "were", "is",
    "are", "be", "this", "that",
];

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Model-free embedder: feature hashing over lower-cased content words and
/// their boundary-marked character trigrams, L2-normalised.
///
/// Deterministic across runs and platforms, so indexes built with it are
/// reproducible. Similarity is lexical rather than semantic; use the
/// fastembed backend when paraphrase matching matters.
#[derive(Debug, Clone, Copy)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];
        for token in tokens(text) {
            vector[self.bucket(token.as_bytes())] += TOKEN_WEIGHT;

            let marked: Vec<char> = std::iter::once('^')
                .chain(token.chars())
                .chain(std::iter::once('$'))
                .collect();
            for gram in marked.windows(3) {
                let gram: String = gram.iter().collect();
                vector[self.bucket(gram.as_bytes())] += TRIGRAM_WEIGHT;
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }

    fn bucket(&self, bytes: &[u8]) -> usize {
        (fnv1a(bytes) % self.dimension as u64) as usize
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl Embedder for HashingEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn name(&self) -> &'static str {
        "hashing"
    }

    fn match_threshold(&self) -> f32 {
        HASHING_THRESHOLD
    }
}

/// Lower-cased alphanumeric tokens minus stopwords; `+` and `#` stay attached
/// so "C++" and "C#" survive.
fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}
