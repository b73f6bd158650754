//! Niche detection over matched skill names.
//!
//! Each niche counts the skills whose lower-cased name contains any of its
//! keywords. `Fullstack` sums a frontend count and a backend count, so one
//! skill may add to both halves. The dominant niche is found by scanning
//! `Niche::ORDER` and replacing the leader only on a strictly higher score,
//! which makes declaration order the tie-break.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Niche {
    Web3,
    Ml,
    Cloud,
    Devops,
    Mobile,
    Fullstack,
}

impl Niche {
    /// Precedence order for ties.
    pub const ORDER: [Niche; 6] = [
        Niche::Web3,
        Niche::Ml,
        Niche::Cloud,
        Niche::Devops,
        Niche::Mobile,
        Niche::Fullstack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Niche::Web3 => "web3",
            Niche::Ml => "ml",
            Niche::Cloud => "cloud",
            Niche::Devops => "devops",
            Niche::Mobile => "mobile",
            Niche::Fullstack => "fullstack",
        }
    }

    /// Upper-case label used in generated prose ("WEB3", "ML", ...).
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }

    /// Keywords for single-set niches; `None` for `Fullstack`.
    fn keywords(&self) -> Option<&'static [&'static str]> {
        match self {
            Niche::Web3 => Some(&["web3", "blockchain", "solana", "ethereum", "smart contract"]),
            Niche::Ml => Some(&["machine learning", "tensorflow", "pytorch", "scikit", "ml"]),
            Niche::Cloud => Some(&["aws", "azure", "gcp", "lambda", "kubernetes"]),
            Niche::Devops => Some(&["docker", "jenkins", "ci/cd", "terraform", "ansible"]),
            Niche::Mobile => Some(&["react native", "flutter", "ios", "android", "mobile"]),
            Niche::Fullstack => None,
        }
    }
}

impl fmt::Display for Niche {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const FRONTEND_KEYWORDS: &[&str] = &["react", "vue", "angular"];
const BACKEND_KEYWORDS: &[&str] = &["node", "express", "django"];

/// Dominant niche and its score for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicheProfile {
    pub niche: Niche,
    pub score: u32,
}

fn count_matching<S: AsRef<str>>(skills: &[S], keywords: &[&str]) -> u32 {
    skills
        .iter()
        .filter(|s| {
            let lower = s.as_ref().to_lowercase();
            keywords.iter().any(|k| lower.contains(k))
        })
        .count() as u32
}

pub fn score<S: AsRef<str>>(niche: Niche, skills: &[S]) -> u32 {
    match niche.keywords() {
        Some(keywords) => count_matching(skills, keywords),
        None => count_matching(skills, FRONTEND_KEYWORDS) + count_matching(skills, BACKEND_KEYWORDS),
    }
}

/// Every niche with its score, in precedence order.
pub fn score_all<S: AsRef<str>>(skills: &[S]) -> [(Niche, u32); 6] {
    Niche::ORDER.map(|niche| (niche, score(niche, skills)))
}

pub fn detect<S: AsRef<str>>(skills: &[S]) -> NicheProfile {
    let mut dominant = NicheProfile {
        niche: Niche::ORDER[0],
        score: 0,
    };
    for (position, (niche, score)) in score_all(skills).into_iter().enumerate() {
        if position == 0 || score > dominant.score {
            dominant = NicheProfile { niche, score };
        }
    }
    dominant
}
