use serde::{Deserialize, Serialize};

pub const SALARY_CURRENCY: &str = "INR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRecommendation {
    pub role: String,
    pub match_score: u32, // 0 – 100
    pub reasoning: String,
}

/// Yearly salary band in rupees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryPrediction {
    pub min: u32,
    pub max: u32,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl SalaryPrediction {
    pub fn inr(min: u32, max: u32) -> Self {
        Self {
            min,
            max,
            currency: SALARY_CURRENCY.to_string(),
        }
    }

    /// Lower bound in lakhs, truncated.
    pub fn min_lakhs(&self) -> u32 {
        self.min / 100_000
    }

    /// Upper bound in lakhs, truncated.
    pub fn max_lakhs(&self) -> u32 {
        self.max / 100_000
    }
}

impl Default for SalaryPrediction {
    fn default() -> Self {
        Self::inr(600_000, 1_200_000)
    }
}

fn default_currency() -> String {
    SALARY_CURRENCY.to_string()
}

/// Career insights for one resume, whether produced by the generative model
/// or by the deterministic recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub career_recommendations: Vec<CareerRecommendation>,
    /// Nominally 0 – 100; the deterministic engine does not clamp it.
    pub ats_score: u32,
    pub ats_feedback: String,
    pub missing_skills: Vec<String>,
    pub quick_wins: Vec<String>,
    pub salary_prediction: SalaryPrediction,
    pub summary: String,
}
