//! Analysis orchestrator: one validated generative attempt, with the
//! deterministic engine as the guaranteed fallback.
//!
//! The decision is an explicit value (`GenerationOutcome`) so it can be tested
//! without a network: `interpret_response` is pure and `analyze` only maps
//! `NeedsFallback` onto `fallback_analysis`.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::prompts::build_analysis_prompt;
use crate::analysis::recommend::recommend;
use crate::llm_client::{GenerationParams, InsightGenerator};
use crate::models::analysis::{AnalysisResult, CareerRecommendation, SalaryPrediction};
use crate::models::entities::ExtractedEntities;
use crate::models::skills::SkillMatch;
use crate::skills::niche;

const MIN_RECOMMENDATIONS: usize = 2;
const MAX_RECOMMENDATIONS: usize = 3;
const MAX_MISSING_SKILLS: usize = 5;
const MAX_QUICK_WINS: usize = 3;
const DEFAULT_ATS_SCORE: u32 = 70;

/// Why a generative response was discarded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FallbackReason {
    #[error("generative model unavailable: {0}")]
    Unavailable(String),

    #[error("generative model returned no text")]
    EmptyResponse,

    #[error("response is not valid JSON: {0}")]
    Unparsable(String),

    #[error("response has {0} career recommendations, need at least 2")]
    TooFewRecommendations(usize),

    #[error("response does not fit the analysis shape: {0}")]
    SchemaMismatch(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Success(AnalysisResult),
    NeedsFallback(FallbackReason),
}

/// Lenient view of the model's JSON. Missing fields take defaults; present
/// fields must have the right type.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    career_recommendations: Vec<CareerRecommendation>,
    #[serde(default = "default_ats_score")]
    ats_score: u32,
    #[serde(default)]
    ats_feedback: String,
    #[serde(default)]
    missing_skills: Vec<String>,
    #[serde(default)]
    quick_wins: Vec<String>,
    #[serde(default)]
    salary_prediction: SalaryPrediction,
    #[serde(default)]
    summary: String,
}

fn default_ats_score() -> u32 {
    DEFAULT_ATS_SCORE
}

impl From<RawAnalysis> for AnalysisResult {
    fn from(mut raw: RawAnalysis) -> Self {
        raw.career_recommendations.truncate(MAX_RECOMMENDATIONS);
        raw.missing_skills.truncate(MAX_MISSING_SKILLS);
        raw.quick_wins.truncate(MAX_QUICK_WINS);
        AnalysisResult {
            career_recommendations: raw.career_recommendations,
            ats_score: raw.ats_score,
            ats_feedback: raw.ats_feedback,
            missing_skills: raw.missing_skills,
            quick_wins: raw.quick_wins,
            salary_prediction: raw.salary_prediction,
            summary: raw.summary,
        }
    }
}

/// Slices from the first `{` to the last `}` so prose or code fences around
/// the object are ignored. Text without `{` is returned unchanged.
pub fn extract_json_object(text: &str) -> &str {
    let Some(start) = text.find('{') else {
        return text;
    };
    match text.rfind('}') {
        Some(end) if end > start => &text[start..=end],
        _ => "",
    }
}

/// Validates a raw model payload and coerces it into an `AnalysisResult`.
pub fn interpret_response(payload: Option<&str>) -> GenerationOutcome {
    let text = match payload.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => return GenerationOutcome::NeedsFallback(FallbackReason::EmptyResponse),
    };

    let value: Value = match serde_json::from_str(extract_json_object(text)) {
        Ok(value) => value,
        Err(e) => return GenerationOutcome::NeedsFallback(FallbackReason::Unparsable(e.to_string())),
    };

    let recommendations = value
        .get("career_recommendations")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    if recommendations < MIN_RECOMMENDATIONS {
        return GenerationOutcome::NeedsFallback(FallbackReason::TooFewRecommendations(
            recommendations,
        ));
    }

    match serde_json::from_value::<RawAnalysis>(value) {
        Ok(raw) => GenerationOutcome::Success(raw.into()),
        Err(e) => GenerationOutcome::NeedsFallback(FallbackReason::SchemaMismatch(e.to_string())),
    }
}

/// Deterministic analysis for the same inputs the generative path received.
pub fn fallback_analysis(skills: &[SkillMatch]) -> AnalysisResult {
    let names: Vec<&str> = skills.iter().map(|s| s.skill.as_str()).collect();
    let profile = niche::detect(&names);
    recommend(profile.niche, profile.score, skills.len())
}

#[derive(Clone)]
pub struct AnalysisOrchestrator {
    generator: Arc<dyn InsightGenerator>,
    params: GenerationParams,
}

impl AnalysisOrchestrator {
    pub fn new(generator: Arc<dyn InsightGenerator>) -> Self {
        Self {
            generator,
            params: GenerationParams::default(),
        }
    }

    pub fn generator_name(&self) -> &'static str {
        self.generator.name()
    }

    pub fn generator_enabled(&self) -> bool {
        self.generator.is_enabled()
    }

    /// Makes exactly one generative call and classifies the result.
    pub async fn attempt(
        &self,
        resume_text: &str,
        skills: &[SkillMatch],
        entities: &ExtractedEntities,
    ) -> GenerationOutcome {
        let prompt = build_analysis_prompt(resume_text, skills, entities);
        match self.generator.generate(&prompt, &self.params).await {
            Ok(payload) => interpret_response(payload.as_deref()),
            Err(e) => GenerationOutcome::NeedsFallback(FallbackReason::Unavailable(e.to_string())),
        }
    }

    /// Never fails: any generative fault is replaced by `fallback_analysis`.
    pub async fn analyze(
        &self,
        resume_text: &str,
        skills: &[SkillMatch],
        entities: &ExtractedEntities,
    ) -> AnalysisResult {
        match self.attempt(resume_text, skills, entities).await {
            GenerationOutcome::Success(result) => {
                info!(
                    "Generative analysis accepted ({}): {} recommendations",
                    self.generator.name(),
                    result.career_recommendations.len()
                );
                result
            }
            GenerationOutcome::NeedsFallback(reason) => {
                warn!("Falling back to deterministic analysis: {reason}");
                fallback_analysis(skills)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays one canned reply and records the prompt it was given.
    struct ScriptedGenerator {
        reply: Mutex<Option<Result<Option<String>, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(reply: Result<Option<String>, LlmError>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn text(text: &str) -> Arc<Self> {
            Self::new(Ok(Some(text.to_string())))
        }
    }

    #[async_trait]
    impl InsightGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            prompt: &str,
            _params: &GenerationParams,
        ) -> Result<Option<String>, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .lock()
                .unwrap()
                .take()
                .expect("generator called more than once")
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn skill(name: &str) -> SkillMatch {
        SkillMatch {
            skill: name.to_string(),
            confidence: 0.8,
            context: String::new(),
        }
    }

    fn web3_skills() -> Vec<SkillMatch> {
        vec![skill("Ethereum"), skill("Solana"), skill("React")]
    }

    fn recommendations_json(count: usize) -> String {
        let recs: Vec<String> = (0..count)
            .map(|i| format!(r#"{{"role": "Role {i}", "match_score": {}, "reasoning": "why"}}"#, 90 - i))
            .collect();
        format!(r#"{{"career_recommendations": [{}], "summary": "ok"}}"#, recs.join(","))
    }

    async fn run(generator: Arc<ScriptedGenerator>, skills: &[SkillMatch]) -> AnalysisResult {
        AnalysisOrchestrator::new(generator)
            .analyze("resume text", skills, &ExtractedEntities::default())
            .await
    }

    #[test]
    fn test_extract_json_object_strips_surroundings() {
        assert_eq!(extract_json_object("Sure!\n```json\n{\"a\": {\"b\": 1}}\n```"), "{\"a\": {\"b\": 1}}");
        assert_eq!(extract_json_object("no braces"), "no braces");
        assert_eq!(extract_json_object("} backwards {"), "");
    }

    #[test]
    fn test_empty_payloads_need_fallback() {
        assert_eq!(
            interpret_response(None),
            GenerationOutcome::NeedsFallback(FallbackReason::EmptyResponse)
        );
        assert_eq!(
            interpret_response(Some("   ")),
            GenerationOutcome::NeedsFallback(FallbackReason::EmptyResponse)
        );
    }

    #[test]
    fn test_garbage_needs_fallback() {
        assert!(matches!(
            interpret_response(Some("I cannot help with that")),
            GenerationOutcome::NeedsFallback(FallbackReason::Unparsable(_))
        ));
        assert!(matches!(
            interpret_response(Some("{\"career_recommendations\": [")),
            GenerationOutcome::NeedsFallback(FallbackReason::Unparsable(_))
        ));
    }

    #[test]
    fn test_too_few_recommendations() {
        for count in [0, 1] {
            assert_eq!(
                interpret_response(Some(&recommendations_json(count))),
                GenerationOutcome::NeedsFallback(FallbackReason::TooFewRecommendations(count))
            );
        }
        assert_eq!(
            interpret_response(Some(r#"{"summary": "no recs"}"#)),
            GenerationOutcome::NeedsFallback(FallbackReason::TooFewRecommendations(0))
        );
    }

    #[test]
    fn test_wrong_field_types_need_fallback() {
        let payload = r#"{"career_recommendations": [{"role": "A"}, {"role": "B"}]}"#;
        assert!(matches!(
            interpret_response(Some(payload)),
            GenerationOutcome::NeedsFallback(FallbackReason::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let GenerationOutcome::Success(result) = interpret_response(Some(&recommendations_json(2)))
        else {
            panic!("expected success");
        };
        assert_eq!(result.career_recommendations.len(), 2);
        assert_eq!(result.ats_score, 70);
        assert_eq!(result.salary_prediction, SalaryPrediction::inr(600_000, 1_200_000));
        assert!(result.missing_skills.is_empty());
        assert_eq!(result.summary, "ok");
    }

    #[test]
    fn test_lists_are_truncated() {
        let payload = r#"Here you go:
        {
          "career_recommendations": [
            {"role": "A", "match_score": 90, "reasoning": "a"},
            {"role": "B", "match_score": 85, "reasoning": "b"},
            {"role": "C", "match_score": 80, "reasoning": "c"},
            {"role": "D", "match_score": 75, "reasoning": "d"}
          ],
          "ats_score": 82,
          "ats_feedback": "Tighten bullets.",
          "missing_skills": ["1", "2", "3", "4", "5", "6", "7"],
          "quick_wins": ["x", "y", "z", "w"],
          "salary_prediction": {"min": 900000, "max": 1800000},
          "summary": "Solid backend profile."
        }
        Good luck!"#;
        let GenerationOutcome::Success(result) = interpret_response(Some(payload)) else {
            panic!("expected success");
        };
        assert_eq!(result.career_recommendations.len(), 3);
        assert_eq!(result.career_recommendations[2].role, "C");
        assert_eq!(result.missing_skills.len(), 5);
        assert_eq!(result.quick_wins, vec!["x", "y", "z"]);
        assert_eq!(result.ats_score, 82);
        assert_eq!(result.salary_prediction, SalaryPrediction::inr(900_000, 1_800_000));
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let generator = ScriptedGenerator::text(&recommendations_json(3));
        let result = run(generator.clone(), &web3_skills()).await;
        assert_eq!(result.career_recommendations[0].role, "Role 0");
        assert_eq!(generator.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_one_recommendation_equals_engine_output() {
        let skills = web3_skills();
        let result = run(ScriptedGenerator::text(&recommendations_json(1)), &skills).await;
        assert_eq!(result, fallback_analysis(&skills));
        assert_eq!(result, recommend(niche::Niche::Web3, 2, 3));
    }

    #[tokio::test]
    async fn test_zero_recommendations_equals_engine_output() {
        let skills = web3_skills();
        let result = run(ScriptedGenerator::text(&recommendations_json(0)), &skills).await;
        assert_eq!(result, fallback_analysis(&skills));
    }

    #[tokio::test]
    async fn test_generator_error_falls_back() {
        let generator = ScriptedGenerator::new(Err(LlmError::Api {
            status: 503,
            message: "overloaded".into(),
        }));
        let result = run(generator, &[]).await;
        assert_eq!(result, recommend(niche::Niche::Web3, 0, 0));
        assert_eq!(result.career_recommendations.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_reply_falls_back() {
        let result = run(ScriptedGenerator::new(Ok(None)), &web3_skills()).await;
        assert_eq!(result.career_recommendations[0].role, "Web3/DeFi Developer");
    }

    #[tokio::test]
    async fn test_attempt_reports_reason() {
        let orchestrator = AnalysisOrchestrator::new(Arc::new(crate::llm_client::DisabledGenerator));
        let outcome = orchestrator
            .attempt("resume", &[], &ExtractedEntities::default())
            .await;
        assert!(matches!(
            outcome,
            GenerationOutcome::NeedsFallback(FallbackReason::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_prompt_is_bounded() {
        let generator = ScriptedGenerator::new(Ok(None));
        let skills: Vec<SkillMatch> = (0..40).map(|i| skill(&format!("S{i:02}"))).collect();
        let resume = "ζ".repeat(10_000);
        AnalysisOrchestrator::new(generator.clone())
            .analyze(&resume, &skills, &ExtractedEntities::default())
            .await;
        let prompt = generator.prompts.lock().unwrap().remove(0);
        assert!(prompt.contains("S24"));
        assert!(!prompt.contains("S25"));
        assert_eq!(prompt.matches('ζ').count(), 2500);
    }
}
