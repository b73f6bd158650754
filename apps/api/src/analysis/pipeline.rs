//! End-to-end request pipeline: document text → entities + skills → niche →
//! career analysis, wrapped in a timed report.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::orchestrator::AnalysisOrchestrator;
use crate::documents::extract_resume_text;
use crate::errors::AppError;
use crate::extraction::extractor::EntityExtractor;
use crate::models::analysis::AnalysisResult;
use crate::models::entities::ExtractedEntities;
use crate::models::skills::SkillMatch;
use crate::skills::matcher::SkillMatcher;
use crate::skills::niche::{self, NicheProfile};

/// Shorter extracted text is treated as an unreadable upload.
pub const MIN_RESUME_CHARS: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct BackendInfo {
    pub embedding: &'static str,
    pub generator: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeAnalysisReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub status: &'static str,
    /// Seconds, rounded to two decimals.
    pub processing_time: f64,
    pub extracted_info: ExtractedEntities,
    pub skills: Vec<SkillMatch>,
    pub niche: NicheProfile,
    pub analysis: AnalysisResult,
    pub backends: BackendInfo,
}

pub struct ResumeAnalyzer {
    extractor: EntityExtractor,
    matcher: SkillMatcher,
    orchestrator: AnalysisOrchestrator,
}

impl ResumeAnalyzer {
    pub fn new(
        extractor: EntityExtractor,
        matcher: SkillMatcher,
        orchestrator: AnalysisOrchestrator,
    ) -> Self {
        Self {
            extractor,
            matcher,
            orchestrator,
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.matcher.index().len()
    }

    pub fn backends(&self) -> BackendInfo {
        BackendInfo {
            embedding: self.matcher.embedder_name(),
            generator: self.orchestrator.generator_name(),
        }
    }

    pub fn generator_enabled(&self) -> bool {
        self.orchestrator.generator_enabled()
    }

    /// Parses an uploaded PDF/DOCX on the blocking pool, then analyses it.
    pub async fn analyze_document(
        self: Arc<Self>,
        file_name: String,
        data: Vec<u8>,
    ) -> Result<ResumeAnalysisReport, AppError> {
        info!("Parsing document {file_name} ({} bytes)", data.len());
        let text = tokio::task::spawn_blocking(move || extract_resume_text(&file_name, &data))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("document parsing task failed: {e}")))??;
        self.analyze_text(text).await
    }

    pub async fn analyze_text(
        self: Arc<Self>,
        text: String,
    ) -> Result<ResumeAnalysisReport, AppError> {
        let started = Instant::now();
        let text = text.trim().to_string();
        let length = text.chars().count();
        if length < MIN_RESUME_CHARS {
            return Err(AppError::Validation(format!(
                "Resume text too short or unreadable ({length} characters, need at least {MIN_RESUME_CHARS})"
            )));
        }
        info!("Analyzing resume ({length} characters)");

        // Extraction and matching are CPU-bound; keep them off the async executor.
        let worker = Arc::clone(&self);
        let (text, entities, skills) = tokio::task::spawn_blocking(move || {
            let entities = worker.extractor.extract(&text);
            let skills = worker.matcher.match_skills(&text);
            (text, entities, skills)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))?;
        let skills = skills?;

        if entities.is_empty() {
            warn!("No contact details or entities found in resume text");
        }
        info!(
            "Extracted entities: name={}, {} organizations, {} locations, {} dates",
            entities.name.is_some(),
            entities.organizations.len(),
            entities.locations.len(),
            entities.dates.len()
        );
        let top: Vec<&str> = skills.iter().take(5).map(|s| s.skill.as_str()).collect();
        info!("Matched {} skills (top: {})", skills.len(), top.join(", "));

        let names: Vec<&str> = skills.iter().map(|s| s.skill.as_str()).collect();
        let profile = niche::detect(&names);
        info!("Dominant niche: {} (score {})", profile.niche, profile.score);

        let analysis = self.orchestrator.analyze(&text, &skills, &entities).await;

        let processing_time = (started.elapsed().as_secs_f64() * 100.0).round() / 100.0;
        info!("Analysis complete in {processing_time:.2}s");

        Ok(ResumeAnalysisReport {
            analysis_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            status: "success",
            processing_time,
            extracted_info: entities,
            skills,
            niche: profile,
            analysis,
            backends: self.backends(),
        })
    }
}
