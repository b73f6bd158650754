mod analysis;
mod config;
mod documents;
mod embedding;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod routes;
mod skills;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::orchestrator::AnalysisOrchestrator;
use crate::analysis::pipeline::ResumeAnalyzer;
use crate::config::{Config, EmbeddingBackend};
use crate::embedding::{index::load_vocabulary, Embedder, EmbeddingIndex, HashingEmbedder};
use crate::extraction::extractor::EntityExtractor;
use crate::extraction::ner::HeuristicRecognizer;
use crate::llm_client::{DisabledGenerator, GeminiClient, InsightGenerator};
use crate::routes::build_router;
use crate::skills::matcher::SkillMatcher;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Embedding backend + skill index (fatal on any fault)
    let embedder = build_embedder(config.embedding_backend)?;
    let vocabulary = load_vocabulary(&config.skills_db_path)?;
    let index = {
        let embedder = Arc::clone(&embedder);
        tokio::task::spawn_blocking(move || EmbeddingIndex::build(vocabulary, embedder.as_ref()))
            .await
            .context("index build task failed")??
    };
    let threshold = config
        .skill_threshold
        .unwrap_or_else(|| embedder.match_threshold());
    let extractor = EntityExtractor::new(Arc::new(HeuristicRecognizer))
        .with_skill_vocabulary(index.vocabulary());
    let matcher = SkillMatcher::new(Arc::new(index), embedder, threshold);
    info!(
        "Skill matcher ready: backend {}, threshold {}",
        matcher.embedder_name(),
        matcher.threshold()
    );

    // Generative collaborator; without a key every analysis is deterministic
    let generator: Arc<dyn InsightGenerator> = match &config.gemini_api_key {
        Some(key) => {
            let client = GeminiClient::new(key.clone(), config.gemini_model.clone())?;
            info!("Gemini client initialized (model: {})", client.model());
            Arc::new(client)
        }
        None => {
            info!("GEMINI_API_KEY not set; using deterministic recommendations only");
            Arc::new(DisabledGenerator)
        }
    };

    info!("Entity recognizer: {}", extractor.recognizer_name());

    let state = AppState {
        analyzer: Arc::new(ResumeAnalyzer::new(
            extractor,
            matcher,
            AnalysisOrchestrator::new(generator),
        )),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_embedder(backend: EmbeddingBackend) -> Result<Arc<dyn Embedder>> {
    match backend {
        EmbeddingBackend::Hashing => {
            let embedder = HashingEmbedder::default();
            info!("Using lexical hashing embedder ({} buckets)", embedder.dimension());
            Ok(Arc::new(embedder))
        }
        #[cfg(feature = "embeddings")]
        EmbeddingBackend::FastEmbed => {
            let embedder = embedding::FastEmbedEmbedder::default_model()
                .context("failed to load fastembed model")?;
            Ok(Arc::new(embedder))
        }
        #[cfg(not(feature = "embeddings"))]
        EmbeddingBackend::FastEmbed => anyhow::bail!(
            "EMBEDDING_BACKEND=fastembed requires building with --features embeddings"
        ),
    }
}
