//! Deterministic recommendation engine.
//!
//! Total over its inputs: every call yields three recommendations, a salary
//! band with `min < max`, five gap skills and three quick wins. It is both the
//! fallback for the generative path and usable on its own.
//!
//! Branching: web3 and ml go deep at score ≥ 2, cloud at ≥ 3. Everything else
//! (devops, mobile, fullstack, or a niche below its threshold) gets the generic
//! full-stack track.

use crate::models::analysis::{AnalysisResult, CareerRecommendation, SalaryPrediction};
use crate::skills::niche::Niche;

const BASE_ATS_SCORE: u32 = 65;
const ATS_POINTS_PER_SKILL: u32 = 3;

/// Score at which a niche gets its dedicated track; `None` means never.
fn deep_threshold(niche: Niche) -> Option<u32> {
    match niche {
        Niche::Web3 | Niche::Ml => Some(2),
        Niche::Cloud => Some(3),
        Niche::Devops | Niche::Mobile | Niche::Fullstack => None,
    }
}

pub fn goes_deep(niche: Niche, score: u32) -> bool {
    deep_threshold(niche).is_some_and(|threshold| score >= threshold)
}

/// `65 + 3 × skill_count`. Not clamped: more than 11 skills exceeds 100.
pub fn ats_score(skill_count: usize) -> u32 {
    BASE_ATS_SCORE + ATS_POINTS_PER_SKILL * skill_count as u32
}

fn rec(role: &str, match_score: u32, reasoning: impl Into<String>) -> CareerRecommendation {
    CareerRecommendation {
        role: role.to_string(),
        match_score,
        reasoning: reasoning.into(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Dedicated track for a niche that cleared its threshold.
struct DeepTrack {
    roles: [CareerRecommendation; 3],
    salary: SalaryPrediction,
    gaps: [&'static str; 5],
}

fn deep_track(niche: Niche) -> Option<DeepTrack> {
    let track = match niche {
        Niche::Web3 => DeepTrack {
            roles: [
                rec(
                    "Web3/DeFi Developer",
                    90,
                    "Your resume already shows blockchain work, so specialise. Pick a contract \
                     language: Solidity for Ethereum and its L2s (Base, Arbitrum, Optimism), Rust \
                     with Anchor for Solana, or Move for Sui/Aptos. Ship against real DeFi \
                     primitives such as Uniswap- or Aave-style forks and Metaplex NFTs, using \
                     Hardhat or Foundry for tooling. Target Polygon, Solana ecosystem grants and \
                     remote Web3 teams at ₹15-30L.",
                ),
                rec(
                    "Full-Stack Web3 Engineer",
                    85,
                    "Pair your web skills with on-chain work: dApps on Next.js with Wagmi and \
                     Viem, wallet flows through RainbowKit or WalletConnect, deployed to Base or \
                     Polygon. Crypto startups pay ₹12-25L for this mix.",
                ),
                rec(
                    "Smart Contract Auditor",
                    75,
                    "Longer-term path: learn static analysis (Slither, Mythril), study past \
                     exploits and work through Ethernaut-style CTFs. Auditors with 1-2 years of \
                     findings earn ₹20-40L.",
                ),
            ],
            salary: SalaryPrediction::inr(1_000_000, 2_000_000),
            gaps: [
                "Solidity or Rust",
                "Wallet integration (wagmi/viem)",
                "Smart contract testing",
                "Gas optimization",
                "DeFi protocol knowledge",
            ],
        },
        Niche::Ml => DeepTrack {
            roles: [
                rec(
                    "ML Engineer / MLOps",
                    88,
                    "You have the ML foundations; now take models to production. Version data \
                     and experiments with MLflow and DVC, serve with FastAPI or BentoML, add a \
                     vector database (Pinecone, Weaviate) and go deep on PyTorch or TensorFlow. \
                     AI startups and enterprise ML teams pay ₹10-20L, rising to ₹18-35L.",
                ),
                rec(
                    "LLM Application Developer",
                    82,
                    "Build retrieval-augmented apps with LangChain or LlamaIndex, fine-tune with \
                     LoRA/QLoRA and integrate hosted model APIs. ₹12-25L at AI-first companies.",
                ),
                rec(
                    "Computer Vision Engineer",
                    75,
                    "Specialise in detection and segmentation (YOLO, Detectron2) and edge \
                     deployment with ONNX or TensorRT. ₹12-28L across robotics, automotive and \
                     surveillance.",
                ),
            ],
            salary: SalaryPrediction::inr(800_000, 1_600_000),
            gaps: [
                "MLOps (MLflow, DVC)",
                "Model deployment (FastAPI)",
                "Vector databases",
                "Fine-tuning techniques",
                "A/B testing for models",
            ],
        },
        Niche::Cloud => DeepTrack {
            roles: [
                rec(
                    "Cloud/DevOps Engineer",
                    88,
                    "You already list several cloud services. Go deep on infrastructure as code \
                     (Terraform, CloudFormation), managed Kubernetes (EKS, GKE, AKS), \
                     observability (Prometheus, Grafana, Datadog) and GitOps with ArgoCD or \
                     Flux. Cloud-native companies pay ₹10-20L, growing to ₹16-30L.",
                ),
                rec(
                    "Platform Engineer / SRE",
                    82,
                    "Build internal developer platforms: Kubernetes operators, a service mesh \
                     such as Istio, and solid incident management. ₹14-28L at mature startups.",
                ),
                rec(
                    "Cloud Architect",
                    70,
                    "Growth path: multi-cloud design, cost optimisation and security (IAM, VPC \
                     design). Certifications help. ₹20-40L after 3-5 years.",
                ),
            ],
            salary: SalaryPrediction::inr(800_000, 1_500_000),
            gaps: [
                "Terraform (IaC)",
                "Kubernetes deep dive",
                "Monitoring (Datadog/Prometheus)",
                "Cost optimization",
                "Security best practices",
            ],
        },
        Niche::Devops | Niche::Mobile | Niche::Fullstack => return None,
    };
    Some(track)
}

fn generic_roles(skill_count: usize) -> [CareerRecommendation; 3] {
    [
        rec(
            "Full-Stack Developer",
            85,
            format!(
                "You have {skill_count} relevant skills. Master TypeScript, add tests and learn \
                 Docker, then ship 2-3 production-grade projects. ₹7-14L at product startups."
            ),
        ),
        rec(
            "Backend Engineer",
            80,
            "Focus on APIs, databases and caching (Redis), and learn system design. ₹8-16L.",
        ),
        rec(
            "Frontend Developer",
            75,
            "Go deep on React or Vue: state management, performance and animation. ₹7-14L.",
        ),
    ]
}

const GENERIC_GAPS: [&str; 5] = ["TypeScript", "Docker", "Testing", "CI/CD", "System Design"];

/// Builds the full analysis for a dominant niche.
///
/// `score` is the niche's own score and decides the track; `skill_count` is
/// the number of matched skills and drives the ATS score and summary.
pub fn recommend(niche: Niche, score: u32, skill_count: usize) -> AnalysisResult {
    let track = if goes_deep(niche, score) {
        deep_track(niche)
    } else {
        None
    };
    let (roles, salary, gaps) = match track {
        Some(track) => (track.roles, track.salary, track.gaps),
        None => (generic_roles(skill_count), SalaryPrediction::default(), GENERIC_GAPS),
    };

    let label = niche.label();
    let focused = skill_count >= 2;

    let ats_feedback = format!(
        "{} Add metrics to bullets. Include GitHub links. Use specific tool names.",
        if score >= 2 {
            format!("Strong {label} focus visible.")
        } else {
            "Broad skills - need focus.".to_string()
        }
    );

    let quick_wins = vec![
        "Add numbers to 3 bullets (1 hour)".to_string(),
        format!("Build one {niche} project with a live demo (1-2 weekends)"),
        "Document your tech stack and architecture (2 hours)".to_string(),
    ];

    let summary = format!(
        "You show {label} interest with {skill_count} relevant skills. {} Add production \
         signals (Docker, tests, CI/CD). Target ₹{}-{}L. {}",
        if focused {
            "Go deep in this niche - high demand, premium salaries."
        } else {
            "Pick one specialization and go deep."
        },
        salary.min_lakhs(),
        salary.max_lakhs(),
        if focused {
            format!("Explore {} deeply.", roles[0].role)
        } else {
            "Build 2-3 focused projects.".to_string()
        },
    );

    AnalysisResult {
        career_recommendations: roles.into(),
        ats_score: ats_score(skill_count),
        ats_feedback,
        missing_skills: strings(&gaps),
        quick_wins,
        salary_prediction: salary,
        summary,
    }
}
