// Prompt for the generative career analysis. Placeholders are filled by
// `build_analysis_prompt`.

use crate::models::entities::ExtractedEntities;
use crate::models::skills::SkillMatch;

pub const MAX_PROMPT_SKILLS: usize = 25;
pub const MAX_PROMPT_RESUME_CHARS: usize = 2500;

/// Career analysis prompt template. Replace `{skills}`, `{candidate}` and
/// `{resume_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You're a senior tech career advisor with deep knowledge of emerging tech ecosystems.

SKILLS: {skills}

CANDIDATE: {candidate}

RESUME:
{resume_text}

YOUR MISSION:
1. Detect any niche interests or specializations in the resume.
2. If you find a niche (blockchain, ML, cloud, DevOps, mobile), GO DEEP:
   - Suggest specific ecosystems, frameworks and languages
   - Mention trending opportunities in that space
   - Name specific companies, platforms or programs
3. Be direct: speak to "you", not about the candidate.

SALARY (India, yearly, INR):
Entry ₹4-8L, Junior ₹7-14L, Mid ₹12-22L, Senior ₹18-35L+
Niche premiums: Web3 +40%, ML +30%, Cloud +20%

Return ONLY a JSON object with this shape:
{
  "career_recommendations": [
    {"role": "Specific Role", "match_score": 85, "reasoning": "Deep advice with ecosystem names, tools, timelines"},
    {"role": "Alternative Niche Role", "match_score": 78, "reasoning": "Different specialization"},
    {"role": "Growth Path", "match_score": 70, "reasoning": "Future opportunity"}
  ],
  "ats_score": 75,
  "ats_feedback": "What works. What to fix. Specific changes.",
  "missing_skills": ["Skill - why it matters", "Skill 2", "Skill 3", "Skill 4", "Skill 5"],
  "quick_wins": ["Specific action with tool names", "Action 2", "Action 3"],
  "salary_prediction": {"min": 800000, "max": 1400000, "currency": "INR"},
  "summary": "Diagnosis, niche opportunities, action plan and targets."
}

match_score and ats_score are integers from 0 to 100. Salary values are whole rupees."#;

/// Fills the template with at most 25 skills and the first 2500 characters of
/// the resume.
pub fn build_analysis_prompt(
    resume_text: &str,
    skills: &[SkillMatch],
    entities: &ExtractedEntities,
) -> String {
    let skills_list = skills
        .iter()
        .take(MAX_PROMPT_SKILLS)
        .map(|s| s.skill.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let resume_excerpt: String = resume_text.chars().take(MAX_PROMPT_RESUME_CHARS).collect();

    ANALYSIS_PROMPT_TEMPLATE
        .replace("{skills}", &skills_list)
        .replace("{candidate}", &describe_candidate(entities))
        .replace("{resume_text}", &resume_excerpt)
}

fn describe_candidate(entities: &ExtractedEntities) -> String {
    let mut parts = Vec::new();
    if let Some(name) = &entities.name {
        parts.push(name.clone());
    }
    if !entities.organizations.is_empty() {
        parts.push(format!("organizations: {}", entities.organizations.join(", ")));
    }
    if !entities.locations.is_empty() {
        parts.push(format!("based in {}", entities.locations.join(", ")));
    }
    if parts.is_empty() {
        "unknown".to_string()
    } else {
        parts.join("; ")
    }
}
