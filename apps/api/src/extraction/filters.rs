//! Noise filters for recognizer output. Generic NER models routinely tag
//! section headers, tech acronyms, hackathons and social platforms as
//! organisations or places; these lists strip the usual offenders.

/// A person span containing any of these words is an institution, not a name.
pub const INSTITUTION_MARKERS: &[&str] = &["university", "college", "school", "institute"];

/// Programs and competitions that show up as organisations.
pub const PROGRAM_KEYWORDS: &[&str] = &[
    "fellowship",
    "hackathon",
    "summer of code",
    "bootcamp",
    "olympiad",
    "scholarship",
    "challenge",
];

/// Resume section headers, compared case-insensitively against the whole span.
pub const SECTION_HEADERS: &[&str] = &[
    "education",
    "skills",
    "technical skills",
    "experience",
    "work experience",
    "professional experience",
    "projects",
    "certifications",
    "achievements",
    "awards",
    "summary",
    "objective",
    "profile",
    "internships",
    "publications",
    "interests",
    "languages",
    "contact",
    "references",
    "personal details",
    "curriculum vitae",
    "resume",
];

/// Tech tokens that are not organisations.
pub const TECH_NOISE: &[&str] = &[
    "html", "css", "api", "apis", "aws", "gcp", "sql", "nosql", "git", "jwt", "rest", "json",
    "ui", "ux", "ml", "ai", "nlp", "dsa", "oop", "npm", "cli", "sdk", "ide", "mern", "http",
    "python", "java", "docker", "react", "node", "linux", "rust", "go", "swift", "django",
    "flask", "redis", "kafka", "mysql", "php", "ruby", "scala", "bash", "azure", "helm",
    "nginx", "jira", "figma", "vue", "ios", "c++", "c#", "dbms", "os", "gpu", "iot",
];

const DOMAIN_MARKERS: &[&str] = &[".com", ".in"];

/// Platforms and packages that recognizers mistake for places.
pub const LOCATION_NOISE: &[&str] = &["linkedin", "github", "tailwindcss", "nodejs", "reactjs"];

pub const RELATIVE_DATE_MARKERS: &[&str] = &["present", "current", "ongoing", "now"];

fn equals_any(value: &str, list: &[&str]) -> bool {
    let lower = value.to_lowercase();
    list.iter().any(|item| *item == lower)
}

/// True for a known header, or a line built from header words such as
/// "Technical Skills" or "Work Experience".
pub fn is_section_header(line: &str) -> bool {
    if equals_any(line.trim(), SECTION_HEADERS) {
        return true;
    }
    line.split_whitespace().any(|word| {
        let word = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        SECTION_HEADERS
            .iter()
            .any(|header| header.split_whitespace().any(|w| w == word))
    })
}

/// A usable name has at least two tokens and none of them marks an institution.
pub fn is_person_name(span: &str) -> bool {
    let tokens: Vec<&str> = span.split_whitespace().collect();
    tokens.len() >= 2 && !tokens.iter().any(|t| equals_any(t, INSTITUTION_MARKERS))
}

/// Applies every organisation filter; `email` is the already-extracted address.
pub fn keep_organization(org: &str, email: Option<&str>) -> bool {
    let lower = org.to_lowercase();

    if lower.contains('@') || DOMAIN_MARKERS.iter().any(|m| lower.contains(m)) {
        return false;
    }
    if let Some(email) = email {
        let email = email.to_lowercase();
        if email.contains(&lower) || lower.contains(&email) {
            return false;
        }
    }
    if PROGRAM_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return false;
    }
    if equals_any(org, SECTION_HEADERS) {
        return false;
    }
    if org.chars().count() < 3 {
        return false;
    }
    !equals_any(org, TECH_NOISE)
}

pub fn keep_location(location: &str) -> bool {
    !equals_any(location, LOCATION_NOISE)
}

/// Drops very short fragments ("Q1", "FY") and open-ended markers.
pub fn keep_date(date: &str) -> bool {
    date.chars().count() > 3 && !equals_any(date, RELATIVE_DATE_MARKERS)
}
