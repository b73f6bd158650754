//! Named-entity recognition primitive.
//!
//! `EntityRecognizer` is the seam: the extractor only sees labelled spans in
//! document order. `HeuristicRecognizer` is the built-in, model-free tagger.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extraction::filters::is_section_header;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Person,
    Organization,
    Location,
    Date,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    /// Byte offset into the source text.
    pub start: usize,
}

impl EntitySpan {
    fn new(text: &str, label: EntityLabel, start: usize) -> Self {
        Self {
            text: text.to_string(),
            label,
            start,
        }
    }

    fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Tags person, organisation, location and date spans.
/// Implementations must return spans sorted by `start`.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Vec<EntitySpan>;

    fn name(&self) -> &'static str;
}

const FIELD_SEPARATORS: [char; 3] = ['|', '•', '·'];

const ORG_SUFFIXES: &[&str] = &[
    "inc", "ltd", "llc", "llp", "corp", "corporation", "pvt", "limited", "labs", "technologies",
    "technology", "solutions", "systems", "software", "consulting", "services", "group",
    "foundation", "bank", "university", "college", "institute", "school", "academy",
];

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+(?:19|20)\d{2}|\d{1,2}/(?:19|20)\d{2}|(?:19|20)\d{2}|present|current|ongoing|now)\b",
    )
    .unwrap()
});

static CAPITALIZED_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][\w&.'-]*(?:[ \t]+(?:(?:of|and|for|the|&)[ \t]+)?[A-Z][\w&.'-]*)*").unwrap()
});

static EMPLOYER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\bat|@)[ \t]+([A-Z][\w&.'-]*(?:[ \t]+[A-Z][\w&.'-]*)*)").unwrap()
});

static ACRONYM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{2,6}\b").unwrap());

/// Cities, states and countries, plus platform names that taggers commonly
/// place on a map.
static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:new delhi|delhi|mumbai|bangalore|bengaluru|hyderabad|chennai|pune|kolkata|noida|gurgaon|gurugram|ahmedabad|jaipur|indore|kochi|chandigarh|lucknow|bhopal|karnataka|maharashtra|telangana|tamil nadu|kerala|india|usa|united states|united kingdom|london|singapore|dubai|berlin|san francisco|new york|seattle|toronto|remote|linkedin|github|tailwindcss|nodejs|reactjs)\b",
    )
    .unwrap()
});

/// Rule-based tagger tuned for resume layout: names sit alone on a line,
/// employers follow "at", and places come from a gazetteer.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicRecognizer;

impl EntityRecognizer for HeuristicRecognizer {
    fn recognize(&self, text: &str) -> Vec<EntitySpan> {
        let mut spans = Vec::new();
        let mut person_lines: Vec<(usize, usize)> = Vec::new();

        let mut offset = 0;
        for line in text.split('\n') {
            // Header lines often carry "Name | Title | email"; only the first field can be a name.
            let field = line.split(FIELD_SEPARATORS).next().unwrap_or_default();
            let candidate = field.trim();
            if is_name_line(candidate) {
                let start = offset + (field.len() - field.trim_start().len());
                spans.push(EntitySpan::new(candidate, EntityLabel::Person, start));
                person_lines.push((start, start + candidate.len()));
            }
            offset += line.len() + 1;
        }
        let in_person_line =
            |pos: usize| person_lines.iter().any(|(s, e)| pos >= *s && pos < *e);

        for m in CAPITALIZED_RUN_RE.find_iter(text) {
            if in_person_line(m.start()) {
                continue;
            }
            // Runs may swallow the capitalised word that opens the next sentence.
            let run = m.as_str().split(". ").next().unwrap_or_default();
            let run = run.trim_end_matches('.');
            if run.split_whitespace().any(is_org_suffix) {
                spans.push(EntitySpan::new(run, EntityLabel::Organization, m.start()));
            }
        }

        for caps in EMPLOYER_RE.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                let employer = m.as_str().trim_end_matches('.');
                spans.push(EntitySpan::new(employer, EntityLabel::Organization, m.start()));
            }
        }

        for m in ACRONYM_RE.find_iter(text) {
            if !in_person_line(m.start()) {
                spans.push(EntitySpan::new(m.as_str(), EntityLabel::Organization, m.start()));
            }
        }

        for m in LOCATION_RE.find_iter(text) {
            if starts_uppercase(m.as_str()) {
                spans.push(EntitySpan::new(m.as_str(), EntityLabel::Location, m.start()));
            }
        }

        for m in DATE_RE.find_iter(text) {
            spans.push(EntitySpan::new(m.as_str(), EntityLabel::Date, m.start()));
        }

        remove_overlaps(spans)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_uppercase())
}

fn is_org_suffix(word: &str) -> bool {
    let word = word.trim_end_matches(['.', ',']).to_lowercase();
    ORG_SUFFIXES.contains(&word.as_str())
}

/// A line made only of 2–4 capitalised alphabetic words that is not an
/// organisation, a place or a section header.
fn is_name_line(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) {
        return false;
    }
    let well_formed = words.iter().all(|w| {
        starts_uppercase(w) && w.chars().all(|c| c.is_alphabetic() || c == '.')
    });
    well_formed
        && !words.iter().any(|w| is_org_suffix(w))
        && !LOCATION_RE.is_match(line)
        && !is_section_header(line)
}

/// Keeps the earliest span at each position, preferring the longest on a shared
/// start, and drops anything overlapping a span already kept.
fn remove_overlaps(mut spans: Vec<EntitySpan>) -> Vec<EntitySpan> {
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.text.len().cmp(&a.text.len())));
    let mut kept: Vec<EntitySpan> = Vec::with_capacity(spans.len());
    for span in spans {
        if kept.last().map_or(true, |last| span.start >= last.end()) {
            kept.push(span);
        }
    }
    kept
}
