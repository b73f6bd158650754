use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::extraction::filters::{is_person_name, keep_date, keep_location, keep_organization};
use crate::extraction::ner::{EntityLabel, EntityRecognizer};
use crate::extraction::patterns::{extract_email, extract_phone};
use crate::models::entities::ExtractedEntities;

const MAX_ORGANIZATIONS: usize = 5;
const MAX_LOCATIONS: usize = 3;
const MAX_DATES: usize = 10;

/// Combines regex contact extraction with recognizer spans, filtering out the
/// usual resume noise. Stateless apart from the shared recognizer.
#[derive(Clone)]
pub struct EntityExtractor {
    recognizer: Arc<dyn EntityRecognizer>,
    /// Lower-cased skill names; an organisation span equal to one is a skill.
    skill_terms: HashSet<String>,
}

impl EntityExtractor {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self {
            recognizer,
            skill_terms: HashSet::new(),
        }
    }

    /// Rejects organisation spans that name a known skill ("PYTHON", "Docker").
    pub fn with_skill_vocabulary<S: AsRef<str>>(mut self, vocabulary: &[S]) -> Self {
        self.skill_terms = vocabulary
            .iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .collect();
        self
    }

    fn is_skill(&self, value: &str) -> bool {
        self.skill_terms.contains(&value.to_lowercase())
    }

    pub fn recognizer_name(&self) -> &'static str {
        self.recognizer.name()
    }

    pub fn extract(&self, text: &str) -> ExtractedEntities {
        let mut entities = ExtractedEntities {
            email: extract_email(text),
            phone: extract_phone(text),
            ..Default::default()
        };

        for span in self.recognizer.recognize(text) {
            let value = span.text.trim();
            if value.is_empty() {
                continue;
            }
            match span.label {
                EntityLabel::Person => {
                    if entities.name.is_none() && is_person_name(value) {
                        entities.name = Some(value.to_string());
                    }
                }
                EntityLabel::Organization => {
                    if keep_organization(value, entities.email.as_deref()) && !self.is_skill(value)
                    {
                        push_unique(&mut entities.organizations, value, MAX_ORGANIZATIONS);
                    }
                }
                EntityLabel::Location => {
                    if keep_location(value) {
                        push_unique(&mut entities.locations, value, MAX_LOCATIONS);
                    }
                }
                EntityLabel::Date => {
                    if keep_date(value) {
                        push_unique(&mut entities.dates, value, MAX_DATES);
                    }
                }
            }
        }

        debug!(
            name = entities.name.is_some(),
            organizations = entities.organizations.len(),
            locations = entities.locations.len(),
            dates = entities.dates.len(),
            "Entities extracted"
        );
        entities
    }
}

/// Appends `value` unless already present or the list is full.
fn push_unique(list: &mut Vec<String>, value: &str, cap: usize) {
    if list.len() < cap && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ner::{EntitySpan, HeuristicRecognizer};

    /// Returns a canned span list regardless of input.
    struct FixedRecognizer(Vec<(EntityLabel, &'static str)>);

    impl EntityRecognizer for FixedRecognizer {
        fn recognize(&self, _text: &str) -> Vec<EntitySpan> {
            self.0
                .iter()
                .enumerate()
                .map(|(i, (label, text))| EntitySpan {
                    text: text.to_string(),
                    label: *label,
                    start: i,
                })
                .collect()
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn extractor(spans: Vec<(EntityLabel, &'static str)>) -> EntityExtractor {
        EntityExtractor::new(Arc::new(FixedRecognizer(spans)))
    }

    #[test]
    fn test_name_skips_single_tokens_and_institutions() {
        let e = extractor(vec![
            (EntityLabel::Person, "Priya"),
            (EntityLabel::Person, "Anna University"),
            (EntityLabel::Person, "Priya Sharma"),
            (EntityLabel::Person, "Rahul Verma"),
        ]);
        assert_eq!(e.extract("").name.as_deref(), Some("Priya Sharma"));
    }

    #[test]
    fn test_organizations_filtered_deduped_and_capped() {
        let e = extractor(vec![
            (EntityLabel::Organization, "Flipkart"),
            (EntityLabel::Organization, "EDUCATION"),
            (EntityLabel::Organization, "AWS"),
            (EntityLabel::Organization, "Flipkart"),
            (EntityLabel::Organization, "Google Summer of Code"),
            (EntityLabel::Organization, "priya"),
            (EntityLabel::Organization, "Razorpay"),
            (EntityLabel::Organization, "Zoho"),
            (EntityLabel::Organization, "Freshworks"),
            (EntityLabel::Organization, "Meesho"),
            (EntityLabel::Organization, "Swiggy"),
        ]);
        let entities = e.extract("reach me at priya@example.com");
        assert_eq!(
            entities.organizations,
            vec!["Flipkart", "Razorpay", "Zoho", "Freshworks", "Meesho"]
        );
    }

    #[test]
    fn test_organizations_drop_skill_names() {
        let e = extractor(vec![
            (EntityLabel::Organization, "PYTHON"),
            (EntityLabel::Organization, "KAFKA"),
            (EntityLabel::Organization, "TCS"),
            (EntityLabel::Organization, "Spring Boot"),
        ])
        .with_skill_vocabulary(&["Python", "Kafka", "Spring Boot"]);
        assert_eq!(e.extract("").organizations, vec!["TCS"]);
    }

    #[test]
    fn test_all_caps_tech_words_are_not_organizations() {
        let text = "Worked with PYTHON, DOCKER and REACT at INFOSYS";
        let e = EntityExtractor::new(Arc::new(HeuristicRecognizer)).extract(text);
        assert_eq!(e.organizations, vec!["INFOSYS"]);
    }

    #[test]
    fn test_locations_drop_platforms_and_cap_at_three() {
        let e = extractor(vec![
            (EntityLabel::Location, "LinkedIn"),
            (EntityLabel::Location, "Pune"),
            (EntityLabel::Location, "Pune"),
            (EntityLabel::Location, "nodejs"),
            (EntityLabel::Location, "Mumbai"),
            (EntityLabel::Location, "India"),
            (EntityLabel::Location, "Chennai"),
        ]);
        assert_eq!(e.extract("").locations, vec!["Pune", "Mumbai", "India"]);
    }

    #[test]
    fn test_dates_drop_short_and_relative_markers() {
        let mut spans = vec![
            (EntityLabel::Date, "Q1"),
            (EntityLabel::Date, "Present"),
            (EntityLabel::Date, "June 2021"),
            (EntityLabel::Date, "June 2021"),
        ];
        let years = [
            "2010", "2011", "2012", "2013", "2014", "2015", "2016", "2017", "2018", "2019", "2020",
        ];
        spans.extend(years.iter().map(|y| (EntityLabel::Date, *y)));
        let dates = extractor(spans).extract("").dates;
        assert_eq!(dates.len(), 10);
        assert_eq!(dates[0], "June 2021");
        assert_eq!(dates[9], "2018");
    }

    #[test]
    fn test_empty_text_yields_empty_entities() {
        let e = EntityExtractor::new(Arc::new(HeuristicRecognizer));
        assert!(e.extract("").is_empty());
    }

    #[test]
    fn test_heuristic_resume_end_to_end() {
        let text = "Priya Sharma\n\
                    priya.sharma@gmail.com | +91-9876543210 | LinkedIn | Bengaluru, India\n\
                    EXPERIENCE\n\
                    Backend Engineer at Razorpay, Jan 2022 - Present\n\
                    Built REST APIs on AWS with Go.\n\
                    EDUCATION\n\
                    National Institute of Technology, Trichy 2017 - 2021\n\
                    Winner, Smart India Hackathon 2019";
        let e = EntityExtractor::new(Arc::new(HeuristicRecognizer)).extract(text);

        assert_eq!(e.name.as_deref(), Some("Priya Sharma"));
        assert_eq!(e.email.as_deref(), Some("priya.sharma@gmail.com"));
        assert_eq!(e.phone.as_deref(), Some("+91-9876543210"));
        assert!(e.organizations.contains(&"Razorpay".to_string()));
        assert!(e
            .organizations
            .contains(&"National Institute of Technology".to_string()));
        assert!(!e.organizations.iter().any(|o| o == "AWS" || o == "REST"));
        assert!(!e.organizations.iter().any(|o| o.contains("Hackathon")));
        assert_eq!(e.locations, vec!["Bengaluru", "India"]);
        assert!(e.dates.contains(&"Jan 2022".to_string()));
        assert!(!e.dates.iter().any(|d| d == "Present"));
    }
}
