use serde::{Deserialize, Serialize};

/// Candidate facts pulled out of a resume. Built once per request by the
/// entity extractor and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// At most 5, first-seen order.
    pub organizations: Vec<String>,
    /// At most 3, first-seen order.
    pub locations: Vec<String>,
    /// At most 10, first-seen order.
    pub dates: Vec<String>,
}

impl ExtractedEntities {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.organizations.is_empty()
            && self.locations.is_empty()
            && self.dates.is_empty()
    }
}
