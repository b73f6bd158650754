// Entity extraction: regex contact facts plus recognizer spans run through
// resume-specific noise filters.

pub mod extractor;
pub mod filters;
pub mod ner;
pub mod patterns;
