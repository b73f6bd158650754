use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

/// Indian mobile numbers, tried in order: `+91` prefixed first, then bare.
static PHONE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\+91[\-\s]?[6-9][0-9]{9}").unwrap(),
        Regex::new(r"\b[6-9][0-9]{9}\b").unwrap(),
    ]
});

/// Returns the first email address in the text.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// Returns the first Indian mobile number. A `+91` match anywhere in the text
/// wins over a bare ten-digit number that appears earlier.
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_RES
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().to_string())
}
