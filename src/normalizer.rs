// String conditioning for catalog fields and listing titles

/// Uppercases `s` and drops every character outside `[A-Za-z0-9.]`.
pub fn condition(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// `condition` lifted over optional fields: absent stays absent.
pub fn condition_opt(s: Option<&str>) -> Option<String> {
    s.map(condition)
}

/// Uppercases a listing title without stripping separators, so whole-word
/// recognition patterns still see word boundaries.
pub fn condition_title(title: &str) -> String {
    title.to_uppercase()
}

/// Both forms of a listing title the matcher needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionedTitle {
    /// Fully conditioned; used for manufacturer and family substring scans.
    pub compact: String,
    /// Uppercased only; used for model pattern evaluation.
    pub upper: String,
}

impl ConditionedTitle {
    pub fn new(title: &str) -> Self {
        Self {
            compact: condition(title),
            upper: condition_title(title),
        }
    }
}
