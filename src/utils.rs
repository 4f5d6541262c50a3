// Utility functions

/// Removes the ASCII digits from `s`, keeping everything else.
pub fn strip_digits(s: &str) -> String {
    s.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// Keeps only the ASCII letters of `s`.
pub fn alpha_residue(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphabetic()).collect()
}

/// True when `s` has at least one character that is not an ASCII digit.
pub fn has_non_digit(s: &str) -> bool {
    s.chars().any(|c| !c.is_ascii_digit())
}

/// Sorts names longest-first, ties broken lexicographically.
pub fn longest_first<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut out: Vec<String> = names.into_iter().cloned().collect();
    out.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    out
}
