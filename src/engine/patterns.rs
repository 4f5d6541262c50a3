// Whole-word recognition patterns for catalog models
use crate::model::{ConditionedKey, MatchError};
use regex::{RegexSet, escape};
use std::collections::{BTreeSet, HashMap};

/// Source patterns recognizing one catalog model inside an uppercased title.
/// Only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: BTreeSet<String>,
}

impl PatternSet {
    /// The model written exactly as given, as a whole word.
    pub fn add_word(&mut self, model: &str) {
        self.patterns.insert(whole_word(model));
    }

    /// `head` and `tail` joined by a dash, and by a run of whitespace.
    pub fn add_split(&mut self, head: &str, tail: &str) {
        self.patterns.insert(format!(r"\b{}-{}\b", escape(head), escape(tail)));
        self.patterns.insert(format!(r"\b{}\s+{}\b", escape(head), escape(tail)));
    }

    pub fn extend(&mut self, other: &PatternSet) {
        self.patterns.extend(other.patterns.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }
}

/// Matches `text` as a whole word anywhere in the haystack.
pub fn whole_word(text: &str) -> String {
    format!(r"\b{}\b", escape(text))
}

/// Compiled, read-only form of every pattern set, built once before matching.
#[derive(Debug)]
pub struct PatternTable {
    compiled: HashMap<ConditionedKey, RegexSet>,
}

impl PatternTable {
    pub fn compile<'a, I>(sets: I) -> Result<Self, MatchError>
    where
        I: IntoIterator<Item = (&'a ConditionedKey, &'a PatternSet)>,
    {
        let mut compiled = HashMap::new();
        for (key, set) in sets {
            let regexes = RegexSet::new(set.iter()).map_err(|source| MatchError::Pattern {
                key: key.to_string(),
                source,
            })?;
            compiled.insert(key.clone(), regexes);
        }
        Ok(Self { compiled })
    }

    /// `None` when no pattern set exists for `key`.
    pub fn matches(&self, key: &ConditionedKey, title_upper: &str) -> Option<bool> {
        self.compiled.get(key).map(|set| set.is_match(title_upper))
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}
