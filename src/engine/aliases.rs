use crate::normalizer::condition;
use crate::utils::longest_first;
use std::collections::BTreeMap;

/// Known alternate manufacturer spellings, conditioned, mapped to the
/// canonical conditioned manufacturer.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("HEWLETTPACKARD", "HP"),
    ("KONICA", "KONICAMINOLTA"),
    ("MINOLTA", "KONICAMINOLTA"),
    ("FUJI", "FUJIFILM"),
];

#[derive(Debug, Clone)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
    scan_order: Vec<String>,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::with_extra(std::iter::empty::<(&str, &str)>())
    }
}

impl AliasTable {
    /// Built-in aliases plus `extra`; extra entries are conditioned and win
    /// over a built-in with the same key.
    pub fn with_extra<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut aliases: BTreeMap<String, String> = BUILTIN_ALIASES
            .iter()
            .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
            .collect();
        for (alias, canonical) in extra {
            let alias = condition(alias.as_ref());
            let canonical = condition(canonical.as_ref());
            if alias.is_empty() || canonical.is_empty() {
                continue;
            }
            aliases.insert(alias, canonical);
        }
        let scan_order = longest_first(aliases.keys());
        Self { aliases, scan_order }
    }

    /// First alias (longest first) found in either conditioned haystack,
    /// resolved to its canonical manufacturer.
    pub fn resolve(&self, manufacturer_c: &str, title_c: &str) -> Option<&str> {
        self.scan_order
            .iter()
            .find(|alias| manufacturer_c.contains(alias.as_str()) || title_c.contains(alias.as_str()))
            .and_then(|alias| self.aliases.get(alias))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_aliases_resolve_to_canonical() {
        let table = AliasTable::default();
        assert_eq!(table.resolve("HEWLETTPACKARD", ""), Some("HP"));
        assert_eq!(table.resolve("", "MINOLTADIMAGEZ3"), Some("KONICAMINOLTA"));
        assert_eq!(table.resolve("FUJIPHOTO", ""), Some("FUJIFILM"));
        assert_eq!(table.resolve("ACME", "ACMECAM"), None);
    }

    #[test]
    fn extra_aliases_are_conditioned() {
        let table = AliasTable::with_extra([("Kodak Eastman", "Kodak")]);
        assert_eq!(table.len(), 5);
        assert_eq!(table.resolve("KODAKEASTMAN", ""), Some("KODAK"));
    }

    #[test]
    fn longer_alias_wins() {
        let table = AliasTable::with_extra([("Konica Minolta Photo", "Sony")]);
        assert_eq!(table.resolve("KONICAMINOLTAPHOTO", ""), Some("SONY"));
    }
}
