//! Place-name cleanup: bilingual administrative prefixes, English suffixes,
//! and capitalization.
//!
//! Patterns are compiled from the profile's per-locale tables:
//!
//! - prefix: `(?i)^(?:(?:P1)\s+|(?:P2)\s+|...)+`, where an alternative ending in
//!   an apostrophe (`intara y'`) takes `\s*` instead of `\s+`
//! - suffix: `(?i)(?:\s+(?:S1|S2|...))+$`
//!
//! Prefixes are stripped before suffixes. Stacked occurrences go in one pass,
//! so `clean` is idempotent.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Prefix and suffix words for one locale
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamingRules {
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub suffixes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NameNormalizer {
    prefix: Option<Regex>,
    suffix: Option<Regex>,
}

impl NameNormalizer {
    /// Compile the combined rules of every locale
    pub fn new(rules: &BTreeMap<String, NamingRules>) -> Result<Self, regex::Error> {
        let mut prefixes: Vec<&str> = rules
            .values()
            .flat_map(|r| r.prefixes.iter().map(String::as_str))
            .filter(|p| !p.trim().is_empty())
            .collect();
        let mut suffixes: Vec<&str> = rules
            .values()
            .flat_map(|r| r.suffixes.iter().map(String::as_str))
            .filter(|s| !s.trim().is_empty())
            .collect();

        // Longest first so "province de" is tried before "province"
        prefixes.sort_by_key(|p| std::cmp::Reverse(p.len()));
        suffixes.sort_by_key(|s| std::cmp::Reverse(s.len()));

        let prefix = if prefixes.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = prefixes
                .iter()
                .map(|p| {
                    let p = p.trim();
                    let gap = if p.ends_with('\'') || p.ends_with('\u{2019}') {
                        r"\s*"
                    } else {
                        r"\s+"
                    };
                    format!("(?:{}){}", literal_words(p), gap)
                })
                .collect();
            Some(Regex::new(&format!(
                r"(?i)^(?:{})+",
                alternatives.join("|")
            ))?)
        };

        let suffix = if suffixes.is_empty() {
            None
        } else {
            let alternatives: Vec<String> =
                suffixes.iter().map(|s| literal_words(s.trim())).collect();
            Some(Regex::new(&format!(
                r"(?i)(?:\s+(?:{}))+$",
                alternatives.join("|")
            ))?)
        };

        Ok(Self { prefix, suffix })
    }

    /// Trim and strip administrative prefixes/suffixes. `None` for empty input
    /// or when nothing is left.
    pub fn clean(&self, raw: Option<&str>) -> Option<String> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            return None;
        }

        let without_prefix = match &self.prefix {
            Some(re) => re.replace(trimmed, ""),
            None => trimmed.into(),
        };
        let without_prefix = without_prefix.trim();

        let cleaned = match &self.suffix {
            Some(re) => re.replace(without_prefix, ""),
            None => without_prefix.into(),
        };
        let cleaned = cleaned.trim();

        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned.to_string())
        }
    }

    /// Clean, then capitalize the whole name as one unit ("NYARUGENGE" -> "Nyarugenge").
    /// Returns the input unchanged if cleaning leaves nothing.
    pub fn normalize_district(&self, raw: &str) -> String {
        match self.clean(Some(raw)) {
            Some(cleaned) => capitalize(&cleaned),
            None => raw.to_string(),
        }
    }

    /// Clean, then capitalize every word ("lower kigali" -> "Lower Kigali").
    /// Returns the input unchanged if cleaning leaves nothing.
    pub fn normalize_sector(&self, raw: &str) -> String {
        match self.clean(Some(raw)) {
            Some(cleaned) => cleaned
                .split_whitespace()
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
            None => raw.to_string(),
        }
    }
}

/// Escape a phrase, letting any run of whitespace separate its words
fn literal_words(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

/// First character upper-case, the rest lower-case
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> NameNormalizer {
        let mut rules = BTreeMap::new();
        rules.insert(
            "rw".to_string(),
            NamingRules {
                prefixes: vec![
                    "akarere ka".to_string(),
                    "umurenge wa".to_string(),
                    "intara y'".to_string(),
                ],
                suffixes: vec![],
            },
        );
        rules.insert(
            "fr".to_string(),
            NamingRules {
                prefixes: vec!["district de".to_string(), "secteur de".to_string()],
                suffixes: vec![],
            },
        );
        rules.insert(
            "en".to_string(),
            NamingRules {
                prefixes: vec![],
                suffixes: vec![
                    "district".to_string(),
                    "sector".to_string(),
                    "province".to_string(),
                    "city".to_string(),
                ],
            },
        );
        NameNormalizer::new(&rules).unwrap()
    }

    #[test]
    fn test_clean_empty() {
        let n = normalizer();
        assert_eq!(n.clean(None), None);
        assert_eq!(n.clean(Some("")), None);
        assert_eq!(n.clean(Some("   ")), None);
    }

    #[test]
    fn test_clean_prefixes_case_insensitive() {
        let n = normalizer();
        assert_eq!(n.clean(Some("Akarere ka Gasabo")).as_deref(), Some("Gasabo"));
        assert_eq!(n.clean(Some("UMURENGE WA Kimihurura")).as_deref(), Some("Kimihurura"));
        assert_eq!(n.clean(Some("District de Huye")).as_deref(), Some("Huye"));
        assert_eq!(n.clean(Some("secteur de  Remera")).as_deref(), Some("Remera"));
    }

    #[test]
    fn test_clean_apostrophe_prefix() {
        let n = normalizer();
        assert_eq!(
            n.clean(Some("Intara y'Iburasirazuba")).as_deref(),
            Some("Iburasirazuba")
        );
    }

    #[test]
    fn test_clean_suffixes() {
        let n = normalizer();
        assert_eq!(n.clean(Some("Gasabo District")).as_deref(), Some("Gasabo"));
        assert_eq!(n.clean(Some("Remera sector")).as_deref(), Some("Remera"));
        assert_eq!(n.clean(Some("Kigali City")).as_deref(), Some("Kigali"));
        assert_eq!(n.clean(Some("Eastern Province")).as_deref(), Some("Eastern"));
    }

    #[test]
    fn test_clean_removes_only_the_pattern() {
        let n = normalizer();
        // Suffix words inside the name are left alone
        assert_eq!(
            n.clean(Some("District Court Road")).as_deref(),
            Some("District Court Road")
        );
        assert_eq!(n.clean(Some("Cityview Heights")).as_deref(), Some("Cityview Heights"));
        // A bare suffix word has nothing to strip from
        assert_eq!(n.clean(Some("District")).as_deref(), Some("District"));
        assert_eq!(
            n.clean(Some("  Akarere ka Gasabo District ")).as_deref(),
            Some("Gasabo")
        );
    }

    #[test]
    fn test_clean_idempotent() {
        let n = normalizer();
        for raw in [
            "Akarere ka Gasabo District",
            "Akarere ka District de Gasabo City District",
            "Intara y'Amajyepfo Province",
            "District",
            "Akarere ka",
            "Lower Kigali",
            "  Remera  Sector  ",
        ] {
            let once = n.clean(Some(raw));
            let twice = n.clean(once.as_deref());
            assert_eq!(once, twice, "clean not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_normalize_district_single_unit() {
        let n = normalizer();
        assert_eq!(n.normalize_district("NYARUGENGE"), "Nyarugenge");
        assert_eq!(n.normalize_district("akarere ka gasabo"), "Gasabo");
        assert_eq!(n.normalize_district("lower kigali"), "Lower kigali");
    }

    #[test]
    fn test_normalize_sector_every_word() {
        let n = normalizer();
        assert_eq!(n.normalize_sector("lower kigali"), "Lower Kigali");
        assert_eq!(n.normalize_sector("KIMIHURURA sector"), "Kimihurura");
        assert_eq!(n.normalize_sector("umurenge wa  GIKONDO  mburabuturo"), "Gikondo Mburabuturo");
    }

    #[test]
    fn test_district_and_sector_forms_differ_for_multi_word_names() {
        let n = normalizer();
        assert_ne!(
            n.normalize_district("lower kigali"),
            n.normalize_sector("lower kigali")
        );
    }

    #[test]
    fn test_normalize_keeps_input_when_clean_fails() {
        let n = normalizer();
        assert_eq!(n.normalize_district("   "), "   ");
        assert_eq!(n.normalize_sector(""), "");
    }

    #[test]
    fn test_no_rules_only_trims() {
        let n = NameNormalizer::new(&BTreeMap::new()).unwrap();
        assert_eq!(n.clean(Some(" Gasabo District ")).as_deref(), Some("Gasabo District"));
    }
}
