//! Fixed ICD-10 diagnostic code lookup.
//!
//! Pure reference data: no external calls, no mutation after startup.

mod table;

use serde::{Deserialize, Serialize};

/// One row of the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEntry {
    pub code: String,
    pub description: String,
}

impl CodeEntry {
    fn from_pair((code, description): (&str, &str)) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
        }
    }
}

/// Exact code lookup, case-insensitive on the code.
pub fn describe(code: &str) -> Option<&'static str> {
    table::ICD_CODES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, d)| *d)
}

/// Entries whose description contains `query` case-insensitively,
/// ordered by code ascending.
pub fn search(query: &str) -> Vec<CodeEntry> {
    let needle = query.to_lowercase();
    let mut hits: Vec<CodeEntry> = table::ICD_CODES
        .iter()
        .filter(|(_, desc)| desc.to_lowercase().contains(&needle))
        .map(|&pair| CodeEntry::from_pair(pair))
        .collect();
    hits.sort_by(|a, b| a.code.cmp(&b.code));
    hits
}

/// Scan clinical text against the fixed keyword map and return the mapped
/// codes: de-duplicated by code, first-seen order preserved.
pub fn suggest(text: &str) -> Vec<CodeEntry> {
    let haystack = text.to_lowercase();
    let mut seen = std::collections::HashSet::new();
    let mut suggestions = Vec::new();

    for (keyword, codes) in table::KEYWORD_CODES {
        if !haystack.contains(keyword) {
            continue;
        }
        for code in *codes {
            if let Some(description) = describe(code) {
                if seen.insert(*code) {
                    suggestions.push(CodeEntry {
                        code: code.to_string(),
                        description: description.to_string(),
                    });
                }
            }
        }
    }

    suggestions
}

/// The full table, sorted by code. Feeds UI pickers.
pub fn all() -> Vec<CodeEntry> {
    let mut entries: Vec<CodeEntry> = table::ICD_CODES
        .iter()
        .map(|&pair| CodeEntry::from_pair(pair))
        .collect();
    entries.sort_by(|a, b| a.code.cmp(&b.code));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_is_case_insensitive() {
        assert_eq!(describe("i10"), Some("Essential (primary) hypertension"));
        assert_eq!(describe("I10"), Some("Essential (primary) hypertension"));
        assert_eq!(describe("X99"), None);
    }

    #[test]
    fn search_matches_descriptions_case_insensitively() {
        let hits = search("DIABETES");
        assert!(hits.iter().any(|e| e.code == "E11.9"));
        assert!(hits.iter().any(|e| e.code == "E11.65"));
        // No description-level match should sneak in from code text.
        assert!(hits.iter().all(|e| e.description.to_lowercase().contains("diabetes")));
    }

    #[test]
    fn search_orders_by_code_ascending() {
        let hits = search("pain");
        let codes: Vec<&str> = hits.iter().map(|e| e.code.as_str()).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
        assert!(hits.len() >= 4);
    }

    #[test]
    fn search_no_match_is_empty() {
        assert!(search("zzzz-not-a-condition").is_empty());
    }

    #[test]
    fn suggest_finds_keywords_in_first_seen_order() {
        let hits = suggest("Patient has type 2 diabetes and hypertension.");
        let codes: Vec<&str> = hits.iter().map(|e| e.code.as_str()).collect();
        let diabetes = codes.iter().position(|c| *c == "E11.9").unwrap();
        let hypertension = codes.iter().position(|c| *c == "I10").unwrap();
        assert!(diabetes < hypertension);
    }

    #[test]
    fn suggest_deduplicates_by_code() {
        // "chest pain" also contains "pain"; overlapping keywords must not
        // duplicate any code.
        let hits = suggest("chest pain and more chest pain with pain everywhere");
        let mut codes: Vec<&str> = hits.iter().map(|e| e.code.as_str()).collect();
        let before = codes.len();
        codes.dedup();
        codes.sort();
        codes.dedup();
        assert_eq!(before, codes.len());
        assert!(hits.iter().any(|e| e.code == "R07.9"));
        assert!(hits.iter().any(|e| e.code == "M79.1"));
    }

    #[test]
    fn suggest_is_case_insensitive_and_pure() {
        let a = suggest("FEVER and Cough");
        let b = suggest("fever and cough");
        assert_eq!(a, b);
        assert!(a.iter().any(|e| e.code == "R50.9"));
        assert!(a.iter().any(|e| e.code == "R05"));
    }

    #[test]
    fn suggest_on_unrelated_text_is_empty() {
        assert!(suggest("Administrative paperwork only.").is_empty());
    }

    #[test]
    fn all_is_sorted_and_complete() {
        let entries = all();
        assert!(entries.len() >= 60);
        assert!(entries.windows(2).all(|w| w[0].code <= w[1].code));
    }

    #[test]
    fn every_keyword_code_exists_in_table() {
        for (_, codes) in super::table::KEYWORD_CODES {
            for code in *codes {
                assert!(describe(code).is_some(), "unmapped code {code}");
            }
        }
    }
}
