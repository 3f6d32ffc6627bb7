use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use studio_logging::studio_debug;
use thiserror::Error;

/// Maximum number of suggestions returned for one field.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 4;

const EXPERIENCE_KEYWORDS: &[&str] = &[
    "Led",
    "Managed",
    "Developed",
    "Implemented",
    "Optimized",
    "Collaborated",
    "Delivered",
];

const TECHNICAL_KEYWORDS: &[&str] = &[
    "React",
    "Node.js",
    "JavaScript",
    "Python",
    "MongoDB",
    "AWS",
    "Docker",
];

const SUMMARY_KEYWORDS: &[&str] = &[
    "results-driven",
    "cross-functional",
    "scalable",
    "leadership",
    "innovative",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GapError {
    #[error("unknown keyword category `{0}`")]
    UnknownCategory(String),
}

/// Built-in keyword categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordCategory {
    Experience,
    Technical,
    Summary,
}

impl KeywordCategory {
    pub const ALL: [KeywordCategory; 3] = [
        KeywordCategory::Experience,
        KeywordCategory::Technical,
        KeywordCategory::Summary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            KeywordCategory::Experience => "experience",
            KeywordCategory::Technical => "technical",
            KeywordCategory::Summary => "summary",
        }
    }

    fn reference_keywords(self) -> &'static [&'static str] {
        match self {
            KeywordCategory::Experience => EXPERIENCE_KEYWORDS,
            KeywordCategory::Technical => TECHNICAL_KEYWORDS,
            KeywordCategory::Summary => SUMMARY_KEYWORDS,
        }
    }
}

impl fmt::Display for KeywordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for KeywordCategory {
    type Err = GapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeywordCategory::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GapError::UnknownCategory(s.to_string()))
    }
}

/// Category label -> ordered reference keywords, plus the suggestion cap.
///
/// The table is configuration: it is built once and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTable {
    lists: BTreeMap<String, Vec<String>>,
    max_suggestions: usize,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::reference()
    }
}

impl KeywordTable {
    /// Table holding the built-in categories.
    pub fn reference() -> Self {
        let lists = KeywordCategory::ALL
            .into_iter()
            .map(|category| {
                let keywords = category
                    .reference_keywords()
                    .iter()
                    .map(|k| (*k).to_string())
                    .collect();
                (category.label().to_string(), keywords)
            })
            .collect();
        Self {
            lists,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }

    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    /// Registers (or replaces) a category. Labels are matched case-insensitively.
    pub fn insert<I, S>(&mut self, category: &str, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lists.insert(
            category.trim().to_ascii_lowercase(),
            keywords.into_iter().map(Into::into).collect(),
        );
    }

    pub fn max_suggestions(&self) -> usize {
        self.max_suggestions
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    pub fn keywords(&self, category: &str) -> Result<&[String], GapError> {
        self.lists
            .get(&category.trim().to_ascii_lowercase())
            .map(Vec::as_slice)
            .ok_or_else(|| GapError::UnknownCategory(category.to_string()))
    }

    /// Keywords of `category` whose lowercase form does not occur in the
    /// lowercased `text`, in table order, capped at `max_suggestions`.
    ///
    /// Matching is plain substring containment: "Java" is considered present
    /// in "JavaScript". An unknown category yields no suggestions.
    pub fn find_gaps(&self, text: &str, category: &str) -> Vec<String> {
        let keywords = match self.keywords(category) {
            Ok(keywords) => keywords,
            Err(err) => {
                studio_debug!("No recommendations: {}", err);
                return Vec::new();
            }
        };

        let haystack = text.to_lowercase();
        keywords
            .iter()
            .filter(|keyword| !haystack.contains(&keyword.to_lowercase()))
            .take(self.max_suggestions)
            .cloned()
            .collect()
    }
}

/// Gap analysis against the built-in reference table.
pub fn find_gaps(text: &str, category: KeywordCategory) -> Vec<String> {
    KeywordTable::reference().find_gaps(text, category.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!(
            "Technical".parse::<KeywordCategory>(),
            Ok(KeywordCategory::Technical)
        );
        assert_eq!(
            " summary ".parse::<KeywordCategory>(),
            Ok(KeywordCategory::Summary)
        );
        assert_eq!(
            "skills".parse::<KeywordCategory>(),
            Err(GapError::UnknownCategory("skills".to_string()))
        );
    }

    #[test]
    fn reference_table_lists_builtin_categories_in_order() {
        let table = KeywordTable::reference();
        let labels: Vec<_> = table.categories().collect();
        assert_eq!(labels, vec!["experience", "summary", "technical"]);
        assert_eq!(table.keywords("technical").unwrap()[0], "React");
    }

    #[test]
    fn inserted_category_is_available() {
        let mut table = KeywordTable::reference();
        table.insert("Leadership", ["mentored", "hired"]);
        assert_eq!(
            table.find_gaps("Mentored two juniors", "leadership"),
            vec!["hired".to_string()]
        );
    }

    #[test]
    fn zero_cap_returns_nothing() {
        let table = KeywordTable::reference().with_max_suggestions(0);
        assert!(table.find_gaps("", "technical").is_empty());
    }
}
