use std::collections::HashSet;

use super::text::words;
use crate::config::VocabularyConfig;

/// Product-category lookup tables, pre-tokenised. Phrase tables are ordered
/// longest first so `"coffee table"` wins over `"table"`.
#[derive(Clone, Debug)]
pub struct Vocabulary {
    domain_terms: HashSet<String>,
    furniture_types: Vec<Vec<String>>,
    materials: Vec<Vec<String>>,
}

impl Vocabulary {
    pub fn from_config(config: &VocabularyConfig) -> Self {
        Self {
            domain_terms: config
                .domain_terms
                .iter()
                .map(|term| term.trim().to_lowercase())
                .filter(|term| !term.is_empty())
                .collect(),
            furniture_types: phrase_table(&config.furniture_types),
            materials: phrase_table(&config.materials),
        }
    }

    pub fn is_domain_term(&self, word: &str) -> bool {
        self.domain_terms.contains(word)
    }

    pub fn detect_type(&self, text: &str) -> Option<String> {
        longest_phrase(&self.furniture_types, &words(text))
    }

    pub fn detect_material(&self, text: &str) -> Option<String> {
        longest_phrase(&self.materials, &words(text))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::from_config(&VocabularyConfig::default())
    }
}

fn phrase_table(phrases: &[String]) -> Vec<Vec<String>> {
    let mut table = phrases
        .iter()
        .map(|phrase| words(phrase))
        .filter(|tokens| !tokens.is_empty())
        .collect::<Vec<_>>();
    table.sort_by(|left, right| right.len().cmp(&left.len()));
    table.dedup();
    table
}

fn longest_phrase(table: &[Vec<String>], tokens: &[String]) -> Option<String> {
    table
        .iter()
        .find(|phrase| tokens.windows(phrase.len()).any(|window| window == phrase.as_slice()))
        .map(|phrase| phrase.join(" "))
}

/// Type and material found on a product, title first, then description.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetectedAttributes {
    pub furniture_type: Option<String>,
    pub material: Option<String>,
}

impl DetectedAttributes {
    pub fn detect(vocabulary: &Vocabulary, title: &str, description: &str) -> Self {
        Self {
            furniture_type: vocabulary
                .detect_type(title)
                .or_else(|| vocabulary.detect_type(description)),
            material: vocabulary
                .detect_material(title)
                .or_else(|| vocabulary.detect_material(description)),
        }
    }

    /// `"oak coffee table"`, `"coffee table"` or `"oak"`.
    pub fn phrase(&self) -> Option<String> {
        match (&self.material, &self.furniture_type) {
            (Some(material), Some(kind)) => Some(format!("{material} {kind}")),
            (None, Some(kind)) => Some(kind.clone()),
            (Some(material), None) => Some(material.clone()),
            (None, None) => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.material.is_some() && self.furniture_type.is_some()
    }
}
