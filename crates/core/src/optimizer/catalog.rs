use std::collections::{BTreeSet, HashMap, HashSet};

use super::text::words;
use crate::domain::keyword::{KeywordRecord, RawKeywordRow};

/// The normalised keyword set of one run, with an inverted word index.
///
/// Only keywords with non-zero volume are indexed. Keywords whose substring
/// match could occur without sharing a whole word with the product text
/// (one or two words, or no interior word) are returned by every lookup.
#[derive(Clone, Debug, Default)]
pub struct KeywordCatalog {
    records: Vec<KeywordRecord>,
    index: HashMap<String, Vec<usize>>,
    scan_always: Vec<usize>,
}

impl KeywordCatalog {
    pub fn load(rows: impl IntoIterator<Item = RawKeywordRow>) -> Self {
        Self::from_records(rows.into_iter().filter_map(|row| row.normalize()).collect())
    }

    pub fn from_records(records: Vec<KeywordRecord>) -> Self {
        let records = records
            .into_iter()
            .filter_map(|mut record| {
                let trimmed = record.keyword.trim();
                if trimmed.is_empty() {
                    return None;
                }
                if trimmed.len() != record.keyword.len() {
                    record.keyword = trimmed.to_owned();
                }
                Some(record)
            })
            .collect::<Vec<_>>();

        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        let mut scan_always = Vec::new();
        for (id, record) in records.iter().enumerate() {
            if record.search_volume == 0 {
                continue;
            }
            let lowered = record.keyword.to_lowercase();
            let unique = words(&lowered).into_iter().collect::<HashSet<_>>();
            for word in unique {
                index.entry(word).or_default().push(id);
            }
            if !has_interior_word(&lowered) {
                scan_always.push(id);
            }
        }

        Self { records, index, scan_always }
    }

    pub fn all(&self) -> &[KeywordRecord] {
        &self.records
    }

    pub fn get(&self, id: usize) -> Option<&KeywordRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ids of keywords that could be relevant to a text with these
    /// (lowercased) words, ascending.
    pub fn candidates(&self, text_words: &HashSet<String>) -> Vec<usize> {
        let mut ids = self.scan_always.iter().copied().collect::<BTreeSet<_>>();
        for word in text_words {
            if let Some(hits) = self.index.get(word) {
                ids.extend(hits.iter().copied());
            }
        }
        ids.into_iter().collect()
    }
}

/// A keyword of three or more words whose inner words still tokenise to
/// something shares those words with any text it is a substring of.
fn has_interior_word(keyword: &str) -> bool {
    let parts = keyword.split_whitespace().collect::<Vec<_>>();
    parts.len() >= 3 && parts[1..parts.len() - 1].iter().any(|part| !words(part).is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::KeywordCatalog;
    use crate::domain::keyword::{KeywordRecord, RawKeywordRow};

    fn text_words(text: &str) -> HashSet<String> {
        crate::optimizer::text::word_set(text)
    }

    #[test]
    fn load_drops_blank_keywords_and_keeps_order() {
        let catalog = KeywordCatalog::load(vec![
            RawKeywordRow::new("oak bed").with_search_volume(100.0),
            RawKeywordRow::new("  "),
            RawKeywordRow::new(" pine desk ").with_search_volume(50.0),
        ]);

        let keywords = catalog.all().iter().map(|r| r.keyword.as_str()).collect::<Vec<_>>();
        assert_eq!(keywords, vec!["oak bed", "pine desk"]);
    }

    #[test]
    fn empty_input_is_a_valid_catalog() {
        let catalog = KeywordCatalog::load(Vec::new());
        assert!(catalog.is_empty());
        assert!(catalog.candidates(&text_words("oak table")).is_empty());
    }

    #[test]
    fn zero_volume_keywords_are_never_candidates() {
        let catalog = KeywordCatalog::from_records(vec![
            KeywordRecord::new("oak", 5, 0, 0),
            KeywordRecord::new("large oak dining table", 5, 0, 0),
        ]);
        assert!(catalog.candidates(&text_words("large oak dining table")).is_empty());
    }

    #[test]
    fn long_keywords_are_found_through_their_words() {
        let catalog = KeywordCatalog::from_records(vec![
            KeywordRecord::new("large oak dining table", 5, 100, 0),
            KeywordRecord::new("grey sofa", 5, 100, 0),
            KeywordRecord::new("velvet accent chair set", 5, 100, 0),
        ]);

        let hits = catalog.candidates(&text_words("Oak dining table"));
        assert_eq!(hits, vec![0, 1]);
    }
}
