use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalog::KeywordCatalog;
use super::text::{word_set, words};
use super::vocabulary::Vocabulary;
use crate::config::MatchingConfig;
use crate::domain::keyword::KeywordRecord;

/// Why a keyword was judged relevant. Rules are tried in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RelevanceReason {
    DomainTerm { term: String },
    ExactSubstring,
    MultiWordOverlap { shared: Vec<String> },
}

impl fmt::Display for RelevanceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelevanceReason::DomainTerm { term } => write!(f, "domain-term match on '{term}'"),
            RelevanceReason::ExactSubstring => f.write_str("exact substring match"),
            RelevanceReason::MultiWordOverlap { shared } => {
                write!(f, "multi-word overlap ({})", shared.join(", "))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelevantKeyword<'c> {
    pub record: &'c KeywordRecord,
    pub reason: RelevanceReason,
    pub catalog_index: usize,
}

#[derive(Clone, Debug)]
pub struct RelevanceMatcher {
    config: MatchingConfig,
    vocabulary: Vocabulary,
}

impl RelevanceMatcher {
    pub fn new(config: MatchingConfig, vocabulary: Vocabulary) -> Self {
        Self { config, vocabulary }
    }

    /// Relevant keywords for `product_text`, by descending search volume,
    /// ties in catalog order.
    pub fn relevant<'c>(
        &self,
        product_text: &str,
        catalog: &'c KeywordCatalog,
    ) -> Vec<RelevantKeyword<'c>> {
        let text = product_text.to_lowercase();
        let text_words = word_set(&text);

        let ids = if self.config.use_index && self.config.anchor_domain_terms {
            catalog.candidates(&text_words)
        } else {
            (0..catalog.len()).collect()
        };

        self.collect(&text, &text_words, catalog, ids)
    }

    /// Same result as [`relevant`](Self::relevant), always checking every keyword.
    pub fn relevant_full_scan<'c>(
        &self,
        product_text: &str,
        catalog: &'c KeywordCatalog,
    ) -> Vec<RelevantKeyword<'c>> {
        let text = product_text.to_lowercase();
        let text_words = word_set(&text);
        self.collect(&text, &text_words, catalog, (0..catalog.len()).collect())
    }

    fn collect<'c>(
        &self,
        text: &str,
        text_words: &HashSet<String>,
        catalog: &'c KeywordCatalog,
        ids: Vec<usize>,
    ) -> Vec<RelevantKeyword<'c>> {
        let mut relevant = ids
            .into_iter()
            .filter_map(|id| {
                let record = catalog.get(id)?;
                if record.search_volume == 0
                    || record.search_volume < self.config.min_search_volume
                {
                    return None;
                }
                let reason = self.reason(record, text, text_words)?;
                Some(RelevantKeyword { record, reason, catalog_index: id })
            })
            .collect::<Vec<_>>();

        relevant.sort_by(|left, right| right.record.search_volume.cmp(&left.record.search_volume));
        relevant
    }

    fn reason(
        &self,
        record: &KeywordRecord,
        text: &str,
        text_words: &HashSet<String>,
    ) -> Option<RelevanceReason> {
        let keyword = record.keyword.to_lowercase();
        let keyword_words = words(&keyword);

        let domain_term = keyword_words.iter().find(|word| {
            self.vocabulary.is_domain_term(word)
                && (!self.config.anchor_domain_terms || text_words.contains(*word))
        });
        if let Some(term) = domain_term {
            return Some(RelevanceReason::DomainTerm { term: term.clone() });
        }

        if text.contains(&keyword) {
            return Some(RelevanceReason::ExactSubstring);
        }

        let mut shared = keyword_words
            .into_iter()
            .filter(|word| text_words.contains(word))
            .collect::<Vec<_>>();
        shared.sort();
        shared.dedup();
        if shared.len() >= self.config.min_shared_words {
            return Some(RelevanceReason::MultiWordOverlap { shared });
        }

        None
    }
}
