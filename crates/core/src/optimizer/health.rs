use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::scoring::ScoreLedger;
use crate::config::{RewriteConfig, ScoringConfig};
use crate::domain::product::ProductRecord;
use crate::domain::recommendation::{RewriteTarget, RuleKind};
use crate::domain::{cell, parse_metric};

/// One crawled page. Lengths are character counts as reported by the crawler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRecord {
    pub url: String,
    pub status_code: Option<u16>,
    pub title_length: Option<usize>,
    pub description_length: Option<usize>,
}

impl CrawlRecord {
    pub fn new(url: impl Into<String>, status_code: Option<u16>) -> Self {
        Self { url: url.into(), status_code, title_length: None, description_length: None }
    }

    pub fn with_lengths(mut self, title_length: usize, description_length: usize) -> Self {
        self.title_length = Some(title_length);
        self.description_length = Some(description_length);
        self
    }

    /// Reads a crawler export row; `None` when the row has no URL.
    pub fn from_cells(row: &[(String, String)]) -> Option<Self> {
        let url = cell(row, &["url", "address", "page_url"])?.to_owned();
        let number = |names: &[&str]| cell(row, names).and_then(parse_metric);

        Some(Self {
            url,
            status_code: number(&["status_code", "status"])
                .filter(|code| *code <= f64::from(u16::MAX))
                .map(|code| code.round() as u16),
            title_length: number(&["title_length", "title_1_length"]).map(|n| n.round() as usize),
            description_length: number(&["description_length", "meta_description_1_length"])
                .map(|n| n.round() as usize),
        })
    }
}

/// Crawl records keyed by normalised URL. Later rows for the same URL win.
#[derive(Clone, Debug, Default)]
pub struct CrawlIndex {
    pages: HashMap<String, CrawlRecord>,
}

impl CrawlIndex {
    pub fn from_records(records: impl IntoIterator<Item = CrawlRecord>) -> Self {
        let pages = records
            .into_iter()
            .filter_map(|record| {
                let key = normalize_url(&record.url);
                (!key.is_empty()).then_some((key, record))
            })
            .collect();
        Self { pages }
    }

    pub fn from_rows(rows: &[Vec<(String, String)>]) -> Self {
        Self::from_records(rows.iter().filter_map(|row| CrawlRecord::from_cells(row)))
    }

    pub fn lookup(&self, url: &str) -> Option<&CrawlRecord> {
        self.pages.get(&normalize_url(url))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Trims, lowercases scheme and host, drops the fragment and any trailing
/// slash. Path and query keep their case.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    let url = url.split_once('#').map_or(url, |(before, _)| before);

    let (scheme, rest) = match url.split_once("://") {
        Some((scheme, rest)) => (Some(scheme.to_ascii_lowercase()), rest),
        None => (None, url),
    };
    let (host, path) = match rest.find(['/', '?']) {
        Some(split) => rest.split_at(split),
        None => (rest, ""),
    };

    let mut normalized = match scheme {
        Some(scheme) => format!("{scheme}://{}{path}", host.to_ascii_lowercase()),
        None => format!("{}{path}", host.to_ascii_lowercase()),
    };
    while normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Adds technical-health increments for products whose page was crawled.
#[derive(Clone, Debug)]
pub struct HealthAssessor {
    crawl_status_points: u32,
    overlength_points: u32,
    max_title_length: usize,
    max_description_length: usize,
}

impl HealthAssessor {
    pub fn new(rewrite: &RewriteConfig, scoring: &ScoringConfig) -> Self {
        Self {
            crawl_status_points: scoring.crawl_status,
            overlength_points: scoring.overlength,
            max_title_length: rewrite.max_title_length,
            max_description_length: rewrite.max_description_length,
        }
    }

    pub fn assess(&self, product: &ProductRecord, crawl: &CrawlIndex, ledger: &mut ScoreLedger) {
        let Some(page) = product.url.as_deref().and_then(|url| crawl.lookup(url)) else {
            return;
        };

        if let Some(status) = page.status_code.filter(|status| *status != 200) {
            ledger.award(
                RewriteTarget::Title,
                RuleKind::CrawlStatus,
                self.crawl_status_points,
                format!("Page returned HTTP {status} when crawled; fix before other changes count"),
            );
        }

        let title_length = page.title_length.unwrap_or_else(|| product.title.chars().count());
        if title_length > self.max_title_length {
            ledger.award(
                RewriteTarget::Title,
                RuleKind::OverlengthTitle,
                self.overlength_points,
                format!(
                    "Title is {title_length} characters, over the {} character limit",
                    self.max_title_length
                ),
            );
        }

        let description_length =
            page.description_length.unwrap_or_else(|| product.description.chars().count());
        if description_length > self.max_description_length {
            ledger.award(
                RewriteTarget::Description,
                RuleKind::OverlengthDescription,
                self.overlength_points,
                format!(
                    "Description is {description_length} characters, over the {} character limit",
                    self.max_description_length
                ),
            );
        }
    }
}
