//! Input readiness report: what the feed and ranking data can support.

use serde::{Deserialize, Serialize};

use crate::config::FeedConfig;
use crate::domain::{cell, header_matches};
use crate::domain::product::ProductBatch;
use crate::optimizer::{CrawlIndex, KeywordCatalog};

/// Merchant-feed attributes worth checking before a run. `title` and
/// `description` resolve through the configured feed field names.
pub const FEED_FIELDS: [&str; 6] =
    ["title", "description", "price", "category", "image_link", "availability"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    /// Products and keywords: keyword-driven rewrites are possible.
    Ready,
    /// Products only: every product takes the attribute-extraction path.
    Partial,
    NotReady,
}

impl Readiness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Readiness::Ready => "ready",
            Readiness::Partial => "partial",
            Readiness::NotReady => "not_ready",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCoverage {
    pub field: String,
    pub column: String,
    pub present: bool,
    /// Products with no value for the column. Zero when the column is absent.
    pub blank: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedAudit {
    pub products: usize,
    pub keywords: usize,
    pub ranking_keywords: usize,
    pub zero_volume_keywords: usize,
    pub crawl_pages: usize,
    pub crawl_matched_products: usize,
    pub fields: Vec<FieldCoverage>,
    pub readiness: Readiness,
}

impl FeedAudit {
    pub fn inspect(
        products: &ProductBatch,
        keywords: &KeywordCatalog,
        crawl: Option<&CrawlIndex>,
        feed: &FeedConfig,
    ) -> Self {
        let fields = FEED_FIELDS
            .iter()
            .map(|field| {
                let column = match *field {
                    "title" => feed.title_field.clone(),
                    "description" => feed.description_field.clone(),
                    other => other.to_owned(),
                };
                coverage(products, field, column)
            })
            .collect();

        let crawl_matched_products = crawl.map_or(0, |crawl| {
            products
                .products()
                .iter()
                .filter_map(|product| product.url.as_deref())
                .filter(|url| crawl.lookup(url).is_some())
                .count()
        });

        let readiness = if products.is_empty() {
            Readiness::NotReady
        } else if keywords.all().iter().any(|keyword| keyword.search_volume > 0) {
            Readiness::Ready
        } else {
            Readiness::Partial
        };

        Self {
            products: products.len(),
            keywords: keywords.len(),
            ranking_keywords: keywords.all().iter().filter(|keyword| keyword.is_ranking()).count(),
            zero_volume_keywords: keywords
                .all()
                .iter()
                .filter(|keyword| keyword.search_volume == 0)
                .count(),
            crawl_pages: crawl.map_or(0, CrawlIndex::len),
            crawl_matched_products,
            fields,
            readiness,
        }
    }

    pub fn missing_fields(&self) -> Vec<&str> {
        self.fields.iter().filter(|field| !field.present).map(|field| field.field.as_str()).collect()
    }
}

fn coverage(products: &ProductBatch, field: &str, column: String) -> FieldCoverage {
    let columns_seen = products.products().iter().any(|product| {
        product.attributes.iter().any(|(name, _)| header_matches(name, &column))
    });
    let blank = if columns_seen {
        products
            .products()
            .iter()
            .filter(|product| cell(&product.attributes, &[column.as_str()]).is_none())
            .count()
    } else {
        0
    };

    FieldCoverage { field: field.to_owned(), column, present: columns_seen, blank }
}
