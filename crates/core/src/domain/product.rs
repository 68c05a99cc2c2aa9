use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{cell, header_matches, RawRow};
use crate::config::FeedConfig;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn synthesized(index: usize) -> Self {
        Self(format!("product_{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog product as read from the merchant feed. `attributes` holds every
/// original column in input order so the export can reproduce the row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub attributes: RawRow,
}

impl ProductRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: ProductId(id.into()),
            title: title.into(),
            description: description.into(),
            url: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_attribute(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((column.into(), value.into()));
        self
    }

    pub fn attribute(&self, column: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| header_matches(name, column))
            .map(|(_, value)| value.as_str())
    }

    /// Title and description joined, the text keyword relevance is judged on.
    pub fn text(&self) -> String {
        match (self.title.is_empty(), self.description.is_empty()) {
            (false, false) => format!("{} {}", self.title, self.description),
            (false, true) => self.title.clone(),
            (true, false) => self.description.clone(),
            (true, true) => String::new(),
        }
    }

    fn from_row(index: usize, row: RawRow, feed: &FeedConfig) -> Self {
        let id = cell(&row, &[feed.id_field.as_str()])
            .map(|value| ProductId(value.to_owned()))
            .unwrap_or_else(|| ProductId::synthesized(index));
        let title = cell(&row, &[feed.title_field.as_str()]).unwrap_or_default().to_owned();
        let description =
            cell(&row, &[feed.description_field.as_str()]).unwrap_or_default().to_owned();
        let url_fields = feed.url_fields.iter().map(String::as_str).collect::<Vec<_>>();
        let url = cell(&row, &url_fields).map(str::to_owned);

        Self { id, title, description, url, attributes: row }
    }
}

/// The ordered product input of one run, with ids guaranteed unique.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductBatch {
    products: Vec<ProductRecord>,
}

impl ProductBatch {
    pub fn new(products: Vec<ProductRecord>) -> Self {
        let mut seen = HashSet::with_capacity(products.len());
        let products = products
            .into_iter()
            .enumerate()
            .map(|(index, mut product)| {
                if product.id.as_str().trim().is_empty() {
                    product.id = ProductId::synthesized(index);
                }
                if seen.contains(&product.id) {
                    let replacement = unique_id(index, &seen);
                    warn!(
                        event_name = "catalog.products.duplicate_id",
                        product_id = %product.id,
                        replacement = %replacement,
                        row = index,
                        "duplicate product id replaced"
                    );
                    product.id = replacement;
                }
                seen.insert(product.id.clone());
                product
            })
            .collect();

        Self { products }
    }

    /// Builds products from feed rows. Missing title/description cells become
    /// empty strings; a missing id becomes `product_<index>`.
    pub fn from_rows(rows: Vec<RawRow>, feed: &FeedConfig) -> Self {
        Self::new(
            rows.into_iter()
                .enumerate()
                .map(|(index, row)| ProductRecord::from_row(index, row, feed))
                .collect(),
        )
    }

    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, id: &ProductId) -> Option<&ProductRecord> {
        self.products.iter().find(|product| &product.id == id)
    }
}

fn unique_id(index: usize, seen: &HashSet<ProductId>) -> ProductId {
    let mut candidate = ProductId::synthesized(index);
    let mut attempt = 1;
    while seen.contains(&candidate) {
        candidate = ProductId(format!("product_{index}_{attempt}"));
        attempt += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::{ProductBatch, ProductId, ProductRecord};
    use crate::config::FeedConfig;

    fn row(cells: &[(&str, &str)]) -> Vec<(String, String)> {
        cells.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn from_rows_synthesizes_missing_ids_and_defaults_text() {
        let batch = ProductBatch::from_rows(
            vec![
                row(&[("title", "Oak Dining Table"), ("price", "499.00")]),
                row(&[("id", "SKU-2"), ("description", "Pine bed frame")]),
            ],
            &FeedConfig::default(),
        );

        let products = batch.products();
        assert_eq!(products[0].id, ProductId("product_0".to_owned()));
        assert_eq!(products[0].description, "");
        assert_eq!(products[0].attribute("price"), Some("499.00"));
        assert_eq!(products[1].id, ProductId("SKU-2".to_owned()));
        assert_eq!(products[1].title, "");
    }

    #[test]
    fn duplicate_ids_are_replaced_to_keep_ids_unique() {
        let batch = ProductBatch::new(vec![
            ProductRecord::new("SKU-1", "Oak Bed", ""),
            ProductRecord::new("SKU-1", "Pine Bed", ""),
            ProductRecord::new("product_1", "Walnut Desk", ""),
        ]);

        let ids = batch.products().iter().map(|p| p.id.as_str().to_owned()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["SKU-1", "product_1", "product_2"]);
    }

    #[test]
    fn url_is_taken_from_first_configured_url_field() {
        let batch = ProductBatch::from_rows(
            vec![row(&[("id", "A"), ("url", ""), ("link", "https://shop.example/oak-bed")])],
            &FeedConfig::default(),
        );

        assert_eq!(batch.products()[0].url.as_deref(), Some("https://shop.example/oak-bed"));
    }

    #[test]
    fn text_joins_title_and_description() {
        assert_eq!(ProductRecord::new("a", "Oak Bed", "Solid frame").text(), "Oak Bed Solid frame");
        assert_eq!(ProductRecord::new("a", "", "Solid frame").text(), "Solid frame");
        assert_eq!(ProductRecord::new("a", "", "").text(), "");
    }

    #[test]
    fn find_returns_product_by_id() {
        let batch = ProductBatch::new(vec![ProductRecord::new("SKU-9", "Oak Bed", "")]);
        assert!(batch.find(&ProductId("SKU-9".to_owned())).is_some());
        assert!(batch.find(&ProductId("SKU-0".to_owned())).is_none());
    }
}
