//! Joins recommendations back onto the source rows for the export sink.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::config::FeedConfig;
use crate::domain::header_matches;
use crate::domain::product::{ProductBatch, ProductId, ProductRecord};
use crate::domain::recommendation::OptimizedProduct;

/// Columns appended after the original columns, in order.
pub const EXPORT_FIELDS: [&str; 9] = [
    "product_id",
    "current_title",
    "optimized_title",
    "current_description",
    "optimized_description",
    "title_reasoning",
    "description_reasoning",
    "priority_score",
    "expected_impact",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub product_id: ProductId,
    pub cells: Vec<(String, String)>,
}

impl ExportRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.iter().find(|(name, _)| name == column).map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportBatch {
    pub rows: Vec<ExportRow>,
    /// Results whose product id was not in the batch.
    pub skipped: Vec<ProductId>,
}

impl ExportBatch {
    /// Union of all row columns in first-seen order.
    pub fn headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = Vec::new();
        for row in &self.rows {
            for (column, _) in &row.cells {
                if !headers.iter().any(|known| known == column) {
                    headers.push(column.clone());
                }
            }
        }
        headers
    }
}

/// One row per result, in result order. Title and description columns carry
/// the optimized text; an original column named like an appended field is
/// superseded by it.
pub fn join(
    products: &ProductBatch,
    results: &[OptimizedProduct],
    feed: &FeedConfig,
) -> ExportBatch {
    let by_id = products
        .products()
        .iter()
        .map(|product| (&product.id, product))
        .collect::<HashMap<_, _>>();

    let mut batch = ExportBatch::default();
    for result in results {
        match by_id.get(&result.product_id) {
            Some(product) => batch.rows.push(export_row(product, result, feed)),
            None => {
                warn!(
                    event_name = "export.join.skipped",
                    product_id = %result.product_id,
                    "recommendation refers to an unknown product; skipped"
                );
                batch.skipped.push(result.product_id.clone());
            }
        }
    }
    batch
}

fn export_row(
    product: &ProductRecord,
    result: &OptimizedProduct,
    feed: &FeedConfig,
) -> ExportRow {
    let mut cells = product
        .attributes
        .iter()
        .filter(|(column, _)| !EXPORT_FIELDS.contains(&column.as_str()))
        .map(|(column, value)| {
            let value = if header_matches(column, &feed.title_field) {
                result.optimized_title.clone()
            } else if header_matches(column, &feed.description_field) {
                result.optimized_description.clone()
            } else {
                value.clone()
            };
            (column.clone(), value)
        })
        .collect::<Vec<_>>();

    let appended = [
        result.product_id.to_string(),
        result.current_title.clone(),
        result.optimized_title.clone(),
        result.current_description.clone(),
        result.optimized_description.clone(),
        result.title_reasoning.clone(),
        result.description_reasoning.clone(),
        result.priority_score.to_string(),
        result.expected_impact.as_str().to_owned(),
    ];
    cells.extend(EXPORT_FIELDS.iter().map(|field| (*field).to_owned()).zip(appended));

    ExportRow { product_id: result.product_id.clone(), cells }
}
