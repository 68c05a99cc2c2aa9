//! Keyword-driven title and description optimization.
//!
//! Per product: [`RelevanceMatcher`] filters the [`KeywordCatalog`],
//! [`PerformanceClassifier`] buckets the relevant keywords, [`Rewriter`]
//! applies the highest-priority bucket's rule (or attribute extraction when
//! no bucket applies), the optional [`HealthAssessor`] adds crawl signals and
//! [`ScoreAggregator`] turns the ledger into a priority score and impact tier.
//! [`OptimizationEngine`] drives the loop over a batch.

pub mod catalog;
pub mod classifier;
pub mod engine;
pub mod health;
pub mod matcher;
pub mod rewriter;
pub mod scoring;
pub mod text;
pub mod vocabulary;

pub use catalog::KeywordCatalog;
pub use classifier::{ClassifiedKeywords, PerformanceClassifier};
pub use engine::{CancellationToken, OptimizationEngine, OptimizationRun, RunInputs, RunSummary};
pub use health::{normalize_url, CrawlIndex, CrawlRecord, HealthAssessor};
pub use matcher::{RelevanceMatcher, RelevanceReason, RelevantKeyword};
pub use rewriter::{Rewrite, Rewriter};
pub use scoring::{ScoreAggregator, ScoreLedger, DISPLAY_SCORE_CAP};
pub use vocabulary::{DetectedAttributes, Vocabulary};
