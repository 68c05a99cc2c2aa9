use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::catalog::KeywordCatalog;
use super::classifier::PerformanceClassifier;
use super::health::{CrawlIndex, HealthAssessor};
use super::matcher::RelevanceMatcher;
use super::rewriter::Rewriter;
use super::scoring::ScoreAggregator;
use super::vocabulary::Vocabulary;
use crate::config::OptimizerConfig;
use crate::domain::product::{ProductBatch, ProductRecord};
use crate::domain::recommendation::{ExpectedImpact, OptimizationPath, OptimizedProduct};
use crate::errors::DomainError;

/// Cooperative cancellation flag, checked once per product.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub products: usize,
    pub rewritten: usize,
    pub unchanged: usize,
    pub keyword_driven: usize,
    pub fallback: usize,
    pub high_impact: usize,
    pub medium_impact: usize,
    pub low_impact: usize,
}

impl RunSummary {
    pub fn from_results(results: &[OptimizedProduct]) -> Self {
        let mut summary = Self { products: results.len(), ..Self::default() };
        for result in results {
            if result.is_rewritten() {
                summary.rewritten += 1;
            } else {
                summary.unchanged += 1;
            }
            match result.path {
                OptimizationPath::Keyword(_) => summary.keyword_driven += 1,
                OptimizationPath::Fallback => summary.fallback += 1,
            }
            match result.expected_impact {
                ExpectedImpact::High => summary.high_impact += 1,
                ExpectedImpact::Medium => summary.medium_impact += 1,
                ExpectedImpact::Low => summary.low_impact += 1,
            }
        }
        summary
    }
}

/// One complete batch output. Results are in product input order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRun {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub results: Vec<OptimizedProduct>,
    pub summary: RunSummary,
}

/// Read-only inputs shared by every product of a run.
#[derive(Clone, Copy, Debug)]
pub struct RunInputs<'a> {
    pub products: &'a ProductBatch,
    pub keywords: &'a KeywordCatalog,
    pub crawl: Option<&'a CrawlIndex>,
}

impl<'a> RunInputs<'a> {
    pub fn new(products: &'a ProductBatch, keywords: &'a KeywordCatalog) -> Self {
        Self { products, keywords, crawl: None }
    }

    pub fn with_crawl(mut self, crawl: &'a CrawlIndex) -> Self {
        self.crawl = Some(crawl);
        self
    }
}

/// Match, classify, rewrite and score every product of a batch.
#[derive(Clone, Debug)]
pub struct OptimizationEngine {
    matcher: RelevanceMatcher,
    classifier: PerformanceClassifier,
    rewriter: Rewriter,
    health: HealthAssessor,
    aggregator: ScoreAggregator,
    parallel: bool,
}

impl OptimizationEngine {
    pub fn new(config: OptimizerConfig) -> Self {
        let vocabulary = Vocabulary::from_config(&config.vocabulary);
        Self {
            matcher: RelevanceMatcher::new(config.matching, vocabulary.clone()),
            classifier: PerformanceClassifier::new(config.classifier),
            health: HealthAssessor::new(&config.rewrite, &config.scoring),
            rewriter: Rewriter::new(config.rewrite, config.scoring, vocabulary),
            aggregator: ScoreAggregator::new(),
            parallel: config.parallel,
        }
    }

    pub fn optimize_product(
        &self,
        product: &ProductRecord,
        keywords: &KeywordCatalog,
        crawl: Option<&CrawlIndex>,
    ) -> OptimizedProduct {
        let relevant = self.matcher.relevant(&product.text(), keywords);
        let buckets = self.classifier.classify(&relevant);
        let mut rewrite = self.rewriter.rewrite(product, &buckets);

        if let Some(crawl) = crawl {
            self.health.assess(product, crawl, &mut rewrite.ledger);
        }

        let (priority_score, expected_impact) = self.aggregator.finalize(rewrite.ledger.total());

        OptimizedProduct {
            product_id: product.id.clone(),
            current_title: product.title.clone(),
            optimized_title: rewrite.optimized_title,
            current_description: product.description.clone(),
            optimized_description: rewrite.optimized_description,
            title_reasoning: rewrite.ledger.title_reasoning(),
            description_reasoning: rewrite.ledger.description_reasoning(),
            priority_score,
            expected_impact,
            path: rewrite.path,
            contributions: rewrite.ledger.into_contributions(),
        }
    }

    pub fn run(&self, inputs: RunInputs<'_>) -> Result<OptimizationRun, DomainError> {
        self.run_with_cancellation(inputs, &CancellationToken::new())
    }

    pub fn run_with_cancellation(
        &self,
        inputs: RunInputs<'_>,
        token: &CancellationToken,
    ) -> Result<OptimizationRun, DomainError> {
        let run_id = Uuid::new_v4();
        let total = inputs.products.len();
        info!(
            event_name = "optimizer.run.started",
            correlation_id = %run_id,
            products = total,
            keywords = inputs.keywords.len(),
            crawl_pages = inputs.crawl.map_or(0, CrawlIndex::len),
            parallel = self.parallel,
            "optimization run started"
        );

        let processed = AtomicUsize::new(0);
        let step = |product: &ProductRecord| {
            if token.is_cancelled() {
                return None;
            }
            let result = self.optimize_product(product, inputs.keywords, inputs.crawl);
            debug!(
                event_name = "optimizer.product.optimized",
                correlation_id = %run_id,
                product_id = %result.product_id,
                priority_score = result.priority_score,
                expected_impact = result.expected_impact.as_str(),
                "product optimized"
            );
            processed.fetch_add(1, Ordering::Relaxed);
            Some(result)
        };

        let products = inputs.products.products();
        let outcomes: Vec<Option<OptimizedProduct>> = if self.parallel {
            products.par_iter().map(step).collect()
        } else {
            let mut outcomes = Vec::with_capacity(total);
            for product in products {
                let outcome = step(product);
                let stop = outcome.is_none();
                outcomes.push(outcome);
                if stop {
                    break;
                }
            }
            outcomes
        };

        let results = outcomes.into_iter().collect::<Option<Vec<_>>>();
        let Some(results) = results.filter(|results| results.len() == total) else {
            let processed = processed.load(Ordering::Relaxed);
            warn!(
                event_name = "optimizer.run.cancelled",
                correlation_id = %run_id,
                processed,
                total,
                "optimization run cancelled"
            );
            return Err(DomainError::Cancelled { processed, total });
        };

        verify_ledgers(&results)?;

        let summary = RunSummary::from_results(&results);
        info!(
            event_name = "optimizer.run.finished",
            correlation_id = %run_id,
            products = summary.products,
            rewritten = summary.rewritten,
            fallback = summary.fallback,
            high_impact = summary.high_impact,
            "optimization run finished"
        );

        Ok(OptimizationRun { run_id, generated_at: Utc::now(), results, summary })
    }
}

impl Default for OptimizationEngine {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

fn verify_ledgers(results: &[OptimizedProduct]) -> Result<(), DomainError> {
    for result in results {
        let explained: u32 = result.contributions.iter().map(|c| c.points).sum();
        if explained != result.priority_score {
            return Err(DomainError::InvariantViolation(format!(
                "product `{}` scored {} but its contributions sum to {explained}",
                result.product_id, result.priority_score
            )));
        }
    }
    Ok(())
}
