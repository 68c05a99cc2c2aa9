pub mod audit;
pub mod config;
pub mod domain;
pub mod errors;
pub mod export;
pub mod optimizer;

pub use audit::{FeedAudit, FieldCoverage, Readiness};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, OptimizerConfig};
pub use domain::keyword::{KeywordRecord, PerformanceBucket, RawKeywordRow};
pub use domain::product::{ProductBatch, ProductId, ProductRecord};
pub use domain::recommendation::{
    Contribution, ExpectedImpact, OptimizationPath, OptimizedProduct, RewriteTarget, RuleKind,
};
pub use domain::RawRow;
pub use errors::{ApplicationError, DomainError};
pub use export::{ExportBatch, ExportRow, EXPORT_FIELDS};
pub use optimizer::{
    CancellationToken, CrawlIndex, CrawlRecord, KeywordCatalog, OptimizationEngine,
    OptimizationRun, RunInputs, RunSummary,
};
