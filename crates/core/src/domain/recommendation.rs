use serde::{Deserialize, Serialize};

use super::keyword::PerformanceBucket;
use super::product::ProductId;

/// Minimum priority score for a HIGH impact tier.
pub const HIGH_IMPACT_MIN_SCORE: u32 = 60;
/// Minimum priority score for a MEDIUM impact tier.
pub const MEDIUM_IMPACT_MIN_SCORE: u32 = 35;

/// Reasoning emitted when a field is left untouched and nothing else was said.
pub const NO_OPTIMIZATION_NEEDED: &str = "No optimization needed";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpectedImpact {
    High,
    Medium,
    Low,
}

impl ExpectedImpact {
    pub fn from_score(score: u32) -> Self {
        if score >= HIGH_IMPACT_MIN_SCORE {
            ExpectedImpact::High
        } else if score >= MEDIUM_IMPACT_MIN_SCORE {
            ExpectedImpact::Medium
        } else {
            ExpectedImpact::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpectedImpact::High => "HIGH",
            ExpectedImpact::Medium => "MEDIUM",
            ExpectedImpact::Low => "LOW",
        }
    }
}

/// Which text a contribution applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteTarget {
    Title,
    Description,
}

/// The rule that produced a score contribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    EasyWinPrepend,
    MissingOpportunityPrepend,
    TopPerformerRelocate,
    TopPerformerPrepend,
    PoorPerformerRelocate,
    PoorPerformerPrepend,
    AttributeSynthesis,
    BrandSuffix,
    DomainRestructure,
    DescriptionReinforcement,
    DescriptionTemplate,
    CrawlStatus,
    OverlengthTitle,
    OverlengthDescription,
}

/// One additive score increment and the justification text that explains it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub target: RewriteTarget,
    pub rule: RuleKind,
    pub points: u32,
    pub reason: String,
}

/// How a product's rewrite was driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "bucket", rename_all = "snake_case")]
pub enum OptimizationPath {
    Keyword(PerformanceBucket),
    Fallback,
}

/// The per-product recommendation. Created once per product per run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizedProduct {
    pub product_id: ProductId,
    pub current_title: String,
    pub optimized_title: String,
    pub current_description: String,
    pub optimized_description: String,
    pub title_reasoning: String,
    pub description_reasoning: String,
    pub priority_score: u32,
    pub expected_impact: ExpectedImpact,
    pub path: OptimizationPath,
    pub contributions: Vec<Contribution>,
}

impl OptimizedProduct {
    pub fn title_changed(&self) -> bool {
        self.current_title != self.optimized_title
    }

    pub fn description_changed(&self) -> bool {
        self.current_description != self.optimized_description
    }

    pub fn is_rewritten(&self) -> bool {
        self.title_changed() || self.description_changed()
    }
}

#[cfg(test)]
mod tests {
    use super::ExpectedImpact;

    #[test]
    fn impact_tier_boundaries() {
        assert_eq!(ExpectedImpact::from_score(0), ExpectedImpact::Low);
        assert_eq!(ExpectedImpact::from_score(34), ExpectedImpact::Low);
        assert_eq!(ExpectedImpact::from_score(35), ExpectedImpact::Medium);
        assert_eq!(ExpectedImpact::from_score(59), ExpectedImpact::Medium);
        assert_eq!(ExpectedImpact::from_score(60), ExpectedImpact::High);
        assert_eq!(ExpectedImpact::from_score(250), ExpectedImpact::High);
    }

    #[test]
    fn impact_serializes_in_upper_case() {
        let encoded = serde_json::to_string(&ExpectedImpact::Medium).expect("serialize");
        assert_eq!(encoded, "\"MEDIUM\"");
        assert_eq!(ExpectedImpact::High.as_str(), "HIGH");
    }
}
