use super::classifier::ClassifiedKeywords;
use super::matcher::RelevantKeyword;
use super::scoring::ScoreLedger;
use super::text::{
    contains_ignore_case, leads_with, normalize_token, partition_to_front, relocate_to_front,
    title_case,
};
use super::vocabulary::{DetectedAttributes, Vocabulary};
use crate::config::{RewriteConfig, ScoringConfig};
use crate::domain::keyword::PerformanceBucket;
use crate::domain::product::ProductRecord;
use crate::domain::recommendation::{
    OptimizationPath, RewriteTarget, RuleKind, NO_OPTIMIZATION_NEEDED,
};

/// Rewritten text for one product plus the ledger that justifies it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rewrite {
    pub optimized_title: String,
    pub optimized_description: String,
    pub path: OptimizationPath,
    pub ledger: ScoreLedger,
}

impl Rewrite {
    pub fn score_delta(&self) -> u32 {
        self.ledger.total()
    }
}

#[derive(Clone, Debug)]
pub struct Rewriter {
    rewrite: RewriteConfig,
    scoring: ScoringConfig,
    vocabulary: Vocabulary,
}

struct TitleRule {
    relocate: Option<(RuleKind, u32)>,
    prepend: (RuleKind, u32),
    rationale: &'static str,
}

impl Rewriter {
    pub fn new(rewrite: RewriteConfig, scoring: ScoringConfig, vocabulary: Vocabulary) -> Self {
        Self { rewrite, scoring, vocabulary }
    }

    /// Rewrites title and description from the winning bucket, or from
    /// detected attributes when no bucket has a keyword. Never fails; the
    /// worst case leaves both texts unchanged.
    pub fn rewrite(&self, product: &ProductRecord, buckets: &ClassifiedKeywords<'_>) -> Rewrite {
        let mut ledger = ScoreLedger::new();

        let (optimized_title, path) = match buckets.winner() {
            Some((bucket, keyword)) => (
                self.keyword_title(&product.title, bucket, keyword, &mut ledger),
                OptimizationPath::Keyword(bucket),
            ),
            None => (
                self.fallback_title(product, buckets.relevant, &mut ledger),
                OptimizationPath::Fallback,
            ),
        };

        let optimized_description = match path {
            OptimizationPath::Keyword(_) => {
                self.reinforce_description(&product.description, buckets, &mut ledger)
            }
            OptimizationPath::Fallback => self.template_description(product, &mut ledger),
        };

        Rewrite { optimized_title, optimized_description, path, ledger }
    }

    fn title_rule(&self, bucket: PerformanceBucket) -> TitleRule {
        let scoring = &self.scoring;
        match bucket {
            PerformanceBucket::EasyWin => TitleRule {
                relocate: None,
                prepend: (RuleKind::EasyWinPrepend, scoring.easy_win),
                rationale: "high volume and low difficulty, not yet ranking well",
            },
            PerformanceBucket::MissingOpportunity => TitleRule {
                relocate: None,
                prepend: (RuleKind::MissingOpportunityPrepend, scoring.missing_opportunity),
                rationale: "strong demand but the page is not ranking",
            },
            PerformanceBucket::TopPerformer => TitleRule {
                relocate: Some((RuleKind::TopPerformerRelocate, scoring.top_performer_relocate)),
                prepend: (RuleKind::TopPerformerPrepend, scoring.top_performer_prepend),
                rationale: "already ranking, reinforce without disrupting",
            },
            PerformanceBucket::PoorPerformer => TitleRule {
                relocate: Some((RuleKind::PoorPerformerRelocate, scoring.poor_performer_relocate)),
                prepend: (RuleKind::PoorPerformerPrepend, scoring.poor_performer_prepend),
                rationale: "ranking badly despite demand",
            },
        }
    }

    fn keyword_title(
        &self,
        title: &str,
        bucket: PerformanceBucket,
        keyword: &RelevantKeyword<'_>,
        ledger: &mut ScoreLedger,
    ) -> String {
        let record = keyword.record;
        let details = format!("{}, {}", record.metrics_label(), keyword.reason);

        if leads_with(title, &record.keyword) {
            ledger.note(
                RewriteTarget::Title,
                format!(
                    "'{}' already prominent, no optimization needed ({} keyword, {details})",
                    record.keyword,
                    bucket.label()
                ),
            );
            return title.to_owned();
        }

        let rule = self.title_rule(bucket);
        if let Some((relocate_rule, points)) = rule.relocate {
            if let Some(relocated) = relocate_to_front(title, &record.keyword) {
                ledger.award(
                    RewriteTarget::Title,
                    relocate_rule,
                    points,
                    format!(
                        "Moved {} keyword '{}' to the front of the title ({details}): {}",
                        bucket.label(),
                        record.keyword,
                        rule.rationale
                    ),
                );
                return relocated;
            }
        }

        let (prepend_rule, points) = rule.prepend;
        ledger.award(
            RewriteTarget::Title,
            prepend_rule,
            points,
            format!(
                "Prepended {} keyword '{}' ({details}): {}",
                bucket.label(),
                record.keyword,
                rule.rationale
            ),
        );
        self.prepend(&title_case(&record.keyword), title)
    }

    fn fallback_title(
        &self,
        product: &ProductRecord,
        relevant: usize,
        ledger: &mut ScoreLedger,
    ) -> String {
        let context = match relevant {
            0 => "No relevant keywords found; used attribute extraction".to_owned(),
            1 => "1 relevant keyword, none met a performance threshold; used attribute extraction"
                .to_owned(),
            n => format!(
                "{n} relevant keywords, none met a performance threshold; used attribute extraction"
            ),
        };
        ledger.note(RewriteTarget::Title, context);

        let title = product.title.as_str();
        let detected = DetectedAttributes::detect(&self.vocabulary, title, &product.description);

        if let Some(phrase) = detected.phrase().filter(|_| detected.is_complete()) {
            if leads_with(title, &phrase) {
                ledger.note(
                    RewriteTarget::Title,
                    format!("'{phrase}' already prominent, no optimization needed"),
                );
                return title.to_owned();
            }

            ledger.award(
                RewriteTarget::Title,
                RuleKind::AttributeSynthesis,
                self.scoring.attribute_synthesis,
                format!("Led with detected material and type '{}'", title_case(&phrase)),
            );
            let mut optimized = self.prepend(&title_case(&phrase), title);

            if let Some(brand) = self.rewrite.brand.as_deref() {
                if !contains_ignore_case(title, brand) {
                    ledger.award(
                        RewriteTarget::Title,
                        RuleKind::BrandSuffix,
                        self.scoring.brand_suffix,
                        format!("Added brand suffix '{brand}'"),
                    );
                    optimized = format!("{optimized}{}{brand}", self.rewrite.delimiter);
                }
            }
            return optimized;
        }

        let word_count = title.split_whitespace().count();
        if word_count >= self.rewrite.restructure_min_words {
            let restructured =
                partition_to_front(title, |token| self.vocabulary.is_domain_term(token));
            if restructured != title.split_whitespace().collect::<Vec<_>>().join(" ") {
                let moved = restructured
                    .split_whitespace()
                    .take_while(|token| self.vocabulary.is_domain_term(&normalize_token(token)))
                    .collect::<Vec<_>>()
                    .join(" ");
                ledger.award(
                    RewriteTarget::Title,
                    RuleKind::DomainRestructure,
                    self.scoring.domain_restructure,
                    format!(
                        "Moved category words '{moved}' to the front of a {word_count}-word title (lower confidence)"
                    ),
                );
                return restructured;
            }
        }

        ledger.note(RewriteTarget::Title, NO_OPTIMIZATION_NEEDED);
        title.to_owned()
    }

    fn reinforce_description(
        &self,
        description: &str,
        buckets: &ClassifiedKeywords<'_>,
        ledger: &mut ScoreLedger,
    ) -> String {
        let Some(top) = buckets.top_performers.first() else {
            return description.to_owned();
        };
        let keyword = &top.record.keyword;

        if contains_ignore_case(description, keyword) {
            ledger.note(
                RewriteTarget::Description,
                format!("Top-performing keyword '{keyword}' already present in description"),
            );
            return description.to_owned();
        }

        ledger.award(
            RewriteTarget::Description,
            RuleKind::DescriptionReinforcement,
            self.scoring.description_reinforcement,
            format!(
                "Appended top-performing keyword '{}' to reinforce ranking ({})",
                title_case(keyword),
                top.record.metrics_label()
            ),
        );
        append_sentence(description, &title_case(keyword))
    }

    fn template_description(&self, product: &ProductRecord, ledger: &mut ScoreLedger) -> String {
        let description = product.description.as_str();
        let detected =
            DetectedAttributes::detect(&self.vocabulary, &product.title, &product.description);
        let subject = match (&detected.material, &detected.furniture_type) {
            (_, Some(_)) => detected.phrase(),
            (Some(material), None) => Some(format!("{material} piece")),
            (None, None) => None,
        };
        let Some(subject) = subject else {
            return description.to_owned();
        };

        let sentence = match self.rewrite.brand.as_deref() {
            Some(brand) => format!("Shop this {subject} from {brand}."),
            None => format!("Shop this {subject}."),
        };
        if contains_ignore_case(description, &sentence) {
            ledger.note(RewriteTarget::Description, "Summary sentence already present");
            return description.to_owned();
        }

        ledger.award(
            RewriteTarget::Description,
            RuleKind::DescriptionTemplate,
            self.scoring.description_template,
            format!("Appended summary sentence for detected '{subject}'"),
        );
        append_sentence(description, &sentence)
    }

    fn prepend(&self, lead: &str, title: &str) -> String {
        if title.trim().is_empty() {
            lead.to_owned()
        } else {
            format!("{lead}{}{title}", self.rewrite.delimiter)
        }
    }
}

fn append_sentence(description: &str, addition: &str) -> String {
    let trimmed = description.trim_end();
    if trimmed.is_empty() {
        addition.to_owned()
    } else {
        format!("{trimmed} {addition}")
    }
}
