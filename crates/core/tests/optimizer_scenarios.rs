use feedtune_core::config::{FeedConfig, MatchingConfig, OptimizerConfig};
use feedtune_core::export;
use feedtune_core::optimizer::{RelevanceMatcher, Vocabulary};
use feedtune_core::{
    ExpectedImpact, KeywordCatalog, KeywordRecord, OptimizationEngine, OptimizationPath,
    OptimizedProduct, PerformanceBucket, ProductBatch, ProductRecord, RawKeywordRow, RuleKind,
    RunInputs,
};

fn engine(parallel: bool) -> OptimizationEngine {
    OptimizationEngine::new(OptimizerConfig { parallel, ..OptimizerConfig::default() })
}

fn optimize_one(product: ProductRecord, keywords: Vec<KeywordRecord>) -> OptimizedProduct {
    let catalog = KeywordCatalog::from_records(keywords);
    engine(false).optimize_product(&product, &catalog, None)
}

fn assert_ledger_explains_score(result: &OptimizedProduct) {
    let explained: u32 = result.contributions.iter().map(|c| c.points).sum();
    assert_eq!(explained, result.priority_score);
    for contribution in &result.contributions {
        let reasoning = format!("{} {}", result.title_reasoning, result.description_reasoning);
        assert!(reasoning.contains(&contribution.reason), "missing reason: {}", contribution.reason);
    }
}

#[test]
fn top_performer_already_in_title_only_reinforces_description() {
    let result = optimize_one(
        ProductRecord::new("p1", "Oak Dining Table", ""),
        vec![KeywordRecord::new("oak dining table", 5, 2000, 10)],
    );

    assert_eq!(result.optimized_title, "Oak Dining Table");
    assert!(result.title_reasoning.contains("already prominent"));
    assert_eq!(result.optimized_description, "Oak Dining Table");
    assert_eq!(result.priority_score, 25);
    assert_eq!(result.expected_impact, ExpectedImpact::Low);
    assert_eq!(result.path, OptimizationPath::Keyword(PerformanceBucket::TopPerformer));
    assert_ledger_explains_score(&result);
}

#[test]
fn easy_win_is_prepended_with_high_impact() {
    let result = optimize_one(
        ProductRecord::new("p1", "3 Seater Fabric Sofa Grey", "Comfortable sofa."),
        vec![KeywordRecord::new("grey fabric sofa", 45, 1800, 25)],
    );

    assert_eq!(result.optimized_title, "Grey Fabric Sofa | 3 Seater Fabric Sofa Grey");
    assert_eq!(result.priority_score, 70);
    assert_eq!(result.expected_impact, ExpectedImpact::High);
    assert!(result.title_reasoning.contains("grey fabric sofa"));
    assert_ledger_explains_score(&result);
}

#[test]
fn empty_catalog_falls_back_to_attribute_extraction() {
    let result =
        optimize_one(ProductRecord::new("p1", "Solid Oak Coffee Table", ""), Vec::new());

    assert_eq!(result.path, OptimizationPath::Fallback);
    assert_eq!(result.optimized_title, "Oak Coffee Table | Solid Oak Coffee Table");
    assert!(result.title_reasoning.contains("No relevant keywords found"));

    let title_points: u32 = result
        .contributions
        .iter()
        .filter(|c| c.rule == RuleKind::AttributeSynthesis)
        .map(|c| c.points)
        .sum();
    assert!((20..=35).contains(&title_points));
    assert!(matches!(result.expected_impact, ExpectedImpact::Low | ExpectedImpact::Medium));
    assert_ledger_explains_score(&result);
}

#[test]
fn zero_volume_keywords_never_drive_a_rewrite() {
    let result = optimize_one(
        ProductRecord::new("p1", "Grey Fabric Sofa", ""),
        vec![
            KeywordRecord::new("grey fabric sofa", 45, 0, 5),
            KeywordRecord::new("fabric sofa", 2, 0, 5),
        ],
    );

    assert_eq!(result.path, OptimizationPath::Fallback);
    assert!(result.contributions.iter().all(|c| !matches!(
        c.rule,
        RuleKind::EasyWinPrepend
            | RuleKind::TopPerformerRelocate
            | RuleKind::TopPerformerPrepend
            | RuleKind::PoorPerformerRelocate
            | RuleKind::PoorPerformerPrepend
            | RuleKind::MissingOpportunityPrepend
            | RuleKind::DescriptionReinforcement
    )));
}

#[test]
fn rerunning_an_optimized_product_does_not_stack_prefixes() {
    let keywords = vec![
        KeywordRecord::new("grey fabric sofa", 45, 1800, 25),
        KeywordRecord::new("fabric sofa", 6, 900, 40),
    ];
    let first = optimize_one(
        ProductRecord::new("p1", "3 Seater Fabric Sofa Grey", "Comfortable sofa."),
        keywords.clone(),
    );
    let again = optimize_one(
        ProductRecord::new("p1", "3 Seater Fabric Sofa Grey", "Comfortable sofa."),
        keywords.clone(),
    );
    assert_eq!(first, again);

    let refed = optimize_one(
        ProductRecord::new("p1", first.optimized_title.clone(), first.optimized_description.clone()),
        keywords,
    );
    assert_eq!(refed.optimized_title, first.optimized_title);
    assert_eq!(refed.optimized_description, first.optimized_description);
    assert_eq!(refed.priority_score, 0);
    assert!(refed.title_reasoning.contains("already prominent"));
}

#[test]
fn fallback_rerun_is_stable_too() {
    let first = optimize_one(ProductRecord::new("p1", "Solid Oak Coffee Table", ""), Vec::new());
    let refed = optimize_one(
        ProductRecord::new("p1", first.optimized_title.clone(), first.optimized_description.clone()),
        Vec::new(),
    );

    assert_eq!(refed.optimized_title, first.optimized_title);
    assert_eq!(refed.optimized_description, first.optimized_description);
    assert_eq!(refed.priority_score, 0);
}

#[test]
fn impact_tiers_follow_score_cutoffs() {
    for (score, impact) in [
        (0, ExpectedImpact::Low),
        (34, ExpectedImpact::Low),
        (35, ExpectedImpact::Medium),
        (59, ExpectedImpact::Medium),
        (60, ExpectedImpact::High),
    ] {
        assert_eq!(ExpectedImpact::from_score(score), impact, "score {score}");
    }
}

fn mixed_batch() -> (ProductBatch, KeywordCatalog) {
    let products = ProductBatch::new(vec![
        ProductRecord::new("a", "3 Seater Fabric Sofa Grey", "Comfortable sofa.")
            .with_attribute("price", "899.00"),
        ProductRecord::new("b", "Oak Dining Table", "").with_attribute("price", "499.00"),
        ProductRecord::new("c", "Solid Oak Coffee Table", "").with_attribute("colour", "natural"),
        ProductRecord::new("d", "Scented Candle", "Smells nice."),
        ProductRecord::new("e", "Walnut Bedside Table With Two Drawers", "Made in Devon."),
        ProductRecord::new("f", "", ""),
    ]);
    let catalog = KeywordCatalog::load(vec![
        RawKeywordRow::new("grey fabric sofa")
            .with_position(45.0)
            .with_search_volume(1800.0)
            .with_difficulty(25.0),
        RawKeywordRow::new("oak dining table")
            .with_position(5.0)
            .with_search_volume(2000.0)
            .with_difficulty(10.0),
        RawKeywordRow::new("walnut bedside table")
            .with_position(28.0)
            .with_search_volume(900.0)
            .with_difficulty(55.0),
        RawKeywordRow::new("bedside table").with_search_volume(4000.0),
        RawKeywordRow::new("candle"),
        RawKeywordRow::new("oak"),
    ]);
    (products, catalog)
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let (products, catalog) = mixed_batch();
    let sequential = engine(false).run(RunInputs::new(&products, &catalog)).expect("sequential");
    let parallel = engine(true).run(RunInputs::new(&products, &catalog)).expect("parallel");

    assert_eq!(sequential.results, parallel.results);
    assert_eq!(sequential.summary, parallel.summary);
}

#[test]
fn indexed_lookup_matches_full_scan() {
    let (products, catalog) = mixed_batch();
    let matcher = RelevanceMatcher::new(MatchingConfig::default(), Vocabulary::default());

    for product in products.products() {
        let text = product.text();
        assert_eq!(
            matcher.relevant(&text, &catalog),
            matcher.relevant_full_scan(&text, &catalog),
            "product {}",
            product.id
        );
    }
}

#[test]
fn export_round_trip_keeps_every_product_in_order() {
    let (products, catalog) = mixed_batch();
    let run = engine(true).run(RunInputs::new(&products, &catalog)).expect("run");
    let batch = export::join(&products, &run.results, &FeedConfig::default());

    assert!(batch.skipped.is_empty());
    assert_eq!(batch.rows.len(), products.len());
    for (row, product) in batch.rows.iter().zip(products.products()) {
        assert_eq!(row.product_id, product.id);
        for (column, value) in &product.attributes {
            assert_eq!(row.get(column), Some(value.as_str()));
        }
        assert!(row.get("title_reasoning").is_some_and(|reasoning| !reasoning.is_empty()));
    }
}

#[test]
fn every_result_has_non_empty_reasoning_and_explained_score() {
    let (products, catalog) = mixed_batch();
    let run = engine(false).run(RunInputs::new(&products, &catalog)).expect("run");

    for result in &run.results {
        assert!(!result.title_reasoning.is_empty());
        assert!(!result.description_reasoning.is_empty());
        assert_ledger_explains_score(result);
    }
}
