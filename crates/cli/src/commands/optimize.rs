use std::path::PathBuf;

use feedtune_core::config::ClassifierPreset;
use feedtune_core::{
    export, ApplicationError, ConfigOverrides, OptimizationEngine, OptimizationRun, RunInputs,
};
use tracing::info;

use super::{load_config, load_inputs, CommandResult, InputPaths};
use crate::io::{self, OutputFormat};

const COMMAND: &str = "optimize";

#[derive(Clone, Debug, Default)]
pub struct OptimizeArgs {
    pub inputs: InputPaths,
    pub output: PathBuf,
    /// Falls back to the output file extension.
    pub format: Option<OutputFormat>,
    pub config: Option<PathBuf>,
    pub brand: Option<String>,
    pub preset: Option<ClassifierPreset>,
    pub sequential: bool,
}

pub fn run(args: &OptimizeArgs) -> CommandResult {
    match execute(args) {
        Ok(message) => CommandResult::success(COMMAND, message),
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

fn execute(args: &OptimizeArgs) -> Result<String, ApplicationError> {
    let overrides = ConfigOverrides {
        brand: args.brand.clone(),
        classifier_preset: args.preset,
        parallel: args.sequential.then_some(false),
        ..ConfigOverrides::default()
    };
    let config = load_config(args.config.as_deref(), overrides)?;
    let loaded = load_inputs(&args.inputs, &config.feed)?;

    let mut inputs = RunInputs::new(&loaded.products, &loaded.keywords);
    if let Some(crawl) = loaded.crawl.as_ref() {
        inputs = inputs.with_crawl(crawl);
    }

    let run = OptimizationEngine::new(config.optimizer()).run(inputs)?;
    let batch = export::join(&loaded.products, &run.results, &config.feed);

    let format = args.format.unwrap_or_else(|| OutputFormat::from_path(&args.output));
    io::write_export(&args.output, &batch, format)
        .map_err(|error| ApplicationError::Export(format!("{error:#}")))?;

    info!(
        event_name = "cli.optimize.exported",
        correlation_id = %run.run_id,
        rows = batch.rows.len(),
        skipped = batch.skipped.len(),
        output = %args.output.display(),
        "optimization export written"
    );

    Ok(summary_message(&run, batch.rows.len(), &args.output))
}

fn summary_message(run: &OptimizationRun, rows: usize, output: &std::path::Path) -> String {
    let summary = &run.summary;
    format!(
        "run {}: {} products, {} rewritten, {} unchanged ({} keyword-driven, {} fallback); \
         impact high={} medium={} low={}; wrote {rows} rows to {}",
        run.run_id,
        summary.products,
        summary.rewritten,
        summary.unchanged,
        summary.keyword_driven,
        summary.fallback,
        summary.high_impact,
        summary.medium_impact,
        summary.low_impact,
        output.display()
    )
}
