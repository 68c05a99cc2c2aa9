pub mod audit;
pub mod config;
pub mod optimize;

use std::path::{Path, PathBuf};

use feedtune_core::config::FeedConfig;
use feedtune_core::{
    AppConfig, ApplicationError, ConfigOverrides, CrawlIndex, KeywordCatalog, LoadOptions,
    ProductBatch, RawKeywordRow,
};
use serde::Serialize;

use crate::io;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        Self::failure(command, error.error_class(), error.to_string(), error.exit_code())
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// An explicit `--config` path must exist; otherwise the default locations
/// are optional.
pub(crate) fn load_config(
    config_path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<AppConfig, ApplicationError> {
    let options = LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        require_file: config_path.is_some(),
        overrides,
    };
    Ok(AppConfig::load(options)?)
}

/// Input file locations shared by `optimize` and `audit`.
#[derive(Clone, Debug, Default)]
pub struct InputPaths {
    pub products: PathBuf,
    pub keywords: Option<PathBuf>,
    pub crawl: Option<PathBuf>,
}

pub(crate) struct LoadedInputs {
    pub products: ProductBatch,
    pub keywords: KeywordCatalog,
    pub crawl: Option<CrawlIndex>,
}

/// Missing keyword data is not an error: every product then takes the
/// attribute-extraction path.
pub(crate) fn load_inputs(
    paths: &InputPaths,
    feed: &FeedConfig,
) -> Result<LoadedInputs, ApplicationError> {
    let products = read(&paths.products, "products")
        .map(|rows| ProductBatch::from_rows(rows, feed))?;

    let keywords = match &paths.keywords {
        Some(path) => {
            let rows = read(path, "keywords")?;
            KeywordCatalog::load(rows.iter().map(|row| RawKeywordRow::from_cells(row)))
        }
        None => KeywordCatalog::default(),
    };

    let crawl = match &paths.crawl {
        Some(path) => Some(CrawlIndex::from_rows(&read(path, "crawl")?)),
        None => None,
    };

    Ok(LoadedInputs { products, keywords, crawl })
}

fn read(path: &Path, label: &str) -> Result<Vec<feedtune_core::RawRow>, ApplicationError> {
    io::read_rows(path).map_err(|error| ApplicationError::Input(format!("{label}: {error:#}")))
}
