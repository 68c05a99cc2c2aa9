use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub matching: MatchingConfig,
    pub classifier: ClassifierConfig,
    pub scoring: ScoringConfig,
    pub rewrite: RewriteConfig,
    pub vocabulary: VocabularyConfig,
    pub feed: FeedConfig,
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
}

/// The slice of [`AppConfig`] the optimization engine needs.
#[derive(Clone, Debug, PartialEq)]
pub struct OptimizerConfig {
    pub matching: MatchingConfig,
    pub classifier: ClassifierConfig,
    pub scoring: ScoringConfig,
    pub rewrite: RewriteConfig,
    pub vocabulary: VocabularyConfig,
    pub parallel: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchingConfig {
    /// Keywords below this monthly volume are never relevant.
    pub min_search_volume: u64,
    pub min_shared_words: usize,
    /// Require the matched domain term to also appear in the product text.
    pub anchor_domain_terms: bool,
    pub use_index: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifierConfig {
    pub preset: ClassifierPreset,
    pub easy_win_max_difficulty: u8,
    pub easy_win_min_volume: u64,
    pub easy_win_min_position: u32,
    pub top_performer_max_position: u32,
    pub poor_performer_min_position: u32,
    pub poor_performer_min_volume: u64,
    pub missing_opportunity_min_position: u32,
    pub missing_opportunity_min_volume: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoringConfig {
    pub easy_win: u32,
    pub missing_opportunity: u32,
    pub top_performer_relocate: u32,
    pub top_performer_prepend: u32,
    pub poor_performer_relocate: u32,
    pub poor_performer_prepend: u32,
    pub attribute_synthesis: u32,
    pub brand_suffix: u32,
    pub domain_restructure: u32,
    pub description_reinforcement: u32,
    pub description_template: u32,
    pub crawl_status: u32,
    pub overlength: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewriteConfig {
    pub delimiter: String,
    pub restructure_min_words: usize,
    pub brand: Option<String>,
    pub max_title_length: usize,
    pub max_description_length: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocabularyConfig {
    pub domain_terms: Vec<String>,
    pub furniture_types: Vec<String>,
    pub materials: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedConfig {
    pub id_field: String,
    pub title_field: String,
    pub description_field: String,
    pub url_fields: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub parallel: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Named easy-win threshold sets. The ranking history never settled on a
/// single policy, so both are kept selectable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierPreset {
    /// difficulty < 30, volume > 300, position > 30
    Standard,
    /// difficulty < 40, volume > 2000, any position
    HighVolume,
}

impl ClassifierPreset {
    /// `(max_difficulty, min_volume, min_position)` for the easy-win bucket.
    pub fn easy_win_thresholds(&self) -> (u8, u64, u32) {
        match self {
            ClassifierPreset::Standard => (30, 300, 30),
            ClassifierPreset::HighVolume => (40, 2000, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub brand: Option<String>,
    pub classifier_preset: Option<ClassifierPreset>,
    pub parallel: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

const DEFAULT_DOMAIN_TERMS: &[&str] = &[
    "table",
    "chair",
    "sofa",
    "bed",
    "wardrobe",
    "sideboard",
    "bookcase",
    "desk",
    "cabinet",
    "dresser",
    "drawers",
    "stool",
    "bench",
    "mirror",
    "shelf",
    "ottoman",
    "armchair",
    "oak",
    "walnut",
    "pine",
    "mango",
    "acacia",
    "fabric",
    "leather",
    "velvet",
    "marble",
    "rattan",
];

const DEFAULT_FURNITURE_TYPES: &[&str] = &[
    "coffee table",
    "dining table",
    "console table",
    "side table",
    "bedside table",
    "dressing table",
    "dining chair",
    "chest of drawers",
    "corner sofa",
    "sofa bed",
    "tv unit",
    "armchair",
    "sofa",
    "chair",
    "table",
    "sideboard",
    "wardrobe",
    "bookcase",
    "bed",
    "desk",
    "cabinet",
    "dresser",
    "stool",
    "bench",
    "mirror",
    "shelf",
    "ottoman",
];

const DEFAULT_MATERIALS: &[&str] = &[
    "oak", "walnut", "pine", "mango", "acacia", "ash", "beech", "teak", "fabric", "leather",
    "velvet", "linen", "marble", "glass", "metal", "rattan",
];

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            matching: MatchingConfig {
                min_search_volume: 1,
                min_shared_words: 2,
                anchor_domain_terms: true,
                use_index: true,
            },
            classifier: ClassifierConfig::from_preset(ClassifierPreset::Standard),
            scoring: ScoringConfig {
                easy_win: 70,
                missing_opportunity: 60,
                top_performer_relocate: 35,
                top_performer_prepend: 40,
                poor_performer_relocate: 45,
                poor_performer_prepend: 50,
                attribute_synthesis: 25,
                brand_suffix: 10,
                domain_restructure: 15,
                description_reinforcement: 25,
                description_template: 15,
                crawl_status: 10,
                overlength: 5,
            },
            rewrite: RewriteConfig {
                delimiter: " | ".to_owned(),
                restructure_min_words: 8,
                brand: None,
                max_title_length: 150,
                max_description_length: 5000,
            },
            vocabulary: VocabularyConfig {
                domain_terms: owned(DEFAULT_DOMAIN_TERMS),
                furniture_types: owned(DEFAULT_FURNITURE_TYPES),
                materials: owned(DEFAULT_MATERIALS),
            },
            feed: FeedConfig::default(),
            runtime: RuntimeConfig { parallel: true },
            logging: LoggingConfig { level: "info".to_owned(), format: LogFormat::Compact },
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        AppConfig::default().optimizer()
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        AppConfig::default().matching
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::from_preset(ClassifierPreset::Standard)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        AppConfig::default().scoring
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        AppConfig::default().rewrite
    }
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        AppConfig::default().vocabulary
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        AppConfig::default().logging
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            id_field: "id".to_owned(),
            title_field: "title".to_owned(),
            description_field: "description".to_owned(),
            url_fields: owned(&["link", "url"]),
        }
    }
}

impl ClassifierConfig {
    pub fn from_preset(preset: ClassifierPreset) -> Self {
        let mut config = Self {
            preset,
            easy_win_max_difficulty: 0,
            easy_win_min_volume: 0,
            easy_win_min_position: 0,
            top_performer_max_position: 10,
            poor_performer_min_position: 20,
            poor_performer_min_volume: 500,
            missing_opportunity_min_position: 50,
            missing_opportunity_min_volume: 1000,
        };
        config.apply_preset(preset);
        config
    }

    /// Resets the easy-win thresholds to the preset's values.
    pub fn apply_preset(&mut self, preset: ClassifierPreset) {
        let (max_difficulty, min_volume, min_position) = preset.easy_win_thresholds();
        self.preset = preset;
        self.easy_win_max_difficulty = max_difficulty;
        self.easy_win_min_volume = min_volume;
        self.easy_win_min_position = min_position;
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl std::str::FromStr for ClassifierPreset {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "standard" => Ok(Self::Standard),
            "high_volume" => Ok(Self::HighVolume),
            other => Err(ConfigError::Validation(format!(
                "unsupported classifier preset `{other}` (expected standard|high_volume)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("feedtune.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(matching) = patch.matching {
            if let Some(min_search_volume) = matching.min_search_volume {
                self.matching.min_search_volume = min_search_volume;
            }
            if let Some(min_shared_words) = matching.min_shared_words {
                self.matching.min_shared_words = min_shared_words;
            }
            if let Some(anchor_domain_terms) = matching.anchor_domain_terms {
                self.matching.anchor_domain_terms = anchor_domain_terms;
            }
            if let Some(use_index) = matching.use_index {
                self.matching.use_index = use_index;
            }
        }

        if let Some(classifier) = patch.classifier {
            if let Some(preset) = classifier.preset {
                self.classifier.apply_preset(preset);
            }
            if let Some(value) = classifier.easy_win_max_difficulty {
                self.classifier.easy_win_max_difficulty = value;
            }
            if let Some(value) = classifier.easy_win_min_volume {
                self.classifier.easy_win_min_volume = value;
            }
            if let Some(value) = classifier.easy_win_min_position {
                self.classifier.easy_win_min_position = value;
            }
            if let Some(value) = classifier.top_performer_max_position {
                self.classifier.top_performer_max_position = value;
            }
            if let Some(value) = classifier.poor_performer_min_position {
                self.classifier.poor_performer_min_position = value;
            }
            if let Some(value) = classifier.poor_performer_min_volume {
                self.classifier.poor_performer_min_volume = value;
            }
            if let Some(value) = classifier.missing_opportunity_min_position {
                self.classifier.missing_opportunity_min_position = value;
            }
            if let Some(value) = classifier.missing_opportunity_min_volume {
                self.classifier.missing_opportunity_min_volume = value;
            }
        }

        if let Some(scoring) = patch.scoring {
            let target = &mut self.scoring;
            let pairs = [
                (scoring.easy_win, &mut target.easy_win),
                (scoring.missing_opportunity, &mut target.missing_opportunity),
                (scoring.top_performer_relocate, &mut target.top_performer_relocate),
                (scoring.top_performer_prepend, &mut target.top_performer_prepend),
                (scoring.poor_performer_relocate, &mut target.poor_performer_relocate),
                (scoring.poor_performer_prepend, &mut target.poor_performer_prepend),
                (scoring.attribute_synthesis, &mut target.attribute_synthesis),
                (scoring.brand_suffix, &mut target.brand_suffix),
                (scoring.domain_restructure, &mut target.domain_restructure),
                (scoring.description_reinforcement, &mut target.description_reinforcement),
                (scoring.description_template, &mut target.description_template),
                (scoring.crawl_status, &mut target.crawl_status),
                (scoring.overlength, &mut target.overlength),
            ];
            for (value, slot) in pairs {
                if let Some(value) = value {
                    *slot = value;
                }
            }
        }

        if let Some(rewrite) = patch.rewrite {
            if let Some(delimiter) = rewrite.delimiter {
                self.rewrite.delimiter = delimiter;
            }
            if let Some(restructure_min_words) = rewrite.restructure_min_words {
                self.rewrite.restructure_min_words = restructure_min_words;
            }
            if let Some(brand) = rewrite.brand {
                self.rewrite.brand = non_blank(brand);
            }
            if let Some(max_title_length) = rewrite.max_title_length {
                self.rewrite.max_title_length = max_title_length;
            }
            if let Some(max_description_length) = rewrite.max_description_length {
                self.rewrite.max_description_length = max_description_length;
            }
        }

        if let Some(vocabulary) = patch.vocabulary {
            if let Some(domain_terms) = vocabulary.domain_terms {
                self.vocabulary.domain_terms = domain_terms;
            }
            if let Some(furniture_types) = vocabulary.furniture_types {
                self.vocabulary.furniture_types = furniture_types;
            }
            if let Some(materials) = vocabulary.materials {
                self.vocabulary.materials = materials;
            }
        }

        if let Some(feed) = patch.feed {
            if let Some(id_field) = feed.id_field {
                self.feed.id_field = id_field;
            }
            if let Some(title_field) = feed.title_field {
                self.feed.title_field = title_field;
            }
            if let Some(description_field) = feed.description_field {
                self.feed.description_field = description_field;
            }
            if let Some(url_fields) = feed.url_fields {
                self.feed.url_fields = url_fields;
            }
        }

        if let Some(runtime) = patch.runtime {
            if let Some(parallel) = runtime.parallel {
                self.runtime.parallel = parallel;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("FEEDTUNE_MATCHING_MIN_SEARCH_VOLUME") {
            self.matching.min_search_volume =
                parse_u64("FEEDTUNE_MATCHING_MIN_SEARCH_VOLUME", &value)?;
        }
        if let Some(value) = read_env("FEEDTUNE_MATCHING_USE_INDEX") {
            self.matching.use_index = parse_bool("FEEDTUNE_MATCHING_USE_INDEX", &value)?;
        }

        if let Some(value) = read_env("FEEDTUNE_CLASSIFIER_PRESET") {
            self.classifier.apply_preset(value.parse()?);
        }

        if let Some(value) = read_env("FEEDTUNE_REWRITE_BRAND") {
            self.rewrite.brand = Some(value);
        }
        if let Some(value) = env::var("FEEDTUNE_REWRITE_DELIMITER").ok().filter(|v| !v.is_empty())
        {
            self.rewrite.delimiter = value;
        }

        if let Some(value) = read_env("FEEDTUNE_RUNTIME_PARALLEL") {
            self.runtime.parallel = parse_bool("FEEDTUNE_RUNTIME_PARALLEL", &value)?;
        }

        let log_level =
            read_env("FEEDTUNE_LOGGING_LEVEL").or_else(|| read_env("FEEDTUNE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("FEEDTUNE_LOGGING_FORMAT").or_else(|| read_env("FEEDTUNE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(brand) = overrides.brand {
            self.rewrite.brand = non_blank(brand);
        }
        if let Some(preset) = overrides.classifier_preset {
            self.classifier.apply_preset(preset);
        }
        if let Some(parallel) = overrides.parallel {
            self.runtime.parallel = parallel;
        }
    }

    pub fn optimizer(&self) -> OptimizerConfig {
        OptimizerConfig {
            matching: self.matching.clone(),
            classifier: self.classifier.clone(),
            scoring: self.scoring.clone(),
            rewrite: self.rewrite.clone(),
            vocabulary: self.vocabulary.clone(),
            parallel: self.runtime.parallel,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_matching(&self.matching)?;
        validate_classifier(&self.classifier)?;
        validate_rewrite(&self.rewrite)?;
        validate_vocabulary(&self.vocabulary)?;
        validate_feed(&self.feed)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("feedtune.toml"), PathBuf::from("config/feedtune.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_matching(matching: &MatchingConfig) -> Result<(), ConfigError> {
    if matching.min_search_volume == 0 {
        return Err(ConfigError::Validation(
            "matching.min_search_volume must be at least 1; zero-volume keywords are never relevant"
                .to_owned(),
        ));
    }
    if matching.min_shared_words == 0 {
        return Err(ConfigError::Validation(
            "matching.min_shared_words must be greater than zero".to_owned(),
        ));
    }
    Ok(())
}

fn validate_classifier(classifier: &ClassifierConfig) -> Result<(), ConfigError> {
    if classifier.easy_win_max_difficulty > 100 {
        return Err(ConfigError::Validation(
            "classifier.easy_win_max_difficulty must be in range 0..=100".to_owned(),
        ));
    }
    if classifier.top_performer_max_position == 0 {
        return Err(ConfigError::Validation(
            "classifier.top_performer_max_position must be greater than zero".to_owned(),
        ));
    }
    Ok(())
}

fn validate_rewrite(rewrite: &RewriteConfig) -> Result<(), ConfigError> {
    if rewrite.delimiter.trim().is_empty() {
        return Err(ConfigError::Validation(
            "rewrite.delimiter must contain a visible separator such as ` | `".to_owned(),
        ));
    }
    if rewrite.restructure_min_words == 0 {
        return Err(ConfigError::Validation(
            "rewrite.restructure_min_words must be greater than zero".to_owned(),
        ));
    }
    if rewrite.max_title_length == 0 || rewrite.max_description_length == 0 {
        return Err(ConfigError::Validation(
            "rewrite.max_title_length and rewrite.max_description_length must be greater than zero"
                .to_owned(),
        ));
    }
    Ok(())
}

fn validate_vocabulary(vocabulary: &VocabularyConfig) -> Result<(), ConfigError> {
    if let Some(term) = vocabulary.domain_terms.iter().find(|term| {
        let trimmed = term.trim();
        trimmed.is_empty() || trimmed.split_whitespace().count() > 1
    }) {
        return Err(ConfigError::Validation(format!(
            "vocabulary.domain_terms entries must be single words (found `{term}`)"
        )));
    }

    let blank_phrase = vocabulary
        .furniture_types
        .iter()
        .chain(vocabulary.materials.iter())
        .any(|phrase| phrase.trim().is_empty());
    if blank_phrase {
        return Err(ConfigError::Validation(
            "vocabulary.furniture_types and vocabulary.materials must not contain blank entries"
                .to_owned(),
        ));
    }
    Ok(())
}

fn validate_feed(feed: &FeedConfig) -> Result<(), ConfigError> {
    let blank = [&feed.id_field, &feed.title_field, &feed.description_field]
        .into_iter()
        .chain(feed.url_fields.iter())
        .any(|field| field.trim().is_empty());
    if blank {
        return Err(ConfigError::Validation("feed field names must not be blank".to_owned()));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_owned(),
        )),
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.trim().parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    matching: Option<MatchingPatch>,
    classifier: Option<ClassifierPatch>,
    scoring: Option<ScoringPatch>,
    rewrite: Option<RewritePatch>,
    vocabulary: Option<VocabularyPatch>,
    feed: Option<FeedPatch>,
    runtime: Option<RuntimePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct MatchingPatch {
    min_search_volume: Option<u64>,
    min_shared_words: Option<usize>,
    anchor_domain_terms: Option<bool>,
    use_index: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct ClassifierPatch {
    preset: Option<ClassifierPreset>,
    easy_win_max_difficulty: Option<u8>,
    easy_win_min_volume: Option<u64>,
    easy_win_min_position: Option<u32>,
    top_performer_max_position: Option<u32>,
    poor_performer_min_position: Option<u32>,
    poor_performer_min_volume: Option<u64>,
    missing_opportunity_min_position: Option<u32>,
    missing_opportunity_min_volume: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ScoringPatch {
    easy_win: Option<u32>,
    missing_opportunity: Option<u32>,
    top_performer_relocate: Option<u32>,
    top_performer_prepend: Option<u32>,
    poor_performer_relocate: Option<u32>,
    poor_performer_prepend: Option<u32>,
    attribute_synthesis: Option<u32>,
    brand_suffix: Option<u32>,
    domain_restructure: Option<u32>,
    description_reinforcement: Option<u32>,
    description_template: Option<u32>,
    crawl_status: Option<u32>,
    overlength: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct RewritePatch {
    delimiter: Option<String>,
    restructure_min_words: Option<usize>,
    brand: Option<String>,
    max_title_length: Option<usize>,
    max_description_length: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct VocabularyPatch {
    domain_terms: Option<Vec<String>>,
    furniture_types: Option<Vec<String>>,
    materials: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct FeedPatch {
    id_field: Option<String>,
    title_field: Option<String>,
    description_field: Option<String>,
    url_fields: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RuntimePatch {
    parallel: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
