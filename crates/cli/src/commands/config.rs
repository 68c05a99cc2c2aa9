use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use feedtune_core::config::{ClassifierPreset, LogFormat};
use feedtune_core::ConfigOverrides;
use toml::Value;

use super::{load_config, CommandResult};

const COMMAND: &str = "config";

pub fn run(config_path: Option<&Path>) -> CommandResult {
    let config = match load_config(config_path, ConfigOverrides::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    let config_file_path = detect_config_path(config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let matching = &config.matching;
    let classifier = &config.classifier;
    let scoring = &config.scoring;
    let rewrite = &config.rewrite;
    let feed = &config.feed;

    let fields = vec![
        field(
            "matching.min_search_volume",
            matching.min_search_volume.to_string(),
            &["FEEDTUNE_MATCHING_MIN_SEARCH_VOLUME"],
        ),
        field("matching.min_shared_words", matching.min_shared_words.to_string(), &[]),
        field("matching.anchor_domain_terms", matching.anchor_domain_terms.to_string(), &[]),
        field(
            "matching.use_index",
            matching.use_index.to_string(),
            &["FEEDTUNE_MATCHING_USE_INDEX"],
        ),
        field(
            "classifier.preset",
            preset_name(classifier.preset).to_owned(),
            &["FEEDTUNE_CLASSIFIER_PRESET"],
        ),
        field(
            "classifier.easy_win_max_difficulty",
            classifier.easy_win_max_difficulty.to_string(),
            &[],
        ),
        field("classifier.easy_win_min_volume", classifier.easy_win_min_volume.to_string(), &[]),
        field(
            "classifier.easy_win_min_position",
            classifier.easy_win_min_position.to_string(),
            &[],
        ),
        field(
            "classifier.top_performer_max_position",
            classifier.top_performer_max_position.to_string(),
            &[],
        ),
        field(
            "classifier.poor_performer_min_position",
            classifier.poor_performer_min_position.to_string(),
            &[],
        ),
        field(
            "classifier.poor_performer_min_volume",
            classifier.poor_performer_min_volume.to_string(),
            &[],
        ),
        field(
            "classifier.missing_opportunity_min_position",
            classifier.missing_opportunity_min_position.to_string(),
            &[],
        ),
        field(
            "classifier.missing_opportunity_min_volume",
            classifier.missing_opportunity_min_volume.to_string(),
            &[],
        ),
        field("scoring.easy_win", scoring.easy_win.to_string(), &[]),
        field("scoring.missing_opportunity", scoring.missing_opportunity.to_string(), &[]),
        field("scoring.top_performer_relocate", scoring.top_performer_relocate.to_string(), &[]),
        field("scoring.top_performer_prepend", scoring.top_performer_prepend.to_string(), &[]),
        field("scoring.poor_performer_relocate", scoring.poor_performer_relocate.to_string(), &[]),
        field("scoring.poor_performer_prepend", scoring.poor_performer_prepend.to_string(), &[]),
        field("scoring.attribute_synthesis", scoring.attribute_synthesis.to_string(), &[]),
        field("scoring.brand_suffix", scoring.brand_suffix.to_string(), &[]),
        field("scoring.domain_restructure", scoring.domain_restructure.to_string(), &[]),
        field(
            "scoring.description_reinforcement",
            scoring.description_reinforcement.to_string(),
            &[],
        ),
        field("scoring.description_template", scoring.description_template.to_string(), &[]),
        field("scoring.crawl_status", scoring.crawl_status.to_string(), &[]),
        field("scoring.overlength", scoring.overlength.to_string(), &[]),
        field(
            "rewrite.delimiter",
            format!("{:?}", rewrite.delimiter),
            &["FEEDTUNE_REWRITE_DELIMITER"],
        ),
        field("rewrite.restructure_min_words", rewrite.restructure_min_words.to_string(), &[]),
        field(
            "rewrite.brand",
            rewrite.brand.clone().unwrap_or_else(|| "<unset>".to_owned()),
            &["FEEDTUNE_REWRITE_BRAND"],
        ),
        field("rewrite.max_title_length", rewrite.max_title_length.to_string(), &[]),
        field("rewrite.max_description_length", rewrite.max_description_length.to_string(), &[]),
        field(
            "vocabulary.domain_terms",
            format!("{} terms", config.vocabulary.domain_terms.len()),
            &[],
        ),
        field(
            "vocabulary.furniture_types",
            format!("{} terms", config.vocabulary.furniture_types.len()),
            &[],
        ),
        field("vocabulary.materials", format!("{} terms", config.vocabulary.materials.len()), &[]),
        field("feed.id_field", feed.id_field.clone(), &[]),
        field("feed.title_field", feed.title_field.clone(), &[]),
        field("feed.description_field", feed.description_field.clone(), &[]),
        field("feed.url_fields", feed.url_fields.join(", "), &[]),
        field(
            "runtime.parallel",
            config.runtime.parallel.to_string(),
            &["FEEDTUNE_RUNTIME_PARALLEL"],
        ),
        field(
            "logging.level",
            config.logging.level.clone(),
            &["FEEDTUNE_LOGGING_LEVEL", "FEEDTUNE_LOG_LEVEL"],
        ),
        field(
            "logging.format",
            format_name(config.logging.format).to_owned(),
            &["FEEDTUNE_LOGGING_FORMAT", "FEEDTUNE_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(
        fields
            .into_iter()
            .map(|(key, value, env_keys)| render_line(key, &value, source(key, env_keys))),
    );

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn field(
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
) -> (&'static str, String, &'static [&'static str]) {
    (key, value, env_keys)
}

fn preset_name(preset: ClassifierPreset) -> &'static str {
    match preset {
        ClassifierPreset::Standard => "standard",
        ClassifierPreset::HighVolume => "high_volume",
    }
}

fn format_name(format: LogFormat) -> &'static str {
    match format {
        LogFormat::Compact => "compact",
        LogFormat::Pretty => "pretty",
        LogFormat::Json => "json",
    }
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let root = PathBuf::from("feedtune.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/feedtune.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::contains_path;

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc = "[rewrite]\nbrand = \"Acme\"\n".parse::<Value>().expect("toml");

        assert!(contains_path(&doc, "rewrite.brand"));
        assert!(!contains_path(&doc, "rewrite.delimiter"));
        assert!(!contains_path(&doc, "logging.level"));
    }
}
