use std::path::Path;

use feedtune_core::config::{LogFormat, LoggingConfig};
use feedtune_core::ConfigOverrides;
use tracing::Level;

use crate::commands::load_config;

/// Installs the global subscriber on stderr so stdout carries only command
/// output. A config that fails to load falls back to the default logging
/// section; the command itself reports the failure.
pub fn init(config_path: Option<&Path>, log_level: Option<String>, log_format: Option<LogFormat>) {
    let overrides = ConfigOverrides { log_level, log_format, ..ConfigOverrides::default() };
    let logging = load_config(config_path, overrides.clone())
        .map(|config| config.logging)
        .unwrap_or_else(|_| fallback(overrides));

    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    // A second init in the same process (tests) is a no-op.
    let _ = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

fn fallback(overrides: ConfigOverrides) -> LoggingConfig {
    let defaults = LoggingConfig::default();
    LoggingConfig {
        level: overrides.log_level.unwrap_or(defaults.level),
        format: overrides.log_format.unwrap_or(defaults.format),
    }
}
