use thiserror::Error;

use crate::config::ConfigError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("optimization run cancelled after {processed} of {total} products")]
    Cancelled { processed: usize, total: usize },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("input failure: {0}")]
    Input(String),
    #[error("export failure: {0}")]
    Export(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl From<ConfigError> for ApplicationError {
    fn from(error: ConfigError) -> Self {
        Self::Configuration(error.to_string())
    }
}

impl ApplicationError {
    /// Stable machine-readable class used in command output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::Cancelled { .. }) => "cancelled",
            Self::Domain(DomainError::InvariantViolation(_)) => "invariant_violation",
            Self::Input(_) => "input",
            Self::Export(_) => "export",
            Self::Configuration(_) => "config_validation",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Input(_) => 3,
            Self::Domain(_) => 4,
            Self::Export(_) => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError};

    #[test]
    fn cancellation_maps_to_optimization_exit_code() {
        let error = ApplicationError::from(DomainError::Cancelled { processed: 3, total: 10 });

        assert_eq!(error.error_class(), "cancelled");
        assert_eq!(error.exit_code(), 4);
        assert_eq!(error.to_string(), "optimization run cancelled after 3 of 10 products");
    }

    #[test]
    fn input_and_export_failures_have_distinct_exit_codes() {
        let input = ApplicationError::Input("products.csv is unreadable".to_owned());
        let export = ApplicationError::Export("disk full".to_owned());

        assert_eq!(input.exit_code(), 3);
        assert_eq!(export.exit_code(), 5);
        assert_eq!(input.error_class(), "input");
        assert_eq!(export.error_class(), "export");
    }

    #[test]
    fn configuration_failure_uses_config_class() {
        let error = ApplicationError::Configuration("bad delimiter".to_owned());
        assert_eq!(error.error_class(), "config_validation");
        assert_eq!(error.exit_code(), 2);
    }
}
