//! Library error type.

use std::path::PathBuf;

use crate::config::ConfigError;

/// Errors raised while loading inputs or writing results.
///
/// The simulation itself never fails; everything here comes from the
/// surrounding file handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot access \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ConfigError>),
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_lists_every_field() {
        let err = Error::InvalidConfig(vec![
            ConfigError {
                field: "calls_per_hour".into(),
                message: "must be > 0".into(),
            },
            ConfigError {
                field: "capacity".into(),
                message: "must be > 0".into(),
            },
        ]);
        let text = err.to_string();
        assert!(text.contains("calls_per_hour"));
        assert!(text.contains("capacity"));
    }
}
