use serde::Deserialize;

use crate::error::FillError;

/// Engine tuning, embeddable in a host application's configuration.
///
/// ```toml
/// max_depth = 32
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FillOptions {
    /// Nested struct levels the walker descends before giving up on a
    /// branch. `Option`, `Box` and container layers are not counted.
    pub max_depth: usize,
}

pub const DEFAULT_MAX_DEPTH: usize = 128;

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl FillOptions {
    /// Load options from a TOML file.
    pub fn load(path: &str) -> Result<Self, FillError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| FillError::Config(format!("{path}: {e}")))?;
        Self::parse(&content).map_err(|e| e.with_context(path))
    }

    /// Parse options from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, FillError> {
        let options: Self = toml::from_str(toml_str).map_err(|e| FillError::Config(e.to_string()))?;
        if options.max_depth == 0 {
            return Err(FillError::Config("max_depth must be at least 1".into()));
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        assert_eq!(FillOptions::parse("").unwrap(), FillOptions::default());
        assert_eq!(FillOptions::default().max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn reads_max_depth() {
        let options = FillOptions::parse("max_depth = 8").unwrap();
        assert_eq!(options.max_depth, 8);
    }

    #[test]
    fn rejects_unknown_keys_and_zero_depth() {
        let err = FillOptions::parse("max_dept = 8").unwrap_err();
        assert!(matches!(err, FillError::Config(_)), "{err}");

        let err = FillOptions::parse("max_depth = 0").unwrap_err();
        assert_eq!(err.to_string(), "config error: max_depth must be at least 1");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = FillOptions::load("/nonexistent/structfill.toml").unwrap_err();
        assert!(err.to_string().starts_with("config error: /nonexistent/structfill.toml"));
    }

    #[test]
    fn load_prefixes_parse_errors_with_path() {
        let path = std::env::temp_dir().join("structfill-options-invalid.toml");
        std::fs::write(&path, "max_depth = 0").unwrap();
        let path = path.to_string_lossy().into_owned();

        let err = FillOptions::load(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("config error: {path}: max_depth must be at least 1")
        );
    }
}
