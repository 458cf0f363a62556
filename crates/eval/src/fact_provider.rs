//! Fact provider trait and implementations.
//!
//! A `FactProvider` is the symptom-collection boundary: it asynchronously
//! delivers the observation document for one diagnostic session. The
//! engine only ever sees the assembled Fact; provider failures stop here.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Observation document: field name to raw value.
pub type Observations = serde_json::Map<String, serde_json::Value>;

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Errors that can occur when a fact provider fetches observations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactProviderError {
    /// The source could not be read.
    #[error("error reading '{source_name}': {message}")]
    Read {
        source_name: String,
        message: String,
    },

    /// The source was read but is not valid JSON.
    #[error("invalid JSON in '{source_name}': {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// The source is valid JSON but not an object.
    #[error("'{source_name}' must contain a JSON object of observations")]
    NotAnObject { source_name: String },

    /// A provider-specific error occurred.
    #[error("fact provider error: {0}")]
    Provider(String),
}

// ──────────────────────────────────────────────
// Trait
// ──────────────────────────────────────────────

/// Asynchronous provider of observations for one diagnostic session.
#[async_trait]
pub trait FactProvider: Send + Sync {
    /// Provide the observation document.
    ///
    /// Fields the collection sequence never reached should simply be
    /// absent; they are assembled as `unset`.
    async fn provide(&self) -> Result<Observations, FactProviderError>;
}

// ──────────────────────────────────────────────
// StaticFactProvider
// ──────────────────────────────────────────────

/// A fact provider that returns a fixed set of observations.
///
/// Useful for testing and for callers that already hold every answer.
pub struct StaticFactProvider {
    observations: Observations,
}

impl StaticFactProvider {
    pub fn new(observations: Observations) -> Self {
        Self { observations }
    }

    pub fn empty() -> Self {
        Self {
            observations: Observations::new(),
        }
    }
}

#[async_trait]
impl FactProvider for StaticFactProvider {
    async fn provide(&self) -> Result<Observations, FactProviderError> {
        Ok(self.observations.clone())
    }
}

// ──────────────────────────────────────────────
// JsonFactProvider
// ──────────────────────────────────────────────

/// Where a [`JsonFactProvider`] reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonSource {
    File(PathBuf),
    Stdin,
}

/// Reads an observation document from a JSON file or standard input.
pub struct JsonFactProvider {
    source: JsonSource,
}

impl JsonFactProvider {
    pub fn new(source: JsonSource) -> Self {
        Self { source }
    }

    /// `-` selects standard input, anything else is a file path.
    pub fn from_arg(arg: &Path) -> Self {
        if arg == Path::new("-") {
            Self::new(JsonSource::Stdin)
        } else {
            Self::new(JsonSource::File(arg.to_path_buf()))
        }
    }

    fn source_name(&self) -> String {
        match &self.source {
            JsonSource::File(path) => path.display().to_string(),
            JsonSource::Stdin => "<stdin>".to_string(),
        }
    }

    async fn read(&self) -> Result<String, FactProviderError> {
        let result = match &self.source {
            JsonSource::File(path) => tokio::fs::read_to_string(path).await,
            JsonSource::Stdin => {
                let mut buf = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut buf)
                    .await
                    .map(|_| buf)
            }
        };
        result.map_err(|e| FactProviderError::Read {
            source_name: self.source_name(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl FactProvider for JsonFactProvider {
    async fn provide(&self) -> Result<Observations, FactProviderError> {
        let text = self.read().await?;
        debug!(source = %self.source_name(), bytes = text.len(), "read observations");
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| FactProviderError::Parse {
                source_name: self.source_name(),
                message: e.to_string(),
            })?;
        match value {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(FactProviderError::NotAnObject {
                source_name: self.source_name(),
            }),
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn static_provider_returns_observations() {
        let mut obs = Observations::new();
        obs.insert("classifier_label".to_string(), "Healthy".into());
        obs.insert("stem_sticky".to_string(), "yes".into());

        let provider = StaticFactProvider::new(obs.clone());
        let result = provider.provide().await.unwrap();
        assert_eq!(result, obs);
    }

    #[tokio::test]
    async fn empty_provider_returns_nothing() {
        let result = StaticFactProvider::empty().provide().await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn json_provider_reads_file() {
        let file = temp_file(r#"{"classifier_label": "Yam Anthracnose"}"#);
        let result = JsonFactProvider::from_arg(file.path())
            .provide()
            .await
            .unwrap();
        assert_eq!(result["classifier_label"], "Yam Anthracnose");
    }

    #[tokio::test]
    async fn json_provider_missing_file() {
        let provider = JsonFactProvider::from_arg(Path::new("/nonexistent/tuberdx/facts.json"));
        let err = provider.provide().await.unwrap_err();
        assert!(matches!(err, FactProviderError::Read { .. }));
    }

    #[tokio::test]
    async fn json_provider_rejects_invalid_json() {
        let file = temp_file("{not json");
        let err = JsonFactProvider::from_arg(file.path())
            .provide()
            .await
            .unwrap_err();
        assert!(matches!(err, FactProviderError::Parse { .. }));
    }

    #[tokio::test]
    async fn json_provider_rejects_non_object() {
        let file = temp_file(r#"["Healthy"]"#);
        let err = JsonFactProvider::from_arg(file.path())
            .provide()
            .await
            .unwrap_err();
        assert!(matches!(err, FactProviderError::NotAnObject { .. }));
    }

    #[test]
    fn dash_selects_stdin() {
        assert_eq!(
            JsonFactProvider::from_arg(Path::new("-")).source,
            JsonSource::Stdin
        );
    }

    #[test]
    fn error_display() {
        let err = FactProviderError::Provider("form abandoned".to_string());
        assert_eq!(err.to_string(), "fact provider error: form abandoned");
    }
}
