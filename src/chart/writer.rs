//! Chart writing
//!
//! Writes the chart directory: `Chart.yaml`, the serialized values document,
//! and the template files selected by the emission plan. Filesystem failures
//! here are fatal to the run.

use super::catalog;
use crate::emission::{self, ResourceKind};
use crate::values::ValuesDocument;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors while producing the chart directory.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read template {path}: {source}")]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize values document: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Writes a chart for one values document.
pub struct ChartWriter {
    output_dir: PathBuf,
    /// Fixed-path directory overriding the built-in catalog, if any
    template_dir: Option<PathBuf>,
}

impl ChartWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            template_dir: None,
        }
    }

    pub fn with_template_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.template_dir = dir;
        self
    }

    /// Writes the chart and returns the paths written, in order.
    pub fn write(&self, doc: &ValuesDocument) -> Result<Vec<PathBuf>, ChartError> {
        let kinds = emission::plan(doc);

        create_dir(&self.output_dir)?;
        create_dir(&self.output_dir.join("templates"))?;

        let mut written = Vec::new();

        let manifest = self.template_text(catalog::CHART_MANIFEST_PATH, catalog::CHART_MANIFEST)?;
        written.push(self.write_file(catalog::CHART_MANIFEST_PATH, &manifest)?);

        let values = serde_yaml::to_string(doc)?;
        written.push(self.write_file("values.yaml", &values)?);

        for kind in &kinds {
            let text = self.template_text(kind.template_path(), catalog::builtin_template(*kind))?;
            written.push(self.write_file(kind.template_path(), &text)?);
        }

        info!(
            chart = %self.output_dir.display(),
            files = written.len(),
            "chart written"
        );
        Ok(written)
    }

    /// Resource kinds this writer would emit for the document.
    pub fn planned_resources(&self, doc: &ValuesDocument) -> Vec<ResourceKind> {
        emission::plan(doc)
    }

    fn template_text(&self, relative: &str, builtin: &'static str) -> Result<String, ChartError> {
        match &self.template_dir {
            Some(dir) => {
                let path = dir.join(relative);
                fs::read_to_string(&path).map_err(|source| ChartError::ReadTemplate { path, source })
            }
            None => Ok(builtin.to_string()),
        }
    }

    fn write_file(&self, relative: &str, contents: &str) -> Result<PathBuf, ChartError> {
        let path = self.output_dir.join(relative);
        fs::write(&path, contents).map_err(|source| ChartError::WriteFile {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "wrote chart file");
        Ok(path)
    }
}

fn create_dir(path: &Path) -> Result<(), ChartError> {
    fs::create_dir_all(path).map_err(|source| ChartError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::parse_compose;
    use crate::values::{assemble, AssembleOptions, SecretProvider};
    use tempfile::TempDir;

    fn sample_doc(provider: SecretProvider) -> ValuesDocument {
        let compose = parse_compose(
            r#"
services:
  web:
    image: nginx
    ports:
      - "80:8080"
  db:
    image: postgres:15
    environment:
      POSTGRES_PASSWORD: x
"#,
        )
        .unwrap();
        let opts = AssembleOptions {
            secret_provider: provider,
            ..AssembleOptions::default()
        };
        assemble(&compose, &opts)
    }

    #[test]
    fn test_writes_manifest_values_and_selected_templates() {
        let dir = TempDir::new().unwrap();
        let chart_dir = dir.path().join("chart");
        let doc = sample_doc(SecretProvider::Internal);

        let written = ChartWriter::new(&chart_dir).write(&doc).unwrap();

        assert!(chart_dir.join("Chart.yaml").exists());
        assert!(chart_dir.join("values.yaml").exists());
        assert!(chart_dir.join("templates/deployment.yaml").exists());
        assert!(chart_dir.join("templates/statefulset.yaml").exists());
        assert!(chart_dir.join("templates/service.yaml").exists());
        assert!(chart_dir.join("templates/ingress.yaml").exists());
        assert!(chart_dir.join("templates/secret.yaml").exists());
        assert!(!chart_dir.join("templates/externalsecret.yaml").exists());
        assert!(!chart_dir.join("templates/secretstore.yaml").exists());
        assert!(!chart_dir.join("templates/pvc.yaml").exists());
        assert_eq!(written.len(), 7);
    }

    #[test]
    fn test_external_provider_writes_external_secret_set() {
        let dir = TempDir::new().unwrap();
        let chart_dir = dir.path().join("chart");
        let doc = sample_doc(SecretProvider::External);

        ChartWriter::new(&chart_dir).write(&doc).unwrap();

        assert!(!chart_dir.join("templates/secret.yaml").exists());
        assert!(chart_dir.join("templates/externalsecret.yaml").exists());
        assert!(chart_dir.join("templates/secretstore.yaml").exists());
    }

    #[test]
    fn test_values_yaml_round_trips() {
        let dir = TempDir::new().unwrap();
        let chart_dir = dir.path().join("chart");
        ChartWriter::new(&chart_dir)
            .write(&sample_doc(SecretProvider::Internal))
            .unwrap();

        let text = fs::read_to_string(chart_dir.join("values.yaml")).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(value["secretProvider"], "internal");
        assert_eq!(value["services"]["db"]["isStateful"], true);
    }

    #[test]
    fn test_template_override_directory_wins() {
        let dir = TempDir::new().unwrap();
        let overrides = dir.path().join("overrides");
        fs::create_dir_all(overrides.join("templates")).unwrap();
        fs::write(overrides.join("Chart.yaml"), "# custom manifest\n").unwrap();
        for name in [
            "deployment.yaml",
            "statefulset.yaml",
            "service.yaml",
            "ingress.yaml",
            "secret.yaml",
        ] {
            fs::write(overrides.join("templates").join(name), "# custom\n").unwrap();
        }

        let chart_dir = dir.path().join("chart");
        ChartWriter::new(&chart_dir)
            .with_template_dir(Some(overrides))
            .write(&sample_doc(SecretProvider::Internal))
            .unwrap();

        let manifest = fs::read_to_string(chart_dir.join("Chart.yaml")).unwrap();
        assert_eq!(manifest, "# custom manifest\n");
    }

    #[test]
    fn test_missing_override_template_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = ChartWriter::new(dir.path().join("chart"))
            .with_template_dir(Some(dir.path().join("missing")))
            .write(&sample_doc(SecretProvider::Internal))
            .unwrap_err();
        assert!(matches!(err, ChartError::ReadTemplate { .. }));
    }
}
