//! Conversion report formatting
//!
//! After a successful run the handler prints a short report: where the chart
//! landed, what was converted, and which resources were selected. Human
//! output is the default; JSON and YAML are for scripting.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::emission::ResourceKind;
use crate::values::{SecretProvider, ValuesDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Human,
    Json,
    Yaml,
}

/// Summary of one conversion run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    pub chart_dir: PathBuf,
    pub services: usize,
    pub stateful_services: usize,
    pub secret_provider: SecretProvider,
    pub resources: Vec<String>,
    pub files_written: Vec<PathBuf>,
}

impl ConversionReport {
    pub fn new(
        chart_dir: PathBuf,
        doc: &ValuesDocument,
        resources: &[ResourceKind],
        files_written: Vec<PathBuf>,
    ) -> Self {
        Self {
            chart_dir,
            services: doc.services.len(),
            stateful_services: doc
                .services
                .values()
                .filter(|svc| svc.is_stateful)
                .count(),
            secret_provider: doc.secret_provider,
            resources: resources.iter().map(ToString::to_string).collect(),
            files_written,
        }
    }
}

pub struct ReportFormatter {
    format: ReportFormat,
}

impl ReportFormatter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, report: &ConversionReport) -> Result<String> {
        match self.format {
            ReportFormat::Human => Ok(format_human(report)),
            ReportFormat::Json => {
                serde_json::to_string_pretty(report).context("Failed to serialize report as JSON")
            }
            ReportFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize report as YAML")
            }
        }
    }
}

fn format_human(report: &ConversionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Helm chart generated in {}",
        report.chart_dir.display()
    );
    let _ = writeln!(
        out,
        "  services:  {} ({} stateful)",
        report.services, report.stateful_services
    );
    let _ = writeln!(out, "  secrets:   {:?} provider", report.secret_provider);
    let _ = writeln!(out, "  resources: {}", report.resources.join(", "));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::parse_compose;
    use crate::values::{assemble, AssembleOptions};

    fn sample_report() -> ConversionReport {
        let doc = assemble(
            &parse_compose("services:\n  db:\n    image: postgres\n").unwrap(),
            &AssembleOptions::default(),
        );
        let resources = crate::emission::plan(&doc);
        ConversionReport::new(PathBuf::from("/tmp/chart"), &doc, &resources, vec![])
    }

    #[test]
    fn test_human_report_mentions_chart_dir_and_counts() {
        let text = ReportFormatter::new(ReportFormat::Human)
            .format(&sample_report())
            .unwrap();
        assert!(text.contains("/tmp/chart"));
        assert!(text.contains("1 stateful"));
        assert!(text.contains("StatefulSet"));
    }

    #[test]
    fn test_json_report_is_valid_json() {
        let text = ReportFormatter::new(ReportFormat::Json)
            .format(&sample_report())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["services"], 1);
        assert_eq!(value["statefulServices"], 1);
        assert_eq!(value["secretProvider"], "internal");
    }

    #[test]
    fn test_yaml_report_is_valid_yaml() {
        let text = ReportFormatter::new(ReportFormat::Yaml)
            .format(&sample_report())
            .unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(value["chartDir"], "/tmp/chart");
    }
}
