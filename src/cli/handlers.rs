//! Command handlers
//!
//! Thin orchestration between the CLI surface and the library: load the
//! compose file, assemble the values document, write the chart, print a
//! report. Handlers return process exit codes; fatal errors are printed with
//! their full context chain.

use anyhow::{Context, Result};
use tracing::error;

use super::commands::CliArgs;
use super::report::{ConversionReport, ReportFormatter};
use crate::chart::ChartWriter;
use crate::compose;
use crate::values::{self, AssembleOptions};

/// Runs a full conversion. Returns the process exit code.
pub fn handle_convert(args: &CliArgs) -> i32 {
    match run_convert(args) {
        Ok(report_text) => {
            if !args.quiet {
                print!("{report_text}");
            }
            0
        }
        Err(err) => {
            error!(error = ?err, "conversion failed");
            eprintln!("Error: {err:#}");
            1
        }
    }
}

fn run_convert(args: &CliArgs) -> Result<String> {
    let compose = compose::load_compose_file(&args.compose_file).with_context(|| {
        format!(
            "Failed to load compose file {}",
            args.compose_file.display()
        )
    })?;

    let opts = AssembleOptions {
        release_name: args.release_name.clone(),
        secret_provider: args.secret_provider.into(),
        external_secret_store: args.external_secret_store.clone(),
    };
    let doc = values::assemble(&compose, &opts);

    let writer = ChartWriter::new(&args.output).with_template_dir(args.templates.clone());
    let resources = writer.planned_resources(&doc);
    let written = writer.write(&doc).with_context(|| {
        format!(
            "Failed to write chart to {}",
            args.output.display()
        )
    })?;

    let report = ConversionReport::new(args.output.clone(), &doc, &resources, written);
    ReportFormatter::new(args.format.into()).format(&report)
}
