use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::values::SecretProvider;

/// Compile a Docker Compose file into a parameterized Helm chart
#[derive(Parser, Debug)]
#[command(
    name = "compose2helm",
    about = "Compile a Docker Compose file into a parameterized Helm chart",
    version,
    long_about = "compose2helm reads a docker-compose file, normalizes its service \
                  definitions into a canonical values.yaml, redacts sensitive environment \
                  values into secret references, and writes a Helm chart containing only \
                  the resource templates the services actually need."
)]
pub struct CliArgs {
    #[arg(value_name = "COMPOSE_FILE", help = "Path to the docker-compose file")]
    pub compose_file: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        default_value = "./chart",
        help = "Output directory for the generated chart"
    )]
    pub output: PathBuf,

    #[arg(
        long,
        value_name = "NAME",
        default_value = "release",
        help = "Release name used to derive secret resource names"
    )]
    pub release_name: String,

    #[arg(
        long,
        value_enum,
        default_value = "internal",
        help = "Whether secret values are rendered inline or resolved by an external store"
    )]
    pub secret_provider: SecretProviderArg,

    #[arg(
        long,
        value_name = "NAME",
        default_value = "vault-backend",
        help = "Name of the external secret store referenced by ExternalSecret resources"
    )]
    pub external_secret_store: String,

    #[arg(
        long,
        value_name = "DIR",
        help = "Directory of template files overriding the built-in catalog"
    )]
    pub templates: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Conversion report format"
    )]
    pub format: ReportFormatArg,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Increase verbosity")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretProviderArg {
    Internal,
    External,
}

impl From<SecretProviderArg> for SecretProvider {
    fn from(arg: SecretProviderArg) -> Self {
        match arg {
            SecretProviderArg::Internal => SecretProvider::Internal,
            SecretProviderArg::External => SecretProvider::External,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormatArg {
    Human,
    Json,
    Yaml,
}

impl From<ReportFormatArg> for super::report::ReportFormat {
    fn from(arg: ReportFormatArg) -> Self {
        match arg {
            ReportFormatArg::Human => super::report::ReportFormat::Human,
            ReportFormatArg::Json => super::report::ReportFormat::Json,
            ReportFormatArg::Yaml => super::report::ReportFormat::Yaml,
        }
    }
}
