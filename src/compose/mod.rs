//! Compose document loading and raw schema types

pub mod loader;
pub mod types;

pub use loader::{load_compose_file, parse_compose, ComposeError};
pub use types::{ComposeFile, EnvSpec, LabelSpec, NamedSecret, PortSpec, RawService, VolumeSpec};
