//! compose2helm - compile Docker Compose files into parameterized Helm charts
//!
//! The core of the tool is a compose-to-values compiler: it normalizes the
//! loosely-structured service definitions of a compose document into one
//! canonical values document, then decides which resource templates the
//! generated chart needs. Template rendering itself is left to Helm; this
//! tool only produces the values and selects the files.
//!
//! # Pipeline
//!
//! 1. [`compose`]: load the document into raw service records
//! 2. [`normalize`]: fold the port/env/volume shorthands into typed records
//! 3. [`registry`]: classify stateful database workloads and merge defaults
//! 4. [`secrets`]: redact sensitive env values into secret references
//! 5. [`ingress`]: infer externally reachable routes
//! 6. [`values`]: assemble the canonical values document
//! 7. [`emission`] + [`chart`]: select and write the template catalog
//!
//! # Example
//!
//! ```
//! use compose2helm::compose::parse_compose;
//! use compose2helm::values::{assemble, AssembleOptions};
//!
//! let compose = parse_compose("services:\n  db:\n    image: postgres:15\n").unwrap();
//! let doc = assemble(&compose, &AssembleOptions::default());
//! assert!(doc.services["db"].is_stateful);
//! ```

pub mod chart;
pub mod cli;
pub mod compose;
pub mod emission;
pub mod ingress;
pub mod normalize;
pub mod registry;
pub mod secrets;
pub mod values;

pub use chart::{ChartError, ChartWriter};
pub use compose::{load_compose_file, parse_compose, ComposeError, ComposeFile};
pub use emission::ResourceKind;
pub use values::{assemble, AssembleOptions, SecretProvider, ServiceValues, ValuesDocument};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_compose2helm() {
        assert_eq!(NAME, "compose2helm");
    }
}
