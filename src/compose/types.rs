//! Raw compose document schema
//!
//! These types mirror the shapes a compose file actually uses in the wild:
//! most service fields accept more than one shorthand encoding. Each
//! shorthand is modeled as an explicit `#[serde(untagged)]` variant with its
//! own normalization path in [`crate::normalize`], instead of runtime type
//! inspection of a generic value tree.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

/// Top-level compose document, as loaded. Unknown sections are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ComposeFile {
    #[serde(default)]
    pub services: IndexMap<String, RawService>,

    /// Top-level `secrets:` section naming file-backed secret sources.
    #[serde(default)]
    pub secrets: IndexMap<String, NamedSecret>,
}

/// One service entry with fields still in their source shorthand.
/// Fields we do not translate (depends_on, networks, ...) are dropped here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawService {
    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub ports: Vec<PortSpec>,

    #[serde(default)]
    pub environment: Option<EnvSpec>,

    #[serde(default)]
    pub volumes: Vec<VolumeSpec>,

    /// References into the top-level `secrets:` section.
    #[serde(default)]
    pub secrets: Vec<String>,

    #[serde(default)]
    pub labels: Option<LabelSpec>,
}

/// A single `ports:` entry in any of the accepted encodings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PortSpec {
    /// `- 8080`
    Number(u16),
    /// `- "8080"` or `- "80:8080"`
    Shorthand(String),
    /// Long form: `- { target: 8080, published: 80 }`
    Detailed {
        target: u16,
        #[serde(default)]
        published: Option<u16>,
    },
    /// Anything else; skipped with a warning during normalization.
    Other(Value),
}

/// The `environment:` field: list of `KEY=VALUE` strings or a mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnvSpec {
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

/// A single `volumes:` entry. Only string forms are translated.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VolumeSpec {
    Path(String),
    /// Long-form volume objects; skipped with a warning during normalization.
    Other(Value),
}

/// The `labels:` field: list of `key=value` strings or a mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LabelSpec {
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

/// One entry of the top-level `secrets:` section.
///
/// A declared secret with a `file:` source is mounted from an existing file;
/// one without a source has to be generated by the deployment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedSecret {
    #[serde(default)]
    pub file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_spec_accepts_all_shorthands() {
        let yaml = r#"
- 8080
- "9090"
- "80:8080"
- target: 5432
  published: 15432
"#;
        let specs: Vec<PortSpec> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(specs.len(), 4);
        assert!(matches!(specs[0], PortSpec::Number(8080)));
        assert!(matches!(specs[1], PortSpec::Shorthand(_)));
        assert!(matches!(specs[2], PortSpec::Shorthand(_)));
        assert!(matches!(
            specs[3],
            PortSpec::Detailed {
                target: 5432,
                published: Some(15432)
            }
        ));
    }

    #[test]
    fn test_env_spec_accepts_list_and_map() {
        let list: EnvSpec = serde_yaml::from_str("- A=1\n- B=2\n").unwrap();
        assert!(matches!(list, EnvSpec::List(ref v) if v.len() == 2));

        let map: EnvSpec = serde_yaml::from_str("A: 1\nB: two\n").unwrap();
        assert!(matches!(map, EnvSpec::Map(ref m) if m.len() == 2));
    }

    #[test]
    fn test_unknown_service_fields_are_ignored() {
        let yaml = r#"
image: nginx
restart: always
depends_on:
  - db
"#;
        let svc: RawService = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(svc.image, "nginx");
        assert!(svc.ports.is_empty());
    }
}
