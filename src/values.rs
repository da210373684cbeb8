//! Canonical values document and the per-service assembler
//!
//! This module owns the output schema consumed by the template stage and the
//! deterministic merge that builds it. Override precedence per service:
//! explicit compose declaration > database engine defaults > structural
//! defaults. Each assembly stage only fills fields an earlier stage left
//! unset.

use crate::compose::types::{ComposeFile, RawService};
use crate::ingress::{self, IngressSpec};
use crate::normalize::{self, PortBinding, VolumeMount};
use crate::registry;
use crate::secrets::{self, EnvValue, SecretMount};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

/// Where secret values live in the generated chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretProvider {
    /// Value-bearing Secret resources rendered inline
    Internal,
    /// ExternalSecret resources resolved by an external store at deploy time
    External,
}

/// Assembly-time knobs taken from the CLI.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Release name baked into derived secret resource names
    pub release_name: String,
    pub secret_provider: SecretProvider,
    pub external_secret_store: String,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            release_name: "release".to_string(),
            secret_provider: SecretProvider::Internal,
            external_secret_store: "vault-backend".to_string(),
        }
    }
}

/// Canonical per-service values. Immutable once assembled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceValues {
    pub image: String,
    pub is_stateful: bool,
    pub ports: Vec<PortBinding>,
    pub env: IndexMap<String, EnvValue>,
    pub volume_mounts: Vec<VolumeMount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_size: Option<String>,
    /// Plaintext values destined for secret storage, never rendered as env
    pub secrets: IndexMap<String, String>,
    pub secret_mounts: Vec<SecretMount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress: Option<IngressSpec>,
}

/// Root values document handed to the template stage.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuesDocument {
    pub secret_provider: SecretProvider,
    pub external_secret_store: String,
    /// Opaque provider block, edited by the operator post-generation
    pub external_secret_config: serde_yaml::Mapping,
    pub services: IndexMap<String, ServiceValues>,
}

/// Assembles the full values document, preserving source declaration order.
pub fn assemble(compose: &ComposeFile, opts: &AssembleOptions) -> ValuesDocument {
    let mut services = IndexMap::new();
    for (name, raw) in &compose.services {
        services.insert(name.clone(), assemble_service(name, raw, compose, opts));
    }
    info!(services = services.len(), "assembled values document");

    ValuesDocument {
        secret_provider: opts.secret_provider,
        external_secret_store: opts.external_secret_store.clone(),
        external_secret_config: serde_yaml::Mapping::new(),
        services,
    }
}

/// Runs one service through normalize -> classify -> extract secrets ->
/// detect ingress.
fn assemble_service(
    name: &str,
    raw: &RawService,
    compose: &ComposeFile,
    opts: &AssembleOptions,
) -> ServiceValues {
    let ports = normalize::normalize_ports(name, &raw.ports);
    let mut env = normalize::normalize_env(name, raw.environment.as_ref());
    let volumes = normalize::normalize_volumes(name, &raw.volumes);
    let labels = normalize::normalize_labels(name, raw.labels.as_ref());

    let mut storage_size = volumes.storage_size;
    let engine = registry::classify_image(&raw.image);
    if let Some(engine) = engine {
        debug!(service = name, engine = engine.name, "classified as stateful");
        engine.apply(&mut env, &mut storage_size);
    }

    let extracted = secrets::extract_env_secrets(&opts.release_name, name, env);
    let secret_mounts = secrets::collect_secret_mounts(name, &raw.secrets, &compose.secrets);
    let ingress = ingress::detect_ingress(name, &ports, &labels);

    ServiceValues {
        image: raw.image.clone(),
        is_stateful: engine.is_some(),
        ports,
        env: extracted.env,
        volume_mounts: volumes.mounts,
        storage_size,
        secrets: extracted.secrets,
        secret_mounts,
        ingress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::parse_compose;
    use crate::secrets::SecretKeyRef;

    fn assemble_str(text: &str) -> ValuesDocument {
        assemble(&parse_compose(text).unwrap(), &AssembleOptions::default())
    }

    #[test]
    fn test_postgres_scenario() {
        let doc = assemble_str(
            r#"
services:
  db:
    image: postgres:15
    environment:
      POSTGRES_PASSWORD: x
"#,
        );
        let db = &doc.services["db"];
        assert!(db.is_stateful);
        assert_eq!(db.storage_size.as_deref(), Some("5Gi"));
        assert_eq!(db.secrets["POSTGRES_PASSWORD"], "x");
        assert_eq!(
            db.env["POSTGRES_PASSWORD"],
            EnvValue::Secret {
                secret_key_ref: SecretKeyRef {
                    name: "release-db-secret".to_string(),
                    key: "POSTGRES_PASSWORD".to_string(),
                },
            }
        );
        // Engine defaults landed and went through extraction too
        assert_eq!(db.env["POSTGRES_DB"], EnvValue::Plain("appdb".to_string()));
        assert!(db.secrets.contains_key("POSTGRES_USER") || db.env.contains_key("POSTGRES_USER"));
    }

    #[test]
    fn test_nginx_scenario() {
        let doc = assemble_str(
            r#"
services:
  web:
    image: nginx
    ports:
      - "80:8080"
"#,
        );
        let web = &doc.services["web"];
        assert!(!web.is_stateful);
        assert_eq!(
            web.ports,
            [PortBinding {
                container_port: 8080,
                published_port: Some(80),
            }]
        );
        let ingress = web.ingress.as_ref().unwrap();
        assert_eq!(ingress.rules.len(), 1);
        assert_eq!(ingress.rules[0].host, "web.local");
        assert_eq!(ingress.rules[0].path, "/");
        assert_eq!(ingress.rules[0].port, 8080);
    }

    #[test]
    fn test_explicit_env_beats_engine_default() {
        let doc = assemble_str(
            r#"
services:
  db:
    image: mysql:8
    environment:
      MYSQL_DATABASE: orders
"#,
        );
        let db = &doc.services["db"];
        assert_eq!(db.env["MYSQL_DATABASE"], EnvValue::Plain("orders".to_string()));
        // Default credentials still arrive and are redacted
        assert_eq!(db.secrets["MYSQL_ROOT_PASSWORD"], "changeme");
    }

    #[test]
    fn test_volume_storage_beats_engine_storage() {
        let doc = assemble_str(
            r#"
services:
  db:
    image: postgres:15
    volumes:
      - ./data:/var/lib/postgresql/data
"#,
        );
        // First volume declaration set 1Gi; the engine default must not win.
        assert_eq!(doc.services["db"].storage_size.as_deref(), Some("1Gi"));
    }

    #[test]
    fn test_stateless_service_without_signals() {
        let doc = assemble_str(
            r#"
services:
  worker:
    image: ghcr.io/acme/worker:2
"#,
        );
        let worker = &doc.services["worker"];
        assert!(!worker.is_stateful);
        assert!(worker.ports.is_empty());
        assert!(worker.ingress.is_none());
        assert!(worker.secrets.is_empty());
        assert_eq!(worker.storage_size, None);
    }

    #[test]
    fn test_service_order_survives_assembly() {
        let doc = assemble_str(
            r#"
services:
  frontend:
    image: nginx
  backend:
    image: acme/api
  db:
    image: postgres
"#,
        );
        let names: Vec<&String> = doc.services.keys().collect();
        assert_eq!(names, ["frontend", "backend", "db"]);
    }

    #[test]
    fn test_release_name_flows_into_secret_refs() {
        let compose = parse_compose(
            r#"
services:
  db:
    image: redis
    environment:
      REDIS_PASSWORD: hunter2
"#,
        )
        .unwrap();
        let opts = AssembleOptions {
            release_name: "prod".to_string(),
            ..AssembleOptions::default()
        };
        let doc = assemble(&compose, &opts);
        match &doc.services["db"].env["REDIS_PASSWORD"] {
            EnvValue::Secret { secret_key_ref } => {
                assert_eq!(secret_key_ref.name, "prod-db-secret");
            }
            other => panic!("expected secret ref, got {other:?}"),
        }
    }

    #[test]
    fn test_values_document_serializes_with_camel_case_keys() {
        let doc = assemble_str(
            r#"
services:
  db:
    image: postgres
"#,
        );
        let yaml = serde_yaml::to_string(&doc).unwrap();
        assert!(yaml.contains("secretProvider: internal"));
        assert!(yaml.contains("externalSecretStore: vault-backend"));
        assert!(yaml.contains("isStateful: true"));
        assert!(yaml.contains("storageSize: 5Gi"));
    }
}
