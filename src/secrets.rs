//! Secret extraction
//!
//! Splits sensitive environment values out of plaintext env and records
//! file-backed vs generated named secrets. After extraction an env key either
//! holds a plaintext value or a `secretKeyRef` indirection, never both; the
//! plaintext lands in the service's `secrets` mapping for the emission stage.

use crate::compose::types::NamedSecret;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

/// Keywords that mark an env key as sensitive (case-insensitive containment).
pub const SENSITIVE_KEYWORDS: &[&str] = &["PASSWORD", "PASS", "SECRET", "KEY", "TOKEN"];

/// Returns true when the key's case-folded form contains a sensitive keyword.
pub fn is_sensitive_key(key: &str) -> bool {
    let upper = key.to_uppercase();
    SENSITIVE_KEYWORDS
        .iter()
        .any(|keyword| upper.contains(keyword))
}

/// Deterministic name of the per-service secret resource.
pub fn secret_resource_name(release_name: &str, service_name: &str) -> String {
    format!("{release_name}-{service_name}-secret")
}

/// Indirection reference replacing a redacted env value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretKeyRef {
    pub name: String,
    pub key: String,
}

/// Value of one emitted env entry: plaintext or a secret indirection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EnvValue {
    Plain(String),
    Secret {
        #[serde(rename = "secretKeyRef")]
        secret_key_ref: SecretKeyRef,
    },
}

/// Where a named secret's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretOrigin {
    /// Backed by a source file named in the compose document
    File,
    /// No source file; the deployment has to generate a value
    Generated,
}

/// A named secret mounted by a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretMount {
    pub name: String,
    pub origin: SecretOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

/// Outcome of redacting a service's environment.
#[derive(Debug, Clone, Default)]
pub struct ExtractedSecrets {
    /// Env with sensitive values replaced by indirection references
    pub env: IndexMap<String, EnvValue>,
    /// Plaintext values destined for secret storage, keyed by env key
    pub secrets: IndexMap<String, String>,
}

/// Moves every sensitive env value into `secrets` and replaces its env entry
/// with a reference into `<releaseName>-<serviceName>-secret`.
pub fn extract_env_secrets(
    release_name: &str,
    service_name: &str,
    env: IndexMap<String, String>,
) -> ExtractedSecrets {
    let resource = secret_resource_name(release_name, service_name);
    let mut extracted = ExtractedSecrets::default();

    for (key, value) in env {
        if is_sensitive_key(&key) {
            debug!(service = service_name, key = %key, "redacting sensitive env value");
            extracted.env.insert(
                key.clone(),
                EnvValue::Secret {
                    secret_key_ref: SecretKeyRef {
                        name: resource.clone(),
                        key: key.clone(),
                    },
                },
            );
            extracted.secrets.insert(key, value);
        } else {
            extracted.env.insert(key, EnvValue::Plain(value));
        }
    }
    extracted
}

/// Resolves a service's named-secret references against the top-level
/// `secrets:` section, tagging each mount as file-backed or generated.
/// References to undeclared secrets are skipped with a warning.
pub fn collect_secret_mounts(
    service_name: &str,
    refs: &[String],
    declared: &IndexMap<String, NamedSecret>,
) -> Vec<SecretMount> {
    let mut mounts = Vec::new();
    for name in refs {
        match declared.get(name) {
            Some(NamedSecret { file: Some(path) }) => mounts.push(SecretMount {
                name: name.clone(),
                origin: SecretOrigin::File,
                source_file: Some(path.clone()),
            }),
            Some(NamedSecret { file: None }) => mounts.push(SecretMount {
                name: name.clone(),
                origin: SecretOrigin::Generated,
                source_file: None,
            }),
            None => {
                warn!(
                    service = service_name,
                    secret = %name,
                    "service references undeclared secret, skipped"
                );
            }
        }
    }
    mounts
}
