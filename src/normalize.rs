//! Field normalization
//!
//! Turns the shorthand encodings accepted by compose (`ports`, `environment`,
//! `volumes`, `labels`) into canonical typed records. A token that cannot be
//! parsed is dropped with a warning and the rest of the service keeps
//! converting; only structural failures abort the run.

use crate::compose::types::{EnvSpec, LabelSpec, PortSpec, VolumeSpec};
use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;
use tracing::warn;

/// Default storage size established by the first host-path volume.
pub const DEFAULT_VOLUME_STORAGE: &str = "1Gi";

/// A normalized port declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortBinding {
    pub container_port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_port: Option<u16>,
}

/// A normalized container mount point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub mount_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_path: Option<String>,
}

/// Result of normalizing a service's `volumes:` list.
#[derive(Debug, Clone, Default)]
pub struct NormalizedVolumes {
    pub mounts: Vec<VolumeMount>,
    /// Set once by the first two-part declaration, never overwritten.
    pub storage_size: Option<String>,
}

/// Normalizes every `ports:` entry of a service. Unparseable entries are
/// skipped.
pub fn normalize_ports(service: &str, specs: &[PortSpec]) -> Vec<PortBinding> {
    let mut bindings = Vec::new();
    for spec in specs {
        match spec {
            PortSpec::Number(n) => match valid_port(*n) {
                Some(port) => bindings.push(PortBinding {
                    container_port: port,
                    published_port: None,
                }),
                None => warn!(service, port = n, "port out of range, entry skipped"),
            },
            PortSpec::Shorthand(text) => match parse_port_shorthand(text) {
                Some(binding) => bindings.push(binding),
                None => warn!(service, entry = %text, "unparseable port entry skipped"),
            },
            PortSpec::Detailed { target, published } => match valid_port(*target) {
                Some(port) => bindings.push(PortBinding {
                    container_port: port,
                    published_port: published.and_then(valid_port),
                }),
                None => warn!(service, port = target, "port out of range, entry skipped"),
            },
            PortSpec::Other(value) => {
                warn!(service, ?value, "unsupported port entry skipped");
            }
        }
    }
    bindings
}

/// Parses `"container"` or `"host:container"`.
fn parse_port_shorthand(text: &str) -> Option<PortBinding> {
    let mut parts = text.split(':');
    let first = parts.next()?;
    match (parts.next(), parts.next()) {
        (None, _) => Some(PortBinding {
            container_port: parse_port_token(first)?,
            published_port: None,
        }),
        (Some(second), None) => Some(PortBinding {
            container_port: parse_port_token(second)?,
            published_port: Some(parse_port_token(first)?),
        }),
        // `ip:host:container` and beyond is not translated
        (Some(_), Some(_)) => None,
    }
}

fn parse_port_token(token: &str) -> Option<u16> {
    token.trim().parse::<u16>().ok().and_then(valid_port)
}

fn valid_port(port: u16) -> Option<u16> {
    (port >= 1).then_some(port)
}

/// Normalizes the `environment:` field into an ordered key/value mapping.
/// List entries are split on the first `=`; later duplicates override earlier
/// ones.
pub fn normalize_env(service: &str, spec: Option<&EnvSpec>) -> IndexMap<String, String> {
    let mut env = IndexMap::new();
    match spec {
        None => {}
        Some(EnvSpec::List(entries)) => {
            for entry in entries {
                let Some(text) = entry.as_str() else {
                    warn!(service, ?entry, "non-string environment entry skipped");
                    continue;
                };
                match text.split_once('=') {
                    Some((key, value)) => {
                        env.insert(key.to_string(), value.to_string());
                    }
                    None => warn!(service, entry = %text, "environment entry without '=' skipped"),
                }
            }
        }
        Some(EnvSpec::Map(entries)) => {
            for (key, value) in entries {
                match scalar_to_string(value) {
                    Some(text) => {
                        env.insert(key.clone(), text);
                    }
                    None => warn!(service, key = %key, "non-scalar environment value skipped"),
                }
            }
        }
    }
    env
}

/// Normalizes the `volumes:` list. A two-part `host:container` entry mounts
/// `container` with the final segment of `host` as subPath and establishes the
/// service's default storage size on first occurrence; a bare path mounts
/// without subPath and implies no storage.
pub fn normalize_volumes(service: &str, specs: &[VolumeSpec]) -> NormalizedVolumes {
    let mut normalized = NormalizedVolumes::default();
    for spec in specs {
        match spec {
            VolumeSpec::Path(text) => {
                let parts: Vec<&str> = text.split(':').collect();
                match parts.as_slice() {
                    [host, container] => {
                        normalized.mounts.push(VolumeMount {
                            mount_path: (*container).to_string(),
                            sub_path: Some(final_path_segment(host)),
                        });
                        if normalized.storage_size.is_none() {
                            normalized.storage_size = Some(DEFAULT_VOLUME_STORAGE.to_string());
                        }
                    }
                    [path] => {
                        normalized.mounts.push(VolumeMount {
                            mount_path: (*path).to_string(),
                            sub_path: None,
                        });
                    }
                    _ => warn!(service, entry = %text, "unparseable volume entry skipped"),
                }
            }
            VolumeSpec::Other(value) => {
                warn!(service, ?value, "unsupported volume entry skipped");
            }
        }
    }
    normalized
}

fn final_path_segment(path: &str) -> String {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
        .to_string()
}

/// Normalizes the `labels:` field into a key/value mapping.
pub fn normalize_labels(service: &str, spec: Option<&LabelSpec>) -> IndexMap<String, String> {
    let mut labels = IndexMap::new();
    match spec {
        None => {}
        Some(LabelSpec::List(entries)) => {
            for entry in entries {
                let Some(text) = entry.as_str() else {
                    warn!(service, ?entry, "non-string label entry skipped");
                    continue;
                };
                match text.split_once('=') {
                    Some((key, value)) => {
                        labels.insert(key.to_string(), value.to_string());
                    }
                    None => warn!(service, entry = %text, "label entry without '=' skipped"),
                }
            }
        }
        Some(LabelSpec::Map(entries)) => {
            for (key, value) in entries {
                match scalar_to_string(value) {
                    Some(text) => {
                        labels.insert(key.clone(), text);
                    }
                    None => warn!(service, key = %key, "non-scalar label value skipped"),
                }
            }
        }
    }
    labels
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}
