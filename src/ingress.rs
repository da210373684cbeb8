//! Ingress detection
//!
//! Infers whether a service should get an externally reachable route: a port
//! binding on a well-known web port produces a placeholder rule, and labels
//! under a recognized ingress-controller namespace become annotations. No
//! signal means no `ingress` field at all, which is what keeps the template
//! from rendering.

use crate::normalize::PortBinding;
use indexmap::IndexMap;
use serde::Serialize;

/// Ports that mark a service as web-facing. A binding triggers a rule when
/// either its container port or its published port is one of these; the rule
/// always routes to the container port.
pub const WEB_PORTS: &[u16] = &[80, 443];

/// Label namespaces recognized as ingress-controller annotations.
pub const INGRESS_ANNOTATION_PREFIXES: &[&str] = &[
    "nginx.ingress.kubernetes.io/",
    "traefik.ingress.kubernetes.io/",
    "ingress.kubernetes.io/",
    "kubernetes.io/ingress.",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngressRule {
    /// Placeholder host, expected to be overridden by the operator
    pub host: String,
    pub path: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct IngressSpec {
    pub annotations: IndexMap<String, String>,
    pub rules: Vec<IngressRule>,
    /// Empty by default; operators fill this in post-generation
    pub tls: Vec<serde_yaml::Value>,
}

/// Builds an [`IngressSpec`] for a service, or `None` when neither a web port
/// nor a recognized annotation was found.
pub fn detect_ingress(
    service_name: &str,
    ports: &[PortBinding],
    labels: &IndexMap<String, String>,
) -> Option<IngressSpec> {
    let mut spec = IngressSpec::default();

    for binding in ports {
        let is_web = WEB_PORTS.contains(&binding.container_port)
            || binding
                .published_port
                .is_some_and(|published| WEB_PORTS.contains(&published));
        if is_web {
            spec.rules.push(IngressRule {
                host: format!("{service_name}.local"),
                path: "/".to_string(),
                port: binding.container_port,
            });
        }
    }

    for (key, value) in labels {
        if INGRESS_ANNOTATION_PREFIXES
            .iter()
            .any(|prefix| key.starts_with(prefix))
        {
            spec.annotations.insert(key.clone(), value.clone());
        }
    }

    if spec.rules.is_empty() && spec.annotations.is_empty() {
        None
    } else {
        Some(spec)
    }
}
