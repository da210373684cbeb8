//! Resource-emission policy
//!
//! The decision table that maps assembled service values to the resource
//! kinds the chart needs, evaluated once per service plus once per document
//! for the shared SecretStore. The chart writer turns the selected kinds into
//! template files.

use crate::values::{SecretProvider, ServiceValues, ValuesDocument};
use std::fmt;
use tracing::debug;

/// Target resource kinds the template catalog can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Deployment,
    StatefulSet,
    Service,
    PersistentVolumeClaim,
    Ingress,
    Secret,
    ExternalSecret,
    SecretStore,
}

impl ResourceKind {
    /// Every kind, in catalog order. Emission plans keep this order so the
    /// written file set is deterministic.
    pub const ALL: &'static [ResourceKind] = &[
        ResourceKind::Deployment,
        ResourceKind::StatefulSet,
        ResourceKind::Service,
        ResourceKind::PersistentVolumeClaim,
        ResourceKind::Ingress,
        ResourceKind::Secret,
        ResourceKind::ExternalSecret,
        ResourceKind::SecretStore,
    ];

    /// Relative path of this kind's template inside the chart.
    pub fn template_path(&self) -> &'static str {
        match self {
            ResourceKind::Deployment => "templates/deployment.yaml",
            ResourceKind::StatefulSet => "templates/statefulset.yaml",
            ResourceKind::Service => "templates/service.yaml",
            ResourceKind::PersistentVolumeClaim => "templates/pvc.yaml",
            ResourceKind::Ingress => "templates/ingress.yaml",
            ResourceKind::Secret => "templates/secret.yaml",
            ResourceKind::ExternalSecret => "templates/externalsecret.yaml",
            ResourceKind::SecretStore => "templates/secretstore.yaml",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Deployment => "Deployment",
            ResourceKind::StatefulSet => "StatefulSet",
            ResourceKind::Service => "Service",
            ResourceKind::PersistentVolumeClaim => "PersistentVolumeClaim",
            ResourceKind::Ingress => "Ingress",
            ResourceKind::Secret => "Secret",
            ResourceKind::ExternalSecret => "ExternalSecret",
            ResourceKind::SecretStore => "SecretStore",
        };
        f.write_str(name)
    }
}

/// Resource kinds one service requires under the given secret provider.
/// SecretStore is document-level and not part of this table.
pub fn service_resources(service: &ServiceValues, provider: SecretProvider) -> Vec<ResourceKind> {
    let mut kinds = Vec::new();

    if service.is_stateful {
        // Storage rides along as a volume-claim template, no standalone claim
        kinds.push(ResourceKind::StatefulSet);
    } else {
        kinds.push(ResourceKind::Deployment);
        if service.storage_size.is_some() {
            kinds.push(ResourceKind::PersistentVolumeClaim);
        }
    }

    if !service.ports.is_empty() {
        kinds.push(ResourceKind::Service);
    }

    if service.ingress.is_some() {
        kinds.push(ResourceKind::Ingress);
    }

    if !service.secrets.is_empty() {
        kinds.push(match provider {
            SecretProvider::Internal => ResourceKind::Secret,
            SecretProvider::External => ResourceKind::ExternalSecret,
        });
    }

    kinds
}

/// Emission plan for a whole document: the union of each service's kinds in
/// catalog order, plus one shared SecretStore when an external provider has
/// anything to resolve.
pub fn plan(doc: &ValuesDocument) -> Vec<ResourceKind> {
    let mut needed = std::collections::HashSet::new();
    for (name, service) in &doc.services {
        let kinds = service_resources(service, doc.secret_provider);
        debug!(service = %name, ?kinds, "service resource kinds");
        needed.extend(kinds);
    }

    if needed.contains(&ResourceKind::ExternalSecret) {
        needed.insert(ResourceKind::SecretStore);
    }

    ResourceKind::ALL
        .iter()
        .copied()
        .filter(|kind| needed.contains(kind))
        .collect()
}
