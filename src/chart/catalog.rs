//! Built-in template catalog
//!
//! The template files are static text, compiled in from `templates/` and
//! written unmodified; every dynamic decision lives in the values document
//! and the emission plan. A `--templates` directory can override any of them
//! at run time.

use crate::emission::ResourceKind;

/// Chart manifest, always written.
pub const CHART_MANIFEST_PATH: &str = "Chart.yaml";
pub const CHART_MANIFEST: &str = include_str!("../../templates/Chart.yaml");

/// Returns the built-in template text for a resource kind.
pub fn builtin_template(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Deployment => include_str!("../../templates/deployment.yaml"),
        ResourceKind::StatefulSet => include_str!("../../templates/statefulset.yaml"),
        ResourceKind::Service => include_str!("../../templates/service.yaml"),
        ResourceKind::PersistentVolumeClaim => include_str!("../../templates/pvc.yaml"),
        ResourceKind::Ingress => include_str!("../../templates/ingress.yaml"),
        ResourceKind::Secret => include_str!("../../templates/secret.yaml"),
        ResourceKind::ExternalSecret => include_str!("../../templates/externalsecret.yaml"),
        ResourceKind::SecretStore => include_str!("../../templates/secretstore.yaml"),
    }
}
