//! Database engine registry
//!
//! A fixed registry of stateful workload signatures. A service whose image
//! name contains one of these identifiers is deployed as a StatefulSet and
//! picks up the engine's baseline storage size and credential env defaults.
//!
//! Match order is the declaration order below and is part of the tool's
//! contract: when an image name contains more than one identifier, the first
//! entry wins.

use indexmap::IndexMap;

/// Baseline defaults for one database engine.
#[derive(Debug, Clone, Copy)]
pub struct EngineDefaults {
    /// Identifier matched as a substring of the case-folded image name
    pub name: &'static str,
    pub storage_size: &'static str,
    pub env: &'static [(&'static str, &'static str)],
}

/// Known stateful engines, in documented match order.
pub const DATABASE_REGISTRY: &[EngineDefaults] = &[
    EngineDefaults {
        name: "postgres",
        storage_size: "5Gi",
        env: &[
            ("POSTGRES_USER", "admin"),
            ("POSTGRES_PASSWORD", "changeme"),
            ("POSTGRES_DB", "appdb"),
        ],
    },
    EngineDefaults {
        name: "mysql",
        storage_size: "5Gi",
        env: &[
            ("MYSQL_ROOT_PASSWORD", "changeme"),
            ("MYSQL_DATABASE", "appdb"),
            ("MYSQL_USER", "admin"),
            ("MYSQL_PASSWORD", "changeme"),
        ],
    },
    EngineDefaults {
        name: "mariadb",
        storage_size: "5Gi",
        env: &[
            ("MARIADB_ROOT_PASSWORD", "changeme"),
            ("MARIADB_DATABASE", "appdb"),
            ("MARIADB_USER", "admin"),
            ("MARIADB_PASSWORD", "changeme"),
        ],
    },
    EngineDefaults {
        name: "mongodb",
        storage_size: "5Gi",
        env: &[
            ("MONGO_INITDB_ROOT_USERNAME", "admin"),
            ("MONGO_INITDB_ROOT_PASSWORD", "changeme"),
        ],
    },
    EngineDefaults {
        name: "redis",
        storage_size: "1Gi",
        env: &[],
    },
    EngineDefaults {
        name: "cassandra",
        storage_size: "10Gi",
        env: &[
            ("CASSANDRA_USER", "admin"),
            ("CASSANDRA_PASSWORD", "changeme"),
        ],
    },
];

/// Returns the first registry entry whose identifier the case-folded image
/// name contains, if any. A match means the service is stateful.
pub fn classify_image(image: &str) -> Option<&'static EngineDefaults> {
    let lowered = image.to_lowercase();
    DATABASE_REGISTRY
        .iter()
        .find(|engine| lowered.contains(engine.name))
}

impl EngineDefaults {
    /// Merges this engine's defaults into a service with setdefault semantics:
    /// keys the user declared explicitly are never overwritten, and the
    /// storage size only fills in when nothing established one earlier.
    pub fn apply(&self, env: &mut IndexMap<String, String>, storage_size: &mut Option<String>) {
        for (key, value) in self.env {
            env.entry((*key).to_string())
                .or_insert_with(|| (*value).to_string());
        }
        if storage_size.is_none() {
            *storage_size = Some(self.storage_size.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        plain = { "postgres", "postgres" },
        tagged = { "postgres:15", "postgres" },
        registry_path = { "docker.io/library/mysql:8.0", "mysql" },
        case_folded = { "MongoDB:6", "mongodb" },
        vendor_prefix = { "bitnami/cassandra", "cassandra" },
    )]
    fn test_stateful_images_match(image: &str, expected: &str) {
        assert_eq!(classify_image(image).unwrap().name, expected);
    }

    #[parameterized(
        nginx = { "nginx:latest" },
        app = { "ghcr.io/acme/api:1.2" },
        empty = { "" },
    )]
    fn test_stateless_images_do_not_match(image: &str) {
        assert!(classify_image(image).is_none());
    }

    #[test]
    fn test_multi_engine_image_uses_registry_order() {
        // Contains both "mysql" and "redis"; mysql comes first in the registry.
        assert_eq!(classify_image("mysql-redis-proxy").unwrap().name, "mysql");
    }

    #[test]
    fn test_apply_never_overwrites_user_values() {
        let engine = classify_image("postgres:15").unwrap();
        let mut env = IndexMap::new();
        env.insert("POSTGRES_PASSWORD".to_string(), "explicit".to_string());
        let mut storage = Some("20Gi".to_string());

        engine.apply(&mut env, &mut storage);

        assert_eq!(env["POSTGRES_PASSWORD"], "explicit");
        assert_eq!(env["POSTGRES_USER"], "admin");
        assert_eq!(storage.as_deref(), Some("20Gi"));
    }

    #[test]
    fn test_apply_fills_storage_when_unset() {
        let engine = classify_image("cassandra").unwrap();
        let mut env = IndexMap::new();
        let mut storage = None;
        engine.apply(&mut env, &mut storage);
        assert_eq!(storage.as_deref(), Some("10Gi"));
        assert_eq!(env["CASSANDRA_USER"], "admin");
    }
}
