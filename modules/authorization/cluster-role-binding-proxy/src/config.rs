//! Configuration for the cluster role binding proxy.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Prefix of environment variables overriding the configuration,
/// e.g. `CRB_PROXY__TABLE__MAX_SUBJECTS=10`.
pub const ENV_PREFIX: &str = "CRB_PROXY__";

/// Proxy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusterRoleBindingProxyConfig {
    /// Upper bound on any single request, e.g. `"30s"`.
    ///
    /// A tighter deadline already carried by the request wins.
    #[serde(with = "humantime_serde::option", skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<Duration>,

    /// Forward the caller's extra attributes as `Impersonate-Extra-*`.
    pub forward_user_extra: bool,

    pub table: TableConfig,
}

impl Default for ClusterRoleBindingProxyConfig {
    fn default() -> Self {
        Self {
            request_timeout: None,
            forward_user_extra: true,
            table: TableConfig::default(),
        }
    }
}

/// Table rendering for CLI clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Subjects shown per cell before the rest is elided.
    pub max_subjects: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { max_subjects: 5 }
    }
}

impl ClusterRoleBindingProxyConfig {
    /// Layered load: defaults, then the YAML file at `path` (if given),
    /// then `CRB_PROXY__*` environment variables.
    ///
    /// # Errors
    ///
    /// Fails if `path` does not exist or if a layer does not parse into
    /// this configuration.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.exists() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid cluster role binding proxy configuration")
    }
}

/// Humantime (de)serialization for optional durations.
mod humantime_serde {
    pub mod option {
        use std::time::Duration;

        use serde::{Deserialize, Deserializer, Serializer, de};

        #[allow(clippy::ref_option)]
        pub fn serialize<S>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(d) => s.serialize_some(&humantime::format_duration(*d).to_string()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(d: D) -> Result<Option<Duration>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(d)?
                .map(|s| humantime::parse_duration(&s).map_err(de::Error::custom))
                .transpose()
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::io::Write;

    use super::*;

    fn yaml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_file_or_env() {
        temp_env::with_vars_unset(
            [
                "CRB_PROXY__REQUEST_TIMEOUT",
                "CRB_PROXY__FORWARD_USER_EXTRA",
                "CRB_PROXY__TABLE__MAX_SUBJECTS",
            ],
            || {
                let config = ClusterRoleBindingProxyConfig::load(None).unwrap();
                assert_eq!(config, ClusterRoleBindingProxyConfig::default());
                assert!(config.forward_user_extra);
                assert_eq!(config.table.max_subjects, 5);
            },
        );
    }

    #[test]
    fn yaml_overrides_defaults() {
        let file = yaml_file("request_timeout: 1m 30s\ntable:\n  max_subjects: 2\n");

        temp_env::with_vars_unset(["CRB_PROXY__TABLE__MAX_SUBJECTS"], || {
            let config = ClusterRoleBindingProxyConfig::load(Some(file.path())).unwrap();
            assert_eq!(config.request_timeout, Some(Duration::from_secs(90)));
            assert_eq!(config.table.max_subjects, 2);
            assert!(config.forward_user_extra);
        });
    }

    #[test]
    fn env_overrides_yaml() {
        let file = yaml_file("forward_user_extra: true\ntable:\n  max_subjects: 2\n");

        temp_env::with_vars(
            [
                ("CRB_PROXY__FORWARD_USER_EXTRA", Some("false")),
                ("CRB_PROXY__TABLE__MAX_SUBJECTS", Some("9")),
            ],
            || {
                let config = ClusterRoleBindingProxyConfig::load(Some(file.path())).unwrap();
                assert!(!config.forward_user_extra);
                assert_eq!(config.table.max_subjects, 9);
            },
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let file = yaml_file("request_timout: 5s\n");
        assert!(ClusterRoleBindingProxyConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn bad_duration_is_rejected() {
        let file = yaml_file("request_timeout: soon\n");
        assert!(ClusterRoleBindingProxyConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = ClusterRoleBindingProxyConfig::load(Some(Path::new("/nonexistent/crb.yaml")))
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
