//! Proxy-facing cluster role binding schema.

use apikit_meta::{ListMeta, ObjectMeta};
use serde::{Deserialize, Serialize};

pub const USER_KIND: &str = "User";
pub const GROUP_KIND: &str = "Group";
pub const SERVICE_ACCOUNT_KIND: &str = "ServiceAccount";
pub const SYSTEM_USER_KIND: &str = "SystemUser";
pub const SYSTEM_GROUP_KIND: &str = "SystemGroup";

/// Prefix of the reserved `system:` identities.
pub const SYSTEM_PREFIX: &str = "system:";

/// Reference to another object: a subject of a binding, or the role it grants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

impl ObjectReference {
    fn of_kind(kind: &str, name: impl Into<String>) -> Self {
        Self {
            kind: kind.to_owned(),
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn user(name: impl Into<String>) -> Self {
        Self::of_kind(USER_KIND, name)
    }

    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self::of_kind(GROUP_KIND, name)
    }

    #[must_use]
    pub fn system_user(name: impl Into<String>) -> Self {
        Self::of_kind(SYSTEM_USER_KIND, name)
    }

    #[must_use]
    pub fn system_group(name: impl Into<String>) -> Self {
        Self::of_kind(SYSTEM_GROUP_KIND, name)
    }

    #[must_use]
    pub fn service_account(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            ..Self::of_kind(SERVICE_ACCOUNT_KIND, name)
        }
    }

    /// Reference to a cluster role (kind left empty, as clients send it).
    #[must_use]
    pub fn role(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Grants the role named by `role_ref` to every subject, cluster-wide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleBinding {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub subjects: Vec<ObjectReference>,
    pub role_ref: ObjectReference,
}

impl ClusterRoleBinding {
    /// Flat user names, including service accounts in their
    /// `system:serviceaccount:<namespace>:<name>` form.
    #[must_use]
    pub fn user_names(&self) -> Vec<String> {
        self.subjects
            .iter()
            .filter_map(|s| match s.kind.as_str() {
                USER_KIND | SYSTEM_USER_KIND => Some(s.name.clone()),
                SERVICE_ACCOUNT_KIND => Some(format!(
                    "{SYSTEM_PREFIX}serviceaccount:{}:{}",
                    s.namespace.as_deref().unwrap_or_default(),
                    s.name
                )),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn group_names(&self) -> Vec<String> {
        self.subjects
            .iter()
            .filter(|s| matches!(s.kind.as_str(), GROUP_KIND | SYSTEM_GROUP_KIND))
            .map(|s| s.name.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleBindingList {
    #[serde(default)]
    pub metadata: ListMeta,
    pub items: Vec<ClusterRoleBinding>,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn binding() -> ClusterRoleBinding {
        ClusterRoleBinding {
            metadata: ObjectMeta::named("readers"),
            subjects: vec![
                ObjectReference::user("alice"),
                ObjectReference::system_user("system:kube-scheduler"),
                ObjectReference::service_account("ci", "builder"),
                ObjectReference::group("devs"),
                ObjectReference::system_group("system:authenticated"),
            ],
            role_ref: ObjectReference::role("view"),
        }
    }

    #[test]
    fn user_names_include_service_accounts() {
        assert_eq!(
            binding().user_names(),
            [
                "alice",
                "system:kube-scheduler",
                "system:serviceaccount:ci:builder"
            ]
        );
    }

    #[test]
    fn group_names_include_system_groups() {
        assert_eq!(binding().group_names(), ["devs", "system:authenticated"]);
    }

    #[test]
    fn role_ref_serializes_without_kind() {
        let json = serde_json::to_value(ObjectReference::role("view")).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "view" }));
    }
}
