//! Native `rbac.authorization.k8s.io/v1` schema.

use apikit_meta::{ListMeta, ObjectMeta};
use serde::{Deserialize, Serialize};

pub const GROUP_NAME: &str = "rbac.authorization.k8s.io";
pub const API_VERSION: &str = "rbac.authorization.k8s.io/v1";
/// Version of the core group, where service accounts live.
pub const CORE_API_VERSION: &str = "v1";
pub const RESOURCE: &str = "clusterrolebindings";

pub const USER_KIND: &str = "User";
pub const GROUP_KIND: &str = "Group";
pub const SERVICE_ACCOUNT_KIND: &str = "ServiceAccount";
pub const CLUSTER_ROLE_KIND: &str = "ClusterRole";

/// Reference to the identity a binding applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub kind: String,
    /// `rbac.authorization.k8s.io` for users and groups, empty for service accounts.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_group: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Subject {
    #[must_use]
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            kind: USER_KIND.to_owned(),
            api_group: GROUP_NAME.to_owned(),
            name: name.into(),
            namespace: None,
        }
    }

    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            kind: GROUP_KIND.to_owned(),
            api_group: GROUP_NAME.to_owned(),
            name: name.into(),
            namespace: None,
        }
    }

    #[must_use]
    pub fn service_account(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: SERVICE_ACCOUNT_KIND.to_owned(),
            api_group: String::new(),
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRef {
    pub api_group: String,
    pub kind: String,
    pub name: String,
}

impl RoleRef {
    #[must_use]
    pub fn cluster_role(name: impl Into<String>) -> Self {
        Self {
            api_group: GROUP_NAME.to_owned(),
            kind: CLUSTER_ROLE_KIND.to_owned(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleBinding {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<Subject>,
    pub role_ref: RoleRef,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleBindingList {
    #[serde(default)]
    pub metadata: ListMeta,
    pub items: Vec<ClusterRoleBinding>,
}
