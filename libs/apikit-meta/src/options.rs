//! Request options.
//!
//! [`ListOptions`] is the internal, parsed form received by storage
//! implementations; [`v1::ListOptions`] is the wire form the native API
//! accepts. The remaining option types are shared by both sides.

use serde::{Deserialize, Serialize};

use crate::selector::{FieldSelector, LabelSelector};

/// The only dry-run mode the API understands.
pub const DRY_RUN_ALL: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceVersionMatch {
    NotOlderThan,
    Exact,
}

/// List options as handed over by the dispatch layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub label_selector: LabelSelector,
    pub field_selector: FieldSelector,
    pub resource_version: Option<String>,
    pub resource_version_match: Option<ResourceVersionMatch>,
    pub limit: Option<i64>,
    pub continue_token: Option<String>,
    pub watch: bool,
    pub allow_watch_bookmarks: bool,
    pub send_initial_events: Option<bool>,
    pub timeout_seconds: Option<i64>,
}

pub mod v1 {
    use serde::{Deserialize, Serialize};

    use super::ResourceVersionMatch;

    /// List options in wire form; selectors are serialized strings.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct ListOptions {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub label_selector: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub field_selector: Option<String>,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        pub watch: bool,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        pub allow_watch_bookmarks: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub resource_version: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub resource_version_match: Option<ResourceVersionMatch>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub timeout_seconds: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub limit: Option<i64>,
        #[serde(rename = "continue", skip_serializing_if = "Option::is_none")]
        pub continue_token: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub send_initial_events: Option<bool>,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOptions {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dry_run: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_manager: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateOptions {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dry_run: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_manager: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validation: Option<String>,
}

/// Conditions that must hold on the stored object for a delete to proceed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preconditions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropagationPolicy {
    Orphan,
    Background,
    Foreground,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace_period_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preconditions: Option<Preconditions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub propagation_policy: Option<PropagationPolicy>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dry_run: Vec<String>,
}

/// Returns the first dry-run value the API does not understand.
#[must_use]
pub fn unsupported_dry_run(dry_run: &[String]) -> Option<&str> {
    dry_run
        .iter()
        .map(String::as_str)
        .find(|value| *value != DRY_RUN_ALL)
}
