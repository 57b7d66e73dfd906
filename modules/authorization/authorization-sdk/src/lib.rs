//! Authorization SDK
//!
//! Public contract of the cluster role binding storage:
//!
//! - [`ClusterRoleBinding`], [`ClusterRoleBindingList`], [`ObjectReference`] -
//!   proxy-facing schema
//! - [`ClusterRoleBindingError`] - error type of every storage operation
//! - [`TranslationError`] - object shapes the native schema cannot represent
//!   (or the other way around)
//!
//! The storage itself is consumed through the `apikit_registry` capability
//! traits.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod error;
pub mod models;

pub use error::{ClusterRoleBindingError, Direction, TranslationError};
pub use models::{
    ClusterRoleBinding, ClusterRoleBindingList, GROUP_KIND, ObjectReference, SERVICE_ACCOUNT_KIND,
    SYSTEM_GROUP_KIND, SYSTEM_PREFIX, SYSTEM_USER_KIND, USER_KIND,
};
