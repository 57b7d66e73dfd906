//! Native RBAC v1 client contract.
//!
//! - [`ClusterRoleBinding`], [`Subject`], [`RoleRef`] - native schema
//! - [`ClusterRoleBindingInterface`] - the five CRUD operations, issued as
//!   one fixed identity
//! - [`RbacV1Client`] - privileged, long-lived client that derives
//!   identity-scoped [`ClusterRoleBindingInterface`]s via impersonation
//! - [`Impersonation`] - who to act as, and its HTTP header encoding
//! - [`ApiError`] - native error carrying its status classification
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod error;
pub mod impersonation;
pub mod models;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api::{ClusterRoleBindingInterface, RbacV1Client};
pub use error::ApiError;
pub use impersonation::{Impersonation, ImpersonationError};
pub use models::{
    API_VERSION, CLUSTER_ROLE_KIND, CORE_API_VERSION, ClusterRoleBinding, ClusterRoleBindingList,
    GROUP_KIND, GROUP_NAME, RESOURCE, RoleRef, SERVICE_ACCOUNT_KIND, Subject, USER_KIND,
};
