use async_trait::async_trait;

use apikit_meta::{CreateOptions, DeleteOptions, GetOptions, UpdateOptions, v1};

use crate::error::ApiError;
use crate::impersonation::{Impersonation, ImpersonationError};
use crate::models::{ClusterRoleBinding, ClusterRoleBindingList};

/// Cluster role binding operations against the native API, issued as one
/// fixed identity.
///
/// The native API is responsible for authorization, resource version checks
/// on update, and delete preconditions.
#[async_trait]
pub trait ClusterRoleBindingInterface: Send + Sync {
    async fn list(&self, options: &v1::ListOptions) -> Result<ClusterRoleBindingList, ApiError>;

    async fn get(&self, name: &str, options: &GetOptions) -> Result<ClusterRoleBinding, ApiError>;

    async fn create(
        &self,
        binding: &ClusterRoleBinding,
        options: &CreateOptions,
    ) -> Result<ClusterRoleBinding, ApiError>;

    /// Fails with a `Conflict` error if `binding.metadata.resource_version`
    /// is set and stale.
    async fn update(
        &self,
        binding: &ClusterRoleBinding,
        options: &UpdateOptions,
    ) -> Result<ClusterRoleBinding, ApiError>;

    async fn delete(&self, name: &str, options: &DeleteOptions) -> Result<(), ApiError>;
}

/// Privileged client of the native RBAC API.
///
/// Shared by all in-flight requests; it is never used to issue calls
/// directly on behalf of a request, only to derive impersonating ones.
pub trait RbacV1Client: Send + Sync {
    /// Interface whose every call is made as `impersonation`.
    ///
    /// # Errors
    ///
    /// Returns [`ImpersonationError`] if the identity cannot be encoded for
    /// the transport.
    fn cluster_role_bindings_as(
        &self,
        impersonation: Impersonation,
    ) -> Result<Box<dyn ClusterRoleBindingInterface>, ImpersonationError>;
}
