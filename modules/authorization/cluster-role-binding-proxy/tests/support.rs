#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Test support utilities for `cluster_role_binding_proxy` integration tests.
//!
//! Provides request contexts, a proxy over the in-memory native API and
//! binding builders for both schemas.

#![allow(dead_code)] // Support module provides utilities that may not all be used

use std::sync::Arc;

use apikit_meta::ObjectMeta;
use apikit_security::{RequestContext, UserInfo};
use authorization_sdk::{ClusterRoleBinding, ObjectReference, TranslationError};
use cluster_role_binding_proxy::{
    ClusterRoleBindingProxy, ClusterRoleBindingProxyConfig, RbacTranslator, Translator,
};
use rbac_v1_client::testing::FakeRbacClient;
use rbac_v1_client::{RoleRef, Subject};

/// Request context for an authenticated user.
#[must_use]
pub fn ctx_for(user: &str) -> RequestContext {
    RequestContext::builder().user(UserInfo::new(user)).build()
}

/// Proxy with default configuration over `client`.
#[must_use]
pub fn proxy_over(client: &FakeRbacClient) -> ClusterRoleBindingProxy {
    proxy_with_config(client, ClusterRoleBindingProxyConfig::default())
}

#[must_use]
pub fn proxy_with_config(
    client: &FakeRbacClient,
    config: ClusterRoleBindingProxyConfig,
) -> ClusterRoleBindingProxy {
    ClusterRoleBindingProxy::new(Arc::new(client.clone()), config)
}

/// Native binding of `role` to `users`.
#[must_use]
pub fn native_binding(name: &str, role: &str, users: &[&str]) -> rbac_v1_client::ClusterRoleBinding {
    rbac_v1_client::ClusterRoleBinding {
        metadata: ObjectMeta::named(name),
        subjects: users.iter().map(|u| Subject::user(*u)).collect(),
        role_ref: RoleRef::cluster_role(role),
    }
}

/// External binding of `role` to `subjects`.
#[must_use]
pub fn external_binding(name: &str, role: &str, subjects: Vec<ObjectReference>) -> ClusterRoleBinding {
    ClusterRoleBinding {
        metadata: ObjectMeta::named(name),
        subjects,
        role_ref: ObjectReference::role(role),
    }
}

/// Translator that cannot bring back one particular stored binding.
pub struct PoisonedTranslator {
    pub poisoned: String,
}

impl Translator for PoisonedTranslator {
    fn to_native(
        &self,
        binding: &ClusterRoleBinding,
    ) -> Result<rbac_v1_client::ClusterRoleBinding, TranslationError> {
        RbacTranslator.to_native(binding)
    }

    fn to_external(
        &self,
        binding: &rbac_v1_client::ClusterRoleBinding,
    ) -> Result<ClusterRoleBinding, TranslationError> {
        if binding.metadata.name == self.poisoned {
            return Err(TranslationError::UnsupportedSubjectKind {
                kind: "Poison".to_owned(),
                name: binding.metadata.name.clone(),
            });
        }
        RbacTranslator.to_external(binding)
    }
}
