//! Derivation of caller-scoped native clients.

use std::collections::BTreeMap;

use apikit_security::RequestContext;
use authorization_sdk::ClusterRoleBindingError;
use rbac_v1_client::{ClusterRoleBindingInterface, Impersonation, RbacV1Client};

/// Derive a native client that acts strictly as the caller in `ctx`.
///
/// There is no fallback to the identity of `base`: a request without a
/// named user is rejected. The returned client must not outlive the request.
///
/// # Errors
///
/// Returns [`ClusterRoleBindingError::Unauthorized`] if the context carries
/// no user or the identity cannot be impersonated.
pub fn impersonating_client(
    ctx: &RequestContext,
    base: &dyn RbacV1Client,
    forward_extra: bool,
) -> Result<Box<dyn ClusterRoleBindingInterface>, ClusterRoleBindingError> {
    let user = ctx
        .user()
        .filter(|u| !u.name().is_empty())
        .ok_or_else(|| ClusterRoleBindingError::unauthorized("no user found in request context"))?;

    let impersonation = Impersonation {
        user: user.name().to_owned(),
        uid: user.uid().map(str::to_owned),
        groups: user.groups().to_vec(),
        extra: if forward_extra {
            user.extra().clone()
        } else {
            BTreeMap::new()
        },
    };

    base.cluster_role_bindings_as(impersonation).map_err(|e| {
        ClusterRoleBindingError::unauthorized(format!("cannot impersonate {}: {e}", user.name()))
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use apikit_security::UserInfo;
    use rbac_v1_client::testing::FakeRbacClient;

    use super::*;

    fn ctx_for(user: UserInfo) -> RequestContext {
        RequestContext::builder().user(user).build()
    }

    #[test]
    fn anonymous_context_is_unauthorized() {
        let base = FakeRbacClient::new();

        let err = impersonating_client(&RequestContext::anonymous(), &base, true).err();

        assert_eq!(
            err,
            Some(ClusterRoleBindingError::unauthorized(
                "no user found in request context"
            ))
        );
        assert!(base.impersonations().is_empty());
    }

    #[test]
    fn empty_user_name_is_unauthorized() {
        let base = FakeRbacClient::new();
        let ctx = ctx_for(UserInfo::new(""));

        let err = impersonating_client(&ctx, &base, true).err();

        assert!(matches!(err, Some(ClusterRoleBindingError::Unauthorized(_))));
        assert!(base.impersonations().is_empty());
    }

    #[test]
    fn impersonates_full_identity() {
        let base = FakeRbacClient::new();
        let ctx = ctx_for(
            UserInfo::new("alice")
                .with_uid("u-1")
                .add_group("devs")
                .add_extra("scopes", "user:full"),
        );

        assert!(impersonating_client(&ctx, &base, true).is_ok());

        let imp = &base.impersonations()[0];
        assert_eq!(imp.user, "alice");
        assert_eq!(imp.uid.as_deref(), Some("u-1"));
        assert_eq!(imp.groups, ["devs"]);
        assert_eq!(imp.extra["scopes"], ["user:full"]);
    }

    #[test]
    fn extra_can_be_withheld() {
        let base = FakeRbacClient::new();
        let ctx = ctx_for(UserInfo::new("alice").add_extra("scopes", "user:full"));

        assert!(impersonating_client(&ctx, &base, false).is_ok());

        assert!(base.impersonations()[0].extra.is_empty());
    }

    #[test]
    fn unencodable_identity_is_unauthorized() {
        let base = FakeRbacClient::new();
        let ctx = ctx_for(UserInfo::new("alice\r\n"));

        let err = impersonating_client(&ctx, &base, true).err();

        assert!(matches!(err, Some(ClusterRoleBindingError::Unauthorized(m)) if m.contains("cannot impersonate")));
    }
}
