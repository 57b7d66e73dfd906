//! Translation between the proxy-facing and the native binding schema.

use authorization_sdk::{
    ClusterRoleBinding, GROUP_KIND, ObjectReference, SERVICE_ACCOUNT_KIND, SYSTEM_GROUP_KIND,
    SYSTEM_PREFIX, SYSTEM_USER_KIND, TranslationError, USER_KIND,
};
use rbac_v1_client as native;

/// Pure, bidirectional mapping between the two schemas.
///
/// Implementations must reject what the target schema cannot represent
/// rather than drop it, and `to_native(to_external(n))` must equal `n` on
/// every field the external schema can represent.
pub trait Translator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`TranslationError`] if `binding` has no native form.
    fn to_native(
        &self,
        binding: &ClusterRoleBinding,
    ) -> Result<native::ClusterRoleBinding, TranslationError>;

    /// # Errors
    ///
    /// Returns [`TranslationError`] if the native object has a shape the
    /// external schema does not know.
    fn to_external(
        &self,
        binding: &native::ClusterRoleBinding,
    ) -> Result<ClusterRoleBinding, TranslationError>;
}

/// Default translator for `rbac.authorization.k8s.io/v1`.
///
/// `SystemUser` and `SystemGroup` subjects become plain native users and
/// groups; on the way back, names under `system:` are mapped to them again.
/// A subject whose kind disagrees with its `system:` prefix is rejected, as
/// is an `api_version` other than the one the native kind implies.
#[derive(Debug, Clone, Default)]
pub struct RbacTranslator;

impl Translator for RbacTranslator {
    fn to_native(
        &self,
        binding: &ClusterRoleBinding,
    ) -> Result<native::ClusterRoleBinding, TranslationError> {
        Ok(native::ClusterRoleBinding {
            metadata: binding.metadata.clone(),
            subjects: binding
                .subjects
                .iter()
                .map(subject_to_native)
                .collect::<Result<_, _>>()?,
            role_ref: role_ref_to_native(&binding.role_ref)?,
        })
    }

    fn to_external(
        &self,
        binding: &native::ClusterRoleBinding,
    ) -> Result<ClusterRoleBinding, TranslationError> {
        Ok(ClusterRoleBinding {
            metadata: binding.metadata.clone(),
            subjects: binding
                .subjects
                .iter()
                .map(subject_to_external)
                .collect::<Result<_, _>>()?,
            role_ref: role_ref_to_external(&binding.role_ref)?,
        })
    }
}

fn subject_to_native(subject: &ObjectReference) -> Result<native::Subject, TranslationError> {
    let system_kind = matches!(subject.kind.as_str(), SYSTEM_USER_KIND | SYSTEM_GROUP_KIND);
    let principal = system_kind || matches!(subject.kind.as_str(), USER_KIND | GROUP_KIND);
    if principal && system_kind != subject.name.starts_with(SYSTEM_PREFIX) {
        return Err(TranslationError::SystemPrefixMismatch {
            kind: subject.kind.clone(),
            name: subject.name.clone(),
        });
    }

    let (kind, api_group, api_version) = match subject.kind.as_str() {
        USER_KIND | SYSTEM_USER_KIND => {
            (native::USER_KIND, native::GROUP_NAME, native::API_VERSION)
        }
        GROUP_KIND | SYSTEM_GROUP_KIND => {
            (native::GROUP_KIND, native::GROUP_NAME, native::API_VERSION)
        }
        SERVICE_ACCOUNT_KIND => {
            if subject.namespace.as_deref().is_none_or(str::is_empty) {
                return Err(TranslationError::MissingNamespace {
                    name: subject.name.clone(),
                });
            }
            (native::SERVICE_ACCOUNT_KIND, "", native::CORE_API_VERSION)
        }
        other => {
            return Err(TranslationError::UnsupportedSubjectKind {
                kind: other.to_owned(),
                name: subject.name.clone(),
            });
        }
    };
    check_api_version(subject, api_version)?;

    Ok(native::Subject {
        kind: kind.to_owned(),
        api_group: api_group.to_owned(),
        name: subject.name.clone(),
        namespace: subject.namespace.clone(),
    })
}

/// The native schema has no version field; only the one its kind implies is
/// accepted.
fn check_api_version(reference: &ObjectReference, expected: &str) -> Result<(), TranslationError> {
    match reference.api_version.as_deref() {
        Some(version) if version != expected => Err(TranslationError::UnsupportedApiVersion {
            kind: reference.kind.clone(),
            name: reference.name.clone(),
            api_version: version.to_owned(),
            expected: expected.to_owned(),
        }),
        _ => Ok(()),
    }
}

fn subject_to_external(subject: &native::Subject) -> Result<ObjectReference, TranslationError> {
    let expected_group = match subject.kind.as_str() {
        native::USER_KIND | native::GROUP_KIND => native::GROUP_NAME,
        native::SERVICE_ACCOUNT_KIND => "",
        other => {
            return Err(TranslationError::UnsupportedSubjectKind {
                kind: other.to_owned(),
                name: subject.name.clone(),
            });
        }
    };
    if subject.api_group != expected_group {
        return Err(TranslationError::UnexpectedApiGroup {
            kind: subject.kind.clone(),
            name: subject.name.clone(),
            api_group: subject.api_group.clone(),
        });
    }

    let system = subject.name.starts_with(SYSTEM_PREFIX);
    let kind = match subject.kind.as_str() {
        native::USER_KIND if system => SYSTEM_USER_KIND,
        native::GROUP_KIND if system => SYSTEM_GROUP_KIND,
        native::SERVICE_ACCOUNT_KIND => {
            if subject.namespace.as_deref().is_none_or(str::is_empty) {
                return Err(TranslationError::MissingNamespace {
                    name: subject.name.clone(),
                });
            }
            SERVICE_ACCOUNT_KIND
        }
        native::GROUP_KIND => GROUP_KIND,
        _ => USER_KIND,
    };

    Ok(ObjectReference {
        kind: kind.to_owned(),
        name: subject.name.clone(),
        namespace: subject.namespace.clone(),
        api_version: None,
    })
}

fn role_ref_to_native(role_ref: &ObjectReference) -> Result<native::RoleRef, TranslationError> {
    if let Some(namespace) = &role_ref.namespace {
        return Err(TranslationError::NamespacedRoleRef {
            name: role_ref.name.clone(),
            namespace: namespace.clone(),
        });
    }
    if !role_ref.kind.is_empty() && role_ref.kind != native::CLUSTER_ROLE_KIND {
        return Err(TranslationError::UnsupportedRoleRefKind {
            kind: role_ref.kind.clone(),
            name: role_ref.name.clone(),
        });
    }
    check_api_version(role_ref, native::API_VERSION)?;
    Ok(native::RoleRef::cluster_role(role_ref.name.clone()))
}

fn role_ref_to_external(role_ref: &native::RoleRef) -> Result<ObjectReference, TranslationError> {
    if role_ref.api_group != native::GROUP_NAME {
        return Err(TranslationError::UnexpectedApiGroup {
            kind: role_ref.kind.clone(),
            name: role_ref.name.clone(),
            api_group: role_ref.api_group.clone(),
        });
    }
    if role_ref.kind != native::CLUSTER_ROLE_KIND {
        return Err(TranslationError::UnsupportedRoleRefKind {
            kind: role_ref.kind.clone(),
            name: role_ref.name.clone(),
        });
    }
    Ok(ObjectReference::role(role_ref.name.clone()))
}
