//! Request option checks done before anything reaches the native API.

use apikit_meta::{ListOptions, ObjectMeta, convert_list_options, unsupported_dry_run, v1};
use authorization_sdk::ClusterRoleBindingError;

/// The only field the native API can select cluster role bindings by.
pub const NAME_FIELD: &str = "metadata.name";

/// Convert list options to their native form.
///
/// # Errors
///
/// Returns [`ClusterRoleBindingError::InvalidArgument`] for watch requests,
/// field selectors on anything but `metadata.name`, a resource version match
/// without a resource version, and label selector operators the native API
/// has no syntax for.
pub fn native_list_options(
    options: &ListOptions,
) -> Result<v1::ListOptions, ClusterRoleBindingError> {
    if options.watch || options.allow_watch_bookmarks || options.send_initial_events.is_some() {
        return Err(ClusterRoleBindingError::invalid_argument(
            "watch is not supported for cluster role bindings",
        ));
    }

    if let Some(requirement) = options
        .field_selector
        .requirements()
        .iter()
        .find(|r| r.field != NAME_FIELD)
    {
        return Err(ClusterRoleBindingError::invalid_argument(format!(
            "field selector \"{requirement}\" is not supported; only {NAME_FIELD} can be selected on"
        )));
    }

    if options.resource_version_match.is_some() && options.resource_version.is_none() {
        return Err(ClusterRoleBindingError::invalid_argument(
            "resourceVersionMatch is forbidden unless resourceVersion is provided",
        ));
    }

    convert_list_options(options).map_err(|e| ClusterRoleBindingError::invalid_argument(e.to_string()))
}

/// # Errors
///
/// Returns [`ClusterRoleBindingError::InvalidArgument`] for any dry-run
/// value other than `All`.
pub fn check_dry_run(dry_run: &[String]) -> Result<(), ClusterRoleBindingError> {
    match unsupported_dry_run(dry_run) {
        Some(value) => Err(ClusterRoleBindingError::invalid_argument(format!(
            "unsupported dry run value \"{value}\", only All is supported"
        ))),
        None => Ok(()),
    }
}

/// Cluster role bindings have no namespace.
///
/// # Errors
///
/// Returns [`ClusterRoleBindingError::InvalidArgument`] if `metadata`
/// names one.
pub fn check_cluster_scoped(metadata: &ObjectMeta) -> Result<(), ClusterRoleBindingError> {
    match metadata.namespace.as_deref() {
        Some(namespace) if !namespace.is_empty() => {
            Err(ClusterRoleBindingError::invalid_argument(format!(
                "cluster role binding {:?} must not have a namespace, got {namespace:?}",
                metadata.name
            )))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use apikit_meta::{
        FieldOperator, FieldRequirement, FieldSelector, LabelOperator, LabelRequirement,
        LabelSelector, ResourceVersionMatch,
    };

    use super::*;

    fn is_invalid(result: Result<v1::ListOptions, ClusterRoleBindingError>) -> bool {
        matches!(result, Err(ClusterRoleBindingError::InvalidArgument(_)))
    }

    #[test]
    fn forwards_supported_options() {
        let options = ListOptions {
            label_selector: LabelSelector::everything()
                .with(LabelRequirement::equals("team", "platform").unwrap()),
            field_selector: FieldSelector::everything()
                .with(FieldRequirement::equals(NAME_FIELD, "ops")),
            resource_version: Some("100".to_owned()),
            resource_version_match: Some(ResourceVersionMatch::NotOlderThan),
            limit: Some(50),
            continue_token: Some("token".to_owned()),
            ..ListOptions::default()
        };

        let native = native_list_options(&options).unwrap();

        assert_eq!(native.label_selector.as_deref(), Some("team=platform"));
        assert_eq!(native.field_selector.as_deref(), Some("metadata.name=ops"));
        assert_eq!(native.resource_version.as_deref(), Some("100"));
        assert_eq!(
            native.resource_version_match,
            Some(ResourceVersionMatch::NotOlderThan)
        );
        assert_eq!(native.limit, Some(50));
        assert_eq!(native.continue_token.as_deref(), Some("token"));
    }

    #[test]
    fn watch_is_rejected() {
        for options in [
            ListOptions {
                watch: true,
                ..ListOptions::default()
            },
            ListOptions {
                allow_watch_bookmarks: true,
                ..ListOptions::default()
            },
            ListOptions {
                send_initial_events: Some(true),
                ..ListOptions::default()
            },
        ] {
            assert!(is_invalid(native_list_options(&options)));
        }
    }

    #[test]
    fn only_name_field_selector_is_accepted() {
        let options = ListOptions {
            field_selector: FieldSelector::everything().with(FieldRequirement {
                field: "roleRef.name".to_owned(),
                operator: FieldOperator::NotEquals,
                value: "admin".to_owned(),
            }),
            ..ListOptions::default()
        };
        assert!(is_invalid(native_list_options(&options)));
    }

    #[test]
    fn resource_version_match_requires_resource_version() {
        let options = ListOptions {
            resource_version_match: Some(ResourceVersionMatch::Exact),
            ..ListOptions::default()
        };
        assert!(is_invalid(native_list_options(&options)));
    }

    #[test]
    fn numeric_label_operators_are_rejected() {
        let options = ListOptions {
            label_selector: LabelSelector::everything().with(
                LabelRequirement::new("tier", LabelOperator::GreaterThan, vec!["2".to_owned()])
                    .unwrap(),
            ),
            ..ListOptions::default()
        };
        assert!(is_invalid(native_list_options(&options)));
    }

    #[test]
    fn dry_run_values() {
        assert!(check_dry_run(&[]).is_ok());
        assert!(check_dry_run(&["All".to_owned()]).is_ok());
        assert!(matches!(
            check_dry_run(&["Server".to_owned()]),
            Err(ClusterRoleBindingError::InvalidArgument(m)) if m.contains("Server")
        ));
    }

    #[test]
    fn namespaced_metadata_is_rejected() {
        let mut metadata = ObjectMeta::named("ops");
        assert!(check_cluster_scoped(&metadata).is_ok());

        metadata.namespace = Some(String::new());
        assert!(check_cluster_scoped(&metadata).is_ok());

        metadata.namespace = Some("team-a".to_owned());
        assert!(check_cluster_scoped(&metadata).is_err());
    }
}
