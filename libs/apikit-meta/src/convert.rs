//! Conversion of internal list options to their `v1` wire form.

use thiserror::Error;

use crate::options::{ListOptions, v1};
use crate::selector::{LabelOperator, LabelRequirement, LabelSelector};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("label selector operator {operator} on key {key:?} is not forwarded to the native API")]
    UnsupportedLabelOperator { key: String, operator: LabelOperator },
}

/// Convert internal list options to the wire form.
///
/// Selectors are rendered into the string grammar understood by the native
/// API. Empty selectors are omitted rather than sent as empty strings.
///
/// # Errors
///
/// Returns [`ConversionError::UnsupportedLabelOperator`] if the label selector
/// uses a numeric comparison (`gt`, `lt`). These are not forwarded to the
/// native API.
pub fn convert_list_options(options: &ListOptions) -> Result<v1::ListOptions, ConversionError> {
    let label_selector = if options.label_selector.is_empty() {
        None
    } else {
        Some(render_label_selector(&options.label_selector)?)
    };

    let field_selector =
        (!options.field_selector.is_empty()).then(|| options.field_selector.to_string());

    Ok(v1::ListOptions {
        label_selector,
        field_selector,
        watch: options.watch,
        allow_watch_bookmarks: options.allow_watch_bookmarks,
        resource_version: options.resource_version.clone(),
        resource_version_match: options.resource_version_match,
        timeout_seconds: options.timeout_seconds,
        limit: options.limit,
        continue_token: options.continue_token.clone(),
        send_initial_events: options.send_initial_events,
    })
}

/// Render a label selector; terms are ordered by key so the output is stable.
fn render_label_selector(selector: &LabelSelector) -> Result<String, ConversionError> {
    let mut requirements: Vec<&LabelRequirement> = selector.requirements().iter().collect();
    requirements.sort_by(|a, b| a.key().cmp(b.key()));

    let terms = requirements
        .into_iter()
        .map(render_requirement)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(terms.join(","))
}

fn render_requirement(requirement: &LabelRequirement) -> Result<String, ConversionError> {
    let key = requirement.key();
    let mut values: Vec<&str> = requirement.values().iter().map(String::as_str).collect();
    values.sort_unstable();

    let term = match requirement.operator() {
        LabelOperator::Equals => format!("{key}={}", values[0]),
        LabelOperator::NotEquals => format!("{key}!={}", values[0]),
        LabelOperator::In => format!("{key} in ({})", values.join(",")),
        LabelOperator::NotIn => format!("{key} notin ({})", values.join(",")),
        LabelOperator::Exists => key.to_owned(),
        LabelOperator::DoesNotExist => format!("!{key}"),
        operator @ (LabelOperator::GreaterThan | LabelOperator::LessThan) => {
            return Err(ConversionError::UnsupportedLabelOperator {
                key: key.to_owned(),
                operator,
            });
        }
    };
    Ok(term)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::options::ResourceVersionMatch;
    use crate::selector::{FieldRequirement, FieldSelector};

    #[test]
    fn empty_options_convert_to_empty_wire_options() {
        let converted = convert_list_options(&ListOptions::default()).unwrap();
        assert_eq!(converted, v1::ListOptions::default());
    }

    #[test]
    fn selectors_are_rendered_sorted_by_key() {
        let options = ListOptions {
            label_selector: LabelSelector::everything()
                .with(
                    LabelRequirement::new(
                        "tier",
                        LabelOperator::In,
                        vec!["gold".into(), "bronze".into()],
                    )
                    .unwrap(),
                )
                .with(LabelRequirement::equals("app", "console").unwrap())
                .with(LabelRequirement::new("legacy", LabelOperator::DoesNotExist, vec![]).unwrap()),
            field_selector: FieldSelector::everything()
                .with(FieldRequirement::equals("metadata.name", "admins")),
            ..ListOptions::default()
        };

        let converted = convert_list_options(&options).unwrap();

        assert_eq!(
            converted.label_selector.as_deref(),
            Some("app=console,!legacy,tier in (bronze,gold)")
        );
        assert_eq!(
            converted.field_selector.as_deref(),
            Some("metadata.name=admins")
        );
    }

    #[test]
    fn paging_and_versions_are_copied() {
        let options = ListOptions {
            resource_version: Some("100".to_owned()),
            resource_version_match: Some(ResourceVersionMatch::NotOlderThan),
            limit: Some(50),
            continue_token: Some("abc".to_owned()),
            timeout_seconds: Some(30),
            ..ListOptions::default()
        };

        let converted = convert_list_options(&options).unwrap();

        assert_eq!(converted.resource_version.as_deref(), Some("100"));
        assert_eq!(
            converted.resource_version_match,
            Some(ResourceVersionMatch::NotOlderThan)
        );
        assert_eq!(converted.limit, Some(50));
        assert_eq!(converted.continue_token.as_deref(), Some("abc"));
        assert_eq!(converted.timeout_seconds, Some(30));
    }

    #[test]
    fn numeric_label_operators_are_not_forwarded() {
        let options = ListOptions {
            label_selector: LabelSelector::everything().with(
                LabelRequirement::new("priority", LabelOperator::GreaterThan, vec!["5".into()])
                    .unwrap(),
            ),
            ..ListOptions::default()
        };

        let err = convert_list_options(&options).unwrap_err();

        assert_eq!(
            err,
            ConversionError::UnsupportedLabelOperator {
                key: "priority".to_owned(),
                operator: LabelOperator::GreaterThan,
            }
        );
        assert!(err.to_string().contains("not forwarded to the native API"));
    }
}
