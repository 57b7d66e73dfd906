//! Identity a derived client acts as, and its wire encoding.

use std::collections::BTreeMap;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;

pub const IMPERSONATE_USER_HEADER: &str = "impersonate-user";
pub const IMPERSONATE_UID_HEADER: &str = "impersonate-uid";
pub const IMPERSONATE_GROUP_HEADER: &str = "impersonate-group";
pub const IMPERSONATE_EXTRA_HEADER_PREFIX: &str = "impersonate-extra-";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImpersonationError {
    #[error("impersonated user name must not be empty")]
    EmptyUser,

    #[error("value for {header} is not a valid header value")]
    InvalidHeaderValue { header: String },

    #[error("extra key {key:?} cannot be encoded as a header name")]
    InvalidExtraKey { key: String },
}

/// The caller a derived client impersonates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Impersonation {
    pub user: String,
    pub uid: Option<String>,
    pub groups: Vec<String>,
    pub extra: BTreeMap<String, Vec<String>>,
}

impl Impersonation {
    #[must_use]
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            user: name.into(),
            ..Self::default()
        }
    }

    /// Encode as impersonation headers.
    ///
    /// Groups and extra values repeat their header once per value. Extra
    /// keys are percent-encoded so that keys like `example.com/scopes`
    /// survive as header names.
    ///
    /// # Errors
    ///
    /// Returns [`ImpersonationError`] for an empty user or values that are
    /// not valid in a header.
    pub fn headers(&self) -> Result<HeaderMap, ImpersonationError> {
        if self.user.is_empty() {
            return Err(ImpersonationError::EmptyUser);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(IMPERSONATE_USER_HEADER),
            header_value(IMPERSONATE_USER_HEADER, &self.user)?,
        );

        if let Some(uid) = &self.uid {
            headers.insert(
                HeaderName::from_static(IMPERSONATE_UID_HEADER),
                header_value(IMPERSONATE_UID_HEADER, uid)?,
            );
        }

        for group in &self.groups {
            headers.append(
                HeaderName::from_static(IMPERSONATE_GROUP_HEADER),
                header_value(IMPERSONATE_GROUP_HEADER, group)?,
            );
        }

        for (key, values) in &self.extra {
            let header = format!(
                "{IMPERSONATE_EXTRA_HEADER_PREFIX}{}",
                urlencoding::encode(key)
            );
            let name = HeaderName::from_bytes(header.as_bytes())
                .map_err(|_| ImpersonationError::InvalidExtraKey { key: key.clone() })?;
            for value in values {
                headers.append(name.clone(), header_value(&header, value)?);
            }
        }

        Ok(headers)
    }
}

fn header_value(header: &str, value: &str) -> Result<HeaderValue, ImpersonationError> {
    HeaderValue::from_str(value).map_err(|_| ImpersonationError::InvalidHeaderValue {
        header: header.to_owned(),
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn values<'a>(headers: &'a HeaderMap, name: &str) -> Vec<&'a str> {
        headers
            .get_all(name)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect()
    }

    #[test]
    fn encodes_user_groups_and_uid() {
        let imp = Impersonation {
            user: "alice".to_owned(),
            uid: Some("1234".to_owned()),
            groups: vec!["devs".to_owned(), "system:authenticated".to_owned()],
            extra: BTreeMap::new(),
        };

        let headers = imp.headers().unwrap();

        assert_eq!(values(&headers, "impersonate-user"), ["alice"]);
        assert_eq!(values(&headers, "impersonate-uid"), ["1234"]);
        assert_eq!(
            values(&headers, "impersonate-group"),
            ["devs", "system:authenticated"]
        );
    }

    #[test]
    fn extra_keys_are_percent_encoded() {
        let mut imp = Impersonation::user("alice");
        imp.extra.insert(
            "example.com/scopes".to_owned(),
            vec!["read".to_owned(), "write".to_owned()],
        );

        let headers = imp.headers().unwrap();

        assert_eq!(
            values(&headers, "impersonate-extra-example.com%2fscopes"),
            ["read", "write"]
        );
    }

    #[test]
    fn empty_user_is_rejected() {
        assert_eq!(
            Impersonation::default().headers().unwrap_err(),
            ImpersonationError::EmptyUser
        );
    }

    #[test]
    fn control_characters_are_rejected() {
        let imp = Impersonation::user("alice\nbob");
        assert!(matches!(
            imp.headers().unwrap_err(),
            ImpersonationError::InvalidHeaderValue { .. }
        ));
    }
}
