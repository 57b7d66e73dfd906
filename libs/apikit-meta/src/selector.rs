//! Label and field selectors in parsed form.
//!
//! Selectors are built from requirements that are validated on construction,
//! so a [`LabelSelector`] or [`FieldSelector`] value is always well formed.

use std::fmt;

use thiserror::Error;

/// Errors raised while building selector requirements.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("selector key must not be empty")]
    EmptyKey,

    #[error("operator {operator} on key {key:?} expects {expected}, got {actual} value(s)")]
    Arity {
        key: String,
        operator: LabelOperator,
        expected: &'static str,
        actual: usize,
    },

    #[error("operator {operator} on key {key:?} requires an integer value, got {value:?}")]
    NotAnInteger {
        key: String,
        operator: LabelOperator,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelOperator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Exists,
    DoesNotExist,
    GreaterThan,
    LessThan,
}

impl fmt::Display for LabelOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::In => "in",
            Self::NotIn => "notin",
            Self::Exists => "exists",
            Self::DoesNotExist => "!",
            Self::GreaterThan => "gt",
            Self::LessThan => "lt",
        };
        f.write_str(s)
    }
}

/// One `key <op> values` term of a label selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRequirement {
    key: String,
    operator: LabelOperator,
    values: Vec<String>,
}

impl LabelRequirement {
    /// Build a requirement, checking operator arity.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] when the key is empty, the number of values
    /// does not fit the operator, or a numeric operator gets a non-integer.
    pub fn new(
        key: impl Into<String>,
        operator: LabelOperator,
        values: Vec<String>,
    ) -> Result<Self, SelectorError> {
        let key = key.into();
        if key.is_empty() {
            return Err(SelectorError::EmptyKey);
        }

        let arity = |expected: &'static str, ok: bool| {
            if ok {
                Ok(())
            } else {
                Err(SelectorError::Arity {
                    key: key.clone(),
                    operator,
                    expected,
                    actual: values.len(),
                })
            }
        };

        match operator {
            LabelOperator::Equals | LabelOperator::NotEquals => {
                arity("exactly one value", values.len() == 1)?;
            }
            LabelOperator::In | LabelOperator::NotIn => {
                arity("at least one value", !values.is_empty())?;
            }
            LabelOperator::Exists | LabelOperator::DoesNotExist => {
                arity("no values", values.is_empty())?;
            }
            LabelOperator::GreaterThan | LabelOperator::LessThan => {
                arity("exactly one value", values.len() == 1)?;
                if values[0].parse::<i64>().is_err() {
                    return Err(SelectorError::NotAnInteger {
                        key,
                        operator,
                        value: values[0].clone(),
                    });
                }
            }
        }

        Ok(Self {
            key,
            operator,
            values,
        })
    }

    /// Shorthand for `key=value`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::EmptyKey`] for an empty key.
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Result<Self, SelectorError> {
        Self::new(key, LabelOperator::Equals, vec![value.into()])
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn operator(&self) -> LabelOperator {
        self.operator
    }

    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Conjunction of label requirements. Empty means "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    requirements: Vec<LabelRequirement>,
}

impl LabelSelector {
    #[must_use]
    pub fn everything() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, requirement: LabelRequirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    #[must_use]
    pub fn requirements(&self) -> &[LabelRequirement] {
        &self.requirements
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldOperator {
    Equals,
    DoubleEquals,
    NotEquals,
}

impl fmt::Display for FieldOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Equals => "=",
            Self::DoubleEquals => "==",
            Self::NotEquals => "!=",
        })
    }
}

/// One `field <op> value` term of a field selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRequirement {
    pub field: String,
    pub operator: FieldOperator,
    pub value: String,
}

impl FieldRequirement {
    #[must_use]
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: FieldOperator::Equals,
            value: value.into(),
        }
    }
}

impl fmt::Display for FieldRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.field, self.operator, self.value)
    }
}

/// Conjunction of field requirements. Empty means "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelector {
    requirements: Vec<FieldRequirement>,
}

impl FieldSelector {
    #[must_use]
    pub fn everything() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, requirement: FieldRequirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    #[must_use]
    pub fn requirements(&self) -> &[FieldRequirement] {
        &self.requirements
    }
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, requirement) in self.requirements.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{requirement}")?;
        }
        Ok(())
    }
}
