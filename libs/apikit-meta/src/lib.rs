//! API machinery shared by the proxy and the native RBAC client.
//!
//! - [`ObjectMeta`], [`ListMeta`] - metadata carried by every object and list
//! - [`Status`] - API status object, used both as the success marker and as
//!   the normalized form of errors
//! - [`options`] - request options in their internal (parsed) form and in the
//!   `v1` wire form understood by the native API
//! - [`selector`] - label and field selectors
//! - [`convert_list_options`] - internal to `v1` list option conversion
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod convert;
pub mod meta;
pub mod options;
pub mod selector;
pub mod status;

pub use convert::{ConversionError, convert_list_options};
pub use meta::{ListMeta, ObjectMeta};
pub use options::{
    CreateOptions, DRY_RUN_ALL, DeleteOptions, GetOptions, ListOptions, Preconditions,
    PropagationPolicy, ResourceVersionMatch, UpdateOptions, unsupported_dry_run, v1,
};
pub use selector::{
    FieldOperator, FieldRequirement, FieldSelector, LabelOperator, LabelRequirement,
    LabelSelector, SelectorError,
};
pub use status::{Status, StatusDetails, StatusOutcome, StatusReason};
