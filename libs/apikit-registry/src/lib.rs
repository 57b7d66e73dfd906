//! Resource storage contract.
//!
//! A storage implementation declares what it can do by implementing a subset
//! of small capability traits:
//!
//! - [`Storage`] - object type, error type, zero-value constructor
//! - [`Scoper`] - whether the resource lives in a namespace
//! - [`Lister`], [`Getter`], [`Creater`], [`Updater`], [`GracefulDeleter`]
//!
//! [`StandardStorage`] is implemented automatically for anything that has
//! all of them, so conformance is checked at compile time:
//!
//! ```ignore
//! fn assert_standard<S: StandardStorage>() {}
//! assert_standard::<MyStorage>();
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod storage;
pub mod table;
pub mod update;

pub use storage::{
    Creater, Deleted, Getter, GracefulDeleter, Lister, Scoper, StandardStorage, Storage, Updater,
};
pub use table::{Table, TableColumnDefinition, TableConvertor, TableOptions, TableRow};
pub use update::{
    DefaultUpdatedObjectInfo, UpdateFn, UpdatedObjectInfo, ValidateObjectFn,
    ValidateObjectUpdateFn,
};
