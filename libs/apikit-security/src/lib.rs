#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod context;
pub mod user;

pub use context::{Interrupted, RequestContext, RequestContextBuilder};
pub use user::UserInfo;
