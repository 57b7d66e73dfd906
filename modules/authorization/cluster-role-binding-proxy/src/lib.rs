//! Cluster role binding proxy
//!
//! Serves cluster role bindings by forwarding every request to the native
//! `rbac.authorization.k8s.io/v1` API, impersonating the caller:
//!
//! - [`ClusterRoleBindingProxy`] - the storage (list, get, create, update,
//!   delete), implementing the `apikit_registry` capability traits
//! - [`Translator`], [`RbacTranslator`] - schema translation in both directions
//! - [`impersonating_client`] - per-request, caller-scoped native client
//! - [`ClusterRoleBindingTableConvertor`] - table rendering for CLI clients
//! - [`ClusterRoleBindingProxyConfig`] - configuration
//!
//! ## Usage
//!
//! ```ignore
//! let proxy = ClusterRoleBindingProxy::new(base_client, ClusterRoleBindingProxyConfig::load(path)?);
//!
//! let bindings = proxy.list(&ctx, &ListOptions::default()).await?;
//! let (status, immediate) = proxy.delete(&ctx, "ops", None, &DeleteOptions::default()).await?;
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod identity;
pub mod options;
pub mod proxy;
pub mod table;
pub mod translator;

pub use config::{ClusterRoleBindingProxyConfig, TableConfig};
pub use identity::impersonating_client;
pub use proxy::ClusterRoleBindingProxy;
pub use table::ClusterRoleBindingTableConvertor;
pub use translator::{RbacTranslator, Translator};
