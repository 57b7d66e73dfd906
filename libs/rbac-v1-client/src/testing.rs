//! In-memory native API for tests.
//!
//! [`FakeRbacClient`] behaves like the native API for the cases the proxy
//! relies on (not-found, already-exists, stale resource versions, delete
//! preconditions, per-user denial) and records every call it receives
//! together with the identity it was made as.

#![allow(clippy::missing_panics_doc)]

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use apikit_meta::{
    CreateOptions, DRY_RUN_ALL, DeleteOptions, GetOptions, ListMeta, StatusReason, UpdateOptions,
    v1,
};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::api::{ClusterRoleBindingInterface, RbacV1Client};
use crate::error::ApiError;
use crate::impersonation::{Impersonation, ImpersonationError};
use crate::models::{ClusterRoleBinding, ClusterRoleBindingList};

/// One call received by the fake, tagged with the impersonated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCall {
    List {
        user: String,
        options: v1::ListOptions,
    },
    Get {
        user: String,
        name: String,
    },
    Create {
        user: String,
        name: String,
    },
    Update {
        user: String,
        name: String,
        resource_version: Option<String>,
    },
    Delete {
        user: String,
        name: String,
        options: DeleteOptions,
    },
}

impl NativeCall {
    #[must_use]
    pub fn user(&self) -> &str {
        match self {
            Self::List { user, .. }
            | Self::Get { user, .. }
            | Self::Create { user, .. }
            | Self::Update { user, .. }
            | Self::Delete { user, .. } => user,
        }
    }
}

#[derive(Default)]
struct FakeState {
    objects: BTreeMap<String, ClusterRoleBinding>,
    revision: u64,
    uid_seq: u64,
    calls: Vec<NativeCall>,
    completed: usize,
    impersonations: Vec<Impersonation>,
    denied: BTreeSet<String>,
    injected: VecDeque<ApiError>,
    latency: Option<Duration>,
}

impl FakeState {
    fn next_revision(&mut self) -> String {
        self.revision += 1;
        self.revision.to_string()
    }

    fn next_uid(&mut self) -> String {
        self.uid_seq += 1;
        format!("uid-{}", self.uid_seq)
    }
}

/// Privileged fake client; clones share state.
#[derive(Clone, Default)]
pub struct FakeRbacClient {
    state: Arc<Mutex<FakeState>>,
}

impl FakeRbacClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `binding` as is, assigning a uid and resource version.
    /// The object is not validated, so tests can seed shapes the proxy
    /// cannot translate.
    pub fn insert(&self, mut binding: ClusterRoleBinding) {
        let mut state = self.state.lock();
        binding.metadata.uid = Some(state.next_uid());
        binding.metadata.resource_version = Some(state.next_revision());
        state
            .objects
            .insert(binding.metadata.name.clone(), binding);
    }

    /// Every call made as `user` fails with `Forbidden`.
    pub fn deny(&self, user: &str) {
        self.state.lock().denied.insert(user.to_owned());
    }

    /// The next call fails with `err` (after being recorded).
    pub fn fail_next(&self, err: ApiError) {
        self.state.lock().injected.push_back(err);
    }

    /// Delay every call by `latency` before it takes effect.
    pub fn set_latency(&self, latency: Duration) {
        self.state.lock().latency = Some(latency);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<NativeCall> {
        self.state.lock().calls.clone()
    }

    /// Calls that ran to completion (were not dropped mid-flight).
    #[must_use]
    pub fn completed_calls(&self) -> usize {
        self.state.lock().completed
    }

    #[must_use]
    pub fn impersonations(&self) -> Vec<Impersonation> {
        self.state.lock().impersonations.clone()
    }

    #[must_use]
    pub fn stored(&self, name: &str) -> Option<ClusterRoleBinding> {
        self.state.lock().objects.get(name).cloned()
    }
}

impl RbacV1Client for FakeRbacClient {
    fn cluster_role_bindings_as(
        &self,
        impersonation: Impersonation,
    ) -> Result<Box<dyn ClusterRoleBindingInterface>, ImpersonationError> {
        impersonation.headers()?;
        let user = impersonation.user.clone();
        self.state.lock().impersonations.push(impersonation);
        Ok(Box::new(FakeClusterRoleBindings {
            user,
            state: self.state.clone(),
        }))
    }
}

struct FakeClusterRoleBindings {
    user: String,
    state: Arc<Mutex<FakeState>>,
}

impl FakeClusterRoleBindings {
    /// Record the call, wait out the latency, then apply denial and
    /// injected failures.
    async fn admit(&self, call: NativeCall, verb: &str, name: Option<&str>) -> Result<(), ApiError> {
        let latency = {
            let mut state = self.state.lock();
            state.calls.push(call);
            state.latency
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.lock();
        state.completed += 1;
        if state.denied.contains(&self.user) {
            return Err(ApiError::forbidden(&self.user, verb, name));
        }
        match state.injected.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn is_dry_run(dry_run: &[String]) -> bool {
    dry_run.iter().any(|v| v == DRY_RUN_ALL)
}

fn matches_field_selector(selector: Option<&str>, binding: &ClusterRoleBinding) -> bool {
    let Some(selector) = selector else {
        return true;
    };
    selector.split(',').filter(|t| !t.is_empty()).all(|term| {
        if let Some(value) = term.strip_prefix("metadata.name!=") {
            binding.metadata.name != value
        } else if let Some(value) = term
            .strip_prefix("metadata.name==")
            .or_else(|| term.strip_prefix("metadata.name="))
        {
            binding.metadata.name == value
        } else {
            false
        }
    })
}

#[async_trait]
impl ClusterRoleBindingInterface for FakeClusterRoleBindings {
    async fn list(&self, options: &v1::ListOptions) -> Result<ClusterRoleBindingList, ApiError> {
        let call = NativeCall::List {
            user: self.user.clone(),
            options: options.clone(),
        };
        self.admit(call, "list", None).await?;

        let state = self.state.lock();
        let mut matching: Vec<ClusterRoleBinding> = state
            .objects
            .values()
            .filter(|b| {
                options
                    .continue_token
                    .as_ref()
                    .is_none_or(|after| b.metadata.name > *after)
            })
            .filter(|b| matches_field_selector(options.field_selector.as_deref(), b))
            .cloned()
            .collect();

        let mut continue_token = None;
        if let Some(limit) = options.limit.and_then(|l| usize::try_from(l).ok())
            && limit > 0
            && matching.len() > limit
        {
            matching.truncate(limit);
            continue_token = matching.last().map(|b| b.metadata.name.clone());
        }

        Ok(ClusterRoleBindingList {
            metadata: ListMeta {
                resource_version: Some(state.revision.to_string()),
                continue_token,
                remaining_item_count: None,
            },
            items: matching,
        })
    }

    async fn get(&self, name: &str, _options: &GetOptions) -> Result<ClusterRoleBinding, ApiError> {
        let call = NativeCall::Get {
            user: self.user.clone(),
            name: name.to_owned(),
        };
        self.admit(call, "get", Some(name)).await?;

        self.state
            .lock()
            .objects
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::not_found(name))
    }

    async fn create(
        &self,
        binding: &ClusterRoleBinding,
        options: &CreateOptions,
    ) -> Result<ClusterRoleBinding, ApiError> {
        let name = binding.metadata.name.clone();
        let call = NativeCall::Create {
            user: self.user.clone(),
            name: name.clone(),
        };
        self.admit(call, "create", Some(&name)).await?;

        if name.is_empty() {
            return Err(ApiError::new(
                StatusReason::Invalid,
                "metadata.name: Required value",
            ));
        }

        let mut state = self.state.lock();
        if state.objects.contains_key(&name) {
            return Err(ApiError::already_exists(&name));
        }

        let mut created = binding.clone();
        created.metadata.uid = Some(state.next_uid());
        created.metadata.resource_version = Some(state.next_revision());
        if !is_dry_run(&options.dry_run) {
            state.objects.insert(name, created.clone());
        }
        Ok(created)
    }

    async fn update(
        &self,
        binding: &ClusterRoleBinding,
        options: &UpdateOptions,
    ) -> Result<ClusterRoleBinding, ApiError> {
        let name = binding.metadata.name.clone();
        let call = NativeCall::Update {
            user: self.user.clone(),
            name: name.clone(),
            resource_version: binding.metadata.resource_version.clone(),
        };
        self.admit(call, "update", Some(&name)).await?;

        let mut state = self.state.lock();
        let Some(current) = state.objects.get(&name).cloned() else {
            return Err(ApiError::not_found(&name));
        };
        if binding
            .metadata
            .resource_version
            .as_ref()
            .is_some_and(|rv| Some(rv) != current.metadata.resource_version.as_ref())
        {
            return Err(ApiError::conflict(
                &name,
                "the object has been modified; please apply your changes to the latest version and try again",
            ));
        }

        let mut updated = binding.clone();
        updated.metadata.uid = current.metadata.uid;
        updated.metadata.creation_timestamp = current.metadata.creation_timestamp;
        updated.metadata.resource_version = Some(state.next_revision());
        if !is_dry_run(&options.dry_run) {
            state.objects.insert(name, updated.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, name: &str, options: &DeleteOptions) -> Result<(), ApiError> {
        let call = NativeCall::Delete {
            user: self.user.clone(),
            name: name.to_owned(),
            options: options.clone(),
        };
        self.admit(call, "delete", Some(name)).await?;

        let mut state = self.state.lock();
        let Some(current) = state.objects.get(name) else {
            return Err(ApiError::not_found(name));
        };

        if let Some(pre) = &options.preconditions {
            if let Some(uid) = &pre.uid
                && current.metadata.uid.as_ref() != Some(uid)
            {
                return Err(ApiError::conflict(
                    name,
                    &format!(
                        "Precondition failed: UID in precondition: {uid}, UID in object meta: {}",
                        current.metadata.uid.as_deref().unwrap_or_default()
                    ),
                ));
            }
            if let Some(rv) = &pre.resource_version
                && current.metadata.resource_version.as_ref() != Some(rv)
            {
                return Err(ApiError::conflict(
                    name,
                    &format!(
                        "Precondition failed: ResourceVersion in precondition: {rv}, ResourceVersion in object meta: {}",
                        current.metadata.resource_version.as_deref().unwrap_or_default()
                    ),
                ));
            }
        }

        if !is_dry_run(&options.dry_run) {
            state.objects.remove(name);
        }
        Ok(())
    }
}
