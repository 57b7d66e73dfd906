//! Cluster role binding storage backed by the native RBAC API.

use std::sync::Arc;

use apikit_meta::{CreateOptions, DeleteOptions, GetOptions, ListOptions, Status, UpdateOptions};
use apikit_registry::{
    Creater, Deleted, Getter, GracefulDeleter, Lister, Scoper, Storage, UpdatedObjectInfo,
    Updater, ValidateObjectFn, ValidateObjectUpdateFn,
};
use apikit_security::{RequestContext, UserInfo};
use async_trait::async_trait;
use authorization_sdk::{ClusterRoleBinding, ClusterRoleBindingError, ClusterRoleBindingList};
use rbac_v1_client::{ClusterRoleBindingInterface, RbacV1Client};

use crate::config::ClusterRoleBindingProxyConfig;
use crate::identity::impersonating_client;
use crate::options::{check_cluster_scoped, check_dry_run, native_list_options};
use crate::table::ClusterRoleBindingTableConvertor;
use crate::translator::{RbacTranslator, Translator};

/// Storage for cluster role bindings that holds no state of its own.
///
/// Every operation derives a client impersonating the caller, translates the
/// request to the native schema, makes exactly one native call per native
/// operation and translates the response back. Native errors are returned
/// unchanged; nothing is retried.
pub struct ClusterRoleBindingProxy<T = RbacTranslator> {
    client: Arc<dyn RbacV1Client>,
    translator: T,
    config: ClusterRoleBindingProxyConfig,
}

impl ClusterRoleBindingProxy {
    #[must_use]
    pub fn new(client: Arc<dyn RbacV1Client>, config: ClusterRoleBindingProxyConfig) -> Self {
        Self::with_translator(client, RbacTranslator, config)
    }
}

impl<T: Translator> ClusterRoleBindingProxy<T> {
    #[must_use]
    pub fn with_translator(
        client: Arc<dyn RbacV1Client>,
        translator: T,
        config: ClusterRoleBindingProxyConfig,
    ) -> Self {
        Self {
            client,
            translator,
            config,
        }
    }

    #[must_use]
    pub fn table_convertor(&self) -> ClusterRoleBindingTableConvertor {
        ClusterRoleBindingTableConvertor::new(self.config.table.max_subjects)
    }

    /// Request context bounded by the configured timeout, and a native
    /// client acting as its caller.
    fn scoped(
        &self,
        ctx: &RequestContext,
    ) -> Result<(RequestContext, Box<dyn ClusterRoleBindingInterface>), ClusterRoleBindingError>
    {
        let client =
            impersonating_client(ctx, self.client.as_ref(), self.config.forward_user_extra)?;
        let ctx = match self.config.request_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx.clone(),
        };
        Ok((ctx, client))
    }

    fn external(
        &self,
        binding: &rbac_v1_client::ClusterRoleBinding,
    ) -> Result<ClusterRoleBinding, ClusterRoleBindingError> {
        self.translator
            .to_external(binding)
            .map_err(ClusterRoleBindingError::to_external)
    }

    fn native(
        &self,
        binding: &ClusterRoleBinding,
    ) -> Result<rbac_v1_client::ClusterRoleBinding, ClusterRoleBindingError> {
        check_cluster_scoped(&binding.metadata)?;
        self.translator
            .to_native(binding)
            .map_err(ClusterRoleBindingError::to_native)
    }

    async fn list_bindings(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<ClusterRoleBindingList, ClusterRoleBindingError> {
        let (ctx, client) = self.scoped(ctx)?;
        let options = native_list_options(options)?;

        let list = ctx.run(client.list(&options)).await??;

        // One untranslatable item fails the whole list.
        let items = list
            .items
            .iter()
            .map(|b| self.external(b))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = items.len(), "listed cluster role bindings");
        Ok(ClusterRoleBindingList {
            metadata: list.metadata,
            items,
        })
    }

    async fn get_binding(
        &self,
        ctx: &RequestContext,
        name: &str,
        options: &GetOptions,
    ) -> Result<ClusterRoleBinding, ClusterRoleBindingError> {
        let (ctx, client) = self.scoped(ctx)?;
        let binding = ctx.run(client.get(name, options)).await??;
        self.external(&binding)
    }

    async fn create_binding(
        &self,
        ctx: &RequestContext,
        obj: &ClusterRoleBinding,
        options: &CreateOptions,
    ) -> Result<ClusterRoleBinding, ClusterRoleBindingError> {
        let (ctx, client) = self.scoped(ctx)?;
        check_dry_run(&options.dry_run)?;
        let binding = self.native(obj)?;

        let created = ctx.run(client.create(&binding, options)).await??;
        self.external(&created)
    }

    async fn update_binding(
        &self,
        ctx: &RequestContext,
        name: &str,
        obj_info: &dyn UpdatedObjectInfo<ClusterRoleBinding, ClusterRoleBindingError>,
        options: &UpdateOptions,
    ) -> Result<ClusterRoleBinding, ClusterRoleBindingError> {
        let (ctx, client) = self.scoped(ctx)?;
        check_dry_run(&options.dry_run)?;

        let current = ctx.run(client.get(name, &GetOptions::default())).await??;
        let old = self.external(&current)?;

        let mut new = ctx.run(obj_info.updated_object(&ctx, &old)).await??;
        if new.metadata.name.is_empty() {
            new.metadata.name = name.to_owned();
        } else if new.metadata.name != name {
            return Err(ClusterRoleBindingError::invalid_argument(format!(
                "the name of the object ({}) does not match the name on the URL ({name})",
                new.metadata.name
            )));
        }
        let binding = self.native(&new)?;

        // The native update enforces the resource version; its response is
        // what gets returned, with no read after the write.
        let updated = ctx.run(client.update(&binding, options)).await??;
        self.external(&updated)
    }

    async fn delete_binding(
        &self,
        ctx: &RequestContext,
        name: &str,
        options: &DeleteOptions,
    ) -> Result<(), ClusterRoleBindingError> {
        let (ctx, client) = self.scoped(ctx)?;
        check_dry_run(&options.dry_run)?;
        ctx.run(client.delete(name, options)).await??;
        Ok(())
    }
}

fn user_name(ctx: &RequestContext) -> Option<&str> {
    ctx.user().map(UserInfo::name)
}

/// Log a failed operation once, at a level matching who is at fault, and
/// hand the error back unchanged.
fn log_and_pass(op: &str, e: ClusterRoleBindingError) -> ClusterRoleBindingError {
    match &e {
        ClusterRoleBindingError::Native(native) => tracing::debug!(
            operation = op,
            reason = %native.reason,
            code = native.code,
            error = %native,
            "native cluster role binding call failed"
        ),
        ClusterRoleBindingError::Cancelled | ClusterRoleBindingError::DeadlineExceeded => {
            tracing::debug!(operation = op, error = %e, "cluster role binding request interrupted");
        }
        ClusterRoleBindingError::Internal(_) => {
            tracing::error!(operation = op, error = %e, "cluster role binding request failed");
        }
        ClusterRoleBindingError::Unauthorized(_)
        | ClusterRoleBindingError::InvalidArgument(_)
        | ClusterRoleBindingError::Translation { .. } => {
            tracing::warn!(operation = op, error = %e, "cluster role binding request rejected");
        }
    }
    e
}

impl<T: Translator> Storage for ClusterRoleBindingProxy<T> {
    type Object = ClusterRoleBinding;
    type Error = ClusterRoleBindingError;

    fn new_object(&self) -> ClusterRoleBinding {
        ClusterRoleBinding::default()
    }

    fn destroy(&self) {}
}

impl<T> Scoper for ClusterRoleBindingProxy<T> {
    fn namespace_scoped(&self) -> bool {
        false
    }
}

#[async_trait]
impl<T: Translator> Lister for ClusterRoleBindingProxy<T> {
    type List = ClusterRoleBindingList;

    fn new_list(&self) -> ClusterRoleBindingList {
        ClusterRoleBindingList::default()
    }

    #[tracing::instrument(skip_all, fields(operation = "list", user = user_name(ctx)))]
    async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<ClusterRoleBindingList, ClusterRoleBindingError> {
        self.list_bindings(ctx, options)
            .await
            .map_err(|e| log_and_pass("list", e))
    }
}

#[async_trait]
impl<T: Translator> Getter for ClusterRoleBindingProxy<T> {
    #[tracing::instrument(skip_all, fields(operation = "get", name = %name, user = user_name(ctx)))]
    async fn get(
        &self,
        ctx: &RequestContext,
        name: &str,
        options: &GetOptions,
    ) -> Result<ClusterRoleBinding, ClusterRoleBindingError> {
        self.get_binding(ctx, name, options)
            .await
            .map_err(|e| log_and_pass("get", e))
    }
}

#[async_trait]
impl<T: Translator> Creater for ClusterRoleBindingProxy<T> {
    /// `validate` is not run; admission happens before storage is reached.
    #[tracing::instrument(
        skip_all,
        fields(operation = "create", name = %obj.metadata.name, user = user_name(ctx))
    )]
    async fn create(
        &self,
        ctx: &RequestContext,
        obj: ClusterRoleBinding,
        _validate: Option<&ValidateObjectFn<ClusterRoleBinding, ClusterRoleBindingError>>,
        options: &CreateOptions,
    ) -> Result<ClusterRoleBinding, ClusterRoleBindingError> {
        self.create_binding(ctx, &obj, options)
            .await
            .map_err(|e| log_and_pass("create", e))
    }
}

#[async_trait]
impl<T: Translator> Updater for ClusterRoleBindingProxy<T> {
    /// Never creates: the returned flag is always `false` and
    /// `force_allow_create` is ignored. Neither validation callback is run.
    #[tracing::instrument(skip_all, fields(operation = "update", name = %name, user = user_name(ctx)))]
    async fn update(
        &self,
        ctx: &RequestContext,
        name: &str,
        obj_info: &dyn UpdatedObjectInfo<ClusterRoleBinding, ClusterRoleBindingError>,
        _validate: Option<&ValidateObjectFn<ClusterRoleBinding, ClusterRoleBindingError>>,
        _validate_update: Option<
            &ValidateObjectUpdateFn<ClusterRoleBinding, ClusterRoleBindingError>,
        >,
        _force_allow_create: bool,
        options: &UpdateOptions,
    ) -> Result<(ClusterRoleBinding, bool), ClusterRoleBindingError> {
        self.update_binding(ctx, name, obj_info, options)
            .await
            .map(|updated| (updated, false))
            .map_err(|e| log_and_pass("update", e))
    }
}

#[async_trait]
impl<T: Translator> GracefulDeleter for ClusterRoleBindingProxy<T> {
    /// Deletion is immediate; the result is always the success status and
    /// `true`. `validate` is not run.
    #[tracing::instrument(skip_all, fields(operation = "delete", name = %name, user = user_name(ctx)))]
    async fn delete(
        &self,
        ctx: &RequestContext,
        name: &str,
        _validate: Option<&ValidateObjectFn<ClusterRoleBinding, ClusterRoleBindingError>>,
        options: &DeleteOptions,
    ) -> Result<(Deleted<ClusterRoleBinding>, bool), ClusterRoleBindingError> {
        self.delete_binding(ctx, name, options)
            .await
            .map(|()| (Deleted::Status(Status::success()), true))
            .map_err(|e| log_and_pass("delete", e))
    }
}
