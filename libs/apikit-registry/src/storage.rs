use async_trait::async_trait;

use apikit_meta::{CreateOptions, DeleteOptions, GetOptions, ListOptions, Status, UpdateOptions};
use apikit_security::RequestContext;

use crate::update::{UpdatedObjectInfo, ValidateObjectFn, ValidateObjectUpdateFn};

/// Base of every storage capability.
pub trait Storage: Send + Sync {
    type Object: Send + Sync + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Zero value of the stored object, used by decoding layers.
    fn new_object(&self) -> Self::Object;

    /// Release resources held by the storage. Called once on shutdown.
    fn destroy(&self) {}
}

pub trait Scoper {
    /// `false` for cluster-scoped resources: requests carry no namespace
    /// path segment.
    fn namespace_scoped(&self) -> bool;
}

#[async_trait]
pub trait Lister: Storage {
    type List: Send + 'static;

    /// Empty list value, used by decoding layers.
    fn new_list(&self) -> Self::List;

    async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Self::List, Self::Error>;
}

#[async_trait]
pub trait Getter: Storage {
    async fn get(
        &self,
        ctx: &RequestContext,
        name: &str,
        options: &GetOptions,
    ) -> Result<Self::Object, Self::Error>;
}

#[async_trait]
pub trait Creater: Storage {
    async fn create(
        &self,
        ctx: &RequestContext,
        obj: Self::Object,
        validate: Option<&ValidateObjectFn<Self::Object, Self::Error>>,
        options: &CreateOptions,
    ) -> Result<Self::Object, Self::Error>;
}

#[async_trait]
pub trait Updater: Storage {
    /// Returns the stored object and whether it was created by this call.
    #[allow(clippy::too_many_arguments)]
    async fn update(
        &self,
        ctx: &RequestContext,
        name: &str,
        obj_info: &dyn UpdatedObjectInfo<Self::Object, Self::Error>,
        validate: Option<&ValidateObjectFn<Self::Object, Self::Error>>,
        validate_update: Option<&ValidateObjectUpdateFn<Self::Object, Self::Error>>,
        force_allow_create: bool,
        options: &UpdateOptions,
    ) -> Result<(Self::Object, bool), Self::Error>;
}

/// What a delete hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deleted<T> {
    /// Generic status; the object is gone and is not echoed back.
    Status(Status),
    /// The object as it was at deletion (or as staged for deletion).
    Object(T),
}

#[async_trait]
pub trait GracefulDeleter: Storage {
    /// Returns the delete result and whether the object was removed
    /// immediately (`false` means deletion was only staged).
    async fn delete(
        &self,
        ctx: &RequestContext,
        name: &str,
        validate: Option<&ValidateObjectFn<Self::Object, Self::Error>>,
        options: &DeleteOptions,
    ) -> Result<(Deleted<Self::Object>, bool), Self::Error>;
}

/// Full CRUD storage without watch support.
pub trait StandardStorage:
    Scoper + Lister + Getter + Creater + Updater + GracefulDeleter
{
}

impl<S> StandardStorage for S where
    S: Scoper + Lister + Getter + Creater + Updater + GracefulDeleter
{
}
