use async_trait::async_trait;

use apikit_security::RequestContext;

/// Admission-style check run against an object before it is written.
pub type ValidateObjectFn<T, E> = dyn Fn(&RequestContext, &T) -> Result<(), E> + Send + Sync;

/// Admission-style check run against the `(new, old)` pair of an update.
pub type ValidateObjectUpdateFn<T, E> =
    dyn Fn(&RequestContext, &T, &T) -> Result<(), E> + Send + Sync;

/// Computes the object an update should write, given what is stored now.
///
/// The dispatch layer uses this to apply patches and to check preconditions
/// against the freshly read object. Its error is propagated as is.
#[async_trait]
pub trait UpdatedObjectInfo<T, E>: Send + Sync
where
    T: 'static,
    E: 'static,
{
    async fn updated_object(&self, ctx: &RequestContext, old: &T) -> Result<T, E>;
}

/// Replaces the stored object with a fixed one (a plain PUT).
#[derive(Debug, Clone)]
pub struct DefaultUpdatedObjectInfo<T> {
    obj: T,
}

impl<T> DefaultUpdatedObjectInfo<T> {
    #[must_use]
    pub fn new(obj: T) -> Self {
        Self { obj }
    }
}

#[async_trait]
impl<T, E> UpdatedObjectInfo<T, E> for DefaultUpdatedObjectInfo<T>
where
    T: Clone + Send + Sync + 'static,
    E: 'static,
{
    async fn updated_object(&self, _ctx: &RequestContext, _old: &T) -> Result<T, E> {
        Ok(self.obj.clone())
    }
}

/// Derives the new object from the old one with a closure (a PATCH).
pub struct UpdateFn<F>(pub F);

#[async_trait]
impl<T, E, F> UpdatedObjectInfo<T, E> for UpdateFn<F>
where
    T: Send + Sync + 'static,
    E: 'static,
    F: Fn(&T) -> Result<T, E> + Send + Sync,
{
    async fn updated_object(&self, _ctx: &RequestContext, old: &T) -> Result<T, E> {
        (self.0)(old)
    }
}
