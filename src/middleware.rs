//! The response middleware pipeline.
//!
//! Middlewares reshape the accumulated response value after a handler (or
//! the fallback) has produced it. They compose left-to-right in
//! registration order: each one receives the previous one's output together
//! with the request, and returns the next accumulated value. Middlewares
//! never see the matched route and cannot short-circuit dispatch.

use crate::handler::HandlerError;
use crate::request::NormalizedRequest;
use crate::response::ResponseValue;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// A response-transforming middleware. Stages may suspend; the pipeline
/// awaits each stage before running the next.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn transform(
        &self,
        value: ResponseValue,
        req: Arc<NormalizedRequest>,
    ) -> Result<ResponseValue, HandlerError>;
}

/// A [`Middleware`] backed by an async function, see [`middleware_fn`].
pub struct FnMiddleware<F> {
    f: F,
}

/// Wraps an async function into a [`Middleware`].
pub fn middleware_fn<F, Fut>(f: F) -> FnMiddleware<F>
where
    F: Fn(ResponseValue, Arc<NormalizedRequest>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ResponseValue, HandlerError>> + Send,
{
    FnMiddleware { f }
}

#[async_trait]
impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(ResponseValue, Arc<NormalizedRequest>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ResponseValue, HandlerError>> + Send,
{
    async fn transform(
        &self,
        value: ResponseValue,
        req: Arc<NormalizedRequest>,
    ) -> Result<ResponseValue, HandlerError> {
        (self.f)(value, req).await
    }
}

/// The ordered middleware list applied to every dispatched response.
#[derive(Default)]
pub struct MiddlewarePipeline {
    middlewares: Vec<Box<dyn Middleware>>,
}

impl MiddlewarePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware. Registration order is application order.
    pub fn register(&mut self, middleware: impl Middleware + 'static) {
        self.middlewares.push(Box::new(middleware));
    }

    /// Folds `value` through every middleware in registration order,
    /// awaiting each stage. The first failing stage aborts the fold.
    pub async fn apply(
        &self,
        mut value: ResponseValue,
        req: &Arc<NormalizedRequest>,
    ) -> Result<ResponseValue, HandlerError> {
        for middleware in &self.middlewares {
            value = middleware.transform(value, Arc::clone(req)).await?;
        }
        Ok(value)
    }
}
