//! Request dispatch.
//!
//! The dispatcher owns the router-context for one running instance: the
//! route table, the middleware pipeline and the fallback handler. All
//! registration happens before serving begins; afterwards the context is
//! read-only and [`Dispatcher::handle`] can be called from any number of
//! concurrent tasks.

use crate::middleware::{Middleware, MiddlewarePipeline};
use crate::pattern::PathMatch;
use crate::request::{NormalizedRequest, RawRequest};
use crate::response::ResponseDescriptor;
use crate::router::{Resolution, Router};
use std::sync::Arc;
use tracing::error;

/// Orchestrates one request: normalization, route resolution, handler
/// invocation and the middleware pipeline.
pub struct Dispatcher {
    router: Router,
    pipeline: MiddlewarePipeline,
}

impl Dispatcher {
    pub fn new(router: Router) -> Self {
        Self { router, pipeline: MiddlewarePipeline::new() }
    }

    /// Appends a middleware to the pipeline.
    pub fn register_middleware(&mut self, middleware: impl Middleware + 'static) {
        self.pipeline.register(middleware);
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Handles one request through to a response descriptor.
    ///
    /// Route matching itself never suspends; the handler invocation and
    /// every middleware stage are awaited in sequence. Failures are
    /// per-request: a failing handler or middleware yields the fixed
    /// server-error descriptor and is logged, never propagated. An
    /// unmatched request without a fallback yields the fixed not-found
    /// descriptor, which does not pass through the middleware pipeline; a
    /// fallback's output does.
    pub async fn handle(&self, raw: RawRequest) -> ResponseDescriptor {
        let (handler, path_match) = match self.router.resolve(raw.method(), raw.path()) {
            Resolution::Route { handler, path_match } => (handler, path_match),
            Resolution::Fallback(handler) => (handler, PathMatch::empty()),
            Resolution::NotFound => return ResponseDescriptor::not_found(),
        };

        let req = Arc::new(NormalizedRequest::new(raw, path_match));

        let value = match handler.invoke(Arc::clone(&req)).await {
            Ok(value) => value,
            Err(e) => {
                error!("handler failed for {} {}: {e}", req.method(), req.path());
                return ResponseDescriptor::server_error();
            }
        };

        let value = match self.pipeline.apply(value, &req).await {
            Ok(value) => value,
            Err(e) => {
                error!("middleware failed for {} {}: {e}", req.method(), req.path());
                return ResponseDescriptor::server_error();
            }
        };

        value.finish()
    }
}
