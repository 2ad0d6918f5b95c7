//! A minimal in-process HTTP request router.
//!
//! The crate consumes an already-parsed request (method, path, raw query
//! string, headers, body bytes) from a transport collaborator and produces a
//! materialized response descriptor for it to serialize. In between sit the
//! pieces with actual behavior:
//!
//! - [`RoutePattern`]: literal, `:param` and regex path matching
//! - [`Router`]: the ordered route table with tiered resolution (literal
//!   routes always beat regex routes) and an optional fallback handler
//! - [`NormalizedRequest`]: the canonical per-request view with the query
//!   decoded and the body parsed (JSON and `multipart/form-data`)
//! - [`MiddlewarePipeline`]: ordered response transforms folded over the
//!   handler's return value
//! - [`Dispatcher`]: orchestrates one request through all of the above
//!
//! ```
//! use micro_router::{Dispatcher, RawRequest, Router, handler_fn};
//! use http::Method;
//!
//! # async fn run() {
//! let mut router = Router::new();
//! router.get("/api/:action", handler_fn(|req| async move {
//!     req.param("action").unwrap_or_default().to_string()
//! }));
//!
//! let dispatcher = Dispatcher::new(router);
//! let response = dispatcher.handle(RawRequest::new(Method::GET, "/api/hello")).await;
//! assert_eq!(response.body_text(), "hello");
//! # }
//! ```

mod body;
mod dispatcher;
mod error;
mod handler;
mod middleware;
mod multipart;
mod pattern;
mod query;
mod request;
mod responder;
mod response;
mod router;

pub use body::BodyValue;
pub use dispatcher::Dispatcher;
pub use error::BodyParseError;
pub use handler::{FnHandler, HandlerError, RequestHandler, handler_fn};
pub use middleware::{FnMiddleware, Middleware, MiddlewarePipeline, middleware_fn};
pub use multipart::{FormValue, MultipartError};
pub use pattern::{PathMatch, RoutePattern};
pub use query::decode_query;
pub use request::{NormalizedRequest, RawRequest};
pub use responder::Responder;
pub use response::{ResponseDescriptor, ResponseValue};
pub use router::{Resolution, Router};
