//! Request handlers.

use crate::request::NormalizedRequest;
use crate::responder::Responder;
use crate::response::ResponseValue;
use async_trait::async_trait;
use std::error::Error;
use std::future::Future;
use std::sync::Arc;

/// The boxed error type a handler or middleware may fail with. Failures are
/// surfaced by the dispatcher as a server-error response, never as a crash.
pub type HandlerError = Box<dyn Error + Send + Sync>;

/// A route or fallback handler.
///
/// Handlers may suspend; the dispatcher awaits the invocation before running
/// the middleware pipeline.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke(&self, req: Arc<NormalizedRequest>) -> Result<ResponseValue, HandlerError>;
}

/// A [`RequestHandler`] backed by an async function, see [`handler_fn`].
pub struct FnHandler<F> {
    f: F,
}

/// Wraps an async function into a [`RequestHandler`]. The function's return
/// value is converted through [`Responder`], so handlers can return plain
/// strings, JSON values, response values or `Result`s of those.
pub fn handler_fn<F, Fut, R>(f: F) -> FnHandler<F>
where
    F: Fn(Arc<NormalizedRequest>) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send,
    R: Responder,
{
    FnHandler { f }
}

#[async_trait]
impl<F, Fut, R> RequestHandler for FnHandler<F>
where
    F: Fn(Arc<NormalizedRequest>) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send,
    R: Responder,
{
    async fn invoke(&self, req: Arc<NormalizedRequest>) -> Result<ResponseValue, HandlerError> {
        (self.f)(req).await.respond()
    }
}

#[cfg(test)]
mod tests {
    use super::{RequestHandler, handler_fn};
    use crate::pattern::PathMatch;
    use crate::request::{NormalizedRequest, RawRequest};
    use http::{Method, StatusCode};
    use std::sync::Arc;

    fn request() -> Arc<NormalizedRequest> {
        Arc::new(NormalizedRequest::new(
            RawRequest::new(Method::GET, "/"),
            PathMatch::empty(),
        ))
    }

    #[tokio::test]
    async fn string_return_becomes_content() {
        let handler = handler_fn(|_req| async { "Hello, World!".to_string() });

        let value = handler.invoke(request()).await.unwrap();
        assert_eq!(value.content(), Some("Hello, World!"));
        assert_eq!(value.status(), None);
    }

    #[tokio::test]
    async fn handlers_can_read_the_request() {
        let handler = handler_fn(|req| async move { req.path().to_string() });

        let value = handler.invoke(request()).await.unwrap();
        assert_eq!(value.content(), Some("/"));
    }

    #[tokio::test]
    async fn result_err_propagates() {
        let handler = handler_fn(|_req| async {
            Err::<String, std::io::Error>(std::io::Error::other("boom"))
        });

        assert!(handler.invoke(request()).await.is_err());
    }

    #[tokio::test]
    async fn status_tuple_sets_status() {
        let handler = handler_fn(|_req| async { (StatusCode::CREATED, "made") });

        let value = handler.invoke(request()).await.unwrap();
        assert_eq!(value.status(), Some(StatusCode::CREATED));
        assert_eq!(value.content(), Some("made"));
    }
}
