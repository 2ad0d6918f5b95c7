//! The route table.
//!
//! Routes are registered before serving begins and the table is read-only
//! afterwards, so concurrent lookups need no locking. Resolution runs in
//! two tiers: literal patterns always win over regex patterns regardless of
//! registration order, so an early catch-all regex can never shadow a more
//! specific literal route. Within a tier, the first registered match wins.

use crate::handler::RequestHandler;
use crate::pattern::{PathMatch, RoutePattern};
use http::Method;

/// The ordered collection of registered routes plus the optional fallback
/// handler consulted when nothing matches.
#[derive(Default)]
pub struct Router {
    entries: Vec<RouteEntry>,
    fallback: Option<Box<dyn RequestHandler>>,
}

/// A registered route. Entries are append-only and never mutated.
struct RouteEntry {
    method: Method,
    pattern: RoutePattern,
    handler: Box<dyn RequestHandler>,
}

/// The outcome of resolving an incoming `(method, path)` pair.
pub enum Resolution<'router> {
    /// A registered route matched; `path_match` carries its bound values.
    Route {
        handler: &'router dyn RequestHandler,
        path_match: PathMatch,
    },
    /// Nothing matched but a fallback handler is configured.
    Fallback(&'router dyn RequestHandler),
    /// Nothing matched and no fallback is configured.
    NotFound,
}

macro_rules! method_route {
    ($name:ident, $method:ident) => {
        #[doc = concat!("Registers a handler for `", stringify!($method), "` requests.")]
        pub fn $name(
            &mut self,
            pattern: impl Into<RoutePattern>,
            handler: impl RequestHandler + 'static,
        ) {
            self.register(Method::$method, pattern, handler);
        }
    };
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route. Registering the same method and pattern twice adds a
    /// second entry; the earlier one always wins at resolution time.
    pub fn register(
        &mut self,
        method: Method,
        pattern: impl Into<RoutePattern>,
        handler: impl RequestHandler + 'static,
    ) {
        self.entries.push(RouteEntry {
            method,
            pattern: pattern.into(),
            handler: Box::new(handler),
        });
    }

    method_route!(get, GET);
    method_route!(post, POST);
    method_route!(put, PUT);
    method_route!(delete, DELETE);
    method_route!(patch, PATCH);
    method_route!(head, HEAD);
    method_route!(options, OPTIONS);

    /// Sets the handler consulted when no route matches.
    pub fn set_fallback(&mut self, handler: impl RequestHandler + 'static) {
        self.fallback = Some(Box::new(handler));
    }

    /// Resolves `(method, path)` to the highest-priority matching route.
    ///
    /// Literal-pattern entries are evaluated first in registration order,
    /// then regex-pattern entries in registration order. Resolution is pure:
    /// resolving the same pair twice against an unchanged table returns the
    /// same entry.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_> {
        let method_entries = || self.entries.iter().filter(|entry| entry.method == *method);

        let literal_tier = method_entries().filter(|entry| entry.pattern.is_literal());
        let regex_tier = method_entries().filter(|entry| !entry.pattern.is_literal());

        for entry in literal_tier.chain(regex_tier) {
            if let Some(path_match) = entry.pattern.matches(path) {
                return Resolution::Route { handler: entry.handler.as_ref(), path_match };
            }
        }

        match &self.fallback {
            Some(handler) => Resolution::Fallback(handler.as_ref()),
            None => Resolution::NotFound,
        }
    }
}
