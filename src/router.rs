//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. Register a path, get a
//! handler.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

enum Lookup {
    Found(BoxedHandler, HashMap<String, String>),
    MethodNotAllowed,
    NotFound,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax and are read with `req.param("name")`.
    ///
    /// # Panics
    ///
    /// Panics on a malformed or conflicting route; routes are fixed at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Put, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Delete, path, handler)
    }

    fn lookup(&self, method: Option<Method>, path: &str) -> Lookup {
        if let Some(tree) = method.and_then(|m| self.routes.get(&m)) {
            if let Ok(matched) = tree.at(path) {
                let handler = Arc::clone(matched.value);
                let params = matched.params.iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect();
                return Lookup::Found(handler, params);
            }
        }
        if self.routes.values().any(|tree| tree.at(path).is_ok()) {
            Lookup::MethodNotAllowed
        } else {
            Lookup::NotFound
        }
    }

    /// Routes one fully-buffered request and produces its response.
    ///
    /// The server calls this for every request; tests call it directly to
    /// exercise the whole application without a socket.
    pub async fn handle(&self, req: http::Request<Bytes>) -> Response {
        let (parts, body) = req.into_parts();
        let method = Method::try_from(&parts.method).ok();
        let path = parts.uri.path().to_owned();

        let response = match (method, self.lookup(method, &path)) {
            (Some(_), Lookup::Found(handler, params)) => {
                handler.call(Request::new(parts, body, params)).await
            }
            (_, Lookup::NotFound) => Response::status(Status::NotFound),
            _ => Response::status(Status::MethodNotAllowed),
        };

        debug!(
            method = method.map_or("OTHER", Method::as_str),
            path = %path,
            status = response.status_code(),
            "request"
        );
        response
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
