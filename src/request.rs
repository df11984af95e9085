//! Incoming HTTP request type.
//!
//! The body is collected in full before a handler runs, so handlers see a
//! plain byte slice and never touch hyper's streaming body.

use std::collections::HashMap;

use bytes::Bytes;
use http::HeaderMap;
use url::form_urlencoded;

pub struct Request {
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        parts: http::request::Parts,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        Self {
            query: parts.uri.query().map(str::to_owned),
            headers: parts.headers,
            body,
            params,
        }
    }

    pub fn body(&self) -> &[u8] { &self.body }

    /// Header lookup. Names are case-insensitive; non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/cars/{id}`, `req.param("id")` on `/cars/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// First value of a percent-decoded query-string parameter.
    pub fn query(&self, key: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// True when the body is an HTML form post.
    pub fn is_form(&self) -> bool {
        self.header("content-type")
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
    }
}
