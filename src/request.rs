//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::Method;

/// An incoming HTTP request, as seen by a middleware chain.
///
/// The embedding framework builds one per request and threads it through the
/// chain by value. Path parameters start empty; a matcher fills them in when
/// an endpoint asks for it.
pub struct Request {
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: Bytes::new(),
            params: HashMap::new(),
        }
    }

    /// Appends a header. Chainable, for construction sites.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For an endpoint `/pets/{id}` registered with parameter extraction,
    /// `req.param("id")` on `/pets/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Replaces the extracted path parameters.
    ///
    /// For [`Matcher`](crate::Matcher) implementations: called when the
    /// winning rule asks for parameter extraction. Replaces, never merges,
    /// so the map always reflects the most recent match.
    pub fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}
