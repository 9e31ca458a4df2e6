//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! A middleware either produces a [`Response`] itself or forwards the one the
//! rest of the chain produced. Serialization to the wire is the embedding
//! framework's job; this type only carries status, headers, and body bytes.

use bytes::Bytes;

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK, no custom headers needed)
///
/// ```rust
/// use wicket::Response;
///
/// Response::json(br#"{"id":1}"#.as_slice());
/// Response::text("hello");
/// Response::status(204);
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use wicket::Response;
///
/// Response::builder()
///     .status(201)
///     .header("location", "/users/42")
///     .json(br#"{"id":42}"#.as_slice());
/// ```
pub struct Response {
    body: Bytes,
    headers: Vec<(String, String)>,
    status: u16,
}

impl Response {
    /// `200 OK`, `application/json`.
    pub fn json(body: impl Into<Bytes>) -> Self {
        Self::bytes_raw("application/json", body.into())
    }

    /// `200 OK`, `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::bytes_raw("text/plain; charset=utf-8", Bytes::from(body.into().into_bytes()))
    }

    /// Response with no body.
    pub fn status(code: u16) -> Self {
        Self { body: Bytes::new(), headers: Vec::new(), status: code }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: 200 }
    }

    pub fn code(&self) -> u16 { self.status }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    fn bytes_raw(content_type: &str, body: Bytes) -> Self {
        Self {
            body,
            headers: vec![("content-type".to_owned(), content_type.to_owned())],
            status: 200,
        }
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200`. Terminated by a
/// typed body method.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: u16,
}

impl ResponseBuilder {
    pub fn status(mut self, code: u16) -> Self {
        self.status = code;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: impl Into<Bytes>) -> Response {
        self.finish("application/json", body.into())
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish("text/plain; charset=utf-8", Bytes::from(body.into().into_bytes()))
    }

    /// Terminate with no body.
    pub fn no_body(self) -> Response {
        Response { body: Bytes::new(), headers: self.headers, status: self.status }
    }

    fn finish(self, content_type: &str, body: Bytes) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.to_owned())];
        headers.extend(self.headers);
        Response { body, headers, status: self.status }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from a middleware.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Return a bare status code from a middleware: `return 404`.
impl IntoResponse for u16 {
    fn into_response(self) -> Response { Response::status(self) }
}
