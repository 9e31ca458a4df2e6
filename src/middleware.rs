//! Middleware trait, type erasure, and the chain continuation.
//!
//! # How async middlewares are stored
//!
//! A conditional chain needs to hold middlewares of *different* concrete
//! types behind a single field, so we use trait objects (`dyn
//! ErasedMiddleware`) to hide the concrete type behind a common interface.
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! async fn auth(req: Request, next: Next) -> Response { … }  ← user writes this
//!        ↓ iff_unless.wrap(auth)
//! auth.into_boxed_middleware()                     ← Middleware blanket impl
//!        ↓
//! Arc::new(FnMiddleware(auth))                     ← heap-allocated wrapper
//!        ↓  stored as BoxedMiddleware = Arc<dyn ErasedMiddleware>
//! middleware.call(req, next)  at request time      ← one vtable dispatch
//! ```
//!
//! The only runtime cost per request is one Arc clone (atomic inc) and one
//! virtual call, negligible next to network I/O.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Pin<Box<…>>` because the runtime must be able to poll the future
/// in-place; `Send + 'static` so it can move across executor threads.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Middleware` trait's `into_boxed_middleware`
/// method. External crates cannot usefully interact with this trait.
#[doc(hidden)]
pub trait ErasedMiddleware: Send + Sync + 'static {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

/// A heap-allocated, type-erased middleware shared across concurrent
/// requests.
#[doc(hidden)]
pub type BoxedMiddleware = Arc<dyn ErasedMiddleware>;

// ── Public Middleware trait ───────────────────────────────────────────────────

/// Implemented for every valid middleware.
///
/// You rarely implement this yourself. It is automatically satisfied for any
/// `async fn` (or closure) with the signature:
///
/// ```text
/// async fn name(req: Request, next: Next) -> impl IntoResponse
/// ```
///
/// and for [`Conditional`](crate::Conditional), so a gated chain can be
/// wrapped again like any other middleware.
///
/// The trait is sealed: only the impls in this crate can satisfy it.
pub trait Middleware: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_middleware(self) -> BoxedMiddleware;
}

/// The sealing module. Because `Sealed` is private to the crate, external
/// crates cannot name it and therefore cannot implement `Middleware` on
/// their own types.
pub(crate) mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_middleware(self) -> BoxedMiddleware {
        Arc::new(FnMiddleware(self))
    }
}

/// Newtype wrapper that holds a concrete middleware `F` and implements
/// [`ErasedMiddleware`], bridging the typed world to the trait-object world.
struct FnMiddleware<F>(F);

impl<F, Fut, R> ErasedMiddleware for FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let fut = (self.0)(req, next);
        Box::pin(async move { fut.await.into_response() })
    }
}

// ── Next ─────────────────────────────────────────────────────────────────────

/// The continuation a middleware invokes to pass control onward.
///
/// Ownership of the [`Request`] moves through the chain, so the request is
/// handed to [`run`](Next::run) explicitly. A middleware that declines to
/// produce its own response forwards the request untouched:
///
/// ```rust
/// use wicket::{Next, Request, Response};
///
/// async fn passthrough(req: Request, next: Next) -> Response {
///     next.run(req).await
/// }
/// ```
#[derive(Clone)]
pub struct Next {
    tail: Arc<dyn ErasedTail>,
}

impl Next {
    /// Builds a continuation from the terminal handler of a chain, any
    /// `async fn(Request) -> impl IntoResponse`.
    pub fn new<F, Fut, R>(handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + Send + 'static,
    {
        Self { tail: Arc::new(FnTail(handler)) }
    }

    /// Passes control to the rest of the chain.
    pub fn run(self, req: Request) -> BoxFuture {
        self.tail.call(req)
    }
}

trait ErasedTail: Send + Sync + 'static {
    fn call(&self, req: Request) -> BoxFuture;
}

struct FnTail<F>(F);

impl<F, Fut, R> ErasedTail for FnTail<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
