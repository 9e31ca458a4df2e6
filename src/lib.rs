//! # wicket
//!
//! Conditional execution for async middleware. Run iff. Skip unless.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! Your framework owns the server, the routing table, and the middleware
//! chain. wicket owns one decision: *does this middleware run for this
//! request?* You wrap a middleware once, then chain `.iff(...)` and
//! `.unless(...)` calls; each produces a new wrapped middleware that gates
//! the previous one. Conditions are route matches (method + path pattern +
//! optional `accept-version` constraint, resolved through a [`matchit`]
//! radix tree) or any predicate over the request.
//!
//! What wicket does:
//!
//! - **Endpoint conditions**, matched in O(path-length) per request
//! - **Matcher reuse**: one matcher per distinct endpoint list per setup
//!   value, built on first use, shared by every chain after that
//! - **Parameter extraction**: an endpoint can copy its matched path
//!   parameters onto the request before the decision is made
//! - **Nesting**: `.iff(a).unless(b)` gates gate-by-gate; the outer decides
//!   whether the inner is consulted at all
//!
//! What your framework keeps: connection handling, the response wire
//! format, and whatever `next` ultimately resolves to.
//!
//! ## Quick start
//!
//! ```rust
//! use wicket::{Condition, Endpoint, IffUnless, Method, Next, Request, Response};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), wicket::Error> {
//! let iff_unless = IffUnless::new();
//!
//! // A middleware that rejects unauthenticated requests.
//! let auth = iff_unless.wrap(|req: Request, next: Next| async move {
//!     if req.header("authorization").is_none() {
//!         return Response::status(401);
//!     }
//!     next.run(req).await
//! });
//!
//! // Gate it: only the pet API is protected, and probes stay open.
//! let auth = auth
//!     .iff(Condition::endpoints([
//!         Endpoint::new("/pets/{*rest}").methods([Method::GET, Method::POST, Method::DELETE]),
//!     ]))?
//!     .unless(Condition::predicate(|req| req.path() == "/pets/healthz"))?;
//!
//! // The framework invokes the outermost wrapper per request.
//! let tail = Next::new(|_: Request| async { Response::text("ok") });
//! let res = auth
//!     .call(Request::new(Method::GET, "/pets/0"), tail.clone())
//!     .await;
//! assert_eq!(res.code(), 401); // no authorization header
//!
//! let res = auth
//!     .call(Request::new(Method::GET, "/pets/healthz"), tail)
//!     .await;
//! assert_eq!(res.code(), 200); // unless-listed, auth never ran
//! # Ok(())
//! # }
//! ```

mod cache;
mod condition;
mod conditional;
mod error;
mod matcher;
mod middleware;
mod request;
mod response;
mod version;

pub use http::Method;

pub use condition::{Condition, Endpoint, Predicate};
pub use conditional::{Conditional, IffUnless};
pub use error::Error;
pub use matcher::{Matcher, MatcherConfig, MatcherFactory, RadixFactory, RadixMatcher};
pub use middleware::{BoxFuture, Middleware, Next};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
