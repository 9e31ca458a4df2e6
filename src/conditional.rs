//! The conditional wrapper: `wrap`, `iff`, `unless`, and the per-request
//! decision.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::cache::MatcherCache;
use crate::condition::{Condition, Endpoint, Predicate};
use crate::error::Error;
use crate::matcher::{Matcher, MatcherConfig, MatcherFactory, RadixFactory};
use crate::middleware::{
    BoxFuture, BoxedMiddleware, ErasedMiddleware, Middleware, Next, private,
};
use crate::request::Request;

// ── IffUnless ────────────────────────────────────────────────────────────────

/// The setup value: matcher configuration, matcher factory, and the matcher
/// cache they scope.
///
/// Every [`Conditional`] produced from one `IffUnless` shares its cache, so
/// two chains gated on the same endpoint list share one matcher instance.
/// Distinct `IffUnless` values never share matchers, even with identical
/// configuration.
///
/// ```rust
/// use wicket::{Condition, IffUnless, Method, Next, Request, Response};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), wicket::Error> {
/// let iff_unless = IffUnless::new();
///
/// let auth = iff_unless.wrap(|req: Request, next: Next| async move {
///     if req.header("authorization").is_none() {
///         return Response::status(401);
///     }
///     next.run(req).await
/// });
/// let auth = auth.unless(Condition::endpoints(["/healthz"]))?;
///
/// let req = Request::new(Method::GET, "/healthz");
/// let res = auth.call(req, Next::new(|_: Request| async { Response::text("ok") })).await;
/// assert_eq!(res.code(), 200);
/// # Ok(())
/// # }
/// ```
pub struct IffUnless {
    setup: Arc<Setup>,
}

struct Setup {
    config: MatcherConfig,
    factory: Box<dyn MatcherFactory>,
    cache: MatcherCache,
}

impl IffUnless {
    /// Default configuration, default radix-tree matcher.
    pub fn new() -> Self {
        Self::with_config(MatcherConfig::default())
    }

    pub fn with_config(config: MatcherConfig) -> Self {
        Self::with_factory(config, RadixFactory)
    }

    /// Swaps in a custom matching engine. `config` is forwarded verbatim to
    /// `factory` each time a matcher is built.
    pub fn with_factory(config: MatcherConfig, factory: impl MatcherFactory) -> Self {
        Self {
            setup: Arc::new(Setup {
                config,
                factory: Box::new(factory),
                cache: MatcherCache::new(),
            }),
        }
    }

    /// Wraps a middleware. The bare wrap carries no gate and delegates on
    /// every request; call [`iff`](Conditional::iff) /
    /// [`unless`](Conditional::unless) on it to add conditions.
    pub fn wrap(&self, middleware: impl Middleware) -> Conditional {
        Conditional {
            base: middleware.into_boxed_middleware(),
            gate: None,
            setup: Arc::clone(&self.setup),
        }
    }
}

impl Default for IffUnless {
    fn default() -> Self {
        Self::new()
    }
}

// ── Conditional ──────────────────────────────────────────────────────────────

/// Whether the gate executes the base on a condition match or on a miss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Polarity {
    Iff,
    Unless,
}

/// A condition resolved once, at chain-construction time.
struct Gate {
    polarity: Polarity,
    predicate: Option<Predicate>,
    matcher: Option<Arc<dyn Matcher>>,
}

impl Gate {
    /// Whether the condition matches `req`.
    ///
    /// The matcher is consulted first and a hit is final, so its parameter
    /// copy applies whenever endpoints are present. The predicate decides
    /// the route-miss path and the no-endpoints case. A gate with neither
    /// never matches.
    fn matches(&self, req: &mut Request) -> bool {
        if let Some(matcher) = &self.matcher {
            if matcher.lookup(req) {
                return true;
            }
        }
        if let Some(predicate) = &self.predicate {
            return predicate(req);
        }
        false
    }
}

/// A middleware wrapped with conditional-execution semantics.
///
/// Produced by [`IffUnless::wrap`]. Each [`iff`](Conditional::iff) /
/// [`unless`](Conditional::unless) call resolves its condition once and
/// returns a **new** `Conditional` whose base is the previous one:
/// conditions compose by nesting, and the outer gate decides whether the
/// inner wrapper runs at all.
///
/// Cloning is cheap (a few `Arc`s) and clones share matchers and the base
/// middleware.
#[derive(Clone)]
pub struct Conditional {
    base: BoxedMiddleware,
    gate: Option<Arc<Gate>>,
    setup: Arc<Setup>,
}

impl Conditional {
    /// Gates the chain so the base runs only when `condition` matches.
    ///
    /// Fails only when a matcher has to be built and the route matcher
    /// rejects one of the endpoint patterns.
    pub fn iff(&self, condition: Condition) -> Result<Conditional, Error> {
        self.gated(condition, Polarity::Iff)
    }

    /// Gates the chain so the base runs only when `condition` does **not**
    /// match.
    pub fn unless(&self, condition: Condition) -> Result<Conditional, Error> {
        self.gated(condition, Polarity::Unless)
    }

    /// Runs the wrapped chain for one request.
    ///
    /// Decides against the gate, then either delegates to the base (which
    /// receives the request and the same continuation) or passes control
    /// onward via `next` with the request untouched.
    pub fn call(&self, req: Request, next: Next) -> BoxFuture {
        let Some(gate) = &self.gate else {
            return self.base.call(req, next);
        };
        let mut req = req;
        let matched = gate.matches(&mut req);
        let execute = matched == (gate.polarity == Polarity::Iff);
        trace!(
            polarity = ?gate.polarity,
            matched,
            execute,
            path = req.path(),
            "gate decision"
        );
        if execute {
            self.base.call(req, next)
        } else {
            next.run(req)
        }
    }

    fn gated(&self, condition: Condition, polarity: Polarity) -> Result<Conditional, Error> {
        let (predicate, matcher) = self.resolve(condition)?;
        Ok(Conditional {
            base: Arc::new(self.clone()),
            gate: Some(Arc::new(Gate { polarity, predicate, matcher })),
            setup: Arc::clone(&self.setup),
        })
    }

    /// Resolves a condition into its gate parts, once per chaining call.
    fn resolve(
        &self,
        condition: Condition,
    ) -> Result<(Option<Predicate>, Option<Arc<dyn Matcher>>), Error> {
        match condition {
            Condition::Predicate(predicate) => Ok((Some(predicate), None)),
            Condition::Endpoints(endpoints) => Ok((None, self.matcher_for(&endpoints)?)),
            Condition::Composite { endpoints, custom } => {
                Ok((custom, self.matcher_for(&endpoints)?))
            }
        }
    }

    fn matcher_for(&self, endpoints: &[Endpoint]) -> Result<Option<Arc<dyn Matcher>>, Error> {
        if endpoints.is_empty() {
            return Ok(None);
        }
        let Setup { config, factory, cache } = &*self.setup;
        cache.resolve(config, factory.as_ref(), endpoints).map(Some)
    }
}

impl fmt::Debug for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conditional")
            .field("gate", &self.gate.as_ref().map(|g| g.polarity))
            .finish_non_exhaustive()
    }
}

impl private::Sealed for Conditional {}

impl Middleware for Conditional {
    fn into_boxed_middleware(self) -> BoxedMiddleware {
        Arc::new(self)
    }
}

impl ErasedMiddleware for Conditional {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        Conditional::call(self, req, next)
    }
}
