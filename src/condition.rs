//! Execution conditions and endpoint descriptors.

use std::sync::Arc;

use http::Method;

use crate::request::Request;

/// A predicate over the incoming request.
pub type Predicate = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

// ── Endpoint ─────────────────────────────────────────────────────────────────

/// Declarative description of one route to match.
///
/// A bare string is shorthand for a `GET` endpoint without version constraint
/// or parameter extraction:
///
/// ```rust
/// use wicket::{Endpoint, Method};
///
/// let short = Endpoint::from("/pets/{id}");
/// let long = Endpoint::new("/pets/{id}")
///     .methods([Method::GET])
///     .update_params(false);
/// assert_eq!(short, long);
/// ```
///
/// Pattern syntax is the route matcher's; the default matcher understands
/// [`matchit`] patterns (`{id}` parameters, `{*rest}` catch-alls). Nothing is
/// validated here: a malformed pattern is rejected by the matcher when the
/// endpoint is first used in an `iff`/`unless` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub methods: Vec<Method>,
    pub url: String,
    pub version: Option<String>,
    pub update_params: bool,
}

impl Endpoint {
    /// A `GET` endpoint for `url` with all defaults.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            methods: vec![Method::GET],
            url: url.into(),
            version: None,
            update_params: false,
        }
    }

    /// Replaces the method list. Order is kept; it is part of the endpoint's
    /// identity for matcher caching.
    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Constrains the endpoint to requests whose `accept-version` header is
    /// compatible with `version` (see [`RadixMatcher`](crate::RadixMatcher)
    /// for the matching rules).
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// When set, a match copies the extracted path parameters onto the
    /// request before the decision is made.
    pub fn update_params(mut self, update: bool) -> Self {
        self.update_params = update;
        self
    }
}

impl From<&str> for Endpoint {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for Endpoint {
    fn from(url: String) -> Self {
        Self::new(url)
    }
}

// ── Condition ────────────────────────────────────────────────────────────────

/// What an `iff`/`unless` call evaluates against the incoming request.
///
/// A degenerate condition (empty endpoint list, composite with nothing in
/// it) is not an error: it simply never matches, the same as no condition
/// at all.
#[derive(Clone)]
pub enum Condition {
    /// An arbitrary predicate over the request.
    Predicate(Predicate),
    /// A set of endpoints resolved through the route matcher.
    Endpoints(Vec<Endpoint>),
    /// Endpoints and/or a custom predicate. When both are present the
    /// matcher is consulted first; the predicate decides the route-miss
    /// path. See [`Conditional`](crate::Conditional).
    Composite {
        endpoints: Vec<Endpoint>,
        custom: Option<Predicate>,
    },
}

impl Condition {
    pub fn predicate(f: impl Fn(&Request) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }

    pub fn endpoints<I, E>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Endpoint>,
    {
        Self::Endpoints(endpoints.into_iter().map(Into::into).collect())
    }

    pub fn composite<I, E>(
        endpoints: I,
        custom: impl Fn(&Request) -> bool + Send + Sync + 'static,
    ) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Endpoint>,
    {
        Self::Composite {
            endpoints: endpoints.into_iter().map(Into::into).collect(),
            custom: Some(Arc::new(custom)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_string_normalizes_to_get_defaults() {
        let endpoint = Endpoint::from("/pets/{id}");
        assert_eq!(endpoint.methods, vec![Method::GET]);
        assert_eq!(endpoint.url, "/pets/{id}");
        assert_eq!(endpoint.version, None);
        assert!(!endpoint.update_params);
    }

    #[test]
    fn builder_overrides_defaults() {
        let endpoint = Endpoint::new("/pets/{id}")
            .methods([Method::GET, Method::DELETE])
            .version("3.0.0")
            .update_params(true);
        assert_eq!(endpoint.methods, vec![Method::GET, Method::DELETE]);
        assert_eq!(endpoint.version.as_deref(), Some("3.0.0"));
        assert!(endpoint.update_params);
    }

    #[test]
    fn endpoints_accepts_mixed_shorthand() {
        let Condition::Endpoints(list) = Condition::endpoints(["/a", "/b/{id}"]) else {
            panic!("expected endpoint list");
        };
        assert_eq!(list.len(), 2);
        assert_eq!(list[1], Endpoint::new("/b/{id}"));
    }
}
