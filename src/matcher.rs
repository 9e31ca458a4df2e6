//! Route-matching seam and the default radix-tree matcher.
//!
//! The matching engine is a collaborator, not the point of this crate: the
//! [`Matcher`] and [`MatcherFactory`] traits are the seam, and
//! [`RadixMatcher`] is the default implementation, one [`matchit`] tree per
//! HTTP method, O(path-length) lookup. A custom factory swaps the engine
//! without touching the conditional logic.

use std::borrow::Cow;
use std::collections::HashMap;

use http::Method;
use matchit::Router as MatchitRouter;

use crate::condition::Endpoint;
use crate::error::Error;
use crate::request::Request;
use crate::version::VersionPattern;

/// Header consulted for version-constrained endpoints.
const ACCEPT_VERSION: &str = "accept-version";

// ── Configuration ─────────────────────────────────────────────────────────────

/// Path-normalization options, forwarded verbatim to the factory every time
/// a matcher is built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Treat `/pets/0/` and `/pets/0` as the same path.
    pub ignore_trailing_slash: bool,
    /// Collapse `//` runs, so `/pets//0` matches `/pets/{id}`.
    pub ignore_duplicate_slashes: bool,
}

// ── Seam traits ───────────────────────────────────────────────────────────────

/// A built matcher: a set of rules registered once at construction time,
/// then a pure lookup structure.
///
/// `lookup` reports whether any rule accepts the request. Its only permitted
/// side effect is replacing the request's extracted parameters when the
/// winning rule was registered with
/// [`update_params`](Endpoint::update_params). With no matching rule it
/// reports `false`; there is no fallthrough handler to run.
pub trait Matcher: Send + Sync + 'static {
    /// Adds one normalized endpoint's rule. Only called between
    /// [`MatcherFactory::build`] and first lookup, never afterwards.
    fn register(&mut self, endpoint: &Endpoint) -> Result<(), Error>;

    fn lookup(&self, req: &mut Request) -> bool;
}

/// Builds empty [`Matcher`] instances from a configuration.
pub trait MatcherFactory: Send + Sync + 'static {
    fn build(&self, config: &MatcherConfig) -> Box<dyn Matcher>;
}

/// The default factory, producing [`RadixMatcher`]s.
pub struct RadixFactory;

impl MatcherFactory for RadixFactory {
    fn build(&self, config: &MatcherConfig) -> Box<dyn Matcher> {
        Box::new(RadixMatcher::new(config.clone()))
    }
}

// ── RadixMatcher ──────────────────────────────────────────────────────────────

/// One rule registered at a (method, pattern) slot.
///
/// `versioned` is tracked separately from the parsed constraint so that an
/// unparseable version string yields a rule that never matches rather than
/// one that matches everything.
#[derive(Clone)]
struct Rule {
    versioned: bool,
    version: Option<VersionPattern>,
    update_params: bool,
}

/// The default route matcher.
///
/// One radix tree per HTTP method; each matched pattern holds the list of
/// rules registered for it, in registration order. Version eligibility
/// mirrors the `accept-version` convention: a request carrying the header
/// can only match version-constrained rules, and a request without it can
/// only match unconstrained ones. Version patterns compare component-wise
/// with `x`/`X`/`*` and missing trailing components as wildcards, in both
/// rule and request.
pub struct RadixMatcher {
    config: MatcherConfig,
    trees: HashMap<Method, MatchitRouter<usize>>,
    slots: Vec<Vec<Rule>>,
    index: HashMap<(Method, String), usize>,
}

impl RadixMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self {
            config,
            trees: HashMap::new(),
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Applies the configured normalizations to a pattern or request path.
    /// Borrows when nothing changes, which is the common case.
    fn normalize<'a>(&self, path: &'a str) -> Cow<'a, str> {
        let mut path = Cow::Borrowed(path);
        if self.config.ignore_duplicate_slashes && path.contains("//") {
            let mut collapsed = String::with_capacity(path.len());
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                collapsed.push('/');
                collapsed.push_str(segment);
            }
            if collapsed.is_empty() {
                collapsed.push('/');
            }
            if path.ends_with('/') && collapsed.len() > 1 {
                collapsed.push('/');
            }
            path = Cow::Owned(collapsed);
        }
        if self.config.ignore_trailing_slash && path.len() > 1 && path.ends_with('/') {
            match path {
                Cow::Borrowed(s) => path = Cow::Borrowed(&s[..s.len() - 1]),
                Cow::Owned(mut s) => {
                    s.pop();
                    path = Cow::Owned(s);
                }
            }
        }
        path
    }
}

impl Matcher for RadixMatcher {
    fn register(&mut self, endpoint: &Endpoint) -> Result<(), Error> {
        let pattern = self.normalize(&endpoint.url).into_owned();
        let rule = Rule {
            versioned: endpoint.version.is_some(),
            version: endpoint.version.as_deref().and_then(VersionPattern::parse),
            update_params: endpoint.update_params,
        };
        for method in &endpoint.methods {
            let key = (method.clone(), pattern.clone());
            match self.index.get(&key) {
                // Same pattern registered again under this method (e.g. a
                // versioned and an unversioned rule): extend the slot.
                Some(&slot) => self.slots[slot].push(rule.clone()),
                None => {
                    let slot = self.slots.len();
                    self.trees
                        .entry(method.clone())
                        .or_default()
                        .insert(pattern.clone(), slot)
                        .map_err(|e| Error::route(&pattern, e))?;
                    self.slots.push(vec![rule.clone()]);
                    self.index.insert(key, slot);
                }
            }
        }
        Ok(())
    }

    fn lookup(&self, req: &mut Request) -> bool {
        let Some(tree) = self.trees.get(req.method()) else {
            return false;
        };
        let requested = req.header(ACCEPT_VERSION).and_then(VersionPattern::parse);

        // Scope the borrows of `req` taken by the path match so the
        // parameter copy below can take `req` mutably.
        let (update, params) = {
            let path = self.normalize(req.path());
            let Ok(matched) = tree.at(path.as_ref()) else {
                return false;
            };
            let rules = &self.slots[*matched.value];
            let Some(rule) = rules.iter().find(|rule| match &requested {
                Some(want) => rule.version.as_ref().is_some_and(|have| have.compatible(want)),
                None => !rule.versioned,
            }) else {
                return false;
            };
            if rule.update_params {
                let params = matched.params.iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect();
                (true, params)
            } else {
                (false, HashMap::new())
            }
        };

        if update {
            req.set_params(params);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(endpoints: &[Endpoint]) -> RadixMatcher {
        matcher_with(MatcherConfig::default(), endpoints)
    }

    fn matcher_with(config: MatcherConfig, endpoints: &[Endpoint]) -> RadixMatcher {
        let mut m = RadixMatcher::new(config);
        for endpoint in endpoints {
            m.register(endpoint).expect("registration failed");
        }
        m
    }

    #[test]
    fn dispatches_on_method_and_path() {
        let m = matcher(&[Endpoint::new("/pets/{id}")]);
        assert!(m.lookup(&mut Request::new(Method::GET, "/pets/0")));
        assert!(!m.lookup(&mut Request::new(Method::DELETE, "/pets/0")));
        assert!(!m.lookup(&mut Request::new(Method::GET, "/users/0")));
        assert!(!m.lookup(&mut Request::new(Method::GET, "/pets/0/toys")));
    }

    #[test]
    fn params_copied_only_when_requested() {
        let m = matcher(&[Endpoint::new("/pets/{id}").update_params(true)]);
        let mut req = Request::new(Method::GET, "/pets/0");
        assert!(m.lookup(&mut req));
        assert_eq!(req.param("id"), Some("0"));

        let m = matcher(&[Endpoint::new("/pets/{id}")]);
        let mut req = Request::new(Method::GET, "/pets/0");
        assert!(m.lookup(&mut req));
        assert_eq!(req.param("id"), None);
    }

    #[test]
    fn versioned_rules_need_the_header_and_vice_versa() {
        let m = matcher(&[
            Endpoint::new("/pets/{id}"),
            Endpoint::new("/pets/{id}").version("3.0.0"),
        ]);
        // No header: only the unversioned rule is eligible.
        assert!(m.lookup(&mut Request::new(Method::GET, "/pets/0")));
        // Compatible header: the versioned rule accepts.
        let mut req = Request::new(Method::GET, "/pets/0").with_header("accept-version", "3.x");
        assert!(m.lookup(&mut req));
        // Incompatible header: nothing is eligible.
        let mut req = Request::new(Method::GET, "/pets/0").with_header("accept-version", "2.0.1");
        assert!(!m.lookup(&mut req));
    }

    #[test]
    fn versioned_only_pattern_rejects_headerless_requests() {
        let m = matcher(&[Endpoint::new("/pets/{id}").version("3.0.0")]);
        assert!(!m.lookup(&mut Request::new(Method::GET, "/pets/0")));
    }

    #[test]
    fn unparseable_rule_version_never_matches() {
        let m = matcher(&[Endpoint::new("/pets/{id}").version("latest")]);
        let mut req = Request::new(Method::GET, "/pets/0").with_header("accept-version", "1.0");
        assert!(!m.lookup(&mut req));
        assert!(!m.lookup(&mut Request::new(Method::GET, "/pets/0")));
    }

    #[test]
    fn malformed_accept_version_behaves_as_absent() {
        let m = matcher(&[
            Endpoint::new("/pets/{id}"),
            Endpoint::new("/pets/{id}").version("3.0.0"),
        ]);
        let mut req = Request::new(Method::GET, "/pets/0").with_header("accept-version", "newest");
        assert!(m.lookup(&mut req));
    }

    #[test]
    fn trailing_slash_respected_by_default() {
        let m = matcher(&[Endpoint::new("/pets/{id}")]);
        assert!(!m.lookup(&mut Request::new(Method::GET, "/pets/0/")));
    }

    #[test]
    fn trailing_slash_ignored_when_configured() {
        let config = MatcherConfig { ignore_trailing_slash: true, ..Default::default() };
        let m = matcher_with(config, &[Endpoint::new("/pets/{id}")]);
        assert!(m.lookup(&mut Request::new(Method::GET, "/pets/0/")));
        assert!(m.lookup(&mut Request::new(Method::GET, "/pets/0")));
    }

    #[test]
    fn duplicate_slashes_collapsed_when_configured() {
        let config = MatcherConfig { ignore_duplicate_slashes: true, ..Default::default() };
        let m = matcher_with(config, &[Endpoint::new("/pets/{id}")]);
        assert!(m.lookup(&mut Request::new(Method::GET, "/pets//0")));
        assert!(!m.lookup(&mut Request::new(Method::GET, "/pets/0/")));
    }

    #[test]
    fn conflicting_patterns_surface_as_errors() {
        let mut m = RadixMatcher::new(MatcherConfig::default());
        m.register(&Endpoint::new("/pets/{id}")).expect("first pattern");
        let err = m.register(&Endpoint::new("/pets/{name}")).unwrap_err();
        assert!(err.to_string().contains("invalid route"));
    }

    #[test]
    fn multi_method_endpoint_registers_every_method() {
        let m = matcher(&[Endpoint::new("/pets/{id}").methods([Method::GET, Method::DELETE])]);
        assert!(m.lookup(&mut Request::new(Method::GET, "/pets/0")));
        assert!(m.lookup(&mut Request::new(Method::DELETE, "/pets/0")));
        assert!(!m.lookup(&mut Request::new(Method::PUT, "/pets/0")));
    }
}
