//! Matcher instance cache.
//!
//! Building a matcher walks every endpoint into a radix tree; chains are
//! often built from the same endpoint lists (one per route group, reused
//! across middlewares), so each [`IffUnless`](crate::IffUnless) value keeps
//! the matchers it has built, keyed by a canonical serialization of the
//! endpoint list. Construction cost is paid once per distinct list;
//! everything after is a map hit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::condition::Endpoint;
use crate::error::Error;
use crate::matcher::{Matcher, MatcherConfig, MatcherFactory};

pub(crate) struct MatcherCache {
    entries: Mutex<HashMap<String, Arc<dyn Matcher>>>,
}

impl MatcherCache {
    pub(crate) fn new() -> Self {
        Self { entries: Mutex::new(HashMap::new()) }
    }

    /// Returns the matcher for `endpoints`, building and registering it on
    /// first use. The lock is held across construction, so two concurrent
    /// first uses of one endpoint list still produce a single instance.
    pub(crate) fn resolve(
        &self,
        config: &MatcherConfig,
        factory: &dyn MatcherFactory,
        endpoints: &[Endpoint],
    ) -> Result<Arc<dyn Matcher>, Error> {
        let key = cache_key(endpoints);
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(matcher) = entries.get(&key) {
            return Ok(Arc::clone(matcher));
        }
        let mut matcher = factory.build(config);
        for endpoint in endpoints {
            matcher.register(endpoint)?;
        }
        debug!(endpoints = endpoints.len(), key = %key, "matcher built");
        let matcher: Arc<dyn Matcher> = Arc::from(matcher);
        entries.insert(key, Arc::clone(&matcher));
        Ok(matcher)
    }
}

/// Canonical, order-sensitive key for an endpoint list. Two lists that
/// differ only in element order get distinct matchers; the first-use cost of
/// the duplicate is accepted so the key stays a plain serialization.
fn cache_key(endpoints: &[Endpoint]) -> String {
    let mut key = String::new();
    for endpoint in endpoints {
        for method in &endpoint.methods {
            key.push_str(method.as_str());
            key.push(',');
        }
        key.push(' ');
        key.push_str(&endpoint.url);
        if let Some(version) = &endpoint.version {
            key.push_str(" @");
            key.push_str(version);
        }
        if endpoint.update_params {
            key.push_str(" +params");
        }
        key.push(';');
    }
    key
}
