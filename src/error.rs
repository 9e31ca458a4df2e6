//! Unified error type.

use std::fmt;

/// The error type returned by wicket's fallible operations.
///
/// The only fallible operations are the chaining calls
/// ([`Conditional::iff`](crate::Conditional::iff) /
/// [`Conditional::unless`](crate::Conditional::unless)), and only because
/// they may build a matcher: a pattern the route matcher rejects surfaces
/// here. Request-time evaluation never fails; a condition that cannot match
/// simply reports no match.
#[derive(Debug)]
pub struct Error {
    kind: Kind,
}

#[derive(Debug)]
enum Kind {
    Route { pattern: String, source: matchit::InsertError },
    Matcher(String),
}

impl Error {
    pub(crate) fn route(pattern: impl Into<String>, source: matchit::InsertError) -> Self {
        Self { kind: Kind::Route { pattern: pattern.into(), source } }
    }

    /// A registration failure reported by a custom [`Matcher`](crate::Matcher)
    /// implementation.
    pub fn matcher(message: impl Into<String>) -> Self {
        Self { kind: Kind::Matcher(message.into()) }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Route { pattern, source } => write!(f, "invalid route `{pattern}`: {source}"),
            Kind::Matcher(message) => write!(f, "matcher: {message}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            Kind::Route { source, .. } => Some(source),
            Kind::Matcher(_) => None,
        }
    }
}
