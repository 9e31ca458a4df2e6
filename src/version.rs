//! `accept-version` constraint matching.
//!
//! Version-constrained endpoints and the request's `accept-version` header
//! both use dotted version patterns where `x`, `X` and `*` are wildcards:
//! a rule pinned to `2.x` accepts a request asking for `2.0.1`, and a rule
//! pinned to `3.0.0` accepts a request asking for `3.x`. Missing trailing
//! components also match anything, so `2` accepts `2.0.1`.

/// A parsed dotted version pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct VersionPattern {
    parts: Vec<Part>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Part {
    Num(u64),
    Wild,
}

impl VersionPattern {
    /// Parses `"3.0.0"`, `"2.x"`, `"1"`, … Returns `None` for anything that
    /// is not dotted numbers and wildcards; an unparseable pattern simply
    /// never matches, it is not an error.
    pub(crate) fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        let mut parts = Vec::new();
        for piece in s.split('.') {
            match piece {
                "x" | "X" | "*" => parts.push(Part::Wild),
                _ => parts.push(Part::Num(piece.parse().ok()?)),
            }
        }
        Some(Self { parts })
    }

    /// Component-wise compatibility. Symmetric: a numeric component must
    /// equal its counterpart, wildcards and missing components match
    /// anything.
    pub(crate) fn compatible(&self, other: &VersionPattern) -> bool {
        let len = self.parts.len().max(other.parts.len());
        (0..len).all(|i| match (self.parts.get(i), other.parts.get(i)) {
            (Some(Part::Num(a)), Some(Part::Num(b))) => a == b,
            _ => true,
        })
    }
}
