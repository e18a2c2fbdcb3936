//! key
//!
//! Deterministic key construction for lock sets.
//!
//! A lock set lives under a single store key built from a configured
//! namespace plus an ordered list of caller-supplied segments. Segments
//! are normalized (trimmed, lowercased) so that `"App"` and `" app "`
//! address the same set.

/// Separator between key components, following the Redis `a:b:c`
/// convention.
pub const SEPARATOR: char = ':';

/// Builds store keys from a namespace and ordered segments.
///
/// A `KeyBuilder` is a pure function of its namespace and its inputs; it
/// holds no other state.
///
/// # Example
///
/// ```
/// use cordon::KeyBuilder;
///
/// let keys = KeyBuilder::new("cordon");
/// assert_eq!(keys.build(&["App", " Worker "]), "cordon:app:worker");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBuilder {
    namespace: String,
}

impl KeyBuilder {
    /// Create a builder for the given namespace.
    ///
    /// The namespace itself is normalized the same way segments are.
    pub fn new(namespace: impl AsRef<str>) -> Self {
        Self {
            namespace: normalize(namespace.as_ref()),
        }
    }

    /// The configured namespace prefix.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Render the namespace plus the given segments into one key.
    ///
    /// Each segment is trimmed and lowercased. Segments that are empty
    /// after trimming are dropped so the separator never doubles up.
    pub fn build<S: AsRef<str>>(&self, segments: &[S]) -> String {
        let mut parts = vec![self.namespace.clone()];
        parts.extend(
            segments
                .iter()
                .map(|s| normalize(s.as_ref()))
                .filter(|s| !s.is_empty()),
        );
        parts.join(&SEPARATOR.to_string())
    }

    /// The prefix under which every key built by this builder lives.
    ///
    /// Used for key listing; see [`crate::Locker::keys`].
    pub fn prefix(&self) -> String {
        format!("{}{}", self.namespace, SEPARATOR)
    }
}

fn normalize(segment: &str) -> String {
    segment.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_joins_with_separator() {
        let keys = KeyBuilder::new("cordon");
        assert_eq!(keys.build(&["app", "worker"]), "cordon:app:worker");
    }

    #[test]
    fn build_normalizes_segments() {
        let keys = KeyBuilder::new("cordon");
        assert_eq!(keys.build(&["  App ", "WORKER"]), "cordon:app:worker");
    }

    #[test]
    fn build_drops_blank_segments() {
        let keys = KeyBuilder::new("cordon");
        assert_eq!(keys.build(&["app", "   ", "jobs"]), "cordon:app:jobs");
    }

    #[test]
    fn build_with_no_segments_is_just_namespace() {
        let keys = KeyBuilder::new("cordon");
        assert_eq!(keys.build::<&str>(&[]), "cordon");
    }

    #[test]
    fn namespace_is_normalized() {
        let keys = KeyBuilder::new(" Cordon ");
        assert_eq!(keys.namespace(), "cordon");
        assert_eq!(keys.build(&["x"]), "cordon:x");
    }

    #[test]
    fn prefix_ends_with_separator() {
        let keys = KeyBuilder::new("cordon");
        assert_eq!(keys.prefix(), "cordon:");
    }
}
