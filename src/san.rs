//! Hostname authorization against certificate SAN entries.
//!
//! A SAN entry authorizes a hostname when the two have the same number of
//! dot-separated labels and every label pair is either byte-for-byte equal or
//! the SAN label is the literal wildcard `*`. The wildcard is only recognized
//! as a complete label, so `*.example.com` covers `foo.example.com` but never
//! `foo.bar.example.com`, and `f*o.com` is an ordinary literal label.
//!
//! There is intentionally no normalization: no case-folding, no punycode
//! handling, no trailing-dot stripping. Callers get the raw presented-name
//! semantics of the certificate.

/// Returns true when at least one SAN entry authorizes `hostname`.
///
/// An empty SAN list authorizes nothing.
pub fn is_authorized(sans: &[String], hostname: &str) -> bool {
    sans.iter().any(|san| matches(san, hostname))
}

/// Returns true when a single SAN entry authorizes `hostname`.
///
/// Labels are compared from the TLD side first; the least-specific labels are
/// the most stable, so mismatches short-circuit early. The order does not
/// change the verdict.
pub fn matches(san: &str, hostname: &str) -> bool {
    let san_labels: Vec<&str> = san.split('.').collect();
    let host_labels: Vec<&str> = hostname.split('.').collect();

    // A SAN with N labels can only ever cover a hostname with exactly N
    // labels; no wildcard spans label boundaries.
    if san_labels.len() != host_labels.len() {
        return false;
    }

    for (san_label, host_label) in san_labels.iter().rev().zip(host_labels.iter().rev()) {
        if *san_label != "*" && san_label != host_label {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(matches("a.b.c", "a.b.c"));
        assert!(matches("api.example.com", "api.example.com"));
    }

    #[test]
    fn test_label_count_mismatch() {
        assert!(!matches("example.com", "www.example.com"));
        assert!(!matches("www.example.com", "example.com"));
        assert!(!matches("*.example.com", "foo.bar.example.com"));
    }

    #[test]
    fn test_leftmost_wildcard() {
        assert!(matches("*.example.com", "foo.example.com"));
        assert!(matches("*.a.b", "x.a.b"));
        assert!(!matches("*.a.b", "x.y.b"));
    }

    #[test]
    fn test_wildcard_in_any_position_is_a_full_label() {
        // The algorithm treats `*` as "any label" wherever it appears; only
        // partial-label wildcards are rejected.
        assert!(matches("foo.*.com", "foo.bar.com"));
        assert!(!matches("f*o.com", "foo.com"));
        assert!(!matches("*foo.com", "barfoo.com"));
        assert!(!matches("foo*.com", "foobar.com"));
    }

    #[test]
    fn test_bare_wildcard_matches_single_label_only() {
        assert!(matches("*", "localhost"));
        assert!(!matches("*", "example.com"));
    }

    #[test]
    fn test_case_sensitive_no_normalization() {
        assert!(!matches("Example.com", "example.com"));
        assert!(!matches("example.com", "example.com."));
    }

    #[test]
    fn test_is_authorized_empty_list() {
        assert!(!is_authorized(&[], "anything.com"));
    }

    #[test]
    fn test_is_authorized_any_entry_suffices() {
        let sans = vec!["*.x.com".to_string(), "y.com".to_string()];
        assert!(is_authorized(&sans, "y.com"));
        assert!(is_authorized(&sans, "foo.x.com"));
        assert!(!is_authorized(&sans, "z.com"));
    }

    #[test]
    fn test_mixed_sans_scenario() {
        let sans = vec![
            "api.example.com".to_string(),
            "*.internal.example.com".to_string(),
        ];
        assert!(is_authorized(&sans, "svc.internal.example.com"));
        assert!(is_authorized(&sans, "api.example.com"));
        assert!(!is_authorized(&sans, "other.example.com"));
        assert!(!is_authorized(&sans, "a.b.internal.example.com"));
    }
}
