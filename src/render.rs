//! Rendering of a fetched certificate summary.
//!
//! Pure presentation: both renderers take a fully-populated [`Certificate`]
//! and a sink, and carry no validation logic.

use crate::Certificate;
use std::io::{self, Write};

/// Serializes the certificate summary as a single JSON line.
pub fn render_json(cert: &Certificate, writer: &mut impl Write) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, cert)?;
    writeln!(writer)
}

/// Human-readable rendering: one line per SAN entry, then the validity
/// window, issuer, and CA flag.
pub fn render_pretty(cert: &Certificate, writer: &mut impl Write) -> io::Result<()> {
    for name in &cert.sans {
        writeln!(writer, "SAN: {}", name)?;
    }
    for email in &cert.emails {
        writeln!(writer, "email: {}", email)?;
    }
    for ip in &cert.ip_addresses {
        writeln!(writer, "ip: {}", ip)?;
    }
    for uri in &cert.uris {
        writeln!(writer, "uri: {}", uri)?;
    }
    writeln!(writer, "valid from {} to {}", cert.valid_from, cert.valid_to)?;
    writeln!(writer, "issuer: {}", cert.issuer)?;
    writeln!(writer, "is ca: {}", cert.is_ca)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cert() -> Certificate {
        Certificate {
            hostname: "svc.internal.example.com".to_string(),
            sans: vec![
                "api.example.com".to_string(),
                "*.internal.example.com".to_string(),
            ],
            emails: vec!["hostmaster@example.com".to_string()],
            ip_addresses: vec!["10.0.0.1".to_string()],
            uris: vec!["https://example.com".to_string()],
            valid_from: "Jan  1 00:00:00 2026 GMT".to_string(),
            valid_to: "Apr  1 00:00:00 2026 GMT".to_string(),
            validity_days: 90,
            issuer: "/C=US/O=Example CA/CN=Example Issuing CA".to_string(),
            is_ca: false,
        }
    }

    #[test]
    fn test_render_pretty_lines() {
        let mut out = Vec::new();
        render_pretty(&sample_cert(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "SAN: api.example.com",
                "SAN: *.internal.example.com",
                "email: hostmaster@example.com",
                "ip: 10.0.0.1",
                "uri: https://example.com",
                "valid from Jan  1 00:00:00 2026 GMT to Apr  1 00:00:00 2026 GMT",
                "issuer: /C=US/O=Example CA/CN=Example Issuing CA",
                "is ca: false",
            ]
        );
    }

    #[test]
    fn test_render_pretty_omits_empty_san_kinds() {
        let mut cert = sample_cert();
        cert.emails.clear();
        cert.ip_addresses.clear();
        cert.uris.clear();

        let mut out = Vec::new();
        render_pretty(&cert, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(!text.contains("email:"));
        assert!(!text.contains("ip:"));
        assert!(!text.contains("uri:"));
        assert!(text.contains("issuer:"));
    }

    #[test]
    fn test_render_json_is_one_line() {
        let mut out = Vec::new();
        render_json(&sample_cert(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), 1);

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["hostname"], "svc.internal.example.com");
        assert_eq!(value["sans"][1], "*.internal.example.com");
        assert_eq!(value["is_ca"], false);
    }
}
