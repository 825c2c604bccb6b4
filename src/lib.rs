//! Fetch the leaf certificate a TLS peer presents and check whether it
//! authorizes a hostname.
//!
//! The fetch sequence dials `hostname:port`, runs a TLS handshake with chain
//! validation DISABLED, and returns a summary of the first certificate in the
//! peer's chain. Disabled validation is the point of the tool: it inspects
//! certificates from any host, self-signed or untrusted included. Consumers
//! must not treat a successful fetch as a statement of trust.
//!
//! Hostname authorization against the certificate's DNS-name SANs lives in
//! [`san`] and is a separate, purely computational step.

use openssl::asn1::{Asn1Time, Asn1TimeRef};
use openssl::ssl::{Ssl, SslContext, SslMethod, SslVerifyMode};
use openssl::x509::{X509, X509NameRef, X509Ref};
use serde::{Deserialize, Serialize};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, TcpStream, ToSocketAddrs};
use std::time::Duration;

pub mod config;
pub mod error;
pub mod render;
pub mod san;

pub use error::TLSInspectError;

static TIMEOUT: u64 = 30;

/// What to dial and whether the handshake advertises the hostname via SNI.
///
/// Built once at the boundary, before any I/O.
#[derive(Debug, Clone)]
pub struct Target {
    pub hostname: String,
    pub port: u16,
    pub send_server_name: bool,
}

impl Target {
    pub const DEFAULT_PORT: u16 = 443;

    /// Builds a target, rejecting an empty hostname before any network
    /// activity happens.
    pub fn new(
        hostname: &str,
        port: Option<u16>,
        send_server_name: bool,
    ) -> Result<Self, TLSInspectError> {
        if hostname.is_empty() {
            return Err(TLSInspectError::InvalidInput {
                field: "hostname".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }
        Ok(Target {
            hostname: hostname.to_string(),
            port: port.unwrap_or(Self::DEFAULT_PORT),
            send_server_name,
        })
    }

    /// The `host:port` form used for dialing and error messages.
    pub fn address(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

/// Summary of the leaf certificate a peer presented.
///
/// `sans` holds the DNS-name SAN entries in presented order; these feed the
/// authorization check. The remaining fields are for display only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub hostname: String,
    pub sans: Vec<String>,
    pub emails: Vec<String>,
    pub ip_addresses: Vec<String>,
    pub uris: Vec<String>,
    pub valid_from: String,
    pub valid_to: String,
    pub validity_days: i32,
    pub issuer: String,
    pub is_ca: bool,
}

impl Certificate {
    /// Dials the target, performs one TLS handshake, and returns the leaf
    /// certificate summary.
    ///
    /// Exactly one attempt is made; every failure is fatal for the fetch.
    /// The rest of the peer's chain is discarded.
    pub fn from_target(target: &Target) -> Result<Certificate, TLSInspectError> {
        let remote = target.address();
        let mut addresses =
            remote
                .to_socket_addrs()
                .map_err(|e| TLSInspectError::DnsResolution {
                    hostname: target.hostname.clone(),
                    source: e,
                })?;
        let socket_addr = addresses
            .next()
            .ok_or_else(|| TLSInspectError::DnsResolution {
                hostname: target.hostname.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "no addresses returned"),
            })?;

        let tcp_stream = TcpStream::connect_timeout(&socket_addr, Duration::from_secs(TIMEOUT))
            .map_err(|e| TLSInspectError::ConnectionFailed {
                address: remote.clone(),
                source: e,
            })?;
        tcp_stream.set_read_timeout(Some(Duration::from_secs(TIMEOUT)))?;

        // Chain-of-trust and expiry checks stay off: this tool inspects
        // whatever the peer presents, trusted or not.
        let mut context = SslContext::builder(SslMethod::tls())?;
        context.set_verify(SslVerifyMode::empty());
        let context = context.build();

        let mut ssl = Ssl::new(&context)?;
        if target.send_server_name {
            ssl.set_hostname(&target.hostname)?;
        }

        let stream = ssl.connect(tcp_stream)?;
        let leaf = require_peer_certificate(stream.ssl().peer_certificate())?;

        Ok(Self::read_leaf(&target.hostname, &leaf))
    }

    fn read_leaf(hostname: &str, cert: &X509Ref) -> Certificate {
        let mut sans = Vec::new();
        let mut emails = Vec::new();
        let mut ip_addresses = Vec::new();
        let mut uris = Vec::new();
        if let Some(alt_names) = cert.subject_alt_names() {
            for name in alt_names {
                if let Some(dns) = name.dnsname() {
                    sans.push(dns.to_string());
                } else if let Some(email) = name.email() {
                    emails.push(email.to_string());
                } else if let Some(bytes) = name.ipaddress() {
                    if let Some(ip) = format_ip(bytes) {
                        ip_addresses.push(ip);
                    }
                } else if let Some(uri) = name.uri() {
                    uris.push(uri.to_string());
                }
            }
        }

        Certificate {
            hostname: hostname.to_string(),
            sans,
            emails,
            ip_addresses,
            uris,
            valid_from: cert.not_before().to_string(),
            valid_to: cert.not_after().to_string(),
            validity_days: get_validity_days(cert.not_after()),
            issuer: one_line_name(cert.issuer_name()),
            is_ca: read_ca_flag(cert),
        }
    }
}

/// A peer that completes a handshake without presenting a certificate
/// (anonymous cipher suites allow it) is a protocol violation for this tool.
fn require_peer_certificate(leaf: Option<X509>) -> Result<X509, TLSInspectError> {
    leaf.ok_or(TLSInspectError::NoPeerCertificate)
}

/// One-line `/CN=.../O=...` rendering of an X.509 name.
fn one_line_name(name: &X509NameRef) -> String {
    name.entries()
        .map(|entry| {
            let key = entry.object().nid().short_name().unwrap_or("");
            let value = entry
                .data()
                .as_utf8()
                .map(|v| v.to_string())
                .unwrap_or_default();
            format!("/{}={}", key, value)
        })
        .collect()
}

/// SAN iPAddress entries arrive as raw octets; render 4 as IPv4 and 16 as
/// IPv6, skip anything else.
fn format_ip(bytes: &[u8]) -> Option<String> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(Ipv4Addr::from(octets).to_string())
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            Some(Ipv6Addr::from(octets).to_string())
        }
        _ => None,
    }
}

fn get_validity_days(not_after: &Asn1TimeRef) -> i32 {
    Asn1Time::days_from_now(0)
        .ok()
        .and_then(|now| now.diff(not_after).ok())
        .map(|diff| diff.days)
        .unwrap_or(0)
}

/// BasicConstraints CA flag of the leaf. rust-openssl does not expose it, so
/// the DER is re-parsed with x509-parser. Absent extension means not a CA.
fn read_ca_flag(cert: &X509Ref) -> bool {
    let der = match cert.to_der() {
        Ok(der) => der,
        Err(_) => return false,
    };
    match x509_parser::parse_x509_certificate(&der) {
        Ok((_, parsed)) => matches!(parsed.basic_constraints(), Ok(Some(ext)) if ext.value.ca),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_target_rejects_empty_hostname() {
        let err = Target::new("", None, true).unwrap_err();
        assert!(matches!(err, TLSInspectError::InvalidInput { ref field, .. } if field == "hostname"));
    }

    #[test]
    fn test_target_default_port() {
        let target = Target::new("example.com", None, true).unwrap();
        assert_eq!(target.port, 443);
        assert_eq!(target.address(), "example.com:443");

        let target = Target::new("example.com", Some(8443), false).unwrap();
        assert_eq!(target.address(), "example.com:8443");
    }

    #[test]
    fn test_connection_refused_is_connection_failed() {
        // Bind to grab a free port, then drop the listener so nothing is
        // accepting there.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let target = Target::new("127.0.0.1", Some(port), false).unwrap();
        let err = Certificate::from_target(&target).unwrap_err();
        assert!(matches!(err, TLSInspectError::ConnectionFailed { .. }));
    }

    #[test]
    fn test_non_tls_peer_is_handshake_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            // Accept one connection and hang up without speaking TLS.
            if let Ok((stream, _)) = listener.accept() {
                drop(stream);
            }
        });

        let target = Target::new("127.0.0.1", Some(port), false).unwrap();
        let err = Certificate::from_target(&target).unwrap_err();
        assert!(matches!(err, TLSInspectError::HandshakeFailed { .. }));
        server.join().unwrap();
    }

    #[test]
    fn test_certificate_free_handshake_is_fatal() {
        // Anonymous cipher suites can complete a handshake with no peer
        // certificate; the fetch treats that as a protocol violation.
        let err = require_peer_certificate(None).unwrap_err();
        assert!(matches!(err, TLSInspectError::NoPeerCertificate));
    }

    #[test]
    fn test_unresolvable_hostname_is_dns_failure() {
        // A label longer than 63 octets is rejected by the resolver library
        // itself, so not even a wildcard-resolving DNS setup can turn this
        // name into an address.
        let hostname = "a".repeat(64);
        let target = Target::new(&hostname, Some(443), false).unwrap();
        let err = Certificate::from_target(&target).unwrap_err();
        assert!(matches!(err, TLSInspectError::DnsResolution { .. }));
    }

    #[test]
    fn test_format_ip() {
        assert_eq!(format_ip(&[192, 168, 0, 1]), Some("192.168.0.1".to_string()));
        assert_eq!(
            format_ip(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]),
            Some("::1".to_string())
        );
        assert_eq!(format_ip(&[1, 2, 3]), None);
    }
}
