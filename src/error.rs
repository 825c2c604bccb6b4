//! Error types for TLS peer-certificate inspection.
//!
//! This module defines the error types that can occur while fetching a peer
//! certificate. A failed hostname-authorization check is deliberately NOT an
//! error here: it is a normal negative verdict the binary reports on stderr.

use std::fmt;
use std::io;

/// Error type for peer-certificate fetch failures.
///
/// Every variant is fatal at this tool's scope: there is no retry and no
/// partial result. The binary maps each of these to a nonzero exit.
#[derive(Debug)]
pub enum TLSInspectError {
    /// Invalid input provided at the boundary (e.g. an empty hostname)
    InvalidInput {
        /// Which field/parameter was invalid
        field: String,
        /// Why it was invalid
        reason: String,
    },

    /// DNS resolution failed for the given hostname
    DnsResolution {
        /// The hostname that failed to resolve
        hostname: String,
        /// The underlying I/O error
        source: io::Error,
    },

    /// TCP connection failed to the target address
    ConnectionFailed {
        /// The address (host:port) that connection failed to
        address: String,
        /// The underlying I/O error
        source: io::Error,
    },

    /// TLS handshake failed
    HandshakeFailed {
        /// Details about why the handshake failed
        details: String,
    },

    /// The peer completed a handshake but presented no certificate
    NoPeerCertificate,

    /// OpenSSL error occurred
    OpenSSLError {
        /// The underlying OpenSSL error
        details: String,
    },

    /// Generic I/O error
    IoError {
        /// The underlying I/O error
        source: io::Error,
    },

    /// A generic error with a custom message
    Other {
        /// Error message
        message: String,
    },
}

impl fmt::Display for TLSInspectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { field, reason } => {
                write!(f, "Invalid input for '{}': {}", field, reason)
            }
            Self::DnsResolution { hostname, .. } => {
                write!(
                    f,
                    "Failed to resolve hostname: {}. Check that the hostname is spelled correctly and your DNS configuration is working.",
                    hostname
                )
            }
            Self::ConnectionFailed { address, .. } => {
                write!(
                    f,
                    "Connection failed to: {}. Verify the host is running a TLS service and is reachable.",
                    address
                )
            }
            Self::HandshakeFailed { details } => {
                write!(f, "TLS handshake failed: {}", details)
            }
            Self::NoPeerCertificate => {
                write!(
                    f,
                    "The peer completed the handshake but sent no certificates"
                )
            }
            Self::OpenSSLError { details } => {
                write!(f, "OpenSSL error: {}", details)
            }
            Self::IoError { source } => {
                write!(f, "I/O error: {}", source)
            }
            Self::Other { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for TLSInspectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DnsResolution { source, .. } => Some(source),
            Self::ConnectionFailed { source, .. } => Some(source),
            Self::IoError { source } => Some(source),
            _ => None,
        }
    }
}

// Conversion implementations for compatibility

impl From<io::Error> for TLSInspectError {
    fn from(e: io::Error) -> Self {
        Self::IoError { source: e }
    }
}

impl From<&str> for TLSInspectError {
    fn from(s: &str) -> Self {
        Self::Other {
            message: s.to_string(),
        }
    }
}

impl From<String> for TLSInspectError {
    fn from(s: String) -> Self {
        Self::Other { message: s }
    }
}

impl From<openssl::error::ErrorStack> for TLSInspectError {
    fn from(e: openssl::error::ErrorStack) -> Self {
        Self::OpenSSLError {
            details: e.to_string(),
        }
    }
}

impl<S: fmt::Debug> From<openssl::ssl::HandshakeError<S>> for TLSInspectError {
    fn from(e: openssl::ssl::HandshakeError<S>) -> Self {
        Self::HandshakeFailed {
            details: format!("{}", e),
        }
    }
}
