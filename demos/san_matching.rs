//! Hostname authorization example.
//!
//! This example shows how the SAN matching rules behave without touching the
//! network: exact labels, the single-label wildcard, and the strict
//! label-count requirement.
//!
//! Run with: cargo run --example san_matching

use sancheck::san;

fn main() {
    let sans = vec![
        "api.example.com".to_string(),
        "*.internal.example.com".to_string(),
    ];

    let hostnames = [
        "api.example.com",
        "svc.internal.example.com",
        "other.example.com",
        "deep.svc.internal.example.com",
    ];

    println!("SANs: {:?}\n", sans);
    for hostname in hostnames {
        println!(
            "{:<32} authorized: {}",
            hostname,
            san::is_authorized(&sans, hostname)
        );
    }
}
