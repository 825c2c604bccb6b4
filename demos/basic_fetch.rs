//! Basic certificate fetch example.
//!
//! This example demonstrates how to fetch the leaf certificate a host
//! presents and print its identity fields.
//!
//! Run with: cargo run --example basic_fetch

use sancheck::{Certificate, Target};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Basic Certificate Fetch ===\n");

    let target = Target::new("google.com", None, true)?;
    let cert = Certificate::from_target(&target)?;

    println!("Certificate for: {}", cert.hostname);
    println!("Issuer: {}", cert.issuer);
    println!("Valid from: {}", cert.valid_from);
    println!("Valid to: {}", cert.valid_to);
    println!("Days remaining: {}", cert.validity_days);
    println!("Is CA: {}", cert.is_ca);
    println!();

    println!("Subject Alternative Names (SANs):");
    for san in &cert.sans {
        println!("  - {}", san);
    }

    Ok(())
}
