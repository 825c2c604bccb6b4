use lazy_static::lazy_static;
use prometheus::{labels, register_gauge, Gauge};

use sancheck::Certificate;

lazy_static! {
    static ref SANCHECK_DAYS_BEFORE_EXPIRED: Gauge =
        register_gauge!("sancheck_days_before_expired", "days before expiration").unwrap();
    static ref SANCHECK_HOSTNAME_AUTHORIZED: Gauge = register_gauge!(
        "sancheck_hostname_authorized",
        "whether a SAN entry authorized the requested hostname"
    )
    .unwrap();
}

/// Function to push metrics to prometheus
/// # Arguments
/// * `cert` - The fetched leaf-certificate summary
/// * `authorized` - The hostname verdict, or None when validation was skipped
/// * `prometheus_address` - String of prometheus address
pub fn prometheus_metrics(cert: &Certificate, authorized: Option<bool>, prometheus_address: &str) {
    SANCHECK_DAYS_BEFORE_EXPIRED.set(f64::from(cert.validity_days));

    // 1 = authorized, 0 = not authorized, -1 = validation skipped
    let authorized_value = match authorized {
        Some(true) => 1.0,
        Some(false) => 0.0,
        None => -1.0,
    };
    SANCHECK_HOSTNAME_AUTHORIZED.set(authorized_value);

    let authorized_label = match authorized {
        Some(verdict) => verdict.to_string(),
        None => "skipped".to_string(),
    };

    let metric_families = prometheus::gather();
    let prometheus_client = prometheus::push_metrics(
        "sancheck",
        labels! {
            "instance".to_owned() => "sancheck".to_owned(),
            "job".to_owned() => "sancheck".to_owned(),
            "host".to_owned() => cert.hostname.to_owned(),
            "issuer".to_owned() => cert.issuer.to_owned(),
            "authorized".to_owned() => authorized_label,
        },
        &format!("{}/metrics/job", prometheus_address),
        metric_families,
        None,
    );

    match prometheus_client {
        Ok(_) => {}
        Err(e) => println!("\nFailed to push metrics to prometheus: {}", e),
    }
}
