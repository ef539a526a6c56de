//! Utilities for spinning up a prometheus metrics server.

use crate::PrometheusError;
use metrics_exporter_prometheus::PrometheusBuilder;
use metrics_process::Collector;
use std::{
    net::{IpAddr, SocketAddr, TcpListener},
    thread::{self, sleep},
    time::Duration,
};
use tracing::info;

/// Starts a Prometheus metrics server on the given address.
///
/// A `metrics_port` of zero binds an OS assigned port.
pub fn init_prometheus_server(addr: IpAddr, metrics_port: u16) -> Result<(), PrometheusError> {
    let actual_addr = if metrics_port == 0 {
        // PrometheusBuilder binds its own listener once the port is known.
        TcpListener::bind((addr, 0))?.local_addr()?
    } else {
        SocketAddr::from((addr, metrics_port))
    };

    PrometheusBuilder::new().with_http_listener(actual_addr).install()?;

    let collector = Collector::default();
    collector.describe();

    thread::spawn(move || {
        loop {
            collector.collect();
            sleep(Duration::from_secs(60));
        }
    });

    info!(target: "prometheus", "Serving metrics at: http://{}", actual_addr);

    Ok(())
}
