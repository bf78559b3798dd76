//! Logging and optional OpenTelemetry export.
//!
//! Console logging is always on and filtered by `RUST_LOG`. When
//! `OTEL_EXPORTER_OTLP_ENDPOINT` is set and a collector answers there, traces
//! and logs are also exported over OTLP.

use std::env;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_SERVICE_NAME: &str = "larder-server";

/// Keeps the OTLP pipelines alive; flushes them on shutdown.
#[derive(Default)]
pub struct Telemetry {
    providers: Option<(SdkTracerProvider, SdkLoggerProvider)>,
}

impl Telemetry {
    pub fn shutdown(self) {
        if let Some((traces, logs)) = self.providers {
            if let Err(e) = traces.shutdown() {
                tracing::warn!(error = %e, "Failed to flush traces");
            }
            if let Err(e) = logs.shutdown() {
                tracing::warn!(error = %e, "Failed to flush logs");
            }
        }
    }
}

/// Quick TCP check so a missing collector doesn't stall every export.
fn collector_reachable(endpoint: &str) -> bool {
    let host_port = endpoint
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_end_matches('/');

    host_port
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| TcpStream::connect_timeout(&addr, Duration::from_millis(100)).is_ok())
        .unwrap_or(false)
}

fn build_providers(
    endpoint: &str,
    service_name: &str,
) -> anyhow::Result<(SdkTracerProvider, SdkLoggerProvider)> {
    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    let span_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;
    let traces = SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .with_resource(resource.clone())
        .build();

    let log_exporter = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;
    let logs = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    Ok((traces, logs))
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_telemetry() -> Telemetry {
    let endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();
    let service_name =
        env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());

    let mut setup_note = None;
    let providers = match endpoint.as_deref() {
        Some(endpoint) if collector_reachable(endpoint) => {
            match build_providers(endpoint, &service_name) {
                Ok(providers) => Some(providers),
                Err(e) => {
                    setup_note = Some(format!("OTLP exporter setup failed: {e}"));
                    None
                }
            }
        }
        Some(endpoint) => {
            setup_note = Some(format!(
                "OpenTelemetry endpoint {endpoint} not reachable, using console logging only"
            ));
            None
        }
        None => None,
    };

    let otel_trace_layer = providers.as_ref().map(|(traces, _)| {
        tracing_opentelemetry::layer().with_tracer(traces.tracer(DEFAULT_SERVICE_NAME))
    });
    let otel_log_layer = providers
        .as_ref()
        .map(|(_, logs)| OpenTelemetryTracingBridge::new(logs));

    if let Some((traces, _)) = &providers {
        opentelemetry::global::set_tracer_provider(traces.clone());
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(otel_trace_layer)
        .with(otel_log_layer)
        .init();

    match (&providers, setup_note) {
        (Some(_), _) => tracing::info!(
            endpoint = endpoint.as_deref().unwrap_or_default(),
            service_name = %service_name,
            "OpenTelemetry enabled, exporting traces and logs"
        ),
        (None, Some(note)) => tracing::warn!("{}", note),
        (None, None) => {
            tracing::debug!("OTEL_EXPORTER_OTLP_ENDPOINT not set, using console logging only")
        }
    }

    Telemetry { providers }
}
