//! Telemetry initialization.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,api_server=debug,quill_infra=debug";

/// Telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Enable JSON logging (for production).
    pub json_logs: bool,
    pub service_name: String,
    /// OTLP collector endpoint. Only read with the `otel` feature.
    #[cfg_attr(not(feature = "otel"), allow(dead_code))]
    pub otlp_endpoint: Option<String>,
}

impl TelemetryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            service_name: std::env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "quill-api".to_string()),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok(),
        }
    }
}

#[cfg(feature = "otel")]
mod otel {
    use opentelemetry::{KeyValue, trace::TracerProvider as _};
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::{Resource, runtime, trace::Tracer};
    use tracing_opentelemetry::OpenTelemetryLayer;
    use tracing_subscriber::Registry;

    use super::TelemetryConfig;

    /// OTLP span export layer, or `None` when no endpoint is configured.
    pub fn layer(config: &TelemetryConfig) -> Option<OpenTelemetryLayer<Registry, Tracer>> {
        let endpoint = config.otlp_endpoint.as_ref()?;

        let exporter = match opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint.clone())
            .build()
        {
            Ok(exporter) => exporter,
            Err(e) => {
                // The subscriber is not installed yet.
                eprintln!("OTLP exporter disabled: {e}");
                return None;
            }
        };

        let provider = opentelemetry_sdk::trace::TracerProvider::builder()
            .with_batch_exporter(exporter, runtime::Tokio)
            .with_resource(Resource::new(vec![KeyValue::new(
                "service.name",
                config.service_name.clone(),
            )]))
            .build();
        let tracer = provider.tracer(config.service_name.clone());
        opentelemetry::global::set_tracer_provider(provider);

        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_telemetry(config: &TelemetryConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    #[cfg(feature = "otel")]
    let otel_layer = otel::layer(config);
    #[cfg(not(feature = "otel"))]
    let otel_layer: Option<tracing_subscriber::layer::Identity> = None;

    let exporting = otel_layer.is_some();

    if config.json_logs {
        tracing_subscriber::registry()
            .with(otel_layer)
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(otel_layer)
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        otlp = exporting,
        "Telemetry initialized"
    );
}

/// Flush pending spans on exit.
pub fn shutdown_telemetry() {
    #[cfg(feature = "otel")]
    opentelemetry::global::shutdown_tracer_provider();
}
