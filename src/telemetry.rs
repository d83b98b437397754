use opentelemetry::{global, trace::TracerProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use tracing_subscriber::{
    EnvFilter, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{config::Config, otel};

/// Installs the global subscriber. With OTLP enabled, spans also go to the
/// collector and metrics are exported; the returned providers must be shut
/// down on exit.
pub fn init_telemetry(config: &Config) -> anyhow::Result<Option<otel::Providers>> {
    let providers = if config.otlp_enabled {
        Some(otel::init_providers(&config.service_name)?)
    } else {
        None
    };

    let otel_layer = providers.as_ref().map(|providers| {
        let tracer = providers.tracer.tracer(config.service_name.clone());
        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    if let Some(providers) = &providers {
        global::set_text_map_propagator(TraceContextPropagator::new());
        global::set_tracer_provider(providers.tracer.clone());
        global::set_meter_provider(providers.meter.clone());
    }

    let fmt_layer =
        tracing_subscriber::fmt::layer().with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(providers)
}
