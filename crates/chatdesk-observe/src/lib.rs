//! Observability setup for chatdesk: structured logging and optional
//! OpenTelemetry trace export.

pub mod tracing_setup;
