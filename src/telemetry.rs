//! Telemetry helpers for applications embedding `chart-map-rs`.
//!
//! Tracing setup stays opt-in. Hosts either call one of the init helpers
//! below or install their own `tracing` subscriber. Redraw decisions
//! (full vs fast transform) are logged at `debug`, per-entity work at `trace`.

/// Initializes a compact `tracing` subscriber filtered by `RUST_LOG`,
/// falling back to `info`.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter("info")
}

/// Same as [`init_default_tracing`] with a caller-provided fallback directive,
/// e.g. `"chart_map_rs=debug"` to watch transform-mode decisions.
#[must_use]
pub fn init_tracing_with_filter(fallback_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_directive)),
            )
            .with_target(true)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directive;
        false
    }
}
