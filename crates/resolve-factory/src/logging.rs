use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize a tracing subscriber for resolver diagnostics.
///
/// The filter comes from `RUST_LOG`, defaulting to "info". Cache hits and
/// misses are logged at debug level under the `resolve_factory` target, so
/// `RUST_LOG=resolve_factory=debug` shows every lookup.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    install(filter_layer)
}

/// Initialize with an explicit filter directive, ignoring `RUST_LOG`.
pub fn init_with_filter(directive: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    install(EnvFilter::try_new(directive)?)
}

fn install(filter_layer: EnvFilter) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
