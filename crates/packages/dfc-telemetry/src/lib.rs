use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;

/// Builds the log filter. `RUST_LOG` wins over `default_directive`, which
/// usually comes from the `log.level` setting.
pub fn env_filter(default_directive: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive)
            .with_context(|| format!("invalid log directive {default_directive:?}")),
    }
}

/// Installs the global subscriber: an env filter and a plain-text fmt layer.
///
/// Fails if a global subscriber is already set.
pub fn init_subscriber(service_name: &str, default_directive: &str) -> Result<()> {
    let subscriber = tracing_subscriber::registry()
        .with(env_filter(default_directive)?)
        .with(tracing_subscriber::fmt::layer().with_target(true));
    tracing::subscriber::set_global_default(subscriber)
        .context("global tracing subscriber already installed")?;

    tracing::info!(service = service_name, "telemetry initialised");
    Ok(())
}
