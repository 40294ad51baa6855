use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. An explicit `log_level` wins over
/// `RUST_LOG`; with neither, `info` is used.
pub fn init(log_level: Option<&str>) -> Result<()> {
    let env_filter = match log_level {
        Some(level) => EnvFilter::try_new(level),
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info")),
    }
    .map_err(|e| anyhow::anyhow!("failed to create log filter: {}", e))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))?;

    Ok(())
}
