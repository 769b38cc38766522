use tracing_subscriber::EnvFilter;

pub type TelemetryError = Box<dyn std::error::Error + Send + Sync>;

/// Install the global fmt subscriber. `RUST_LOG` wins over `log_level`.
pub fn init(log_level: &str) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init()
}
