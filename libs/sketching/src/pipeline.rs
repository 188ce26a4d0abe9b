use std::str::FromStr;

use tracing::Subscriber;
use tracing_subscriber::{
    filter::{Directive, LevelFilter},
    prelude::*,
    EnvFilter, Registry,
};

/// Build the subscriber an embedding process should install. Access decisions
/// are always emitted at info, regardless of the configured level.
pub fn start_logging_pipeline(
    log_filter: crate::LogLevel,
) -> Result<Box<dyn Subscriber + Send + Sync>, String> {
    let access_directive = Directive::from_str("adminacl_lib::server::access=info")
        .map_err(|err| format!("Invalid directive during log setup: {}", err))?;

    let logging_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(log_filter).into())
        .parse("")
        .map_err(|err| format!("Failed to create logging filter: {}", err))?
        .add_directive(access_directive);

    eprintln!(
        "Logging filter initialized: {:?}",
        logging_filter.to_string()
    );

    let forest_layer = tracing_forest::ForestLayer::default().with_filter(logging_filter);
    Ok(Box::new(Registry::default().with(forest_layer)))
}
