use log::LevelFilter;
use simplelog::{ConfigBuilder, SimpleLogger};

/// Plain stdout logger for local runs without a logfire token.
pub fn setup_simple_logger() -> anyhow::Result<()> {
    let logger_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("chatwoot_bridge")
        .build();

    Ok(SimpleLogger::init(LevelFilter::Info, logger_config)?)
}
