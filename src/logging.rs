use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config,
};

/// Set up logging to stderr at the given level.
///
/// Library code only uses the `log` macros, so programs that embed this crate
/// are free to install a different logger instead of calling this.
pub fn init_logging(level: log::LevelFilter) -> Result<(), LoggingError> {
    let stderr = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{h({d(%Y-%m-%d %H:%M:%S)} [{l}] from line {L} in {M})} - {m}{n}",
        )))
        .target(Target::Stderr)
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .map_err(|e| LoggingError(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| LoggingError(e.to_string()))?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to initialize logging: {0}")]
pub struct LoggingError(String);
