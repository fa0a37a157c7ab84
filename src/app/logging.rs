//! logging stuff
use {
    crate::config::options::{LoggingCfg, LoggingFormat},
    color_eyre::Result,
    tracing::{Level, debug, subscriber},
    tracing_subscriber::FmtSubscriber,
};

/// turn a level name into a tracing level, `None` means logging is off
pub fn string_to_log_level(lvl: &str) -> Option<Level> {
    match lvl.to_lowercase().as_str() {
        "t" | "trace" | "trc" => Some(Level::TRACE),
        "d" | "debug" | "dbg" => Some(Level::DEBUG),
        "i" | "info" | "inf" => Some(Level::INFO),
        "w" | "warn" | "wrn" => Some(Level::WARN),
        "e" | "error" | "err" => Some(Level::ERROR),
        _ => None,
    }
}

/// setup logging
///
/// logs go to stderr, stdout is kept for download progress
///
/// # Errors
///
/// returns an error if a global subscriber is already installed
pub fn setup(cfg: &LoggingCfg) -> Result<()> {
    let Some(max_level) = string_to_log_level(&cfg.level) else {
        return Ok(());
    };

    if !cfg.enable {
        return Ok(());
    }

    let subscriber = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_max_level(max_level)
        .with_ansi(cfg.ansi)
        .with_line_number(cfg.line_numbers)
        .with_target(cfg.event_targets);

    match cfg.format {
        LoggingFormat::Pretty => {
            subscriber::set_global_default(subscriber.pretty().finish())?;
        }
        LoggingFormat::Compact => {
            subscriber::set_global_default(subscriber.compact().finish())?;
        }
    }

    debug!("logging setup successfully");
    Ok(())
}
