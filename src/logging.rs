use crate::config::Config;
use chrono::Local;
use fern::Dispatch;
use log::{info, LevelFilter};

pub fn init_logging(config: &Config) -> Result<(), fern::InitError> {
    let log_level = parse_level(&config.log_level);

    Dispatch::new()
        .level(log_level)
        // reqwest/hyper connection chatter drowns out probe results at debug
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Info)
        .chain(std::io::stdout())
        .chain(fern::log_file(&config.log_file)?)
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.target(),
                record.level(),
                message
            ))
        })
        .apply()?;

    info!("Logging initialized with level: {}", config.log_level);
    Ok(())
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}
