use std::{env, str::FromStr, time::SystemTime};

use anyhow::Result;
use colored::Colorize;
use log::{Level, LevelFilter};

const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

fn colored_level(level: Level) -> String {
    match level {
        Level::Error => level.as_str().red().bold().to_string(),
        Level::Warn => level.as_str().yellow().to_string(),
        Level::Info => level.as_str().green().to_string(),
        Level::Debug => level.as_str().blue().to_string(),
        Level::Trace => level.as_str().dimmed().to_string(),
    }
}

fn level_from_env() -> LevelFilter {
    env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|value| LevelFilter::from_str(&value).ok())
        .unwrap_or(LevelFilter::Info)
}

pub fn setup_logger() -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                colored_level(record.level()),
                record.target(),
                message
            ))
        })
        .level(level_from_env())
        // reqwest/hyper are chatty at debug
        .level_for("hyper", LevelFilter::Info)
        .level_for("reqwest", LevelFilter::Info)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}
