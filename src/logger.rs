//! Logging setup using tracing
//!
//! The terminal belongs to the UI, so every log line goes to a daily file under
//! the user data dir. Level is controlled by `VOCAB_QUIZ_LOG`.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

pub const LOG_ENV: &str = "VOCAB_QUIZ_LOG";
const LOG_FILE: &str = "vocab-quiz.log";

pub fn init() -> Result<PathBuf> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE);

    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("vocab_quiz=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()
        .ok();

    tracing::info!("vocab-quiz starting, logs in {}", log_dir.display());
    Ok(log_dir)
}

pub fn log_directory() -> PathBuf {
    crate::db::data_dir().join("logs")
}
