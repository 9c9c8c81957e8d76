use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::fmt;

/// Уровень логирования из строки CLI; неизвестные значения дают INFO
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

/// Подписчик с двумя выходами: цветной stdout и дозапись в лог-файл без ANSI
pub fn subscriber(
    level: &str,
    log_file: &Path,
) -> Result<impl tracing::Subscriber + Send + Sync + 'static> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Не удалось открыть лог-файл: {}", log_file.display()))?;

    let filter = parse_level(level);

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stdout)
        .with_filter(filter);

    let file_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_filter(filter);

    Ok(tracing_subscriber::registry().with(stdout_layer).with(file_layer))
}

/// Инициализация глобального логирования
pub fn init(level: &str, log_file: &Path) -> Result<()> {
    subscriber(level, log_file)?
        .try_init()
        .context("Не удалось инициализировать логирование")
}
