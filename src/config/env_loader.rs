use std::path::PathBuf;
use tracing::{debug, info};

/// Загрузчик переменных окружения из .env файла
pub struct EnvLoader;

impl EnvLoader {
    /// Загружает переменные окружения из .env файла, если он есть.
    /// Вызывается до инициализации логирования, поэтому результат логируется отдельно
    pub fn load() -> Result<PathBuf, dotenv::Error> {
        dotenv::dotenv()
    }

    pub fn log_outcome(outcome: &Result<PathBuf, dotenv::Error>) {
        match outcome {
            Ok(path) => info!("Загружен .env файл: {}", path.display()),
            Err(e) => debug!(
                "Файл .env не загружен ({}), используем переменные окружения системы",
                e
            ),
        }
    }
}
