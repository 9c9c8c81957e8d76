use tokio::signal;
use tracing::error;

/// Код завершения при прерывании по SIGINT (128 + 2)
pub const EXIT_INTERRUPTED: i32 = 130;
/// Код завершения при прерывании по SIGTERM (128 + 15)
pub const EXIT_TERMINATED: i32 = 143;

/// Ждет Ctrl+C или SIGTERM и возвращает соответствующий код завершения
pub async fn shutdown_signal() -> i32 {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Не удалось установить обработчик Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Не удалось установить обработчик SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => EXIT_INTERRUPTED,
        () = terminate => EXIT_TERMINATED,
    }
}
