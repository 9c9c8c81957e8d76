use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use std::time::Duration;

/// Простой враппер над indicatif::ProgressBar
#[derive(Debug)]
pub struct Spinner {
    inner: IndicatifBar,
}

impl Spinner {
    /// Запускает спиннер с автоматическим тиком
    pub fn start<S: Into<String>>(msg: S) -> Self {
        let bar = IndicatifBar::new_spinner();
        let template = "{spinner:.green} [{elapsed_precise}] {msg}";
        if let Ok(style) = ProgressStyle::with_template(template) {
            bar.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
        }
        bar.set_message(msg.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { inner: bar }
    }

    /// Убирает спиннер с экрана без итогового сообщения
    pub fn clear(&self) {
        self.inner.finish_and_clear();
    }
}
