use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

/// HTTP-проверка здоровья сервиса. Один запрос, без повторов
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Возвращает HTTP статус; ошибка, если ответ не 2xx или сервис недоступен
    async fn probe(&self, url: &str) -> Result<u16>;
}

/// Проба на базе reqwest
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .context("Не удалось создать HTTP клиент")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn probe(&self, url: &str) -> Result<u16> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Запрос {} не выполнен", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("{} ответил статусом {}", url, status));
        }

        Ok(status.as_u16())
    }
}
