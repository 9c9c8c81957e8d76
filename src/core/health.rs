use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::config::{Config, WorkloadConfig};
use crate::error::DeployError;
use crate::models::ServiceEndpoint;
use crate::utils::network::HealthProbe;
use crate::utils::progress::Spinner;
use crate::utils::shell::CommandRunner;

/// Результат health-фазы
#[derive(Debug, Clone, Default)]
pub struct HealthReport {
    pub endpoints: Vec<ServiceEndpoint>,
    pub warnings: Vec<String>,
}

/// Ожидание готовности Deployment-ов и проверка health-эндпоинтов
pub struct HealthChecker<'a> {
    config: &'a Config,
    runner: &'a dyn CommandRunner,
    probe: &'a dyn HealthProbe,
}

impl<'a> HealthChecker<'a> {
    pub fn new(
        config: &'a Config,
        runner: &'a dyn CommandRunner,
        probe: &'a dyn HealthProbe,
    ) -> Self {
        Self {
            config,
            runner,
            probe,
        }
    }

    /// Ждет готовности (фатально по таймауту), затем один раз пробует каждый сервис
    pub async fn run(&self) -> Result<HealthReport, DeployError> {
        self.wait_ready().await?;

        let mut report = HealthReport::default();
        for workload in &self.config.workloads {
            match self.resolve_endpoint(workload).await {
                Ok(endpoint) => {
                    let url = endpoint.url(&workload.health_path);
                    match self.probe.probe(&url).await {
                        Ok(status) => info!("💚 {} отвечает ({}): {}", workload.name, status, url),
                        Err(e) => {
                            let msg = format!("health-check {} не прошел: {:#}", workload.name, e);
                            warn!("⚠️ {}", msg);
                            report.warnings.push(msg);
                        }
                    }
                    report.endpoints.push(endpoint);
                }
                Err(msg) => {
                    warn!("⚠️ {}", msg);
                    report.warnings.push(msg);
                }
            }
        }

        Ok(report)
    }

    /// Ожидание condition=available для всех ворклоадов в пределах общего таймаута
    async fn wait_ready(&self) -> Result<(), DeployError> {
        let timeout_secs = self.config.health.readiness_timeout_secs;
        let deadline = Instant::now() + Duration::from_secs(timeout_secs);
        let namespace = &self.config.project.namespace;

        for workload in &self.config.workloads {
            let remaining = deadline.saturating_duration_since(Instant::now()).as_secs().max(1);
            let spinner =
                Spinner::start(format!("⏳ Ожидание готовности {}...", workload.deployment));

            let args = vec![
                "wait".to_string(),
                "--for=condition=available".to_string(),
                format!("--timeout={}s", remaining),
                format!("deployment/{}", workload.deployment),
                "-n".to_string(),
                namespace.clone(),
            ];

            let result = self.runner.run("kubectl", &args).await;
            spinner.clear();

            let timed_out = DeployError::ReadinessTimeout {
                workload: workload.deployment.clone(),
                timeout_secs,
            };

            match result {
                Ok(out) if out.success() => info!("✅ deployment/{} готов", workload.deployment),
                Ok(out) => {
                    error!("❌ kubectl wait: {}", out.first_error_line());
                    return Err(timed_out);
                }
                Err(e) => {
                    error!("❌ kubectl wait не выполнен: {:#}", e);
                    return Err(timed_out);
                }
            }
        }

        Ok(())
    }

    /// Адрес сервиса внутри кластера: clusterIP и первый порт
    async fn resolve_endpoint(&self, workload: &WorkloadConfig) -> Result<ServiceEndpoint, String> {
        let args = vec![
            "get".to_string(),
            "service".to_string(),
            workload.service.clone(),
            "-n".to_string(),
            self.config.project.namespace.clone(),
            "-o".to_string(),
            "jsonpath={.spec.clusterIP}:{.spec.ports[0].port}".to_string(),
        ];

        let output = self
            .runner
            .run("kubectl", &args)
            .await
            .map_err(|e| format!("не удалось получить адрес {}: {:#}", workload.service, e))?;

        if !output.success() {
            return Err(format!(
                "не удалось получить адрес {}: {}",
                workload.service,
                output.first_error_line()
            ));
        }

        let address = parse_address(&output.stdout).ok_or_else(|| {
            format!(
                "у сервиса {} нет clusterIP/порта: '{}'",
                workload.service,
                output.stdout.trim()
            )
        })?;

        Ok(ServiceEndpoint {
            workload: workload.name.clone(),
            service: workload.service.clone(),
            address,
        })
    }
}

/// Разбирает вывод jsonpath вида `10.96.0.10:8080`; IPv6 адрес берется в скобки
fn parse_address(raw: &str) -> Option<String> {
    let raw = raw.trim().trim_matches('\'');
    let (ip, port) = raw.rsplit_once(':')?;
    if ip.is_empty() || ip == "None" || port.parse::<u16>().is_err() {
        return None;
    }
    if ip.contains(':') && !ip.starts_with('[') {
        return Some(format!("[{}]:{}", ip, port));
    }
    Some(format!("{}:{}", ip, port))
}
