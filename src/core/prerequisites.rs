use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::DeployError;
use crate::utils::shell::CommandRunner;

/// Проверка внешних утилит, docker daemon и доступности кластера
pub struct PrerequisiteChecker<'a> {
    config: &'a Config,
    runner: &'a dyn CommandRunner,
}

impl<'a> PrerequisiteChecker<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    /// Полная проверка; при отсутствии коллекции ansible-galaxy ставит ее
    pub async fn check(&self) -> Result<(), DeployError> {
        info!("🔍 Проверка необходимых утилит");

        self.check_tools()?;
        self.check_docker_daemon().await?;
        self.check_cluster().await?;
        self.ensure_collections().await?;

        info!("✅ Все предварительные проверки пройдены");
        Ok(())
    }

    fn check_tools(&self) -> Result<(), DeployError> {
        let missing: Vec<&str> = self
            .config
            .tools
            .required
            .iter()
            .map(String::as_str)
            .filter(|tool| !self.runner.is_available(tool))
            .collect();

        if !missing.is_empty() {
            return Err(DeployError::Environment(format!(
                "не найдены утилиты в PATH: {}",
                missing.join(", ")
            )));
        }

        debug!("Найдены утилиты: {}", self.config.tools.required.join(", "));
        Ok(())
    }

    async fn check_docker_daemon(&self) -> Result<(), DeployError> {
        let output = self
            .runner
            .run("docker", &["info".to_string()])
            .await
            .map_err(|e| launch_error("docker", e))?;

        if !output.success() {
            return Err(DeployError::Environment(format!(
                "Docker daemon недоступен: {}",
                output.first_error_line()
            )));
        }

        info!("🐳 Docker daemon доступен");
        Ok(())
    }

    async fn check_cluster(&self) -> Result<(), DeployError> {
        let output = self
            .runner
            .run("kubectl", &["cluster-info".to_string()])
            .await
            .map_err(|e| launch_error("kubectl", e))?;

        if !output.success() {
            return Err(DeployError::Environment(format!(
                "Kubernetes кластер недоступен: {}",
                output.first_error_line()
            )));
        }

        info!("☸️ Kubernetes кластер доступен");
        Ok(())
    }

    async fn ensure_collections(&self) -> Result<(), DeployError> {
        for collection in &self.config.ansible.collections {
            let list_args = ["collection", "list", collection.as_str()].map(String::from);
            let installed = match self.runner.run("ansible-galaxy", &list_args).await {
                Ok(out) => out.success() && out.stdout.contains(collection.as_str()),
                Err(e) => {
                    debug!("ansible-galaxy collection list не выполнен: {:#}", e);
                    false
                }
            };

            if installed {
                debug!("Коллекция {} уже установлена", collection);
                continue;
            }

            warn!("📦 Коллекция {} не найдена, устанавливаем", collection);
            let install_args = ["collection", "install", collection.as_str()].map(String::from);
            let output = self
                .runner
                .run("ansible-galaxy", &install_args)
                .await
                .map_err(|e| launch_error("ansible-galaxy", e))?;

            if !output.success() {
                return Err(DeployError::Environment(format!(
                    "не удалось установить коллекцию {}: {}",
                    collection,
                    output.first_error_line()
                )));
            }

            info!("✅ Коллекция {} установлена", collection);
        }

        Ok(())
    }
}

fn launch_error(program: &str, e: anyhow::Error) -> DeployError {
    DeployError::Environment(format!("не удалось запустить {}: {:#}", program, e))
}
