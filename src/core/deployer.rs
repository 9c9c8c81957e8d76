use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::core::ansible::run_playbook;
use crate::error::DeployError;
use crate::models::Environment;
use crate::utils::shell::CommandRunner;

/// Движок деплоя в Kubernetes через ansible playbook
pub struct ClusterDeployer<'a> {
    config: &'a Config,
    runner: &'a dyn CommandRunner,
}

impl<'a> ClusterDeployer<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    /// Выполнить деплой. Решение о --force принимает вызывающий
    pub async fn deploy(
        &self,
        environment: Environment,
        extra_vars: &Path,
    ) -> Result<(), DeployError> {
        info!(
            "📦 Развертывание в namespace {} (окружение {})",
            self.config.project.namespace, environment
        );

        let ansible = &self.config.ansible;
        let output = run_playbook(self.runner, ansible, &ansible.deploy_playbook, extra_vars)
            .await
            .map_err(|e| DeployError::Deploy(format!("{:#}", e)))?;

        if !output.success() {
            return Err(DeployError::Deploy(format!(
                "{} завершился с кодом {:?}: {}",
                ansible.deploy_playbook,
                output.code,
                output.first_error_line()
            )));
        }

        info!("✅ Деплой завершен");
        Ok(())
    }
}
