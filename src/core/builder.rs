use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::core::ansible::run_playbook;
use crate::error::DeployError;
use crate::models::Environment;
use crate::utils::shell::CommandRunner;

/// Сборка docker-образов через ansible playbook
pub struct ImageBuilder<'a> {
    config: &'a Config,
    runner: &'a dyn CommandRunner,
}

impl<'a> ImageBuilder<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    /// Собирает образы для окружения. Ошибка всегда фатальна
    pub async fn build(
        &self,
        environment: Environment,
        extra_vars: &Path,
    ) -> Result<(), DeployError> {
        info!("🔨 Сборка образов для окружения {}", environment);

        let ansible = &self.config.ansible;
        let output = run_playbook(self.runner, ansible, &ansible.build_playbook, extra_vars)
            .await
            .map_err(|e| DeployError::Build(format!("{:#}", e)))?;

        if !output.success() {
            return Err(DeployError::Build(format!(
                "{} завершился с кодом {:?}: {}",
                ansible.build_playbook,
                output.code,
                output.first_error_line()
            )));
        }

        info!("✅ Образы собраны");
        Ok(())
    }
}
