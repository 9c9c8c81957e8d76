use std::collections::HashSet;
use tracing::info;

use crate::config::parser::{
    AnsibleConfig, Config, HealthConfig, ProjectConfig, ToolsConfig, WorkloadConfig,
};
use crate::error::DeployError;

/// Валидатор конфигурации
pub struct ConfigValidator;

impl ConfigValidator {
    /// Полная валидация конфигурации
    pub fn validate(config: &Config) -> Result<(), DeployError> {
        info!("Начало валидации конфигурации");

        Self::validate_project(&config.project)?;
        Self::validate_ansible(&config.ansible)?;
        Self::validate_tools(&config.tools)?;
        Self::validate_health(&config.health)?;
        Self::validate_workloads(&config.workloads)?;

        info!("Валидация конфигурации успешно завершена");
        Ok(())
    }

    fn validate_project(project: &ProjectConfig) -> Result<(), DeployError> {
        if project.name.is_empty() {
            return Err(invalid("Имя проекта не может быть пустым"));
        }

        // Namespace в Kubernetes: DNS-1123 label
        let re = regex::Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid regex");
        if project.namespace.len() > 63 || !re.is_match(&project.namespace) {
            return Err(invalid(&format!(
                "Некорректный namespace '{}': допускаются строчные латинские буквы, цифры и '-', до 63 символов",
                project.namespace
            )));
        }

        Ok(())
    }

    fn validate_ansible(ansible: &AnsibleConfig) -> Result<(), DeployError> {
        if ansible.inventory.is_empty() {
            return Err(invalid("Путь к inventory не может быть пустым"));
        }

        if ansible.build_playbook.is_empty() {
            return Err(invalid("Путь к playbook сборки не может быть пустым"));
        }

        if ansible.deploy_playbook.is_empty() {
            return Err(invalid("Путь к playbook развертывания не может быть пустым"));
        }

        if ansible.collections.iter().any(|c| c.trim().is_empty()) {
            return Err(invalid("Имя коллекции ansible-galaxy не может быть пустым"));
        }

        Ok(())
    }

    fn validate_tools(tools: &ToolsConfig) -> Result<(), DeployError> {
        if tools.command_timeout_secs == 0 {
            return Err(invalid("Таймаут внешних команд должен быть больше 0"));
        }

        if tools.required.iter().any(|t| t.trim().is_empty()) {
            return Err(invalid("Имя обязательной утилиты не может быть пустым"));
        }

        Ok(())
    }

    fn validate_health(health: &HealthConfig) -> Result<(), DeployError> {
        if health.readiness_timeout_secs == 0 {
            return Err(invalid("Таймаут ожидания готовности должен быть больше 0"));
        }

        if health.probe_timeout_secs == 0 {
            return Err(invalid("Таймаут health-запроса должен быть больше 0"));
        }

        Ok(())
    }

    fn validate_workloads(workloads: &[WorkloadConfig]) -> Result<(), DeployError> {
        if workloads.is_empty() {
            return Err(invalid("Не задано ни одного ворклоада"));
        }

        let mut seen = HashSet::new();
        for w in workloads {
            if w.name.is_empty() || w.deployment.is_empty() || w.service.is_empty() {
                return Err(invalid("У ворклоада должны быть заданы name, deployment и service"));
            }

            if !seen.insert(w.name.as_str()) {
                return Err(invalid(&format!("Ворклоад '{}' объявлен повторно", w.name)));
            }

            if !w.health_path.starts_with('/') {
                return Err(invalid(&format!(
                    "health_path ворклоада '{}' должен начинаться с '/'",
                    w.name
                )));
            }
        }

        Ok(())
    }
}

fn invalid(msg: &str) -> DeployError {
    DeployError::Configuration(msg.to_string())
}
