use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Префикс переменных окружения, переопределяющих конфигурацию
pub const ENV_PREFIX: &str = "STACK_DEPLOY";

/// Структура для хранения конфигурации
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub ansible: AnsibleConfig,
    pub tools: ToolsConfig,
    pub health: HealthConfig,
    pub workloads: Vec<WorkloadConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            ansible: AnsibleConfig::default(),
            tools: ToolsConfig::default(),
            health: HealthConfig::default(),
            workloads: default_workloads(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub namespace: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "fullstack-app".to_string(),
            namespace: "fullstack-app".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AnsibleConfig {
    pub inventory: String,
    pub build_playbook: String,
    pub deploy_playbook: String,
    /// Коллекции ansible-galaxy, которые устанавливаются автоматически
    pub collections: Vec<String>,
}

impl Default for AnsibleConfig {
    fn default() -> Self {
        Self {
            inventory: "ansible/inventory/hosts.yml".to_string(),
            build_playbook: "ansible/playbooks/build-images.yml".to_string(),
            deploy_playbook: "ansible/playbooks/deploy-k8s.yml".to_string(),
            collections: vec!["kubernetes.core".to_string()],
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ToolsConfig {
    pub required: Vec<String>,
    pub command_timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            required: ["ansible-playbook", "ansible-galaxy", "kubectl", "docker", "helm"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            command_timeout_secs: 1800,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct HealthConfig {
    pub readiness_timeout_secs: u64,
    pub probe_timeout_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            readiness_timeout_secs: 300,
            probe_timeout_secs: 10,
        }
    }
}

/// Ворклоад приложения: Deployment + Service + путь health-проверки
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WorkloadConfig {
    pub name: String,
    pub deployment: String,
    pub service: String,
    #[serde(default = "default_health_path")]
    pub health_path: String,
}

fn default_health_path() -> String {
    "/".to_string()
}

fn default_workloads() -> Vec<WorkloadConfig> {
    vec![
        WorkloadConfig {
            name: "backend".to_string(),
            deployment: "backend".to_string(),
            service: "backend-service".to_string(),
            health_path: "/actuator/health".to_string(),
        },
        WorkloadConfig {
            name: "frontend".to_string(),
            deployment: "frontend".to_string(),
            service: "frontend-service".to_string(),
            health_path: "/".to_string(),
        },
    ]
}

impl Config {
    /// Загружает конфигурацию: TOML файл (если есть) + переопределения из STACK_DEPLOY__*
    pub fn load(file_path: &str) -> Result<Self> {
        let mut builder = config::Config::builder();

        if Path::new(file_path).exists() {
            info!("Загрузка конфигурации из файла: {}", file_path);
            let content = fs::read_to_string(file_path)
                .with_context(|| format!("Не удалось прочитать файл конфигурации: {}", file_path))?;

            // Подстановка переменных окружения
            let processed_content = Self::substitute_env_vars(&content);
            builder = builder.add_source(config::File::from_str(
                &processed_content,
                config::FileFormat::Toml,
            ));
        } else {
            warn!(
                "Файл конфигурации {} не найден, используются значения по умолчанию",
                file_path
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: Config = builder
            .build()
            .context("Ошибка сборки конфигурации")?
            .try_deserialize()
            .context("Ошибка парсинга конфигурации")?;

        info!("Конфигурация успешно загружена");
        Ok(config)
    }

    /// Разбирает конфигурацию из TOML строки без переопределений окружения
    #[cfg(test)]
    pub fn from_toml(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        toml::from_str(&processed_content).context("Ошибка парсинга TOML конфигурации")
    }

    /// Подставляет переменные окружения в формате ${VAR_NAME}
    fn substitute_env_vars(content: &str) -> String {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").expect("valid regex");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                warn!("Переменная окружения не найдена: {}", var_name);
                format!("${{{}}}", var_name) // Оставляем как есть, если переменная не найдена
            })
        })
        .to_string()
    }
}
