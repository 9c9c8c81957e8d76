use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DeployError;

/// Целевое окружение развертывания
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub const ALL: [Environment; 3] = [
        Environment::Development,
        Environment::Staging,
        Environment::Production,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .into_iter()
            .find(|env| env.as_str() == s)
            .ok_or_else(|| {
                DeployError::Configuration(format!(
                    "неизвестное окружение '{}', допустимые значения: development, staging, production",
                    s
                ))
            })
    }
}

/// Параметры одного запуска, неизменяемые после разбора аргументов
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub environment: Environment,
    pub skip_build: bool,
    pub skip_deploy: bool,
    pub force: bool,
}

impl RunConfig {
    /// Собирает конфигурацию запуска, проверяя имя окружения
    pub fn new(
        environment: &str,
        skip_build: bool,
        skip_deploy: bool,
        force: bool,
    ) -> Result<Self, DeployError> {
        Ok(Self {
            environment: environment.parse()?,
            skip_build,
            skip_deploy,
            force,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_environments() {
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("staging".parse::<Environment>().unwrap(), Environment::Staging);
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
    }

    #[test]
    fn test_reject_unknown_environment() {
        for bad in ["prod", "dev", "Production", "", " staging"] {
            let err = bad.parse::<Environment>().unwrap_err();
            assert_eq!(err.kind(), "ConfigurationError", "value {:?}", bad);
        }
    }

    #[test]
    fn test_run_config_keeps_flags() {
        let run = RunConfig::new("staging", true, false, true).unwrap();
        assert_eq!(run.environment, Environment::Staging);
        assert!(run.skip_build);
        assert!(!run.skip_deploy);
        assert!(run.force);
    }
}
