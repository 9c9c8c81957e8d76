use thiserror::Error;

/// Фатальные ошибки пайплайна развертывания
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Ошибка конфигурации: {0}")]
    Configuration(String),

    #[error("Окружение не готово: {0}")]
    Environment(String),

    #[error("Сборка образов завершилась с ошибкой: {0}")]
    Build(String),

    #[error("Развертывание в кластер завершилось с ошибкой: {0}")]
    Deploy(String),

    #[error("Deployment '{workload}' не перешел в состояние Available за {timeout_secs} с")]
    ReadinessTimeout { workload: String, timeout_secs: u64 },
}

impl DeployError {
    /// Короткое имя категории ошибки для логов
    pub fn kind(&self) -> &'static str {
        match self {
            DeployError::Configuration(_) => "ConfigurationError",
            DeployError::Environment(_) => "EnvironmentError",
            DeployError::Build(_) => "BuildError",
            DeployError::Deploy(_) => "DeployError",
            DeployError::ReadinessTimeout { .. } => "ReadinessTimeoutError",
        }
    }

    /// Код завершения процесса
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployError::Configuration(_) => 2,
            DeployError::Environment(_) => 3,
            DeployError::Build(_) => 4,
            DeployError::Deploy(_) => 5,
            DeployError::ReadinessTimeout { .. } => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_and_non_zero() {
        let errors = [
            DeployError::Configuration("x".into()),
            DeployError::Environment("x".into()),
            DeployError::Build("x".into()),
            DeployError::Deploy("x".into()),
            DeployError::ReadinessTimeout {
                workload: "backend".into(),
                timeout_secs: 300,
            },
        ];

        let mut codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        assert!(codes.iter().all(|c| *c != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_readiness_timeout_message() {
        let err = DeployError::ReadinessTimeout {
            workload: "frontend".into(),
            timeout_secs: 300,
        };
        assert_eq!(err.kind(), "ReadinessTimeoutError");
        assert!(err.to_string().contains("frontend"));
        assert!(err.to_string().contains("300"));
    }
}
