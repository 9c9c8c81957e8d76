use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::cli::deploy::DeployCommand;
use crate::config::Config;
use crate::core::reporter::{print_snapshot, print_summary};
use crate::core::Orchestrator;
use crate::error::DeployError;
use crate::models::{RunConfig, RunSummary};
use crate::utils::network::HttpProbe;
use crate::utils::shell::SystemRunner;

/// Обработчик запуска развертывания
pub async fn handle_deploy_command(
    command: DeployCommand,
    config_file: &str,
) -> Result<RunSummary, DeployError> {
    info!("📦 Запуск развертывания");

    let run = RunConfig::new(
        &command.environment,
        command.skip_build,
        command.skip_deploy,
        command.force,
    )?;

    let mut config = Config::load(config_file)
        .map_err(|e| DeployError::Configuration(format!("{:#}", e)))?;

    if let Some(ref namespace) = command.namespace {
        info!("Namespace переопределен: {}", namespace);
        config.project.namespace = namespace.clone();
    }

    let project_root = std::env::current_dir().map_err(|e| {
        DeployError::Environment(format!("не удалось определить текущую директорию: {}", e))
    })?;

    let runner = SystemRunner::new(
        project_root,
        Duration::from_secs(config.tools.command_timeout_secs),
    );
    let probe = HttpProbe::new(Duration::from_secs(config.health.probe_timeout_secs))
        .map_err(|e| DeployError::Environment(format!("{:#}", e)))?;

    let orchestrator = Orchestrator::prepare(config, run, Arc::new(runner), Arc::new(probe))?;

    let outcome = orchestrator.execute().await?;
    print_snapshot(&outcome.snapshot);
    print_summary(&outcome.summary);
    Ok(outcome.summary)
}

/// Логирует фатальную ошибку и возвращает код завершения
pub fn report_failure(err: &DeployError) -> i32 {
    error!("❌ [{}] {}", err.kind(), err);
    err.exit_code()
}
