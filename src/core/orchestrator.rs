use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::{Config, ConfigValidator};
use crate::core::builder::ImageBuilder;
use crate::core::deployer::ClusterDeployer;
use crate::core::health::HealthChecker;
use crate::core::prerequisites::PrerequisiteChecker;
use crate::core::reporter::StatusReporter;
use crate::error::DeployError;
use crate::models::{Phase, PhaseOutcome, RunConfig, RunSummary, StatusSnapshot};
use crate::utils::network::HealthProbe;
use crate::utils::scratch::{ExtraVars, ScratchSpace};
use crate::utils::shell::CommandRunner;

/// Итог успешного запуска
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub snapshot: StatusSnapshot,
}

/// Последовательный пайплайн: prerequisites -> build -> deploy -> health -> report
pub struct Orchestrator {
    config: Config,
    run: RunConfig,
    runner: Arc<dyn CommandRunner>,
    probe: Arc<dyn HealthProbe>,
}

impl Orchestrator {
    /// Проверяет конфигурацию. Внешние команды не вызываются
    pub fn prepare(
        config: Config,
        run: RunConfig,
        runner: Arc<dyn CommandRunner>,
        probe: Arc<dyn HealthProbe>,
    ) -> Result<Self, DeployError> {
        ConfigValidator::validate(&config)?;
        Ok(Self {
            config,
            run,
            runner,
            probe,
        })
    }

    /// Выполняет фазы по порядку; первая фатальная ошибка прерывает запуск
    pub async fn execute(&self) -> Result<RunOutcome, DeployError> {
        let runner = self.runner.as_ref();
        let namespace = self.config.project.namespace.as_str();
        let mut summary = RunSummary::new(self.run.environment, namespace);

        info!(
            "🚀 Развертывание {} в окружение {} (namespace {})",
            self.config.project.name, self.run.environment, namespace
        );

        let started = Instant::now();
        PrerequisiteChecker::new(&self.config, runner).check().await?;
        summary.record(Phase::Prerequisites, PhaseOutcome::Completed, started.elapsed());

        // extra-vars нужны только фазам с playbook; директория живет до конца deploy
        let scratch = if self.run.skip_build && self.run.skip_deploy {
            None
        } else {
            let scratch = ScratchSpace::new()
                .map_err(|e| DeployError::Environment(format!("{:#}", e)))?;
            let vars = ExtraVars {
                environment: self.run.environment.as_str(),
                namespace,
                project_name: &self.config.project.name,
            };
            let path = scratch
                .write_extra_vars(&vars)
                .map_err(|e| DeployError::Environment(format!("{:#}", e)))?;
            Some((scratch, path))
        };

        let started = Instant::now();
        match &scratch {
            Some((_, vars)) if !self.run.skip_build => {
                ImageBuilder::new(&self.config, runner)
                    .build(self.run.environment, vars)
                    .await?;
                summary.record(Phase::Build, PhaseOutcome::Completed, started.elapsed());
            }
            _ => {
                warn!("⚠️ Сборка образов пропущена (--skip-build)");
                summary.record(Phase::Build, PhaseOutcome::Skipped, started.elapsed());
            }
        }

        let started = Instant::now();
        match &scratch {
            Some((_, vars)) if !self.run.skip_deploy => {
                let deployer = ClusterDeployer::new(&self.config, runner);
                match deployer.deploy(self.run.environment, vars).await {
                    Ok(()) => {
                        summary.record(Phase::Deploy, PhaseOutcome::Completed, started.elapsed())
                    }
                    Err(e) if self.run.force => {
                        warn!("⚠️ {}, продолжаем из-за --force", e);
                        let outcome = PhaseOutcome::Forced(e.to_string());
                        summary.record(Phase::Deploy, outcome, started.elapsed());
                    }
                    Err(e) => return Err(e),
                }
            }
            _ => {
                warn!("⚠️ Развертывание пропущено (--skip-deploy)");
                summary.record(Phase::Deploy, PhaseOutcome::Skipped, started.elapsed());
            }
        }
        drop(scratch);

        let started = Instant::now();
        let health = HealthChecker::new(&self.config, runner, self.probe.as_ref())
            .run()
            .await?;
        let outcome = if health.warnings.is_empty() {
            PhaseOutcome::Completed
        } else {
            PhaseOutcome::Warned(health.warnings)
        };
        summary.record(Phase::HealthCheck, outcome, started.elapsed());
        summary.endpoints = health.endpoints;

        let started = Instant::now();
        let snapshot = StatusReporter::new(runner, namespace).snapshot().await;
        summary.record(Phase::Report, PhaseOutcome::Completed, started.elapsed());

        info!("✅ Развертывание завершено");
        Ok(RunOutcome { summary, snapshot })
    }
}
