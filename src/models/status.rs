use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::environment::Environment;

/// Фаза пайплайна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Prerequisites,
    Build,
    Deploy,
    HealthCheck,
    Report,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Prerequisites => "prerequisites",
            Phase::Build => "build",
            Phase::Deploy => "deploy",
            Phase::HealthCheck => "health-check",
            Phase::Report => "report",
        };
        f.write_str(name)
    }
}

/// Итог выполнения фазы
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseOutcome {
    Completed,
    Skipped,
    /// Фаза упала, но запуск продолжен из-за --force
    Forced(String),
    /// Фаза завершена с некритичными предупреждениями
    Warned(Vec<String>),
}

impl fmt::Display for PhaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseOutcome::Completed => f.write_str("completed"),
            PhaseOutcome::Skipped => f.write_str("skipped"),
            PhaseOutcome::Forced(_) => f.write_str("forced"),
            PhaseOutcome::Warned(w) => write!(f, "warned ({})", w.len()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub phase: Phase,
    pub outcome: PhaseOutcome,
    pub elapsed: Duration,
}

/// Адрес сервиса внутри кластера
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    pub workload: String,
    pub service: String,
    pub address: String,
}

impl ServiceEndpoint {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.address, path)
    }
}

/// Снимок состояния namespace на момент окончания запуска
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub namespace: String,
    pub captured_at: DateTime<Utc>,
    /// Пары (вид ресурса, вывод kubectl get)
    pub sections: Vec<(String, String)>,
}

/// Итог всего запуска
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub environment: Environment,
    pub namespace: String,
    pub started_at: DateTime<Utc>,
    pub phases: Vec<PhaseRecord>,
    pub endpoints: Vec<ServiceEndpoint>,
}

impl RunSummary {
    pub fn new(environment: Environment, namespace: &str) -> Self {
        Self {
            environment,
            namespace: namespace.to_string(),
            started_at: Utc::now(),
            phases: Vec::new(),
            endpoints: Vec::new(),
        }
    }

    pub fn record(&mut self, phase: Phase, outcome: PhaseOutcome, elapsed: Duration) {
        self.phases.push(PhaseRecord {
            phase,
            outcome,
            elapsed,
        });
    }

    pub fn outcome_of(&self, phase: Phase) -> Option<&PhaseOutcome> {
        self.phases.iter().find(|r| r.phase == phase).map(|r| &r.outcome)
    }

    pub fn ran(&self, phase: Phase) -> bool {
        matches!(
            self.outcome_of(phase),
            Some(PhaseOutcome::Completed)
                | Some(PhaseOutcome::Forced(_))
                | Some(PhaseOutcome::Warned(_))
        )
    }

    /// Все предупреждения запуска, включая пропуски фаз и форсированные ошибки
    pub fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        for record in &self.phases {
            match &record.outcome {
                PhaseOutcome::Skipped => out.push(format!("фаза {} пропущена", record.phase)),
                PhaseOutcome::Forced(reason) => out.push(format!("{}: {}", record.phase, reason)),
                PhaseOutcome::Warned(list) => out.extend(list.iter().cloned()),
                PhaseOutcome::Completed => {}
            }
        }
        out
    }
}
