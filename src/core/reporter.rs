use chrono::Utc;
use colored::*;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{info, warn};

use crate::models::{Phase, RunSummary, StatusSnapshot};
use crate::utils::shell::CommandRunner;

/// Ресурсы namespace, попадающие в итоговый отчет
pub const REPORT_RESOURCES: [&str; 4] = ["services", "deployments", "pods", "ingress"];

/// Сбор и вывод текущего состояния namespace
pub struct StatusReporter<'a> {
    runner: &'a dyn CommandRunner,
    namespace: &'a str,
}

impl<'a> StatusReporter<'a> {
    pub fn new(runner: &'a dyn CommandRunner, namespace: &'a str) -> Self {
        Self { runner, namespace }
    }

    /// Снимает листинги ресурсов. Ошибки kubectl только логируются
    pub async fn snapshot(&self) -> StatusSnapshot {
        info!("📊 Получение статуса развертывания");

        let mut sections = Vec::new();
        for resource in REPORT_RESOURCES {
            let args = vec![
                "get".to_string(),
                resource.to_string(),
                "-n".to_string(),
                self.namespace.to_string(),
                "-o".to_string(),
                "wide".to_string(),
            ];

            let text = match self.runner.run("kubectl", &args).await {
                Ok(out) if out.success() => out.stdout.trim_end().to_string(),
                Ok(out) => {
                    warn!("kubectl get {}: {}", resource, out.first_error_line());
                    format!("<недоступно: {}>", out.first_error_line())
                }
                Err(e) => {
                    warn!("kubectl get {} не выполнен: {:#}", resource, e);
                    format!("<недоступно: {}>", e)
                }
            };
            sections.push((resource.to_string(), text));
        }

        StatusSnapshot {
            namespace: self.namespace.to_string(),
            captured_at: Utc::now(),
            sections,
        }
    }
}

/// Выводит снимок состояния в удобном формате
pub fn print_snapshot(snapshot: &StatusSnapshot) {
    println!("{}", "=".repeat(60).bright_black());
    println!(
        "📊 СТАТУС РАЗВЕРТЫВАНИЯ: namespace {} ({})",
        snapshot.namespace.bright_blue(),
        snapshot.captured_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!("{}", "=".repeat(60).bright_black());

    for (resource, text) in &snapshot.sections {
        println!("\n{}", resource.to_uppercase().bold());
        if text.is_empty() {
            println!("  {}", "(нет ресурсов)".bright_black());
        } else {
            println!("{}", text);
        }
    }
}

#[derive(Tabled)]
struct PhaseRow {
    #[tabled(rename = "Фаза")]
    phase: String,
    #[tabled(rename = "Итог")]
    outcome: String,
    #[tabled(rename = "Время")]
    elapsed: String,
}

/// Таблица фаз запуска
pub fn summary_table(summary: &RunSummary) -> String {
    let rows: Vec<PhaseRow> = summary
        .phases
        .iter()
        .map(|r| PhaseRow {
            phase: r.phase.to_string(),
            outcome: r.outcome.to_string(),
            elapsed: format!("{:.1}s", r.elapsed.as_secs_f64()),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Выводит итог запуска: таблицу фаз, предупреждения и адреса сервисов
pub fn print_summary(summary: &RunSummary) {
    println!("\n{}", "=".repeat(60).bright_black());
    println!(
        "🏁 ИТОГ: окружение {}, namespace {}",
        summary.environment.to_string().bright_green(),
        summary.namespace.bright_blue()
    );
    println!("{}", summary_table(summary));

    let warnings = summary.warnings();
    if !warnings.is_empty() {
        println!("\n⚠️ ПРЕДУПРЕЖДЕНИЯ:");
        for (i, w) in warnings.iter().enumerate() {
            println!("  {}. {}", (i + 1).to_string().yellow(), w.yellow());
        }
    }

    if summary.ran(Phase::HealthCheck) && !summary.endpoints.is_empty() {
        println!("\n🔗 СЕРВИСЫ:");
        for ep in &summary.endpoints {
            println!(
                "  • {} ({}): {}",
                ep.workload,
                ep.service.bright_black(),
                ep.address.bright_blue()
            );
        }
    }
    println!("{}", "=".repeat(60).bright_black());
}
