use anyhow::Result;
use std::path::Path;
use tracing::{debug, error, info};

use crate::config::parser::AnsibleConfig;
use crate::utils::shell::{CommandOutput, CommandRunner};

pub const ANSIBLE_PLAYBOOK: &str = "ansible-playbook";

/// Аргументы запуска playbook с inventory и файлом extra-vars
pub fn playbook_args(ansible: &AnsibleConfig, playbook: &str, extra_vars: &Path) -> Vec<String> {
    vec![
        "-i".to_string(),
        ansible.inventory.clone(),
        playbook.to_string(),
        "-e".to_string(),
        format!("@{}", extra_vars.display()),
    ]
}

/// Запускает playbook и пишет в лог PLAY RECAP либо строки с ошибками
pub async fn run_playbook(
    runner: &dyn CommandRunner,
    ansible: &AnsibleConfig,
    playbook: &str,
    extra_vars: &Path,
) -> Result<CommandOutput> {
    info!("▶️ ansible-playbook {}", playbook);
    let output = runner
        .run(ANSIBLE_PLAYBOOK, &playbook_args(ansible, playbook, extra_vars))
        .await?;

    for line in output.stdout.lines().rev().take(20).collect::<Vec<_>>().into_iter().rev() {
        debug!("📝 {}", line);
    }

    if output.success() {
        for line in recap_lines(&output.stdout) {
            info!("📋 {}", line);
        }
    } else {
        for line in output
            .stderr
            .lines()
            .chain(output.stdout.lines())
            .filter(|l| {
                let lower = l.to_lowercase();
                lower.contains("fatal") || lower.contains("error") || lower.contains("failed!")
            })
            .take(10)
        {
            error!("❌ {}", line.trim());
        }
    }

    Ok(output)
}

/// Строки блока PLAY RECAP из вывода ansible-playbook
pub fn recap_lines(stdout: &str) -> Vec<&str> {
    stdout
        .lines()
        .skip_while(|l| !l.starts_with("PLAY RECAP"))
        .skip(1)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}
