use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command as AsyncCommand;
use tokio::time::timeout;
use tracing::debug;

/// Результат выполнения внешней команды
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[cfg(test)]
    pub fn ok(stdout: &str) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    #[cfg(test)]
    pub fn failed(code: i32, stderr: &str) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Первая непустая строка stderr (или stdout), для сообщений об ошибке
    pub fn first_error_line(&self) -> &str {
        self.stderr
            .lines()
            .chain(self.stdout.lines())
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("нет вывода ошибок")
    }
}

/// Запуск внешних утилит (kubectl, docker, ansible-playbook, ...)
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Запускает программу и дожидается завершения, захватывая вывод
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;

    /// Есть ли утилита в PATH
    fn is_available(&self, program: &str) -> bool;
}

/// Запуск команд через tokio::process в рабочей директории
#[derive(Debug, Clone)]
pub struct SystemRunner {
    working_dir: PathBuf,
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(working_dir: PathBuf, timeout: Duration) -> Self {
        Self {
            working_dir,
            timeout,
        }
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let mut cmd = AsyncCommand::new(program);
        cmd.current_dir(&self.working_dir).args(args).kill_on_drop(true);

        debug!("Выполняем команду: {} {}", program, args.join(" "));

        let output = timeout(self.timeout, cmd.output())
            .await
            .with_context(|| {
                format!("Таймаут выполнения {} ({} с)", program, self.timeout.as_secs())
            })?
            .with_context(|| format!("Ошибка запуска {}", program))?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        debug!("{} завершился с кодом {:?}", program, result.code);
        Ok(result)
    }

    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
