//! Тестовые двойники для внешних утилит и HTTP-проб

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

use crate::utils::network::HealthProbe;
use crate::utils::shell::{CommandOutput, CommandRunner};

/// Записывает все вызовы и отвечает по первому (с конца) совпавшему правилу
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    calls: Mutex<Vec<String>>,
    rules: Vec<(String, CommandOutput)>,
    missing: Vec<String>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Окружение, где все внешние вызовы успешны
    pub fn healthy() -> Self {
        Self::new()
            .respond("collection list", CommandOutput::ok("kubernetes.core 2.4.0\n"))
            .respond("get service backend-service", CommandOutput::ok("10.96.0.10:8080"))
            .respond("get service frontend-service", CommandOutput::ok("10.96.0.11:80"))
            .respond(
                "get services",
                CommandOutput::ok(
                    "NAME              TYPE        CLUSTER-IP\n\
                     backend-service   ClusterIP   10.96.0.10\n",
                ),
            )
    }

    pub fn respond(mut self, pattern: &str, output: CommandOutput) -> Self {
        self.rules.push((pattern.to_string(), output));
        self
    }

    pub fn missing_tool(mut self, tool: &str) -> Self {
        self.missing.push(tool.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, pattern: &str) -> bool {
        self.calls().iter().any(|c| c.contains(pattern))
    }

    /// Индекс первого вызова, содержащего подстроку
    pub fn position(&self, pattern: &str) -> Option<usize> {
        self.calls().iter().position(|c| c.contains(pattern))
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let line = std::iter::once(program.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(line.clone());

        Ok(self
            .rules
            .iter()
            .rev()
            .find(|(pattern, _)| line.contains(pattern.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_else(|| CommandOutput::ok("")))
    }

    fn is_available(&self, program: &str) -> bool {
        !self.missing.iter().any(|m| m == program)
    }
}

/// Проба с фиксированным ответом
#[derive(Debug, Default)]
pub struct StaticProbe {
    fail: bool,
    urls: Mutex<Vec<String>>,
}

impl StaticProbe {
    pub fn up() -> Self {
        Self::default()
    }

    pub fn down() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HealthProbe for StaticProbe {
    async fn probe(&self, url: &str) -> Result<u16> {
        self.urls.lock().unwrap().push(url.to_string());
        if self.fail {
            Err(anyhow::anyhow!("connection refused: {}", url))
        } else {
            Ok(200)
        }
    }
}
