use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Временная рабочая директория запуска. Удаляется при drop на любом пути выхода
#[derive(Debug)]
pub struct ScratchSpace {
    dir: TempDir,
}

/// Переменные, передаваемые в playbook через `-e @file`
#[derive(Debug, Clone, Serialize)]
pub struct ExtraVars<'a> {
    pub environment: &'a str,
    pub namespace: &'a str,
    pub project_name: &'a str,
}

impl ScratchSpace {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("stack-scratch-")
            .tempdir()
            .context("Не удалось создать временную директорию")?;
        debug!("Создана временная директория: {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Записывает extra-vars в JSON и возвращает путь к файлу
    pub fn write_extra_vars(&self, vars: &ExtraVars<'_>) -> Result<PathBuf> {
        let path = self.path().join("extra-vars.json");
        let json = serde_json::to_string_pretty(vars).context("Ошибка сериализации extra-vars")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Не удалось записать {}", path.display()))?;
        Ok(path)
    }
}

impl Drop for ScratchSpace {
    fn drop(&mut self) {
        debug!("Удаляем временную директорию: {}", self.path().display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_vars_file_and_cleanup() {
        let scratch = ScratchSpace::new().unwrap();
        let root = scratch.path().to_path_buf();

        let file = scratch
            .write_extra_vars(&ExtraVars {
                environment: "staging",
                namespace: "fullstack-app",
                project_name: "fullstack-app",
            })
            .unwrap();

        let raw = std::fs::read_to_string(&file).unwrap();
        let content: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(content["environment"], "staging");
        assert_eq!(content["namespace"], "fullstack-app");

        drop(scratch);
        assert!(!root.exists());
    }

    #[test]
    fn test_cleanup_on_early_return() {
        fn failing(root: &mut Option<PathBuf>) -> Result<()> {
            let scratch = ScratchSpace::new()?;
            *root = Some(scratch.path().to_path_buf());
            Err(anyhow::anyhow!("phase failed"))
        }

        let mut root = None;
        assert!(failing(&mut root).is_err());
        assert!(!root.unwrap().exists());
    }
}
