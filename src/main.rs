use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::error;

mod cli;
mod commands;
mod config;
mod core;
mod error;
mod models;
mod utils;

use config::env_loader::EnvLoader;

#[derive(Parser, Debug)]
#[command(
    name = "stack-deploy",
    about = "Развертывание трехзвенного приложения (Spring Boot + React + MySQL) в Kubernetes",
    long_about = "Проверяет окружение, собирает образы и разворачивает приложение через Ansible, дожидается готовности Deployment-ов, проверяет health-эндпоинты и печатает статус namespace.",
    version,
    author = "Ride Team"
)]
struct Args {
    #[command(flatten)]
    deploy: cli::deploy::DeployCommand,

    /// Файл конфигурации
    #[arg(short, long, env = "STACK_DEPLOY_CONFIG", default_value = "config.toml")]
    config: String,

    /// Уровень логирования
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Лог-файл (дописывается), путь относительно текущей директории
    #[arg(long, env = "STACK_DEPLOY_LOG_FILE", default_value = "deployment.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env читается до разбора аргументов, чтобы STACK_DEPLOY_* из него учитывались clap
    let dotenv_outcome = EnvLoader::load();

    let args = Args::parse();

    // Инициализация логирования: stdout + лог-файл
    utils::logging::init(&args.log_level, &args.log_file)?;
    EnvLoader::log_outcome(&dotenv_outcome);

    // Прерывание сигналом отбрасывает пайплайн: временные файлы удаляются,
    // запущенные дочерние процессы завершаются
    let code = tokio::select! {
        result = commands::deploy::handle_deploy_command(args.deploy, &args.config) => {
            match result {
                Ok(_) => return Ok(()),
                Err(e) => commands::deploy::report_failure(&e),
            }
        }
        code = utils::signal::shutdown_signal() => {
            error!("🛑 Развертывание прервано сигналом, код завершения {}", code);
            code
        }
    };

    std::process::exit(code)
}
