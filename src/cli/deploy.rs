use clap::Parser;

#[derive(Parser, Debug, Clone)]
pub struct DeployCommand {
    /// Целевое окружение: development, staging или production
    #[arg(short, long, default_value = "development")]
    pub environment: String,

    /// Пропустить сборку docker-образов
    #[arg(short = 's', long)]
    pub skip_build: bool,

    /// Пропустить развертывание в Kubernetes
    #[arg(short = 'k', long)]
    pub skip_deploy: bool,

    /// Продолжать при ошибке развертывания
    #[arg(short, long)]
    pub force: bool,

    /// Переопределить namespace из конфигурации
    #[arg(long)]
    pub namespace: Option<String>,
}
