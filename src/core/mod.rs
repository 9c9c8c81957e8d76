//! Фазы развертывания и их последовательный запуск

pub mod ansible;
pub mod builder;
pub mod deployer;
pub mod health;
pub mod orchestrator;
pub mod prerequisites;
pub mod reporter;

#[cfg(test)]
pub mod testing;

pub use orchestrator::Orchestrator;
