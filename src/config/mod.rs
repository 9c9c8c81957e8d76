pub mod env_loader;
pub mod parser;
pub mod validator;

pub use parser::{Config, WorkloadConfig};
pub use validator::ConfigValidator;
