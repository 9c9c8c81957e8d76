pub mod logging;
pub mod network;
pub mod progress;
pub mod scratch;
pub mod shell;
pub mod signal;
