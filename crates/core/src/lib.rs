// dfextract Core - Domain Logic & Ports
// No process or filesystem adapters beyond std::fs for artifacts and staging

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{Result, TaskError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
