//! Configuration: dependency wiring and logging setup.

pub mod dependencies;
pub mod logging;

pub use dependencies::Dependencies;
pub use logging::init_tracing;
