//! Application lifecycle: startup, serving, shutdown.

pub mod server;
pub mod shutdown;
pub mod startup;

pub use server::run_server;
