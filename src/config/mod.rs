pub mod args;
mod structs;

pub use args::{Cli, Command};
pub use structs::*;
