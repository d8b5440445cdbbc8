pub mod commands;

pub use commands::{CallRequest, CommandRunner};
