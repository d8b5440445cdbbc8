pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::rpc::{JsonRpcClient, RpcTransactionExecutor};
pub use app::{CallRequest, CommandRunner};
pub use config::{DashConfig, Network};
pub use crate::core::{move_executor::MoveExecutor, objects::ObjectBrowser, wallet::WalletDashboard};
pub use utils::error::{DashError, Result};
