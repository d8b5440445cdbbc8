pub mod balance;
pub mod classify;
pub mod encode;
pub mod move_executor;
pub mod objects;
pub mod wallet;

pub use crate::domain::model::{CallArgument, MoveCall, Parameter, TypeParameter};
pub use crate::domain::ports::{SuiReader, TransactionExecutor};
pub use crate::utils::error::Result;
