// Adapters layer: concrete implementations for external systems (JSON-RPC node, terminal output).

pub mod output;
pub mod rpc;
