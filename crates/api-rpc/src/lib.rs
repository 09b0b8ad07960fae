//! JSON-RPC API Layer
//!
//! JSON-RPC 2.0 server exposing the walk-in queue operations. Method names
//! carry a version suffix (`queue.join.v1`) so the contract can evolve.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use handler::RpcHandler;
pub use server::{RpcServer, RpcServerConfig, RunningServer, ServerError};
