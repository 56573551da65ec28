//! Chain access for the governance cache
//!
//! This module provides:
//! - `ChainReader`, the read-only interface used by the scanner and aggregator
//! - An alloy HTTP implementation
//! - A per-request timeout wrapper for any reader
//! - The registry mapping chain ids to readers
//! - A scripted in-memory chain for tests and dry runs

mod errors;
mod reader;
mod registry;
mod simulated;
mod timeout;

pub use errors::ChainError;
pub use reader::{call_view, ChainReader, RpcChainReader};
pub use registry::{ChainRegistry, NetworkConfig};
pub use simulated::SimulatedChain;
pub use timeout::TimeoutReader;
