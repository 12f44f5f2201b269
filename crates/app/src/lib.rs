//! # wbcmd-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `BrokerClient` — connect, publish with acknowledgment, disconnect
//!   - `Delay` — the blocking pauses of the timing contract
//! - Provide the `ActionExecutor` use-case that turns a validated device and
//!   action into publishes, including the restart sequence
//! - Provide in-process infrastructure that doesn't need network IO
//!   (`TokioDelay`)
//!
//! ## Dependency rule
//! Depends on `wbcmd-domain` only (plus `tokio::time` for sleeping).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod delay;
pub mod ports;
pub mod services;
