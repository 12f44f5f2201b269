//! # wbcmd-domain
//!
//! Pure domain model for switching test-bench relays.
//!
//! ## Responsibilities
//! - Define **Devices** (one relay output reachable through a broker topic)
//!   and the read-only **Device Table** loaded at startup
//! - Define **Commands** (`<target> <action> <device>` triples) and resolve
//!   them against the table
//! - Define the closed **Action Policy** (`up`/`down` everywhere, `restart`
//!   for `power` only) and the publish steps each action expands to
//! - Render the **help page** from the table
//! - Contain all invariant enforcement and the error taxonomy
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;

pub mod action;
pub mod command;
pub mod device;
pub mod help;
