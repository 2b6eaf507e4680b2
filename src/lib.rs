//! arbiscan -- a cross-venue spot-market arbitrage scanner.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── core/   # Scan pipeline: domain types, exchange adapter contract,
//! │           # markets cache, symbol universe, pair fetcher, scan
//! │           # scheduler, opportunity engine, snapshot store,
//! │           # distribution surface. Pure/testable, no process concerns.
//! ├── app/    # Process wiring: configuration, shared state, the
//! │           # tick-loop orchestrator, the operator status file.
//! └── cli/    # `clap`-derived command surface.
//! ```
//!
//! The core is a pure scan-and-rank pipeline; `app` and `cli` are the
//! ambient stack a runnable binary needs around it.

pub mod app;
pub mod cli;
pub mod core;
pub mod error;

#[cfg(feature = "testkit")]
pub mod testkit {
    //! Test doubles and fixtures for exercising the scan pipeline without a
    //! real venue HTTP client (spec.md §1: real adapters are out of scope).
    pub use crate::core::exchange::{AdapterFail, RawOrderBook, SimulatedAdapter, Ticker};
}
