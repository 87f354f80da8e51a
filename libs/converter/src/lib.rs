//! # Weir Converter - Standard Pool Engine
//!
//! ## Purpose
//!
//! The stateful half of the Weir engine: one pool's reserve ledger,
//! pool-token supply, conversion-fee configuration, network-fee claims, and
//! time-weighted average rates, fronted by a controller that sequences every
//! mutation atomically over the external collaborators.
//!
//! ## Integration Points
//!
//! - **Input Sources**: conversion and liquidity requests from the host
//!   transaction layer, quotes from `weir-amm`
//! - **Output Destinations**: a `TokenTransport` collaborator for moving
//!   reserve assets, an `AccessControl` collaborator for gating
//!   configuration, read-only state for registries and rate consumers
//! - **Execution model**: single-threaded and non-reentrant per pool; every
//!   operation either commits in full or leaves no trace
//!
//! ## Architecture Role
//!
//! `ConverterController` owns the `Pool` aggregate exclusively and is the
//! only writer. Operations follow stage-then-commit: all arithmetic runs up
//! front with checked 256-bit math, external transfers execute next, and the
//! pool state lands in a single infallible commit at the end.

pub mod config;
pub mod controller;
pub mod error;
pub mod fees;
pub mod ledger;
pub mod oracle;
pub mod pool;
pub mod traits;

pub use config::{ConverterSettings, NetworkSettings, PoolSpec, ReserveSpec, SettingsError};
pub use controller::ConverterController;
pub use error::ConverterError;
pub use fees::FeeDistributor;
pub use ledger::{Reserve, ReserveLedger};
pub use oracle::{AverageRate, RateOracle};
pub use pool::Pool;
pub use traits::{AccessControl, Action, TokenTransport, TransferError};
