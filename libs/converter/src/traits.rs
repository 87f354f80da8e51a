//! Collaborator interfaces
//!
//! The engine neither moves tokens nor decides who may reconfigure it; both
//! concerns live behind these traits. Implementations are expected to fail
//! atomically: a transfer that errors must leave the outside world as it was,
//! because the converter aborts the whole operation on any collaborator error.

use thiserror::Error;
use weir_types::{Address, ReserveId, U256};

/// Errors surfaced by a token-transport collaborator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("insufficient allowance")]
    InsufficientAllowance,

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Moves reserve assets between the pool and external accounts
pub trait TokenTransport {
    /// Pull `amount` of `asset` from `from` into the pool
    fn pull(&mut self, asset: ReserveId, from: Address, amount: U256) -> Result<(), TransferError>;

    /// Push `amount` of `asset` from the pool to `to`
    fn push(&mut self, asset: ReserveId, to: Address, amount: U256) -> Result<(), TransferError>;
}

/// Privileged actions gated by the access-control collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Change the pool's conversion fee
    SetConversionFee,
    /// Change the network-fee rate or wallet
    ConfigureNetwork,
}

/// Answers whether a caller may perform a privileged action
pub trait AccessControl {
    fn is_authorized(&self, caller: Address, action: Action) -> bool;
}
