use thiserror::Error;

use crate::address::Address;
use crate::block::{BlockNumber, Nonce};
use crate::wei::Wei;

/// Errors produced by the hedge wallet and its supporting components
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HedgeError {
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Registration closed: current block {current}, register block {register_block}")]
    RegistrationClosed {
        current: BlockNumber,
        register_block: BlockNumber,
    },

    #[error("Wrong collateral: need exactly {required}, got {posted}")]
    WrongCollateral { required: Wei, posted: Wei },

    #[error("Already registered by {0}")]
    AlreadyRegistered(Address),

    #[error("Start block not reached: current block {current}, start block {start_block}")]
    NotYetActive {
        current: BlockNumber,
        start_block: BlockNumber,
    },

    #[error("UNAUTH: {0}")]
    Unauthorized(String),

    #[error("Nonce incorrect: expected {expected}, got {got}")]
    BadNonce { expected: Nonce, got: Nonce },

    #[error("cannot spend locked funds: {0}")]
    LockedFundsViolation(String),

    #[error("Insufficient payment: {0}")]
    InsufficientPayment(String),

    #[error("Insufficient free funds: need {needed}, have {available}")]
    InsufficientFreeFunds { needed: Wei, available: Wei },

    #[error("funds still locked: {0} held in pools")]
    FundsStillLocked(Wei),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Amount overflow: {0}")]
    AmountOverflow(String),
}

pub type Result<T> = std::result::Result<T, HedgeError>;
