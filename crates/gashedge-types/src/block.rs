use serde::{Deserialize, Serialize};

use crate::error::{HedgeError, Result};

/// Chain height
pub type BlockNumber = u64;

/// Per-wallet transaction sequence number
pub type Nonce = u64;

/// The three block heights that bound a hedge epoch.
///
/// Registration is open through `register_block`, execution runs in
/// `[start_block, end_block]`, and the epoch can be torn down once
/// `start_block` is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockWindow {
    pub register_block: BlockNumber,
    pub start_block: BlockNumber,
    pub end_block: BlockNumber,
}

/// Where a block height falls relative to a [`BlockWindow`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    /// At or before `register_block`: a counterparty may still register
    RegistrationOpen,
    /// Past `register_block` but before `start_block`: nothing can happen yet
    ExecutionLocked,
    /// Within `[start_block, end_block]`: the hedged call may run
    ExecutionOpen,
    /// Past `end_block`
    Expired,
}

impl BlockWindow {
    /// Build a window, rejecting heights that are not strictly increasing.
    pub fn new(
        register_block: BlockNumber,
        start_block: BlockNumber,
        end_block: BlockNumber,
    ) -> Result<Self> {
        if register_block >= start_block {
            return Err(HedgeError::InvalidWindow(format!(
                "register block {} must precede start block {}",
                register_block, start_block
            )));
        }
        if start_block >= end_block {
            return Err(HedgeError::InvalidWindow(format!(
                "start block {} must precede end block {}",
                start_block, end_block
            )));
        }
        Ok(BlockWindow {
            register_block,
            start_block,
            end_block,
        })
    }

    /// Classify a block height against this window.
    pub fn phase(&self, now: BlockNumber) -> WindowPhase {
        if now <= self.register_block {
            WindowPhase::RegistrationOpen
        } else if now < self.start_block {
            WindowPhase::ExecutionLocked
        } else if now <= self.end_block {
            WindowPhase::ExecutionOpen
        } else {
            WindowPhase::Expired
        }
    }

    /// True once `start_block` has been reached.
    pub fn started(&self, now: BlockNumber) -> bool {
        now >= self.start_block
    }
}
