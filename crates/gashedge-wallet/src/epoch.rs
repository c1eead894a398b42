use serde::{Deserialize, Serialize};

use gashedge_types::{Address, BlockNumber, BlockWindow, Result, Wei};

/// How a hedge epoch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// The buyer's signed request was performed and the miner rewarded
    Executed,
    /// The miner burned the hedged computation and claimed the escrow
    Exhausted,
    /// The buyer reclaimed the payment after the start block
    Refunded,
}

/// Where an epoch stands in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpochStatus {
    /// Payment locked, waiting for a miner
    Initialized,
    /// A miner has posted collateral
    Registered,
    /// Settled, exactly once
    Resolved(Resolution),
}

/// The terms a buyer proposes when opening an epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HedgeTerms {
    /// Last block at which a miner may register
    pub register_block: BlockNumber,
    /// First block at which execution, exhaustion, or refund may happen
    pub start_block: BlockNumber,
    /// Last block of the execution window
    pub end_block: BlockNumber,
    /// Gas the buyer is hedging against
    pub gas_hedged: u64,
    /// Exact collateral a registering miner must post
    pub min_collateral: Wei,
    /// Registration incentive carved out of the locked payment
    pub eps: Wei,
}

impl HedgeTerms {
    /// Validate the block heights into a window.
    pub fn window(&self) -> Result<BlockWindow> {
        BlockWindow::new(self.register_block, self.start_block, self.end_block)
    }
}

/// One hedge agreement held by a wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epoch {
    pub buyer: Address,
    pub miner: Option<Address>,
    pub window: BlockWindow,
    pub gas_hedged: u64,
    pub min_collateral: Wei,
    pub eps: Wei,
    status: EpochStatus,
}

impl Epoch {
    /// Open a fresh epoch for a buyer under validated terms.
    pub fn open(buyer: Address, terms: &HedgeTerms) -> Result<Self> {
        Ok(Epoch {
            buyer,
            miner: None,
            window: terms.window()?,
            gas_hedged: terms.gas_hedged,
            min_collateral: terms.min_collateral,
            eps: terms.eps,
            status: EpochStatus::Initialized,
        })
    }

    pub fn status(&self) -> EpochStatus {
        self.status
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.status, EpochStatus::Resolved(_))
    }

    pub fn resolution(&self) -> Option<Resolution> {
        match self.status {
            EpochStatus::Resolved(resolution) => Some(resolution),
            _ => None,
        }
    }

    /// Record the winning registrant.
    pub(crate) fn mark_registered(&mut self, miner: Address) {
        self.miner = Some(miner);
        self.status = EpochStatus::Registered;
    }

    /// Settle the epoch. Callers enforce that this happens exactly once.
    pub(crate) fn resolve(&mut self, resolution: Resolution) {
        self.status = EpochStatus::Resolved(resolution);
    }
}
