use gashedge_types::{Address, BlockNumber, Wei};

/// Call-site context the chain supplies on every operation: who is
/// calling, how much wei the call carries, and the current block height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallEnv {
    pub caller: Address,
    pub value: Wei,
    pub block: BlockNumber,
}

impl CallEnv {
    /// A call carrying no value
    pub fn new(caller: Address, block: BlockNumber) -> Self {
        CallEnv {
            caller,
            value: Wei::ZERO,
            block,
        }
    }

    /// A call paying wei into the wallet
    pub fn with_value(caller: Address, block: BlockNumber, value: Wei) -> Self {
        CallEnv {
            caller,
            value,
            block,
        }
    }
}
