use serde::{Deserialize, Serialize};

use gashedge_types::{Address, TransactionRequest, Wei};

/// A call leaving the wallet: a value transfer, optionally carrying a
/// payload for the target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCall {
    pub to: Address,
    pub value: Wei,
    pub data: Vec<u8>,
}

impl ExternalCall {
    /// A bare value transfer
    pub fn transfer(to: Address, value: Wei) -> Self {
        ExternalCall {
            to,
            value,
            data: Vec::new(),
        }
    }
}

impl From<&TransactionRequest> for ExternalCall {
    fn from(request: &TransactionRequest) -> Self {
        ExternalCall {
            to: request.to,
            value: request.value,
            data: request.call_data.clone(),
        }
    }
}

/// What the environment reports back after performing a call.
///
/// Failure is data, not an error: the wallet decides what a failed
/// inner call means for its own state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub success: bool,
    pub return_data: Vec<u8>,
}

impl CallOutcome {
    pub fn success(return_data: Vec<u8>) -> Self {
        CallOutcome {
            success: true,
            return_data,
        }
    }

    pub fn failure() -> Self {
        CallOutcome {
            success: false,
            return_data: Vec::new(),
        }
    }
}

/// Capability to perform calls on the wallet's behalf
pub trait ActionExecutor {
    fn perform(&mut self, call: &ExternalCall) -> CallOutcome;
}
