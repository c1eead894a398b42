use serde::{Deserialize, Serialize};

/// Whether the authorized-call gateway stays open after the hedge epoch
/// has resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutePolicy {
    /// Gateway calls remain available indefinitely, nonce-gated
    Repeatable,
    /// After resolution, gateway calls fail until a fresh epoch is opened
    SingleShot,
}

/// Configuration for a hedge wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Gateway behavior once the epoch has resolved
    pub execute_policy: ExecutePolicy,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            execute_policy: ExecutePolicy::Repeatable,
        }
    }
}
