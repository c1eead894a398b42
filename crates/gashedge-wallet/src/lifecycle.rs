use gashedge_ledger::FundLedger;
use gashedge_types::{HedgeError, Result};

use crate::epoch::Epoch;

/// Decide whether a fresh epoch may be opened.
///
/// A wallet with no epoch, or whose epoch has resolved with all locked
/// wei disbursed, is clear. An unresolved epoch blocks `init`, as does
/// any wei still sitting in a pool. A new epoch never merges locked
/// funds with an old one.
pub fn clear_for_init(epoch: &Option<Epoch>, ledger: &FundLedger) -> Result<()> {
    if let Some(epoch) = epoch {
        if !epoch.is_resolved() {
            return Err(HedgeError::InvalidState(format!(
                "epoch is {:?}, not resolved",
                epoch.status()
            )));
        }
    }
    let locked = ledger.locked_total();
    if !locked.is_zero() {
        return Err(HedgeError::FundsStillLocked(locked));
    }
    Ok(())
}
