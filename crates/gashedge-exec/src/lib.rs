//! The wallet's only way of touching the outside world: an executor
//! capability that performs value transfers and contract calls. The
//! wallet debits its ledger before invoking the executor, so an
//! executor can never move more than the wallet released.

mod executor;
mod fakes;

pub use executor::{ActionExecutor, CallOutcome, ExternalCall};
pub use fakes::{NullExecutor, RecordingExecutor};
