use std::collections::BTreeSet;

use gashedge_types::{Address, Wei};

use crate::executor::{ActionExecutor, CallOutcome, ExternalCall};

/// Executor that accepts every call and returns nothing.
/// Useful when a test only cares about ledger movements.
#[derive(Debug, Default, Clone)]
pub struct NullExecutor;

impl ActionExecutor for NullExecutor {
    fn perform(&mut self, _call: &ExternalCall) -> CallOutcome {
        CallOutcome::success(Vec::new())
    }
}

/// Executor that records every call and fails the ones a test scripts
/// to fail
#[derive(Debug, Default, Clone)]
pub struct RecordingExecutor {
    pub calls: Vec<ExternalCall>,
    failing_targets: BTreeSet<Address>,
    fail_all: bool,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `target` report failure
    pub fn fail_calls_to(&mut self, target: Address) {
        self.failing_targets.insert(target);
    }

    /// Make every call report failure
    pub fn fail_everything(&mut self) {
        self.fail_all = true;
    }

    /// Calls recorded against one target, in order
    pub fn calls_to(&self, target: Address) -> Vec<&ExternalCall> {
        self.calls.iter().filter(|c| c.to == target).collect()
    }

    /// Total value sent to one target across all successful calls
    pub fn value_sent_to(&self, target: Address) -> Wei {
        self.calls
            .iter()
            .filter(|c| c.to == target && !self.would_fail(c.to))
            .map(|c| c.value)
            .sum()
    }

    fn would_fail(&self, target: Address) -> bool {
        self.fail_all || self.failing_targets.contains(&target)
    }
}

impl ActionExecutor for RecordingExecutor {
    fn perform(&mut self, call: &ExternalCall) -> CallOutcome {
        self.calls.push(call.clone());
        if self.would_fail(call.to) {
            CallOutcome::failure()
        } else {
            CallOutcome::success(Vec::new())
        }
    }
}
