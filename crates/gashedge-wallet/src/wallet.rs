use gashedge_codec::{keccak256, request_digest};
use gashedge_crypto::{recover_signer, Signature};
use gashedge_exec::{ActionExecutor, CallOutcome, ExternalCall};
use gashedge_ledger::{FundLedger, Pool};
use gashedge_types::{
    Address, HedgeError, Nonce, Result, TransactionRequest, Wei, WindowPhase,
};

use crate::config::{ExecutePolicy, WalletConfig};
use crate::env::CallEnv;
use crate::epoch::{Epoch, EpochStatus, HedgeTerms, Resolution};
use crate::lifecycle::clear_for_init;

/// A wallet holding one hedge epoch at a time.
///
/// The owner escrows payment, a miner posts collateral, and the epoch
/// resolves exactly once: executed, exhausted, or refunded. Outside an
/// epoch the wallet still performs owner-signed calls through the
/// gateway. Every mutating operation is atomic: preconditions are
/// checked before any ledger mutation, and ledger state commits in full
/// before the executor performs anything external.
pub struct HedgeWallet {
    owner: Address,
    ledger: FundLedger,
    epoch: Option<Epoch>,
    nonce: Nonce,
    in_flight: bool,
    config: WalletConfig,
}

impl HedgeWallet {
    pub fn new(owner: Address) -> Self {
        Self::with_config(owner, WalletConfig::default())
    }

    pub fn with_config(owner: Address, config: WalletConfig) -> Self {
        HedgeWallet {
            owner,
            ledger: FundLedger::new(),
            epoch: None,
            nonce: 0,
            in_flight: false,
            config,
        }
    }

    /// Open a hedge epoch, locking the attached value as payment.
    ///
    /// Owner-only. Requires a clear slate: no epoch, or a resolved one
    /// with nothing left in the pools. The attached value must at least
    /// cover the registration incentive. Resets the nonce.
    pub fn init(&mut self, env: &CallEnv, terms: &HedgeTerms) -> Result<()> {
        self.ensure_not_reentrant()?;
        if env.caller != self.owner {
            return Err(HedgeError::Unauthorized(format!(
                "only the owner may open an epoch, not {}",
                env.caller
            )));
        }
        clear_for_init(&self.epoch, &self.ledger)?;

        let epoch = Epoch::open(env.caller, terms)?;
        if env.value < terms.eps {
            return Err(HedgeError::InsufficientPayment(format!(
                "attached value {} does not cover the {} wei incentive",
                env.value, terms.eps
            )));
        }

        self.ledger.deposit(env.value)?;
        self.ledger.lock(env.value, Pool::Payment)?;
        self.nonce = 0;
        tracing::info!(
            "Hedge epoch opened by {}: {} wei locked ({} wei incentive), execution window [{}, {}]",
            epoch.buyer,
            env.value,
            terms.eps,
            epoch.window.start_block,
            epoch.window.end_block
        );
        self.epoch = Some(epoch);
        Ok(())
    }

    /// Register as the epoch's miner, posting the exact collateral.
    ///
    /// First registrant wins; registration closes after the register
    /// block.
    pub fn register(&mut self, env: &CallEnv) -> Result<()> {
        self.ensure_not_reentrant()?;
        let epoch = match self.epoch.as_mut() {
            Some(epoch) => epoch,
            None => {
                return Err(HedgeError::InvalidState(
                    "no epoch is active".to_string(),
                ))
            }
        };
        if epoch.is_resolved() {
            return Err(HedgeError::InvalidState(
                "epoch already resolved".to_string(),
            ));
        }
        if let Some(miner) = epoch.miner {
            return Err(HedgeError::AlreadyRegistered(miner));
        }
        if env.block > epoch.window.register_block {
            return Err(HedgeError::RegistrationClosed {
                current: env.block,
                register_block: epoch.window.register_block,
            });
        }
        if env.value != epoch.min_collateral {
            return Err(HedgeError::WrongCollateral {
                required: epoch.min_collateral,
                posted: env.value,
            });
        }

        self.ledger.deposit(env.value)?;
        self.ledger.lock(env.value, Pool::Collateral)?;
        epoch.mark_registered(env.caller);
        tracing::info!(
            "Miner {} registered with {} wei collateral",
            env.caller,
            env.value
        );
        Ok(())
    }

    /// Perform the buyer's signed request and settle the hedge.
    ///
    /// Open to any caller within the execution window: the caller
    /// receives the collateral plus the incentive, the payment pool
    /// unlocks to fund the request, and the nonce advances. The epoch
    /// resolves Executed whether or not the inner call succeeds; inner
    /// failure is reported in the returned outcome, not as an error.
    pub fn execute(
        &mut self,
        env: &CallEnv,
        request: &TransactionRequest,
        signature: &Signature,
        executor: &mut dyn ActionExecutor,
    ) -> Result<CallOutcome> {
        self.ensure_not_reentrant()?;
        let nonce = self.nonce;
        let epoch = match self.epoch.as_mut() {
            Some(epoch) => epoch,
            None => {
                return Err(HedgeError::InvalidState(
                    "no epoch is active".to_string(),
                ))
            }
        };
        match epoch.window.phase(env.block) {
            WindowPhase::RegistrationOpen | WindowPhase::ExecutionLocked => {
                return Err(HedgeError::NotYetActive {
                    current: env.block,
                    start_block: epoch.window.start_block,
                });
            }
            WindowPhase::Expired => {
                return Err(HedgeError::InvalidState(
                    "execution window closed".to_string(),
                ));
            }
            WindowPhase::ExecutionOpen => {}
        }

        let signer = recover_signer(&request_digest(request), signature)?;
        if signer != epoch.buyer {
            return Err(HedgeError::Unauthorized(format!(
                "signer {} is not the buyer",
                signer
            )));
        }
        // Nonce before resolution state: a replayed request reads as
        // stale, not as a state error.
        if request.nonce != nonce {
            return Err(HedgeError::BadNonce {
                expected: nonce,
                got: request.nonce,
            });
        }
        if epoch.is_resolved() {
            return Err(HedgeError::InvalidState(
                "epoch already resolved".to_string(),
            ));
        }

        // Settle. All ledger state commits before anything external runs.
        epoch.resolve(Resolution::Executed);
        let eps = epoch.eps;
        let collateral = self.ledger.unlock_all(Pool::Collateral)?;
        self.ledger.unlock_all(Pool::Payment)?;
        self.nonce += 1;
        let reward = collateral.checked_add(eps)?;

        tracing::info!(
            "Hedge executed at block {}: {} wei reward to {}",
            env.block,
            reward,
            env.caller
        );
        self.send_value(executor, env.caller, reward)?;
        self.fund_and_perform(executor, request)
    }

    /// Perform an owner-signed call with no hedge settlement.
    ///
    /// The plain gateway: available in any state, any block, with or
    /// without an epoch. Nonce-gated and restricted to free balance, so
    /// escrowed funds stay untouchable. Each call advances the nonce;
    /// whether the gateway stays open after the epoch resolves is the
    /// wallet's execute policy.
    pub fn verify_and_execute(
        &mut self,
        env: &CallEnv,
        request: &TransactionRequest,
        signature: &Signature,
        executor: &mut dyn ActionExecutor,
    ) -> Result<CallOutcome> {
        self.ensure_not_reentrant()?;
        if let Some(epoch) = &self.epoch {
            if epoch.is_resolved() && self.config.execute_policy == ExecutePolicy::SingleShot {
                return Err(HedgeError::InvalidState(
                    "gateway is single-shot and the epoch has resolved".to_string(),
                ));
            }
        }

        let signer = recover_signer(&request_digest(request), signature)?;
        if signer != self.owner {
            return Err(HedgeError::Unauthorized(format!(
                "signer {} is not the wallet owner",
                signer
            )));
        }
        if request.nonce != self.nonce {
            return Err(HedgeError::BadNonce {
                expected: self.nonce,
                got: request.nonce,
            });
        }

        // Free-balance floor, counting wei arriving with this call
        let available = self.ledger.free().checked_add(env.value)?;
        if request.value > available {
            return Err(HedgeError::LockedFundsViolation(format!(
                "request value {} exceeds free balance {}",
                request.value, available
            )));
        }

        self.ledger.deposit(env.value)?;
        self.nonce += 1;
        tracing::debug!(
            "Gateway call by {} at block {}: {} wei to {}",
            env.caller,
            env.block,
            request.value,
            request.to
        );
        self.fund_and_perform(executor, request)
    }

    /// Burn the hedged computation and claim the whole escrow.
    ///
    /// Miner-only, once the start block is reached. Pays payment,
    /// incentive, and collateral to the miner.
    pub fn exhaust(&mut self, env: &CallEnv, executor: &mut dyn ActionExecutor) -> Result<()> {
        self.ensure_not_reentrant()?;
        let epoch = match self.epoch.as_mut() {
            Some(epoch) => epoch,
            None => {
                return Err(HedgeError::InvalidState(
                    "no epoch is active".to_string(),
                ))
            }
        };
        if epoch.is_resolved() {
            return Err(HedgeError::InvalidState(
                "epoch already resolved".to_string(),
            ));
        }
        let miner = match epoch.miner {
            Some(miner) => miner,
            None => {
                return Err(HedgeError::InvalidState(
                    "no miner registered".to_string(),
                ))
            }
        };
        if !epoch.window.started(env.block) {
            return Err(HedgeError::NotYetActive {
                current: env.block,
                start_block: epoch.window.start_block,
            });
        }
        if env.caller != miner {
            return Err(HedgeError::Unauthorized(format!(
                "only the registered miner may exhaust, not {}",
                env.caller
            )));
        }

        let burn = simulate_gas_burn(epoch.gas_hedged);
        tracing::debug!(
            "gas burn of {} complete: {}",
            epoch.gas_hedged,
            hex::encode(burn)
        );

        epoch.resolve(Resolution::Exhausted);
        let collateral = self.ledger.unlock_all(Pool::Collateral)?;
        let payment = self.ledger.unlock_all(Pool::Payment)?;
        let claim = collateral.checked_add(payment)?;
        tracing::info!(
            "Hedge exhausted by {} at block {}: {} wei claimed",
            miner,
            env.block,
            claim
        );
        self.send_value(executor, miner, claim)
    }

    /// Reclaim the escrowed payment once the start block is reached.
    ///
    /// Buyer-only, before any execution. A registered miner's collateral
    /// is returned to the miner.
    pub fn refund(&mut self, env: &CallEnv, executor: &mut dyn ActionExecutor) -> Result<()> {
        self.ensure_not_reentrant()?;
        let epoch = match self.epoch.as_mut() {
            Some(epoch) => epoch,
            None => {
                return Err(HedgeError::InvalidState(
                    "no epoch is active".to_string(),
                ))
            }
        };
        if epoch.is_resolved() {
            return Err(HedgeError::InvalidState(
                "epoch already resolved".to_string(),
            ));
        }
        if !epoch.window.started(env.block) {
            return Err(HedgeError::NotYetActive {
                current: env.block,
                start_block: epoch.window.start_block,
            });
        }
        if env.caller != epoch.buyer {
            return Err(HedgeError::Unauthorized(format!(
                "only the buyer may refund, not {}",
                env.caller
            )));
        }

        epoch.resolve(Resolution::Refunded);
        let buyer = epoch.buyer;
        let miner = epoch.miner;
        let payment = self.ledger.unlock_all(Pool::Payment)?;
        let collateral = self.ledger.unlock_all(Pool::Collateral)?;
        tracing::info!(
            "Hedge refunded at block {}: {} wei to buyer {}",
            env.block,
            payment,
            buyer
        );
        self.send_value(executor, buyer, payment)?;
        if let Some(miner) = miner {
            self.send_value(executor, miner, collateral)?;
        }
        Ok(())
    }

    /// Plain receive of wei into the free balance.
    pub fn deposit(&mut self, env: &CallEnv) -> Result<()> {
        self.ensure_not_reentrant()?;
        self.ledger.deposit(env.value)
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn nonce(&self) -> Nonce {
        self.nonce
    }

    pub fn epoch(&self) -> Option<&Epoch> {
        self.epoch.as_ref()
    }

    pub fn status(&self) -> Option<EpochStatus> {
        self.epoch.as_ref().map(|epoch| epoch.status())
    }

    pub fn ledger(&self) -> &FundLedger {
        &self.ledger
    }

    pub fn balance(&self) -> Wei {
        self.ledger.balance()
    }

    pub fn free_balance(&self) -> Wei {
        self.ledger.free()
    }

    /// The payment the buyer is hedging: the payment pool minus the
    /// registration incentive it carries.
    pub fn hedged_payment(&self) -> Wei {
        match &self.epoch {
            Some(epoch) if !epoch.is_resolved() => {
                self.ledger.locked(Pool::Payment).saturating_sub(epoch.eps)
            }
            _ => Wei::ZERO,
        }
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    fn ensure_not_reentrant(&self) -> Result<()> {
        if self.in_flight {
            return Err(HedgeError::InvalidState(
                "call already in flight".to_string(),
            ));
        }
        Ok(())
    }

    /// Debit the ledger, then hand the transfer to the executor. A
    /// failed transfer moves no wei: the debit is credited back.
    fn send_value(
        &mut self,
        executor: &mut dyn ActionExecutor,
        to: Address,
        amount: Wei,
    ) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        self.ledger.withdraw(amount)?;
        let outcome = self.perform_guarded(executor, &ExternalCall::transfer(to, amount));
        if !outcome.success {
            tracing::warn!(
                "payout of {} wei to {} failed; funds returned to free balance",
                amount,
                to
            );
            self.ledger.deposit(amount)?;
        }
        Ok(())
    }

    /// Fund the request from free balance and perform it. An unfundable
    /// or failed call is an unsuccessful outcome, never a partial spend.
    fn fund_and_perform(
        &mut self,
        executor: &mut dyn ActionExecutor,
        request: &TransactionRequest,
    ) -> Result<CallOutcome> {
        if request.value > self.ledger.free() {
            tracing::debug!(
                "request value {} exceeds free balance {}; call not performed",
                request.value,
                self.ledger.free()
            );
            return Ok(CallOutcome::failure());
        }
        self.ledger.withdraw(request.value)?;
        let outcome = self.perform_guarded(executor, &ExternalCall::from(request));
        if !outcome.success {
            self.ledger.deposit(request.value)?;
        }
        Ok(outcome)
    }

    fn perform_guarded(
        &mut self,
        executor: &mut dyn ActionExecutor,
        call: &ExternalCall,
    ) -> CallOutcome {
        self.in_flight = true;
        let outcome = executor.perform(call);
        self.in_flight = false;
        outcome
    }
}

/// Worst-case work a miner reserves for: iterated hashing scaled to the
/// hedged gas amount, one 32-byte keccak round per 50 gas.
fn simulate_gas_burn(gas_hedged: u64) -> [u8; 32] {
    const GAS_PER_ROUND: u64 = 50;
    let rounds = gas_hedged / GAS_PER_ROUND;
    let mut acc = [0u8; 32];
    for _ in 0..rounds {
        acc = keccak256(&acc);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use gashedge_exec::RecordingExecutor;

    fn addr(tag: u8) -> Address {
        Address::from_bytes([tag; 20])
    }

    fn terms() -> HedgeTerms {
        HedgeTerms {
            register_block: 110,
            start_block: 120,
            end_block: 130,
            gas_hedged: 1_000_000,
            min_collateral: Wei::from_eth(1),
            eps: Wei::from_milli_eth(10),
        }
    }

    #[test]
    fn test_init_locks_payment() {
        let owner = addr(1);
        let mut wallet = HedgeWallet::new(owner);
        wallet
            .init(
                &CallEnv::with_value(owner, 100, Wei::from_milli_eth(1010)),
                &terms(),
            )
            .unwrap();

        assert_eq!(wallet.status(), Some(EpochStatus::Initialized));
        assert_eq!(wallet.nonce(), 0);
        assert_eq!(wallet.ledger().locked(Pool::Payment), Wei::from_milli_eth(1010));
        assert_eq!(wallet.free_balance(), Wei::ZERO);
        assert_eq!(wallet.hedged_payment(), Wei::from_eth(1));
    }

    #[test]
    fn test_init_rejects_non_owner() {
        let mut wallet = HedgeWallet::new(addr(1));
        let err = wallet
            .init(
                &CallEnv::with_value(addr(2), 100, Wei::from_milli_eth(1010)),
                &terms(),
            )
            .unwrap_err();
        assert!(matches!(err, HedgeError::Unauthorized(_)));
    }

    #[test]
    fn test_init_rejects_value_below_incentive() {
        let owner = addr(1);
        let mut wallet = HedgeWallet::new(owner);
        let err = wallet
            .init(
                &CallEnv::with_value(owner, 100, Wei::from_milli_eth(5)),
                &terms(),
            )
            .unwrap_err();
        assert!(matches!(err, HedgeError::InsufficientPayment(_)));
    }

    #[test]
    fn test_init_rejects_bad_window() {
        let owner = addr(1);
        let mut wallet = HedgeWallet::new(owner);
        let bad = HedgeTerms {
            start_block: 110,
            ..terms()
        };
        let err = wallet
            .init(
                &CallEnv::with_value(owner, 100, Wei::from_milli_eth(1010)),
                &bad,
            )
            .unwrap_err();
        assert!(matches!(err, HedgeError::InvalidWindow(_)));
    }

    #[test]
    fn test_init_refuses_while_epoch_open() {
        let owner = addr(1);
        let mut wallet = HedgeWallet::new(owner);
        let env = CallEnv::with_value(owner, 100, Wei::from_milli_eth(1010));
        wallet.init(&env, &terms()).unwrap();
        assert!(matches!(
            wallet.init(&env, &terms()),
            Err(HedgeError::InvalidState(_))
        ));
    }

    #[test]
    fn test_register_requires_exact_collateral() {
        let owner = addr(1);
        let miner = addr(2);
        let mut wallet = HedgeWallet::new(owner);
        wallet
            .init(
                &CallEnv::with_value(owner, 100, Wei::from_milli_eth(1010)),
                &terms(),
            )
            .unwrap();

        for posted in [Wei::from_milli_eth(999), Wei::from_milli_eth(1001)] {
            let err = wallet
                .register(&CallEnv::with_value(miner, 105, posted))
                .unwrap_err();
            assert_eq!(
                err,
                HedgeError::WrongCollateral {
                    required: Wei::from_eth(1),
                    posted,
                }
            );
        }

        wallet
            .register(&CallEnv::with_value(miner, 105, Wei::from_eth(1)))
            .unwrap();
        assert_eq!(wallet.status(), Some(EpochStatus::Registered));
        assert_eq!(wallet.ledger().locked(Pool::Collateral), Wei::from_eth(1));
    }

    #[test]
    fn test_register_closes_after_register_block() {
        let owner = addr(1);
        let mut wallet = HedgeWallet::new(owner);
        wallet
            .init(
                &CallEnv::with_value(owner, 100, Wei::from_milli_eth(1010)),
                &terms(),
            )
            .unwrap();

        let err = wallet
            .register(&CallEnv::with_value(addr(2), 111, Wei::from_eth(1)))
            .unwrap_err();
        assert_eq!(
            err,
            HedgeError::RegistrationClosed {
                current: 111,
                register_block: 110,
            }
        );
    }

    #[test]
    fn test_second_registrant_rejected() {
        let owner = addr(1);
        let mut wallet = HedgeWallet::new(owner);
        wallet
            .init(
                &CallEnv::with_value(owner, 100, Wei::from_milli_eth(1010)),
                &terms(),
            )
            .unwrap();
        wallet
            .register(&CallEnv::with_value(addr(2), 105, Wei::from_eth(1)))
            .unwrap();

        let err = wallet
            .register(&CallEnv::with_value(addr(3), 106, Wei::from_eth(1)))
            .unwrap_err();
        assert_eq!(err, HedgeError::AlreadyRegistered(addr(2)));

        // Only the first collateral is locked
        assert_eq!(wallet.ledger().locked(Pool::Collateral), Wei::from_eth(1));
        assert_eq!(wallet.epoch().unwrap().miner, Some(addr(2)));
    }

    #[test]
    fn test_exhaust_is_miner_only() {
        let owner = addr(1);
        let miner = addr(2);
        let mut wallet = HedgeWallet::new(owner);
        let mut exec = RecordingExecutor::new();
        wallet
            .init(
                &CallEnv::with_value(owner, 100, Wei::from_milli_eth(1010)),
                &terms(),
            )
            .unwrap();
        wallet
            .register(&CallEnv::with_value(miner, 105, Wei::from_eth(1)))
            .unwrap();

        let err = wallet
            .exhaust(&CallEnv::new(owner, 125), &mut exec)
            .unwrap_err();
        assert!(matches!(err, HedgeError::Unauthorized(_)));

        let err = wallet
            .exhaust(&CallEnv::new(miner, 115), &mut exec)
            .unwrap_err();
        assert_eq!(
            err,
            HedgeError::NotYetActive {
                current: 115,
                start_block: 120,
            }
        );

        wallet.exhaust(&CallEnv::new(miner, 125), &mut exec).unwrap();
        assert_eq!(
            wallet.status(),
            Some(EpochStatus::Resolved(Resolution::Exhausted))
        );
        // Miner claims payment + incentive + collateral
        assert_eq!(exec.value_sent_to(miner), Wei::from_milli_eth(2010));
        assert_eq!(wallet.balance(), Wei::ZERO);
    }

    #[test]
    fn test_exhaust_requires_registration() {
        let owner = addr(1);
        let mut wallet = HedgeWallet::new(owner);
        let mut exec = RecordingExecutor::new();
        wallet
            .init(
                &CallEnv::with_value(owner, 100, Wei::from_milli_eth(1010)),
                &terms(),
            )
            .unwrap();

        let err = wallet
            .exhaust(&CallEnv::new(addr(2), 125), &mut exec)
            .unwrap_err();
        assert!(matches!(err, HedgeError::InvalidState(_)));
    }

    #[test]
    fn test_refund_is_buyer_only_and_returns_collateral() {
        let owner = addr(1);
        let miner = addr(2);
        let mut wallet = HedgeWallet::new(owner);
        let mut exec = RecordingExecutor::new();
        wallet
            .init(
                &CallEnv::with_value(owner, 100, Wei::from_milli_eth(1010)),
                &terms(),
            )
            .unwrap();
        wallet
            .register(&CallEnv::with_value(miner, 105, Wei::from_eth(1)))
            .unwrap();

        let err = wallet
            .refund(&CallEnv::new(miner, 125), &mut exec)
            .unwrap_err();
        assert!(matches!(err, HedgeError::Unauthorized(_)));

        wallet.refund(&CallEnv::new(owner, 125), &mut exec).unwrap();
        assert_eq!(
            wallet.status(),
            Some(EpochStatus::Resolved(Resolution::Refunded))
        );
        assert_eq!(exec.value_sent_to(owner), Wei::from_milli_eth(1010));
        assert_eq!(exec.value_sent_to(miner), Wei::from_eth(1));
        assert_eq!(wallet.balance(), Wei::ZERO);
    }

    #[test]
    fn test_deposit_goes_to_free_balance() {
        let mut wallet = HedgeWallet::new(addr(1));
        wallet
            .deposit(&CallEnv::with_value(addr(5), 100, Wei::from_eth(2)))
            .unwrap();
        assert_eq!(wallet.free_balance(), Wei::from_eth(2));
        assert_eq!(wallet.ledger().locked_total(), Wei::ZERO);
    }

    #[test]
    fn test_failed_payout_returns_to_free_balance() {
        let owner = addr(1);
        let miner = addr(2);
        let mut wallet = HedgeWallet::new(owner);
        let mut exec = RecordingExecutor::new();
        exec.fail_calls_to(miner);

        wallet
            .init(
                &CallEnv::with_value(owner, 100, Wei::from_milli_eth(1010)),
                &terms(),
            )
            .unwrap();
        wallet
            .register(&CallEnv::with_value(miner, 105, Wei::from_eth(1)))
            .unwrap();
        wallet.exhaust(&CallEnv::new(miner, 125), &mut exec).unwrap();

        // Resolution stands; the undeliverable claim stays spendable
        assert_eq!(
            wallet.status(),
            Some(EpochStatus::Resolved(Resolution::Exhausted))
        );
        assert_eq!(wallet.free_balance(), Wei::from_milli_eth(2010));
        assert_eq!(wallet.ledger().locked_total(), Wei::ZERO);
    }

    #[test]
    fn test_gas_burn_is_deterministic() {
        let a = simulate_gas_burn(10_000);
        let b = simulate_gas_burn(10_000);
        assert_eq!(a, b);
        assert_ne!(a, simulate_gas_burn(20_000));
        assert_ne!(a, [0u8; 32]);
    }
}
