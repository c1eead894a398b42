use gashedge_crypto::Signature;
use gashedge_exec::CallOutcome;
use gashedge_types::{Address, BlockNumber, Result, TransactionRequest, Wei};
use gashedge_wallet::{CallEnv, HedgeTerms, HedgeWallet, WalletConfig};

use crate::chain::SimChain;
use crate::executor::SimExecutor;
use crate::token::SimToken;

/// One wallet, one chain, one executor, wired together.
///
/// Every operation builds its call environment from the current chain
/// height, so scenarios read as a sequence of blocks and calls.
pub struct Harness {
    pub chain: SimChain,
    pub wallet: HedgeWallet,
    pub executor: SimExecutor,
    wallet_address: Address,
}

impl Harness {
    pub fn new(owner: Address) -> Self {
        Self::with_config(owner, WalletConfig::default())
    }

    pub fn with_config(owner: Address, config: WalletConfig) -> Self {
        let wallet_address = Address::from_bytes([0xcc; 20]);
        Harness {
            chain: SimChain::new(),
            wallet: HedgeWallet::with_config(owner, config),
            executor: SimExecutor::new(wallet_address),
            wallet_address,
        }
    }

    pub fn wallet_address(&self) -> Address {
        self.wallet_address
    }

    pub fn height(&self) -> BlockNumber {
        self.chain.height()
    }

    pub fn mine(&mut self) {
        self.chain.mine();
    }

    pub fn mine_to(&mut self, target: BlockNumber) {
        self.chain.mine_to(target);
    }

    pub fn add_token(&mut self, token: SimToken) {
        self.executor.add_token(token);
    }

    /// Native value an address has received through the executor.
    pub fn received(&self, address: &Address) -> Wei {
        self.executor.balance_of(address)
    }

    pub fn init(&mut self, value: Wei, terms: &HedgeTerms) -> Result<()> {
        let env = CallEnv::with_value(self.wallet.owner(), self.chain.height(), value);
        self.wallet.init(&env, terms)
    }

    pub fn register(&mut self, miner: Address, collateral: Wei) -> Result<()> {
        let env = CallEnv::with_value(miner, self.chain.height(), collateral);
        self.wallet.register(&env)
    }

    pub fn execute(
        &mut self,
        caller: Address,
        request: &TransactionRequest,
        signature: &Signature,
    ) -> Result<CallOutcome> {
        let env = CallEnv::new(caller, self.chain.height());
        self.wallet
            .execute(&env, request, signature, &mut self.executor)
    }

    pub fn verify_and_execute(
        &mut self,
        caller: Address,
        value: Wei,
        request: &TransactionRequest,
        signature: &Signature,
    ) -> Result<CallOutcome> {
        let env = CallEnv::with_value(caller, self.chain.height(), value);
        self.wallet
            .verify_and_execute(&env, request, signature, &mut self.executor)
    }

    pub fn exhaust(&mut self, caller: Address) -> Result<()> {
        let env = CallEnv::new(caller, self.chain.height());
        self.wallet.exhaust(&env, &mut self.executor)
    }

    pub fn refund(&mut self) -> Result<()> {
        let env = CallEnv::new(self.wallet.owner(), self.chain.height());
        self.wallet.refund(&env, &mut self.executor)
    }

    pub fn deposit(&mut self, from: Address, value: Wei) -> Result<()> {
        let env = CallEnv::with_value(from, self.chain.height(), value);
        self.wallet.deposit(&env)
    }
}
