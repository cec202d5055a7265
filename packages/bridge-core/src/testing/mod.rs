//! Testing utilities
//!
//! An in-memory [`MockGateway`] implementing [`ChainGateway`] with
//! scriptable balances, allowances, metadata, and failure injection.
//! Used by the crate's own tests; exposed behind the `testing` feature for
//! downstream suites.

use crate::error::{BridgeError, ReadField};
use crate::gateway::ChainGateway;
use crate::types::{TokenMetadata, TxStatus};
use alloy::primitives::{address, Address, B256, U256};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

/// Default test account (Anvil's first dev account)
pub const TEST_ACCOUNT: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// A state-changing call recorded by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    SwitchChain {
        chain_id: u64,
    },
    Approve {
        chain_id: u64,
        token: Address,
        spender: Address,
        amount: U256,
    },
    DepositNative {
        chain_id: u64,
        bridge: Address,
        amount: U256,
    },
    DepositToken {
        chain_id: u64,
        bridge: Address,
        token: Address,
        amount: U256,
    },
    WithdrawNative {
        chain_id: u64,
        bridge: Address,
        amount: U256,
    },
    WithdrawToken {
        chain_id: u64,
        bridge: Address,
        token: Address,
        amount: U256,
    },
}

/// An approval submission, extracted for assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalCall {
    pub chain_id: u64,
    pub token: Address,
    pub spender: Address,
    pub amount: U256,
}

/// Deferred state change applied when the transaction confirms
enum Effect {
    SetAllowance {
        chain_id: u64,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    },
}

struct PendingTx {
    status: TxStatus,
    effect: Option<Effect>,
}

#[derive(Default)]
struct MockState {
    active_chain: u64,
    known_chains: BTreeSet<u64>,
    native_balances: HashMap<(u64, Address), U256>,
    token_balances: HashMap<(u64, Address, Address), U256>,
    allowances: HashMap<(u64, Address, Address, Address), U256>,
    metadata: HashMap<(u64, Address), TokenMetadata>,
    pending: HashMap<B256, PendingTx>,
    writes: Vec<GatewayCall>,
    switches: Vec<u64>,
    next_tx: u64,
    reject_next_write: bool,
    revert_next_write: bool,
    fail_next_read: bool,
}

/// Scriptable in-memory gateway
#[derive(Clone)]
pub struct MockGateway {
    account: Address,
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    /// Create a mock connected to `initial_chain` as [`TEST_ACCOUNT`]
    pub fn new(initial_chain: u64) -> Self {
        let mut state = MockState {
            active_chain: initial_chain,
            next_tx: 1,
            ..Default::default()
        };
        state.known_chains.insert(initial_chain);
        Self {
            account: TEST_ACCOUNT,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Make another chain switchable
    pub fn add_chain(&self, chain_id: u64) -> &Self {
        self.state.lock().unwrap().known_chains.insert(chain_id);
        self
    }

    pub fn set_native_balance(&self, chain_id: u64, owner: Address, amount: U256) -> &Self {
        self.state
            .lock()
            .unwrap()
            .native_balances
            .insert((chain_id, owner), amount);
        self
    }

    pub fn set_token_balance(
        &self,
        chain_id: u64,
        token: Address,
        owner: Address,
        amount: U256,
    ) -> &Self {
        self.state
            .lock()
            .unwrap()
            .token_balances
            .insert((chain_id, token, owner), amount);
        self
    }

    pub fn set_allowance(
        &self,
        chain_id: u64,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> &Self {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((chain_id, token, owner, spender), amount);
        self
    }

    pub fn set_metadata(&self, chain_id: u64, token: Address, metadata: TokenMetadata) -> &Self {
        self.state
            .lock()
            .unwrap()
            .metadata
            .insert((chain_id, token), metadata);
        self
    }

    /// The next write submission is rejected by the wallet (provider error,
    /// nothing recorded).
    pub fn reject_next_write(&self) -> &Self {
        self.state.lock().unwrap().reject_next_write = true;
        self
    }

    /// The next write submits but its transaction reverts on confirmation.
    pub fn revert_next_write(&self) -> &Self {
        self.state.lock().unwrap().revert_next_write = true;
        self
    }

    /// The next read-only query fails with a contract-read error.
    pub fn fail_next_read(&self) -> &Self {
        self.state.lock().unwrap().fail_next_read = true;
        self
    }

    /// All recorded write submissions, in order
    pub fn writes(&self) -> Vec<GatewayCall> {
        self.state.lock().unwrap().writes.clone()
    }

    /// Recorded approval submissions
    pub fn approvals_submitted(&self) -> Vec<ApprovalCall> {
        self.state
            .lock()
            .unwrap()
            .writes
            .iter()
            .filter_map(|call| match call {
                GatewayCall::Approve {
                    chain_id,
                    token,
                    spender,
                    amount,
                } => Some(ApprovalCall {
                    chain_id: *chain_id,
                    token: *token,
                    spender: *spender,
                    amount: *amount,
                }),
                _ => None,
            })
            .collect()
    }

    /// Recorded chain switches
    pub fn switches(&self) -> Vec<u64> {
        self.state.lock().unwrap().switches.clone()
    }

    fn check_read(&self, field: ReadField) -> Result<(), BridgeError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_next_read {
            state.fail_next_read = false;
            return Err(BridgeError::read(field, "simulated read failure"));
        }
        Ok(())
    }

    fn submit_write(&self, call: GatewayCall, effect: Option<Effect>) -> Result<B256, BridgeError> {
        let mut state = self.state.lock().unwrap();
        if state.reject_next_write {
            state.reject_next_write = false;
            return Err(BridgeError::provider("user rejected the request"));
        }

        let status = if state.revert_next_write {
            state.revert_next_write = false;
            TxStatus::Reverted
        } else {
            TxStatus::Confirmed
        };

        let tx_hash = B256::from(U256::from(state.next_tx));
        state.next_tx += 1;
        state.writes.push(call);
        state.pending.insert(tx_hash, PendingTx { status, effect });
        Ok(tx_hash)
    }
}

#[async_trait]
impl ChainGateway for MockGateway {
    fn account(&self) -> Address {
        self.account
    }

    async fn active_chain_id(&self) -> Result<u64, BridgeError> {
        Ok(self.state.lock().unwrap().active_chain)
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), BridgeError> {
        let mut state = self.state.lock().unwrap();
        if !state.known_chains.contains(&chain_id) {
            return Err(BridgeError::provider(format!(
                "unknown chain {}",
                chain_id
            )));
        }
        state.active_chain = chain_id;
        state.switches.push(chain_id);
        Ok(())
    }

    async fn native_balance(&self, chain_id: u64, owner: Address) -> Result<U256, BridgeError> {
        self.check_read(ReadField::NativeBalance)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .native_balances
            .get(&(chain_id, owner))
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn token_balance(
        &self,
        chain_id: u64,
        token: Address,
        owner: Address,
    ) -> Result<U256, BridgeError> {
        self.check_read(ReadField::TokenBalance)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .token_balances
            .get(&(chain_id, token, owner))
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn token_allowance(
        &self,
        chain_id: u64,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, BridgeError> {
        self.check_read(ReadField::Allowance)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .allowances
            .get(&(chain_id, token, owner, spender))
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn token_metadata(
        &self,
        chain_id: u64,
        token: Address,
    ) -> Result<TokenMetadata, BridgeError> {
        self.check_read(ReadField::TokenName)?;
        self.state
            .lock()
            .unwrap()
            .metadata
            .get(&(chain_id, token))
            .cloned()
            .ok_or_else(|| BridgeError::read(ReadField::TokenName, "not an ERC-20 contract"))
    }

    async fn approve_token(
        &self,
        chain_id: u64,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<B256, BridgeError> {
        self.submit_write(
            GatewayCall::Approve {
                chain_id,
                token,
                spender,
                amount,
            },
            Some(Effect::SetAllowance {
                chain_id,
                token,
                owner: self.account,
                spender,
                amount,
            }),
        )
    }

    async fn deposit_native(
        &self,
        chain_id: u64,
        bridge: Address,
        amount: U256,
    ) -> Result<B256, BridgeError> {
        self.submit_write(
            GatewayCall::DepositNative {
                chain_id,
                bridge,
                amount,
            },
            None,
        )
    }

    async fn deposit_token(
        &self,
        chain_id: u64,
        bridge: Address,
        token: Address,
        amount: U256,
    ) -> Result<B256, BridgeError> {
        self.submit_write(
            GatewayCall::DepositToken {
                chain_id,
                bridge,
                token,
                amount,
            },
            None,
        )
    }

    async fn withdraw_native(
        &self,
        chain_id: u64,
        bridge: Address,
        amount: U256,
    ) -> Result<B256, BridgeError> {
        self.submit_write(
            GatewayCall::WithdrawNative {
                chain_id,
                bridge,
                amount,
            },
            None,
        )
    }

    async fn withdraw_token(
        &self,
        chain_id: u64,
        bridge: Address,
        token: Address,
        amount: U256,
    ) -> Result<B256, BridgeError> {
        self.submit_write(
            GatewayCall::WithdrawToken {
                chain_id,
                bridge,
                token,
                amount,
            },
            None,
        )
    }

    async fn wait_for_confirmation(
        &self,
        _chain_id: u64,
        tx_hash: B256,
    ) -> Result<TxStatus, BridgeError> {
        let mut state = self.state.lock().unwrap();
        let pending = state
            .pending
            .remove(&tx_hash)
            .ok_or_else(|| BridgeError::provider("unknown transaction hash"))?;

        if pending.status == TxStatus::Confirmed {
            if let Some(Effect::SetAllowance {
                chain_id,
                token,
                owner,
                spender,
                amount,
            }) = pending.effect
            {
                state
                    .allowances
                    .insert((chain_id, token, owner, spender), amount);
            }
        }
        Ok(pending.status)
    }
}
