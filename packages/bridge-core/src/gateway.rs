//! Wallet and chain gateway boundary
//!
//! Everything the sequencers need from the outside world goes through the
//! [`ChainGateway`] trait: the connected account, the active chain, a set
//! of side-effect-free reads, and the state-changing calls. Reads are
//! idempotent and independently retryable; writes return the transaction
//! hash after wallet submission and are confirmed separately with
//! [`ChainGateway::wait_for_confirmation`].
//!
//! [`EvmGateway`] implements the trait over alloy HTTP providers with a
//! local signer.

use crate::contracts::{ERC20, L1Bridge, L2Bridge};
use crate::error::{BridgeError, ReadField};
use crate::types::{TokenMetadata, TxStatus};
use alloy::{
    network::EthereumWallet,
    primitives::{Address, B256, U256},
    providers::{Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// Interval between confirmation polls
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The wallet/provider and chain-read boundary
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// The connected account address
    fn account(&self) -> Address;

    /// Chain the wallet is currently on
    async fn active_chain_id(&self) -> Result<u64, BridgeError>;

    /// Request a switch to another chain
    async fn switch_chain(&self, chain_id: u64) -> Result<(), BridgeError>;

    async fn native_balance(&self, chain_id: u64, owner: Address) -> Result<U256, BridgeError>;

    async fn token_balance(
        &self,
        chain_id: u64,
        token: Address,
        owner: Address,
    ) -> Result<U256, BridgeError>;

    async fn token_allowance(
        &self,
        chain_id: u64,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, BridgeError>;

    async fn token_metadata(
        &self,
        chain_id: u64,
        token: Address,
    ) -> Result<TokenMetadata, BridgeError>;

    /// Submit an ERC-20 approval; returns the transaction hash
    async fn approve_token(
        &self,
        chain_id: u64,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<B256, BridgeError>;

    /// Submit a payable native deposit with value = amount
    async fn deposit_native(
        &self,
        chain_id: u64,
        bridge: Address,
        amount: U256,
    ) -> Result<B256, BridgeError>;

    /// Submit an ERC-20 deposit
    async fn deposit_token(
        &self,
        chain_id: u64,
        bridge: Address,
        token: Address,
        amount: U256,
    ) -> Result<B256, BridgeError>;

    /// Submit a native withdrawal (no value attached)
    async fn withdraw_native(
        &self,
        chain_id: u64,
        bridge: Address,
        amount: U256,
    ) -> Result<B256, BridgeError>;

    /// Submit an ERC-20 withdrawal
    async fn withdraw_token(
        &self,
        chain_id: u64,
        bridge: Address,
        token: Address,
        amount: U256,
    ) -> Result<B256, BridgeError>;

    /// Wait for a submitted transaction to land. No local timeout is
    /// imposed; a stalled provider leaves the caller pending.
    async fn wait_for_confirmation(
        &self,
        chain_id: u64,
        tx_hash: B256,
    ) -> Result<TxStatus, BridgeError>;
}

/// alloy-backed gateway with a local signing key
pub struct EvmGateway {
    signer: PrivateKeySigner,
    account: Address,
    /// RPC endpoint per chain id
    endpoints: BTreeMap<u64, String>,
    /// Chain the simulated wallet is currently on
    active: AtomicU64,
}

impl EvmGateway {
    /// Create a gateway from a private key and the configured endpoints
    pub fn new(
        private_key: &str,
        endpoints: BTreeMap<u64, String>,
        initial_chain: u64,
    ) -> Result<Self, BridgeError> {
        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|e| BridgeError::provider(format!("invalid private key: {}", e)))?;
        let account = signer.address();

        if !endpoints.contains_key(&initial_chain) {
            return Err(BridgeError::provider(format!(
                "no RPC endpoint configured for chain {}",
                initial_chain
            )));
        }

        info!(account = %account, chain_id = initial_chain, "Gateway initialized");

        Ok(Self {
            signer,
            account,
            endpoints,
            active: AtomicU64::new(initial_chain),
        })
    }

    fn rpc_url(&self, chain_id: u64) -> Result<&str, BridgeError> {
        self.endpoints
            .get(&chain_id)
            .map(String::as_str)
            .ok_or_else(|| {
                BridgeError::provider(format!("no RPC endpoint configured for chain {}", chain_id))
            })
    }

    fn read_provider(&self, chain_id: u64) -> Result<impl Provider<Http<Client>>, BridgeError> {
        let url = self
            .rpc_url(chain_id)?
            .parse()
            .map_err(|e| BridgeError::provider(format!("invalid RPC URL: {}", e)))?;
        Ok(ProviderBuilder::new().on_http(url))
    }

    fn write_provider(&self, chain_id: u64) -> Result<impl Provider<Http<Client>>, BridgeError> {
        let url = self
            .rpc_url(chain_id)?
            .parse()
            .map_err(|e| BridgeError::provider(format!("invalid RPC URL: {}", e)))?;
        let wallet = EthereumWallet::from(self.signer.clone());
        Ok(ProviderBuilder::new().wallet(wallet).on_http(url))
    }
}

#[async_trait]
impl ChainGateway for EvmGateway {
    fn account(&self) -> Address {
        self.account
    }

    async fn active_chain_id(&self) -> Result<u64, BridgeError> {
        Ok(self.active.load(Ordering::SeqCst))
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), BridgeError> {
        let provider = self.read_provider(chain_id)?;
        let reported = provider
            .get_chain_id()
            .await
            .map_err(|e| BridgeError::provider(format!("chain switch failed: {}", e)))?;
        if reported != chain_id {
            return Err(BridgeError::provider(format!(
                "RPC endpoint for chain {} reports chain {}",
                chain_id, reported
            )));
        }

        self.active.store(chain_id, Ordering::SeqCst);
        info!(chain_id, "Switched active chain");
        Ok(())
    }

    async fn native_balance(&self, chain_id: u64, owner: Address) -> Result<U256, BridgeError> {
        let provider = self.read_provider(chain_id)?;
        let balance = provider
            .get_balance(owner)
            .await
            .map_err(|e| BridgeError::read(ReadField::NativeBalance, e))?;
        debug!(chain_id, owner = %owner, balance = %balance, "Queried native balance");
        Ok(balance)
    }

    async fn token_balance(
        &self,
        chain_id: u64,
        token: Address,
        owner: Address,
    ) -> Result<U256, BridgeError> {
        let provider = self.read_provider(chain_id)?;
        let contract = ERC20::new(token, &provider);
        let balance = contract
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| BridgeError::read(ReadField::TokenBalance, e))?;
        debug!(chain_id, token = %token, owner = %owner, balance = %balance._0, "Queried token balance");
        Ok(balance._0)
    }

    async fn token_allowance(
        &self,
        chain_id: u64,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, BridgeError> {
        let provider = self.read_provider(chain_id)?;
        let contract = ERC20::new(token, &provider);
        let allowance = contract
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|e| BridgeError::read(ReadField::Allowance, e))?;
        debug!(chain_id, token = %token, spender = %spender, allowance = %allowance._0, "Queried allowance");
        Ok(allowance._0)
    }

    async fn token_metadata(
        &self,
        chain_id: u64,
        token: Address,
    ) -> Result<TokenMetadata, BridgeError> {
        let provider = self.read_provider(chain_id)?;
        let contract = ERC20::new(token, &provider);

        let (name, symbol, decimals) = tokio::try_join!(
            async {
                contract
                    .name()
                    .call()
                    .await
                    .map(|r| r._0)
                    .map_err(|e| BridgeError::read(ReadField::TokenName, e))
            },
            async {
                contract
                    .symbol()
                    .call()
                    .await
                    .map(|r| r._0)
                    .map_err(|e| BridgeError::read(ReadField::TokenSymbol, e))
            },
            async {
                contract
                    .decimals()
                    .call()
                    .await
                    .map(|r| r._0)
                    .map_err(|e| BridgeError::read(ReadField::TokenDecimals, e))
            }
        )?;

        Ok(TokenMetadata {
            name,
            symbol,
            decimals,
        })
    }

    async fn approve_token(
        &self,
        chain_id: u64,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<B256, BridgeError> {
        let provider = self.write_provider(chain_id)?;
        let contract = ERC20::new(token, &provider);

        let pending = contract
            .approve(spender, amount)
            .send()
            .await
            .map_err(|e| BridgeError::provider(format!("failed to send approve: {}", e)))?;
        let tx_hash = *pending.tx_hash();
        info!(chain_id, token = %token, spender = %spender, amount = %amount, tx_hash = %tx_hash, "Approval submitted");
        Ok(tx_hash)
    }

    async fn deposit_native(
        &self,
        chain_id: u64,
        bridge: Address,
        amount: U256,
    ) -> Result<B256, BridgeError> {
        let provider = self.write_provider(chain_id)?;
        let contract = L1Bridge::new(bridge, &provider);

        let pending = contract
            .depositETH()
            .value(amount)
            .send()
            .await
            .map_err(|e| BridgeError::provider(format!("failed to send depositETH: {}", e)))?;
        let tx_hash = *pending.tx_hash();
        info!(chain_id, bridge = %bridge, amount = %amount, tx_hash = %tx_hash, "Native deposit submitted");
        Ok(tx_hash)
    }

    async fn deposit_token(
        &self,
        chain_id: u64,
        bridge: Address,
        token: Address,
        amount: U256,
    ) -> Result<B256, BridgeError> {
        let provider = self.write_provider(chain_id)?;
        let contract = L1Bridge::new(bridge, &provider);

        let pending = contract
            .depositERC20(token, amount)
            .send()
            .await
            .map_err(|e| BridgeError::provider(format!("failed to send depositERC20: {}", e)))?;
        let tx_hash = *pending.tx_hash();
        info!(chain_id, bridge = %bridge, token = %token, amount = %amount, tx_hash = %tx_hash, "Token deposit submitted");
        Ok(tx_hash)
    }

    async fn withdraw_native(
        &self,
        chain_id: u64,
        bridge: Address,
        amount: U256,
    ) -> Result<B256, BridgeError> {
        let provider = self.write_provider(chain_id)?;
        let contract = L2Bridge::new(bridge, &provider);

        let pending = contract
            .withdrawETH(amount)
            .send()
            .await
            .map_err(|e| BridgeError::provider(format!("failed to send withdrawETH: {}", e)))?;
        let tx_hash = *pending.tx_hash();
        info!(chain_id, bridge = %bridge, amount = %amount, tx_hash = %tx_hash, "Native withdrawal submitted");
        Ok(tx_hash)
    }

    async fn withdraw_token(
        &self,
        chain_id: u64,
        bridge: Address,
        token: Address,
        amount: U256,
    ) -> Result<B256, BridgeError> {
        let provider = self.write_provider(chain_id)?;
        let contract = L2Bridge::new(bridge, &provider);

        let pending = contract
            .withdrawERC20(token, amount)
            .send()
            .await
            .map_err(|e| BridgeError::provider(format!("failed to send withdrawERC20: {}", e)))?;
        let tx_hash = *pending.tx_hash();
        info!(chain_id, bridge = %bridge, token = %token, amount = %amount, tx_hash = %tx_hash, "Token withdrawal submitted");
        Ok(tx_hash)
    }

    async fn wait_for_confirmation(
        &self,
        chain_id: u64,
        tx_hash: B256,
    ) -> Result<TxStatus, BridgeError> {
        let provider = self.read_provider(chain_id)?;

        loop {
            let receipt = provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| BridgeError::provider(format!("failed to poll receipt: {}", e)))?;

            if let Some(receipt) = receipt {
                let status = if receipt.status() {
                    TxStatus::Confirmed
                } else {
                    TxStatus::Reverted
                };
                debug!(chain_id, tx_hash = %tx_hash, ?status, "Transaction landed");
                return Ok(status);
            }

            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }
}
