//! Token and chain registries
//!
//! Immutable configuration loaded once at start. The token registry can be
//! extended at runtime from a user-supplied contract address via
//! [`resolve_token`], which reads the ERC-20 metadata on-chain.

use crate::error::BridgeError;
use crate::gateway::ChainGateway;
use crate::types::Direction;
use alloy::primitives::{address, Address, B256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Sepolia testnet (L1 of the default deployment)
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;
/// GoodNet testnet (L2 of the default deployment)
pub const GOODNET_CHAIN_ID: u64 = 98765432103;

/// Registry construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("native token {symbol} must not carry contract addresses")]
    NativeTokenWithAddresses { symbol: String },

    #[error("token {symbol} has no contract address on any chain")]
    TokenWithoutAddresses { symbol: String },

    #[error("duplicate token symbol {symbol}")]
    DuplicateSymbol { symbol: String },

    #[error("source and destination chains must differ (both are {chain_id})")]
    IdenticalChains { chain_id: u64 },

    #[error("no native token configured")]
    NoNativeToken,
}

/// A bridgeable asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub name: String,
    /// Display glyph shown next to the symbol
    pub icon: String,
    pub decimals: u8,
    pub is_native: bool,
    /// Contract address per chain id; empty for the native asset
    pub addresses: BTreeMap<u64, Address>,
}

impl Token {
    /// A chain's base currency, not represented by a contract
    pub fn native(symbol: &str, name: &str, icon: &str, decimals: u8) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            decimals,
            is_native: true,
            addresses: BTreeMap::new(),
        }
    }

    /// A fungible token addressed per chain
    pub fn erc20(
        symbol: &str,
        name: &str,
        icon: &str,
        decimals: u8,
        addresses: BTreeMap<u64, Address>,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            decimals,
            is_native: false,
            addresses,
        }
    }

    /// Check the native/addressed invariant
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.is_native && !self.addresses.is_empty() {
            return Err(RegistryError::NativeTokenWithAddresses {
                symbol: self.symbol.clone(),
            });
        }
        if !self.is_native && self.addresses.is_empty() {
            return Err(RegistryError::TokenWithoutAddresses {
                symbol: self.symbol.clone(),
            });
        }
        Ok(())
    }

    /// Native tokens are available everywhere; others where addressed
    pub fn available_on(&self, chain_id: u64) -> bool {
        self.is_native || self.addresses.contains_key(&chain_id)
    }

    /// Contract address on a chain; `None` for native or unaddressed
    pub fn address_on(&self, chain_id: u64) -> Option<Address> {
        if self.is_native {
            return None;
        }
        self.addresses.get(&chain_id).copied()
    }
}

/// A chain endpoint of the bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub id: u64,
    pub name: String,
    pub rpc_url: String,
    pub explorer_url: String,
    pub native_symbol: String,
}

impl Chain {
    /// Explorer link for a transaction hash
    pub fn tx_url(&self, tx_hash: B256) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), tx_hash)
    }
}

/// The source/destination chain pair and the bridge contract on each
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    l1: Chain,
    l2: Chain,
    l1_bridge: Address,
    l2_bridge: Address,
}

impl ChainRegistry {
    pub fn new(l1: Chain, l2: Chain, l1_bridge: Address, l2_bridge: Address) -> Result<Self, RegistryError> {
        if l1.id == l2.id {
            return Err(RegistryError::IdenticalChains { chain_id: l1.id });
        }
        Ok(Self {
            l1,
            l2,
            l1_bridge,
            l2_bridge,
        })
    }

    pub fn l1(&self) -> &Chain {
        &self.l1
    }

    pub fn l2(&self) -> &Chain {
        &self.l2
    }

    /// The chain a transfer executes on: deposits run on L1, withdrawals on L2
    pub fn execution_chain(&self, direction: Direction) -> &Chain {
        match direction {
            Direction::Deposit => &self.l1,
            Direction::Withdraw => &self.l2,
        }
    }

    /// The chain the transferred value arrives on
    pub fn receiving_chain(&self, direction: Direction) -> &Chain {
        match direction {
            Direction::Deposit => &self.l2,
            Direction::Withdraw => &self.l1,
        }
    }

    /// Bridge contract on the execution chain of a direction
    pub fn bridge_for(&self, direction: Direction) -> Address {
        match direction {
            Direction::Deposit => self.l1_bridge,
            Direction::Withdraw => self.l2_bridge,
        }
    }
}

/// The set of bridgeable tokens
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
}

impl TokenRegistry {
    pub fn new(tokens: Vec<Token>) -> Result<Self, RegistryError> {
        let mut registry = Self { tokens: Vec::new() };
        for token in tokens {
            registry.register(token)?;
        }
        Ok(registry)
    }

    /// The default GoodNet deployment token set
    pub fn goodnet_defaults() -> Self {
        let tokens = vec![
            Token::native("ETH", "Ethereum", "\u{24ba}", 18),
            Token::erc20(
                "USDT",
                "Tether USD",
                "\u{20ae}",
                6,
                BTreeMap::from([(
                    SEPOLIA_CHAIN_ID,
                    address!("7169D38820dfd117C3FA1f22a697dba58d90BA06"),
                )]),
            ),
            Token::erc20(
                "USDC",
                "USD Coin",
                "\u{25c9}",
                6,
                BTreeMap::from([(
                    SEPOLIA_CHAIN_ID,
                    address!("1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"),
                )]),
            ),
            Token::erc20(
                "WETH",
                "Wrapped Ethereum",
                "\u{1f537}",
                18,
                BTreeMap::from([(
                    SEPOLIA_CHAIN_ID,
                    address!("fFf9976782d46CC05630D1f6eBAb18b2324d6B14"),
                )]),
            ),
            Token::erc20(
                "DAI",
                "Dai Stablecoin",
                "\u{25c8}",
                18,
                BTreeMap::from([(
                    SEPOLIA_CHAIN_ID,
                    address!("11fE4B6AE13d2a6055C8D9cF65c55bac32B5d844"),
                )]),
            ),
        ];
        // Built-in set upholds the invariants by construction
        Self::new(tokens).expect("default token set is valid")
    }

    /// Add a token, enforcing the registry invariants
    pub fn register(&mut self, token: Token) -> Result<(), RegistryError> {
        token.validate()?;
        if self.by_symbol(&token.symbol).is_some() {
            return Err(RegistryError::DuplicateSymbol {
                symbol: token.symbol,
            });
        }
        self.tokens.push(token);
        Ok(())
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens usable on a given chain
    pub fn available_on(&self, chain_id: u64) -> Vec<&Token> {
        self.tokens
            .iter()
            .filter(|t| t.available_on(chain_id))
            .collect()
    }

    pub fn by_symbol(&self, symbol: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.symbol == symbol)
    }

    /// The native asset, if the set defines one
    pub fn native(&self) -> Option<&Token> {
        self.tokens.iter().find(|t| t.is_native)
    }
}

/// Resolve an arbitrary contract address into a registrable [`Token`] by
/// reading its ERC-20 metadata. Each failed read is reported for the
/// specific field that failed and can be retried independently.
pub async fn resolve_token<G: ChainGateway + ?Sized>(
    gateway: &G,
    chain_id: u64,
    contract: Address,
) -> Result<Token, BridgeError> {
    let meta = gateway.token_metadata(chain_id, contract).await?;
    tracing::debug!(
        chain_id,
        contract = %contract,
        symbol = %meta.symbol,
        decimals = meta.decimals,
        "Resolved custom token"
    );
    Ok(Token::erc20(
        &meta.symbol,
        &meta.name,
        "\u{25c6}",
        meta.decimals,
        BTreeMap::from([(chain_id, contract)]),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_chain(id: u64, name: &str) -> Chain {
        Chain {
            id,
            name: name.to_string(),
            rpc_url: format!("http://localhost:{}", 8545 + id % 100),
            explorer_url: "https://explorer.example".to_string(),
            native_symbol: "ETH".to_string(),
        }
    }

    #[test]
    fn test_native_token_must_not_have_addresses() {
        let mut token = Token::native("ETH", "Ethereum", "E", 18);
        assert!(token.validate().is_ok());

        token
            .addresses
            .insert(1, address!("0000000000000000000000000000000000000001"));
        assert_eq!(
            token.validate(),
            Err(RegistryError::NativeTokenWithAddresses {
                symbol: "ETH".to_string()
            })
        );
    }

    #[test]
    fn test_erc20_token_needs_an_address() {
        let token = Token::erc20("USDT", "Tether USD", "T", 6, BTreeMap::new());
        assert_eq!(
            token.validate(),
            Err(RegistryError::TokenWithoutAddresses {
                symbol: "USDT".to_string()
            })
        );
    }

    #[test]
    fn test_availability() {
        let registry = TokenRegistry::goodnet_defaults();

        // Native asset is available on every chain
        let available_l2 = registry.available_on(GOODNET_CHAIN_ID);
        assert_eq!(available_l2.len(), 1);
        assert_eq!(available_l2[0].symbol, "ETH");

        // Sepolia carries the full default set
        let available_l1 = registry.available_on(SEPOLIA_CHAIN_ID);
        assert_eq!(available_l1.len(), 5);
    }

    #[test]
    fn test_address_lookup() {
        let registry = TokenRegistry::goodnet_defaults();
        let usdt = registry.by_symbol("USDT").unwrap();

        assert!(usdt.address_on(SEPOLIA_CHAIN_ID).is_some());
        assert!(usdt.address_on(GOODNET_CHAIN_ID).is_none());
        assert!(registry.native().unwrap().address_on(SEPOLIA_CHAIN_ID).is_none());
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let mut registry = TokenRegistry::goodnet_defaults();
        let err = registry
            .register(Token::native("ETH", "Another Ethereum", "E", 18))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateSymbol {
                symbol: "ETH".to_string()
            }
        );
    }

    #[test]
    fn test_chain_registry_rejects_identical_ids() {
        let err = ChainRegistry::new(
            test_chain(1, "a"),
            test_chain(1, "b"),
            Address::ZERO,
            Address::ZERO,
        )
        .unwrap_err();
        assert_eq!(err, RegistryError::IdenticalChains { chain_id: 1 });
    }

    #[test]
    fn test_chain_registry_direction_lookup() {
        let registry = ChainRegistry::new(
            test_chain(1, "l1"),
            test_chain(2, "l2"),
            address!("0000000000000000000000000000000000000011"),
            address!("0000000000000000000000000000000000000022"),
        )
        .unwrap();

        assert_eq!(registry.execution_chain(Direction::Deposit).id, 1);
        assert_eq!(registry.execution_chain(Direction::Withdraw).id, 2);
        assert_eq!(registry.receiving_chain(Direction::Deposit).id, 2);
        assert_eq!(registry.receiving_chain(Direction::Withdraw).id, 1);
        assert_eq!(
            registry.bridge_for(Direction::Deposit),
            address!("0000000000000000000000000000000000000011")
        );
        assert_eq!(
            registry.bridge_for(Direction::Withdraw),
            address!("0000000000000000000000000000000000000022")
        );
    }

    #[test]
    fn test_tx_url() {
        let chain = test_chain(1, "l1");
        let url = chain.tx_url(B256::ZERO);
        assert!(url.starts_with("https://explorer.example/tx/0x"));
    }
}
