#![allow(dead_code)]

use eyre::{eyre, Result, WrapErr};
use goodbridge_core::{
    parse_amount, Chain, ChainRegistry, FeeSchedule, GasReserves, GOODNET_CHAIN_ID,
    SEPOLIA_CHAIN_ID,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::Path;

use alloy::primitives::{Address, U256};
use std::str::FromStr;

/// Main configuration for the bridge client
#[derive(Debug, Clone)]
pub struct Config {
    pub wallet: WalletConfig,
    pub l1: ChainEndpointConfig,
    pub l2: ChainEndpointConfig,
    pub transfer: TransferConfig,
    pub fees: FeeConfig,
}

/// Wallet configuration
#[derive(Clone, Deserialize)]
pub struct WalletConfig {
    pub private_key: String,
}

/// Custom Debug that redacts private_key to prevent accidental log leakage.
impl fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConfig")
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// One chain endpoint of the bridge
#[derive(Debug, Clone, Deserialize)]
pub struct ChainEndpointConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub explorer_url: String,
    pub native_symbol: String,
    pub bridge_address: String,
}

/// Transfer behavior configuration
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// Native-asset gas reserve for deposits, smallest units
    pub deposit_gas_reserve: U256,
    /// Native-asset gas reserve for withdrawals, smallest units
    pub withdraw_gas_reserve: U256,
    /// Challenge period surfaced on withdrawal receipts
    pub challenge_period_hours: u64,
}

/// Displayed fee configuration
#[derive(Debug, Clone)]
pub struct FeeConfig {
    /// Flat fee in native smallest units
    pub base_fee: U256,
    pub fee_bps: u32,
}

/// Default functions
fn default_l1_name() -> String {
    "Sepolia".to_string()
}

fn default_l1_explorer() -> String {
    "https://sepolia.etherscan.io".to_string()
}

fn default_l2_name() -> String {
    "GoodNet Testnet".to_string()
}

fn default_l2_rpc() -> String {
    "https://testnet-scan.dexgood.com/rpc".to_string()
}

fn default_l2_explorer() -> String {
    "https://testnet-scan.dexgood.com".to_string()
}

fn default_deposit_gas_reserve() -> &'static str {
    "0.01"
}

fn default_withdraw_gas_reserve() -> &'static str {
    "0.001"
}

fn default_base_fee() -> &'static str {
    "0.001"
}

fn default_fee_bps() -> u32 {
    10
}

fn default_challenge_period_hours() -> u64 {
    168
}

impl Config {
    /// Load configuration from environment variables.
    /// Loads .env file if present, then reads from environment.
    pub fn load() -> Result<Self> {
        Self::load_from_file(".env").or_else(|_| Self::load_from_env())
    }

    /// Load from a specific .env file path
    pub fn load_from_file(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            dotenvy::from_filename(path)
                .wrap_err_with(|| format!("Failed to load .env file from {}", path))?;
        }
        Self::load_from_env()
    }

    /// Load configuration from environment variables
    fn load_from_env() -> Result<Self> {
        let wallet = WalletConfig {
            private_key: env::var("PRIVATE_KEY")
                .map_err(|_| eyre!("PRIVATE_KEY environment variable is required"))?,
        };

        let l1 = ChainEndpointConfig {
            chain_id: env::var("L1_CHAIN_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(SEPOLIA_CHAIN_ID),
            name: env::var("L1_NAME").unwrap_or_else(|_| default_l1_name()),
            rpc_url: env::var("L1_RPC_URL")
                .map_err(|_| eyre!("L1_RPC_URL environment variable is required"))?,
            explorer_url: env::var("L1_EXPLORER_URL").unwrap_or_else(|_| default_l1_explorer()),
            native_symbol: env::var("L1_NATIVE_SYMBOL").unwrap_or_else(|_| "ETH".to_string()),
            bridge_address: env::var("L1_BRIDGE_ADDRESS")
                .map_err(|_| eyre!("L1_BRIDGE_ADDRESS environment variable is required"))?,
        };

        let l2 = ChainEndpointConfig {
            chain_id: env::var("L2_CHAIN_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(GOODNET_CHAIN_ID),
            name: env::var("L2_NAME").unwrap_or_else(|_| default_l2_name()),
            rpc_url: env::var("L2_RPC_URL").unwrap_or_else(|_| default_l2_rpc()),
            explorer_url: env::var("L2_EXPLORER_URL").unwrap_or_else(|_| default_l2_explorer()),
            native_symbol: env::var("L2_NATIVE_SYMBOL").unwrap_or_else(|_| "TDXG".to_string()),
            bridge_address: env::var("L2_BRIDGE_ADDRESS")
                .map_err(|_| eyre!("L2_BRIDGE_ADDRESS environment variable is required"))?,
        };

        let transfer = TransferConfig {
            deposit_gas_reserve: parse_reserve(
                &env::var("DEPOSIT_GAS_RESERVE")
                    .unwrap_or_else(|_| default_deposit_gas_reserve().to_string()),
                "DEPOSIT_GAS_RESERVE",
            )?,
            withdraw_gas_reserve: parse_reserve(
                &env::var("WITHDRAW_GAS_RESERVE")
                    .unwrap_or_else(|_| default_withdraw_gas_reserve().to_string()),
                "WITHDRAW_GAS_RESERVE",
            )?,
            challenge_period_hours: env::var("CHALLENGE_PERIOD_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_challenge_period_hours()),
        };

        let fees = FeeConfig {
            base_fee: parse_reserve(
                &env::var("BRIDGE_BASE_FEE").unwrap_or_else(|_| default_base_fee().to_string()),
                "BRIDGE_BASE_FEE",
            )?,
            fee_bps: env::var("BRIDGE_FEE_BPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_fee_bps()),
        };

        let config = Config {
            wallet,
            l1,
            l2,
            transfer,
            fees,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        // Validate the private key format
        if self.wallet.private_key.len() != 66 || !self.wallet.private_key.starts_with("0x") {
            return Err(eyre!(
                "PRIVATE_KEY must be 66 chars (0x + 64 hex chars)"
            ));
        }

        // Validate RPC URLs
        if self.l1.rpc_url.is_empty() {
            return Err(eyre!("L1_RPC_URL cannot be empty"));
        }
        if self.l2.rpc_url.is_empty() {
            return Err(eyre!("L2_RPC_URL cannot be empty"));
        }

        // Validate bridge addresses
        for (label, address) in [
            ("L1_BRIDGE_ADDRESS", &self.l1.bridge_address),
            ("L2_BRIDGE_ADDRESS", &self.l2.bridge_address),
        ] {
            if address.len() != 42 || !address.starts_with("0x") {
                return Err(eyre!(
                    "{} must be a valid hex address (42 chars with 0x prefix)",
                    label
                ));
            }
        }

        // The two ends of the bridge must be different chains
        if self.l1.chain_id == self.l2.chain_id {
            return Err(eyre!(
                "L1_CHAIN_ID and L2_CHAIN_ID must differ (both are {})",
                self.l1.chain_id
            ));
        }

        // Validate fee BPS is reasonable
        if self.fees.fee_bps > 100 {
            return Err(eyre!("BRIDGE_FEE_BPS cannot exceed 100"));
        }

        Ok(())
    }

    /// The chain pair plus parsed bridge addresses
    pub fn chain_registry(&self) -> Result<ChainRegistry> {
        let l1_bridge = Address::from_str(&self.l1.bridge_address)
            .wrap_err("Invalid L1 bridge address")?;
        let l2_bridge = Address::from_str(&self.l2.bridge_address)
            .wrap_err("Invalid L2 bridge address")?;

        ChainRegistry::new(self.l1.chain(), self.l2.chain(), l1_bridge, l2_bridge)
            .map_err(|e| eyre!("Invalid chain configuration: {}", e))
    }

    /// RPC endpoint per chain id, for the gateway
    pub fn endpoints(&self) -> BTreeMap<u64, String> {
        BTreeMap::from([
            (self.l1.chain_id, self.l1.rpc_url.clone()),
            (self.l2.chain_id, self.l2.rpc_url.clone()),
        ])
    }

    pub fn gas_reserves(&self) -> GasReserves {
        GasReserves {
            deposit: self.transfer.deposit_gas_reserve,
            withdraw: self.transfer.withdraw_gas_reserve,
        }
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            base_fee: self.fees.base_fee,
            percentage_bps: self.fees.fee_bps,
        }
    }
}

impl ChainEndpointConfig {
    pub fn chain(&self) -> Chain {
        Chain {
            id: self.chain_id,
            name: self.name.clone(),
            rpc_url: self.rpc_url.clone(),
            explorer_url: self.explorer_url.clone(),
            native_symbol: self.native_symbol.clone(),
        }
    }
}

/// Parse a native-asset decimal amount (18 decimals) from config text
fn parse_reserve(text: &str, label: &str) -> Result<U256> {
    parse_amount(text, 18).map_err(|e| eyre!("{} is invalid: {}", label, e))
}
