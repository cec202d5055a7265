//! Static bridge fee schedule
//!
//! Fees are a configuration constant displayed to the user before
//! submission; this client never deducts them itself.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Fee schedule for bridge transfers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Flat fee in the native asset's smallest units
    pub base_fee: U256,
    /// Percentage fee in basis points (1 bp = 0.01%)
    pub percentage_bps: u32,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            // 0.001 ETH
            base_fee: U256::from(1_000_000_000_000_000u64),
            // 0.10%
            percentage_bps: 10,
        }
    }
}

/// Quoted fee breakdown for a given transfer amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    pub base: U256,
    pub percentage: U256,
    pub total: U256,
}

impl FeeSchedule {
    /// Quote the fee for a transfer amount in smallest units
    pub fn quote(&self, amount: U256) -> FeeQuote {
        let percentage = amount * U256::from(self.percentage_bps) / U256::from(10_000u64);
        FeeQuote {
            base: self.base_fee,
            percentage,
            total: self.base_fee.saturating_add(percentage),
        }
    }
}
