//! Common types for the bridge client
//!
//! Shared across the registries, sequencers, and the transfer form.

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a transfer relative to the chain pair.
///
/// `Deposit` moves assets from L1 to L2 and executes on L1;
/// `Withdraw` moves assets from L2 back to L1 and executes on L2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Deposit,
    Withdraw,
}

impl Direction {
    /// Get the direction as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Deposit => "deposit",
            Direction::Withdraw => "withdraw",
        }
    }

    /// The opposite direction
    pub fn flipped(&self) -> Self {
        match self {
            Direction::Deposit => Direction::Withdraw,
            Direction::Withdraw => Direction::Deposit,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Step of a transfer intent's lifecycle
///
/// A single enumerated tag instead of a pile of boolean flags, so
/// impossible combinations ("approving" and "confirmed" at once)
/// cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferStep {
    SelectingToken,
    AwaitingApproval,
    AwaitingTransferConfirmation,
    Completed,
    Failed,
}

impl TransferStep {
    /// Get the step as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStep::SelectingToken => "selecting_token",
            TransferStep::AwaitingApproval => "awaiting_approval",
            TransferStep::AwaitingTransferConfirmation => "awaiting_transfer_confirmation",
            TransferStep::Completed => "completed",
            TransferStep::Failed => "failed",
        }
    }

    /// Whether the intent has reached a terminal step
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferStep::Completed | TransferStep::Failed)
    }
}

impl fmt::Display for TransferStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Phase of an in-flight transfer transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferPhase {
    Idle,
    Submitting,
    Confirming,
    Confirmed,
    Failed,
}

impl TransferPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferPhase::Idle => "idle",
            TransferPhase::Submitting => "submitting",
            TransferPhase::Confirming => "confirming",
            TransferPhase::Confirmed => "confirmed",
            TransferPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of waiting for an on-chain confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Confirmed,
    Reverted,
}

/// ERC-20 metadata read from an arbitrary contract address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Read-only view of a wallet balance on one chain.
///
/// Never locally mutated, only replaced by a fresh query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub owner: Address,
    pub chain_id: u64,
    pub amount: U256,
}

/// Read-only view of a spending allowance on one chain.
///
/// Never locally mutated, only replaced by a fresh query after a
/// state-changing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowanceSnapshot {
    pub owner: Address,
    pub spender: Address,
    pub token: Address,
    pub chain_id: u64,
    pub amount: U256,
}

/// Result of a completed transfer, handed back to the caller for display
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    pub direction: Direction,
    pub token_symbol: String,
    /// Amount as entered, in decimal text
    pub amount: String,
    pub tx_hash: B256,
    /// Explorer link for the submitted transaction
    pub explorer_url: String,
    /// Present for withdrawals: funds require a separate claim after the
    /// challenge period and are not immediately available.
    pub claim_notice: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_flipped() {
        assert_eq!(Direction::Deposit.flipped(), Direction::Withdraw);
        assert_eq!(Direction::Withdraw.flipped(), Direction::Deposit);
    }

    #[test]
    fn test_direction_as_str() {
        assert_eq!(Direction::Deposit.as_str(), "deposit");
        assert_eq!(Direction::Withdraw.as_str(), "withdraw");
    }

    #[test]
    fn test_step_terminal() {
        assert!(!TransferStep::SelectingToken.is_terminal());
        assert!(!TransferStep::AwaitingApproval.is_terminal());
        assert!(!TransferStep::AwaitingTransferConfirmation.is_terminal());
        assert!(TransferStep::Completed.is_terminal());
        assert!(TransferStep::Failed.is_terminal());
    }

    #[test]
    fn test_step_display() {
        assert_eq!(
            format!("{}", TransferStep::AwaitingApproval),
            "awaiting_approval"
        );
        assert_eq!(format!("{}", TransferStep::Completed), "completed");
    }
}
