//! Approval sequencer
//!
//! Compares the current allowance against the requested amount and, when
//! short, submits an allowance increase for exactly that amount (never
//! unlimited), awaits its confirmation, and re-reads the allowance before
//! reporting approved. Native assets never reach this component.

use crate::error::{BridgeError, CallKind};
use crate::gateway::ChainGateway;
use crate::types::{AllowanceSnapshot, TxStatus};
use alloy::primitives::{Address, B256, U256};
use tracing::{debug, info};

/// Inputs for one approval pass
#[derive(Debug, Clone, Copy)]
pub struct ApprovalRequest {
    pub chain_id: u64,
    pub token: Address,
    pub owner: Address,
    /// The bridge contract being authorized to spend
    pub spender: Address,
    /// Required allowance in smallest units
    pub required: U256,
}

/// Result of a successful approval pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// The existing allowance already covers the requested amount
    AlreadySufficient { allowance: U256 },
    /// An allowance increase was submitted and confirmed
    Approved { tx_hash: B256, allowance: U256 },
}

impl ApprovalOutcome {
    /// The allowance after the pass, as re-read from the chain
    pub fn allowance(&self) -> U256 {
        match self {
            ApprovalOutcome::AlreadySufficient { allowance } => *allowance,
            ApprovalOutcome::Approved { allowance, .. } => *allowance,
        }
    }

    /// Snapshot view of the post-pass allowance
    pub fn snapshot(&self, req: &ApprovalRequest) -> AllowanceSnapshot {
        AllowanceSnapshot {
            owner: req.owner,
            spender: req.spender,
            token: req.token,
            chain_id: req.chain_id,
            amount: self.allowance(),
        }
    }
}

/// Drives the allowance-increase flow
pub struct ApprovalSequencer;

impl ApprovalSequencer {
    /// Ensure the spender holds an allowance covering `required`.
    ///
    /// On failure nothing is recorded locally; the caller's intent stays at
    /// its step so the user can retry.
    pub async fn ensure<G: ChainGateway + ?Sized>(
        gateway: &G,
        req: &ApprovalRequest,
    ) -> Result<ApprovalOutcome, BridgeError> {
        let current = gateway
            .token_allowance(req.chain_id, req.token, req.owner, req.spender)
            .await?;

        if current >= req.required {
            debug!(
                token = %req.token,
                allowance = %current,
                required = %req.required,
                "Allowance already sufficient"
            );
            return Ok(ApprovalOutcome::AlreadySufficient { allowance: current });
        }

        info!(
            token = %req.token,
            spender = %req.spender,
            current = %current,
            required = %req.required,
            "Submitting allowance increase"
        );

        let tx_hash = gateway
            .approve_token(req.chain_id, req.token, req.spender, req.required)
            .await?;

        match gateway.wait_for_confirmation(req.chain_id, tx_hash).await? {
            TxStatus::Confirmed => {}
            TxStatus::Reverted => {
                return Err(BridgeError::call(
                    CallKind::Approve,
                    "approval transaction reverted",
                ));
            }
        }

        // Refresh the snapshot; the allowance is chain state, never assumed
        let refreshed = gateway
            .token_allowance(req.chain_id, req.token, req.owner, req.spender)
            .await?;
        if refreshed < req.required {
            return Err(BridgeError::call(
                CallKind::Approve,
                format!(
                    "allowance is {} after approval, below the requested {}",
                    refreshed, req.required
                ),
            ));
        }

        info!(token = %req.token, tx_hash = %tx_hash, allowance = %refreshed, "Approval confirmed");
        Ok(ApprovalOutcome::Approved {
            tx_hash,
            allowance: refreshed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGateway;
    use alloy::primitives::address;

    const CHAIN: u64 = 11155111;
    const TOKEN: Address = address!("7169D38820dfd117C3FA1f22a697dba58d90BA06");
    const BRIDGE: Address = address!("00000000000000000000000000000000000000b1");

    fn request(gateway: &MockGateway, required: u64) -> ApprovalRequest {
        ApprovalRequest {
            chain_id: CHAIN,
            token: TOKEN,
            owner: gateway.account(),
            spender: BRIDGE,
            required: U256::from(required),
        }
    }

    #[tokio::test]
    async fn test_sufficient_allowance_submits_nothing() {
        let gateway = MockGateway::new(CHAIN);
        gateway.set_allowance(CHAIN, TOKEN, gateway.account(), BRIDGE, U256::from(100u64));

        let outcome = ApprovalSequencer::ensure(&gateway, &request(&gateway, 100))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ApprovalOutcome::AlreadySufficient {
                allowance: U256::from(100u64)
            }
        );
        assert!(gateway.approvals_submitted().is_empty());
    }

    #[tokio::test]
    async fn test_short_allowance_approves_exact_amount() {
        let gateway = MockGateway::new(CHAIN);
        gateway.set_allowance(CHAIN, TOKEN, gateway.account(), BRIDGE, U256::from(50u64));

        let outcome = ApprovalSequencer::ensure(&gateway, &request(&gateway, 100))
            .await
            .unwrap();

        assert!(matches!(outcome, ApprovalOutcome::Approved { .. }));
        assert_eq!(outcome.allowance(), U256::from(100u64));

        // Exactly the requested amount, never unlimited
        let submitted = gateway.approvals_submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].amount, U256::from(100u64));
        assert_ne!(submitted[0].amount, U256::MAX);
    }

    #[tokio::test]
    async fn test_reverted_approval_is_a_call_error() {
        let gateway = MockGateway::new(CHAIN);
        gateway.set_allowance(CHAIN, TOKEN, gateway.account(), BRIDGE, U256::ZERO);
        gateway.revert_next_write();

        let err = ApprovalSequencer::ensure(&gateway, &request(&gateway, 100))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BridgeError::ContractCall {
                kind: CallKind::Approve,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_rejected_submission_is_a_provider_error() {
        let gateway = MockGateway::new(CHAIN);
        gateway.reject_next_write();

        let err = ApprovalSequencer::ensure(&gateway, &request(&gateway, 100))
            .await
            .unwrap_err();
        assert!(err.is_provider());
    }
}
