//! Transfer sequencer
//!
//! Submits the deposit or withdraw call appropriate to the direction and
//! asset kind, then tracks the transaction through submission, on-chain
//! confirmation, and the confirmed/failed outcome.

use crate::error::{BridgeError, CallKind};
use crate::gateway::ChainGateway;
use crate::types::{Direction, TransferPhase, TxStatus};
use alloy::primitives::{Address, B256, U256};
use tracing::{info, warn};

/// Inputs for one transfer submission
#[derive(Debug, Clone, Copy)]
pub struct TransferRequest {
    pub direction: Direction,
    /// Chain the transaction executes on (L1 for deposits, L2 for withdrawals)
    pub chain_id: u64,
    /// Bridge contract on that chain
    pub bridge: Address,
    /// Token contract on that chain; `None` for the native asset
    pub token: Option<Address>,
    /// Amount in smallest units
    pub amount: U256,
}

/// Drives a transfer transaction and exposes its current phase
#[derive(Debug)]
pub struct TransferSequencer {
    phase: TransferPhase,
}

impl TransferSequencer {
    pub fn new() -> Self {
        Self {
            phase: TransferPhase::Idle,
        }
    }

    /// Phase of the most recent execution
    pub fn phase(&self) -> TransferPhase {
        self.phase
    }

    /// Submit the transfer and wait for its confirmation.
    ///
    /// Dispatch:
    /// - deposit + native: payable call, value = amount
    /// - deposit + token: `depositERC20(token, amount)`
    /// - withdraw + native: `withdrawETH(amount)`, no value attached
    /// - withdraw + token: `withdrawERC20(token, amount)`
    pub async fn execute<G: ChainGateway + ?Sized>(
        &mut self,
        gateway: &G,
        req: &TransferRequest,
    ) -> Result<B256, BridgeError> {
        let kind = match req.direction {
            Direction::Deposit => CallKind::Deposit,
            Direction::Withdraw => CallKind::Withdraw,
        };

        self.phase = TransferPhase::Submitting;
        let submitted = match (req.direction, req.token) {
            (Direction::Deposit, None) => {
                gateway
                    .deposit_native(req.chain_id, req.bridge, req.amount)
                    .await
            }
            (Direction::Deposit, Some(token)) => {
                gateway
                    .deposit_token(req.chain_id, req.bridge, token, req.amount)
                    .await
            }
            (Direction::Withdraw, None) => {
                gateway
                    .withdraw_native(req.chain_id, req.bridge, req.amount)
                    .await
            }
            (Direction::Withdraw, Some(token)) => {
                gateway
                    .withdraw_token(req.chain_id, req.bridge, token, req.amount)
                    .await
            }
        };

        let tx_hash = match submitted {
            Ok(hash) => hash,
            Err(e) => {
                self.phase = TransferPhase::Failed;
                warn!(direction = %req.direction, error = %e, "Transfer submission failed");
                return Err(e);
            }
        };

        self.phase = TransferPhase::Confirming;
        info!(
            direction = %req.direction,
            chain_id = req.chain_id,
            tx_hash = %tx_hash,
            "Transfer submitted, waiting for confirmation"
        );

        match gateway.wait_for_confirmation(req.chain_id, tx_hash).await {
            Ok(TxStatus::Confirmed) => {
                self.phase = TransferPhase::Confirmed;
                info!(tx_hash = %tx_hash, "Transfer confirmed");
                Ok(tx_hash)
            }
            Ok(TxStatus::Reverted) => {
                self.phase = TransferPhase::Failed;
                Err(BridgeError::call(kind, "transaction reverted"))
            }
            Err(e) => {
                self.phase = TransferPhase::Failed;
                Err(e)
            }
        }
    }
}

impl Default for TransferSequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{GatewayCall, MockGateway};
    use alloy::primitives::address;

    const L1: u64 = 11155111;
    const L2: u64 = 98765432103;
    const BRIDGE: Address = address!("00000000000000000000000000000000000000b1");
    const TOKEN: Address = address!("7169D38820dfd117C3FA1f22a697dba58d90BA06");

    fn request(direction: Direction, token: Option<Address>) -> TransferRequest {
        TransferRequest {
            direction,
            chain_id: match direction {
                Direction::Deposit => L1,
                Direction::Withdraw => L2,
            },
            bridge: BRIDGE,
            token,
            amount: U256::from(1_000u64),
        }
    }

    #[tokio::test]
    async fn test_native_deposit_is_a_payable_call() {
        let gateway = MockGateway::new(L1);
        let mut sequencer = TransferSequencer::new();

        sequencer
            .execute(&gateway, &request(Direction::Deposit, None))
            .await
            .unwrap();

        assert_eq!(sequencer.phase(), TransferPhase::Confirmed);
        assert_eq!(
            gateway.writes(),
            vec![GatewayCall::DepositNative {
                chain_id: L1,
                bridge: BRIDGE,
                amount: U256::from(1_000u64),
            }]
        );
    }

    #[tokio::test]
    async fn test_token_deposit_carries_the_token_address() {
        let gateway = MockGateway::new(L1);
        let mut sequencer = TransferSequencer::new();

        sequencer
            .execute(&gateway, &request(Direction::Deposit, Some(TOKEN)))
            .await
            .unwrap();

        assert_eq!(
            gateway.writes(),
            vec![GatewayCall::DepositToken {
                chain_id: L1,
                bridge: BRIDGE,
                token: TOKEN,
                amount: U256::from(1_000u64),
            }]
        );
    }

    #[tokio::test]
    async fn test_native_withdrawal_attaches_no_value() {
        let gateway = MockGateway::new(L2);
        let mut sequencer = TransferSequencer::new();

        sequencer
            .execute(&gateway, &request(Direction::Withdraw, None))
            .await
            .unwrap();

        assert_eq!(
            gateway.writes(),
            vec![GatewayCall::WithdrawNative {
                chain_id: L2,
                bridge: BRIDGE,
                amount: U256::from(1_000u64),
            }]
        );
    }

    #[tokio::test]
    async fn test_token_withdrawal_carries_the_token_address() {
        let gateway = MockGateway::new(L2);
        let mut sequencer = TransferSequencer::new();

        sequencer
            .execute(&gateway, &request(Direction::Withdraw, Some(TOKEN)))
            .await
            .unwrap();

        assert_eq!(
            gateway.writes(),
            vec![GatewayCall::WithdrawToken {
                chain_id: L2,
                bridge: BRIDGE,
                token: TOKEN,
                amount: U256::from(1_000u64),
            }]
        );
    }

    #[tokio::test]
    async fn test_revert_reports_the_call_kind() {
        let gateway = MockGateway::new(L2);
        gateway.revert_next_write();
        let mut sequencer = TransferSequencer::new();

        let err = sequencer
            .execute(&gateway, &request(Direction::Withdraw, None))
            .await
            .unwrap_err();

        assert_eq!(sequencer.phase(), TransferPhase::Failed);
        assert!(matches!(
            err,
            BridgeError::ContractCall {
                kind: CallKind::Withdraw,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_rejected_submission_fails_before_confirmation() {
        let gateway = MockGateway::new(L1);
        gateway.reject_next_write();
        let mut sequencer = TransferSequencer::new();

        let err = sequencer
            .execute(&gateway, &request(Direction::Deposit, None))
            .await
            .unwrap_err();

        assert!(err.is_provider());
        assert_eq!(sequencer.phase(), TransferPhase::Failed);
        assert!(gateway.writes().is_empty());
    }
}
