//! Transfer form controller
//!
//! Owns the single [`TransferIntent`] of a session and drives the approval
//! and transfer sequencers in order. Submission takes `&mut self`, so at
//! most one state-changing call is ever in flight per intent and edits
//! cannot race an in-flight call; a discarded form drops the intent and any
//! late confirmation with it.

use crate::amount::{format_amount, max_spendable, parse_amount};
use crate::error::{BridgeError, ValidationError};
use crate::gateway::ChainGateway;
use crate::registry::{ChainRegistry, RegistryError, Token, TokenRegistry};
use crate::sequencer::{ApprovalRequest, ApprovalSequencer, TransferRequest, TransferSequencer};
use crate::types::{
    AllowanceSnapshot, BalanceSnapshot, Direction, TransferReceipt, TransferStep,
};
use alloy::primitives::U256;
use tracing::{debug, info};

/// Native-asset amounts held back for gas when computing MAX and
/// validating balances. Deposits reserve more than withdrawals because L1
/// gas costs more.
#[derive(Debug, Clone, Copy)]
pub struct GasReserves {
    pub deposit: U256,
    pub withdraw: U256,
}

impl Default for GasReserves {
    fn default() -> Self {
        Self {
            // 0.01 ETH on L1
            deposit: U256::from(10_000_000_000_000_000u64),
            // 0.001 ETH on L2
            withdraw: U256::from(1_000_000_000_000_000u64),
        }
    }
}

impl GasReserves {
    pub fn for_direction(&self, direction: Direction) -> U256 {
        match direction {
            Direction::Deposit => self.deposit,
            Direction::Withdraw => self.withdraw,
        }
    }
}

/// The single per-session transfer being assembled
#[derive(Debug, Clone)]
pub struct TransferIntent {
    pub direction: Direction,
    pub token: Token,
    /// Amount as typed, decimal text
    pub amount: String,
    pub terms_accepted: bool,
    pub requires_approval: bool,
    pub step: TransferStep,
}

/// Enabled/disabled state of the one action button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    EnterAmount,
    InsufficientBalance,
    AcceptTerms,
    Approve { symbol: String },
    Transfer { destination: String },
    Completed,
    Failed,
}

/// Form controller over the transfer intent
pub struct TransferForm<G> {
    gateway: G,
    chains: ChainRegistry,
    tokens: TokenRegistry,
    reserves: GasReserves,
    challenge_period_hours: u64,
    intent: TransferIntent,
    balance: Option<BalanceSnapshot>,
    allowance: Option<AllowanceSnapshot>,
    transfer: TransferSequencer,
    receipt: Option<TransferReceipt>,
    failure: Option<String>,
}

impl<G: ChainGateway> TransferForm<G> {
    /// Open a form with the native asset preselected
    pub fn new(
        gateway: G,
        chains: ChainRegistry,
        tokens: TokenRegistry,
        direction: Direction,
    ) -> Result<Self, RegistryError> {
        let token = tokens.native().ok_or(RegistryError::NoNativeToken)?.clone();
        Ok(Self {
            gateway,
            chains,
            tokens,
            reserves: GasReserves::default(),
            challenge_period_hours: 168,
            intent: TransferIntent {
                direction,
                token,
                amount: String::new(),
                terms_accepted: false,
                requires_approval: false,
                step: TransferStep::SelectingToken,
            },
            balance: None,
            allowance: None,
            transfer: TransferSequencer::new(),
            receipt: None,
            failure: None,
        })
    }

    pub fn with_reserves(mut self, reserves: GasReserves) -> Self {
        self.reserves = reserves;
        self
    }

    pub fn with_challenge_period_hours(mut self, hours: u64) -> Self {
        self.challenge_period_hours = hours;
        self
    }

    pub fn intent(&self) -> &TransferIntent {
        &self.intent
    }

    pub fn step(&self) -> TransferStep {
        self.intent.step
    }

    pub fn balance(&self) -> Option<&BalanceSnapshot> {
        self.balance.as_ref()
    }

    pub fn allowance(&self) -> Option<&AllowanceSnapshot> {
        self.allowance.as_ref()
    }

    pub fn receipt(&self) -> Option<&TransferReceipt> {
        self.receipt.as_ref()
    }

    pub fn tokens(&self) -> &TokenRegistry {
        &self.tokens
    }

    pub fn chains(&self) -> &ChainRegistry {
        &self.chains
    }

    /// Register a runtime-resolved token so it can be selected
    pub fn register_token(&mut self, token: Token) -> Result<(), RegistryError> {
        self.tokens.register(token)
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Any edit returns the intent to `SelectingToken`. Nothing can be in
    /// flight here: submission holds the exclusive borrow, so an edit never
    /// cancels a pending chain call.
    fn reset_step(&mut self) {
        self.intent.step = TransferStep::SelectingToken;
        self.intent.requires_approval = false;
        self.receipt = None;
        self.failure = None;
    }

    pub fn set_amount(&mut self, text: &str) {
        self.intent.amount = text.trim().to_string();
        self.reset_step();
    }

    /// Select a token by symbol; it must exist and be usable on the chain
    /// the transfer executes on. Selecting clears the entered amount.
    pub fn select_token(&mut self, symbol: &str) -> Result<(), ValidationError> {
        let chain_id = self.chains.execution_chain(self.intent.direction).id;
        let token = self
            .tokens
            .by_symbol(symbol)
            .filter(|t| t.available_on(chain_id))
            .ok_or_else(|| ValidationError::TokenUnavailable {
                symbol: symbol.to_string(),
                chain_id,
            })?
            .clone();

        self.intent.token = token;
        self.intent.amount.clear();
        self.balance = None;
        self.allowance = None;
        self.reset_step();
        Ok(())
    }

    pub fn set_direction(&mut self, direction: Direction) {
        if self.intent.direction == direction {
            return;
        }
        self.intent.direction = direction;
        self.intent.amount.clear();
        self.balance = None;
        self.allowance = None;
        self.reset_step();
    }

    /// Swap the transfer direction, keeping the same token on both sides
    pub fn swap_direction(&mut self) {
        self.set_direction(self.intent.direction.flipped());
    }

    pub fn set_terms_accepted(&mut self, accepted: bool) {
        self.intent.terms_accepted = accepted;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Refresh the balance and allowance snapshots. Reads are idempotent
    /// and run concurrently; no ordering is required between them.
    pub async fn refresh(&mut self) -> Result<(), BridgeError> {
        let owner = self.gateway.account();
        let chain_id = self.chains.execution_chain(self.intent.direction).id;

        if self.intent.token.is_native {
            let amount = self.gateway.native_balance(chain_id, owner).await?;
            self.balance = Some(BalanceSnapshot {
                owner,
                chain_id,
                amount,
            });
            self.allowance = None;
            return Ok(());
        }

        let token = match self.intent.token.address_on(chain_id) {
            Some(address) => address,
            None => {
                // Unusable selection; validation reports it
                self.balance = None;
                self.allowance = None;
                return Ok(());
            }
        };
        let spender = self.chains.bridge_for(self.intent.direction);

        let (balance, allowance) = tokio::try_join!(
            self.gateway.token_balance(chain_id, token, owner),
            self.gateway.token_allowance(chain_id, token, owner, spender)
        )?;

        self.balance = Some(BalanceSnapshot {
            owner,
            chain_id,
            amount: balance,
        });
        self.allowance = Some(AllowanceSnapshot {
            owner,
            spender,
            token,
            chain_id,
            amount: allowance,
        });
        debug!(chain_id, balance = %balance, allowance = %allowance, "Snapshots refreshed");
        Ok(())
    }

    /// Validate the current input. Violations are inline messages that
    /// block submission, not errors; all are reported together. Balance
    /// comparison is exact smallest-unit arithmetic, never a formatted
    /// string.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut issues = Vec::new();
        let chain_id = self.chains.execution_chain(self.intent.direction).id;

        if !self.intent.token.available_on(chain_id) {
            issues.push(ValidationError::TokenUnavailable {
                symbol: self.intent.token.symbol.clone(),
                chain_id,
            });
        }

        match parse_amount(&self.intent.amount, self.intent.token.decimals) {
            Err(e) => issues.push(e),
            Ok(units) => {
                if let Some(balance) = &self.balance {
                    if units > max_spendable(balance.amount, self.gas_reserve()) {
                        issues.push(ValidationError::InsufficientBalance);
                    }
                }
            }
        }

        if !self.intent.terms_accepted {
            issues.push(ValidationError::TermsNotAccepted);
        }

        issues
    }

    fn gas_reserve(&self) -> U256 {
        if self.intent.token.is_native {
            self.reserves.for_direction(self.intent.direction)
        } else {
            U256::ZERO
        }
    }

    /// Largest enterable amount given the queried balance, as decimal text.
    /// `None` until a balance snapshot exists.
    pub fn max_amount(&self) -> Option<String> {
        let balance = self.balance.as_ref()?;
        let max = max_spendable(balance.amount, self.gas_reserve());
        Some(format_amount(max, self.intent.token.decimals))
    }

    /// The MAX button: fill the amount field from the balance
    pub fn apply_max(&mut self) -> Option<String> {
        let max = self.max_amount()?;
        self.set_amount(&max);
        Some(max)
    }

    /// Current action-button state
    pub fn action(&self) -> Action {
        match self.intent.step {
            TransferStep::Completed => return Action::Completed,
            TransferStep::Failed => return Action::Failed,
            _ => {}
        }

        let units = match parse_amount(&self.intent.amount, self.intent.token.decimals) {
            Ok(units) => units,
            Err(_) => return Action::EnterAmount,
        };
        if let Some(balance) = &self.balance {
            if units > max_spendable(balance.amount, self.gas_reserve()) {
                return Action::InsufficientBalance;
            }
        }
        if !self.intent.terms_accepted {
            return Action::AcceptTerms;
        }

        let needs_approval = !self.intent.token.is_native
            && self
                .allowance
                .as_ref()
                .map_or(true, |snapshot| snapshot.amount < units);
        if needs_approval {
            Action::Approve {
                symbol: self.intent.token.symbol.clone(),
            }
        } else {
            Action::Transfer {
                destination: self
                    .chains
                    .receiving_chain(self.intent.direction)
                    .name
                    .clone(),
            }
        }
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Run the transfer to completion: validate, make sure the wallet is on
    /// the execution chain, approve if the allowance falls short, then
    /// submit the transfer and wait for its confirmation.
    ///
    /// Step handling on failure: validation and provider-level failures
    /// leave the step where it was for retry; a failed approval leaves
    /// `AwaitingApproval`; a reverted transfer ends at `Failed`.
    pub async fn submit(&mut self) -> Result<TransferReceipt, BridgeError> {
        if self.intent.step.is_terminal() {
            return Err(BridgeError::provider(
                "transfer already finished; edit the form to start a new one",
            ));
        }

        self.refresh().await?;

        let issues = self.validate();
        if !issues.is_empty() {
            return Err(BridgeError::Validation(issues));
        }

        let direction = self.intent.direction;
        let token = self.intent.token.clone();
        let chain_id = self.chains.execution_chain(direction).id;
        let bridge = self.chains.bridge_for(direction);
        let owner = self.gateway.account();
        let units = parse_amount(&self.intent.amount, token.decimals)
            .map_err(|e| BridgeError::Validation(vec![e]))?;

        // The wallet must be on the chain the transfer executes on
        if self.gateway.active_chain_id().await? != chain_id {
            self.gateway.switch_chain(chain_id).await?;
        }

        // Approval leg, skipped entirely for the native asset
        let token_address = token.address_on(chain_id);
        if let Some(token_address) = token_address {
            let needs = self
                .allowance
                .as_ref()
                .map_or(true, |snapshot| snapshot.amount < units);
            self.intent.requires_approval = needs;

            if needs {
                self.intent.step = TransferStep::AwaitingApproval;
                let request = ApprovalRequest {
                    chain_id,
                    token: token_address,
                    owner,
                    spender: bridge,
                    required: units,
                };
                // Failure leaves the step at AwaitingApproval for retry
                let outcome = ApprovalSequencer::ensure(&self.gateway, &request).await?;
                self.allowance = Some(outcome.snapshot(&request));
            }
        } else {
            self.intent.requires_approval = false;
        }

        // Allowance confirmed (or not needed): the transfer may go out
        self.intent.step = TransferStep::AwaitingTransferConfirmation;
        let request = TransferRequest {
            direction,
            chain_id,
            bridge,
            token: token_address,
            amount: units,
        };

        match self.transfer.execute(&self.gateway, &request).await {
            Ok(tx_hash) => {
                self.intent.step = TransferStep::Completed;
                let receipt = TransferReceipt {
                    direction,
                    token_symbol: token.symbol.clone(),
                    amount: self.intent.amount.clone(),
                    tx_hash,
                    explorer_url: self.chains.execution_chain(direction).tx_url(tx_hash),
                    claim_notice: (direction == Direction::Withdraw)
                        .then(|| self.claim_notice()),
                };
                info!(
                    direction = %direction,
                    token = %token.symbol,
                    amount = %self.intent.amount,
                    tx_hash = %tx_hash,
                    "Transfer completed"
                );
                self.receipt = Some(receipt.clone());
                Ok(receipt)
            }
            Err(e) => {
                if e.is_provider() {
                    // Wallet rejection or transport trouble: retryable, the
                    // step is preserved
                } else {
                    self.intent.step = TransferStep::Failed;
                    self.failure = Some(e.to_string());
                }
                Err(e)
            }
        }
    }

    fn claim_notice(&self) -> String {
        format!(
            "Withdrawal confirmed on {}. Funds require a separate claim on {} after the \
             ~{}h challenge period and are not immediately available.",
            self.chains.l2().name,
            self.chains.l1().name,
            self.challenge_period_hours
        )
    }

    /// User-visible outcome text for a finished intent
    pub fn completion_message(&self) -> Option<String> {
        match self.intent.step {
            TransferStep::Completed => {
                let receipt = self.receipt.as_ref()?;
                match receipt.claim_notice {
                    Some(ref notice) => Some(notice.clone()),
                    None => Some(format!(
                        "Deposited {} {} toward {}. Funds arrive once the bridge \
                         finalizes the deposit.",
                        receipt.amount,
                        receipt.token_symbol,
                        self.chains.receiving_chain(receipt.direction).name
                    )),
                }
            }
            TransferStep::Failed => self.failure.clone(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Chain, GOODNET_CHAIN_ID, SEPOLIA_CHAIN_ID};
    use crate::testing::{GatewayCall, MockGateway, TEST_ACCOUNT};
    use alloy::primitives::{address, Address};

    const L1_BRIDGE: Address = address!("00000000000000000000000000000000000000b1");
    const L2_BRIDGE: Address = address!("00000000000000000000000000000000000000b2");
    const USDT: Address = address!("7169D38820dfd117C3FA1f22a697dba58d90BA06");

    fn chains() -> ChainRegistry {
        ChainRegistry::new(
            Chain {
                id: SEPOLIA_CHAIN_ID,
                name: "Sepolia".to_string(),
                rpc_url: "http://localhost:8545".to_string(),
                explorer_url: "https://sepolia.etherscan.io".to_string(),
                native_symbol: "ETH".to_string(),
            },
            Chain {
                id: GOODNET_CHAIN_ID,
                name: "GoodNet Testnet".to_string(),
                rpc_url: "http://localhost:8546".to_string(),
                explorer_url: "https://testnet-scan.dexgood.com".to_string(),
                native_symbol: "TDXG".to_string(),
            },
            L1_BRIDGE,
            L2_BRIDGE,
        )
        .unwrap()
    }

    fn eth(text: &str) -> U256 {
        parse_amount(text, 18).unwrap()
    }

    fn deposit_form(gateway: MockGateway) -> TransferForm<MockGateway> {
        gateway.add_chain(GOODNET_CHAIN_ID);
        TransferForm::new(
            gateway,
            chains(),
            TokenRegistry::goodnet_defaults(),
            Direction::Deposit,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_native_deposit_never_approves() {
        let gateway = MockGateway::new(SEPOLIA_CHAIN_ID);
        gateway.set_native_balance(SEPOLIA_CHAIN_ID, TEST_ACCOUNT, eth("1"));
        let mut form = deposit_form(gateway.clone());

        form.set_amount("0.5");
        form.set_terms_accepted(true);
        let receipt = form.submit().await.unwrap();

        assert_eq!(form.step(), TransferStep::Completed);
        assert!(!form.intent().requires_approval);
        assert!(receipt.claim_notice.is_none());
        assert!(gateway.approvals_submitted().is_empty());
        assert_eq!(
            gateway.writes(),
            vec![GatewayCall::DepositNative {
                chain_id: SEPOLIA_CHAIN_ID,
                bridge: L1_BRIDGE,
                amount: eth("0.5"),
            }]
        );
    }

    #[tokio::test]
    async fn test_sufficient_allowance_skips_approval() {
        let gateway = MockGateway::new(SEPOLIA_CHAIN_ID);
        gateway.set_token_balance(SEPOLIA_CHAIN_ID, USDT, TEST_ACCOUNT, U256::from(500_000_000u64));
        gateway.set_allowance(
            SEPOLIA_CHAIN_ID,
            USDT,
            TEST_ACCOUNT,
            L1_BRIDGE,
            U256::from(100_000_000u64),
        );
        let mut form = deposit_form(gateway.clone());

        form.select_token("USDT").unwrap();
        form.set_amount("100");
        form.set_terms_accepted(true);
        form.submit().await.unwrap();

        assert_eq!(form.step(), TransferStep::Completed);
        assert!(!form.intent().requires_approval);
        assert!(gateway.approvals_submitted().is_empty());
    }

    #[tokio::test]
    async fn test_short_allowance_approves_then_transfers() {
        let gateway = MockGateway::new(SEPOLIA_CHAIN_ID);
        gateway.set_token_balance(SEPOLIA_CHAIN_ID, USDT, TEST_ACCOUNT, U256::from(500_000_000u64));
        // Allowance 50, requested 100 (USDT has 6 decimals)
        gateway.set_allowance(
            SEPOLIA_CHAIN_ID,
            USDT,
            TEST_ACCOUNT,
            L1_BRIDGE,
            U256::from(50_000_000u64),
        );
        let mut form = deposit_form(gateway.clone());

        form.select_token("USDT").unwrap();
        form.set_amount("100");
        form.set_terms_accepted(true);
        form.submit().await.unwrap();

        assert_eq!(form.step(), TransferStep::Completed);
        assert!(form.intent().requires_approval);

        let approvals = gateway.approvals_submitted();
        assert_eq!(approvals.len(), 1);
        assert_eq!(approvals[0].amount, U256::from(100_000_000u64));
        assert_eq!(approvals[0].spender, L1_BRIDGE);

        // Approval confirmation happened before the transfer went out
        assert_eq!(
            gateway.writes().last().unwrap(),
            &GatewayCall::DepositToken {
                chain_id: SEPOLIA_CHAIN_ID,
                bridge: L1_BRIDGE,
                token: USDT,
                amount: U256::from(100_000_000u64),
            }
        );
    }

    #[tokio::test]
    async fn test_insufficient_balance_blocks_regardless_of_terms() {
        let gateway = MockGateway::new(SEPOLIA_CHAIN_ID);
        gateway.set_native_balance(SEPOLIA_CHAIN_ID, TEST_ACCOUNT, eth("1"));
        let mut form = deposit_form(gateway);

        form.set_amount("2");
        for accepted in [false, true] {
            form.set_terms_accepted(accepted);
            let err = form.submit().await.unwrap_err();
            match err {
                BridgeError::Validation(issues) => {
                    assert!(issues.contains(&ValidationError::InsufficientBalance));
                }
                other => panic!("expected validation error, got {:?}", other),
            }
            assert_eq!(form.step(), TransferStep::SelectingToken);
        }
    }

    #[tokio::test]
    async fn test_native_balance_check_honors_gas_reserve() {
        let gateway = MockGateway::new(SEPOLIA_CHAIN_ID);
        gateway.set_native_balance(SEPOLIA_CHAIN_ID, TEST_ACCOUNT, eth("1"));
        let mut form = deposit_form(gateway);

        // 0.995 fits the balance but not balance minus the 0.01 reserve
        form.set_amount("0.995");
        form.set_terms_accepted(true);
        let err = form.submit().await.unwrap_err();
        assert!(matches!(err, BridgeError::Validation(ref issues)
            if issues.contains(&ValidationError::InsufficientBalance)));
    }

    #[tokio::test]
    async fn test_terms_must_be_accepted() {
        let gateway = MockGateway::new(SEPOLIA_CHAIN_ID);
        gateway.set_native_balance(SEPOLIA_CHAIN_ID, TEST_ACCOUNT, eth("1"));
        let mut form = deposit_form(gateway.clone());

        form.set_amount("0.5");
        let err = form.submit().await.unwrap_err();
        assert!(matches!(err, BridgeError::Validation(ref issues)
            if issues.contains(&ValidationError::TermsNotAccepted)));
        assert!(gateway.writes().is_empty());
    }

    #[tokio::test]
    async fn test_max_amount_reserves_gas() {
        let gateway = MockGateway::new(SEPOLIA_CHAIN_ID);
        gateway.set_native_balance(SEPOLIA_CHAIN_ID, TEST_ACCOUNT, eth("1"));
        let mut form = deposit_form(gateway);

        form.refresh().await.unwrap();
        assert_eq!(form.max_amount().unwrap(), "0.99");
        assert_eq!(form.apply_max().unwrap(), "0.99");
        assert_eq!(form.intent().amount, "0.99");
    }

    #[tokio::test]
    async fn test_erc20_max_uses_full_balance() {
        let gateway = MockGateway::new(SEPOLIA_CHAIN_ID);
        gateway.set_token_balance(SEPOLIA_CHAIN_ID, USDT, TEST_ACCOUNT, U256::from(250_000_000u64));
        let mut form = deposit_form(gateway);

        form.select_token("USDT").unwrap();
        form.refresh().await.unwrap();
        assert_eq!(form.max_amount().unwrap(), "250");
    }

    #[tokio::test]
    async fn test_failed_approval_stays_retryable() {
        let gateway = MockGateway::new(SEPOLIA_CHAIN_ID);
        gateway.set_token_balance(SEPOLIA_CHAIN_ID, USDT, TEST_ACCOUNT, U256::from(500_000_000u64));
        let mut form = deposit_form(gateway.clone());

        form.select_token("USDT").unwrap();
        form.set_amount("100");
        form.set_terms_accepted(true);

        // First attempt: the approval transaction reverts
        gateway.revert_next_write();
        let err = form.submit().await.unwrap_err();
        assert!(matches!(err, BridgeError::ContractCall { .. }));
        assert_eq!(form.step(), TransferStep::AwaitingApproval);

        // Retry from the same intent succeeds
        form.submit().await.unwrap();
        assert_eq!(form.step(), TransferStep::Completed);
    }

    #[tokio::test]
    async fn test_edit_resets_step_without_touching_the_chain() {
        let gateway = MockGateway::new(SEPOLIA_CHAIN_ID);
        gateway.set_token_balance(SEPOLIA_CHAIN_ID, USDT, TEST_ACCOUNT, U256::from(500_000_000u64));
        let mut form = deposit_form(gateway.clone());

        form.select_token("USDT").unwrap();
        form.set_amount("100");
        form.set_terms_accepted(true);
        gateway.revert_next_write();
        let _ = form.submit().await.unwrap_err();
        assert_eq!(form.step(), TransferStep::AwaitingApproval);

        let writes_before = gateway.writes().len();
        form.set_amount("50");
        assert_eq!(form.step(), TransferStep::SelectingToken);
        assert_eq!(gateway.writes().len(), writes_before);
    }

    #[tokio::test]
    async fn test_withdrawal_reports_claim_notice() {
        let gateway = MockGateway::new(GOODNET_CHAIN_ID);
        gateway.add_chain(SEPOLIA_CHAIN_ID);
        gateway.set_native_balance(GOODNET_CHAIN_ID, TEST_ACCOUNT, eth("1"));
        let mut form = TransferForm::new(
            gateway.clone(),
            chains(),
            TokenRegistry::goodnet_defaults(),
            Direction::Withdraw,
        )
        .unwrap();

        form.set_amount("0.5");
        form.set_terms_accepted(true);
        let receipt = form.submit().await.unwrap();

        assert_eq!(form.step(), TransferStep::Completed);
        let notice = receipt.claim_notice.unwrap();
        assert!(notice.contains("claim"));
        assert!(notice.contains("not immediately available"));
        assert_eq!(form.completion_message().unwrap(), notice);
        assert_eq!(
            gateway.writes(),
            vec![GatewayCall::WithdrawNative {
                chain_id: GOODNET_CHAIN_ID,
                bridge: L2_BRIDGE,
                amount: eth("0.5"),
            }]
        );
    }

    #[tokio::test]
    async fn test_submission_switches_to_the_execution_chain() {
        // Wallet starts on L2; a deposit must run on L1
        let gateway = MockGateway::new(GOODNET_CHAIN_ID);
        gateway.add_chain(SEPOLIA_CHAIN_ID);
        gateway.set_native_balance(SEPOLIA_CHAIN_ID, TEST_ACCOUNT, eth("1"));
        let mut form = TransferForm::new(
            gateway.clone(),
            chains(),
            TokenRegistry::goodnet_defaults(),
            Direction::Deposit,
        )
        .unwrap();

        form.set_amount("0.5");
        form.set_terms_accepted(true);
        form.submit().await.unwrap();

        assert_eq!(gateway.switches(), vec![SEPOLIA_CHAIN_ID]);
    }

    #[tokio::test]
    async fn test_provider_rejection_preserves_the_step() {
        let gateway = MockGateway::new(SEPOLIA_CHAIN_ID);
        gateway.set_native_balance(SEPOLIA_CHAIN_ID, TEST_ACCOUNT, eth("1"));
        let mut form = deposit_form(gateway.clone());

        form.set_amount("0.5");
        form.set_terms_accepted(true);
        gateway.reject_next_write();
        let err = form.submit().await.unwrap_err();

        assert!(err.is_provider());
        assert_eq!(form.step(), TransferStep::AwaitingTransferConfirmation);

        // Retry completes
        form.submit().await.unwrap();
        assert_eq!(form.step(), TransferStep::Completed);
    }

    #[tokio::test]
    async fn test_action_states() {
        let gateway = MockGateway::new(SEPOLIA_CHAIN_ID);
        gateway.set_token_balance(SEPOLIA_CHAIN_ID, USDT, TEST_ACCOUNT, U256::from(500_000_000u64));
        gateway.set_allowance(
            SEPOLIA_CHAIN_ID,
            USDT,
            TEST_ACCOUNT,
            L1_BRIDGE,
            U256::from(50_000_000u64),
        );
        let mut form = deposit_form(gateway);

        assert_eq!(form.action(), Action::EnterAmount);

        form.select_token("USDT").unwrap();
        form.refresh().await.unwrap();
        form.set_amount("1000");
        assert_eq!(form.action(), Action::InsufficientBalance);

        form.set_amount("100");
        assert_eq!(form.action(), Action::AcceptTerms);

        form.set_terms_accepted(true);
        assert_eq!(
            form.action(),
            Action::Approve {
                symbol: "USDT".to_string()
            }
        );

        form.set_amount("25");
        assert_eq!(
            form.action(),
            Action::Transfer {
                destination: "GoodNet Testnet".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_swap_direction_keeps_the_token() {
        let gateway = MockGateway::new(SEPOLIA_CHAIN_ID);
        let mut form = deposit_form(gateway);

        form.set_amount("0.5");
        form.swap_direction();

        assert_eq!(form.intent().direction, Direction::Withdraw);
        assert_eq!(form.intent().token.symbol, "ETH");
        assert!(form.intent().amount.is_empty());
        assert_eq!(form.step(), TransferStep::SelectingToken);
    }

    #[tokio::test]
    async fn test_token_unavailable_on_withdraw_side() {
        let gateway = MockGateway::new(GOODNET_CHAIN_ID);
        let mut form = TransferForm::new(
            gateway,
            chains(),
            TokenRegistry::goodnet_defaults(),
            Direction::Withdraw,
        )
        .unwrap();

        // USDT has no GoodNet address, so it cannot be selected on L2
        let err = form.select_token("USDT").unwrap_err();
        assert!(matches!(err, ValidationError::TokenUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_completed_intent_requires_an_edit_to_resubmit() {
        let gateway = MockGateway::new(SEPOLIA_CHAIN_ID);
        gateway.set_native_balance(SEPOLIA_CHAIN_ID, TEST_ACCOUNT, eth("1"));
        let mut form = deposit_form(gateway.clone());

        form.set_amount("0.5");
        form.set_terms_accepted(true);
        form.submit().await.unwrap();

        let err = form.submit().await.unwrap_err();
        assert!(err.is_provider());
        assert_eq!(gateway.writes().len(), 1);

        form.set_amount("0.25");
        form.submit().await.unwrap();
        assert_eq!(gateway.writes().len(), 2);
    }
}
