//! GoodBridge Core: Client-Side Sequencing for the GoodNet Token Bridge
//!
//! This crate implements the client half of an L1/L2 token bridge:
//!
//! - **Registries** - immutable token and chain configuration, extendable at
//!   runtime by resolving an arbitrary ERC-20 contract address
//! - **Amount Codec** - exact decimal-text to smallest-unit conversion
//! - **Gateway** - the wallet/provider and chain-read boundary, implemented
//!   over alloy and mockable for tests
//! - **Sequencers** - the approve-then-transfer transaction flow with
//!   confirmation tracking
//! - **Form** - the transfer form controller, a state machine over the
//!   single per-session transfer intent
//!
//! The bridge contracts themselves, settlement, and cross-chain relaying are
//! external collaborators; this crate only calls them.

pub mod amount;
pub mod contracts;
pub mod error;
pub mod fees;
pub mod form;
pub mod gateway;
pub mod registry;
pub mod sequencer;
pub mod types;

// Testing utilities (in-crate tests, or downstream via the `testing` feature)
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used items at the crate root
pub use amount::{format_amount, format_amount_display, max_spendable, parse_amount};
pub use error::{BridgeError, CallKind, Field, ReadField, ValidationError};
pub use fees::{FeeQuote, FeeSchedule};
pub use form::{Action, GasReserves, TransferForm, TransferIntent};
pub use gateway::{ChainGateway, EvmGateway};
pub use registry::{
    resolve_token, Chain, ChainRegistry, RegistryError, Token, TokenRegistry, GOODNET_CHAIN_ID,
    SEPOLIA_CHAIN_ID,
};
pub use sequencer::{ApprovalOutcome, ApprovalRequest, ApprovalSequencer, TransferRequest, TransferSequencer};
pub use types::{
    AllowanceSnapshot, BalanceSnapshot, Direction, TokenMetadata, TransferPhase, TransferReceipt,
    TransferStep, TxStatus,
};
