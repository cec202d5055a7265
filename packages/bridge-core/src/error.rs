//! Error taxonomy for the bridge client
//!
//! Every failure is scoped to the step that produced it and recoverable by
//! user retry or by editing the intent; nothing here is fatal to the session.

use std::fmt;
use thiserror::Error;

/// Form field a validation issue belongs to, for inline rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Amount,
    Token,
    Terms,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Amount => "amount",
            Field::Token => "token",
            Field::Terms => "terms",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Malformed or out-of-range user input.
///
/// Blocks submission and is surfaced as an inline message, never an
/// exception path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount must be a positive number")]
    AmountNotPositive,

    #[error("amount is not a valid decimal number")]
    AmountMalformed,

    #[error("amount has more than {max} decimal places")]
    TooManyDecimals { max: u8 },

    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("terms and conditions must be accepted")]
    TermsNotAccepted,

    #[error("token {symbol} is not available on chain {chain_id}")]
    TokenUnavailable { symbol: String, chain_id: u64 },
}

impl ValidationError {
    /// The form field this issue should be rendered next to
    pub fn field(&self) -> Field {
        match self {
            ValidationError::AmountNotPositive
            | ValidationError::AmountMalformed
            | ValidationError::TooManyDecimals { .. }
            | ValidationError::InsufficientBalance => Field::Amount,
            ValidationError::TermsNotAccepted => Field::Terms,
            ValidationError::TokenUnavailable { .. } => Field::Token,
        }
    }
}

/// The specific read a `ContractRead` failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadField {
    NativeBalance,
    TokenBalance,
    Allowance,
    TokenName,
    TokenSymbol,
    TokenDecimals,
}

impl ReadField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadField::NativeBalance => "native balance",
            ReadField::TokenBalance => "token balance",
            ReadField::Allowance => "allowance",
            ReadField::TokenName => "token name",
            ReadField::TokenSymbol => "token symbol",
            ReadField::TokenDecimals => "token decimals",
        }
    }
}

impl fmt::Display for ReadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of state-changing call a `ContractCall` failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Approve,
    Deposit,
    Withdraw,
}

impl CallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::Approve => "approve",
            CallKind::Deposit => "deposit",
            CallKind::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors produced by the bridge client
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    /// User input blocked submission; all issues are reported together,
    /// each tagged with the field it belongs to.
    #[error("validation failed ({} issue(s))", .0.len())]
    Validation(Vec<ValidationError>),

    /// Wallet rejection, wrong or unknown chain, or a cancelled signature
    /// request. Transient; the intent stays at its current step for retry.
    #[error("provider error: {message}")]
    Provider { message: String },

    /// A read-only query failed. Names the specific field so the caller can
    /// offer a targeted manual retry.
    #[error("failed to read {field}: {message}")]
    ContractRead { field: ReadField, message: String },

    /// An approval or transfer transaction reverted or failed to confirm.
    /// The intent stays at its step.
    #[error("{kind} transaction failed: {message}")]
    ContractCall { kind: CallKind, message: String },
}

impl BridgeError {
    pub fn provider(message: impl fmt::Display) -> Self {
        BridgeError::Provider {
            message: message.to_string(),
        }
    }

    pub fn read(field: ReadField, message: impl fmt::Display) -> Self {
        BridgeError::ContractRead {
            field,
            message: message.to_string(),
        }
    }

    pub fn call(kind: CallKind, message: impl fmt::Display) -> Self {
        BridgeError::ContractCall {
            kind,
            message: message.to_string(),
        }
    }

    /// Whether the error is a provider-level (wallet/transport) failure
    pub fn is_provider(&self) -> bool {
        matches!(self, BridgeError::Provider { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_fields() {
        assert_eq!(ValidationError::AmountNotPositive.field(), Field::Amount);
        assert_eq!(ValidationError::InsufficientBalance.field(), Field::Amount);
        assert_eq!(ValidationError::TermsNotAccepted.field(), Field::Terms);
        assert_eq!(
            ValidationError::TokenUnavailable {
                symbol: "USDT".to_string(),
                chain_id: 1,
            }
            .field(),
            Field::Token
        );
    }

    #[test]
    fn test_validation_messages() {
        let err = ValidationError::TooManyDecimals { max: 6 };
        assert_eq!(err.to_string(), "amount has more than 6 decimal places");

        let err = ValidationError::InsufficientBalance;
        assert_eq!(err.to_string(), "insufficient balance");
    }

    #[test]
    fn test_bridge_error_display() {
        let err = BridgeError::read(ReadField::Allowance, "connection refused");
        assert_eq!(
            err.to_string(),
            "failed to read allowance: connection refused"
        );

        let err = BridgeError::call(CallKind::Approve, "execution reverted");
        assert_eq!(err.to_string(), "approve transaction failed: execution reverted");
    }

    #[test]
    fn test_is_provider() {
        assert!(BridgeError::provider("user rejected").is_provider());
        assert!(!BridgeError::Validation(vec![]).is_provider());
    }
}
