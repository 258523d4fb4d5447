//! Error types for the packet ledger

use crate::types::{Amount, PacketId, UserId};
use thiserror::Error;

/// Result type for packet ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Packet ledger errors.
///
/// Every variant is a local, synchronous, non-retryable rejection of a single
/// operation; no error leaves state partially mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Identity has not passed the external proof check
    #[error("identity not verified: {0}")]
    NotVerified(UserId),

    /// Identity was already verified; verification happens exactly once
    #[error("identity already verified: {0}")]
    AlreadyVerified(UserId),

    /// Amount failed basic validation (zero deposit)
    #[error("invalid amount: {0}")]
    InvalidAmount(Amount),

    /// Balance too small for the requested debit
    #[error("insufficient balance: have {available}, need {required}")]
    InsufficientBalance {
        /// Current spendable balance
        available: Amount,
        /// Amount the operation required
        required: Amount,
    },

    /// A checked addition overflowed
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// A checked subtraction underflowed
    #[error("arithmetic underflow")]
    ArithmeticUnderflow,

    /// Packet amount below the configured minimum
    #[error("amount {amount} below minimum packet amount {minimum}")]
    BelowMinimum {
        /// Requested packet amount
        amount: Amount,
        /// Configured minimum
        minimum: Amount,
    },

    /// Recipient limit outside the allowed range
    #[error("invalid recipient count: {0}")]
    InvalidRecipientCount(u32),

    /// No packet with the given id
    #[error("packet not found: {0}")]
    PacketNotFound(PacketId),

    /// Packet pool is drained
    #[error("packet exhausted: {0}")]
    PacketExhausted(PacketId),

    /// Identity already claimed from this packet
    #[error("identity {user} already claimed from packet {packet}")]
    AlreadyClaimed {
        /// Claiming identity
        user: UserId,
        /// Target packet
        packet: PacketId,
    },

    /// All recipient slots are taken
    #[error("recipient limit reached for packet {0}")]
    RecipientLimitReached(PacketId),

    /// Computed claim amount exceeds the packet remainder
    #[error("claim amount {claimed} exceeds remainder {remaining}")]
    ClaimExceedsRemainder {
        /// Computed claim amount
        claimed: Amount,
        /// Remaining escrowed amount
        remaining: Amount,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InsufficientBalance {
            available: 10,
            required: 25,
        };
        assert_eq!(err.to_string(), "insufficient balance: have 10, need 25");

        let err = Error::NotVerified(UserId::new("mallory"));
        assert!(err.to_string().contains("mallory"));
    }
}
