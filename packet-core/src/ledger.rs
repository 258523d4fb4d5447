//! Custodial balance ledger
//!
//! Holds each identity's spendable balance in smallest indivisible units.
//! Every mutation runs under the identity's map entry lock, so balance
//! operations on the same identity serialize while different identities
//! proceed in parallel. All arithmetic is checked; nothing wraps.

use crate::types::{Amount, UserId};
use crate::{Error, Result};
use dashmap::DashMap;

/// System of record for per-identity spendable balances
#[derive(Debug, Default)]
pub struct Ledger {
    balances: DashMap<UserId, Amount>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a deposit to an identity's balance.
    ///
    /// Deposits are allowed before identity verification. Returns the new
    /// balance.
    pub fn deposit(&self, user: &UserId, amount: Amount) -> Result<Amount> {
        if amount == 0 {
            return Err(Error::InvalidAmount(amount));
        }
        let mut entry = self.balances.entry(user.clone()).or_insert(0);
        let new_balance = entry.checked_add(amount).ok_or(Error::ArithmeticOverflow)?;
        *entry = new_balance;
        tracing::debug!(user = %user, amount, balance = new_balance, "deposit");
        Ok(new_balance)
    }

    /// Remove value from an identity's balance, failing if the balance is
    /// insufficient. Returns the new balance.
    pub fn debit(&self, user: &UserId, amount: Amount) -> Result<Amount> {
        let mut entry = self.balances.entry(user.clone()).or_insert(0);
        let available = *entry;
        if available < amount {
            return Err(Error::InsufficientBalance {
                available,
                required: amount,
            });
        }
        let new_balance = available
            .checked_sub(amount)
            .ok_or(Error::ArithmeticUnderflow)?;
        *entry = new_balance;
        tracing::debug!(user = %user, amount, balance = new_balance, "debit");
        Ok(new_balance)
    }

    /// Pay out value to an identity. Used by the packet engine when settling
    /// claims; not a deposit (no event of its own).
    pub(crate) fn credit(&self, user: &UserId, amount: Amount) -> Result<Amount> {
        let mut entry = self.balances.entry(user.clone()).or_insert(0);
        let new_balance = entry.checked_add(amount).ok_or(Error::ArithmeticOverflow)?;
        *entry = new_balance;
        tracing::debug!(user = %user, amount, balance = new_balance, "credit");
        Ok(new_balance)
    }

    /// Pure read; unknown identities hold zero
    pub fn balance_of(&self, user: &UserId) -> Amount {
        self.balances.get(user).map(|b| *b).unwrap_or(0)
    }

    /// Sum of all balances, for conservation audits
    pub fn total_balance(&self) -> Result<Amount> {
        let mut total: Amount = 0;
        for entry in self.balances.iter() {
            total = total.checked_add(*entry).ok_or(Error::ArithmeticOverflow)?;
        }
        Ok(total)
    }
}
