use timevault_core::{TimevaultError, TimevaultResult};

/// Per-principal bookkeeping: a spendable balance plus the amount the
/// custodian is still authorised to pull from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Account {
    pub balance: u64,
    pub authorized: u64,
}

impl Account {
    /// Credit the spendable balance.
    pub fn credit(&mut self, amount: u64) -> TimevaultResult<()> {
        self.balance = self.balance.checked_add(amount).ok_or_else(|| {
            TimevaultError::TransferFailed("account balance overflow".to_string())
        })?;
        Ok(())
    }

    /// Debit the spendable balance and consume the matching authorisation.
    /// Refuses when either side falls short, touching nothing on failure.
    pub fn debit_authorized(&mut self, amount: u64) -> TimevaultResult<()> {
        if self.authorized < amount {
            return Err(TimevaultError::TransferFailed(format!(
                "authorized {} is less than requested {}",
                self.authorized, amount
            )));
        }
        if self.balance < amount {
            return Err(TimevaultError::TransferFailed(format!(
                "balance {} is less than requested {}",
                self.balance, amount
            )));
        }
        self.balance -= amount;
        self.authorized -= amount;
        Ok(())
    }
}
