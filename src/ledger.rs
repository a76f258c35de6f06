//! Bank accounts: balances, audit history, transfers.
//!
//! Every balance-changing operation appends a [`Transaction`] to the
//! account's history before the store is persisted, so the document never
//! shows a balance the history cannot explain.

use crate::error::{KardexError, Result};
use crate::key::RecordKey;
use crate::model::{required_text, Record};
use crate::store::{RecordStore, StoreBackend};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const LEDGER_FILENAME: &str = "ledger.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Open,
    Deposit,
    Withdrawal,
    TransferIn,
    TransferOut,
}

/// Immutable audit entry for one balance change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub balance_after: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub number: RecordKey,
    pub holder: String,
    pub balance: Decimal,
    #[serde(default)]
    pub history: Vec<Transaction>,
}

impl Account {
    pub fn new(number: &str, holder: &str, balance: Decimal) -> Result<Self> {
        Ok(Self {
            number: RecordKey::new(number)?,
            holder: required_text("holder", holder)?,
            balance,
            history: Vec::new(),
        })
    }

    fn record(&mut self, kind: TransactionKind, amount: Decimal) {
        self.history.push(Transaction {
            id: Uuid::new_v4(),
            kind,
            amount,
            timestamp: Utc::now(),
            balance_after: self.balance,
        });
    }
}

impl Record for Account {
    fn key(&self) -> &RecordKey {
        &self.number
    }

    fn sort_key(&self) -> String {
        self.holder.to_lowercase()
    }

    fn validate(&self) -> Result<()> {
        if self.holder.trim().is_empty() {
            return Err(KardexError::validation("holder", "must not be blank"));
        }
        if self.balance < Decimal::ZERO {
            return Err(KardexError::validation("balance", "must not be negative"));
        }
        Ok(())
    }
}

/// The bank: a keyed store of accounts plus the money-movement rules.
pub struct Ledger<B: StoreBackend<Account>> {
    store: RecordStore<Account, B>,
    minimum_opening_balance: Decimal,
}

impl<B: StoreBackend<Account>> Ledger<B> {
    pub fn open(backend: B, minimum_opening_balance: Decimal) -> Result<Self> {
        Ok(Self {
            store: RecordStore::open(backend)?,
            minimum_opening_balance,
        })
    }

    /// Open a new account. A non-zero opening balance is recorded in the
    /// history as the first entry.
    pub fn open_account(
        &mut self,
        number: &str,
        holder: &str,
        opening_balance: Decimal,
    ) -> Result<RecordKey> {
        if opening_balance < self.minimum_opening_balance {
            return Err(KardexError::validation(
                "opening_balance",
                format!("must be at least {}", self.minimum_opening_balance),
            ));
        }
        let mut account = Account::new(number, holder, opening_balance)?;
        if opening_balance > Decimal::ZERO {
            account.record(TransactionKind::Open, opening_balance);
        }
        let key = account.number.clone();
        self.store.add(account)?;
        Ok(key)
    }

    pub fn close_account(&mut self, number: &str) -> Result<Account> {
        self.store.remove(&RecordKey::new(number)?)
    }

    pub fn rename_holder(&mut self, number: &str, holder: &str) -> Result<()> {
        let key = RecordKey::new(number)?;
        let holder = required_text("holder", holder)?;
        self.store.update(&key, |account| account.holder = holder)
    }

    pub fn account(&self, number: &str) -> Result<&Account> {
        self.store.get(&RecordKey::new(number)?)
    }

    pub fn balance(&self, number: &str) -> Result<Decimal> {
        Ok(self.account(number)?.balance)
    }

    pub fn history(&self, number: &str) -> Result<&[Transaction]> {
        Ok(&self.account(number)?.history)
    }

    /// Add `amount` to the account. Returns the new balance.
    pub fn deposit(&mut self, number: &str, amount: Decimal) -> Result<Decimal> {
        let key = RecordKey::new(number)?;
        ensure_positive(amount)?;
        self.store.update(&key, |account| {
            account.balance += amount;
            account.record(TransactionKind::Deposit, amount);
        })?;
        Ok(self.store.get(&key)?.balance)
    }

    /// Take `amount` from the account. Rejected when it exceeds the current
    /// balance; the balance is unchanged on rejection.
    pub fn withdraw(&mut self, number: &str, amount: Decimal) -> Result<Decimal> {
        let key = RecordKey::new(number)?;
        ensure_positive(amount)?;
        let account = self.store.get(&key)?;
        if amount > account.balance {
            return Err(KardexError::validation(
                "amount",
                format!("exceeds current balance of {}", account.balance),
            ));
        }
        self.store.update(&key, |account| {
            account.balance -= amount;
            account.record(TransactionKind::Withdrawal, amount);
        })?;
        Ok(self.store.get(&key)?.balance)
    }

    /// Move `amount` between two accounts as one committed step.
    ///
    /// Both accounts are resolved and the source balance checked before
    /// anything changes, and the document is written once, so a failed
    /// transfer leaves both balances exactly as they were.
    pub fn transfer(&mut self, source: &str, destination: &str, amount: Decimal) -> Result<()> {
        let source = RecordKey::new(source)?;
        let destination = RecordKey::new(destination)?;
        if source == destination {
            return Err(KardexError::validation(
                "destination",
                "cannot transfer to the same account",
            ));
        }
        ensure_positive(amount)?;
        self.store.get(&destination)?;
        let from = self.store.get(&source)?;
        if amount > from.balance {
            return Err(KardexError::validation(
                "amount",
                format!("exceeds current balance of {}", from.balance),
            ));
        }
        self.store.update_pair(&source, &destination, |from, to| {
            from.balance -= amount;
            from.record(TransactionKind::TransferOut, amount);
            to.balance += amount;
            to.record(TransactionKind::TransferIn, amount);
        })
    }

    /// All accounts, ordered by holder name.
    pub fn accounts(&self) -> Vec<&Account> {
        self.store.list()
    }

    /// Sum of all balances; zero for an empty ledger.
    pub fn total_assets(&self) -> Decimal {
        self.store
            .aggregate(Decimal::ZERO, |total, account| total + account.balance)
    }

    pub fn account_count(&self) -> usize {
        self.store.len()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.store.flush()
    }
}

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(KardexError::validation("amount", "must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryBackend;
    use rust_decimal_macros::dec;

    fn ledger() -> Ledger<MemoryBackend<Account>> {
        Ledger::open(MemoryBackend::new(), Decimal::ZERO).unwrap()
    }

    #[test]
    fn open_account_then_find_it() {
        let mut ledger = ledger();
        ledger.open_account("A01", "Awa Diallo", dec!(100)).unwrap();

        let account = ledger.account("a01").unwrap();
        assert_eq!(account.holder, "Awa Diallo");
        assert_eq!(account.balance, dec!(100));
    }

    #[test]
    fn duplicate_account_number_is_rejected() {
        let mut ledger = ledger();
        ledger.open_account("A01", "Awa Diallo", dec!(100)).unwrap();

        let err = ledger.open_account(" a01 ", "Moussa Ba", dec!(50)).unwrap_err();
        assert!(matches!(err, KardexError::DuplicateKey(_)));
        assert_eq!(ledger.account_count(), 1);
    }

    #[test]
    fn opening_balance_below_the_floor_is_rejected() {
        let mut ledger = Ledger::open(MemoryBackend::new(), dec!(500)).unwrap();
        let err = ledger.open_account("A01", "Awa Diallo", dec!(100)).unwrap_err();
        assert!(matches!(err, KardexError::Validation { .. }));
        assert_eq!(ledger.account_count(), 0);
    }

    #[test]
    fn non_zero_opening_balance_is_audited() {
        let mut ledger = ledger();
        ledger.open_account("A01", "Awa Diallo", dec!(100)).unwrap();

        let history = ledger.history("A01").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, TransactionKind::Open);
        assert_eq!(history[0].balance_after, dec!(100));
    }

    #[test]
    fn deposit_grows_the_balance_and_appends_an_entry() {
        let mut ledger = ledger();
        ledger.open_account("A01", "Awa Diallo", dec!(100)).unwrap();

        let balance = ledger.deposit("A01", dec!(50)).unwrap();
        assert_eq!(balance, dec!(150));

        let history = ledger.history("A01").unwrap();
        let last = history.last().unwrap();
        assert_eq!(last.kind, TransactionKind::Deposit);
        assert_eq!(last.amount, dec!(50));
        assert_eq!(last.balance_after, dec!(150));
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let mut ledger = ledger();
        ledger.open_account("A01", "Awa Diallo", dec!(100)).unwrap();

        assert!(ledger.deposit("A01", Decimal::ZERO).is_err());
        assert!(ledger.withdraw("A01", dec!(-5)).is_err());
        assert_eq!(ledger.balance("A01").unwrap(), dec!(100));
    }

    #[test]
    fn overdraw_leaves_the_balance_unchanged() {
        let mut ledger = ledger();
        ledger.open_account("A01", "Awa Diallo", dec!(100)).unwrap();

        let err = ledger.withdraw("A01", dec!(150)).unwrap_err();
        assert!(matches!(err, KardexError::Validation { .. }));
        assert_eq!(ledger.balance("A01").unwrap(), dec!(100));
        // No audit entry for a rejected withdrawal.
        assert_eq!(ledger.history("A01").unwrap().len(), 1);
    }

    #[test]
    fn withdraw_down_to_zero_is_allowed() {
        let mut ledger = ledger();
        ledger.open_account("A01", "Awa Diallo", dec!(100)).unwrap();

        assert_eq!(ledger.withdraw("A01", dec!(100)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn transfer_preserves_the_total() {
        let mut ledger = ledger();
        ledger.open_account("A01", "Awa Diallo", dec!(100)).unwrap();
        ledger.open_account("A02", "Moussa Ba", dec!(40)).unwrap();

        ledger.transfer("A01", "A02", dec!(30)).unwrap();
        assert_eq!(ledger.balance("A01").unwrap(), dec!(70));
        assert_eq!(ledger.balance("A02").unwrap(), dec!(110));
        assert_eq!(ledger.total_assets(), dec!(180));

        let out = ledger.history("A01").unwrap().last().unwrap().kind;
        let into = ledger.history("A02").unwrap().last().unwrap().kind;
        assert_eq!(out, TransactionKind::TransferOut);
        assert_eq!(into, TransactionKind::TransferIn);
    }

    #[test]
    fn failed_transfer_changes_neither_side() {
        let mut ledger = ledger();
        ledger.open_account("A01", "Awa Diallo", dec!(100)).unwrap();
        ledger.open_account("A02", "Moussa Ba", dec!(40)).unwrap();

        // Insufficient funds.
        assert!(ledger.transfer("A01", "A02", dec!(500)).is_err());
        // Missing destination, checked before any withdrawal happens.
        let err = ledger.transfer("A01", "A99", dec!(10)).unwrap_err();
        assert!(matches!(err, KardexError::NotFound(_)));
        // Same account on both sides.
        assert!(ledger.transfer("A01", "a01", dec!(10)).is_err());

        assert_eq!(ledger.balance("A01").unwrap(), dec!(100));
        assert_eq!(ledger.balance("A02").unwrap(), dec!(40));
        assert_eq!(ledger.history("A01").unwrap().len(), 1);
    }

    #[test]
    fn rename_holder_validates_the_new_name() {
        let mut ledger = ledger();
        ledger.open_account("A01", "Awa Diallo", dec!(100)).unwrap();

        ledger.rename_holder("A01", " Awa Ndiaye ").unwrap();
        assert_eq!(ledger.account("A01").unwrap().holder, "Awa Ndiaye");

        assert!(ledger.rename_holder("A01", "   ").is_err());
        assert!(ledger.rename_holder("A99", "Anyone").is_err());
    }

    #[test]
    fn close_account_removes_it() {
        let mut ledger = ledger();
        ledger.open_account("A01", "Awa Diallo", dec!(100)).unwrap();

        let closed = ledger.close_account("A01").unwrap();
        assert_eq!(closed.balance, dec!(100));
        assert!(matches!(
            ledger.balance("A01").unwrap_err(),
            KardexError::NotFound(_)
        ));
    }

    #[test]
    fn accounts_are_listed_by_holder_name() {
        let mut ledger = ledger();
        ledger.open_account("A03", "Zeinab Sow", dec!(10)).unwrap();
        ledger.open_account("A01", "Awa Diallo", dec!(10)).unwrap();
        ledger.open_account("A02", "Moussa Ba", dec!(10)).unwrap();

        let holders: Vec<&str> = ledger.accounts().iter().map(|a| a.holder.as_str()).collect();
        assert_eq!(holders, vec!["Awa Diallo", "Moussa Ba", "Zeinab Sow"]);
    }

    #[test]
    fn total_assets_is_zero_on_an_empty_ledger() {
        assert_eq!(ledger().total_assets(), Decimal::ZERO);
    }
}
