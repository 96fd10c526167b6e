//! In-memory token ledger for simulation and tests.

use std::collections::HashMap;
use std::sync::Mutex;

use hongbao_core::{Address, Hash32, TokenLedger, TokenLedgerError};

#[derive(Default)]
struct Book {
    balances: HashMap<Address, u128>,
    allowances: HashMap<(Address, Address), u128>,
}

/// [`TokenLedger`] backed by in-memory balances, fronting the single escrow
/// account that holds all escrowed distribution funds.
pub struct InMemoryTokenLedger {
    escrow: Address,
    book: Mutex<Book>,
}

impl InMemoryTokenLedger {
    pub fn new(escrow: Address) -> Self {
        Self {
            escrow,
            book: Mutex::new(Book::default()),
        }
    }

    pub fn escrow(&self) -> Address {
        self.escrow
    }

    pub fn mint(&self, account: Address, amount: u128) {
        let mut book = self.book.lock().expect("token book lock poisoned");
        *book.balances.entry(account).or_insert(0) += amount;
    }

    pub fn approve(&self, owner: Address, spender: Address, amount: u128) {
        let mut book = self.book.lock().expect("token book lock poisoned");
        book.allowances.insert((owner, spender), amount);
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        let book = self.book.lock().expect("token book lock poisoned");
        book.balances.get(account).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        let book = self.book.lock().expect("token book lock poisoned");
        book.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    fn move_balance(
        book: &mut Book,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TokenLedgerError> {
        let have = book.balances.get(from).copied().unwrap_or(0);
        if have < amount {
            return Err(TokenLedgerError::InsufficientBalance { have, need: amount });
        }
        book.balances.insert(*from, have - amount);
        *book.balances.entry(*to).or_insert(0) += amount;
        Ok(())
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn transfer(&self, to: Address, amount: u128) -> Result<(), TokenLedgerError> {
        let mut book = self.book.lock().expect("token book lock poisoned");
        Self::move_balance(&mut book, &self.escrow, &to, amount)
    }

    fn transfer_from(
        &self,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), TokenLedgerError> {
        let mut book = self.book.lock().expect("token book lock poisoned");
        // the escrow is the spender
        let allowed = book
            .allowances
            .get(&(from, self.escrow))
            .copied()
            .unwrap_or(0);
        if allowed < amount {
            return Err(TokenLedgerError::InsufficientAllowance {
                have: allowed,
                need: amount,
            });
        }
        Self::move_balance(&mut book, &from, &to, amount)?;
        book.allowances.insert((from, self.escrow), allowed - amount);
        Ok(())
    }

    fn permit(
        &self,
        owner: Address,
        spender: Address,
        value: u128,
        _deadline: u64,
        _v: u8,
        _r: Hash32,
        _s: Hash32,
    ) -> Result<(), TokenLedgerError> {
        // signature components are not validated off-chain
        let mut book = self.book.lock().expect("token book lock poisoned");
        book.allowances.insert((owner, spender), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESCROW: Address = [0xEEu8; 20];
    const ALICE: Address = [1u8; 20];
    const BOB: Address = [2u8; 20];

    #[test]
    fn test_transfer_from_escrow() {
        let ledger = InMemoryTokenLedger::new(ESCROW);
        ledger.mint(ESCROW, 100);
        ledger.transfer(ALICE, 40).unwrap();
        assert_eq!(ledger.balance_of(&ESCROW), 60);
        assert_eq!(ledger.balance_of(&ALICE), 40);
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let ledger = InMemoryTokenLedger::new(ESCROW);
        ledger.mint(ESCROW, 10);
        let err = ledger.transfer(ALICE, 11).unwrap_err();
        assert!(matches!(
            err,
            TokenLedgerError::InsufficientBalance { have: 10, need: 11 }
        ));
        assert_eq!(ledger.balance_of(&ESCROW), 10);
    }

    #[test]
    fn test_transfer_from_requires_allowance() {
        let ledger = InMemoryTokenLedger::new(ESCROW);
        ledger.mint(ALICE, 100);

        let err = ledger.transfer_from(ALICE, ESCROW, 50).unwrap_err();
        assert!(matches!(
            err,
            TokenLedgerError::InsufficientAllowance { have: 0, need: 50 }
        ));

        ledger.approve(ALICE, ESCROW, 80);
        ledger.transfer_from(ALICE, ESCROW, 50).unwrap();
        assert_eq!(ledger.balance_of(&ALICE), 50);
        assert_eq!(ledger.balance_of(&ESCROW), 50);
        assert_eq!(ledger.allowance(&ALICE, &ESCROW), 30);
    }

    #[test]
    fn test_permit_sets_allowance() {
        let ledger = InMemoryTokenLedger::new(ESCROW);
        ledger
            .permit(ALICE, ESCROW, 75, 9999, 27, [0u8; 32], [0u8; 32])
            .unwrap();
        assert_eq!(ledger.allowance(&ALICE, &ESCROW), 75);
    }

    #[test]
    fn test_failed_transfer_from_leaves_allowance() {
        let ledger = InMemoryTokenLedger::new(ESCROW);
        ledger.approve(ALICE, ESCROW, 100);
        // allowance is there but the balance is not
        let err = ledger.transfer_from(ALICE, BOB, 50).unwrap_err();
        assert!(matches!(err, TokenLedgerError::InsufficientBalance { .. }));
        assert_eq!(ledger.allowance(&ALICE, &ESCROW), 100);
    }
}
