use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::{error::RaffleError, state::RaffleStatus};

/// Maximum number of entries a single round can hold
pub const MAX_PLAYERS: usize = 64;

/// Participants and pot of the current round
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq)]
pub struct EntryLedger {
    /// One slot per paid entry, in entry order
    players: Vec<Pubkey>,
    /// Sum of every accepted payment in lamports
    pot: u64,
}

impl EntryLedger {
    /// Record a paid entry.
    ///
    /// Fails with `InsufficientPayment` when `amount_paid` is below the fee and with
    /// `RoundNotOpen` when a draw is in progress. Nothing is written on failure.
    pub fn enter(
        &mut self,
        participant: Pubkey,
        amount_paid: u64,
        entrance_fee: u64,
        status: RaffleStatus,
    ) -> Result<(), RaffleError> {
        if amount_paid < entrance_fee {
            return Err(RaffleError::InsufficientPayment);
        }
        if status != RaffleStatus::Open {
            return Err(RaffleError::RoundNotOpen);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(RaffleError::RaffleFull);
        }
        let pot = self
            .pot
            .checked_add(amount_paid)
            .ok_or(RaffleError::Overflow)?;

        self.players.push(participant);
        self.pot = pot;
        Ok(())
    }

    pub fn players(&self) -> &[Pubkey] {
        &self.players
    }

    pub fn pot(&self) -> u64 {
        self.pot
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player_at(&self, index: usize) -> Result<Pubkey, RaffleError> {
        self.players
            .get(index)
            .copied()
            .ok_or(RaffleError::IndexOutOfRange)
    }

    /// Copy of the player list, frozen into a pending draw
    pub fn snapshot(&self) -> Vec<Pubkey> {
        self.players.clone()
    }

    pub fn clear(&mut self) {
        self.players.clear();
        self.pot = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEE: u64 = 10;

    #[test]
    fn enter_appends_player_and_grows_pot() {
        let mut ledger = EntryLedger::default();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();

        ledger.enter(alice, FEE, FEE, RaffleStatus::Open).unwrap();
        ledger.enter(bob, FEE, FEE, RaffleStatus::Open).unwrap();
        ledger.enter(alice, FEE, FEE, RaffleStatus::Open).unwrap();

        assert_eq!(ledger.players(), &[alice, bob, alice]);
        assert_eq!(ledger.pot(), 3 * FEE);
        assert_eq!(ledger.player_at(1), Ok(bob));
    }

    #[test]
    fn overpayment_is_kept_in_pot() {
        let mut ledger = EntryLedger::default();
        ledger
            .enter(Pubkey::new_unique(), FEE + 7, FEE, RaffleStatus::Open)
            .unwrap();

        assert_eq!(ledger.player_count(), 1);
        assert_eq!(ledger.pot(), FEE + 7);
    }

    #[test]
    fn underpayment_is_rejected() {
        let mut ledger = EntryLedger::default();
        let result = ledger.enter(Pubkey::new_unique(), FEE - 1, FEE, RaffleStatus::Open);

        assert_eq!(result, Err(RaffleError::InsufficientPayment));
        assert_eq!(ledger, EntryLedger::default());
    }

    #[test]
    fn entry_while_calculating_leaves_ledger_untouched() {
        let mut ledger = EntryLedger::default();
        ledger
            .enter(Pubkey::new_unique(), FEE, FEE, RaffleStatus::Open)
            .unwrap();
        let before = ledger.clone();

        let result = ledger.enter(Pubkey::new_unique(), FEE, FEE, RaffleStatus::Calculating);

        assert_eq!(result, Err(RaffleError::RoundNotOpen));
        assert_eq!(ledger, before);
    }

    #[test]
    fn entries_stop_at_capacity() {
        let mut ledger = EntryLedger::default();
        for _ in 0..MAX_PLAYERS {
            ledger
                .enter(Pubkey::new_unique(), FEE, FEE, RaffleStatus::Open)
                .unwrap();
        }

        let result = ledger.enter(Pubkey::new_unique(), FEE, FEE, RaffleStatus::Open);
        assert_eq!(result, Err(RaffleError::RaffleFull));
        assert_eq!(ledger.pot(), FEE * MAX_PLAYERS as u64);
    }

    #[test]
    fn pot_overflow_is_rejected() {
        let mut ledger = EntryLedger::default();
        ledger
            .enter(Pubkey::new_unique(), u64::MAX, FEE, RaffleStatus::Open)
            .unwrap();

        let result = ledger.enter(Pubkey::new_unique(), FEE, FEE, RaffleStatus::Open);
        assert_eq!(result, Err(RaffleError::Overflow));
        assert_eq!(ledger.player_count(), 1);
    }

    #[test]
    fn player_at_out_of_range() {
        let ledger = EntryLedger::default();
        assert_eq!(ledger.player_at(0), Err(RaffleError::IndexOutOfRange));
    }

    #[test]
    fn clear_resets_round() {
        let mut ledger = EntryLedger::default();
        ledger
            .enter(Pubkey::new_unique(), FEE, FEE, RaffleStatus::Open)
            .unwrap();
        ledger.clear();

        assert!(ledger.players().is_empty());
        assert_eq!(ledger.pot(), 0);
    }
}
