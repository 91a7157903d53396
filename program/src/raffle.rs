//! Round lifecycle of a raffle.
//!
//! `Open` accepts entries. Once [`readiness`](crate::readiness) reports the round
//! ready, `perform_upkeep` asks the oracle for randomness and the raffle moves to
//! `Calculating`. The matching `fulfill_randomness` callback pays the winner and
//! reopens the raffle. Every operation checks its preconditions before writing,
//! so a failed call leaves the raffle exactly as it found it.
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    clock::UnixTimestamp, msg, program_error::ProgramError, pubkey::Pubkey,
};

use crate::{
    draw_request::RequestId,
    error::RaffleError,
    events::RaffleEvent,
    oracle::{RandomnessOracle, RandomnessRequest},
    payout::PayoutTransfer,
    readiness::{self, UpkeepCheck},
    state::{Raffle, RaffleStatus},
};

/// A 256-bit random value, big-endian
pub type RandomWord = [u8; 32];

/// Answer to a keeper's `check_upkeep` poll
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct UpkeepResponse {
    pub upkeep_needed: bool,
    pub perform_data: Vec<u8>,
}

/// `word mod player_count`, over the full 256-bit word.
pub fn winner_index(word: &RandomWord, player_count: usize) -> Result<usize, RaffleError> {
    if player_count == 0 {
        return Err(RaffleError::NoPlayers);
    }
    let modulus = player_count as u128;
    let remainder = word
        .iter()
        .fold(0u128, |rem, byte| (rem * 256 + *byte as u128) % modulus);
    Ok(remainder as usize)
}

impl Raffle {
    /// Record a paid entry into the current round.
    pub fn enter(&mut self, participant: Pubkey, amount_paid: u64) -> Result<RaffleEvent, ProgramError> {
        self.ledger
            .enter(participant, amount_paid, self.config.entrance_fee, self.status)
            .map_err(|err| {
                msg!("Entry by {} with {} lamports rejected: {}", participant, amount_paid, err);
                err
            })?;

        Ok(RaffleEvent::Entered {
            participant,
            amount: amount_paid,
            round: self.round,
        })
    }

    pub fn upkeep_check(&self, now: UnixTimestamp) -> UpkeepCheck {
        readiness::evaluate(
            now,
            self.last_timestamp,
            self.config.interval,
            self.status,
            self.ledger.pot(),
            self.ledger.player_count(),
        )
    }

    /// Read-only readiness poll. `check_data` is accepted for keeper
    /// compatibility and not inspected.
    pub fn check_upkeep(&self, now: UnixTimestamp, _check_data: &[u8]) -> UpkeepResponse {
        UpkeepResponse {
            upkeep_needed: self.upkeep_check(now).is_ready(),
            perform_data: Vec::new(),
        }
    }

    /// Start a draw: freeze the players, request randomness and wait.
    ///
    /// Returns immediately after the request is recorded; the words arrive
    /// through [`Raffle::fulfill_randomness`].
    pub fn perform_upkeep<O: RandomnessOracle + ?Sized>(
        &mut self,
        now: UnixTimestamp,
        requester: Pubkey,
        oracle: &mut O,
    ) -> Result<RaffleEvent, ProgramError> {
        let check = self.upkeep_check(now);
        if !check.is_ready() {
            msg!(
                "Upkeep not needed: open={} time_passed={} has_balance={} has_players={} (pot {}, players {})",
                check.is_open,
                check.time_passed,
                check.has_balance,
                check.has_players,
                self.ledger.pot(),
                self.ledger.player_count()
            );
            return Err(RaffleError::UpkeepNotNeeded.into());
        }

        let oracle_config = &self.config.oracle;
        let request = RandomnessRequest {
            key_hash: oracle_config.key_hash,
            subscription_id: oracle_config.subscription_id,
            request_confirmations: oracle_config.request_confirmations,
            callback_gas_limit: oracle_config.callback_gas_limit,
            num_words: oracle_config.num_words,
            requester,
        };
        let request_id = self
            .draws
            .begin_request(oracle, &request, self.ledger.snapshot())?;
        self.status = RaffleStatus::Calculating;

        Ok(RaffleEvent::DrawRequested {
            request_id,
            round: self.round,
        })
    }

    /// Oracle callback: pick the winner, pay the pot and open the next round.
    ///
    /// An unknown id or a failed payout changes nothing, so the pending draw
    /// can still be fulfilled by a later, correct call.
    pub fn fulfill_randomness<P: PayoutTransfer + ?Sized>(
        &mut self,
        request_id: &RequestId,
        random_words: &[RandomWord],
        now: UnixTimestamp,
        payout: &mut P,
    ) -> Result<RaffleEvent, ProgramError> {
        let pending = self.draws.validate(request_id).map_err(|err| {
            msg!("Rejecting fulfillment for unknown request {}", request_id);
            err
        })?;
        let word = random_words.first().ok_or_else(|| {
            msg!("Fulfillment for request {} carried no random words", request_id);
            RaffleError::MissingRandomWords
        })?;
        let next_round = self.round.checked_add(1).ok_or(RaffleError::Overflow)?;

        let index = winner_index(word, pending.snapshot_players.len())?;
        let winner = pending.snapshot_players[index];
        let pot = self.ledger.pot();
        msg!(
            "Winner index {} of {} players: {}",
            index,
            pending.snapshot_players.len(),
            winner
        );

        if !payout.transfer(&winner, pot) {
            msg!("Payout of {} lamports to {} failed, round stays calculating", pot, winner);
            return Err(RaffleError::PayoutFailed.into());
        }

        self.draws.validate_and_consume(request_id)?;
        self.ledger.clear();
        self.last_timestamp = now;
        self.status = RaffleStatus::Open;
        self.recent_winner = Some(winner);
        let round = self.round;
        self.round = next_round;

        Ok(RaffleEvent::WinnerPicked {
            winner,
            amount: pot,
            round,
        })
    }
}
