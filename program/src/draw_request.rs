use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, program_error::ProgramError, pubkey::Pubkey};
use std::fmt;

use crate::{
    error::RaffleError,
    oracle::{RandomnessOracle, RandomnessRequest},
};

/// Opaque randomness request identifier handed out by the oracle.
/// Compared by equality only.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub [u8; 32]);

impl RequestId {
    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({})", self)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// A draw waiting on its randomness callback
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct PendingDraw {
    pub request_id: RequestId,
    /// Players as of the request, used for winner selection
    pub snapshot_players: Vec<Pubkey>,
}

/// Holds at most one outstanding randomness request
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq)]
pub struct DrawRequestTracker {
    pending: Option<PendingDraw>,
}

impl DrawRequestTracker {
    /// Ask the oracle for a request id and record the pending draw under it.
    pub fn begin_request<O: RandomnessOracle + ?Sized>(
        &mut self,
        oracle: &mut O,
        request: &RandomnessRequest,
        snapshot_players: Vec<Pubkey>,
    ) -> Result<RequestId, ProgramError> {
        if self.pending.is_some() {
            msg!("A randomness request is already outstanding");
            return Err(RaffleError::DrawAlreadyPending.into());
        }

        let request_id = oracle.request_randomness(request)?;
        self.pending = Some(PendingDraw {
            request_id,
            snapshot_players,
        });
        Ok(request_id)
    }

    /// Look up the pending draw for `request_id` without consuming it.
    pub fn validate(&self, request_id: &RequestId) -> Result<&PendingDraw, RaffleError> {
        match &self.pending {
            Some(pending) if pending.request_id == *request_id => Ok(pending),
            _ => Err(RaffleError::UnknownRequest),
        }
    }

    /// Remove the pending draw for `request_id` and hand back its snapshot.
    /// A mismatched id leaves the pending draw in place.
    pub fn validate_and_consume(
        &mut self,
        request_id: &RequestId,
    ) -> Result<Vec<Pubkey>, RaffleError> {
        self.validate(request_id)?;
        self.pending
            .take()
            .map(|pending| pending.snapshot_players)
            .ok_or(RaffleError::UnknownRequest)
    }

    pub fn pending(&self) -> Option<&PendingDraw> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::mock::SequentialOracle;

    fn request() -> RandomnessRequest {
        RandomnessRequest {
            key_hash: [3; 32],
            subscription_id: 1,
            request_confirmations: 3,
            callback_gas_limit: 500_000,
            num_words: 1,
            requester: Pubkey::new_unique(),
        }
    }

    #[test]
    fn begin_request_records_oracle_id() {
        let mut oracle = SequentialOracle::default();
        let mut tracker = DrawRequestTracker::default();
        let players = vec![Pubkey::new_unique()];

        let id = tracker
            .begin_request(&mut oracle, &request(), players.clone())
            .unwrap();

        assert_eq!(oracle.requests.len(), 1);
        assert_eq!(tracker.pending().unwrap().request_id, id);
        assert_eq!(tracker.pending().unwrap().snapshot_players, players);
    }

    #[test]
    fn second_request_while_pending_is_refused() {
        let mut oracle = SequentialOracle::default();
        let mut tracker = DrawRequestTracker::default();
        tracker
            .begin_request(&mut oracle, &request(), vec![Pubkey::new_unique()])
            .unwrap();

        let result = tracker.begin_request(&mut oracle, &request(), vec![]);

        assert_eq!(
            result,
            Err(ProgramError::from(RaffleError::DrawAlreadyPending))
        );
        assert_eq!(oracle.requests.len(), 1);
    }

    #[test]
    fn consume_returns_snapshot_once() {
        let mut oracle = SequentialOracle::default();
        let mut tracker = DrawRequestTracker::default();
        let players = vec![Pubkey::new_unique(), Pubkey::new_unique()];
        let id = tracker
            .begin_request(&mut oracle, &request(), players.clone())
            .unwrap();

        assert_eq!(tracker.validate_and_consume(&id), Ok(players));
        assert!(!tracker.is_pending());
        assert_eq!(
            tracker.validate_and_consume(&id),
            Err(RaffleError::UnknownRequest)
        );
    }

    #[test]
    fn mismatched_id_keeps_pending_draw() {
        let mut oracle = SequentialOracle::default();
        let mut tracker = DrawRequestTracker::default();
        let id = tracker
            .begin_request(&mut oracle, &request(), vec![Pubkey::new_unique()])
            .unwrap();

        let foreign = RequestId([0xee; 32]);
        assert_eq!(
            tracker.validate_and_consume(&foreign),
            Err(RaffleError::UnknownRequest)
        );
        assert!(tracker.is_pending());
        assert!(tracker.validate_and_consume(&id).is_ok());
    }

    #[test]
    fn nothing_pending_is_unknown() {
        let mut tracker = DrawRequestTracker::default();
        assert_eq!(
            tracker.validate_and_consume(&RequestId([1; 32])),
            Err(RaffleError::UnknownRequest)
        );
    }

    #[test]
    fn request_id_displays_as_hex() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0xab;
        let rendered = RequestId(bytes).to_string();

        assert_eq!(rendered.len(), 64);
        assert!(rendered.ends_with("ab"));
    }
}
