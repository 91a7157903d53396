use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{log::sol_log_data, msg, program_error::ProgramError, pubkey::Pubkey};
use std::fmt;

use crate::draw_request::RequestId;

/// Tag written ahead of every encoded event in the program log
pub const EVENT_TAG: &[u8] = b"raffle-event";

/// Notifications for off-chain observers
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum RaffleEvent {
    /// A participant paid into the current round
    Entered {
        participant: Pubkey,
        amount: u64,
        round: u64,
    },
    /// A draw was handed to the randomness oracle
    DrawRequested { request_id: RequestId, round: u64 },
    /// The round's pot went to `winner`
    WinnerPicked {
        winner: Pubkey,
        amount: u64,
        round: u64,
    },
}

impl fmt::Display for RaffleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaffleEvent::Entered {
                participant,
                amount,
                round,
            } => write!(
                f,
                "Entered: {} paid {} lamports in round {}",
                participant, amount, round
            ),
            RaffleEvent::DrawRequested { request_id, round } => {
                write!(f, "DrawRequested: request {} for round {}", request_id, round)
            }
            RaffleEvent::WinnerPicked {
                winner,
                amount,
                round,
            } => write!(
                f,
                "WinnerPicked: {} won {} lamports in round {}",
                winner, amount, round
            ),
        }
    }
}

impl RaffleEvent {
    /// Borsh payload logged after [`EVENT_TAG`]
    pub fn encode(&self) -> Result<Vec<u8>, ProgramError> {
        self.try_to_vec()
            .map_err(|e| ProgramError::BorshIoError(e.to_string()))
    }

    /// Read an event back from the fields of one `sol_log_data` entry.
    /// Returns `None` for data logged under any other tag.
    pub fn decode(fields: &[&[u8]]) -> Option<Self> {
        match fields {
            [tag, payload] if *tag == EVENT_TAG => Self::try_from_slice(payload).ok(),
            _ => None,
        }
    }

    /// Write the event to the program log, readable and borsh-encoded.
    pub fn emit(&self) {
        msg!("{}", self);

        if let Ok(data) = self.encode() {
            sol_log_data(&[EVENT_TAG, &data]);
        }
    }
}
