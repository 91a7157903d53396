use arrayref::{array_mut_ref, array_ref};
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    clock::UnixTimestamp,
    program_error::ProgramError,
    program_pack::{IsInitialized, Pack, Sealed},
    pubkey::Pubkey,
};

use crate::{
    draw_request::DrawRequestTracker,
    error::RaffleError,
    ledger::{EntryLedger, MAX_PLAYERS},
};

/// Status of a raffle round
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleStatus {
    /// Accepting entries
    Open,
    /// Waiting on the randomness callback
    Calculating,
}

impl From<RaffleStatus> for u8 {
    fn from(status: RaffleStatus) -> Self {
        match status {
            RaffleStatus::Open => 0,
            RaffleStatus::Calculating => 1,
        }
    }
}

/// How the raffle talks to its randomness oracle
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct OracleConfig {
    /// Program that receives randomness requests
    pub program_id: Pubkey,
    /// Only signer allowed to deliver random words
    pub authority: Pubkey,
    /// Gas lane forwarded with each request
    pub key_hash: [u8; 32],
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
    /// Words requested per draw, at least one
    pub num_words: u32,
}

impl OracleConfig {
    pub const LEN: usize = 32 + 32 + 32 + 8 + 2 + 4 + 4;
}

/// Construction-time raffle settings, never changed afterwards
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct RaffleConfig {
    /// Minimum payment per entry in lamports
    pub entrance_fee: u64,
    /// Minimum seconds between the round start and a draw
    pub interval: u64,
    pub oracle: OracleConfig,
}

impl RaffleConfig {
    pub const LEN: usize = 8 + 8 + OracleConfig::LEN;

    pub fn validate(&self) -> Result<(), RaffleError> {
        if self.entrance_fee == 0 || self.oracle.num_words == 0 {
            return Err(RaffleError::InvalidConfig);
        }
        Ok(())
    }
}

/// Raffle account data
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct Raffle {
    /// Is the account initialized
    pub is_initialized: bool,
    /// PDA bump seed
    pub bump: u8,
    /// Creator of the raffle (draws are permissionless)
    pub authority: Pubkey,
    /// Disambiguates raffles created by the same authority
    pub nonce: u64,
    pub config: RaffleConfig,
    pub status: RaffleStatus,
    /// Start of the current round
    pub last_timestamp: UnixTimestamp,
    /// Number of rounds paid out so far
    pub round: u64,
    pub ledger: EntryLedger,
    pub draws: DrawRequestTracker,
    pub recent_winner: Option<Pubkey>,
}

impl Sealed for Raffle {}

impl IsInitialized for Raffle {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

const PLAYER_LIST_LEN: usize = 4 + 32 * MAX_PLAYERS;

impl Pack for Raffle {
    // Sized for a full player list plus a full pending snapshot
    const LEN: usize = 1 // is_initialized
        + 1 // bump
        + 32 // authority
        + 8 // nonce
        + RaffleConfig::LEN
        + 1 // status
        + 8 // last_timestamp
        + 8 // round
        + PLAYER_LIST_LEN + 8 // ledger
        + 1 + 32 + PLAYER_LIST_LEN // pending draw
        + 1 + 32; // recent_winner

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let src = array_ref![src, 0, Raffle::LEN];
        let mut cursor: &[u8] = src;
        Raffle::deserialize(&mut cursor).map_err(|_| ProgramError::InvalidAccountData)
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, Raffle::LEN];
        dst.fill(0);
        let mut cursor: &mut [u8] = dst;
        // Entries are capped at MAX_PLAYERS, so the encoding always fits.
        let written = self.serialize(&mut cursor);
        debug_assert!(written.is_ok(), "raffle encoding exceeds account size");
    }
}

impl Raffle {
    /// Create a fresh raffle whose first round starts at `now`
    pub fn new(
        authority: Pubkey,
        nonce: u64,
        bump: u8,
        config: RaffleConfig,
        now: UnixTimestamp,
    ) -> Result<Self, RaffleError> {
        config.validate()?;
        Ok(Self {
            is_initialized: true,
            bump,
            authority,
            nonce,
            config,
            status: RaffleStatus::Open,
            last_timestamp: now,
            round: 0,
            ledger: EntryLedger::default(),
            draws: DrawRequestTracker::default(),
            recent_winner: None,
        })
    }

    pub fn entrance_fee(&self) -> u64 {
        self.config.entrance_fee
    }

    pub fn interval(&self) -> u64 {
        self.config.interval
    }

    pub fn raffle_state(&self) -> RaffleStatus {
        self.status
    }

    /// Numeric lottery state: 0 while open, 1 while calculating
    pub fn lottery_state_code(&self) -> u8 {
        self.status.into()
    }

    pub fn player(&self, index: usize) -> Result<Pubkey, RaffleError> {
        self.ledger.player_at(index)
    }

    pub fn number_of_players(&self) -> usize {
        self.ledger.player_count()
    }

    pub fn recent_winner(&self) -> Option<Pubkey> {
        self.recent_winner
    }

    pub fn last_timestamp(&self) -> UnixTimestamp {
        self.last_timestamp
    }

    pub fn pot(&self) -> u64 {
        self.ledger.pot()
    }

    pub fn num_words(&self) -> u32 {
        self.config.oracle.num_words
    }

    pub fn request_confirmations(&self) -> u16 {
        self.config.oracle.request_confirmations
    }

    pub fn subscription_id(&self) -> u64 {
        self.config.oracle.subscription_id
    }
}
