use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::{raffle::RandomWord, state::OracleConfig};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum RaffleInstruction {
    /// Create a raffle account and open its first round
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The authority creating the raffle, pays for the account
    /// 1. `[writable]` The raffle account (PDA of `["raffle", authority, nonce]`)
    /// 2. `[]` The system program
    InitializeRaffle {
        /// Distinguishes raffles of the same authority
        nonce: u64,
        /// Minimum payment per entry in lamports
        entrance_fee: u64,
        /// Seconds a round stays open before it can be drawn
        interval: u64,
        oracle: OracleConfig,
    },

    /// Pay into the current round
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The participant paying the entry
    /// 1. `[writable]` The raffle account
    /// 2. `[]` The system program
    EnterRaffle {
        /// Lamports paid, at least the entrance fee
        amount: u64,
    },

    /// Read-only readiness poll. Answers with a borsh `UpkeepResponse` in return data.
    ///
    /// Accounts expected:
    /// 0. `[]` The raffle account
    CheckUpkeep { check_data: Vec<u8> },

    /// Start a draw and request randomness from the oracle
    ///
    /// Accounts expected:
    /// 0. `[signer]` Any caller (keepers are permissionless)
    /// 1. `[writable]` The raffle account
    /// 2. `[]` The oracle program
    /// Remaining accounts are forwarded to the oracle program
    PerformUpkeep { perform_data: Vec<u8> },

    /// Oracle callback delivering the random words for a pending draw
    ///
    /// Accounts expected:
    /// 0. `[signer]` The oracle authority
    /// 1. `[writable]` The raffle account
    /// Remaining `[writable]` accounts are payout candidates; the winner must be among them
    FulfillRandomWords {
        request_id: [u8; 32],
        random_words: Vec<RandomWord>,
    },
}

impl RaffleInstruction {
    /// Unpacks a byte buffer into a RaffleInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| ProgramError::InvalidInstructionData)
    }

    /// Packs a RaffleInstruction into a byte buffer
    pub fn pack(&self) -> Result<Vec<u8>, ProgramError> {
        self.try_to_vec()
            .map_err(|_| ProgramError::InvalidInstructionData)
    }
}

/// Create initialize_raffle instruction
pub fn initialize_raffle(
    program_id: &Pubkey,
    authority: &Pubkey,
    raffle_account: &Pubkey,
    nonce: u64,
    entrance_fee: u64,
    interval: u64,
    oracle: OracleConfig,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::InitializeRaffle {
        nonce,
        entrance_fee,
        interval,
        oracle,
    }
    .pack()?;

    let accounts = vec![
        AccountMeta::new(*authority, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create enter_raffle instruction
pub fn enter_raffle(
    program_id: &Pubkey,
    participant: &Pubkey,
    raffle_account: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::EnterRaffle { amount }.pack()?;

    let accounts = vec![
        AccountMeta::new(*participant, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create check_upkeep instruction
pub fn check_upkeep(
    program_id: &Pubkey,
    raffle_account: &Pubkey,
    check_data: Vec<u8>,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::CheckUpkeep { check_data }.pack()?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new_readonly(*raffle_account, false)],
        data,
    })
}

/// Create perform_upkeep instruction
pub fn perform_upkeep(
    program_id: &Pubkey,
    caller: &Pubkey,
    raffle_account: &Pubkey,
    oracle_program: &Pubkey,
    oracle_accounts: &[AccountMeta],
    perform_data: Vec<u8>,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::PerformUpkeep { perform_data }.pack()?;

    let mut accounts = vec![
        AccountMeta::new_readonly(*caller, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new_readonly(*oracle_program, false),
    ];
    accounts.extend_from_slice(oracle_accounts);

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create fulfill_random_words instruction
pub fn fulfill_random_words(
    program_id: &Pubkey,
    oracle_authority: &Pubkey,
    raffle_account: &Pubkey,
    payout_candidates: &[Pubkey],
    request_id: [u8; 32],
    random_words: Vec<RandomWord>,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::FulfillRandomWords {
        request_id,
        random_words,
    }
    .pack()?;

    let mut accounts = vec![
        AccountMeta::new_readonly(*oracle_authority, true),
        AccountMeta::new(*raffle_account, false),
    ];
    accounts.extend(
        payout_candidates
            .iter()
            .map(|candidate| AccountMeta::new(*candidate, false)),
    );

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}
