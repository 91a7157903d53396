// Autoraffle
// A keeper-driven raffle that draws its winner from an external randomness oracle

pub mod draw_request;
pub mod error;
pub mod events;
pub mod instruction;
pub mod ledger;
pub mod oracle;
pub mod payout;
pub mod processor;
pub mod raffle;
pub mod readiness;
pub mod state;
pub mod utils;

#[cfg(not(feature = "no-entrypoint"))]
mod entrypoint;

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process(program_id, accounts, instruction_data)
}
