use borsh::BorshSerialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed, set_return_data},
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    system_instruction, system_program,
    sysvar::{clock::Clock, rent::Rent, Sysvar},
};

use crate::{
    draw_request::RequestId,
    error::RaffleError,
    instruction::RaffleInstruction,
    oracle::CpiRandomnessOracle,
    payout::VaultPayout,
    raffle::RandomWord,
    state::{OracleConfig, Raffle, RaffleConfig},
    utils::{find_raffle_address, RAFFLE_SEED},
};

pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = RaffleInstruction::unpack(instruction_data)?;

        match instruction {
            RaffleInstruction::InitializeRaffle {
                nonce,
                entrance_fee,
                interval,
                oracle,
            } => {
                msg!("Instruction: Initialize Raffle");
                Self::process_initialize_raffle(
                    accounts,
                    nonce,
                    entrance_fee,
                    interval,
                    oracle,
                    program_id,
                )
            }
            RaffleInstruction::EnterRaffle { amount } => {
                msg!("Instruction: Enter Raffle");
                Self::process_enter_raffle(accounts, amount, program_id)
            }
            RaffleInstruction::CheckUpkeep { check_data } => {
                msg!("Instruction: Check Upkeep");
                Self::process_check_upkeep(accounts, &check_data, program_id)
            }
            RaffleInstruction::PerformUpkeep { perform_data: _ } => {
                msg!("Instruction: Perform Upkeep");
                Self::process_perform_upkeep(accounts, program_id)
            }
            RaffleInstruction::FulfillRandomWords {
                request_id,
                random_words,
            } => {
                msg!("Instruction: Fulfill Random Words");
                Self::process_fulfill_random_words(
                    accounts,
                    RequestId(request_id),
                    &random_words,
                    program_id,
                )
            }
        }
    }

    /// Creates the raffle PDA and opens round zero at the current clock time
    fn process_initialize_raffle(
        accounts: &[AccountInfo],
        nonce: u64,
        entrance_fee: u64,
        interval: u64,
        oracle: OracleConfig,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !authority_info.is_signer {
            msg!("Authority must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }
        if !system_program::check_id(system_program_info.key) {
            return Err(ProgramError::IncorrectProgramId);
        }

        let (expected_raffle_pubkey, bump_seed) =
            find_raffle_address(program_id, authority_info.key, nonce);
        if *raffle_info.key != expected_raffle_pubkey {
            msg!("Invalid raffle account address");
            return Err(ProgramError::InvalidArgument);
        }
        if raffle_info.owner == program_id {
            msg!("Raffle account is already initialized");
            return Err(ProgramError::AccountAlreadyInitialized);
        }

        let config = RaffleConfig {
            entrance_fee,
            interval,
            oracle,
        };
        let now = Clock::get()?.unix_timestamp;
        let raffle = Raffle::new(*authority_info.key, nonce, bump_seed, config, now)?;

        let rent_lamports = Rent::get()?.minimum_balance(Raffle::LEN);
        let nonce_bytes = nonce.to_le_bytes();
        invoke_signed(
            &system_instruction::create_account(
                authority_info.key,
                raffle_info.key,
                rent_lamports,
                Raffle::LEN as u64,
                program_id,
            ),
            &[
                authority_info.clone(),
                raffle_info.clone(),
                system_program_info.clone(),
            ],
            &[&[
                RAFFLE_SEED,
                authority_info.key.as_ref(),
                &nonce_bytes,
                &[bump_seed],
            ]],
        )?;

        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;

        msg!(
            "Raffle {} initialized: Fee={}, Interval={}s, Start={}",
            raffle_info.key,
            entrance_fee,
            interval,
            now
        );
        Ok(())
    }

    fn process_enter_raffle(
        accounts: &[AccountInfo],
        amount: u64,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let participant_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !participant_info.is_signer {
            msg!("Participant must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }
        let mut raffle = Self::load_raffle(raffle_info, program_id)?;

        let event = raffle.enter(*participant_info.key, amount)?;

        invoke(
            &system_instruction::transfer(participant_info.key, raffle_info.key, amount),
            &[
                participant_info.clone(),
                raffle_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;
        event.emit();
        Ok(())
    }

    /// Answers through return data; never writes the raffle account
    fn process_check_upkeep(
        accounts: &[AccountInfo],
        check_data: &[u8],
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let raffle_info = next_account_info(account_info_iter)?;

        let raffle = Self::load_raffle(raffle_info, program_id)?;
        let now = Clock::get()?.unix_timestamp;

        let check = raffle.upkeep_check(now);
        msg!(
            "Upkeep check: open={} time_passed={} has_balance={} has_players={}",
            check.is_open,
            check.time_passed,
            check.has_balance,
            check.has_players
        );

        let response = raffle.check_upkeep(now, check_data);
        let data = response
            .try_to_vec()
            .map_err(|e| ProgramError::BorshIoError(e.to_string()))?;
        set_return_data(&data);
        Ok(())
    }

    /// Anyone may trigger the draw once the round is ready
    fn process_perform_upkeep(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let caller_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let oracle_program_info = next_account_info(account_info_iter)?;

        if !caller_info.is_signer {
            msg!("Caller must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }
        let mut raffle = Self::load_raffle(raffle_info, program_id)?;

        if *oracle_program_info.key != raffle.config.oracle.program_id {
            msg!(
                "Expected oracle program {}, got {}",
                raffle.config.oracle.program_id,
                oracle_program_info.key
            );
            return Err(RaffleError::OracleProgramMismatch.into());
        }

        let now = Clock::get()?.unix_timestamp;
        let mut oracle = CpiRandomnessOracle::new(oracle_program_info, account_info_iter.as_slice());
        let event = raffle.perform_upkeep(now, *raffle_info.key, &mut oracle)?;

        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;
        event.emit();
        Ok(())
    }

    fn process_fulfill_random_words(
        accounts: &[AccountInfo],
        request_id: RequestId,
        random_words: &[RandomWord],
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;

        let mut raffle = Self::load_raffle(raffle_info, program_id)?;

        if !authority_info.is_signer || *authority_info.key != raffle.config.oracle.authority {
            msg!("Random words must be delivered by the oracle authority");
            return Err(RaffleError::NotOracleAuthority.into());
        }

        let now = Clock::get()?.unix_timestamp;
        let rent_floor = Rent::get()?.minimum_balance(raffle_info.data_len());
        let mut payout = VaultPayout::new(raffle_info, account_info_iter.as_slice(), rent_floor);
        let event = raffle.fulfill_randomness(&request_id, random_words, now, &mut payout)?;

        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;
        event.emit();
        Ok(())
    }

    fn load_raffle(raffle_info: &AccountInfo, program_id: &Pubkey) -> Result<Raffle, ProgramError> {
        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }
        Raffle::unpack(&raffle_info.data.borrow())
    }
}
