// Randomness oracle integration: the request goes out as a CPI and the oracle
// answers with a request id through return data. The random words arrive later
// in a separate FulfillRandomWords instruction signed by the oracle authority.
use arrayref::array_ref;
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    instruction::{AccountMeta, Instruction},
    msg,
    program::{get_return_data, invoke},
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{draw_request::RequestId, error::RaffleError};

/// Prefix of every randomness request sent to the oracle program
pub const REQUEST_RANDOMNESS_DISCRIMINATOR: [u8; 8] = *b"rndreqv1";

/// Parameters forwarded to the oracle. Only `requester` is meaningful to the
/// raffle; the rest is passed through untouched.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct RandomnessRequest {
    /// Gas lane the oracle should use
    pub key_hash: [u8; 32],
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
    pub num_words: u32,
    /// Raffle account the words should be delivered to
    pub requester: Pubkey,
}

impl RandomnessRequest {
    pub fn pack(&self) -> Result<Vec<u8>, ProgramError> {
        let body = self
            .try_to_vec()
            .map_err(|_| ProgramError::InvalidInstructionData)?;
        let mut data = Vec::with_capacity(REQUEST_RANDOMNESS_DISCRIMINATOR.len() + body.len());
        data.extend_from_slice(&REQUEST_RANDOMNESS_DISCRIMINATOR);
        data.extend_from_slice(&body);
        Ok(data)
    }

    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        if input.len() < REQUEST_RANDOMNESS_DISCRIMINATOR.len()
            || input[..REQUEST_RANDOMNESS_DISCRIMINATOR.len()] != REQUEST_RANDOMNESS_DISCRIMINATOR
        {
            return Err(ProgramError::InvalidInstructionData);
        }
        Self::try_from_slice(&input[REQUEST_RANDOMNESS_DISCRIMINATOR.len()..])
            .map_err(|_| ProgramError::InvalidInstructionData)
    }
}

/// Client side of the randomness oracle
pub trait RandomnessOracle {
    /// Submit a request and return the id the oracle will fulfill it under.
    fn request_randomness(&mut self, request: &RandomnessRequest)
        -> Result<RequestId, ProgramError>;
}

/// Oracle reached through a cross-program invocation
pub struct CpiRandomnessOracle<'a, 'b> {
    oracle_program: &'b AccountInfo<'a>,
    accounts: &'b [AccountInfo<'a>],
}

impl<'a, 'b> CpiRandomnessOracle<'a, 'b> {
    /// `accounts` are forwarded to the oracle program in order.
    pub fn new(oracle_program: &'b AccountInfo<'a>, accounts: &'b [AccountInfo<'a>]) -> Self {
        Self {
            oracle_program,
            accounts,
        }
    }
}

impl RandomnessOracle for CpiRandomnessOracle<'_, '_> {
    fn request_randomness(
        &mut self,
        request: &RandomnessRequest,
    ) -> Result<RequestId, ProgramError> {
        let instruction = Instruction {
            program_id: *self.oracle_program.key,
            accounts: self
                .accounts
                .iter()
                .map(|acc| AccountMeta {
                    pubkey: *acc.key,
                    is_signer: acc.is_signer,
                    is_writable: acc.is_writable,
                })
                .collect(),
            data: request.pack()?,
        };

        let mut account_infos = self.accounts.to_vec();
        account_infos.push(self.oracle_program.clone());
        invoke(&instruction, &account_infos)?;

        let (program_id, data) = get_return_data().ok_or_else(|| {
            msg!("Oracle returned no request id");
            RaffleError::MissingRequestId
        })?;
        if program_id != *self.oracle_program.key {
            msg!("Return data came from {} instead of the oracle", program_id);
            return Err(RaffleError::MissingRequestId.into());
        }
        if data.len() != 32 {
            msg!("Oracle request id has {} bytes, expected 32", data.len());
            return Err(RaffleError::MissingRequestId.into());
        }

        Ok(RequestId(*array_ref![data, 0, 32]))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_discriminator() {
        let request = RandomnessRequest {
            key_hash: [9; 32],
            subscription_id: 42,
            request_confirmations: 3,
            callback_gas_limit: 500_000,
            num_words: 1,
            requester: Pubkey::new_unique(),
        };

        let data = request.pack().unwrap();
        assert_eq!(&data[..8], b"rndreqv1");
        assert_eq!(RandomnessRequest::unpack(&data).unwrap(), request);
    }

    #[test]
    fn unpack_rejects_foreign_payload() {
        assert_eq!(
            RandomnessRequest::unpack(b"short"),
            Err(ProgramError::InvalidInstructionData)
        );
        assert_eq!(
            RandomnessRequest::unpack(&[0u8; 120]),
            Err(ProgramError::InvalidInstructionData)
        );
    }
}
