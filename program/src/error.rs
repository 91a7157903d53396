use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

/// Errors that may be returned by the raffle program
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RaffleError {
    /// Invalid instruction data passed
    #[error("Invalid instruction data")]
    InvalidInstructionData,

    /// Entry paid less than the entrance fee
    #[error("Payment is below the entrance fee")]
    InsufficientPayment,

    /// Entry attempted while a draw is in progress
    #[error("Raffle round is not open")]
    RoundNotOpen,

    /// Upkeep performed while the raffle is not ready to draw
    #[error("Upkeep not needed")]
    UpkeepNotNeeded,

    /// Fulfillment id does not match the outstanding draw
    #[error("Unknown randomness request")]
    UnknownRequest,

    /// Pending draw has no players to choose from
    #[error("No players in the draw")]
    NoPlayers,

    /// Pot transfer to the winner did not go through
    #[error("Payout to the winner failed")]
    PayoutFailed,

    /// Player query past the end of the round
    #[error("Player index out of range")]
    IndexOutOfRange,

    /// Zero entrance fee or zero random words requested
    #[error("Invalid raffle configuration")]
    InvalidConfig,

    /// The raffle account has no room for another entry
    #[error("Raffle is full")]
    RaffleFull,

    /// Random words delivered by someone other than the oracle authority
    #[error("Signer is not the oracle authority")]
    NotOracleAuthority,

    /// Upkeep pointed at an oracle program other than the configured one
    #[error("Oracle program does not match the raffle configuration")]
    OracleProgramMismatch,

    /// Oracle returned no usable request id
    #[error("Oracle did not return a request id")]
    MissingRequestId,

    /// Fulfillment with an empty word list
    #[error("Fulfillment carried no random words")]
    MissingRandomWords,

    /// New randomness request while one is outstanding
    #[error("A draw is already pending")]
    DrawAlreadyPending,

    /// Pot or round counter overflow
    #[error("Arithmetic overflow")]
    Overflow,
}

impl From<RaffleError> for ProgramError {
    fn from(e: RaffleError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for RaffleError {
    fn type_of() -> &'static str {
        "Raffle Error"
    }
}

impl PrintProgramError for RaffleError {
    fn print<E>(&self) {
        msg!(&self.to_string());
    }
}
