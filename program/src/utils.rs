use solana_program::pubkey::Pubkey;

/// First seed of every raffle PDA
pub const RAFFLE_SEED: &[u8] = b"raffle";

/// Find the program derived address for a raffle
pub fn find_raffle_address(program_id: &Pubkey, authority: &Pubkey, nonce: u64) -> (Pubkey, u8) {
    let nonce_bytes = nonce.to_le_bytes();
    Pubkey::find_program_address(&[RAFFLE_SEED, authority.as_ref(), &nonce_bytes], program_id)
}
