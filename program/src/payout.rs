use solana_program::{account_info::AccountInfo, msg, pubkey::Pubkey};

/// The host's value transfer primitive. Reports success instead of erroring so
/// the caller decides how a failed payout affects the round.
pub trait PayoutTransfer {
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> bool;
}

/// Pays out of the program-owned raffle account, which doubles as the pot vault.
pub struct VaultPayout<'a, 'b> {
    vault: &'b AccountInfo<'a>,
    recipients: &'b [AccountInfo<'a>],
    /// Balance the vault must keep to stay rent exempt
    rent_floor: u64,
}

impl<'a, 'b> VaultPayout<'a, 'b> {
    pub fn new(
        vault: &'b AccountInfo<'a>,
        recipients: &'b [AccountInfo<'a>],
        rent_floor: u64,
    ) -> Self {
        Self {
            vault,
            recipients,
            rent_floor,
        }
    }
}

impl PayoutTransfer for VaultPayout<'_, '_> {
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> bool {
        let recipient = match self.recipients.iter().find(|acc| acc.key == to) {
            Some(recipient) => recipient,
            None => {
                msg!("Winner account {} was not supplied", to);
                return false;
            }
        };
        if !recipient.is_writable {
            msg!("Winner account {} is not writable", to);
            return false;
        }

        let available = self.vault.lamports().saturating_sub(self.rent_floor);
        if available < amount {
            msg!(
                "Vault holds {} spendable lamports, payout needs {}",
                available,
                amount
            );
            return false;
        }
        let credited = match recipient.lamports().checked_add(amount) {
            Some(credited) => credited,
            None => return false,
        };

        let mut vault_lamports = match self.vault.try_borrow_mut_lamports() {
            Ok(lamports) => lamports,
            Err(_) => return false,
        };
        let mut recipient_lamports = match recipient.try_borrow_mut_lamports() {
            Ok(lamports) => lamports,
            Err(_) => return false,
        };
        **vault_lamports -= amount;
        **recipient_lamports = credited;
        true
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Records every payout; refuses them all while `fail` is set.
    #[derive(Default)]
    pub struct RecordingPayout {
        pub fail: bool,
        pub transfers: Vec<(Pubkey, u64)>,
    }

    impl PayoutTransfer for RecordingPayout {
        fn transfer(&mut self, to: &Pubkey, amount: u64) -> bool {
            if self.fail {
                return false;
            }
            self.transfers.push((*to, amount));
            true
        }
    }
}
