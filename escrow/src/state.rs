// State definitions for the escrow program
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::error::EscrowError;

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscrowStatus {
    Pending,
    Funded,
    Completed,
    Cancelled,
}

/// One escrow per depositor, stored at the PDA `["escrow", depositor]`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Escrow {
    pub depositor: Pubkey,
    pub recipient: Pubkey,
    pub mint: Pubkey,
    /// Base units; authoritative once funded
    pub amount: u64,
    /// Unix timestamp after which the recipient may withdraw
    pub expiry: i64,
    pub status: EscrowStatus,
    pub bump: u8,
}

impl Escrow {
    pub const LEN: usize = 32 + 32 + 32 + 8 + 8 + 1 + 1;

    pub fn open(
        depositor: Pubkey,
        recipient: Pubkey,
        mint: Pubkey,
        amount: u64,
        expiry_duration: i64,
        now: i64,
        bump: u8,
    ) -> Result<Self, EscrowError> {
        if amount == 0 {
            return Err(EscrowError::InvalidAmount);
        }
        if expiry_duration < 0 {
            return Err(EscrowError::InvalidExpiry);
        }
        let expiry = now
            .checked_add(expiry_duration)
            .ok_or(EscrowError::InvalidExpiry)?;

        Ok(Self {
            depositor,
            recipient,
            mint,
            amount,
            expiry,
            status: EscrowStatus::Pending,
            bump,
        })
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expiry
    }

    /// Pending -> Funded. A second call fails so the vault is never credited twice.
    pub fn fund(&mut self, signer: &Pubkey) -> Result<(), EscrowError> {
        if *signer != self.depositor {
            return Err(EscrowError::Unauthorized);
        }
        if self.status != EscrowStatus::Pending {
            return Err(EscrowError::WrongStatus);
        }
        self.status = EscrowStatus::Funded;
        Ok(())
    }

    /// Funded -> Completed. The expiry check runs before the status check.
    pub fn withdraw(&mut self, signer: &Pubkey, now: i64) -> Result<(), EscrowError> {
        if *signer != self.recipient {
            return Err(EscrowError::Unauthorized);
        }
        if !self.is_expired(now) {
            return Err(EscrowError::NotYetExpired);
        }
        if self.status != EscrowStatus::Funded {
            return Err(EscrowError::WrongStatus);
        }
        self.status = EscrowStatus::Completed;
        Ok(())
    }

    /// Pending/Funded -> Cancelled, returning the status it left.
    /// A funded escrow can only be cancelled before expiry.
    pub fn cancel(&mut self, signer: &Pubkey, now: i64) -> Result<EscrowStatus, EscrowError> {
        if *signer != self.depositor {
            return Err(EscrowError::Unauthorized);
        }
        let previous = self.status;
        match previous {
            EscrowStatus::Pending => {}
            EscrowStatus::Funded if !self.is_expired(now) => {}
            EscrowStatus::Funded => return Err(EscrowError::Expired),
            EscrowStatus::Completed | EscrowStatus::Cancelled => {
                return Err(EscrowError::WrongStatus)
            }
        }
        self.status = EscrowStatus::Cancelled;
        Ok(previous)
    }

    pub fn ensure_closable(&self, signer: &Pubkey) -> Result<(), EscrowError> {
        if *signer != self.depositor {
            return Err(EscrowError::Unauthorized);
        }
        match self.status {
            EscrowStatus::Completed | EscrowStatus::Cancelled => Ok(()),
            EscrowStatus::Pending | EscrowStatus::Funded => Err(EscrowError::WrongStatus),
        }
    }
}
