//! Address derivation for the escrow record and its token account.
//!
//! Everything here is pure: no account data is read, so the same functions
//! serve the program, its tests and off-chain clients.

use solana_program::{program_error::ProgramError, pubkey::Pubkey};
use spl_associated_token_account::get_associated_token_address;

pub const ESCROW_SEED: &[u8] = b"escrow";

/// Canonical record address and bump for `depositor`.
pub fn find_escrow_address(depositor: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[ESCROW_SEED, depositor.as_ref()], program_id)
}

/// Rebuilds the record address from a stored bump without searching.
pub fn escrow_address_with_bump(
    depositor: &Pubkey,
    bump: u8,
    program_id: &Pubkey,
) -> Result<Pubkey, ProgramError> {
    Pubkey::create_program_address(&[ESCROW_SEED, depositor.as_ref(), &[bump]], program_id)
        .map_err(|_| ProgramError::InvalidSeeds)
}

pub fn escrow_signer_seeds<'a>(depositor: &'a Pubkey, bump: &'a [u8; 1]) -> [&'a [u8]; 3] {
    [ESCROW_SEED, depositor.as_ref(), &bump[..]]
}

/// Associated token account of the record for `mint`; the record is an
/// off-curve owner.
pub fn escrow_token_address(escrow: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(escrow, mint)
}
