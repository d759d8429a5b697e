//! Account and signer validation shared by every instruction.

use borsh::BorshDeserialize;
use solana_program::{
    account_info::AccountInfo, entrypoint::ProgramResult, program_error::ProgramError,
    program_pack::Pack, pubkey::Pubkey,
};
use spl_token::state::{Account as TokenAccount, Mint};

use crate::{
    error::EscrowError,
    pda::{escrow_address_with_bump, escrow_token_address, find_escrow_address},
    state::Escrow,
};

pub fn assert_signer(account: &AccountInfo) -> ProgramResult {
    if !account.is_signer {
        return Err(EscrowError::Unauthorized.into());
    }
    Ok(())
}

pub fn assert_program(account: &AccountInfo, expected: &Pubkey) -> ProgramResult {
    if account.key != expected {
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

/// Rejects a record account that is not the PDA of `depositor`.
pub fn assert_escrow_address(
    program_id: &Pubkey,
    depositor: &Pubkey,
    escrow: &AccountInfo,
) -> Result<u8, ProgramError> {
    let (expected, bump) = find_escrow_address(depositor, program_id);
    if expected != *escrow.key {
        return Err(EscrowError::Unauthorized.into());
    }
    Ok(bump)
}

/// Deserializes a record and confirms its stored seeds point back at it.
pub fn load_escrow(program_id: &Pubkey, escrow: &AccountInfo) -> Result<Escrow, ProgramError> {
    if escrow.data_is_empty() {
        // Nothing created (or already closed) at this address
        return Err(EscrowError::WrongStatus.into());
    }
    if escrow.owner != program_id {
        return Err(EscrowError::Unauthorized.into());
    }

    let record = Escrow::try_from_slice(&escrow.data.borrow())?;
    let derived = escrow_address_with_bump(&record.depositor, record.bump, program_id)
        .map_err(|_| EscrowError::Unauthorized)?;
    if derived != *escrow.key {
        return Err(EscrowError::Unauthorized.into());
    }
    Ok(record)
}

pub fn assert_mint(mint: &AccountInfo, expected: &Pubkey) -> Result<Mint, ProgramError> {
    if mint.key != expected || mint.owner != &spl_token::id() {
        return Err(EscrowError::MintMismatch.into());
    }
    Mint::unpack(&mint.data.borrow()).map_err(|_| EscrowError::MintMismatch.into())
}

/// Unpacks an SPL token account held by `owner` for `mint`.
pub fn load_token_account(
    account: &AccountInfo,
    mint: &Pubkey,
    owner: &Pubkey,
) -> Result<TokenAccount, ProgramError> {
    if account.owner != &spl_token::id() {
        return Err(EscrowError::Unauthorized.into());
    }
    let token_account = TokenAccount::unpack(&account.data.borrow())?;
    if token_account.mint != *mint {
        return Err(EscrowError::MintMismatch.into());
    }
    if token_account.owner != *owner {
        return Err(EscrowError::Unauthorized.into());
    }
    Ok(token_account)
}

pub fn assert_escrow_token_address(
    account: &AccountInfo,
    escrow: &Pubkey,
    mint: &Pubkey,
) -> ProgramResult {
    if *account.key != escrow_token_address(escrow, mint) {
        return Err(EscrowError::Unauthorized.into());
    }
    Ok(())
}
