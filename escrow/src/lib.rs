//! Time-locked token escrow.
//!
//! A depositor opens a record at `["escrow", depositor]`, funds it into the
//! record's associated token account, and the recipient withdraws once the
//! expiry has passed.

pub mod checks;
pub mod error;
pub mod instruction;
pub mod pda;
pub mod processor;
pub mod state;

pub use solana_program;

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

pub use error::EscrowError;
pub use instruction::EscrowInstruction;
pub use state::{Escrow, EscrowStatus};

#[cfg(not(feature = "no-entrypoint"))]
solana_program::entrypoint!(process_instruction);

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::process(program_id, accounts, instruction_data)
}
