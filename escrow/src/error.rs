use solana_program::program_error::ProgramError;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EscrowError {
    #[error("Signer or account does not match the escrow record")]
    Unauthorized,
    #[error("Escrow is not in the required status")]
    WrongStatus,
    #[error("Escrow has not reached its expiry")]
    NotYetExpired,
    #[error("Invalid token amount")]
    InvalidAmount,
    #[error("Escrow record already exists for this depositor")]
    RecordAlreadyExists,
    #[error("Depositor token balance is below the escrow amount")]
    InsufficientFunds,
    #[error("Token account does not match the escrow mint")]
    MintMismatch,
    #[error("Invalid expiry duration")]
    InvalidExpiry,
    #[error("Escrow has expired")]
    Expired,
}

impl From<EscrowError> for ProgramError {
    fn from(e: EscrowError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
