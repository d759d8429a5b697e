// Instruction definitions for the escrow program
use borsh::{BorshDeserialize, BorshSerialize};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum EscrowInstruction {
    /// Open an escrow record for the signing depositor.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Depositor
    /// 1. `[]` Recipient
    /// 2. `[]` Token mint
    /// 3. `[writable]` Escrow record (PDA)
    /// 4. `[]` System program
    CreateEscrow { amount: u64, expiry_duration: i64 },

    /// Move `amount` from the depositor into the escrow token account.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Depositor
    /// 1. `[writable]` Escrow record (PDA)
    /// 2. `[]` Token mint
    /// 3. `[writable]` Depositor token account
    /// 4. `[writable]` Escrow token account (ATA of the record)
    /// 5. `[]` Token program
    /// 6. `[]` Associated token program
    /// 7. `[]` System program
    FundEscrow,

    /// Release the escrowed balance to the recipient once expired.
    ///
    /// Accounts expected:
    /// 0. `[signer]` Recipient
    /// 1. `[writable]` Depositor (receives the escrow token account rent)
    /// 2. `[writable]` Escrow record (PDA)
    /// 3. `[]` Token mint
    /// 4. `[writable]` Recipient token account
    /// 5. `[writable]` Escrow token account
    /// 6. `[]` Token program
    WithdrawEscrow,

    /// Depositor backs out before the recipient's claim vests.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Depositor
    /// 1. `[writable]` Escrow record (PDA)
    /// 2. `[]` Token mint
    /// 3. `[writable]` Depositor token account
    /// 4. `[writable]` Escrow token account
    /// 5. `[]` Token program
    CancelEscrow,

    /// Reclaim the rent of a completed or cancelled record.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Depositor
    /// 1. `[writable]` Escrow record (PDA)
    CloseEscrow,
}
