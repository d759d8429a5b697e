use borsh::{BorshDeserialize, BorshSerialize};

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    pubkey::Pubkey,
    rent::Rent,
    sysvar::Sysvar,
};
use solana_system_interface::instruction as system_instruction;
use solana_system_interface::program as system_program;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use spl_token::instruction;

use crate::{
    checks::{
        assert_escrow_address, assert_escrow_token_address, assert_mint, assert_program,
        assert_signer, load_escrow, load_token_account,
    },
    error::EscrowError,
    instruction::EscrowInstruction,
    pda::escrow_signer_seeds,
    state::{Escrow, EscrowStatus},
};

pub fn process(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = EscrowInstruction::try_from_slice(instruction_data)
        .map_err(|_| ProgramError::InvalidInstructionData)?;

    match instruction {
        EscrowInstruction::CreateEscrow {
            amount,
            expiry_duration,
        } => {
            msg!("Instruction: CreateEscrow");
            create_escrow(program_id, accounts, amount, expiry_duration)
        }
        EscrowInstruction::FundEscrow => {
            msg!("Instruction: FundEscrow");
            fund_escrow(program_id, accounts)
        }
        EscrowInstruction::WithdrawEscrow => {
            msg!("Instruction: WithdrawEscrow");
            withdraw_escrow(program_id, accounts)
        }
        EscrowInstruction::CancelEscrow => {
            msg!("Instruction: CancelEscrow");
            cancel_escrow(program_id, accounts)
        }
        EscrowInstruction::CloseEscrow => {
            msg!("Instruction: CloseEscrow");
            close_escrow(program_id, accounts)
        }
    }
}

pub fn create_escrow(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount: u64,
    expiry_duration: i64,
) -> ProgramResult {
    let accs = &mut accounts.iter();

    let depositor = next_account_info(accs)?;
    let recipient = next_account_info(accs)?;
    let mint = next_account_info(accs)?;
    let escrow_state = next_account_info(accs)?;
    let system_program = next_account_info(accs)?;

    assert_signer(depositor)?;
    assert_program(system_program, &system_program::id())?;
    assert_mint(mint, mint.key)?;

    let bump = assert_escrow_address(program_id, depositor.key, escrow_state)?;
    if !escrow_state.data_is_empty() || escrow_state.owner == program_id {
        return Err(EscrowError::RecordAlreadyExists.into());
    }

    let now = Clock::get()?.unix_timestamp;
    let escrow = Escrow::open(
        *depositor.key,
        *recipient.key,
        *mint.key,
        amount,
        expiry_duration,
        now,
        bump,
    )?;

    let bump_seed = [bump];
    let seeds = escrow_signer_seeds(depositor.key, &bump_seed);
    create_pda_account(
        depositor,
        escrow_state,
        system_program,
        program_id,
        Escrow::LEN,
        &seeds,
    )?;

    escrow.serialize(&mut &mut escrow_state.data.borrow_mut()[..])?;

    msg!(
        "Escrow created: depositor={}, recipient={}, amount={}, expiry={}",
        escrow.depositor,
        escrow.recipient,
        escrow.amount,
        escrow.expiry
    );
    Ok(())
}

pub fn fund_escrow(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let accs = &mut accounts.iter();

    let depositor = next_account_info(accs)?;
    let escrow_state = next_account_info(accs)?;
    let mint = next_account_info(accs)?;
    let depositor_token = next_account_info(accs)?;
    let escrow_vault = next_account_info(accs)?;
    let token_program = next_account_info(accs)?;
    let associated_token_program = next_account_info(accs)?;
    let system_program = next_account_info(accs)?;

    assert_signer(depositor)?;
    assert_program(token_program, &spl_token::id())?;
    assert_program(associated_token_program, &spl_associated_token_account::id())?;
    assert_program(system_program, &system_program::id())?;
    assert_escrow_address(program_id, depositor.key, escrow_state)?;

    let mut escrow = load_escrow(program_id, escrow_state)?;
    escrow.fund(depositor.key)?;

    let mint_info = assert_mint(mint, &escrow.mint)?;
    let source = load_token_account(depositor_token, &escrow.mint, depositor.key)?;
    if source.amount < escrow.amount {
        return Err(EscrowError::InsufficientFunds.into());
    }
    assert_escrow_token_address(escrow_vault, escrow_state.key, &escrow.mint)?;

    invoke(
        &create_associated_token_account_idempotent(
            depositor.key,
            escrow_state.key,
            mint.key,
            token_program.key,
        ),
        &[
            depositor.clone(),
            escrow_vault.clone(),
            escrow_state.clone(),
            mint.clone(),
            system_program.clone(),
            token_program.clone(),
            associated_token_program.clone(),
        ],
    )?;
    load_token_account(escrow_vault, &escrow.mint, escrow_state.key)?;

    invoke(
        &instruction::transfer_checked(
            token_program.key,
            depositor_token.key,
            mint.key,
            escrow_vault.key,
            depositor.key,
            &[],
            escrow.amount,
            mint_info.decimals,
        )?,
        &[
            depositor_token.clone(),
            mint.clone(),
            escrow_vault.clone(),
            depositor.clone(),
            token_program.clone(),
        ],
    )?;

    escrow.serialize(&mut &mut escrow_state.data.borrow_mut()[..])?;

    msg!(
        "Escrow funded: depositor={}, vault={}, amount={}",
        escrow.depositor,
        escrow_vault.key,
        escrow.amount
    );
    Ok(())
}

pub fn withdraw_escrow(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let accs = &mut accounts.iter();

    let recipient = next_account_info(accs)?;
    let depositor = next_account_info(accs)?;
    let escrow_state = next_account_info(accs)?;
    let mint = next_account_info(accs)?;
    let recipient_token = next_account_info(accs)?;
    let escrow_vault = next_account_info(accs)?;
    let token_program = next_account_info(accs)?;

    assert_signer(recipient)?;
    assert_program(token_program, &spl_token::id())?;
    assert_escrow_address(program_id, depositor.key, escrow_state)?;

    let mut escrow = load_escrow(program_id, escrow_state)?;
    let now = Clock::get()?.unix_timestamp;
    escrow.withdraw(recipient.key, now)?;

    let mint_info = assert_mint(mint, &escrow.mint)?;
    load_token_account(recipient_token, &escrow.mint, recipient.key)?;
    assert_escrow_token_address(escrow_vault, escrow_state.key, &escrow.mint)?;
    let vault = load_token_account(escrow_vault, &escrow.mint, escrow_state.key)?;

    release_vault(
        escrow_state,
        escrow_vault,
        mint,
        recipient_token,
        depositor,
        token_program,
        &escrow,
        vault.amount,
        mint_info.decimals,
    )?;

    escrow.serialize(&mut &mut escrow_state.data.borrow_mut()[..])?;

    msg!(
        "Escrow withdrawn: recipient={}, amount={}",
        escrow.recipient,
        vault.amount
    );
    Ok(())
}

pub fn cancel_escrow(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let accs = &mut accounts.iter();

    let depositor = next_account_info(accs)?;
    let escrow_state = next_account_info(accs)?;
    let mint = next_account_info(accs)?;
    let depositor_token = next_account_info(accs)?;
    let escrow_vault = next_account_info(accs)?;
    let token_program = next_account_info(accs)?;

    assert_signer(depositor)?;
    assert_program(token_program, &spl_token::id())?;
    assert_escrow_address(program_id, depositor.key, escrow_state)?;

    let mut escrow = load_escrow(program_id, escrow_state)?;
    let now = Clock::get()?.unix_timestamp;
    let previous = escrow.cancel(depositor.key, now)?;

    let mut refunded = 0;
    if previous == EscrowStatus::Funded {
        let mint_info = assert_mint(mint, &escrow.mint)?;
        load_token_account(depositor_token, &escrow.mint, depositor.key)?;
        assert_escrow_token_address(escrow_vault, escrow_state.key, &escrow.mint)?;
        let vault = load_token_account(escrow_vault, &escrow.mint, escrow_state.key)?;

        release_vault(
            escrow_state,
            escrow_vault,
            mint,
            depositor_token,
            depositor,
            token_program,
            &escrow,
            vault.amount,
            mint_info.decimals,
        )?;
        refunded = vault.amount;
    }

    escrow.serialize(&mut &mut escrow_state.data.borrow_mut()[..])?;

    msg!(
        "Escrow cancelled: depositor={}, refunded={}",
        escrow.depositor,
        refunded
    );
    Ok(())
}

pub fn close_escrow(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let accs = &mut accounts.iter();

    let depositor = next_account_info(accs)?;
    let escrow_state = next_account_info(accs)?;

    assert_signer(depositor)?;
    assert_escrow_address(program_id, depositor.key, escrow_state)?;

    let escrow = load_escrow(program_id, escrow_state)?;
    escrow.ensure_closable(depositor.key)?;

    let reclaimed = escrow_state.lamports();
    let depositor_lamports = depositor
        .lamports()
        .checked_add(reclaimed)
        .ok_or(ProgramError::ArithmeticOverflow)?;
    **depositor.try_borrow_mut_lamports()? = depositor_lamports;
    **escrow_state.try_borrow_mut_lamports()? = 0;
    escrow_state.data.borrow_mut().fill(0);
    escrow_state.resize(0)?;
    escrow_state.assign(&system_program::id());

    msg!(
        "Escrow closed: depositor={}, reclaimed={}",
        escrow.depositor,
        reclaimed
    );
    Ok(())
}

/// Moves the full vault balance to `destination` and closes the vault,
/// sending its rent to the depositor. The record signs as vault owner.
#[allow(clippy::too_many_arguments)]
fn release_vault<'a>(
    escrow_state: &AccountInfo<'a>,
    escrow_vault: &AccountInfo<'a>,
    mint: &AccountInfo<'a>,
    destination: &AccountInfo<'a>,
    depositor: &AccountInfo<'a>,
    token_program: &AccountInfo<'a>,
    escrow: &Escrow,
    amount: u64,
    decimals: u8,
) -> ProgramResult {
    let bump_seed = [escrow.bump];
    let seeds = escrow_signer_seeds(&escrow.depositor, &bump_seed);

    invoke_signed(
        &instruction::transfer_checked(
            token_program.key,
            escrow_vault.key,
            mint.key,
            destination.key,
            escrow_state.key,
            &[],
            amount,
            decimals,
        )?,
        &[
            escrow_vault.clone(),
            mint.clone(),
            destination.clone(),
            escrow_state.clone(),
            token_program.clone(),
        ],
        &[&seeds[..]],
    )?;

    invoke_signed(
        &instruction::close_account(
            token_program.key,
            escrow_vault.key,
            depositor.key,
            escrow_state.key,
            &[],
        )?,
        &[
            escrow_vault.clone(),
            depositor.clone(),
            escrow_state.clone(),
            token_program.clone(),
        ],
        &[&seeds[..]],
    )?;

    Ok(())
}

/// Allocates a program-owned PDA, tolerating lamports sent to the address
/// before creation.
fn create_pda_account<'a>(
    payer: &AccountInfo<'a>,
    new_account: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    owner: &Pubkey,
    space: usize,
    seeds: &[&[u8]],
) -> ProgramResult {
    let rent = Rent::get()?;
    let required = rent.minimum_balance(space);
    let current = new_account.lamports();

    if current == 0 {
        return invoke_signed(
            &system_instruction::create_account(
                payer.key,
                new_account.key,
                required,
                space as u64,
                owner,
            ),
            &[payer.clone(), new_account.clone(), system_program.clone()],
            &[seeds],
        );
    }

    let top_up = required.saturating_sub(current);
    if top_up > 0 {
        invoke(
            &system_instruction::transfer(payer.key, new_account.key, top_up),
            &[payer.clone(), new_account.clone(), system_program.clone()],
        )?;
    }
    invoke_signed(
        &system_instruction::allocate(new_account.key, space as u64),
        &[new_account.clone(), system_program.clone()],
        &[seeds],
    )?;
    invoke_signed(
        &system_instruction::assign(new_account.key, owner),
        &[new_account.clone(), system_program.clone()],
        &[seeds],
    )
}
