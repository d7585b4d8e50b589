//! The composer's output: an ordered instruction list plus everything needed
//! to turn it into a signed transaction.

use sol_primitives::{
    compile_transaction, sign_transaction, Instruction, Keypair, Pubkey, Signer, Transaction,
};

use crate::error::StakePoolError;

/// Instructions for one operation, with the keypairs the engine generated
/// for accounts it creates.
///
/// A plan is built once per call and never mutated after it is returned.
#[derive(Debug)]
pub struct InstructionPlan {
    instructions: Vec<Instruction>,
    signers: Vec<Keypair>,
    fee_payer: Pubkey,
    stake_receiver: Option<Pubkey>,
    new_stake_accounts: Vec<Pubkey>,
    total_rent_free_balances: u64,
}

impl InstructionPlan {
    pub(crate) fn new(fee_payer: Pubkey) -> Self {
        Self {
            instructions: Vec::new(),
            signers: Vec::new(),
            fee_payer,
            stake_receiver: None,
            new_stake_accounts: Vec::new(),
            total_rent_free_balances: 0,
        }
    }

    pub(crate) fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Keep a generated keypair and return its address.
    pub(crate) fn add_signer(&mut self, keypair: Keypair) -> Pubkey {
        let pubkey = keypair.pubkey();
        self.signers.push(keypair);
        pubkey
    }

    /// Record a stake account created by the plan and the rent it locks up.
    pub(crate) fn add_new_stake_account(
        &mut self,
        stake_account: Pubkey,
        rent: u64,
    ) -> Result<(), StakePoolError> {
        self.new_stake_accounts.push(stake_account);
        self.total_rent_free_balances = self
            .total_rent_free_balances
            .checked_add(rent)
            .ok_or(StakePoolError::ArithmeticOverflow)?;
        Ok(())
    }

    pub(crate) fn set_stake_receiver(&mut self, stake_receiver: Option<Pubkey>) {
        self.stake_receiver = stake_receiver;
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Keypairs generated by the engine. They must co-sign the transaction.
    pub fn signers(&self) -> &[Keypair] {
        &self.signers
    }

    pub fn fee_payer(&self) -> &Pubkey {
        &self.fee_payer
    }

    /// Stake receiver the caller supplied, echoed back (withdraw-as-stake only).
    pub fn stake_receiver(&self) -> Option<&Pubkey> {
        self.stake_receiver.as_ref()
    }

    /// Stake accounts created by the plan, in instruction order.
    pub fn new_stake_accounts(&self) -> &[Pubkey] {
        &self.new_stake_accounts
    }

    /// Lamports locked as rent-exempt reserve in newly created accounts.
    pub fn total_rent_free_balances(&self) -> u64 {
        self.total_rent_free_balances
    }

    /// Every key that must sign, fee payer first, each once.
    pub fn required_signers(&self) -> Vec<Pubkey> {
        let mut keys = vec![self.fee_payer];
        for meta in self.instructions.iter().flat_map(|ix| &ix.accounts) {
            if meta.is_signer && !keys.contains(&meta.pubkey) {
                keys.push(meta.pubkey);
            }
        }
        keys
    }

    /// Required signers the caller has to provide (not generated here).
    pub fn external_signers(&self) -> Vec<Pubkey> {
        let generated: Vec<Pubkey> = self.signers.iter().map(Signer::pubkey).collect();
        self.required_signers()
            .into_iter()
            .filter(|key| !generated.contains(key))
            .collect()
    }

    /// Compile into an unsigned message against `recent_blockhash`.
    pub fn compile(&self, recent_blockhash: &[u8; 32]) -> Result<Transaction, StakePoolError> {
        Ok(compile_transaction(
            &self.instructions,
            &self.fee_payer,
            recent_blockhash,
        )?)
    }

    /// Compile and sign, returning the wire-format transaction.
    ///
    /// `external` covers the caller's keys (fee payer, token owner, authorities);
    /// the plan's own keypairs are added automatically.
    pub fn sign(
        &self,
        recent_blockhash: &[u8; 32],
        external: &[&dyn Signer],
    ) -> Result<Vec<u8>, StakePoolError> {
        let tx = self.compile(recent_blockhash)?;
        let mut signers: Vec<&dyn Signer> = external.to_vec();
        signers.extend(self.signers.iter().map(|k| k as &dyn Signer));
        Ok(sign_transaction(&tx, &signers)?)
    }
}
