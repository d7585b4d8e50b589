//! Transaction message compilation, wire format, and signing.
//!
//! Messages are compiled and serialized by hand. A signed transaction is a
//! compact-u16 signature count, one 64-byte ed25519 signature per required
//! signer, then the message: a three-byte header (required signatures,
//! read-only signed, read-only unsigned), the account key table, the recent
//! blockhash and the compiled instructions. Each instruction carries its
//! program index, a compact-u16 prefixed list of account indices and
//! compact-u16 prefixed data. Variable-length counts use compact-u16.

use crate::address::{bytes_to_address, Pubkey};
use crate::error::SolError;
use crate::keypair::Signer;

/// Account indices are single bytes on the wire.
const MAX_ACCOUNT_KEYS: usize = 256;

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` as compact-u16: seven bits per byte, least significant
/// group first, high bit set while more bytes follow. At most three bytes.
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut rest = u32::from(value);
    let mut out = Vec::with_capacity(3);
    while rest >= 0x80 {
        out.push((rest as u8 & 0x7f) | 0x80);
        rest >>= 7;
    }
    out.push(rest as u8);
    out
}

/// Decode a compact-u16 value from a byte slice.
///
/// Returns `(value, bytes_consumed)` or an error if the data is truncated.
pub fn decode_compact_u16(data: &[u8]) -> Result<(u16, usize), SolError> {
    let mut value: u32 = 0;
    let mut shift = 0u32;
    let mut consumed = 0usize;

    loop {
        let byte = *data.get(consumed).ok_or_else(|| {
            SolError::SerializationError("unexpected end of data while decoding compact-u16".into())
        })?;
        consumed += 1;

        value |= ((byte & 0x7f) as u32) << shift;
        shift += 7;

        if byte & 0x80 == 0 || consumed >= 3 {
            break;
        }
    }

    let value = u16::try_from(value)
        .map_err(|_| SolError::SerializationError("compact-u16 value overflow".into()))?;

    Ok((value, consumed))
}

fn compact_len(len: usize, what: &str) -> Result<Vec<u8>, SolError> {
    let len = u16::try_from(len)
        .map_err(|_| SolError::SerializationError(format!("{what} length {len} exceeds u16")))?;
    Ok(encode_compact_u16(len))
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A single account reference in an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    /// A writable account reference.
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    /// A read-only account reference.
    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// An instruction before it is compiled into a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// A compiled, unsigned transaction message.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Signers first (writable, then read-only), then writable and read-only
    /// non-signers. The fee payer is always at index 0.
    pub account_keys: Vec<Pubkey>,
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,
    pub recent_blockhash: [u8; 32],
    pub compiled_instructions: Vec<CompiledInstruction>,
}

impl Transaction {
    /// The public keys that must sign, in signature-slot order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        &self.account_keys[..self.num_required_signatures as usize]
    }
}

/// An instruction with its keys replaced by positions in `account_keys`.
#[derive(Debug, Clone)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// Compile a set of instructions into a message with a single fee payer.
///
/// The fee payer is always a writable signer placed at index 0.
pub fn compile_transaction(
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    recent_blockhash: &[u8; 32],
) -> Result<Transaction, SolError> {
    struct AccountEntry {
        pubkey: Pubkey,
        is_signer: bool,
        is_writable: bool,
    }

    // Instruction account lists are tiny, a linear scan beats hashing here.
    let mut entries: Vec<AccountEntry> = Vec::new();

    let mut upsert = |pubkey: Pubkey, signer: bool, writable: bool| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
            entry.is_signer |= signer;
            entry.is_writable |= writable;
        } else {
            entries.push(AccountEntry {
                pubkey,
                is_signer: signer,
                is_writable: writable,
            });
        }
    };

    upsert(*fee_payer, true, true);

    for ix in instructions {
        for meta in &ix.accounts {
            upsert(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        upsert(ix.program_id, false, false);
    }

    if entries.len() > MAX_ACCOUNT_KEYS {
        return Err(SolError::TransactionBuildError(format!(
            "{} account keys exceed the limit of {MAX_ACCOUNT_KEYS}",
            entries.len()
        )));
    }

    // Stable sort keeps insertion order within a category, so the fee payer
    // stays first among the writable signers.
    entries.sort_by_key(|e| match (e.is_signer, e.is_writable) {
        (true, true) => 0u8,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    });

    let count = |what: &str, f: fn(&AccountEntry) -> bool| -> Result<u8, SolError> {
        let n = entries.iter().filter(|e| f(e)).count();
        u8::try_from(n).map_err(|_| {
            SolError::TransactionBuildError(format!("{n} {what} do not fit the message header"))
        })
    };
    let num_required_signatures = count("signers", |e| e.is_signer)?;
    let num_readonly_signed = count("read-only signers", |e| e.is_signer && !e.is_writable)?;
    let num_readonly_unsigned =
        count("read-only accounts", |e| !e.is_signer && !e.is_writable)?;

    let account_keys: Vec<Pubkey> = entries.iter().map(|e| e.pubkey).collect();

    let index_of = |key: &Pubkey| -> Result<u8, SolError> {
        account_keys
            .iter()
            .position(|k| k == key)
            .map(|i| i as u8)
            .ok_or_else(|| {
                SolError::TransactionBuildError(format!(
                    "account {} not in account keys",
                    bytes_to_address(key)
                ))
            })
    };

    let mut compiled = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let program_id_index = index_of(&ix.program_id)?;
        let account_indices = ix
            .accounts
            .iter()
            .map(|meta| index_of(&meta.pubkey))
            .collect::<Result<Vec<_>, _>>()?;

        compiled.push(CompiledInstruction {
            program_id_index,
            account_indices,
            data: ix.data.clone(),
        });
    }

    Ok(Transaction {
        account_keys,
        num_required_signatures,
        num_readonly_signed,
        num_readonly_unsigned,
        recent_blockhash: *recent_blockhash,
        compiled_instructions: compiled,
    })
}

/// Serialize the transaction message (the bytes that get signed).
pub fn serialize_message(tx: &Transaction) -> Result<Vec<u8>, SolError> {
    let mut buf = Vec::with_capacity(256);

    buf.push(tx.num_required_signatures);
    buf.push(tx.num_readonly_signed);
    buf.push(tx.num_readonly_unsigned);

    buf.extend_from_slice(&compact_len(tx.account_keys.len(), "account keys")?);
    for key in &tx.account_keys {
        buf.extend_from_slice(key);
    }

    buf.extend_from_slice(&tx.recent_blockhash);

    buf.extend_from_slice(&compact_len(tx.compiled_instructions.len(), "instructions")?);
    for ix in &tx.compiled_instructions {
        buf.push(ix.program_id_index);

        buf.extend_from_slice(&compact_len(ix.account_indices.len(), "instruction accounts")?);
        buf.extend_from_slice(&ix.account_indices);

        buf.extend_from_slice(&compact_len(ix.data.len(), "instruction data")?);
        buf.extend_from_slice(&ix.data);
    }

    Ok(buf)
}

/// Sign and serialize a transaction into its wire format.
///
/// Every key in [`Transaction::signer_keys`] must be covered by one of
/// `signers`; extra signers are ignored.
pub fn sign_transaction(tx: &Transaction, signers: &[&dyn Signer]) -> Result<Vec<u8>, SolError> {
    let message_bytes = serialize_message(tx)?;
    let required = tx.signer_keys();

    let mut wire = Vec::with_capacity(3 + 64 * required.len() + message_bytes.len());
    wire.extend_from_slice(&compact_len(required.len(), "signatures")?);

    for key in required {
        let signer = signers.iter().find(|s| s.pubkey() == *key).ok_or_else(|| {
            SolError::SigningError(format!(
                "missing signer for required key {}",
                bytes_to_address(key)
            ))
        })?;
        wire.extend_from_slice(&signer.try_sign_message(&message_bytes)?);
    }

    wire.extend_from_slice(&message_bytes);

    Ok(wire)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::Keypair;
    use crate::program_ids::SYSTEM_PROGRAM_ID;
    use crate::system_program;

    // -- compact-u16 --------------------------------------------------------

    #[test]
    fn compact_u16_boundaries() {
        assert_eq!(encode_compact_u16(0), vec![0x00]);
        assert_eq!(encode_compact_u16(0x7f), vec![0x7f]);
        assert_eq!(encode_compact_u16(128), vec![0x80, 0x01]);
        assert_eq!(encode_compact_u16(16383), vec![0xff, 0x7f]);
        assert_eq!(encode_compact_u16(16384), vec![0x80, 0x80, 0x01]);
        assert_eq!(encode_compact_u16(u16::MAX), vec![0xff, 0xff, 0x03]);
    }

    #[test]
    fn decode_compact_u16_roundtrip() {
        for value in [0u16, 1, 127, 128, 255, 256, 16383, 16384, 65535] {
            let encoded = encode_compact_u16(value);
            let (decoded, len) = decode_compact_u16(&encoded).unwrap();
            assert_eq!(decoded, value, "roundtrip failed for {value}");
            assert_eq!(len, encoded.len());
        }
    }

    #[test]
    fn decode_compact_u16_empty_input_fails() {
        assert!(decode_compact_u16(&[]).is_err());
    }

    #[test]
    fn decode_compact_u16_truncated_fails() {
        assert!(decode_compact_u16(&[0x80]).is_err());
    }

    // -- compilation ----------------------------------------------------------

    #[test]
    fn compiled_transaction_account_order() {
        let from = [1u8; 32];
        let to = [2u8; 32];
        let ix = system_program::transfer(&from, &to, 1000);
        let tx = compile_transaction(&[ix], &from, &[0xAA; 32]).unwrap();

        // from (signer+writable), to (writable), system program (read-only)
        assert_eq!(tx.account_keys, vec![from, to, SYSTEM_PROGRAM_ID]);
        assert_eq!(tx.num_required_signatures, 1);
        assert_eq!(tx.num_readonly_signed, 0);
        assert_eq!(tx.num_readonly_unsigned, 1);
        assert_eq!(tx.recent_blockhash, [0xAA; 32]);
    }

    #[test]
    fn fee_payer_stays_first_among_signers() {
        let payer = [9u8; 32];
        let other_signer = [1u8; 32];
        let ix = system_program::transfer(&other_signer, &[2u8; 32], 5);
        let tx = compile_transaction(&[ix], &payer, &[0u8; 32]).unwrap();
        assert_eq!(tx.account_keys[0], payer);
        assert_eq!(tx.signer_keys(), &[payer, other_signer]);
    }

    #[test]
    fn compiled_instruction_indices() {
        let from = [1u8; 32];
        let to = [2u8; 32];
        let ix = system_program::transfer(&from, &to, 100);
        let tx = compile_transaction(&[ix], &from, &[0u8; 32]).unwrap();

        let cix = &tx.compiled_instructions[0];
        assert_eq!(cix.program_id_index, 2);
        assert_eq!(cix.account_indices, vec![0, 1]);
    }

    #[test]
    fn too_many_signers_is_an_error() {
        let payer = [0u8; 32];
        let accounts = (1..=255u8)
            .map(|i| {
                let mut key = [i; 32];
                key[31] = 0xEE;
                AccountMeta::new_readonly(key, true)
            })
            .collect();
        let ix = Instruction {
            program_id: [0xFF; 32],
            accounts,
            data: vec![],
        };
        // 256 signers plus the program: the key table overflows before the header does.
        let err = compile_transaction(&[ix.clone()], &payer, &[0u8; 32]).unwrap_err();
        assert!(matches!(err, SolError::TransactionBuildError(_)));

        // 256 signers and nothing else: the header count itself overflows.
        let mut only_signers = ix;
        only_signers.program_id = payer;
        let err = compile_transaction(&[only_signers], &payer, &[0u8; 32]).unwrap_err();
        assert!(err.to_string().contains("256 signers"));
    }

    #[test]
    fn duplicate_accounts_are_merged() {
        let key = [0xAAu8; 32];
        let ix = system_program::transfer(&key, &key, 100);
        let tx = compile_transaction(&[ix], &key, &[0u8; 32]).unwrap();
        assert_eq!(tx.account_keys.len(), 2);
    }

    // -- serialization & signing -------------------------------------------

    #[test]
    fn serialize_message_layout() {
        let from = [1u8; 32];
        let ix = system_program::transfer(&from, &[2u8; 32], 500);
        let tx = compile_transaction(&[ix], &from, &[0xCC; 32]).unwrap();
        let msg = serialize_message(&tx).unwrap();

        assert_eq!(&msg[..3], &[1, 0, 1]);
        let offset = 3 + 1 + 32 * tx.account_keys.len();
        assert_eq!(&msg[offset..offset + 32], &[0xCC; 32]);
    }

    #[test]
    fn sign_transaction_with_two_signers() {
        use ed25519_dalek::{Signature, VerifyingKey};

        let payer = Keypair::from_seed(&[0x42; 32]);
        let new_account = Keypair::from_seed(&[0x43; 32]);
        let ix = system_program::create_account(
            &payer.pubkey(),
            &new_account.pubkey(),
            1_000,
            200,
            &[5u8; 32],
        );
        let tx = compile_transaction(&[ix], &payer.pubkey(), &[0x11; 32]).unwrap();
        let wire = sign_transaction(&tx, &[&new_account, &payer]).unwrap();

        assert_eq!(wire[0], 2);
        let message = &wire[1 + 128..];
        for (slot, key) in tx.signer_keys().iter().enumerate() {
            let sig: [u8; 64] = wire[1 + 64 * slot..1 + 64 * (slot + 1)].try_into().unwrap();
            let vk = VerifyingKey::from_bytes(key).unwrap();
            assert!(vk.verify_strict(message, &Signature::from_bytes(&sig)).is_ok());
        }
    }

    #[test]
    fn sign_transaction_missing_signer_fails() {
        let payer = Keypair::from_seed(&[0x42; 32]);
        let new_account = Keypair::from_seed(&[0x43; 32]);
        let ix = system_program::create_account(
            &payer.pubkey(),
            &new_account.pubkey(),
            1_000,
            200,
            &[5u8; 32],
        );
        let tx = compile_transaction(&[ix], &payer.pubkey(), &[0x11; 32]).unwrap();
        let err = sign_transaction(&tx, &[&payer]).unwrap_err();
        assert!(err.to_string().contains("missing signer"));
    }

    #[test]
    fn signing_is_deterministic() {
        let payer = Keypair::from_seed(&[0x55; 32]);
        let ix = system_program::transfer(&payer.pubkey(), &[0x77; 32], 42);
        let tx = compile_transaction(&[ix], &payer.pubkey(), &[0x99; 32]).unwrap();
        assert_eq!(
            sign_transaction(&tx, &[&payer]).unwrap(),
            sign_transaction(&tx, &[&payer]).unwrap()
        );
    }
}
