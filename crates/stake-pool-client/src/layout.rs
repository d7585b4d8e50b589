//! Instruction data layouts.
//!
//! Every stake pool instruction is a one-byte discriminant followed by its
//! fields in declared order, little-endian. Layouts are plain data: a
//! static registry maps each [`InstructionKind`] to its fixed layout, and
//! the two token-metadata instructions get a layout sized to their strings
//! from [`token_metadata_layout`].

use std::borrow::Cow;

use sol_primitives::Pubkey;

use crate::error::StakePoolError;

/// Metadata string limits enforced by the token metadata program.
pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_SYMBOL_LENGTH: usize = 10;
pub const MAX_URI_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Wire type of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    U64,
    I64,
    Pubkey,
    Bool,
    /// u32 LE length marker followed by exactly this many bytes.
    Blob(usize),
}

impl FieldKind {
    /// Bytes this field occupies on the wire, length marker included.
    pub const fn span(&self) -> usize {
        match self {
            FieldKind::U8 | FieldKind::Bool => 1,
            FieldKind::U16 => 2,
            FieldKind::U32 => 4,
            FieldKind::U64 | FieldKind::I64 => 8,
            FieldKind::Pubkey => 32,
            FieldKind::Blob(len) => 4 + *len,
        }
    }
}

/// A named field in a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// A decoded or to-be-encoded field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I64(i64),
    Pubkey(Pubkey),
    Bool(bool),
    Blob(Vec<u8>),
}

impl FieldValue {
    fn matches(&self, kind: &FieldKind) -> bool {
        matches!(
            (self, kind),
            (FieldValue::U8(_), FieldKind::U8)
                | (FieldValue::U16(_), FieldKind::U16)
                | (FieldValue::U32(_), FieldKind::U32)
                | (FieldValue::U64(_), FieldKind::U64)
                | (FieldValue::I64(_), FieldKind::I64)
                | (FieldValue::Pubkey(_), FieldKind::Pubkey)
                | (FieldValue::Bool(_), FieldKind::Bool)
        ) || matches!((self, kind), (FieldValue::Blob(b), FieldKind::Blob(len)) if b.len() == *len)
    }
}

/// Discriminant plus ordered fields of one instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionLayout {
    pub index: u8,
    pub fields: Cow<'static, [FieldSpec]>,
}

impl InstructionLayout {
    const fn fixed(index: u8, fields: &'static [FieldSpec]) -> Self {
        Self {
            index,
            fields: Cow::Borrowed(fields),
        }
    }

    /// Total encoded length, discriminant included.
    pub fn span(&self) -> usize {
        1 + self.fields.iter().map(|f| f.kind.span()).sum::<usize>()
    }
}

/// Layout for `CreateTokenMetadata` / `UpdateTokenMetadata` sized exactly
/// to the given string lengths.
pub fn token_metadata_layout(
    index: u8,
    name_len: usize,
    symbol_len: usize,
    uri_len: usize,
) -> InstructionLayout {
    InstructionLayout {
        index,
        fields: Cow::Owned(vec![
            FieldSpec::new("name", FieldKind::Blob(name_len)),
            FieldSpec::new("symbol", FieldKind::Blob(symbol_len)),
            FieldSpec::new("uri", FieldKind::Blob(uri_len)),
        ]),
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Encode `values` under `layout`. The output is exactly `layout.span()`
/// bytes, discriminant first.
pub fn encode(layout: &InstructionLayout, values: &[FieldValue]) -> Result<Vec<u8>, StakePoolError> {
    if values.len() != layout.fields.len() {
        return Err(StakePoolError::InvalidInstructionData(format!(
            "layout {} has {} fields, got {} values",
            layout.index,
            layout.fields.len(),
            values.len()
        )));
    }

    let mut data = Vec::with_capacity(layout.span());
    data.push(layout.index);

    for (spec, value) in layout.fields.iter().zip(values) {
        if !value.matches(&spec.kind) {
            return Err(StakePoolError::InvalidInstructionData(format!(
                "field `{}` expects {:?}, got {:?}",
                spec.name, spec.kind, value
            )));
        }
        match value {
            FieldValue::U8(v) => data.push(*v),
            FieldValue::U16(v) => data.extend_from_slice(&v.to_le_bytes()),
            FieldValue::U32(v) => data.extend_from_slice(&v.to_le_bytes()),
            FieldValue::U64(v) => data.extend_from_slice(&v.to_le_bytes()),
            FieldValue::I64(v) => data.extend_from_slice(&v.to_le_bytes()),
            FieldValue::Pubkey(v) => data.extend_from_slice(v),
            FieldValue::Bool(v) => data.push(u8::from(*v)),
            FieldValue::Blob(v) => {
                let len = u32::try_from(v.len()).map_err(|_| {
                    StakePoolError::InvalidInstructionData(format!(
                        "field `{}` is too long",
                        spec.name
                    ))
                })?;
                data.extend_from_slice(&len.to_le_bytes());
                data.extend_from_slice(v);
            }
        }
    }

    Ok(data)
}

/// Decode `data` under `layout`, checking the discriminant first.
pub fn decode(layout: &InstructionLayout, data: &[u8]) -> Result<Vec<FieldValue>, StakePoolError> {
    let (&actual, mut rest) = data
        .split_first()
        .ok_or_else(|| StakePoolError::InvalidInstructionData("empty instruction data".into()))?;
    if actual != layout.index {
        return Err(StakePoolError::InstructionLayoutMismatch {
            expected: layout.index,
            actual,
        });
    }

    let mut values = Vec::with_capacity(layout.fields.len());
    for spec in layout.fields.iter() {
        let value = match spec.kind {
            FieldKind::U8 => FieldValue::U8(take::<1>(&mut rest, spec)?[0]),
            FieldKind::U16 => FieldValue::U16(u16::from_le_bytes(take(&mut rest, spec)?)),
            FieldKind::U32 => FieldValue::U32(u32::from_le_bytes(take(&mut rest, spec)?)),
            FieldKind::U64 => FieldValue::U64(u64::from_le_bytes(take(&mut rest, spec)?)),
            FieldKind::I64 => FieldValue::I64(i64::from_le_bytes(take(&mut rest, spec)?)),
            FieldKind::Pubkey => FieldValue::Pubkey(take(&mut rest, spec)?),
            FieldKind::Bool => match take::<1>(&mut rest, spec)?[0] {
                0 => FieldValue::Bool(false),
                1 => FieldValue::Bool(true),
                other => {
                    return Err(StakePoolError::InvalidInstructionData(format!(
                        "field `{}` has invalid bool byte {other}",
                        spec.name
                    )))
                }
            },
            FieldKind::Blob(len) => {
                let marker = u32::from_le_bytes(take(&mut rest, spec)?) as usize;
                if marker != len {
                    return Err(StakePoolError::InvalidInstructionData(format!(
                        "field `{}` length marker is {marker}, layout expects {len}",
                        spec.name
                    )));
                }
                if rest.len() < len {
                    return Err(truncated(spec));
                }
                let (blob, tail) = rest.split_at(len);
                rest = tail;
                FieldValue::Blob(blob.to_vec())
            }
        };
        values.push(value);
    }

    if !rest.is_empty() {
        return Err(StakePoolError::InvalidInstructionData(format!(
            "{} trailing bytes after layout {}",
            rest.len(),
            layout.index
        )));
    }
    Ok(values)
}

fn take<const N: usize>(rest: &mut &[u8], spec: &FieldSpec) -> Result<[u8; N], StakePoolError> {
    if rest.len() < N {
        return Err(truncated(spec));
    }
    let (head, tail) = rest.split_at(N);
    *rest = tail;
    let mut out = [0u8; N];
    out.copy_from_slice(head);
    Ok(out)
}

fn truncated(spec: &FieldSpec) -> StakePoolError {
    StakePoolError::InvalidInstructionData(format!("data truncated in field `{}`", spec.name))
}

// ---------------------------------------------------------------------------
// Instruction set
// ---------------------------------------------------------------------------

/// Instructions this client composes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    WithdrawStake,
    DepositSol,
    WithdrawSol,
    CreateTokenMetadata,
    UpdateTokenMetadata,
    Redelegate,
    WithdrawStakeWithSlippage,
    DepositSolWithSlippage,
    WithdrawSolWithSlippage,
}

const U64: FieldKind = FieldKind::U64;

const WITHDRAW_STAKE_LAYOUT: InstructionLayout =
    InstructionLayout::fixed(10, &[FieldSpec::new("pool_tokens", U64)]);
const DEPOSIT_SOL_LAYOUT: InstructionLayout =
    InstructionLayout::fixed(14, &[FieldSpec::new("lamports", U64)]);
const WITHDRAW_SOL_LAYOUT: InstructionLayout =
    InstructionLayout::fixed(16, &[FieldSpec::new("pool_tokens", U64)]);
const REDELEGATE_LAYOUT: InstructionLayout = InstructionLayout::fixed(
    22,
    &[
        FieldSpec::new("lamports", U64),
        FieldSpec::new("source_transient_stake_seed", U64),
        FieldSpec::new("ephemeral_stake_seed", U64),
        FieldSpec::new("destination_transient_stake_seed", U64),
    ],
);
const WITHDRAW_STAKE_WITH_SLIPPAGE_LAYOUT: InstructionLayout = InstructionLayout::fixed(
    24,
    &[
        FieldSpec::new("pool_tokens_in", U64),
        FieldSpec::new("minimum_lamports_out", U64),
    ],
);
const DEPOSIT_SOL_WITH_SLIPPAGE_LAYOUT: InstructionLayout = InstructionLayout::fixed(
    25,
    &[
        FieldSpec::new("lamports_in", U64),
        FieldSpec::new("minimum_pool_tokens_out", U64),
    ],
);
const WITHDRAW_SOL_WITH_SLIPPAGE_LAYOUT: InstructionLayout = InstructionLayout::fixed(
    26,
    &[
        FieldSpec::new("pool_tokens_in", U64),
        FieldSpec::new("minimum_lamports_out", U64),
    ],
);

impl InstructionKind {
    pub const ALL: [InstructionKind; 9] = [
        InstructionKind::WithdrawStake,
        InstructionKind::DepositSol,
        InstructionKind::WithdrawSol,
        InstructionKind::CreateTokenMetadata,
        InstructionKind::UpdateTokenMetadata,
        InstructionKind::Redelegate,
        InstructionKind::WithdrawStakeWithSlippage,
        InstructionKind::DepositSolWithSlippage,
        InstructionKind::WithdrawSolWithSlippage,
    ];

    /// On-chain discriminant.
    pub const fn index(self) -> u8 {
        match self {
            InstructionKind::WithdrawStake => 10,
            InstructionKind::DepositSol => 14,
            InstructionKind::WithdrawSol => 16,
            InstructionKind::CreateTokenMetadata => 17,
            InstructionKind::UpdateTokenMetadata => 18,
            InstructionKind::Redelegate => 22,
            InstructionKind::WithdrawStakeWithSlippage => 24,
            InstructionKind::DepositSolWithSlippage => 25,
            InstructionKind::WithdrawSolWithSlippage => 26,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.index() == index)
    }

    /// Registered layout, or `None` for the metadata instructions whose
    /// span depends on their strings.
    pub fn fixed_layout(self) -> Option<InstructionLayout> {
        match self {
            InstructionKind::WithdrawStake => Some(WITHDRAW_STAKE_LAYOUT),
            InstructionKind::DepositSol => Some(DEPOSIT_SOL_LAYOUT),
            InstructionKind::WithdrawSol => Some(WITHDRAW_SOL_LAYOUT),
            InstructionKind::Redelegate => Some(REDELEGATE_LAYOUT),
            InstructionKind::WithdrawStakeWithSlippage => Some(WITHDRAW_STAKE_WITH_SLIPPAGE_LAYOUT),
            InstructionKind::DepositSolWithSlippage => Some(DEPOSIT_SOL_WITH_SLIPPAGE_LAYOUT),
            InstructionKind::WithdrawSolWithSlippage => Some(WITHDRAW_SOL_WITH_SLIPPAGE_LAYOUT),
            InstructionKind::CreateTokenMetadata | InstructionKind::UpdateTokenMetadata => None,
        }
    }
}

/// Instruction data, one variant per supported instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakePoolInstruction {
    WithdrawStake {
        pool_tokens: u64,
    },
    DepositSol {
        lamports: u64,
    },
    WithdrawSol {
        pool_tokens: u64,
    },
    CreateTokenMetadata {
        name: String,
        symbol: String,
        uri: String,
    },
    UpdateTokenMetadata {
        name: String,
        symbol: String,
        uri: String,
    },
    Redelegate {
        lamports: u64,
        source_transient_stake_seed: u64,
        ephemeral_stake_seed: u64,
        destination_transient_stake_seed: u64,
    },
    WithdrawStakeWithSlippage {
        pool_tokens_in: u64,
        minimum_lamports_out: u64,
    },
    DepositSolWithSlippage {
        lamports_in: u64,
        minimum_pool_tokens_out: u64,
    },
    WithdrawSolWithSlippage {
        pool_tokens_in: u64,
        minimum_lamports_out: u64,
    },
}

impl StakePoolInstruction {
    pub fn kind(&self) -> InstructionKind {
        match self {
            Self::WithdrawStake { .. } => InstructionKind::WithdrawStake,
            Self::DepositSol { .. } => InstructionKind::DepositSol,
            Self::WithdrawSol { .. } => InstructionKind::WithdrawSol,
            Self::CreateTokenMetadata { .. } => InstructionKind::CreateTokenMetadata,
            Self::UpdateTokenMetadata { .. } => InstructionKind::UpdateTokenMetadata,
            Self::Redelegate { .. } => InstructionKind::Redelegate,
            Self::WithdrawStakeWithSlippage { .. } => InstructionKind::WithdrawStakeWithSlippage,
            Self::DepositSolWithSlippage { .. } => InstructionKind::DepositSolWithSlippage,
            Self::WithdrawSolWithSlippage { .. } => InstructionKind::WithdrawSolWithSlippage,
        }
    }

    /// Layout this instruction encodes under.
    pub fn layout(&self) -> InstructionLayout {
        match self {
            Self::CreateTokenMetadata { name, symbol, uri }
            | Self::UpdateTokenMetadata { name, symbol, uri } => {
                token_metadata_layout(self.kind().index(), name.len(), symbol.len(), uri.len())
            }
            Self::WithdrawStake { .. } => WITHDRAW_STAKE_LAYOUT,
            Self::DepositSol { .. } => DEPOSIT_SOL_LAYOUT,
            Self::WithdrawSol { .. } => WITHDRAW_SOL_LAYOUT,
            Self::Redelegate { .. } => REDELEGATE_LAYOUT,
            Self::WithdrawStakeWithSlippage { .. } => WITHDRAW_STAKE_WITH_SLIPPAGE_LAYOUT,
            Self::DepositSolWithSlippage { .. } => DEPOSIT_SOL_WITH_SLIPPAGE_LAYOUT,
            Self::WithdrawSolWithSlippage { .. } => WITHDRAW_SOL_WITH_SLIPPAGE_LAYOUT,
        }
    }

    fn values(&self) -> Vec<FieldValue> {
        use FieldValue::U64 as V;
        match self {
            Self::WithdrawStake { pool_tokens } | Self::WithdrawSol { pool_tokens } => {
                vec![V(*pool_tokens)]
            }
            Self::DepositSol { lamports } => vec![V(*lamports)],
            Self::CreateTokenMetadata { name, symbol, uri }
            | Self::UpdateTokenMetadata { name, symbol, uri } => vec![
                FieldValue::Blob(name.as_bytes().to_vec()),
                FieldValue::Blob(symbol.as_bytes().to_vec()),
                FieldValue::Blob(uri.as_bytes().to_vec()),
            ],
            Self::Redelegate {
                lamports,
                source_transient_stake_seed,
                ephemeral_stake_seed,
                destination_transient_stake_seed,
            } => vec![
                V(*lamports),
                V(*source_transient_stake_seed),
                V(*ephemeral_stake_seed),
                V(*destination_transient_stake_seed),
            ],
            Self::WithdrawStakeWithSlippage {
                pool_tokens_in,
                minimum_lamports_out,
            }
            | Self::WithdrawSolWithSlippage {
                pool_tokens_in,
                minimum_lamports_out,
            } => vec![V(*pool_tokens_in), V(*minimum_lamports_out)],
            Self::DepositSolWithSlippage {
                lamports_in,
                minimum_pool_tokens_out,
            } => vec![V(*lamports_in), V(*minimum_pool_tokens_out)],
        }
    }

    /// Serialize to instruction data. Metadata strings over their limits
    /// are rejected before anything is encoded.
    pub fn pack(&self) -> Result<Vec<u8>, StakePoolError> {
        if let Self::CreateTokenMetadata { name, symbol, uri }
        | Self::UpdateTokenMetadata { name, symbol, uri } = self
        {
            check_metadata_lengths(name, symbol, uri)?;
        }
        encode(&self.layout(), &self.values())
    }

    /// Parse instruction data produced by [`pack`](Self::pack).
    pub fn unpack(data: &[u8]) -> Result<Self, StakePoolError> {
        let index = *data
            .first()
            .ok_or_else(|| StakePoolError::InvalidInstructionData("empty instruction data".into()))?;
        let kind = InstructionKind::from_index(index).ok_or_else(|| {
            StakePoolError::InvalidInstructionData(format!("unknown instruction index {index}"))
        })?;

        let layout = match kind.fixed_layout() {
            Some(layout) => layout,
            None => metadata_layout_from_markers(index, &data[1..])?,
        };
        let values = decode(&layout, data)?;
        Self::from_values(kind, values)
    }

    fn from_values(kind: InstructionKind, values: Vec<FieldValue>) -> Result<Self, StakePoolError> {
        let mut fields = FieldReader(values.into_iter());
        let instruction = match kind {
            InstructionKind::WithdrawStake => Self::WithdrawStake {
                pool_tokens: fields.u64()?,
            },
            InstructionKind::DepositSol => Self::DepositSol {
                lamports: fields.u64()?,
            },
            InstructionKind::WithdrawSol => Self::WithdrawSol {
                pool_tokens: fields.u64()?,
            },
            InstructionKind::CreateTokenMetadata => Self::CreateTokenMetadata {
                name: fields.string()?,
                symbol: fields.string()?,
                uri: fields.string()?,
            },
            InstructionKind::UpdateTokenMetadata => Self::UpdateTokenMetadata {
                name: fields.string()?,
                symbol: fields.string()?,
                uri: fields.string()?,
            },
            InstructionKind::Redelegate => Self::Redelegate {
                lamports: fields.u64()?,
                source_transient_stake_seed: fields.u64()?,
                ephemeral_stake_seed: fields.u64()?,
                destination_transient_stake_seed: fields.u64()?,
            },
            InstructionKind::WithdrawStakeWithSlippage => Self::WithdrawStakeWithSlippage {
                pool_tokens_in: fields.u64()?,
                minimum_lamports_out: fields.u64()?,
            },
            InstructionKind::DepositSolWithSlippage => Self::DepositSolWithSlippage {
                lamports_in: fields.u64()?,
                minimum_pool_tokens_out: fields.u64()?,
            },
            InstructionKind::WithdrawSolWithSlippage => Self::WithdrawSolWithSlippage {
                pool_tokens_in: fields.u64()?,
                minimum_lamports_out: fields.u64()?,
            },
        };
        Ok(instruction)
    }
}

/// Pulls typed values off a decoded field list in order.
struct FieldReader(std::vec::IntoIter<FieldValue>);

impl FieldReader {
    fn u64(&mut self) -> Result<u64, StakePoolError> {
        match self.0.next() {
            Some(FieldValue::U64(v)) => Ok(v),
            other => Err(StakePoolError::InvalidInstructionData(format!(
                "expected u64 field, got {other:?}"
            ))),
        }
    }

    fn string(&mut self) -> Result<String, StakePoolError> {
        match self.0.next() {
            Some(FieldValue::Blob(bytes)) => String::from_utf8(bytes).map_err(|e| {
                StakePoolError::InvalidInstructionData(format!("metadata string: {e}"))
            }),
            other => Err(StakePoolError::InvalidInstructionData(format!(
                "expected string field, got {other:?}"
            ))),
        }
    }
}

/// Reject metadata strings longer than the token metadata program accepts.
pub fn check_metadata_lengths(name: &str, symbol: &str, uri: &str) -> Result<(), StakePoolError> {
    for (field, value, max) in [
        ("name", name, MAX_NAME_LENGTH),
        ("symbol", symbol, MAX_SYMBOL_LENGTH),
        ("uri", uri, MAX_URI_LENGTH),
    ] {
        if value.len() > max {
            return Err(StakePoolError::InvalidArgument(format!(
                "{field} is {} bytes, at most {max} allowed",
                value.len()
            )));
        }
    }
    Ok(())
}

/// Walk the three length markers of a metadata payload to size its layout.
fn metadata_layout_from_markers(index: u8, mut body: &[u8]) -> Result<InstructionLayout, StakePoolError> {
    let mut lens = [0usize; 3];
    for (slot, name) in lens.iter_mut().zip(["name", "symbol", "uri"]) {
        let spec = FieldSpec::new(name, FieldKind::U32);
        let len = u32::from_le_bytes(take(&mut body, &spec)?) as usize;
        if body.len() < len {
            return Err(truncated(&spec));
        }
        body = &body[len..];
        *slot = len;
    }
    Ok(token_metadata_layout(index, lens[0], lens[1], lens[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_layouts_have_expected_spans() {
        assert_eq!(WITHDRAW_STAKE_LAYOUT.span(), 9);
        assert_eq!(DEPOSIT_SOL_LAYOUT.span(), 9);
        assert_eq!(REDELEGATE_LAYOUT.span(), 33);
        assert_eq!(DEPOSIT_SOL_WITH_SLIPPAGE_LAYOUT.span(), 17);
    }

    #[test]
    fn registry_covers_every_kind() {
        for kind in InstructionKind::ALL {
            assert_eq!(InstructionKind::from_index(kind.index()), Some(kind));
            if let Some(layout) = kind.fixed_layout() {
                assert_eq!(layout.index, kind.index());
            }
        }
        assert_eq!(InstructionKind::from_index(0), None);
    }

    #[test]
    fn encode_writes_discriminant_then_fields() {
        let data = encode(&DEPOSIT_SOL_LAYOUT, &[FieldValue::U64(99_999)]).unwrap();
        assert_eq!(data.len(), DEPOSIT_SOL_LAYOUT.span());
        assert_eq!(data[0], 14);
        assert_eq!(&data[1..], &99_999u64.to_le_bytes());
    }

    #[test]
    fn encode_rejects_wrong_value_kind() {
        let err = encode(&DEPOSIT_SOL_LAYOUT, &[FieldValue::U32(1)]).unwrap_err();
        assert!(matches!(err, StakePoolError::InvalidInstructionData(_)));
        assert!(encode(&DEPOSIT_SOL_LAYOUT, &[]).is_err());
    }

    #[test]
    fn all_primitive_kinds_roundtrip() {
        let layout = InstructionLayout {
            index: 200,
            fields: Cow::Owned(vec![
                FieldSpec::new("a", FieldKind::U8),
                FieldSpec::new("b", FieldKind::U16),
                FieldSpec::new("c", FieldKind::U32),
                FieldSpec::new("d", FieldKind::I64),
                FieldSpec::new("e", FieldKind::Pubkey),
                FieldSpec::new("f", FieldKind::Bool),
                FieldSpec::new("g", FieldKind::Blob(3)),
            ]),
        };
        let values = vec![
            FieldValue::U8(u8::MAX),
            FieldValue::U16(0),
            FieldValue::U32(u32::MAX),
            FieldValue::I64(i64::MIN),
            FieldValue::Pubkey([9; 32]),
            FieldValue::Bool(true),
            FieldValue::Blob(b"abc".to_vec()),
        ];
        let data = encode(&layout, &values).unwrap();
        assert_eq!(data.len(), layout.span());
        assert_eq!(decode(&layout, &data).unwrap(), values);
    }

    #[test]
    fn decode_rejects_wrong_discriminant() {
        let data = encode(&DEPOSIT_SOL_LAYOUT, &[FieldValue::U64(1)]).unwrap();
        let err = decode(&WITHDRAW_SOL_LAYOUT, &data).unwrap_err();
        assert!(matches!(
            err,
            StakePoolError::InstructionLayoutMismatch { expected: 16, actual: 14 }
        ));
    }

    #[test]
    fn decode_rejects_truncated_and_trailing() {
        let mut data = encode(&WITHDRAW_STAKE_LAYOUT, &[FieldValue::U64(5)]).unwrap();
        assert!(matches!(
            decode(&WITHDRAW_STAKE_LAYOUT, &data[..5]).unwrap_err(),
            StakePoolError::InvalidInstructionData(_)
        ));
        data.push(0);
        assert!(matches!(
            decode(&WITHDRAW_STAKE_LAYOUT, &data).unwrap_err(),
            StakePoolError::InvalidInstructionData(_)
        ));
        assert!(decode(&WITHDRAW_STAKE_LAYOUT, &[]).is_err());
    }

    #[test]
    fn metadata_layout_is_sized_to_strings() {
        let layout = token_metadata_layout(17, 4, 4, 19);
        assert_eq!(layout.span(), 1 + (4 + 4) + (4 + 4) + (4 + 19));

        let ix = StakePoolInstruction::CreateTokenMetadata {
            name: "test".into(),
            symbol: "TEST".into(),
            uri: "https://example.com".into(),
        };
        let data = ix.pack().unwrap();
        assert_eq!(data.len(), layout.span());

        let values = decode(&layout, &data).unwrap();
        assert_eq!(values[0], FieldValue::Blob(b"test".to_vec()));
        assert_eq!(values[2], FieldValue::Blob(b"https://example.com".to_vec()));
    }

    #[test]
    fn metadata_length_marker_must_match_layout() {
        let data = StakePoolInstruction::UpdateTokenMetadata {
            name: "abc".into(),
            symbol: "A".into(),
            uri: "u".into(),
        }
        .pack()
        .unwrap();
        let err = decode(&token_metadata_layout(18, 4, 1, 1), &data).unwrap_err();
        assert!(matches!(err, StakePoolError::InvalidInstructionData(_)));
    }

    #[test]
    fn metadata_limits_are_enforced() {
        let too_long = StakePoolInstruction::CreateTokenMetadata {
            name: "n".repeat(33),
            symbol: "S".into(),
            uri: "u".into(),
        };
        assert!(matches!(too_long.pack().unwrap_err(), StakePoolError::InvalidArgument(_)));

        assert!(check_metadata_lengths(&"n".repeat(32), &"s".repeat(10), &"u".repeat(200)).is_ok());
        assert!(check_metadata_lengths("n", &"s".repeat(11), "u").is_err());
        assert!(check_metadata_lengths("n", "s", &"u".repeat(201)).is_err());
    }

    #[test]
    fn every_instruction_roundtrips_at_boundaries() {
        let instructions = vec![
            StakePoolInstruction::WithdrawStake { pool_tokens: 0 },
            StakePoolInstruction::WithdrawStake { pool_tokens: u64::MAX },
            StakePoolInstruction::DepositSol { lamports: u64::MAX },
            StakePoolInstruction::WithdrawSol { pool_tokens: 1 },
            StakePoolInstruction::CreateTokenMetadata {
                name: String::new(),
                symbol: String::new(),
                uri: String::new(),
            },
            StakePoolInstruction::UpdateTokenMetadata {
                name: "Pool ◎".into(),
                symbol: "POOL".into(),
                uri: "https://example.com/pool.json".into(),
            },
            StakePoolInstruction::Redelegate {
                lamports: u64::MAX,
                source_transient_stake_seed: 0,
                ephemeral_stake_seed: u64::MAX,
                destination_transient_stake_seed: 1,
            },
            StakePoolInstruction::WithdrawStakeWithSlippage {
                pool_tokens_in: 0,
                minimum_lamports_out: u64::MAX,
            },
            StakePoolInstruction::DepositSolWithSlippage {
                lamports_in: u64::MAX,
                minimum_pool_tokens_out: 0,
            },
            StakePoolInstruction::WithdrawSolWithSlippage {
                pool_tokens_in: 7,
                minimum_lamports_out: 8,
            },
        ];
        for ix in instructions {
            let data = ix.pack().unwrap();
            assert_eq!(data[0], ix.kind().index());
            assert_eq!(data.len(), ix.layout().span());
            assert_eq!(StakePoolInstruction::unpack(&data).unwrap(), ix);
        }
    }

    #[test]
    fn redelegate_wire_order() {
        let data = StakePoolInstruction::Redelegate {
            lamports: 100,
            source_transient_stake_seed: 10,
            ephemeral_stake_seed: 100,
            destination_transient_stake_seed: 20,
        }
        .pack()
        .unwrap();
        assert_eq!(data[0], 22);
        assert_eq!(&data[1..9], &100u64.to_le_bytes());
        assert_eq!(&data[9..17], &10u64.to_le_bytes());
        assert_eq!(&data[17..25], &100u64.to_le_bytes());
        assert_eq!(&data[25..33], &20u64.to_le_bytes());
    }

    #[test]
    fn unpack_rejects_unknown_and_invalid_utf8() {
        assert!(StakePoolInstruction::unpack(&[3, 0, 0]).is_err());

        let mut data = StakePoolInstruction::CreateTokenMetadata {
            name: "ab".into(),
            symbol: "c".into(),
            uri: "d".into(),
        }
        .pack()
        .unwrap();
        data[5] = 0xFF;
        assert!(StakePoolInstruction::unpack(&data).is_err());
    }

    #[test]
    fn unpack_rejects_truncated_metadata() {
        let data = StakePoolInstruction::CreateTokenMetadata {
            name: "abcdef".into(),
            symbol: "c".into(),
            uri: "d".into(),
        }
        .pack()
        .unwrap();
        assert!(StakePoolInstruction::unpack(&data[..8]).is_err());
    }
}
