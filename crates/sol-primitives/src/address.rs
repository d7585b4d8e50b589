//! Address encoding and validation.
//!
//! Addresses are Base58-encoded 32-byte Ed25519 public keys (or program
//! derived addresses, which share the same 32-byte shape). The canonical
//! alphabet is the Bitcoin Base58 alphabet used by the `bs58` crate.

use crate::error::SolError;

/// Raw 32-byte account address.
pub type Pubkey = [u8; 32];

const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const fn base58_digit(c: u8) -> u32 {
    let mut i = 0;
    while i < BASE58_ALPHABET.len() {
        if BASE58_ALPHABET[i] == c {
            return i as u32;
        }
        i += 1;
    }
    panic!("invalid base58 character in address");
}

/// Decode a Base58 address at compile time.
///
/// Meant for `const` items holding well-known program ids: an invalid
/// literal fails const evaluation instead of surfacing at runtime.
pub const fn const_address(address: &str) -> Pubkey {
    let input = address.as_bytes();
    let mut out = [0u8; 32];

    let mut leading_ones = 0;
    while leading_ones < input.len() && input[leading_ones] == b'1' {
        leading_ones += 1;
    }

    let mut i = 0;
    while i < input.len() {
        let mut carry = base58_digit(input[i]);
        let mut j = out.len();
        while j > 0 {
            j -= 1;
            carry += (out[j] as u32) * 58;
            out[j] = (carry & 0xff) as u8;
            carry >>= 8;
        }
        if carry != 0 {
            panic!("base58 address does not fit in 32 bytes");
        }
        i += 1;
    }

    // Leading '1's encode leading zero bytes one-for-one.
    let mut zero_bytes = 0;
    while zero_bytes < out.len() && out[zero_bytes] == 0 {
        zero_bytes += 1;
    }
    if zero_bytes != leading_ones {
        panic!("base58 address does not decode to exactly 32 bytes");
    }

    out
}

/// Validate an address string.
///
/// Returns `Ok(true)` if the string is Base58 and decodes to exactly 32
/// bytes, or an error describing why it does not.
pub fn validate_address(address: &str) -> Result<bool, SolError> {
    address_to_bytes(address).map(|_| true)
}

/// Decode an address string to its 32-byte representation.
pub fn address_to_bytes(address: &str) -> Result<Pubkey, SolError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| SolError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    let arr: Pubkey = bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })?;

    Ok(arr)
}

/// Encode 32 bytes as an address (Base58 string).
pub fn bytes_to_address(bytes: &Pubkey) -> String {
    bs58::encode(bytes).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The System Program address is 32 zero bytes, which encodes to
    /// "11111111111111111111111111111111" in Base58.
    #[test]
    fn system_program_address() {
        let zeros = [0u8; 32];
        assert_eq!(bytes_to_address(&zeros), "11111111111111111111111111111111");
        assert_eq!(const_address("11111111111111111111111111111111"), zeros);
    }

    #[test]
    fn roundtrip_encode_decode() {
        let address = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
        let bytes = address_to_bytes(address).unwrap();
        assert_eq!(bytes_to_address(&bytes), address);
    }

    #[test]
    fn const_decoder_matches_bs58() {
        for address in [
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
            "Stake11111111111111111111111111111111111111",
            "SysvarC1ock11111111111111111111111111111111",
            "Meta88XpDHcSJZDFiHop6c9sXaufkZX5depkZyrYBWv",
            "spooqgqqDxZgVc3pR6EvuVFZJ1kj7ABM4Hccz1gwAN1",
        ] {
            assert_eq!(const_address(address), address_to_bytes(address).unwrap());
        }
    }

    #[test]
    #[should_panic]
    fn const_decoder_rejects_short_input() {
        const_address("2");
    }

    #[test]
    #[should_panic]
    fn const_decoder_rejects_bad_alphabet() {
        const_address("0OIl");
    }

    #[test]
    fn validate_garbage_returns_error() {
        assert!(validate_address("not-a-valid-address!!!").is_err());
    }

    #[test]
    fn validate_too_short_returns_error() {
        // "1" decodes to a single zero byte, which is not 32 bytes.
        let err = validate_address("1").unwrap_err();
        assert!(err.to_string().contains("expected 32 bytes"));
    }

    #[test]
    fn validate_well_known_address() {
        assert!(validate_address("SPoo1Ku8WFXoNDMHPsrGSTSG1Y47rzgn41SLUNakuHy").unwrap());
    }
}
