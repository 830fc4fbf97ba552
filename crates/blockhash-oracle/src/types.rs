//! Block hashes and the proof's public-input layout
//!
//! ## Public inputs (198 field elements)
//!
//! - [0..64]: block hash, one nibble per element, most significant first
//! - [64..128]: parent hash, same encoding
//! - [128..134]: block height, 6 nibbles, most significant first
//! - [134..198]: circuit-internal values, carried through untouched

use crate::error::{OracleError, Result};
use std::fmt;
use std::str::FromStr;
use turbo_plonk_core::Fr;

/// Total public inputs per proof
pub const PUBLIC_INPUT_COUNT: usize = 198;

/// Inputs holding nibble-packed block metadata
pub const METADATA_INPUT_COUNT: usize = 134;

const HASH_NIBBLES: usize = 64;
const HEIGHT_NIBBLES: usize = 6;

/// Largest height expressible in 6 nibbles
pub const MAX_HEIGHT: u64 = (1 << (4 * HEIGHT_NIBBLES)) - 1;

/// 32-byte block identifier. All zeroes is the "unknown" sentinel of the
/// native lookback.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BlockHash(pub [u8; 32]);

impl BlockHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self)
    }
}

impl FromStr for BlockHash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut out = [0u8; 32];
        hex::decode_to_slice(s.trim_start_matches("0x"), &mut out)?;
        Ok(Self(out))
    }
}

impl From<[u8; 32]> for BlockHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Decoded public inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicInputs {
    pub block_hash: BlockHash,
    pub parent_hash: BlockHash,
    pub height: u64,
    /// Elements 134..198
    pub auxiliary: Vec<Fr>,
}

impl PublicInputs {
    pub fn decode(inputs: &[Fr]) -> Result<Self> {
        if inputs.len() != PUBLIC_INPUT_COUNT {
            return Err(OracleError::PublicInput(format!(
                "Expected {} public inputs, got {}",
                PUBLIC_INPUT_COUNT,
                inputs.len()
            )));
        }

        let mut nibbles = [0u8; METADATA_INPUT_COUNT];
        for (i, (slot, value)) in nibbles.iter_mut().zip(inputs).enumerate() {
            *slot = nibble(value)
                .ok_or_else(|| OracleError::PublicInput(format!("Input {} is not a nibble", i)))?;
        }

        let block_hash = hash_from_nibbles(&nibbles[..HASH_NIBBLES]);
        let parent_hash = hash_from_nibbles(&nibbles[HASH_NIBBLES..2 * HASH_NIBBLES]);
        let height = nibbles[2 * HASH_NIBBLES..METADATA_INPUT_COUNT]
            .iter()
            .fold(0u64, |acc, n| (acc << 4) | *n as u64);

        Ok(Self {
            block_hash,
            parent_hash,
            height,
            auxiliary: inputs[METADATA_INPUT_COUNT..].to_vec(),
        })
    }

    /// Inverse of [`PublicInputs::decode`]. `auxiliary` is padded with zeroes
    /// (or truncated) to 64 elements.
    pub fn encode(&self) -> Result<Vec<Fr>> {
        if self.height > MAX_HEIGHT {
            return Err(OracleError::PublicInput(format!(
                "Height {} does not fit in {} nibbles",
                self.height, HEIGHT_NIBBLES
            )));
        }

        let mut out = Vec::with_capacity(PUBLIC_INPUT_COUNT);
        for hash in [&self.block_hash, &self.parent_hash] {
            for byte in hash.0 {
                out.push(Fr::from_u64((byte >> 4) as u64));
                out.push(Fr::from_u64((byte & 0x0f) as u64));
            }
        }
        for i in (0..HEIGHT_NIBBLES).rev() {
            out.push(Fr::from_u64((self.height >> (4 * i)) & 0x0f));
        }
        out.extend(
            self.auxiliary
                .iter()
                .copied()
                .chain(std::iter::repeat(Fr::ZERO))
                .take(PUBLIC_INPUT_COUNT - METADATA_INPUT_COUNT),
        );
        Ok(out)
    }
}

fn nibble(value: &Fr) -> Option<u8> {
    match value.limbs() {
        [v, 0, 0, 0] if *v < 16 => Some(*v as u8),
        _ => None,
    }
}

fn hash_from_nibbles(nibbles: &[u8]) -> BlockHash {
    let mut out = [0u8; 32];
    for (byte, pair) in out.iter_mut().zip(nibbles.chunks_exact(2)) {
        *byte = (pair[0] << 4) | pair[1];
    }
    BlockHash(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(fill: u8) -> BlockHash {
        let mut h = [fill; 32];
        h[0] = 0xa5;
        BlockHash(h)
    }

    #[test]
    fn test_decode_nibble_order() {
        let mut inputs = vec![Fr::ZERO; PUBLIC_INPUT_COUNT];
        // 0xab.. : first two nibbles
        inputs[0] = Fr::from_u64(0xa);
        inputs[1] = Fr::from_u64(0xb);
        // parent ends in 0x..0f
        inputs[127] = Fr::from_u64(0xf);
        // height 0x012345
        for (i, n) in [0u64, 1, 2, 3, 4, 5].iter().enumerate() {
            inputs[128 + i] = Fr::from_u64(*n);
        }
        inputs[150] = Fr::from_u64(999);

        let decoded = PublicInputs::decode(&inputs).unwrap();
        assert_eq!(decoded.block_hash.0[0], 0xab);
        assert_eq!(decoded.parent_hash.0[31], 0x0f);
        assert_eq!(decoded.height, 0x012345);
        assert_eq!(decoded.auxiliary.len(), 64);
        assert_eq!(decoded.auxiliary[16], Fr::from_u64(999));
    }

    #[test]
    fn test_encode_decode() {
        let original = PublicInputs {
            block_hash: hash(0x11),
            parent_hash: hash(0x22),
            height: 16_000_000,
            auxiliary: vec![Fr::from_u64(5)],
        };
        let encoded = original.encode().unwrap();
        assert_eq!(encoded.len(), PUBLIC_INPUT_COUNT);
        let decoded = PublicInputs::decode(&encoded).unwrap();
        assert_eq!(decoded.block_hash, original.block_hash);
        assert_eq!(decoded.parent_hash, original.parent_hash);
        assert_eq!(decoded.height, original.height);
        assert_eq!(decoded.auxiliary[0], Fr::from_u64(5));
        assert_eq!(decoded.auxiliary[63], Fr::ZERO);
    }

    #[test]
    fn test_rejects_wide_nibble() {
        let mut inputs = vec![Fr::ZERO; PUBLIC_INPUT_COUNT];
        inputs[70] = Fr::from_u64(16);
        let err = PublicInputs::decode(&inputs).unwrap_err();
        assert!(matches!(err, OracleError::PublicInput(msg) if msg.contains("70")));
    }

    #[test]
    fn test_auxiliary_not_range_checked() {
        let mut inputs = vec![Fr::ZERO; PUBLIC_INPUT_COUNT];
        inputs[197] = -Fr::ONE;
        assert!(PublicInputs::decode(&inputs).is_ok());
    }

    #[test]
    fn test_rejects_wrong_count() {
        assert!(PublicInputs::decode(&[Fr::ZERO; 134]).is_err());
    }

    #[test]
    fn test_height_too_large() {
        let inputs = PublicInputs {
            block_hash: hash(1),
            parent_hash: hash(2),
            height: MAX_HEIGHT + 1,
            auxiliary: vec![],
        };
        assert!(inputs.encode().is_err());
    }

    #[test]
    fn test_block_hash_hex() {
        let h = hash(0xcd);
        let s = h.to_string();
        assert!(s.starts_with("0xa5cd"));
        assert_eq!(s.parse::<BlockHash>().unwrap(), h);
        assert!("0x1234".parse::<BlockHash>().is_err());
    }
}
