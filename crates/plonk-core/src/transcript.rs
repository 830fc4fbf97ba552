//! Fiat-Shamir transcript using Keccak256
//!
//! Every squeeze finalises the running hash, re-seeds the hasher with the raw
//! 32-byte digest and hands the digest back. Challenges are the digest reduced
//! mod r; the raw digest (not the reduced value) is what chains forward.

use crate::constants::NUM_NU_CHALLENGES;
use crate::field::Fr;
use crate::types::G1Point;
use sha3::{Digest, Keccak256};

/// Running Keccak256 transcript
pub struct Transcript {
    hasher: Keccak256,
}

impl Transcript {
    /// Create a new empty transcript
    pub fn new() -> Self {
        Self {
            hasher: Keccak256::new(),
        }
    }

    /// Append a u32 as 4 big-endian bytes
    pub fn append_u32(&mut self, val: u32) {
        self.hasher.update(val.to_be_bytes());
    }

    /// Append a G1 point (64 bytes, x || y)
    pub fn append_g1(&mut self, point: &G1Point) {
        self.hasher.update(point.as_bytes());
    }

    /// Append a scalar (32 bytes big-endian)
    pub fn append_scalar(&mut self, scalar: &Fr) {
        self.hasher.update(scalar.to_be_bytes());
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Finalise the current round and re-seed with the digest.
    pub fn squeeze(&mut self) -> [u8; 32] {
        let hash = self.hasher.finalize_reset();
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hash);
        self.hasher.update(digest);

        crate::trace!("transcript digest = {:02x?}", &digest[0..8]);
        digest
    }

    /// Squeeze and reduce to a scalar
    pub fn challenge(&mut self) -> Fr {
        Fr::from_be_bytes_reduced(&self.squeeze())
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot Keccak256 of `seed || suffix`, reduced mod r.
/// Used for the independent nu challenges which all hang off the same base.
pub fn derive_from(seed: &[u8; 32], suffix: &[u8]) -> Fr {
    let mut hasher = Keccak256::new();
    hasher.update(seed);
    hasher.update(suffix);
    let hash = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hash);
    Fr::from_be_bytes_reduced(&digest)
}

/// All verifier challenges for one proof
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenges {
    pub beta: Fr,
    pub gamma: Fr,
    pub alpha: Fr,
    pub zeta: Fr,
    /// nu_0..nu_3 wires, nu_4..nu_6 sigma_1..sigma_3, nu_7 q_arith, nu_8 q_ecc, nu_9 q_c
    pub nu: [Fr; NUM_NU_CHALLENGES],
    pub u: Fr,
}

impl Challenges {
    pub fn nu_wire(&self, j: usize) -> Fr {
        self.nu[j]
    }

    pub fn nu_sigma(&self, j: usize) -> Fr {
        self.nu[4 + j]
    }

    pub fn nu_q_arith(&self) -> Fr {
        self.nu[7]
    }

    pub fn nu_q_ecc(&self) -> Fr {
        self.nu[8]
    }

    pub fn nu_q_c(&self) -> Fr {
        self.nu[9]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keccak(data: &[u8]) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&Keccak256::digest(data));
        out
    }

    #[test]
    fn test_keccak_empty() {
        assert_eq!(
            hex::encode(keccak(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_squeeze_chains_raw_digest() {
        let mut t = Transcript::new();
        t.append_u32(16);
        t.append_u32(2);
        let first = t.squeeze();

        let mut init = [0u8; 8];
        init[..4].copy_from_slice(&16u32.to_be_bytes());
        init[4..].copy_from_slice(&2u32.to_be_bytes());
        assert_eq!(first, keccak(&init));

        t.append_bytes(&[0x01]);
        let second = t.squeeze();
        let mut chained = first.to_vec();
        chained.push(0x01);
        assert_eq!(second, keccak(&chained));
    }

    #[test]
    fn test_challenge_is_reduced() {
        let mut t = Transcript::new();
        t.append_bytes(b"turbo");
        let mut copy = Transcript::new();
        copy.append_bytes(b"turbo");
        let raw = copy.squeeze();
        assert_eq!(t.challenge(), Fr::from_be_bytes_reduced(&raw));
    }

    #[test]
    fn test_derive_from_independent_suffixes() {
        let seed = keccak(b"seed");
        let a = derive_from(&seed, &[1]);
        let b = derive_from(&seed, &[2]);
        assert_ne!(a, b);
        let mut input = seed.to_vec();
        input.push(2);
        assert_eq!(b, Fr::from_be_bytes_reduced(&keccak(&input)));
    }
}
