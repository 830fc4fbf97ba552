//! BN254 group operations
//!
//! The verifier talks to the curve only through [`CurveOps`]. [`Bn254`] is the
//! production backend and forwards to the `solana-bn254` precompile
//! implementations, which run both on-chain and natively.

use crate::errors::Bn254Error;
use crate::field::Fr;
use crate::types::{G1Point, G2Point};
use solana_bn254::prelude::{
    alt_bn128_g1_addition_be, alt_bn128_g1_multiplication_be, alt_bn128_pairing_be,
};

extern crate alloc;
use alloc::format;
use alloc::vec::Vec;

/// Curve arithmetic needed by the verifier.
pub trait CurveOps {
    /// a + b in G1
    fn add(&self, a: &G1Point, b: &G1Point) -> Result<G1Point, Bn254Error>;

    /// s * p in G1
    fn scalar_mul(&self, p: &G1Point, s: &Fr) -> Result<G1Point, Bn254Error>;

    /// true iff ∏ e(a_i, b_i) == 1 in GT
    fn pairing_check(&self, pairs: &[(G1Point, G2Point)]) -> Result<bool, Bn254Error>;

    /// a - b in G1
    fn sub(&self, a: &G1Point, b: &G1Point) -> Result<G1Point, Bn254Error> {
        self.add(a, &b.negate())
    }

    /// Σ scalars[i] * points[i]
    fn msm(&self, terms: &[(G1Point, Fr)]) -> Result<G1Point, Bn254Error> {
        let mut acc = G1Point::IDENTITY;
        for (point, scalar) in terms {
            let term = self.scalar_mul(point, scalar)?;
            acc = self.add(&acc, &term)?;
        }
        Ok(acc)
    }
}

impl<C: CurveOps + ?Sized> CurveOps for &C {
    fn add(&self, a: &G1Point, b: &G1Point) -> Result<G1Point, Bn254Error> {
        (**self).add(a, b)
    }

    fn scalar_mul(&self, p: &G1Point, s: &Fr) -> Result<G1Point, Bn254Error> {
        (**self).scalar_mul(p, s)
    }

    fn pairing_check(&self, pairs: &[(G1Point, G2Point)]) -> Result<bool, Bn254Error> {
        (**self).pairing_check(pairs)
    }
}

/// `solana-bn254` backed curve operations
#[derive(Debug, Clone, Copy, Default)]
pub struct Bn254;

impl CurveOps for Bn254 {
    fn add(&self, a: &G1Point, b: &G1Point) -> Result<G1Point, Bn254Error> {
        let mut input = [0u8; 128];
        input[..64].copy_from_slice(a.as_bytes());
        input[64..].copy_from_slice(b.as_bytes());

        let result = alt_bn128_g1_addition_be(&input)
            .map_err(|e| Bn254Error::SyscallError(format!("G1 addition failed: {:?}", e)))?;

        G1Point::from_slice(&result).ok_or_else(|| {
            Bn254Error::SyscallError(format!("G1 addition returned {} bytes", result.len()))
        })
    }

    fn scalar_mul(&self, p: &G1Point, s: &Fr) -> Result<G1Point, Bn254Error> {
        let mut input = [0u8; 96];
        input[..64].copy_from_slice(p.as_bytes());
        input[64..].copy_from_slice(&s.to_be_bytes());

        let result = alt_bn128_g1_multiplication_be(&input)
            .map_err(|e| Bn254Error::SyscallError(format!("G1 multiplication failed: {:?}", e)))?;

        G1Point::from_slice(&result).ok_or_else(|| {
            Bn254Error::SyscallError(format!("G1 multiplication returned {} bytes", result.len()))
        })
    }

    fn pairing_check(&self, pairs: &[(G1Point, G2Point)]) -> Result<bool, Bn254Error> {
        if pairs.is_empty() {
            return Ok(true);
        }

        let mut input = Vec::with_capacity(pairs.len() * 192);
        for (g1, g2) in pairs {
            input.extend_from_slice(g1.as_bytes());
            input.extend_from_slice(g2.as_bytes());
        }

        let result = alt_bn128_pairing_be(&input)
            .map_err(|e| Bn254Error::SyscallError(format!("Pairing check failed: {:?}", e)))?;

        // 32-byte word, 1 in the last byte on success
        if result.len() != 32 {
            return Err(Bn254Error::PairingFailed);
        }

        Ok(result[31] == 1)
    }
}
