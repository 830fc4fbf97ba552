//! Curve point types for BN254
//!
//! Points are kept in the 64/128-byte big-endian encoding the `solana-bn254`
//! precompiles consume, so they move between the verifier and the curve
//! backend without re-encoding.

use crate::errors::PointError;
use crate::field::Fq;
use core::fmt;
use hex_literal::hex;

/// Curve coefficient b in y^2 = x^3 + b
pub const CURVE_B: u64 = 3;

/// A G1 point, uncompressed big-endian x || y. (0, 0) encodes the identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct G1Point(pub [u8; 64]);

impl G1Point {
    /// Point at infinity
    pub const IDENTITY: Self = Self([0u8; 64]);

    /// Generator (1, 2)
    pub const GENERATOR: Self = Self({
        let mut g = [0u8; 64];
        g[31] = 1;
        g[63] = 2;
        g
    });

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; 64] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    pub fn from_coordinates(x: &Fq, y: &Fq) -> Self {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&x.to_be_bytes());
        out[32..].copy_from_slice(&y.to_be_bytes());
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    pub fn x_bytes(&self) -> [u8; 32] {
        let mut x = [0u8; 32];
        x.copy_from_slice(&self.0[..32]);
        x
    }

    pub fn y_bytes(&self) -> [u8; 32] {
        let mut y = [0u8; 32];
        y.copy_from_slice(&self.0[32..]);
        y
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Check that the point is usable as a commitment: both coordinates
    /// canonical, not the (0, 0) identity encoding, and on the curve.
    pub fn validate(&self) -> Result<(), PointError> {
        let x = Fq::from_be_bytes(&self.x_bytes()).ok_or(PointError::CoordinateOutOfRange)?;
        let y = Fq::from_be_bytes(&self.y_bytes()).ok_or(PointError::CoordinateOutOfRange)?;

        if x.is_zero() && y.is_zero() {
            return Err(PointError::Identity);
        }

        let lhs = y.square();
        let rhs = x.square() * x + Fq::from_u64(CURVE_B);
        if lhs != rhs {
            return Err(PointError::NotOnCurve);
        }
        Ok(())
    }

    /// (x, -y). The identity maps to itself.
    pub fn negate(&self) -> Self {
        let y_bytes = self.y_bytes();
        // Out-of-range y is left for validate() to reject
        match Fq::from_be_bytes(&y_bytes) {
            Some(y) => {
                let mut out = self.0;
                out[32..].copy_from_slice(&(-y).to_be_bytes());
                Self(out)
            }
            None => *self,
        }
    }
}

impl Default for G1Point {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Debug for G1Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G1Point{}", crate::debug::g1_to_hex(self))
    }
}

/// A G2 point, uncompressed big-endian x.c1 || x.c0 || y.c1 || y.c0.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct G2Point(pub [u8; 128]);

impl G2Point {
    /// Standard BN254 G2 generator
    pub const GENERATOR: Self = Self(hex!(
        "198e9393920d483a7260bfb731fb5d25f1aa493335a9e71297e485b7aef312c2"
        "1800deef121f1e76426a00665e5c4479674322d4f75edadd46debd5cd992f6ed"
        "090689d0585ff075ec9e99ad690c3395bc4b313370b38ef355acdadcd122975b"
        "12c85ea5db8c6deb4aab71808dcb408fe3d1e7690c43d37b4ce6cc0166fa7daa"
    ));

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; 128] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; 128] {
        &self.0
    }

    /// Each of the four coordinate halves must be a canonical base field element.
    pub fn has_canonical_coordinates(&self) -> bool {
        self.0.chunks_exact(32).all(|chunk| {
            let mut c = [0u8; 32];
            c.copy_from_slice(chunk);
            Fq::from_be_bytes(&c).is_some()
        })
    }
}

impl fmt::Debug for G2Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G2Point(0x")?;
        for b in &self.0[..8] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "..)")
    }
}
