//! Proof parsing for TurboPLONK
//!
//! ## Binary Proof Format (big-endian):
//!
//! 1. W1, W2, W3, W4: wire commitments, 4 × 64 bytes
//! 2. Z: grand product commitment, 64 bytes
//! 3. T1..T4: quotient commitments, 4 × 64 bytes
//! 4. 15 evaluations, 32 bytes each: w1..w4, σ1..σ3, q_arith, q_ecc, q_c,
//!    z(ζω), w1(ζω)..w4(ζω)
//! 5. PI_Z, PI_Z_OMEGA: opening proofs at ζ and ζω, 2 × 64 bytes
//!
//! Total: 1184 bytes

use crate::constants::NUM_WIRES;
use crate::errors::ProofError;
use crate::field::Fr;
use crate::types::G1Point;

extern crate alloc;
use alloc::vec::Vec;

/// Number of evaluations carried by the proof
pub const NUM_PROOF_SCALARS: usize = 15;

/// Total proof size in bytes
pub const PROOF_SIZE: usize = 9 * 64 + NUM_PROOF_SCALARS * 32 + 2 * 64;

const SCALAR_LABELS: [&str; NUM_PROOF_SCALARS] = [
    "w1", "w2", "w3", "w4", "sigma1", "sigma2", "sigma3", "q_arith", "q_ecc", "q_c", "z_omega",
    "w1_omega", "w2_omega", "w3_omega", "w4_omega",
];

/// A parsed proof. Evaluations are at ζ unless named `*_omega` / `shifted_*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    pub wires: [G1Point; NUM_WIRES],
    pub z: G1Point,
    pub quotient: [G1Point; 4],
    pub wire_evals: [Fr; NUM_WIRES],
    pub sigma_evals: [Fr; 3],
    pub q_arith_eval: Fr,
    pub q_ecc_eval: Fr,
    pub q_c_eval: Fr,
    pub z_omega_eval: Fr,
    pub shifted_wire_evals: [Fr; NUM_WIRES],
    pub pi_z: G1Point,
    pub pi_z_omega: G1Point,
}

impl Proof {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProofError> {
        if bytes.len() != PROOF_SIZE {
            return Err(ProofError::InvalidSize {
                expected: PROOF_SIZE,
                actual: bytes.len(),
            });
        }

        let mut reader = Reader { bytes, offset: 0 };

        let wires = [reader.g1(), reader.g1(), reader.g1(), reader.g1()];
        let z = reader.g1();
        let quotient = [reader.g1(), reader.g1(), reader.g1(), reader.g1()];

        let mut scalars = [Fr::ZERO; NUM_PROOF_SCALARS];
        for (slot, label) in scalars.iter_mut().zip(SCALAR_LABELS) {
            *slot = reader.fr(label)?;
        }

        let pi_z = reader.g1();
        let pi_z_omega = reader.g1();

        Ok(Proof {
            wires,
            z,
            quotient,
            wire_evals: [scalars[0], scalars[1], scalars[2], scalars[3]],
            sigma_evals: [scalars[4], scalars[5], scalars[6]],
            q_arith_eval: scalars[7],
            q_ecc_eval: scalars[8],
            q_c_eval: scalars[9],
            z_omega_eval: scalars[10],
            shifted_wire_evals: [scalars[11], scalars[12], scalars[13], scalars[14]],
            pi_z,
            pi_z_omega,
        })
    }

    /// The 15 evaluations in wire order (the order they are hashed in)
    pub fn scalars(&self) -> [Fr; NUM_PROOF_SCALARS] {
        let [w1, w2, w3, w4] = self.wire_evals;
        let [s1, s2, s3] = self.sigma_evals;
        let [w1o, w2o, w3o, w4o] = self.shifted_wire_evals;
        [
            w1,
            w2,
            w3,
            w4,
            s1,
            s2,
            s3,
            self.q_arith_eval,
            self.q_ecc_eval,
            self.q_c_eval,
            self.z_omega_eval,
            w1o,
            w2o,
            w3o,
            w4o,
        ]
    }

    /// Every commitment with a label for error reporting
    pub fn labelled_points(&self) -> [(&'static str, &G1Point); 11] {
        [
            ("W1", &self.wires[0]),
            ("W2", &self.wires[1]),
            ("W3", &self.wires[2]),
            ("W4", &self.wires[3]),
            ("Z", &self.z),
            ("T1", &self.quotient[0]),
            ("T2", &self.quotient[1]),
            ("T3", &self.quotient[2]),
            ("T4", &self.quotient[3]),
            ("PI_Z", &self.pi_z),
            ("PI_Z_OMEGA", &self.pi_z_omega),
        ]
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PROOF_SIZE);
        for p in self.wires.iter().chain([&self.z]).chain(self.quotient.iter()) {
            out.extend_from_slice(p.as_bytes());
        }
        for s in self.scalars() {
            out.extend_from_slice(&s.to_be_bytes());
        }
        out.extend_from_slice(self.pi_z.as_bytes());
        out.extend_from_slice(self.pi_z_omega.as_bytes());
        out
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn g1(&mut self) -> G1Point {
        let mut p = [0u8; 64];
        p.copy_from_slice(&self.bytes[self.offset..self.offset + 64]);
        self.offset += 64;
        G1Point(p)
    }

    fn fr(&mut self, label: &'static str) -> Result<Fr, ProofError> {
        let mut s = [0u8; 32];
        s.copy_from_slice(&self.bytes[self.offset..self.offset + 32]);
        self.offset += 32;
        Fr::from_be_bytes(&s).ok_or(ProofError::InvalidScalar(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_proof() -> Proof {
        let f = |v: u64| Fr::from_u64(v);
        Proof {
            wires: [G1Point::GENERATOR; 4],
            z: G1Point::GENERATOR,
            quotient: [G1Point::GENERATOR.negate(); 4],
            wire_evals: [f(1), f(2), f(3), f(4)],
            sigma_evals: [f(5), f(6), f(7)],
            q_arith_eval: f(8),
            q_ecc_eval: f(9),
            q_c_eval: f(10),
            z_omega_eval: f(11),
            shifted_wire_evals: [f(12), f(13), f(14), f(15)],
            pi_z: G1Point::GENERATOR,
            pi_z_omega: G1Point::IDENTITY,
        }
    }

    #[test]
    fn test_proof_size() {
        assert_eq!(PROOF_SIZE, 1184);
    }

    #[test]
    fn test_parse_layout() {
        let proof = sample_proof();
        let bytes = proof.to_bytes();
        assert_eq!(bytes.len(), PROOF_SIZE);

        // First scalar sits right after the 9 leading commitments
        assert_eq!(bytes[9 * 64 + 31], 1);
        // z(ζω) is the eleventh scalar
        assert_eq!(bytes[9 * 64 + 10 * 32 + 31], 11);

        let parsed = Proof::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, proof);
        assert_eq!(parsed.scalars()[14], Fr::from_u64(15));
    }

    #[test]
    fn test_rejects_wrong_size() {
        let err = Proof::from_bytes(&[0u8; PROOF_SIZE - 1]).unwrap_err();
        assert!(matches!(err, ProofError::InvalidSize { actual, .. } if actual == PROOF_SIZE - 1));
    }

    #[test]
    fn test_rejects_non_canonical_scalar() {
        let mut bytes = sample_proof().to_bytes();
        let q_c_offset = 9 * 64 + 9 * 32;
        bytes[q_c_offset..q_c_offset + 32].copy_from_slice(&[0xff; 32]);
        assert!(matches!(
            Proof::from_bytes(&bytes),
            Err(ProofError::InvalidScalar("q_c"))
        ));
    }
}
