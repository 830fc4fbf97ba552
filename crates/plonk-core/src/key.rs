//! Verification key parsing for TurboPLONK
//!
//! ## VK Format (1257 bytes, big-endian)
//!
//! - [0..4]: circuit_size as u32
//! - [4..8]: num_public_inputs as u32
//! - [8..40]: work_root ω
//! - [40..72]: work_root_inverse ω⁻¹
//! - [72..104]: domain_inverse n⁻¹
//! - [104..1064]: 15 G1 commitments, see [`Selector`] for the order
//! - [1064]: contains_recursive_proof (0 or 1)
//! - [1065..1129]: 16 recursion public-input indices, u32 each
//! - [1129..1257]: G2 point [x]₂

use crate::constants::{MAX_LOG2_CIRCUIT_SIZE, MIN_CIRCUIT_SIZE, RECURSION_LIMB_COUNT};
use crate::errors::KeyError;
use crate::field::Fr;
use crate::types::{G1Point, G2Point};

extern crate alloc;
use alloc::vec::Vec;

/// Number of G1 commitments in the key
pub const VK_NUM_COMMITMENTS: usize = 15;

const HEADER_SIZE: usize = 104;
const COMMITMENTS_END: usize = HEADER_SIZE + VK_NUM_COMMITMENTS * 64;
const RECURSION_FLAG_OFFSET: usize = COMMITMENTS_END;
const RECURSION_INDICES_OFFSET: usize = RECURSION_FLAG_OFFSET + 1;
const G2_OFFSET: usize = RECURSION_INDICES_OFFSET + RECURSION_LIMB_COUNT * 4;

/// Serialized VK size
pub const VK_SIZE: usize = G2_OFFSET + 128; // 1257 bytes

/// Selector and permutation commitments, in key order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Q1 = 0,
    Q2,
    Q3,
    Q4,
    Q5,
    QM,
    QC,
    QArith,
    QEcc,
    QRange,
    QLogic,
    Sigma1,
    Sigma2,
    Sigma3,
    Sigma4,
}

impl Selector {
    pub const ALL: [Selector; VK_NUM_COMMITMENTS] = [
        Selector::Q1,
        Selector::Q2,
        Selector::Q3,
        Selector::Q4,
        Selector::Q5,
        Selector::QM,
        Selector::QC,
        Selector::QArith,
        Selector::QEcc,
        Selector::QRange,
        Selector::QLogic,
        Selector::Sigma1,
        Selector::Sigma2,
        Selector::Sigma3,
        Selector::Sigma4,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Selector::Q1 => "Q1",
            Selector::Q2 => "Q2",
            Selector::Q3 => "Q3",
            Selector::Q4 => "Q4",
            Selector::Q5 => "Q5",
            Selector::QM => "QM",
            Selector::QC => "QC",
            Selector::QArith => "QARITH",
            Selector::QEcc => "QECC",
            Selector::QRange => "QRANGE",
            Selector::QLogic => "QLOGIC",
            Selector::Sigma1 => "SIGMA1",
            Selector::Sigma2 => "SIGMA2",
            Selector::Sigma3 => "SIGMA3",
            Selector::Sigma4 => "SIGMA4",
        }
    }
}

/// Parsed TurboPLONK verification key. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationKey {
    /// Domain size n
    pub circuit_size: u32,
    /// log2(n)
    pub log2_circuit_size: u32,
    pub num_public_inputs: u32,
    /// Primitive n-th root of unity ω
    pub work_root: Fr,
    pub work_root_inverse: Fr,
    /// n⁻¹
    pub domain_inverse: Fr,
    pub commitments: [G1Point; VK_NUM_COMMITMENTS],
    pub contains_recursive_proof: bool,
    /// Public-input positions of the 16 recursion limbs
    pub recursive_proof_indices: [u32; RECURSION_LIMB_COUNT],
    /// [x]₂ from the structured reference string
    pub g2_x: G2Point,
}

impl VerificationKey {
    /// Parse and validate a key
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != VK_SIZE {
            return Err(KeyError::InvalidSize {
                expected: VK_SIZE,
                actual: bytes.len(),
            });
        }

        let circuit_size = read_u32(bytes, 0);
        let num_public_inputs = read_u32(bytes, 4);

        if !circuit_size.is_power_of_two() || circuit_size < MIN_CIRCUIT_SIZE {
            return Err(KeyError::InvalidCircuitSize(circuit_size));
        }
        let log2_circuit_size = circuit_size.trailing_zeros();
        if log2_circuit_size > MAX_LOG2_CIRCUIT_SIZE {
            return Err(KeyError::InvalidCircuitSize(circuit_size));
        }

        let work_root = read_fr(bytes, 8, "work_root")?;
        let work_root_inverse = read_fr(bytes, 40, "work_root_inverse")?;
        let domain_inverse = read_fr(bytes, 72, "domain_inverse")?;

        let mut commitments = [G1Point::IDENTITY; VK_NUM_COMMITMENTS];
        for (i, commitment) in commitments.iter_mut().enumerate() {
            let offset = HEADER_SIZE + i * 64;
            commitment.0.copy_from_slice(&bytes[offset..offset + 64]);
        }

        let contains_recursive_proof = match bytes[RECURSION_FLAG_OFFSET] {
            0 => false,
            1 => true,
            other => return Err(KeyError::InvalidRecursionFlag(other)),
        };

        let mut recursive_proof_indices = [0u32; RECURSION_LIMB_COUNT];
        for (i, index) in recursive_proof_indices.iter_mut().enumerate() {
            *index = read_u32(bytes, RECURSION_INDICES_OFFSET + i * 4);
        }

        let mut g2 = [0u8; 128];
        g2.copy_from_slice(&bytes[G2_OFFSET..G2_OFFSET + 128]);

        let vk = VerificationKey {
            circuit_size,
            log2_circuit_size,
            num_public_inputs,
            work_root,
            work_root_inverse,
            domain_inverse,
            commitments,
            contains_recursive_proof,
            recursive_proof_indices,
            g2_x: G2Point(g2),
        };
        vk.validate()?;
        Ok(vk)
    }

    /// Check the domain constants, commitments and recursion indices.
    pub fn validate(&self) -> Result<(), KeyError> {
        let n = Fr::from_u64(self.circuit_size as u64);
        if self.work_root * self.work_root_inverse != Fr::ONE {
            return Err(KeyError::InconsistentDomain("work_root * work_root_inverse != 1"));
        }
        if n * self.domain_inverse != Fr::ONE {
            return Err(KeyError::InconsistentDomain("n * domain_inverse != 1"));
        }
        let half = self.work_root.pow_u64(self.circuit_size as u64 / 2);
        if half != -Fr::ONE {
            return Err(KeyError::InconsistentDomain("work_root is not a primitive n-th root"));
        }

        for selector in Selector::ALL {
            self.commitment(selector)
                .validate()
                .map_err(|reason| KeyError::MalformedCommitment {
                    label: selector.label(),
                    reason,
                })?;
        }

        if !self.g2_x.has_canonical_coordinates() {
            return Err(KeyError::InvalidG2);
        }

        if self.contains_recursive_proof {
            for &index in &self.recursive_proof_indices {
                if index >= self.num_public_inputs {
                    return Err(KeyError::RecursionIndexOutOfRange {
                        index,
                        num_public_inputs: self.num_public_inputs,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn commitment(&self, selector: Selector) -> &G1Point {
        &self.commitments[selector as usize]
    }

    /// Serialize back to the binary layout
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(VK_SIZE);
        out.extend_from_slice(&self.circuit_size.to_be_bytes());
        out.extend_from_slice(&self.num_public_inputs.to_be_bytes());
        out.extend_from_slice(&self.work_root.to_be_bytes());
        out.extend_from_slice(&self.work_root_inverse.to_be_bytes());
        out.extend_from_slice(&self.domain_inverse.to_be_bytes());
        for c in &self.commitments {
            out.extend_from_slice(c.as_bytes());
        }
        out.push(self.contains_recursive_proof as u8);
        for index in &self.recursive_proof_indices {
            out.extend_from_slice(&index.to_be_bytes());
        }
        out.extend_from_slice(self.g2_x.as_bytes());
        out
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_be_bytes(word)
}

fn read_fr(bytes: &[u8], offset: usize, label: &'static str) -> Result<Fr, KeyError> {
    let mut word = [0u8; 32];
    word.copy_from_slice(&bytes[offset..offset + 32]);
    Fr::from_be_bytes(&word).ok_or(KeyError::NonCanonicalScalar(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::root_of_unity;
    use crate::errors::PointError;

    fn sample_key() -> VerificationKey {
        let log2 = 4;
        let w = root_of_unity(log2).unwrap();
        VerificationKey {
            circuit_size: 1 << log2,
            log2_circuit_size: log2,
            num_public_inputs: 20,
            work_root: w,
            work_root_inverse: w.inverse().unwrap(),
            domain_inverse: Fr::from_u64(16).inverse().unwrap(),
            commitments: [G1Point::GENERATOR; VK_NUM_COMMITMENTS],
            contains_recursive_proof: false,
            recursive_proof_indices: [0; RECURSION_LIMB_COUNT],
            g2_x: G2Point::GENERATOR,
        }
    }

    #[test]
    fn test_vk_size() {
        assert_eq!(VK_SIZE, 1257);
    }

    #[test]
    fn test_parse_serialized_key() {
        let vk = sample_key();
        let bytes = vk.to_bytes();
        assert_eq!(bytes.len(), VK_SIZE);
        assert_eq!(VerificationKey::from_bytes(&bytes).unwrap(), vk);
    }

    #[test]
    fn test_rejects_wrong_size() {
        let err = VerificationKey::from_bytes(&[0u8; 100]).unwrap_err();
        assert!(matches!(err, KeyError::InvalidSize { expected: VK_SIZE, actual: 100 }));
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let mut bytes = sample_key().to_bytes();
        bytes[0..4].copy_from_slice(&12u32.to_be_bytes());
        assert!(matches!(
            VerificationKey::from_bytes(&bytes),
            Err(KeyError::InvalidCircuitSize(12))
        ));
    }

    #[test]
    fn test_rejects_wrong_root() {
        let mut vk = sample_key();
        let w = root_of_unity(5).unwrap();
        vk.work_root = w;
        vk.work_root_inverse = w.inverse().unwrap();
        assert!(matches!(
            VerificationKey::from_bytes(&vk.to_bytes()),
            Err(KeyError::InconsistentDomain(_))
        ));
    }

    #[test]
    fn test_rejects_off_curve_commitment() {
        let mut vk = sample_key();
        vk.commitments[Selector::QLogic as usize].0[63] = 3;
        match VerificationKey::from_bytes(&vk.to_bytes()) {
            Err(KeyError::MalformedCommitment { label, reason }) => {
                assert_eq!(label, "QLOGIC");
                assert_eq!(reason, PointError::NotOnCurve);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_recursion_indices_checked() {
        let mut vk = sample_key();
        vk.contains_recursive_proof = true;
        vk.recursive_proof_indices = core::array::from_fn(|i| i as u32 + 4);
        assert!(VerificationKey::from_bytes(&vk.to_bytes()).is_ok());

        vk.recursive_proof_indices[15] = 20;
        assert!(matches!(
            VerificationKey::from_bytes(&vk.to_bytes()),
            Err(KeyError::RecursionIndexOutOfRange { index: 20, .. })
        ));

        let mut bytes = sample_key().to_bytes();
        bytes[RECURSION_FLAG_OFFSET] = 2;
        assert!(matches!(
            VerificationKey::from_bytes(&bytes),
            Err(KeyError::InvalidRecursionFlag(2))
        ));
    }
}
